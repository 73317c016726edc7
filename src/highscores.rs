//! Score leaderboard
//!
//! `Leaderboard` is the contract for a (usually remote) score service.
//! `LocalLeaderboard` keeps the top 10 in a key-value store.

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;
use crate::persistence::KeyValueStore;
use crate::platform::now_ms;

/// Maximum number of entries kept by the local leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// Name used when the player leaves the field blank
pub const ANONYMOUS_PLAYER: &str = "Anonymous";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: String,
    pub score: u64,
    /// Unix timestamp (ms) when submitted
    pub timestamp: f64,
}

/// Score service
pub trait Leaderboard {
    fn submit_score(&mut self, player: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Entries, best first
    fn list_scores(&self) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    fn clear_scores(&mut self) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::Unsupported("clearing scores"))
    }
}

/// Trimmed player name, or the anonymous placeholder when blank
pub fn normalize_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS_PLAYER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Top-10 leaderboard persisted as JSON in a key-value store
#[derive(Debug)]
pub struct LocalLeaderboard<S> {
    store: S,
}

impl<S: KeyValueStore> LocalLeaderboard<S> {
    /// Storage key
    const STORAGE_KEY: &'static str = "skyflap-highscores";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        match self.store.get(Self::STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| LeaderboardError::Store(e.into())),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string(entries).map_err(|e| LeaderboardError::Store(e.into()))?;
        self.store.set(Self::STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Rank a score would achieve (1-indexed), None if it would not make the table
    pub fn potential_rank(&self, score: u64) -> Result<Option<usize>, LeaderboardError> {
        let entries = self.load()?;
        Ok(rank_in(&entries, score))
    }
}

/// Insertion rank of `score` among `entries` (sorted descending)
fn rank_in(entries: &[ScoreEntry], score: u64) -> Option<usize> {
    let pos = entries
        .iter()
        .position(|e| score > e.score)
        .unwrap_or(entries.len());
    (pos < MAX_HIGH_SCORES).then_some(pos + 1)
}

impl<S: KeyValueStore> Leaderboard for LocalLeaderboard<S> {
    /// Every submission is accepted; the table keeps only the top entries
    fn submit_score(&mut self, player: &str, score: u64) -> Result<(), LeaderboardError> {
        let mut entries = self.load()?;
        let Some(rank) = rank_in(&entries, score) else {
            log::info!("Score {} is below the top {}", score, MAX_HIGH_SCORES);
            return Ok(());
        };

        entries.insert(
            rank - 1,
            ScoreEntry {
                player: normalize_player_name(player),
                score,
                timestamp: now_ms(),
            },
        );
        entries.truncate(MAX_HIGH_SCORES);
        self.save(&entries)?;

        log::info!("High score {} saved at rank {}", score, rank);
        Ok(())
    }

    fn list_scores(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        self.load()
    }

    fn clear_scores(&mut self) -> Result<(), LeaderboardError> {
        self.store.remove(Self::STORAGE_KEY)?;
        log::info!("High scores cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn board() -> LocalLeaderboard<MemoryStore> {
        LocalLeaderboard::new(MemoryStore::new())
    }

    #[test]
    fn test_empty_board() {
        let board = board();
        assert!(board.list_scores().unwrap().is_empty());
        assert_eq!(board.potential_rank(1).unwrap(), Some(1));
        assert_eq!(board.potential_rank(0).unwrap(), Some(1));
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = board();
        board.submit_score("ana", 5).unwrap();
        board.submit_score("bo", 12).unwrap();
        board.submit_score("cy", 8).unwrap();

        let scores: Vec<_> = board
            .list_scores()
            .unwrap()
            .into_iter()
            .map(|e| (e.player, e.score))
            .collect();
        assert_eq!(
            scores,
            vec![("bo".into(), 12), ("cy".into(), 8), ("ana".into(), 5)]
        );
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut board = board();
        board.submit_score("first", 7).unwrap();
        assert_eq!(board.potential_rank(7).unwrap(), Some(2));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut board = board();
        for score in 1..=MAX_HIGH_SCORES as u64 {
            board.submit_score("p", score * 10).unwrap();
        }
        assert_eq!(board.potential_rank(5).unwrap(), None);
        // Accepted but drops straight off the table
        board.submit_score("late", 5).unwrap();
        assert!(board.list_scores().unwrap().iter().all(|e| e.score >= 10));
        board.submit_score("late", 55).unwrap();

        let entries = board.list_scores().unwrap();
        assert_eq!(entries.len(), MAX_HIGH_SCORES);
        assert_eq!(entries.last().unwrap().score, 20);
        assert!(entries.iter().any(|e| e.player == "late" && e.score == 55));
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let mut board = board();
        board.submit_score("   ", 3).unwrap();
        board.submit_score("  zed ", 2).unwrap();
        let entries = board.list_scores().unwrap();
        assert_eq!(entries[0].player, ANONYMOUS_PLAYER);
        assert_eq!(entries[1].player, "zed");
        assert!(entries[0].timestamp > 0.0);
    }

    #[test]
    fn test_zero_score_is_accepted() {
        let mut board = board();
        board.submit_score("", 0).unwrap();
        let entries = board.list_scores().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 0);
    }

    #[test]
    fn test_clear() {
        let mut board = board();
        board.submit_score("p", 3).unwrap();
        board.clear_scores().unwrap();
        assert!(board.list_scores().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_table_is_an_error() {
        let mut board = board();
        board
            .store_mut()
            .set(LocalLeaderboard::<MemoryStore>::STORAGE_KEY, "[{")
            .unwrap();
        assert!(matches!(
            board.list_scores(),
            Err(LeaderboardError::Store(_))
        ));
    }
}
