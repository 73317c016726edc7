//! Error types
//!
//! Collaborator failures (storage, leaderboard) are recoverable and end up as
//! user-facing notices. Configuration and transition errors are returned by the
//! typed `Game` API and ignored (with a debug log) by the event dispatcher.

use thiserror::Error;

use crate::sim::GamePhase;

/// Failure reading or writing the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure talking to the score leaderboard
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
    #[error("{0} is not supported by this leaderboard")]
    Unsupported(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Difficulty geometry that cannot produce a valid obstacle pair
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewport height {height} too small for a gap of {min_gap}")]
    ViewportTooSmall { height: f32, min_gap: f32 },
}

/// A state change the phase table does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot go from {} to {}", .from.as_str(), .to.as_str())]
pub struct TransitionError {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Errors from the typed `Game` API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
