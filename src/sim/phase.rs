//! Game phases and the legal transitions between them

use serde::{Deserialize, Serialize};

/// Which screen/mode is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Boot splash, left once via `Game::finish_loading`
    #[default]
    Loading,
    /// Main menu
    Menu,
    /// Active run, the only phase in which frames simulate
    Playing,
    /// Run frozen, waiting for resume/restart/menu
    Paused,
    /// Run ended by a crash
    GameOver,
    /// Leaderboard overlay
    Scores,
    /// Settings overlay
    Settings,
    /// About overlay
    About,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
            GamePhase::Scores => "scores",
            GamePhase::Settings => "settings",
            GamePhase::About => "about",
        }
    }

    /// Parse a lowercase phase name as produced by `as_str`
    pub fn from_name(name: &str) -> Option<Self> {
        use serde::de::IntoDeserializer;
        use serde::de::value::{Error, StrDeserializer};

        let de: StrDeserializer<'_, Error> = name.trim().into_deserializer();
        Self::deserialize(de).ok()
    }

    /// Whether the frame loop may run in this phase
    pub fn runs_simulation(&self) -> bool {
        *self == GamePhase::Playing
    }

    /// Menu overlays: reachable only from the menu, return only to it
    pub fn is_overlay(&self) -> bool {
        matches!(self, GamePhase::Scores | GamePhase::Settings | GamePhase::About)
    }

    /// Transition table.
    ///
    /// `Paused -> Playing` covers both resume and restart-from-pause;
    /// `GameOver -> Playing` is restart.
    pub fn can_transition_to(&self, next: GamePhase) -> bool {
        use GamePhase::*;
        match (*self, next) {
            (Loading, Menu) => true,
            (Menu, Playing) => true,
            (Menu, overlay) if overlay.is_overlay() => true,
            (Playing, Paused | GameOver | Menu) => true,
            (Paused, Playing | Menu) => true,
            (GameOver, Playing | Menu) => true,
            (overlay, Menu) if overlay.is_overlay() => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [GamePhase; 8] = [
        GamePhase::Loading,
        GamePhase::Menu,
        GamePhase::Playing,
        GamePhase::Paused,
        GamePhase::GameOver,
        GamePhase::Scores,
        GamePhase::Settings,
        GamePhase::About,
    ];

    #[test]
    fn test_loading_only_leads_to_menu() {
        for next in ALL {
            assert_eq!(
                GamePhase::Loading.can_transition_to(next),
                next == GamePhase::Menu,
                "loading -> {}",
                next.as_str()
            );
        }
    }

    #[test]
    fn test_overlays_only_touch_menu() {
        for overlay in ALL.iter().filter(|p| p.is_overlay()) {
            for other in ALL {
                assert_eq!(overlay.can_transition_to(other), other == GamePhase::Menu);
                let from_other = other.can_transition_to(*overlay);
                assert_eq!(from_other, other == GamePhase::Menu);
            }
        }
    }

    #[test]
    fn test_run_transitions() {
        assert!(GamePhase::Playing.can_transition_to(GamePhase::Paused));
        assert!(GamePhase::Paused.can_transition_to(GamePhase::Playing));
        assert!(GamePhase::Playing.can_transition_to(GamePhase::GameOver));
        assert!(GamePhase::GameOver.can_transition_to(GamePhase::Playing));
        assert!(GamePhase::GameOver.can_transition_to(GamePhase::Menu));

        // Game over only comes from a live run
        assert!(!GamePhase::Paused.can_transition_to(GamePhase::GameOver));
        assert!(!GamePhase::Menu.can_transition_to(GamePhase::GameOver));
        // Pause only from a live run
        assert!(!GamePhase::GameOver.can_transition_to(GamePhase::Paused));
        assert!(!GamePhase::Menu.can_transition_to(GamePhase::Paused));
        assert!(!GamePhase::Playing.can_transition_to(GamePhase::Playing));
    }

    #[test]
    fn test_only_playing_simulates() {
        let running: Vec<_> = ALL.iter().filter(|p| p.runs_simulation()).collect();
        assert_eq!(running, vec![&GamePhase::Playing]);
    }

    #[test]
    fn test_names_round_trip() {
        for phase in ALL {
            assert_eq!(GamePhase::from_name(phase.as_str()), Some(phase));
            assert_eq!(
                serde_json::to_string(&phase).unwrap(),
                format!("\"{}\"", phase.as_str())
            );
        }
        assert_eq!(GamePhase::from_name(" menu "), Some(GamePhase::Menu));
        assert_eq!(GamePhase::from_name("lobby"), None);
    }
}
