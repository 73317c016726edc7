//! Game settings and difficulty presets
//!
//! Persisted as JSON through the key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::GAP_RESERVED;
use crate::error::{ConfigError, StoreError};
use crate::persistence::KeyValueStore;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Resolve a name, falling back to `Normal` for anything unknown
    pub fn from_name_or_default(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using normal", s);
            Difficulty::Normal
        })
    }

    /// Physics and spacing constants for this preset
    pub fn profile(&self) -> DifficultyProfile {
        let (gravity, min_gap, speed) = match self {
            Difficulty::Easy => (0.3, 200.0, 2.0),
            Difficulty::Normal => (0.4, 150.0, 3.0),
            Difficulty::Hard => (0.5, 120.0, 4.0),
            Difficulty::Extreme => (0.6, 100.0, 5.0),
        };
        DifficultyProfile {
            gravity,
            min_gap,
            speed,
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::from_name_or_default(&s)
    }
}

/// Immutable per-frame constants for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Downward acceleration added to the flier's velocity each frame
    pub gravity: f32,
    /// Vertical gap between the obstacles of a pair
    pub min_gap: f32,
    /// Leftward obstacle movement per frame
    pub speed: f32,
}

impl DifficultyProfile {
    /// Reject viewports too short to place a gap with both margins
    pub fn check_viewport(&self, height: f32) -> Result<(), ConfigError> {
        if self.min_gap >= height - GAP_RESERVED {
            return Err(ConfigError::ViewportTooSmall {
                height,
                min_gap: self.min_gap,
            });
        }
        Ok(())
    }
}

/// Visual theme (sky colors only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Day,
    Night,
    Sunset,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
            Theme::Sunset => "sunset",
        }
    }
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" => Theme::Day,
            "night" => Theme::Night,
            "sunset" => Theme::Sunset,
            _ => {
                log::warn!("Unknown theme {:?}, using day", s);
                Theme::Day
            }
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Sound effects enabled
    pub sound: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound: true,
            theme: Theme::Day,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "skyflap-settings";

    /// Load settings, merging saved fields over the defaults.
    ///
    /// Missing or unreadable data yields the defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding malformed settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Restore defaults and save them
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        *self = Self::default();
        self.save(store)
    }

    /// Active difficulty constants
    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }
}
