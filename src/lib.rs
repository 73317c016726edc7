//! Skyflap - A flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Frame simulation (flier physics, obstacle pairs, collisions, phases)
//! - `game`: Run lifecycle, frame loop and input dispatch
//! - `renderer`: Rendering collaborator contract and shape geometry
//! - `persistence`: Key-value storage for settings and best score
//! - `highscores`: Score leaderboard contract and local implementation
//! - `settings`: Difficulty presets and player preferences

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, GameError, LeaderboardError, StoreError, TransitionError};
pub use game::{Game, InputEvent, Notice, NoticeKind, RunSummary, SettingChange};
pub use highscores::{Leaderboard, LocalLeaderboard, ScoreEntry};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::{Difficulty, DifficultyProfile, Settings, Theme};

/// Game configuration constants
///
/// Physics values are per frame, not per second.
pub mod consts {
    /// Vertical velocity set by a flap (negative is up)
    pub const FLAP_VELOCITY: f32 = -8.0;
    /// Flier collision radius
    pub const FLIER_RADIUS: f32 = 20.0;
    /// Flier spawn position as a fraction of the viewport
    pub const FLIER_START_X: f32 = 0.2;
    pub const FLIER_START_Y: f32 = 0.5;
    /// Visual tilt per unit of velocity, clamped to ±MAX_TILT radians
    pub const TILT_PER_VELOCITY: f32 = 0.1;
    pub const MAX_TILT: f32 = 0.5;

    /// Obstacle (pipe) width
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// A new pair spawns once the newest obstacle is this far left of the right edge
    pub const SPAWN_LEAD: f32 = 300.0;
    /// Minimum height of the upper obstacle
    pub const GAP_TOP_MARGIN: f32 = 100.0;
    /// Minimum height of the lower obstacle
    pub const GAP_BOTTOM_MARGIN: f32 = 100.0;
    /// Viewport height beyond the gap needed for non-degenerate placement
    pub const GAP_RESERVED: f32 = 300.0;

    /// Particles emitted per flap
    pub const FLAP_PARTICLES: usize = 5;
    /// Maximum particle speed per axis
    pub const PARTICLE_SPEED: f32 = 2.0;
    /// Particle size range
    pub const PARTICLE_MIN_SIZE: f32 = 1.0;
    pub const PARTICLE_MAX_SIZE: f32 = 4.0;
    /// Life lost per frame
    pub const PARTICLE_DECAY: f32 = 0.02;
    /// Size multiplier per frame
    pub const PARTICLE_SHRINK: f32 = 0.98;
}

/// Install the browser console logger and panic hook
#[cfg(target_arch = "wasm32")]
pub fn init_wasm_logging() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}
