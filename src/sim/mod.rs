//! Frame simulation module
//!
//! All gameplay logic lives here. No rendering, storage or platform
//! dependencies:
//! - One `tick` per displayed frame
//! - Obstacles and particles kept in spawn order
//! - Phase changes only through the transition table

pub mod collision;
pub mod phase;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{flier_obstacle_collision, flier_out_of_bounds, passed, score_crossing};
pub use phase::GamePhase;
pub use spawn::{should_spawn, spawn_pair};
pub use state::{Flier, GameState, Obstacle, ObstacleSide, PairId, Particle, Viewport};
pub use tick::{Crash, TickOutcome, tick};
