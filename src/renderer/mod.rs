//! Rendering collaborator
//!
//! The core never draws. Once per frame, after simulation, it hands a
//! read-only `FrameSnapshot` to a `Renderer`. `shapes` turns a snapshot into
//! a backend-neutral display list.

pub mod shapes;

pub use shapes::{Shape, display_list};

use crate::settings::Theme;
use crate::sim::{Flier, GamePhase, Obstacle, Particle, Viewport};

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub theme: Theme,
    pub score: u64,
    pub flier: Option<&'a Flier>,
    pub obstacles: &'a [Obstacle],
    pub particles: &'a [Particle],
}

/// Draws frames. Must not (and cannot) mutate simulation state.
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot<'_>) {}
}
