//! Procedural obstacle pairs
//!
//! Each pair is an upper and a lower rectangle spanning the full viewport
//! height around one randomly placed gap.

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, ObstacleSide, PairId, Viewport};
use crate::consts::{GAP_BOTTOM_MARGIN, GAP_TOP_MARGIN, OBSTACLE_WIDTH, SPAWN_LEAD};
use crate::settings::DifficultyProfile;

/// Generate a pair at the right edge of the viewport.
///
/// The gap's top edge is uniform in
/// `[GAP_TOP_MARGIN, height - min_gap - GAP_BOTTOM_MARGIN)`.
/// The profile must have passed `DifficultyProfile::check_viewport`.
pub fn spawn_pair(
    rng: &mut impl Rng,
    pair: PairId,
    viewport: Viewport,
    profile: &DifficultyProfile,
) -> [Obstacle; 2] {
    let range = viewport.height - profile.min_gap - GAP_TOP_MARGIN - GAP_BOTTOM_MARGIN;
    assert!(
        range > 0.0,
        "no room for a {} gap in a {} tall viewport",
        profile.min_gap,
        viewport.height
    );

    let gap_top = GAP_TOP_MARGIN + rng.random::<f32>() * range;
    let gap_bottom = gap_top + profile.min_gap;
    let lower_height = viewport.height - gap_bottom;
    assert!(lower_height >= 0.0, "negative lower obstacle height");

    let upper = Obstacle {
        pair,
        side: ObstacleSide::Upper,
        pos: Vec2::new(viewport.width, 0.0),
        width: OBSTACLE_WIDTH,
        height: gap_top,
        scored: false,
    };
    let lower = Obstacle {
        pair,
        side: ObstacleSide::Lower,
        pos: Vec2::new(viewport.width, gap_bottom),
        width: OBSTACLE_WIDTH,
        height: lower_height,
        scored: false,
    };
    [upper, lower]
}

/// Whether a new pair is due: nothing on screen, or the newest obstacle has
/// moved more than `SPAWN_LEAD` in from the right edge.
pub fn should_spawn(obstacles: &[Obstacle], viewport: Viewport) -> bool {
    obstacles
        .last()
        .is_none_or(|newest| newest.pos.x < viewport.width - SPAWN_LEAD)
}
