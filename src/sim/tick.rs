//! Per-frame simulation step
//!
//! Physics is applied per call, not scaled by elapsed time: a faster display
//! plays a faster game. `delta_ms` only advances the run clock.

use super::collision::{flier_obstacle_collision, flier_out_of_bounds, score_crossing};
use super::phase::GamePhase;
use super::spawn::should_spawn;
use super::state::{GameState, PairId, Viewport};
use crate::settings::DifficultyProfile;

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    /// Hit the top or bottom of the viewport
    Boundary,
    /// Hit an obstacle of this pair
    Obstacle(PairId),
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing was simulated
    Idle,
    /// Frame simulated, run continues
    Continue { scored: u64 },
    /// Frame aborted by a crash; phase is now `GameOver`
    Crashed(Crash),
}

/// Advance the game state by one frame
pub fn tick(
    state: &mut GameState,
    profile: &DifficultyProfile,
    viewport: Viewport,
    delta_ms: f64,
) -> TickOutcome {
    if !state.phase.runs_simulation() {
        return TickOutcome::Idle;
    }
    let Some(flier) = state.flier.as_mut() else {
        return TickOutcome::Idle;
    };

    state.frame_count += 1;
    state.run_time_ms += delta_ms.max(0.0);

    flier.integrate(profile.gravity);
    let flier = *flier;
    if flier_out_of_bounds(&flier, viewport.height) {
        return crash(state, Crash::Boundary);
    }

    // Move, score and test every obstacle before anything is removed
    let mut scored = 0;
    let mut keep = Vec::with_capacity(state.obstacles.len());
    for i in 0..state.obstacles.len() {
        state.obstacles[i].integrate(profile.speed);
        scored += score_crossing(&flier, &mut state.obstacles, i);

        let obstacle = &state.obstacles[i];
        if flier_obstacle_collision(&flier, obstacle) {
            let pair = obstacle.pair;
            state.score += scored;
            return crash(state, Crash::Obstacle(pair));
        }
        keep.push(!obstacle.is_off_screen());
    }
    state.score += scored;

    let mut marks = keep.into_iter();
    state.obstacles.retain(|_| marks.next().unwrap_or(true));

    if should_spawn(&state.obstacles, viewport) {
        state.spawn_obstacle_pair(viewport, profile);
    }

    for particle in state.particles.iter_mut() {
        particle.integrate();
    }
    state.particles.retain(|p| !p.is_dead());

    TickOutcome::Continue { scored }
}

fn crash(state: &mut GameState, cause: Crash) -> TickOutcome {
    // Only reachable from Playing, which can always go to GameOver
    if let Err(e) = state.transition(GamePhase::GameOver) {
        log::error!("{}", e);
    }
    TickOutcome::Crashed(cause)
}
