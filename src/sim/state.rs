//! Game state and core simulation types
//!
//! Entities integrate themselves one frame at a time; `GameState` owns every
//! live entity plus the phase, score and RNG for the current session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::phase::GamePhase;
use super::spawn::spawn_pair;
use crate::consts::*;
use crate::error::TransitionError;
use crate::settings::DifficultyProfile;

/// Drawable area in world units. Origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flier {
    /// Center position; x never changes during a run
    pub pos: Vec2,
    /// Vertical velocity (world units per frame, positive is down)
    pub vel: f32,
    /// Collision radius
    pub radius: f32,
    /// Visual tilt in radians, derived from velocity
    pub rotation: f32,
}

impl Flier {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: 0.0,
            radius: FLIER_RADIUS,
            rotation: 0.0,
        }
    }

    /// Flier at its run-start position for this viewport
    pub fn spawn(viewport: Viewport) -> Self {
        Self::new(Vec2::new(
            viewport.width * FLIER_START_X,
            viewport.height * FLIER_START_Y,
        ))
    }

    /// Upward impulse. Replaces the velocity rather than adding to it.
    pub fn flap(&mut self) {
        self.vel = FLAP_VELOCITY;
    }

    /// Advance one frame under `gravity`
    pub fn integrate(&mut self, gravity: f32) {
        self.vel += gravity;
        self.pos.y += self.vel;
        self.rotation = (self.vel * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT);
    }

    /// Corners of the square circumscribing the collision circle
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.radius);
        (self.pos - r, self.pos + r)
    }
}

/// Identity shared by the two obstacles spawned together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub u32);

/// Which half of a pair an obstacle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleSide {
    Upper,
    Lower,
}

/// An axis-aligned blocking rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pair: PairId,
    pub side: ObstacleSide,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Set once the flier has passed this obstacle's pair
    pub scored: bool,
}

impl Obstacle {
    /// Move left by `speed`
    pub fn integrate(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Entirely past the left edge of the viewport
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

/// A cosmetic particle (never collides)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, dead at or below 0
    pub life: f32,
    pub size: f32,
}

impl Particle {
    /// New particle at `pos` with randomized velocity and size
    pub fn burst(rng: &mut impl Rng, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                rng.random_range(-PARTICLE_SPEED..PARTICLE_SPEED),
                rng.random_range(-PARTICLE_SPEED..PARTICLE_SPEED),
            ),
            life: 1.0,
            size: rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE),
        }
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.life -= PARTICLE_DECAY;
        self.size *= PARTICLE_SHRINK;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Everything the simulation mutates
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Pairs passed this run
    pub score: u64,
    /// Present only while a run is live (playing or paused)
    pub flier: Option<Flier>,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Frames simulated this run
    pub frame_count: u64,
    /// Real time spent playing this run, excluding pauses
    pub run_time_ms: f64,
    rng: Pcg32,
    next_pair: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh session in the loading phase, seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    /// Fresh session with a fixed seed (reproducible gap placement)
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    fn from_rng(rng: Pcg32) -> Self {
        Self {
            phase: GamePhase::Loading,
            score: 0,
            flier: None,
            obstacles: Vec::new(),
            particles: Vec::new(),
            frame_count: 0,
            run_time_ms: 0.0,
            rng,
            next_pair: 1,
        }
    }

    /// Move to `next` if the phase table allows it. Returns the previous phase.
    pub fn transition(&mut self, next: GamePhase) -> Result<GamePhase, TransitionError> {
        let from = self.phase;
        if !from.can_transition_to(next) {
            return Err(TransitionError { from, to: next });
        }
        log::debug!("Phase {} -> {}", from.as_str(), next.as_str());
        self.phase = next;
        Ok(from)
    }

    /// Reset everything run-scoped and place a new flier and the first pair
    pub fn begin_run(&mut self, viewport: Viewport, profile: &DifficultyProfile) {
        self.score = 0;
        self.obstacles.clear();
        self.particles.clear();
        self.frame_count = 0;
        self.run_time_ms = 0.0;
        self.flier = Some(Flier::spawn(viewport));
        self.spawn_obstacle_pair(viewport, profile);
    }

    /// Drop the flier; obstacles stay for the game-over backdrop
    pub fn end_run(&mut self) {
        self.flier = None;
    }

    /// Generate a pair at the right edge and append it
    pub fn spawn_obstacle_pair(&mut self, viewport: Viewport, profile: &DifficultyProfile) {
        let pair = PairId(self.next_pair);
        self.next_pair += 1;
        let [upper, lower] = spawn_pair(&mut self.rng, pair, viewport, profile);
        log::debug!("Spawned pair {} with gap top {:.1}", pair.0, upper.height);
        self.obstacles.push(upper);
        self.obstacles.push(lower);
    }

    /// Apply a flap. No-op unless a run is live and unpaused.
    pub fn flap(&mut self) -> bool {
        if !self.phase.runs_simulation() {
            return false;
        }
        let Some(flier) = self.flier.as_mut() else {
            return false;
        };
        flier.flap();
        let pos = flier.pos;
        self.emit_particles(pos);
        true
    }

    /// Spawn a burst of particles at `pos`
    pub fn emit_particles(&mut self, pos: Vec2) {
        for _ in 0..FLAP_PARTICLES {
            let particle = Particle::burst(&mut self.rng, pos);
            self.particles.push(particle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use proptest::prelude::*;

    const VIEW: Viewport = Viewport {
        width: 480.0,
        height: 800.0,
    };

    #[test]
    fn test_flap_resets_velocity() {
        let mut flier = Flier::new(Vec2::new(100.0, 300.0));
        flier.vel = 12.5;
        flier.flap();
        assert_eq!(flier.vel, FLAP_VELOCITY);
        flier.vel = -20.0;
        flier.flap();
        assert_eq!(flier.vel, FLAP_VELOCITY);
        flier.flap();
        assert_eq!(flier.vel, FLAP_VELOCITY);
    }

    #[test]
    fn test_rotation_follows_velocity() {
        let mut flier = Flier::new(Vec2::new(100.0, 300.0));
        flier.integrate(1.0);
        assert!((flier.rotation - 0.1).abs() < 1e-6);

        flier.vel = 30.0;
        flier.integrate(0.0);
        assert_eq!(flier.rotation, MAX_TILT);

        flier.flap();
        flier.integrate(0.0);
        assert_eq!(flier.rotation, -MAX_TILT);
    }

    #[test]
    fn test_flier_spawns_at_fraction_of_viewport() {
        let flier = Flier::spawn(VIEW);
        assert_eq!(flier.pos, Vec2::new(96.0, 400.0));
        assert_eq!(flier.vel, 0.0);
        assert_eq!(flier.radius, FLIER_RADIUS);
    }

    #[test]
    fn test_obstacle_moves_left_and_leaves() {
        let mut obstacle = Obstacle {
            pair: PairId(1),
            side: ObstacleSide::Upper,
            pos: Vec2::new(10.0, 0.0),
            width: 80.0,
            height: 200.0,
            scored: false,
        };
        obstacle.integrate(3.0);
        assert_eq!(obstacle.pos.x, 7.0);
        assert!(!obstacle.is_off_screen());

        obstacle.pos.x = -80.0;
        // Right edge exactly at 0 is still on screen
        assert!(!obstacle.is_off_screen());
        obstacle.integrate(0.5);
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_particle_decays_and_dies() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particle = Particle::burst(&mut rng, Vec2::ZERO);
        let start_size = particle.size;
        assert!((PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE).contains(&start_size));
        assert!(particle.vel.x.abs() < PARTICLE_SPEED && particle.vel.y.abs() < PARTICLE_SPEED);

        let vel = particle.vel;
        particle.integrate();
        assert_eq!(particle.pos, vel);
        assert!((particle.life - 0.98).abs() < 1e-6);
        assert!((particle.size - start_size * PARTICLE_SHRINK).abs() < 1e-6);

        for _ in 0..48 {
            particle.integrate();
        }
        assert!(!particle.is_dead());
        for _ in 0..2 {
            particle.integrate();
        }
        assert!(particle.is_dead());
    }

    #[test]
    fn test_begin_run_resets() {
        let mut state = GameState::with_seed(1);
        state.score = 9;
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 1.0,
            size: 2.0,
        });
        state.run_time_ms = 500.0;

        state.begin_run(VIEW, &Difficulty::Normal.profile());

        assert_eq!(state.score, 0);
        assert!(state.particles.is_empty());
        assert_eq!(state.run_time_ms, 0.0);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[0].pair, state.obstacles[1].pair);
        assert_eq!(state.flier, Some(Flier::spawn(VIEW)));
    }

    #[test]
    fn test_flap_requires_live_run() {
        let mut state = GameState::with_seed(1);
        assert!(!state.flap());

        state.phase = GamePhase::Playing;
        assert!(!state.flap(), "no flier yet");

        state.begin_run(VIEW, &Difficulty::Normal.profile());
        assert!(state.flap());
        assert_eq!(state.flier.unwrap().vel, FLAP_VELOCITY);
        assert_eq!(state.particles.len(), FLAP_PARTICLES);

        state.phase = GamePhase::Paused;
        state.flier.as_mut().unwrap().vel = 3.0;
        assert!(!state.flap());
        assert_eq!(state.flier.unwrap().vel, 3.0);
        assert_eq!(state.particles.len(), FLAP_PARTICLES);
    }

    #[test]
    fn test_pair_ids_increase() {
        let mut state = GameState::with_seed(3);
        let profile = Difficulty::Easy.profile();
        state.spawn_obstacle_pair(VIEW, &profile);
        state.spawn_obstacle_pair(VIEW, &profile);
        let ids: Vec<u32> = state.obstacles.iter().map(|o| o.pair.0).collect();
        assert_eq!(ids, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_illegal_transition_keeps_phase() {
        let mut state = GameState::with_seed(1);
        let err = state.transition(GamePhase::Playing).unwrap_err();
        assert_eq!(err.from, GamePhase::Loading);
        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.transition(GamePhase::Menu), Ok(GamePhase::Loading));
        assert_eq!(state.phase, GamePhase::Menu);
    }

    proptest! {
        #[test]
        fn prop_free_fall_accumulates_gravity(g in 0.01f32..2.0, frames in 1usize..400) {
            let mut flier = Flier::new(Vec2::new(50.0, 0.0));
            let mut last_y = flier.pos.y;
            for _ in 0..frames {
                flier.integrate(g);
                prop_assert!(flier.pos.y >= last_y);
                last_y = flier.pos.y;
            }
            let expected = frames as f32 * g;
            prop_assert!((flier.vel - expected).abs() <= expected * 1e-4);
        }
    }
}
