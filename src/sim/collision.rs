//! Collision and scoring checks
//!
//! The flier is a circle for drawing but a square for collision: its
//! circumscribing square is tested against each obstacle rectangle.

use super::state::{Flier, Obstacle};

/// Whether the flier's bounding square overlaps the obstacle (strict overlap;
/// touching edges do not collide)
pub fn flier_obstacle_collision(flier: &Flier, obstacle: &Obstacle) -> bool {
    let (min, max) = flier.bounds();
    max.x > obstacle.pos.x
        && min.x < obstacle.right()
        && max.y > obstacle.pos.y
        && min.y < obstacle.bottom()
}

/// Whether the flier has hit the top or bottom of the viewport (inclusive)
pub fn flier_out_of_bounds(flier: &Flier, viewport_height: f32) -> bool {
    flier.pos.y <= 0.0 || flier.pos.y >= viewport_height - flier.radius
}

/// Whether the flier has just passed this obstacle's trailing edge
pub fn passed(flier: &Flier, obstacle: &Obstacle) -> bool {
    !obstacle.scored && flier.pos.x > obstacle.right()
}

/// Score the obstacle at `index` if the flier has passed it.
///
/// Marks every member of the obstacle's pair as scored so the partner
/// rectangle cannot count again. Returns the points gained (0 or 1).
pub fn score_crossing(flier: &Flier, obstacles: &mut [Obstacle], index: usize) -> u64 {
    let Some(obstacle) = obstacles.get(index) else {
        return 0;
    };
    if !passed(flier, obstacle) {
        return 0;
    }
    let pair = obstacle.pair;
    for member in obstacles.iter_mut().filter(|o| o.pair == pair) {
        member.scored = true;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ObstacleSide, PairId};
    use glam::Vec2;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Obstacle {
        Obstacle {
            pair: PairId(1),
            side: ObstacleSide::Upper,
            pos: Vec2::new(x, y),
            width,
            height,
            scored: false,
        }
    }

    fn flier_at(x: f32, y: f32) -> Flier {
        Flier::new(Vec2::new(x, y))
    }

    #[test]
    fn test_corner_of_bounding_square_collides() {
        // Circle would miss this corner, the square does not
        let obstacle = rect(100.0, 100.0, 80.0, 80.0);
        let flier = flier_at(85.0, 85.0);
        assert!(flier_obstacle_collision(&flier, &obstacle));
    }

    #[test]
    fn test_touching_edge_does_not_collide() {
        let obstacle = rect(100.0, 0.0, 80.0, 200.0);
        assert!(!flier_obstacle_collision(&flier_at(80.0, 100.0), &obstacle));
        assert!(flier_obstacle_collision(&flier_at(80.5, 100.0), &obstacle));
        assert!(!flier_obstacle_collision(&flier_at(140.0, 220.0), &obstacle));
    }

    #[test]
    fn test_boundary_inclusive() {
        let height = 800.0;
        assert!(flier_out_of_bounds(&flier_at(100.0, 0.0), height));
        assert!(flier_out_of_bounds(&flier_at(100.0, -5.0), height));
        assert!(flier_out_of_bounds(&flier_at(100.0, 780.0), height));
        assert!(flier_out_of_bounds(&flier_at(100.0, 900.0), height));
        assert!(!flier_out_of_bounds(&flier_at(100.0, 0.01), height));
        assert!(!flier_out_of_bounds(&flier_at(100.0, 779.9), height));
    }

    #[test]
    fn test_pair_scores_once() {
        let mut upper = rect(0.0, 0.0, 80.0, 200.0);
        let mut lower = rect(0.0, 350.0, 80.0, 450.0);
        upper.pair = PairId(3);
        lower.pair = PairId(3);
        lower.side = ObstacleSide::Lower;
        let mut obstacles = vec![upper, lower];
        let flier = flier_at(96.0, 300.0);

        let mut score = 0;
        for _ in 0..5 {
            for i in 0..obstacles.len() {
                score += score_crossing(&flier, &mut obstacles, i);
            }
        }
        assert_eq!(score, 1);
        assert!(obstacles.iter().all(|o| o.scored));
    }

    #[test]
    fn test_no_score_before_trailing_edge() {
        let mut obstacles = vec![rect(16.0, 0.0, 80.0, 200.0)];
        let flier = flier_at(96.0, 300.0);
        assert_eq!(score_crossing(&flier, &mut obstacles, 0), 0);
        obstacles[0].pos.x = 15.9;
        assert_eq!(score_crossing(&flier, &mut obstacles, 0), 1);
        assert_eq!(score_crossing(&flier, &mut obstacles, 7), 0);
    }

    #[test]
    fn test_other_pairs_untouched() {
        let mut passed_one = rect(0.0, 0.0, 80.0, 200.0);
        passed_one.pair = PairId(1);
        let mut ahead = rect(300.0, 0.0, 80.0, 200.0);
        ahead.pair = PairId(2);
        let mut obstacles = vec![passed_one, ahead];
        let flier = flier_at(96.0, 300.0);
        assert_eq!(score_crossing(&flier, &mut obstacles, 0), 1);
        assert!(!obstacles[1].scored);
    }

    proptest! {
        #[test]
        fn prop_center_inside_always_collides(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..300.0, h in 1.0f32..300.0,
            fx in 0.0f32..1.0, fy in 0.0f32..1.0,
        ) {
            let obstacle = rect(x, y, w, h);
            let flier = flier_at(x + fx * w, y + fy * h);
            prop_assert!(flier_obstacle_collision(&flier, &obstacle));
        }

        #[test]
        fn prop_outside_expanded_bounds_never_collides(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..300.0, h in 1.0f32..300.0,
            offset in 0.01f32..200.0, along in 0.0f32..1.0, side in 0usize..4,
        ) {
            let obstacle = rect(x, y, w, h);
            let r = crate::consts::FLIER_RADIUS;
            let (fx, fy) = match side {
                0 => (x - r - offset, y + along * h),
                1 => (x + w + r + offset, y + along * h),
                2 => (x + along * w, y - r - offset),
                _ => (x + along * w, y + h + r + offset),
            };
            prop_assert!(!flier_obstacle_collision(&flier_at(fx, fy), &obstacle));
        }
    }
}
