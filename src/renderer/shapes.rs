//! Shape generation for 2D primitives
//!
//! Produces the display list for a frame in back-to-front order. Coordinates
//! are world units, colors are RGBA in 0..1.

use glam::Vec2;
use serde::Serialize;

use super::FrameSnapshot;
use crate::settings::Theme;
use crate::sim::{Flier, Obstacle, Particle, Viewport};

/// Inset of the lighter inner panel drawn on each obstacle
const PIPE_INSET: f32 = 10.0;
/// Obstacle outline width
const PIPE_BORDER: f32 = 3.0;

/// A drawable primitive. Serializes as `{"kind": "circle", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Vertical gradient over the whole viewport; stops are (offset 0..1, color)
    Gradient { stops: Vec<(f32, [f32; 4])> },
    Rect {
        min: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    /// Rectangle outline
    Frame {
        min: Vec2,
        size: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: [f32; 4],
    },
    Triangle {
        points: [Vec2; 3],
        color: [f32; 4],
    },
}

/// Convert 0xRRGGBB to RGBA
fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// Sky gradient stops for a theme
pub fn sky_gradient(theme: Theme) -> Vec<(f32, [f32; 4])> {
    match theme {
        Theme::Day => vec![
            (0.0, hex(0x87CEEB, 1.0)),
            (0.5, hex(0x98D8E8, 1.0)),
            (1.0, hex(0xB0E0E6, 1.0)),
        ],
        Theme::Night => vec![(0.0, hex(0x2C3E50, 1.0)), (1.0, hex(0x34495E, 1.0))],
        Theme::Sunset => vec![
            (0.0, hex(0xFF6B6B, 1.0)),
            (0.5, hex(0xFF8E53, 1.0)),
            (1.0, hex(0xFF6B9D, 1.0)),
        ],
    }
}

/// Three static clouds, each three overlapping circles
pub fn clouds(viewport: Viewport) -> Vec<Shape> {
    let color = hex(0xFFFFFF, 0.3);
    let anchors = [(0.1, 0.2, 60.0), (0.6, 0.15, 80.0), (0.8, 0.3, 50.0)];

    anchors
        .iter()
        .flat_map(|&(fx, fy, size)| {
            let base = Vec2::new(viewport.width * fx, viewport.height * fy);
            [(0.0, 1.0), (0.5, 0.8), (1.0, 0.6)].map(|(dx, scale)| Shape::Circle {
                center: base + Vec2::new(size * dx, 0.0),
                radius: size * scale,
                color,
            })
        })
        .collect()
}

/// Body, outline and inner panel of one obstacle.
///
/// The inner panel height is clamped at zero for obstacles shorter than
/// twice the inset; that clamp is purely cosmetic.
pub fn obstacle(obstacle: &Obstacle) -> [Shape; 3] {
    let min = obstacle.pos;
    let size = Vec2::new(obstacle.width, obstacle.height);
    let inner_size = Vec2::new(
        (obstacle.width - 2.0 * PIPE_INSET).max(0.0),
        (obstacle.height - 2.0 * PIPE_INSET).max(0.0),
    );

    [
        Shape::Rect {
            min,
            size,
            color: hex(0x228B22, 1.0),
        },
        Shape::Frame {
            min,
            size,
            width: PIPE_BORDER,
            color: hex(0x006400, 1.0),
        },
        Shape::Rect {
            min: min + Vec2::splat(PIPE_INSET),
            size: inner_size,
            color: hex(0x32CD32, 1.0),
        },
    ]
}

/// The flier: body, wing, eye, pupil and beak, tilted by its rotation
pub fn flier(flier: &Flier) -> [Shape; 5] {
    let tilt = Vec2::from_angle(flier.rotation);
    let at = |local: Vec2| flier.pos + tilt.rotate(local);

    [
        Shape::Circle {
            center: flier.pos,
            radius: flier.radius,
            color: hex(0xFFD700, 1.0),
        },
        Shape::Ellipse {
            center: at(Vec2::new(-5.0, 0.0)),
            radii: Vec2::new(15.0, 8.0),
            rotation: flier.rotation,
            color: hex(0xFFA500, 1.0),
        },
        Shape::Circle {
            center: at(Vec2::new(5.0, -5.0)),
            radius: 6.0,
            color: hex(0xFFFFFF, 1.0),
        },
        Shape::Circle {
            center: at(Vec2::new(7.0, -5.0)),
            radius: 3.0,
            color: hex(0x000000, 1.0),
        },
        Shape::Triangle {
            points: [
                at(Vec2::new(15.0, 0.0)),
                at(Vec2::new(25.0, -3.0)),
                at(Vec2::new(25.0, 3.0)),
            ],
            color: hex(0xFF6B35, 1.0),
        },
    ]
}

/// A particle fades out with its remaining life
pub fn particle(particle: &Particle) -> Shape {
    Shape::Circle {
        center: particle.pos,
        radius: particle.size,
        color: hex(0xFFD700, particle.life.clamp(0.0, 1.0)),
    }
}

/// Full display list for a frame: sky, clouds, obstacles, flier, particles
pub fn display_list(frame: &FrameSnapshot<'_>) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(
        10 + frame.obstacles.len() * 3 + frame.particles.len() + 5,
    );
    shapes.push(Shape::Gradient {
        stops: sky_gradient(frame.theme),
    });
    shapes.extend(clouds(frame.viewport));
    for o in frame.obstacles {
        shapes.extend(obstacle(o));
    }
    if let Some(f) = frame.flier {
        shapes.extend(flier(f));
    }
    shapes.extend(frame.particles.iter().map(particle));
    shapes
}
