//! Circle-vs-rectangle movement resolution
//!
//! Movement is resolved one axis at a time so that a body pushing diagonally
//! into a wall keeps sliding along it.

use glam::Vec2;

use super::arena::{Obstacle, clamp_to_world};

/// True if moving a circle from `from` to `to` would enter an obstacle it is
/// not already overlapping.
///
/// Bodies that start inside an obstacle (spawned there) may move freely until
/// they are out of it.
pub fn enters_obstacle(from: Vec2, to: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| o.overlaps_circle(to, radius) && !o.overlaps_circle(from, radius))
}

/// Move a circle by `delta`, resolving X then Y against every obstacle and
/// keeping it inside the world. Updates `pos` in place; a blocked axis
/// leaves that coordinate unchanged.
pub fn move_circle(pos: &mut Vec2, delta: Vec2, radius: f32, obstacles: &[Obstacle]) {
    if delta.x != 0.0 {
        let target = clamp_to_world(Vec2::new(pos.x + delta.x, pos.y), radius);
        if !enters_obstacle(*pos, target, radius, obstacles) {
            pos.x = target.x;
        }
    }

    if delta.y != 0.0 {
        let target = clamp_to_world(Vec2::new(pos.x, pos.y + delta.y), radius);
        if !enters_obstacle(*pos, target, radius, obstacles) {
            pos.y = target.y;
        }
    }
}
