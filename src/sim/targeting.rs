//! Shot direction strategies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Enemy;
use crate::angle_between;

/// Where volleys are aimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Targeting {
    /// Auto-aim at the nearest live enemy
    #[default]
    Nearest,
    /// Aim toward the pointer
    Pointer,
}

/// When volleys are fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    /// Fire whenever the attack cooldown has elapsed
    #[default]
    Auto,
    /// Fire on pointer press, still limited by the attack cooldown
    Click,
}

impl Targeting {
    /// Angle (radians) of the next volley's center line, or `None` when there
    /// is nothing to shoot at.
    pub fn shot_angle(&self, origin: Vec2, enemies: &[Enemy], aim: Option<Vec2>) -> Option<f32> {
        match self {
            Targeting::Nearest => nearest_enemy(origin, enemies)
                .and_then(|enemy| angle_between(origin, enemy.pos)),
            Targeting::Pointer => aim.and_then(|point| angle_between(origin, point)),
        }
    }
}

/// Closest live enemy; ties go to the lowest id
pub fn nearest_enemy(origin: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| {
            origin
                .distance_squared(a.pos)
                .total_cmp(&origin.distance_squared(b.pos))
                .then(a.id.cmp(&b.id))
        })
}

/// Angles for a volley of `count` shots fanned evenly around `center`
pub fn volley_angles(center: f32, count: u32, spread: f32) -> impl Iterator<Item = f32> {
    let mid = (count.max(1) - 1) as f32 / 2.0;
    (0..count.max(1)).map(move |i| center + (i as f32 - mid) * spread)
}
