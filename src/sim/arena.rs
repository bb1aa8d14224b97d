//! Arena geometry: world bounds, obstacle layout and the follow camera

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::tuning::ArenaTuning;

/// Placement attempts per requested obstacle before giving up
const LAYOUT_ATTEMPTS_PER_OBSTACLE: usize = 20;

/// A static axis-aligned wall block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Point containment (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    /// True if a circle strictly overlaps the rectangle (touching is not overlap)
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) < radius * radius
    }
}

/// True if `p` lies inside the world rectangle
pub fn in_world(p: Vec2) -> bool {
    p.x >= 0.0 && p.x <= WORLD_WIDTH && p.y >= 0.0 && p.y <= WORLD_HEIGHT
}

/// Clamp a circle's center so the whole circle stays inside the world
pub fn clamp_to_world(p: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        p.x.clamp(radius, WORLD_WIDTH - radius),
        p.y.clamp(radius, WORLD_HEIGHT - radius),
    )
}

/// Scatter obstacles uniformly across the world.
///
/// Obstacles may overlap one another; only the circle of
/// `spawn_exclusion_radius` around `spawn` is kept clear. A layout that walls
/// the spawn in completely is possible and accepted.
pub fn generate_layout(rng: &mut impl Rng, spawn: Vec2, tuning: &ArenaTuning) -> Vec<Obstacle> {
    let mut obstacles = Vec::with_capacity(tuning.obstacle_count);
    let max_attempts = tuning.obstacle_count * LAYOUT_ATTEMPTS_PER_OBSTACLE;
    let mut attempts = 0;

    while obstacles.len() < tuning.obstacle_count && attempts < max_attempts {
        attempts += 1;

        let width = rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_max_size);
        let height = rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_max_size);
        let x = rng.random_range(0.0..=(WORLD_WIDTH - width).max(0.0));
        let y = rng.random_range(0.0..=(WORLD_HEIGHT - height).max(0.0));
        let obstacle = Obstacle::new(x, y, width, height);

        if obstacle.overlaps_circle(spawn, tuning.spawn_exclusion_radius) {
            continue;
        }
        obstacles.push(obstacle);
    }

    if obstacles.len() < tuning.obstacle_count {
        log::warn!(
            "Placed {} of {} obstacles after {} attempts",
            obstacles.len(),
            tuning.obstacle_count,
            attempts
        );
    }

    obstacles
}

/// Camera that keeps a world point centered in the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World point shown at the viewport center
    pub center: Vec2,
    /// Viewport size in screen units
    pub viewport: Vec2,
}

impl Camera {
    pub fn follow(target: Vec2, viewport: Vec2) -> Self {
        Self {
            center: target,
            viewport,
        }
    }

    /// Translation applied to world coordinates
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.viewport / 2.0 - self.center
    }

    #[inline]
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p + self.offset()
    }

    #[inline]
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p - self.offset()
    }

    /// World-space rectangle currently visible (min, max)
    pub fn visible_world(&self) -> (Vec2, Vec2) {
        let half = self.viewport / 2.0;
        (self.center - half, self.center + half)
    }

    /// True if a circle at world `p` with `radius` intersects the view
    pub fn is_visible(&self, p: Vec2, radius: f32) -> bool {
        let (min, max) = self.visible_world();
        p.x + radius >= min.x && p.x - radius <= max.x && p.y + radius >= min.y && p.y - radius <= max.y
    }
}
