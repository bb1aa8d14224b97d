//! Survival Arena - a top-down arena survival mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, arena, per-frame step)
//! - `renderer`: Frame building and the WebGPU pipeline that draws it
//! - `controller`: Session lifecycle, input snapshot and frame clock
//! - `input`: Physical key-code mapping
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod controller;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use controller::Controller;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World extent (square arena)
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;

    /// Logical drawing surface; the canvas is scaled to its container
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Largest frame delta fed to the session clock (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
    /// Nominal frame length used by headless runs (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Background grid spacing in world units
    pub const GRID_SPACING: f32 = 40.0;
}

/// World-space center of the arena (player spawn point)
#[inline]
pub fn world_center() -> Vec2 {
    Vec2::new(consts::WORLD_WIDTH / 2.0, consts::WORLD_HEIGHT / 2.0)
}

/// Logical viewport size as a vector
#[inline]
pub fn viewport_size() -> Vec2 {
    Vec2::new(consts::VIEWPORT_WIDTH, consts::VIEWPORT_HEIGHT)
}

/// Angle (radians) of the vector from `from` to `to`, or `None` if they coincide
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> Option<f32> {
    let d = to - from;
    if d.length_squared() < f32::EPSILON {
        None
    } else {
        Some(d.y.atan2(d.x))
    }
}

/// Ratio for bar rendering; the denominator is clamped to at least 1
#[inline]
pub fn bar_ratio(value: f32, max: f32) -> f32 {
    (value / max.max(1.0)).clamp(0.0, 1.0)
}
