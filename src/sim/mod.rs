//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per animation frame, timers read the session clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod entity;
pub mod state;
pub mod targeting;
pub mod tick;

pub use arena::{Camera, Obstacle, clamp_to_world, generate_layout, in_world};
pub use collision::move_circle;
pub use entity::{DropItem, Enemy, ItemKind, Player, Projectile, Stats, Upgrade};
pub use state::{Session, SessionPhase};
pub use targeting::{FireMode, Targeting, nearest_enemy};
pub use tick::{MoveIntent, TickInput, tick};
