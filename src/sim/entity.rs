//! Entity records
//!
//! Plain data for everything that lives in a session. Behaviour that only
//! touches one entity (damage, experience, upgrades) sits next to its data;
//! anything involving two entities belongs to the step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bar_ratio;
use crate::tuning::{BossTuning, EnemyTuning, ExperiencePolicy, LevelTuning, PlayerTuning};

/// Player combat and movement stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub attack_power: f32,
    pub current_health: f32,
    pub max_health: f32,
    /// Volleys per second
    pub attack_speed: f32,
    /// World units per frame
    pub move_speed: f32,
}

/// Level-up stat choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    Attack,
    MaxHealth,
    AttackSpeed,
    MoveSpeed,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::Attack,
        Upgrade::MaxHealth,
        Upgrade::AttackSpeed,
        Upgrade::MoveSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Upgrade::Attack => "attack",
            Upgrade::MaxHealth => "max_health",
            Upgrade::AttackSpeed => "attack_speed",
            Upgrade::MoveSpeed => "move_speed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == s)
    }

    /// Apply this upgrade to `stats`
    pub fn apply(&self, stats: &mut Stats, tuning: &LevelTuning) {
        match self {
            Upgrade::Attack => stats.attack_power += tuning.attack_bonus,
            Upgrade::MaxHealth => {
                stats.max_health += tuning.health_bonus;
                stats.current_health =
                    (stats.current_health + tuning.health_bonus).min(stats.max_health);
            }
            Upgrade::AttackSpeed => stats.attack_speed += tuning.attack_speed_bonus,
            Upgrade::MoveSpeed => stats.move_speed += tuning.move_speed_bonus,
        }
    }
}

/// Boss drop types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// One more projectile per volley
    Shotgun,
    /// Projectiles pass through enemies
    Laser,
    /// Periodic damage ring around the player
    Pulse,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Shotgun, ItemKind::Laser, ItemKind::Pulse];
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub stats: Stats,
    pub experience: u32,
    pub level: u32,
    pub experience_to_next_level: u32,
    /// Parallel projectiles per volley
    pub shot_count: u32,
    pub has_laser: bool,
    pub has_pulse: bool,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning, level: &LevelTuning) -> Self {
        Self {
            pos,
            radius: tuning.radius,
            stats: Stats {
                attack_power: tuning.attack_power,
                current_health: tuning.max_health,
                max_health: tuning.max_health,
                attack_speed: tuning.attack_speed,
                move_speed: tuning.move_speed,
            },
            experience: 0,
            level: 1,
            experience_to_next_level: level.first_threshold.max(1),
            shot_count: 1,
            has_laser: false,
            has_pulse: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.stats.current_health <= 0.0
    }

    /// Remove health, never going below zero. Returns true if this killed the player.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.stats.current_health = (self.stats.current_health - amount).max(0.0);
        self.is_dead()
    }

    /// Milliseconds between volleys
    pub fn attack_interval_ms(&self) -> f64 {
        1000.0 / self.stats.attack_speed.max(f32::EPSILON) as f64
    }

    pub fn health_ratio(&self) -> f32 {
        bar_ratio(self.stats.current_health, self.stats.max_health)
    }

    pub fn experience_ratio(&self) -> f32 {
        bar_ratio(self.experience as f32, self.experience_to_next_level as f32)
    }

    /// Add experience and process every level it pays for.
    ///
    /// Returns the number of levels gained. Each threshold is the previous one
    /// times `threshold_growth`, floored.
    pub fn gain_experience(&mut self, amount: u32, tuning: &LevelTuning) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level {
            match tuning.experience_policy {
                ExperiencePolicy::CarryOver => self.experience -= self.experience_to_next_level,
                ExperiencePolicy::Reset => self.experience = 0,
            }
            self.level += 1;
            self.experience_to_next_level =
                next_threshold(self.experience_to_next_level, tuning.threshold_growth);
            gained += 1;
        }
        gained
    }

    /// Fixed per-level reward
    pub fn apply_level_boost(&mut self, tuning: &LevelTuning) {
        self.stats.attack_power += tuning.attack_bonus;
        self.stats.max_health += tuning.health_bonus;
        if tuning.restore_health {
            self.stats.current_health = self.stats.max_health;
        }
    }

    /// Permanently apply a picked-up item
    pub fn apply_item(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Shotgun => self.shot_count += 1,
            ItemKind::Laser => self.has_laser = true,
            ItemKind::Pulse => self.has_pulse = true,
        }
    }
}

/// Experience needed for the level after one requiring `current`
pub fn next_threshold(current: u32, growth: f32) -> u32 {
    ((current as f32 * growth).floor() as u32).max(current).max(1)
}

/// A hostile unit chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// World units per frame
    pub speed: f32,
    pub boss: bool,
}

impl Enemy {
    /// Normal enemy scaled to the player's level
    pub fn normal(id: u32, pos: Vec2, player_level: u32, tuning: &EnemyTuning) -> Self {
        let level = player_level as f32;
        let health = tuning.base_health + tuning.health_per_level * level;
        Self {
            id,
            pos,
            radius: tuning.radius,
            health,
            max_health: health,
            speed: tuning.base_speed + tuning.speed_per_level * level,
            boss: false,
        }
    }

    /// Boss enemy: bigger, tougher, slower
    pub fn boss(id: u32, pos: Vec2, player_level: u32, tuning: &BossTuning) -> Self {
        let health = tuning.base_health + tuning.health_per_level * player_level as f32;
        Self {
            id,
            pos,
            radius: tuning.radius,
            health,
            max_health: health,
            speed: tuning.speed,
            boss: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn health_ratio(&self) -> f32 {
        bar_ratio(self.health, self.max_health)
    }
}

/// A shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// Laser shots pass through enemies
    pub laser: bool,
    /// Enemy ids this projectile has already damaged
    pub hits: Vec<u32>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, dir: Vec2, speed: f32, damage: f32, laser: bool) -> Self {
        Self {
            id,
            pos,
            dir: dir.normalize_or_zero(),
            speed,
            damage,
            laser,
            hits: Vec::new(),
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.dir * self.speed;
    }

    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hits.contains(&enemy_id)
    }
}

/// An upgrade lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropItem {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ItemKind,
}
