//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be rebalanced from JSON
//! without touching the simulation. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::entity::ItemKind;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What happens to surplus experience on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExperiencePolicy {
    /// Subtract the threshold, keeping the remainder
    #[default]
    CarryOver,
    /// Drop experience back to zero
    Reset,
}

/// How a level-up rewards the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelUpPolicy {
    /// Apply the fixed attack/health boost immediately
    #[default]
    FixedBoost,
    /// Suspend play until the player picks one upgrade per level gained
    Choose,
}

/// Which item a defeated boss leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropPolicy {
    /// Uniform choice among all item kinds
    #[default]
    Random,
    /// Always the same kind
    Fixed(ItemKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub attack_power: f32,
    pub max_health: f32,
    /// Volleys per second
    pub attack_speed: f32,
    /// World units per frame
    pub move_speed: f32,
    pub pickup_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            attack_power: 20.0,
            max_health: 100.0,
            attack_speed: 1.0,
            move_speed: 3.0,
            pickup_radius: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub first_threshold: u32,
    /// Threshold multiplier applied per level (result is floored)
    pub threshold_growth: f32,
    pub attack_bonus: f32,
    pub health_bonus: f32,
    pub attack_speed_bonus: f32,
    pub move_speed_bonus: f32,
    /// Restore health to full on a fixed-boost level-up
    pub restore_health: bool,
    pub experience_policy: ExperiencePolicy,
    pub level_up_policy: LevelUpPolicy,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            first_threshold: 100,
            threshold_growth: 1.5,
            attack_bonus: 5.0,
            health_bonus: 20.0,
            attack_speed_bonus: 0.2,
            move_speed_bonus: 0.5,
            restore_health: true,
            experience_policy: ExperiencePolicy::CarryOver,
            level_up_policy: LevelUpPolicy::FixedBoost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub radius: f32,
    pub base_health: f32,
    pub health_per_level: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    /// Distance from the player at which enemies appear
    pub spawn_distance: f32,
    pub spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    /// Health removed from the player per frame of contact
    pub contact_damage: f32,
    pub kill_experience: u32,
    pub kill_score: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: 12.0,
            base_health: 20.0,
            health_per_level: 5.0,
            base_speed: 1.0,
            speed_per_level: 0.1,
            spawn_distance: 550.0,
            spawn_interval_ms: 2000.0,
            min_spawn_interval_ms: 500.0,
            contact_damage: 0.5,
            kill_experience: 10,
            kill_score: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// A boss appears each time the score advances this far past the last milestone
    pub score_threshold: u32,
    pub radius: f32,
    pub base_health: f32,
    pub health_per_level: f32,
    pub speed: f32,
    pub kill_experience: u32,
    pub kill_score: u32,
    /// Spawn interval reduction per boss kill (ms)
    pub spawn_interval_reduction_ms: f64,
    pub drop_policy: DropPolicy,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            score_threshold: 150,
            radius: 30.0,
            base_health: 200.0,
            health_per_level: 50.0,
            speed: 0.6,
            kill_experience: 50,
            kill_score: 50,
            spawn_interval_reduction_ms: 200.0,
            drop_policy: DropPolicy::Random,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub projectile_speed: f32,
    /// Added to the enemy radius for projectile hit tests
    pub projectile_radius: f32,
    /// Angle between neighbouring projectiles of one volley (radians)
    pub shot_spread: f32,
    pub pulse_cooldown_ms: f64,
    pub pulse_radius: f32,
    pub pulse_damage: f32,
    /// How long the pulse ring stays visible (ms)
    pub pulse_effect_ms: f64,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            projectile_speed: 8.0,
            projectile_radius: 4.0,
            shot_spread: 0.2,
            pulse_cooldown_ms: 5000.0,
            pulse_radius: 150.0,
            pulse_damage: 30.0,
            pulse_effect_ms: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub obstacle_count: usize,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    /// No obstacle may intersect this circle around the spawn point
    pub spawn_exclusion_radius: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            obstacle_count: 30,
            obstacle_min_size: 40.0,
            obstacle_max_size: 160.0,
            spawn_exclusion_radius: 200.0,
        }
    }
}

/// Complete balance table for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub level: LevelTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub weapons: WeaponTuning,
    pub arena: ArenaTuning,
}

fn require(ok: bool, field: &'static str, reason: &str) -> Result<(), TuningError> {
    if ok {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        require(self.player.radius > 0.0, "player.radius", "must be positive")?;
        require(self.player.max_health > 0.0, "player.max_health", "must be positive")?;
        require(self.player.attack_speed > 0.0, "player.attack_speed", "must be positive")?;
        require(self.player.move_speed >= 0.0, "player.move_speed", "must not be negative")?;
        require(self.level.first_threshold > 0, "level.first_threshold", "must be at least 1")?;
        require(
            self.level.threshold_growth >= 1.0,
            "level.threshold_growth",
            "must be at least 1.0",
        )?;
        require(self.enemy.radius > 0.0, "enemy.radius", "must be positive")?;
        require(self.enemy.base_health > 0.0, "enemy.base_health", "must be positive")?;
        require(
            self.enemy.health_per_level >= 0.0,
            "enemy.health_per_level",
            "must not be negative",
        )?;
        require(
            self.enemy.contact_damage >= 0.0,
            "enemy.contact_damage",
            "must not be negative",
        )?;
        require(
            self.enemy.min_spawn_interval_ms > 0.0,
            "enemy.min_spawn_interval_ms",
            "must be positive",
        )?;
        require(
            self.enemy.spawn_interval_ms >= self.enemy.min_spawn_interval_ms,
            "enemy.spawn_interval_ms",
            "must not be below min_spawn_interval_ms",
        )?;
        require(self.boss.score_threshold > 0, "boss.score_threshold", "must be at least 1")?;
        require(self.boss.radius > 0.0, "boss.radius", "must be positive")?;
        require(self.boss.base_health > 0.0, "boss.base_health", "must be positive")?;
        require(
            self.boss.health_per_level >= 0.0,
            "boss.health_per_level",
            "must not be negative",
        )?;
        require(
            self.weapons.pulse_damage >= 0.0,
            "weapons.pulse_damage",
            "must not be negative",
        )?;
        require(
            self.weapons.projectile_speed > 0.0,
            "weapons.projectile_speed",
            "must be positive",
        )?;
        require(
            self.arena.obstacle_min_size > 0.0
                && self.arena.obstacle_min_size <= self.arena.obstacle_max_size,
            "arena.obstacle_min_size",
            "must be positive and not exceed obstacle_max_size",
        )?;
        Ok(())
    }

    /// LocalStorage key for a tuning override
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "survival_arena_tuning";

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "boss": { "score_threshold": 500 } }"#).unwrap();
        assert_eq!(tuning.boss.score_threshold, 500);
        assert_eq!(tuning.boss.radius, BossTuning::default().radius);
        assert_eq!(tuning.player, PlayerTuning::default());
    }

    #[test]
    fn test_policies_from_json() {
        let tuning = Tuning::from_json(
            r#"{
                "level": { "experience_policy": "Reset", "level_up_policy": "Choose" },
                "boss": { "drop_policy": { "Fixed": "Laser" } }
            }"#,
        )
        .unwrap();
        assert_eq!(tuning.level.experience_policy, ExperiencePolicy::Reset);
        assert_eq!(tuning.level.level_up_policy, LevelUpPolicy::Choose);
        assert_eq!(tuning.boss.drop_policy, DropPolicy::Fixed(ItemKind::Laser));
    }

    #[test]
    fn test_rejects_zero_attack_speed() {
        let err = Tuning::from_json(r#"{ "player": { "attack_speed": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "player.attack_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_contact_damage() {
        let err = Tuning::from_json(r#"{ "enemy": { "contact_damage": -5.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemy.contact_damage",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_damage_and_growth() {
        let mut tuning = Tuning::default();
        tuning.weapons.pulse_damage = -1.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.enemy.health_per_level = -10.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.boss.health_per_level = -10.0;
        assert!(tuning.validate().is_err());

        // Zero is allowed: harmless enemies, flat health curve
        let mut tuning = Tuning::default();
        tuning.enemy.contact_damage = 0.0;
        tuning.enemy.health_per_level = 0.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_shrinking_thresholds() {
        let mut tuning = Tuning::default();
        tuning.level.threshold_growth = 0.5;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
