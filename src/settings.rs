//! Player settings and preferences
//!
//! Persisted in LocalStorage. Only preferences are stored here, never the
//! progress of a run.

use serde::{Deserialize, Serialize};

use crate::sim::targeting::{FireMode, Targeting};
use crate::tuning::{DropPolicy, ExperiencePolicy, LevelUpPolicy, Tuning, TuningError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// How volleys are aimed
    pub targeting: Targeting,
    /// When volleys are fired
    pub fire_mode: FireMode,

    // === Rules ===
    /// What happens to surplus experience on level-up
    pub experience_policy: ExperiencePolicy,
    /// Fixed boost or stat choice on level-up
    pub level_up_policy: LevelUpPolicy,
    /// Boss drop selection
    pub drop_policy: DropPolicy,

    // === Visuals ===
    /// Background grid
    pub show_grid: bool,
    /// Health bars above enemies
    pub enemy_health_bars: bool,

    // === Accessibility ===
    /// Reduced motion (no pulse ring flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            targeting: Targeting::Nearest,
            fire_mode: FireMode::Auto,

            experience_policy: ExperiencePolicy::CarryOver,
            level_up_policy: LevelUpPolicy::FixedBoost,
            drop_policy: DropPolicy::Random,

            show_grid: true,
            enemy_health_bars: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "survival_arena_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy the rule preferences into a session's tuning
    pub fn apply_rules(&self, tuning: &mut Tuning) {
        tuning.level.experience_policy = self.experience_policy;
        tuning.level.level_up_policy = self.level_up_policy;
        tuning.boss.drop_policy = self.drop_policy;
    }

    /// Effective pulse ring (respects reduced_motion)
    pub fn effective_pulse_ring(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage on native ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
