//! Tuning parameters.
//!
//! Every section has `#[serde(default)]`, so a JSON file only needs the
//! values it overrides:
//!
//! ```
//! use dollhouse_logic::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "needs": { "critical_threshold": 25.0 } }"#).unwrap();
//! assert_eq!(config.needs.critical_threshold, 25.0);
//! assert_eq!(config.history_limit, 50);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::needs::NeedKind;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub needs: NeedsConfig,
    pub decision: DecisionConfig,
    pub interaction: InteractionConfig,
    pub movement: MovementConfig,
    /// Maximum undo (and redo) depth.
    pub history_limit: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            needs: NeedsConfig::default(),
            decision: DecisionConfig::default(),
            interaction: InteractionConfig::default(),
            movement: MovementConfig::default(),
            history_limit: 50,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        for need in NeedKind::ALL {
            if !non_negative(self.needs.decay.get(need)) {
                problems.push(format!("needs.decay.{} must be >= 0", need));
            }
            if !non_negative(self.needs.recovery.get(need)) {
                problems.push(format!("needs.recovery.{} must be >= 0", need));
            }
        }
        if !(0.0..=100.0).contains(&self.needs.critical_threshold) {
            problems.push("needs.critical_threshold must be within 0..=100".to_string());
        }
        if !(0.0..=1.0).contains(&self.decision.act_chance) {
            problems.push("decision.act_chance must be within 0..=1".to_string());
        }
        for (name, value) in [
            ("world.destroy_delay", self.world.destroy_delay),
            ("world.open_speed", self.world.open_speed),
            ("decision.idle_base", self.decision.idle_base),
            ("decision.idle_jitter", self.decision.idle_jitter),
            ("interaction.sleep_blend", self.interaction.sleep_blend),
            ("interaction.pillow_fight", self.interaction.pillow_fight),
            ("movement.walk_speed", self.movement.walk_speed),
        ] {
            if !non_negative(value) {
                problems.push(format!("{} must be >= 0", name));
            }
        }
        if self.history_limit == 0 {
            problems.push("history_limit must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Grid and placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seconds a scheduled destroy keeps its visual around.
    pub destroy_delay: f32,
    /// Door opening width as a fraction of one wall segment.
    pub door_width: f32,
    /// Window opening width as a fraction of one wall segment.
    pub window_width: f32,
    /// Open-progress change per second.
    pub open_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            destroy_delay: 0.2,
            door_width: 0.8,
            window_width: 0.6,
            open_speed: 2.5,
        }
    }
}

/// One value per need. All six must be given when overridden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedRates {
    pub social: f32,
    pub sleep: f32,
    pub hunger: f32,
    pub bladder: f32,
    pub fun: f32,
    pub hygiene: f32,
}

impl NeedRates {
    pub fn uniform(v: f32) -> Self {
        Self {
            social: v,
            sleep: v,
            hunger: v,
            bladder: v,
            fun: v,
            hygiene: v,
        }
    }

    pub fn get(&self, need: NeedKind) -> f32 {
        match need {
            NeedKind::Social => self.social,
            NeedKind::Sleep => self.sleep,
            NeedKind::Hunger => self.hunger,
            NeedKind::Bladder => self.bladder,
            NeedKind::Fun => self.fun,
            NeedKind::Hygiene => self.hygiene,
        }
    }
}

/// Need decay/recovery tuning. Rates are points per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub decay: NeedRates,
    pub recovery: NeedRates,
    /// A need at or below this value is critical.
    pub critical_threshold: f32,
    /// Squared radius around a lit ceiling light that disturbs sleep.
    pub light_radius_sq: f32,
    /// Sleep recovery multiplier while a lit light is in range.
    pub lit_sleep_factor: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            decay: NeedRates {
                social: 0.16,
                sleep: 0.14,
                hunger: 0.18,
                bladder: 0.22,
                fun: 0.20,
                hygiene: 0.15,
            },
            recovery: NeedRates {
                social: 0.0,
                sleep: 1.0,
                hunger: 2.5,
                bladder: 4.0,
                fun: 1.2,
                hygiene: 2.0,
            },
            critical_threshold: 20.0,
            light_radius_sq: 16.0,
            lit_sleep_factor: 0.5,
        }
    }
}

/// Free-will tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Minimum idle seconds before free will fires.
    pub idle_base: f32,
    /// Extra random idle seconds, drawn from [0, idle_jitter).
    pub idle_jitter: f32,
    /// Probability of acting once a candidate is chosen.
    pub act_chance: f32,
    /// Candidates must score above this.
    pub min_score: f32,
    pub urgency_weight: f32,
    pub preference_weight: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            idle_base: 8.0,
            idle_jitter: 6.0,
            act_chance: 0.75,
            min_score: 0.05,
            urgency_weight: 0.3,
            preference_weight: 0.7,
        }
    }
}

/// Timed interaction-state transitions, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// `sleep_enter` → `sleep` blend.
    pub sleep_blend: f32,
    /// `pillow_fight` → `idle` expiry.
    pub pillow_fight: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            sleep_blend: 1.2,
            pillow_fight: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Cells per second along a path and under direct control.
    pub walk_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { walk_speed: 2.0 }
    }
}
