//! Personality: traits, per-need bias, per-action preference and the
//! refusal model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interaction::ActionId;
use crate::needs::{Mood, NeedKind, NEED_MAX};

pub const PREFERENCE_MIN: f32 = -2.0;
pub const PREFERENCE_MAX: f32 = 2.0;
pub const TENDENCY_MIN: f32 = -5.0;
pub const TENDENCY_MAX: f32 = 5.0;

const TRAIT_POOL: &[&str] = &[
    "lazy",
    "neat",
    "sloppy",
    "playful",
    "bookworm",
    "glutton",
    "night owl",
    "grumpy",
    "cheerful",
    "music lover",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub traits: Vec<String>,
    /// Urgency multiplier per need. Missing entries count as 1.0.
    need_bias: BTreeMap<NeedKind, f32>,
    /// Liking per action in [-2, 2]. Missing entries count as 0.
    preferences: BTreeMap<ActionId, f32>,
    refusal_tendency: f32,
    /// Stored and exposed, not read by any decision logic.
    mood_sensitivity: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            traits: Vec::new(),
            need_bias: NeedKind::ALL.into_iter().map(|n| (n, 1.0)).collect(),
            preferences: BTreeMap::new(),
            refusal_tendency: 0.0,
            mood_sensitivity: 1.0,
        }
    }
}

impl Personality {
    /// Random traits, biases and preferences.
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        let mut traits: Vec<String> = Vec::new();
        while traits.len() < 2 {
            let pick = TRAIT_POOL[rng.gen_range(0..TRAIT_POOL.len())];
            if !traits.iter().any(|t| t == pick) {
                traits.push(pick.to_string());
            }
        }
        Self {
            traits,
            need_bias: NeedKind::ALL
                .into_iter()
                .map(|n| (n, rng.gen_range(0.7..=1.3)))
                .collect(),
            preferences: ActionId::ALL
                .into_iter()
                .map(|a| (a, rng.gen_range(-1.5..=1.5)))
                .collect(),
            refusal_tendency: rng.gen_range(-1.0..=1.0),
            mood_sensitivity: rng.gen_range(0.5..=1.5),
        }
    }

    pub fn need_bias(&self, need: NeedKind) -> f32 {
        self.need_bias.get(&need).copied().unwrap_or(1.0)
    }

    pub fn need_bias_map(&self) -> &BTreeMap<NeedKind, f32> {
        &self.need_bias
    }

    /// Non-finite or negative bias is discarded.
    pub fn set_need_bias(&mut self, need: NeedKind, bias: f32) -> bool {
        if !bias.is_finite() || bias < 0.0 {
            return false;
        }
        self.need_bias.insert(need, bias);
        true
    }

    pub fn preference(&self, action: ActionId) -> f32 {
        self.preferences.get(&action).copied().unwrap_or(0.0)
    }

    pub fn preferences(&self) -> &BTreeMap<ActionId, f32> {
        &self.preferences
    }

    /// Clamped to [-2, 2]; non-finite input is discarded.
    pub fn set_preference(&mut self, action: ActionId, score: f32) -> bool {
        if !score.is_finite() {
            return false;
        }
        self.preferences
            .insert(action, score.clamp(PREFERENCE_MIN, PREFERENCE_MAX));
        true
    }

    pub fn refusal_tendency(&self) -> f32 {
        self.refusal_tendency
    }

    /// Clamped to [-5, 5]; non-finite input is discarded.
    pub fn set_refusal_tendency(&mut self, tendency: f32) -> bool {
        if !tendency.is_finite() {
            return false;
        }
        self.refusal_tendency = tendency.clamp(TENDENCY_MIN, TENDENCY_MAX);
        true
    }

    pub fn mood_sensitivity(&self) -> f32 {
        self.mood_sensitivity
    }

    pub fn set_mood_sensitivity(&mut self, sensitivity: f32) -> bool {
        if !sensitivity.is_finite() {
            return false;
        }
        self.mood_sensitivity = sensitivity;
        true
    }

    /// `(100 - value) * bias`.
    pub fn urgency(&self, need: NeedKind, value: f32) -> f32 {
        (NEED_MAX - value) * self.need_bias(need)
    }

    /// Refusal chance for `action` starting from a mood-derived base.
    pub fn refuse_chance(&self, base: f32, action: ActionId) -> f32 {
        adjusted_refuse_chance(base, self.preference(action), self.refusal_tendency)
    }
}

/// Base refusal chance for a mood.
pub fn mood_refuse_base(mood: Mood) -> f32 {
    match mood {
        Mood::BreakingDown => 1.0,
        Mood::Uncomfortable => 0.4,
        _ => 0.0,
    }
}

/// Adjust a base refusal chance by preference and tendency. Always in [0, 1].
///
/// Liked actions scale the chance down by up to 60%; disliked ones push it
/// toward 1 by up to 60% of the remaining headroom. Tendency then adds
/// `tendency * 0.15`.
pub fn adjusted_refuse_chance(base: f32, preference: f32, tendency: f32) -> f32 {
    let mut chance = if base.is_finite() { base.clamp(0.0, 1.0) } else { 0.0 };
    let pref = if preference.is_finite() { preference } else { 0.0 };
    if pref > 0.0 {
        chance *= 1.0 - (pref * 0.3).min(0.6);
    } else if pref < 0.0 {
        chance = 1.0 - (1.0 - chance) * (1.0 - (pref.abs() * 0.15).min(0.6));
    }
    if tendency.is_finite() {
        chance += tendency * 0.15;
    }
    chance.clamp(0.0, 1.0)
}
