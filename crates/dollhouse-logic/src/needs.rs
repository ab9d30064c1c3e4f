//! Needs, mood and per-tick decay/recovery.
//!
//! Six needs, each in [0, 100] where 100 is fully satisfied. Every tick all
//! needs decay, then the need matching the current interaction-state
//! recovers. Mood is derived from the lowest need.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::NeedsConfig;
use crate::furniture::FurnitureType;

pub const NEED_MIN: f32 = 0.0;
pub const NEED_MAX: f32 = 100.0;

/// The six needs, in their fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Social,
    Sleep,
    Hunger,
    Bladder,
    Fun,
    Hygiene,
}

impl NeedKind {
    pub const ALL: [NeedKind; 6] = [
        NeedKind::Social,
        NeedKind::Sleep,
        NeedKind::Hunger,
        NeedKind::Bladder,
        NeedKind::Fun,
        NeedKind::Hygiene,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NeedKind::Social => "social",
            NeedKind::Sleep => "sleep",
            NeedKind::Hunger => "hunger",
            NeedKind::Bladder => "bladder",
            NeedKind::Fun => "fun",
            NeedKind::Hygiene => "hygiene",
        }
    }

    /// Furniture types that can satisfy this need, in preference order.
    /// Social has none.
    pub fn furniture_types(self) -> &'static [FurnitureType] {
        match self {
            NeedKind::Social => &[],
            NeedKind::Sleep => &[FurnitureType::Bed],
            NeedKind::Hunger => &[FurnitureType::Food, FurnitureType::Fridge],
            NeedKind::Bladder => &[FurnitureType::Toilet],
            NeedKind::Fun => &[
                FurnitureType::Tv,
                FurnitureType::Guitar,
                FurnitureType::ComputerDesk,
                FurnitureType::Sofa,
            ],
            NeedKind::Hygiene => &[
                FurnitureType::Shower,
                FurnitureType::Bathtub,
                FurnitureType::Sink,
            ],
        }
    }
}

impl std::fmt::Display for NeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeedKind::ALL
            .into_iter()
            .find(|need| need.as_str() == s)
            .ok_or_else(|| format!("unknown need '{}'", s))
    }
}

/// Need values, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub social: f32,
    pub sleep: f32,
    pub hunger: f32,
    pub bladder: f32,
    pub fun: f32,
    pub hygiene: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            social: NEED_MAX,
            sleep: NEED_MAX,
            hunger: NEED_MAX,
            bladder: NEED_MAX,
            fun: NEED_MAX,
            hygiene: NEED_MAX,
        }
    }
}

impl Needs {
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

    fn slot(&mut self, need: NeedKind) -> &mut f32 {
        match need {
            NeedKind::Social => &mut self.social,
            NeedKind::Sleep => &mut self.sleep,
            NeedKind::Hunger => &mut self.hunger,
            NeedKind::Bladder => &mut self.bladder,
            NeedKind::Fun => &mut self.fun,
            NeedKind::Hygiene => &mut self.hygiene,
        }
    }

    /// Set a need, clamped. Non-finite input is discarded; returns false.
    pub fn set(&mut self, need: NeedKind, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        *self.slot(need) = value.clamp(NEED_MIN, NEED_MAX);
        true
    }

    /// Add to a need, clamped. Non-finite input is discarded; returns false.
    pub fn add(&mut self, need: NeedKind, delta: f32) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let slot = self.slot(need);
        *slot = (*slot + delta).clamp(NEED_MIN, NEED_MAX);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (NeedKind, f32)> + '_ {
        NeedKind::ALL.into_iter().map(move |need| (need, self.get(need)))
    }

    /// Lowest need value.
    pub fn min_value(&self) -> f32 {
        self.iter().map(|(_, v)| v).fold(NEED_MAX, f32::min)
    }

    /// Decay every need by `rate * dt`.
    pub fn decay(&mut self, rates: &crate::config::NeedRates, dt: f32) {
        for need in NeedKind::ALL {
            self.add(need, -rates.get(need) * dt);
        }
    }
}

/// Mood label derived from the lowest need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryHappy,
    Happy,
    Neutral,
    Uncomfortable,
    BreakingDown,
}

impl Mood {
    pub fn from_min_need(min: f32) -> Self {
        if min >= 80.0 {
            Mood::VeryHappy
        } else if min >= 60.0 {
            Mood::Happy
        } else if min >= 40.0 {
            Mood::Neutral
        } else if min >= 20.0 {
            Mood::Uncomfortable
        } else {
            Mood::BreakingDown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::VeryHappy => "very happy",
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Uncomfortable => "uncomfortable",
            Mood::BreakingDown => "breaking down",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-character needs state: values, the ticking switch and the mood
/// override. Mood is recomputed from the values on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsEngine {
    pub needs: Needs,
    /// Needs only change while ticking is enabled.
    pub ticking: bool,
    mood_override: Option<Mood>,
}

impl Default for NeedsEngine {
    fn default() -> Self {
        Self {
            needs: Needs::default(),
            ticking: true,
            mood_override: None,
        }
    }
}

impl NeedsEngine {
    /// Advance one tick.
    ///
    /// All needs decay first; then `recovering` (the need matching the
    /// current interaction-state) recovers at its rate. Sleep recovery is
    /// scaled by `lit_sleep_factor` when `lit_nearby`.
    pub fn tick(
        &mut self,
        dt: f32,
        config: &NeedsConfig,
        recovering: Option<NeedKind>,
        lit_nearby: bool,
    ) {
        if self.ticking && dt > 0.0 {
            self.needs.decay(&config.decay, dt);
            if let Some(need) = recovering {
                let mut rate = config.recovery.get(need);
                if need == NeedKind::Sleep && lit_nearby {
                    rate *= config.lit_sleep_factor;
                }
                self.needs.add(need, rate * dt);
            }
        }
    }

    /// Mood shown to the user and used for refusal: the override if set.
    pub fn mood(&self) -> Mood {
        self.mood_override.unwrap_or_else(|| self.computed_mood())
    }

    /// Mood computed from needs, ignoring any override.
    pub fn computed_mood(&self) -> Mood {
        Mood::from_min_need(self.needs.min_value())
    }

    pub fn mood_override(&self) -> Option<Mood> {
        self.mood_override
    }

    pub fn set_mood_override(&mut self, mood: Mood) {
        self.mood_override = Some(mood);
    }

    pub fn clear_mood_override(&mut self) {
        self.mood_override = None;
    }

    pub fn get(&self, need: NeedKind) -> f32 {
        self.needs.get(need)
    }

    pub fn set_need_value(&mut self, need: NeedKind, value: f32) -> bool {
        self.needs.set(need, value)
    }

    pub fn add_need_value(&mut self, need: NeedKind, delta: f32) -> bool {
        self.needs.add(need, delta)
    }

    /// Replace all values. Non-finite entries are skipped, the rest clamped.
    pub fn set_snapshot(&mut self, snapshot: Needs) {
        for need in NeedKind::ALL {
            self.needs.set(need, snapshot.get(need));
        }
    }

    pub fn snapshot(&self) -> Needs {
        self.needs
    }
}
