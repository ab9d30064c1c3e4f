//! Autonomous behavior selection.
//!
//! Two triggers, checked in order each tick:
//! 1. critical need: the most urgent need is at or below the critical
//!    threshold, so walk to the nearest furniture that satisfies it
//! 2. free will: after a randomized idle period, pick a non-critical need by
//!    urgency and preference and maybe act on it
//!
//! Both produce an [`InteractionPlan`]: a target furniture, an action and a
//! path to an approach cell next to it.

use rand::Rng;

use crate::agent::Character;
use crate::config::{DecisionConfig, SimConfig};
use crate::error::InteractError;
use crate::grid::{Cell, EntityId, GridWorld};
use crate::interaction::{action_for_need, offers, ActionId};
use crate::needs::{Mood, NeedKind, Needs, NEED_MAX};
use crate::pathfinding::find_path;
use crate::personality::{mood_refuse_base, Personality, PREFERENCE_MAX, PREFERENCE_MIN};

/// A path to a furniture plus the action to start on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionPlan {
    pub furniture: EntityId,
    pub action: ActionId,
    /// Where the character stands to interact.
    pub approach: Cell,
    /// From the current cell to `approach`, both inclusive.
    pub path: Vec<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    CriticalNeed(NeedKind),
    FreeWill(NeedKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub reason: DecisionReason,
    pub plan: InteractionPlan,
}

/// Idle bookkeeping for free will.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionState {
    pub idle_timer: f32,
    pub idle_threshold: f32,
}

impl DecisionState {
    pub fn new(config: &DecisionConfig, rng: &mut impl Rng) -> Self {
        Self {
            idle_timer: 0.0,
            idle_threshold: roll_idle_threshold(config, rng),
        }
    }

    fn restart(&mut self, config: &DecisionConfig, rng: &mut impl Rng) {
        self.idle_timer = 0.0;
        self.idle_threshold = roll_idle_threshold(config, rng);
    }
}

fn roll_idle_threshold(config: &DecisionConfig, rng: &mut impl Rng) -> f32 {
    config.idle_base + rng.gen::<f32>() * config.idle_jitter
}

/// Plan a walk to `furniture` for `action`.
///
/// Tries the four cardinal neighbors of the furniture's cell and keeps the
/// one with the shortest path (ties in +x, -x, +z, -z order). Falls back to
/// the furniture's own cell, which only works for passable types.
///
/// Neighbors are not checked for a wall between them and the furniture, so
/// the approach cell may sit on the far side of a wall from it.
pub fn plan_interaction(
    world: &GridWorld,
    from: Cell,
    furniture: EntityId,
    action: ActionId,
) -> Result<InteractionPlan, InteractError> {
    let target = world
        .furniture(furniture)
        .ok_or(InteractError::UnknownFurniture)?;
    if !offers(target.kind, action) {
        return Err(InteractError::UnsupportedAction { action });
    }

    let mut best: Option<(Cell, Vec<Cell>)> = None;
    for approach in target.cell.neighbors() {
        if let Some(path) = find_path(world, from, approach) {
            if best.as_ref().map_or(true, |(_, b)| path.len() < b.len()) {
                best = Some((approach, path));
            }
        }
    }
    let (approach, path) = match best {
        Some(found) => found,
        None => {
            let path = find_path(world, from, target.cell).ok_or(InteractError::Unreachable)?;
            (target.cell, path)
        }
    };

    Ok(InteractionPlan {
        furniture,
        action,
        approach,
        path,
    })
}

/// Roll whether the character refuses a user-requested `action`.
///
/// The chance starts from the mood and is adjusted by personality. A chance
/// of 1 always refuses without drawing from `rng`.
pub fn check_refusal(
    personality: &Personality,
    mood: Mood,
    action: ActionId,
    rng: &mut impl Rng,
) -> Result<(), InteractError> {
    let chance = personality.refuse_chance(mood_refuse_base(mood), action);
    if chance >= 1.0 {
        return Err(InteractError::Refused {
            action,
            chance,
            certain: true,
        });
    }
    if chance > 0.0 && rng.gen::<f32>() < chance {
        return Err(InteractError::Refused {
            action,
            chance,
            certain: false,
        });
    }
    Ok(())
}

/// The need with the highest `(100 - value) * bias`, if any is above zero.
/// Ties keep the earlier need.
pub fn most_urgent_need(needs: &Needs, personality: &Personality) -> Option<(NeedKind, f32)> {
    let mut best: Option<(NeedKind, f32)> = None;
    for (need, value) in needs.iter() {
        let urgency = personality.urgency(need, value);
        if urgency > 0.0 && best.map_or(true, |(_, b)| urgency > b) {
            best = Some((need, urgency));
        }
    }
    best
}

/// Nearest furniture that can satisfy `need`, with the action to use on it.
fn furniture_for_need(
    world: &GridWorld,
    need: NeedKind,
    origin: (f32, f32),
) -> Option<(EntityId, ActionId)> {
    let furniture = world.nearest_furniture_of_types(need.furniture_types(), origin)?;
    let action = action_for_need(need, furniture.kind)?;
    Some((furniture.id, action))
}

/// Critical-need override.
///
/// Fires when the most urgent need is at or below the critical threshold,
/// the player is not steering and the character is not already busy with
/// that need. Returns `None` when no matching furniture is reachable.
pub fn critical_need_target(
    world: &GridWorld,
    character: &Character,
    needs: &Needs,
    personality: &Personality,
    config: &SimConfig,
) -> Option<(NeedKind, InteractionPlan)> {
    let (need, _) = most_urgent_need(needs, personality)?;
    if needs.get(need) > config.needs.critical_threshold {
        return None;
    }
    if character.player_driving || character.serving_need() == Some(need) {
        return None;
    }
    let (furniture, action) = furniture_for_need(world, need, character.position())?;
    let plan = plan_interaction(world, character.cell(), furniture, action).ok()?;
    Some((need, plan))
}

/// Free-will score: weighted normalized urgency plus normalized preference.
pub fn free_will_score(urgency: f32, preference: f32, config: &DecisionConfig) -> f32 {
    let urgency = (urgency / NEED_MAX).clamp(0.0, 1.0);
    let preference =
        ((preference - PREFERENCE_MIN) / (PREFERENCE_MAX - PREFERENCE_MIN)).clamp(0.0, 1.0);
    config.urgency_weight * urgency + config.preference_weight * preference
}

/// Best free-will candidate among non-critical needs, without the
/// act-or-not roll.
///
/// The winner is picked by score before any path is planned. If its
/// furniture cannot be reached the character does nothing this time rather
/// than settling for a lower-scoring need.
pub fn free_will_choice(
    world: &GridWorld,
    character: &Character,
    needs: &Needs,
    personality: &Personality,
    config: &SimConfig,
) -> Option<(NeedKind, InteractionPlan)> {
    let mut best: Option<(f32, NeedKind, EntityId, ActionId)> = None;
    for (need, value) in needs.iter() {
        if value <= config.needs.critical_threshold {
            continue;
        }
        let Some((furniture, action)) = furniture_for_need(world, need, character.position()) else {
            continue;
        };
        let score = free_will_score(
            personality.urgency(need, value),
            personality.preference(action),
            &config.decision,
        );
        if score <= config.decision.min_score {
            continue;
        }
        if best.as_ref().map_or(true, |(b, ..)| score > *b) {
            best = Some((score, need, furniture, action));
        }
    }
    let (_, need, furniture, action) = best?;
    let plan = plan_interaction(world, character.cell(), furniture, action).ok()?;
    Some((need, plan))
}

/// One decision pass. Critical needs preempt free will.
///
/// The idle timer only runs while the character is not busy and restarts
/// with a fresh threshold whenever free will is evaluated, whether or not it
/// acted.
#[allow(clippy::too_many_arguments)]
pub fn decide(
    world: &GridWorld,
    character: &Character,
    needs: &Needs,
    personality: &Personality,
    config: &SimConfig,
    state: &mut DecisionState,
    dt: f32,
    rng: &mut impl Rng,
) -> Option<Decision> {
    if let Some((need, plan)) = critical_need_target(world, character, needs, personality, config)
    {
        state.idle_timer = 0.0;
        return Some(Decision {
            reason: DecisionReason::CriticalNeed(need),
            plan,
        });
    }

    if character.is_busy() {
        state.idle_timer = 0.0;
        return None;
    }
    state.idle_timer += dt.max(0.0);
    if state.idle_timer < state.idle_threshold {
        return None;
    }
    state.restart(&config.decision, rng);

    let (need, plan) = free_will_choice(world, character, needs, personality, config)?;
    if rng.gen::<f32>() >= config.decision.act_chance {
        log::debug!("free will skipped {}", plan.action);
        return None;
    }
    Some(Decision {
        reason: DecisionReason::FreeWill(need),
        plan,
    })
}
