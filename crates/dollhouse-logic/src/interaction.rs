//! Interaction catalog: which actions each furniture type offers, the
//! interaction-state each action puts the character in, and which need that
//! state recovers.
//!
//! | Action | Furniture | State | Recovers |
//! |--------|-----------|-------|----------|
//! | `sleep` | bed | `sleep_enter` → `sleep` | sleep |
//! | `sit_edge` | bed | `sit_edge` | none |
//! | `pillow_fight` | bed | `pillow_fight` (3 s) | fun |
//! | `sofa_sit` | sofa | `sofa_sit` | fun |
//! | `tv_watch` | tv | `tv_watch` | fun |
//! | `eat_food` | food, fridge | `eat_food` | hunger |
//! | `toilet_use` | toilet | `toilet_use` | bladder |
//! | `sink_wash` | sink | `sink_wash` | hygiene |
//! | `shower_use` | shower | `shower_use` | hygiene |
//! | `bath_soak` | bathtub | `bath_soak` | hygiene |
//! | `guitar_play` | guitar | `guitar_play` | fun |
//! | `computer_use` | computer desk | `computer_use` | fun |
//! | `table_sit` | table | `table_sit` | none |

use serde::{Deserialize, Serialize};

use crate::config::InteractionConfig;
use crate::furniture::FurnitureType;
use crate::needs::NeedKind;

/// Named interaction entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Sleep,
    SitEdge,
    PillowFight,
    SofaSit,
    TvWatch,
    EatFood,
    ToiletUse,
    SinkWash,
    ShowerUse,
    BathSoak,
    GuitarPlay,
    ComputerUse,
    TableSit,
}

impl ActionId {
    pub const ALL: [ActionId; 13] = [
        ActionId::Sleep,
        ActionId::SitEdge,
        ActionId::PillowFight,
        ActionId::SofaSit,
        ActionId::TvWatch,
        ActionId::EatFood,
        ActionId::ToiletUse,
        ActionId::SinkWash,
        ActionId::ShowerUse,
        ActionId::BathSoak,
        ActionId::GuitarPlay,
        ActionId::ComputerUse,
        ActionId::TableSit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::Sleep => "sleep",
            ActionId::SitEdge => "sit_edge",
            ActionId::PillowFight => "pillow_fight",
            ActionId::SofaSit => "sofa_sit",
            ActionId::TvWatch => "tv_watch",
            ActionId::EatFood => "eat_food",
            ActionId::ToiletUse => "toilet_use",
            ActionId::SinkWash => "sink_wash",
            ActionId::ShowerUse => "shower_use",
            ActionId::BathSoak => "bath_soak",
            ActionId::GuitarPlay => "guitar_play",
            ActionId::ComputerUse => "computer_use",
            ActionId::TableSit => "table_sit",
        }
    }

    /// State entered on arrival.
    pub fn entry_state(self) -> InteractionState {
        match self {
            ActionId::Sleep => InteractionState::SleepEnter,
            ActionId::SitEdge => InteractionState::SitEdge,
            ActionId::PillowFight => InteractionState::PillowFight,
            ActionId::SofaSit => InteractionState::SofaSit,
            ActionId::TvWatch => InteractionState::TvWatch,
            ActionId::EatFood => InteractionState::EatFood,
            ActionId::ToiletUse => InteractionState::ToiletUse,
            ActionId::SinkWash => InteractionState::SinkWash,
            ActionId::ShowerUse => InteractionState::ShowerUse,
            ActionId::BathSoak => InteractionState::BathSoak,
            ActionId::GuitarPlay => InteractionState::GuitarPlay,
            ActionId::ComputerUse => InteractionState::ComputerUse,
            ActionId::TableSit => InteractionState::TableSit,
        }
    }

    /// Need this action satisfies once settled.
    pub fn satisfies(self) -> Option<NeedKind> {
        match self {
            ActionId::Sleep => Some(NeedKind::Sleep),
            other => other.entry_state().recovers(),
        }
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the character is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    SleepEnter,
    Sleep,
    SitEdge,
    PillowFight,
    SofaSit,
    TvWatch,
    EatFood,
    ToiletUse,
    SinkWash,
    ShowerUse,
    BathSoak,
    GuitarPlay,
    ComputerUse,
    TableSit,
}

impl InteractionState {
    /// Need recovered while in this state.
    pub fn recovers(self) -> Option<NeedKind> {
        match self {
            InteractionState::Sleep => Some(NeedKind::Sleep),
            InteractionState::EatFood => Some(NeedKind::Hunger),
            InteractionState::ToiletUse => Some(NeedKind::Bladder),
            InteractionState::SinkWash
            | InteractionState::ShowerUse
            | InteractionState::BathSoak => Some(NeedKind::Hygiene),
            InteractionState::TvWatch
            | InteractionState::SofaSit
            | InteractionState::GuitarPlay
            | InteractionState::ComputerUse
            | InteractionState::PillowFight => Some(NeedKind::Fun),
            InteractionState::Idle
            | InteractionState::SleepEnter
            | InteractionState::SitEdge
            | InteractionState::TableSit => None,
        }
    }

    /// Need this state is working toward, including blend-in states.
    pub fn serves(self) -> Option<NeedKind> {
        match self {
            InteractionState::SleepEnter => Some(NeedKind::Sleep),
            other => other.recovers(),
        }
    }

    pub fn is_idle(self) -> bool {
        self == InteractionState::Idle
    }

    /// Timed transition out of this state after `elapsed` seconds in it.
    /// States without a timer persist until interrupted.
    pub fn timed_transition(
        self,
        elapsed: f32,
        config: &InteractionConfig,
    ) -> Option<InteractionState> {
        match self {
            InteractionState::SleepEnter if elapsed >= config.sleep_blend => {
                Some(InteractionState::Sleep)
            }
            InteractionState::PillowFight if elapsed >= config.pillow_fight => {
                Some(InteractionState::Idle)
            }
            _ => None,
        }
    }
}

/// Actions a furniture type offers, first is the default.
pub fn actions_for(kind: FurnitureType) -> &'static [ActionId] {
    match kind {
        FurnitureType::Bed => &[ActionId::Sleep, ActionId::SitEdge, ActionId::PillowFight],
        FurnitureType::Sofa => &[ActionId::SofaSit],
        FurnitureType::Tv => &[ActionId::TvWatch],
        FurnitureType::Food | FurnitureType::Fridge => &[ActionId::EatFood],
        FurnitureType::Toilet => &[ActionId::ToiletUse],
        FurnitureType::Sink => &[ActionId::SinkWash],
        FurnitureType::Shower => &[ActionId::ShowerUse],
        FurnitureType::Bathtub => &[ActionId::BathSoak],
        FurnitureType::Guitar => &[ActionId::GuitarPlay],
        FurnitureType::ComputerDesk => &[ActionId::ComputerUse],
        FurnitureType::Table => &[ActionId::TableSit],
        FurnitureType::Door
        | FurnitureType::Window
        | FurnitureType::CeilingLight
        | FurnitureType::Generic => &[],
    }
}

pub fn offers(kind: FurnitureType, action: ActionId) -> bool {
    actions_for(kind).contains(&action)
}

/// The action on `kind` that satisfies `need`, if any.
pub fn action_for_need(need: NeedKind, kind: FurnitureType) -> Option<ActionId> {
    actions_for(kind)
        .iter()
        .copied()
        .find(|action| action.satisfies() == Some(need))
}
