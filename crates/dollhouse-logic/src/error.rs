//! Error types for the dollhouse logic crate.
//!
//! None of these are fatal. Callers surface them as soft notices and leave
//! the world untouched.

use thiserror::Error;

use crate::furniture::FurnitureType;
use crate::interaction::ActionId;

/// Why a furniture placement was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("cell ({x}, {z}) is already occupied by furniture")]
    CellOccupied { x: i32, z: i32 },

    #[error("ceiling lights can only be placed inside a closed room (cell ({x}, {z}))")]
    NotInClosedRoom { x: i32, z: i32 },
}

/// Errors raised while reading or writing the layout JSON format.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout JSON could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("layout could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors raised while loading tuning configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Why an interaction request did not start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractError {
    #[error("furniture no longer exists")]
    UnknownFurniture,

    #[error("{kind} offers no interactions")]
    NotInteractive { kind: FurnitureType },

    #[error("{action} is not offered by this furniture")]
    UnsupportedAction { action: ActionId },

    #[error("character refused {action} (chance {chance:.2})")]
    Refused {
        action: ActionId,
        chance: f32,
        certain: bool,
    },

    #[error("no reachable cell next to the furniture")]
    Unreachable,
}
