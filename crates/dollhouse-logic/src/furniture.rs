//! Furniture vocabulary and per-item state.

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, EntityId, WallDir};

/// Fixed furniture vocabulary. Unknown type tags in imported layouts map to
/// [`FurnitureType::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FurnitureType {
    Bed,
    Sofa,
    Table,
    Tv,
    Food,
    Toilet,
    Sink,
    Door,
    Window,
    CeilingLight,
    Fridge,
    Guitar,
    ComputerDesk,
    Shower,
    Bathtub,
    Generic,
}

impl FurnitureType {
    pub const ALL: [FurnitureType; 16] = [
        FurnitureType::Bed,
        FurnitureType::Sofa,
        FurnitureType::Table,
        FurnitureType::Tv,
        FurnitureType::Food,
        FurnitureType::Toilet,
        FurnitureType::Sink,
        FurnitureType::Door,
        FurnitureType::Window,
        FurnitureType::CeilingLight,
        FurnitureType::Fridge,
        FurnitureType::Guitar,
        FurnitureType::ComputerDesk,
        FurnitureType::Shower,
        FurnitureType::Bathtub,
        FurnitureType::Generic,
    ];

    /// Furniture that never blocks walking on its cell.
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            FurnitureType::Door | FurnitureType::Window | FurnitureType::CeilingLight
        )
    }

    /// Door or window: carves an opening in the wall it sits on.
    pub fn is_opening(self) -> bool {
        matches!(self, FurnitureType::Door | FurnitureType::Window)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FurnitureType::Bed => "bed",
            FurnitureType::Sofa => "sofa",
            FurnitureType::Table => "table",
            FurnitureType::Tv => "tv",
            FurnitureType::Food => "food",
            FurnitureType::Toilet => "toilet",
            FurnitureType::Sink => "sink",
            FurnitureType::Door => "door",
            FurnitureType::Window => "window",
            FurnitureType::CeilingLight => "ceilingLight",
            FurnitureType::Fridge => "fridge",
            FurnitureType::Guitar => "guitar",
            FurnitureType::ComputerDesk => "computerDesk",
            FurnitureType::Shower => "shower",
            FurnitureType::Bathtub => "bathtub",
            FurnitureType::Generic => "generic",
        }
    }
}

impl From<String> for FurnitureType {
    fn from(tag: String) -> Self {
        FurnitureType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .unwrap_or(FurnitureType::Generic)
    }
}

impl From<FurnitureType> for String {
    fn from(kind: FurnitureType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall alignment of an item, derived once from its yaw.
///
/// A yaw closer to 0 or π lies along X; closer to ±π/2 lies along Z. At
/// exactly 45° the item is treated as along X.
pub fn orientation_from_rotation(rotation_y: f32) -> WallDir {
    if rotation_y.sin().abs() > rotation_y.cos().abs() {
        WallDir::Z
    } else {
        WallDir::X
    }
}

/// Open/closed state for doors and windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningState {
    /// Target state, read by connectivity.
    pub open_target: bool,
    /// Presentation progress in [0, 1].
    pub open_progress: f32,
}

impl OpeningState {
    pub fn closed() -> Self {
        Self {
            open_target: false,
            open_progress: 0.0,
        }
    }

    /// Move progress toward the target by `step`.
    pub fn advance(&mut self, step: f32) {
        let target = if self.open_target { 1.0 } else { 0.0 };
        if self.open_progress < target {
            self.open_progress = (self.open_progress + step).min(target);
        } else if self.open_progress > target {
            self.open_progress = (self.open_progress - step).max(target);
        }
    }
}

/// A placed furniture item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: EntityId,
    pub cell: Cell,
    pub kind: FurnitureType,
    pub rotation_y: f32,
    pub orientation: WallDir,
    /// Present for doors and windows.
    pub opening: Option<OpeningState>,
    /// Present for ceiling lights.
    pub light_on: Option<bool>,
}

impl Furniture {
    pub fn new(id: EntityId, cell: Cell, kind: FurnitureType, rotation_y: f32) -> Self {
        Self {
            id,
            cell,
            kind,
            rotation_y,
            orientation: orientation_from_rotation(rotation_y),
            opening: kind.is_opening().then(OpeningState::closed),
            light_on: (kind == FurnitureType::CeilingLight).then_some(true),
        }
    }

    /// World-space center of the furniture's cell.
    pub fn center(&self) -> (f32, f32) {
        self.cell.center()
    }

    pub fn is_open(&self) -> bool {
        self.opening.map(|o| o.open_target).unwrap_or(false)
    }

    pub fn is_lit(&self) -> bool {
        self.light_on.unwrap_or(false)
    }
}
