//! Layout JSON format, shared by export/import and the undo history.
//!
//! ```json
//! {
//!   "floors":     [{ "x": 0, "z": 0 }],
//!   "walls":      [{ "x": 1, "z": 0, "dir": "z", "hasOpening": false }],
//!   "furnitures": [{ "x": 1, "z": 0, "type": "door", "rotationY": 1.5708 }]
//! }
//! ```
//!
//! Import clears the world and replays placements in order floors, walls,
//! furnitures, so ceiling lights see the walls they depend on. Door and
//! light state is not part of the format.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, PlacementError};
use crate::furniture::FurnitureType;
use crate::grid::{GridWorld, WallDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorRecord {
    pub x: i32,
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRecord {
    pub x: i32,
    pub z: i32,
    pub dir: WallDir,
    /// Informational; openings are re-derived from doors and windows.
    #[serde(default)]
    pub has_opening: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureRecord {
    pub x: i32,
    pub z: i32,
    #[serde(rename = "type")]
    pub kind: FurnitureType,
    #[serde(default)]
    pub rotation_y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub floors: Vec<FloorRecord>,
    #[serde(default)]
    pub walls: Vec<WallRecord>,
    #[serde(default)]
    pub furnitures: Vec<FurnitureRecord>,
}

/// What an import actually placed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub floors: usize,
    pub walls: usize,
    pub furnitures: usize,
    /// Furniture entries the world refused, with the reason.
    pub rejected: Vec<(FurnitureRecord, PlacementError)>,
}

pub fn export_layout(world: &GridWorld) -> LayoutDocument {
    LayoutDocument {
        floors: world
            .floors()
            .map(|f| FloorRecord {
                x: f.cell.x,
                z: f.cell.z,
            })
            .collect(),
        walls: world
            .walls()
            .map(|w| WallRecord {
                x: w.key.x,
                z: w.key.z,
                dir: w.key.dir,
                has_opening: w.has_opening,
            })
            .collect(),
        furnitures: world
            .furnitures()
            .map(|f| FurnitureRecord {
                x: f.cell.x,
                z: f.cell.z,
                kind: f.kind,
                rotation_y: f.rotation_y,
            })
            .collect(),
    }
}

pub fn export_json(world: &GridWorld) -> Result<String, LayoutError> {
    serde_json::to_string(&export_layout(world)).map_err(LayoutError::Serialize)
}

pub fn parse_layout(json: &str) -> Result<LayoutDocument, LayoutError> {
    serde_json::from_str(json).map_err(LayoutError::Parse)
}

/// Replace the world's contents with `doc`.
pub fn apply_layout(world: &mut GridWorld, doc: &LayoutDocument) -> ImportReport {
    world.clear();
    let mut report = ImportReport::default();

    for floor in &doc.floors {
        world.place_floor(floor.x, floor.z);
    }
    report.floors = world.floor_count();

    for wall in &doc.walls {
        world.place_wall(wall.x, wall.z, wall.dir);
    }
    report.walls = world.wall_count();

    for item in &doc.furnitures {
        match world.place_furniture(item.x, item.z, item.kind, item.rotation_y) {
            Ok(_) => report.furnitures += 1,
            Err(err) => {
                log::warn!(
                    "layout entry {} at ({}, {}) skipped: {}",
                    item.kind,
                    item.x,
                    item.z,
                    err
                );
                report.rejected.push((item.clone(), err));
            }
        }
    }
    report
}

/// Parse and apply. A parse failure leaves the world untouched.
pub fn import_json(world: &mut GridWorld, json: &str) -> Result<ImportReport, LayoutError> {
    let doc = parse_layout(json)?;
    Ok(apply_layout(world, &doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WallKey;
    use std::f32::consts::FRAC_PI_2;

    fn sample_world() -> GridWorld {
        let mut world = GridWorld::default();
        world.place_floor(0, 0);
        world.place_floor(1, 0);
        world.place_wall(1, 0, WallDir::Z);
        world
            .place_furniture(1, 0, FurnitureType::Door, FRAC_PI_2)
            .unwrap();
        world.place_furniture(0, 0, FurnitureType::Bed, 0.0).unwrap();
        world
    }

    #[test]
    fn test_export_shape() {
        let json = export_json(&sample_world()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["floors"].as_array().unwrap().len(), 2);
        assert_eq!(value["walls"][0]["dir"], "z");
        assert_eq!(value["walls"][0]["hasOpening"], true);
        assert_eq!(value["furnitures"][0]["type"], "door");
        assert!(value["furnitures"][0]["rotationY"].is_number());
    }

    #[test]
    fn test_import_restores_world() {
        let source = sample_world();
        let json = export_json(&source).unwrap();

        let mut target = GridWorld::default();
        target.place_floor(9, 9);
        let report = import_json(&mut target, &json).unwrap();

        assert_eq!(report.floors, 2);
        assert_eq!(report.walls, 1);
        assert_eq!(report.furnitures, 2);
        assert!(report.rejected.is_empty());
        assert!(!target.has_floor_at(9, 9));
        assert!(target.wall(WallKey::new(1, 0, WallDir::Z)).unwrap().has_opening);
        assert_eq!(export_layout(&target), export_layout(&source));
    }

    #[test]
    fn test_bad_json_leaves_world_untouched() {
        let mut world = sample_world();
        let before = export_layout(&world);
        assert!(matches!(
            import_json(&mut world, "{\"floors\": [oops"),
            Err(LayoutError::Parse(_))
        ));
        assert_eq!(export_layout(&world), before);
    }

    #[test]
    fn test_walls_precede_ceiling_lights() {
        let json = r#"{
            "furnitures": [{ "x": 0, "z": 0, "type": "ceilingLight" }],
            "floors": [{ "x": 0, "z": 0 }],
            "walls": [
                { "x": 0, "z": 0, "dir": "x" }, { "x": 0, "z": 1, "dir": "x" },
                { "x": 0, "z": 0, "dir": "z" }, { "x": 1, "z": 0, "dir": "z" }
            ]
        }"#;
        let mut world = GridWorld::default();
        let report = import_json(&mut world, json).unwrap();
        assert_eq!(report.furnitures, 1);
        assert!(world.furniture_at(0, 0).unwrap().is_lit());
    }

    #[test]
    fn test_rejected_entries_reported() {
        let json = r#"{
            "floors": [{ "x": 0, "z": 0 }],
            "furnitures": [
                { "x": 0, "z": 0, "type": "sofa", "rotationY": 0 },
                { "x": 0, "z": 0, "type": "tv", "rotationY": 0 },
                { "x": 0, "z": 0, "type": "spaceship" }
            ]
        }"#;
        let mut world = GridWorld::default();
        let report = import_json(&mut world, json).unwrap();
        assert_eq!(report.furnitures, 1);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(
            report.rejected[0].1,
            PlacementError::CellOccupied { x: 0, z: 0 }
        );
        assert_eq!(report.rejected[1].0.kind, FurnitureType::Generic);
        assert_eq!(
            world.furniture_at(0, 0).map(|f| f.kind),
            Some(FurnitureType::Sofa)
        );
        assert!(!world.is_cell_walkable(0, 0));
    }
}
