//! Save/Load for the whole simulation.
//!
//! Uses bincode for a compact binary snapshot. Unlike layout JSON this keeps
//! everything: entity ids, door and light state, the character mid-walk,
//! needs, personality and the config in effect. Undo history is not saved.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use dollhouse_logic::agent::Character;
use dollhouse_logic::config::SimConfig;
use dollhouse_logic::grid::GridWorld;
use dollhouse_logic::needs::NeedsEngine;
use dollhouse_logic::personality::Personality;

use crate::engine::Simulation;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Simulation time in seconds
    pub sim_time: f64,
    /// Seed the RNG is restarted from on load
    pub seed: u64,
    pub config: SimConfig,
    pub world: GridWorld,
    pub character: Character,
    pub needs: NeedsEngine,
    pub personality: Personality,
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(writer: W, sim: &Simulation) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time: sim.sim_time,
        seed: sim.seed(),
        config: sim.config().clone(),
        world: sim.world.clone(),
        character: sim.character.clone(),
        needs: sim.needs.clone(),
        personality: sim.personality.clone(),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(LoadedSimulation {
        sim_time: save_data.sim_time,
        seed: save_data.seed,
        config: save_data.config,
        world: save_data.world,
        character: save_data.character,
        needs: save_data.needs,
        personality: save_data.personality,
    })
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub sim_time: f64,
    pub seed: u64,
    pub config: SimConfig,
    pub world: GridWorld,
    pub character: Character,
    pub needs: NeedsEngine,
    pub personality: Personality,
}

/// Errors that can occur during save/load
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use dollhouse_logic::furniture::FurnitureType;
    use dollhouse_logic::grid::{Cell, WallDir};
    use dollhouse_logic::interaction::ActionId;
    use dollhouse_logic::needs::NeedKind;
    use std::f32::consts::FRAC_PI_2;

    fn furnished() -> Simulation {
        let mut sim = Simulation::new(SimConfig::default(), 7);
        for x in 0..4 {
            sim.place_floor(x, 0);
        }
        sim.place_wall(2, 0, WallDir::Z);
        let door = sim
            .place_furniture(2, 0, FurnitureType::Door, FRAC_PI_2)
            .unwrap();
        sim.set_door_open(door, true);
        sim.place_furniture(3, 0, FurnitureType::Tv, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.personality_mut().set_preference(ActionId::TvWatch, 1.5);
        sim
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut sim = furnished();
        sim.set_need_value(NeedKind::Fun, 55.0);
        let tv = sim.world.furniture_at(3, 0).unwrap().id;
        sim.interact(tv, ActionId::TvWatch).unwrap();
        for _ in 0..5 {
            sim.tick(0.1);
        }

        let mut save_buffer = Vec::new();
        sim.save(&mut save_buffer).expect("Save failed");

        let mut loaded = Simulation::default();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert!((loaded.sim_time - sim.sim_time).abs() < 1e-9);
        assert_eq!(loaded.seed(), 7);
        assert_eq!(loaded.character, sim.character);
        assert_eq!(loaded.needs, sim.needs);
        assert_eq!(loaded.personality, sim.personality);
        assert_eq!(loaded.world.furniture_count(), 2);
        // door state survives, unlike layout export
        let door = loaded.world.furniture_at(2, 0).unwrap();
        assert!(door.opening.unwrap().open_target);
        assert!(!loaded.can_undo());
    }

    #[test]
    fn test_version_mismatch() {
        let sim = furnished();
        let mut data = Vec::new();
        sim.save(&mut data).unwrap();
        // version is the leading little-endian u32
        data[0] = 99;
        let err = load_simulation(&data[..]).err().unwrap();
        assert!(matches!(
            err,
            SaveError::VersionMismatch {
                expected: 1,
                found: 99
            }
        ));
    }

    #[test]
    fn test_truncated_save_is_an_error() {
        let sim = furnished();
        let mut data = Vec::new();
        sim.save(&mut data).unwrap();
        data.truncate(data.len() / 2);
        let mut target = Simulation::default();
        assert!(target.load(&data[..]).is_err());
        assert!(target.world.is_empty());
    }
}
