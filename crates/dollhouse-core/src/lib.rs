//! Dollhouse Core - Life Simulation Engine
//!
//! Owns one house and the character living in it. Building, needs, decisions
//! and movement are pure functions in `dollhouse-logic`; this crate holds the
//! state, runs the per-frame tick, keeps undo history and saves/loads.
//!
//! # Example
//!
//! ```rust,no_run
//! use dollhouse_core::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default(), 42);
//! sim.place_floor(0, 0);
//! sim.place_floor(1, 0);
//! sim.place_furniture(1, 0, FurnitureType::Bed, 0.0);
//! sim.spawn_character(Cell::new(0, 0));
//!
//! loop {
//!     sim.tick(1.0 / 60.0); // 60 FPS
//!     for notice in sim.take_notices() {
//!         println!("{}", notice.message);
//!     }
//! }
//! ```

pub mod engine;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{Notice, NoticeLevel, SimEvent, Simulation};
    pub use dollhouse_logic::config::SimConfig;
    pub use dollhouse_logic::furniture::FurnitureType;
    pub use dollhouse_logic::grid::{Cell, EntityId, WallDir};
    pub use dollhouse_logic::interaction::{ActionId, InteractionState};
    pub use dollhouse_logic::needs::{Mood, NeedKind};
}
