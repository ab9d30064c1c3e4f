//! Pure dollhouse logic.
//!
//! This crate contains the building grid and the character's needs and
//! decision logic, independent of any renderer or input layer. Functions take
//! plain data and return results, so everything here is unit-testable and
//! the engine crate only has to own state and call in.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`agent`] | Character position, interaction-state, path following, direct movement |
//! | [`config`] | Tuning parameters (decay rates, timers, widths) loaded from JSON |
//! | [`connectivity`] | Wall/door-aware adjacency and closed-room flood fill |
//! | [`decision`] | Critical-need override, free will, interaction planning, refusal |
//! | [`error`] | Error enums for placement, layout, config and interactions |
//! | [`furniture`] | Furniture vocabulary, door/window/light state |
//! | [`grid`] | `GridWorld`: floors, walls, caps, furniture, entity ids, destroy queue |
//! | [`history`] | Bounded undo/redo over layout snapshots |
//! | [`interaction`] | Action catalog, interaction-states and the needs they recover |
//! | [`layout`] | Layout JSON export/import |
//! | [`needs`] | Need values, decay/recovery, mood |
//! | [`pathfinding`] | BFS over walkable cells, continuous movement checks |
//! | [`personality`] | Traits, need bias, action preferences, refusal chance |

pub mod agent;
pub mod config;
pub mod connectivity;
pub mod decision;
pub mod error;
pub mod furniture;
pub mod grid;
pub mod history;
pub mod interaction;
pub mod layout;
pub mod needs;
pub mod pathfinding;
pub mod personality;
