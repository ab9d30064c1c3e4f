//! Character state and movement.
//!
//! Two ways to move:
//! - path following: walk cell centers of a planned path at walk speed
//! - direct input: "try then slide". Attempt the full delta; if blocked, keep
//!   whichever single axis is still allowed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::InteractionConfig;
use crate::grid::{Cell, EntityId, GridWorld};
use crate::interaction::{ActionId, InteractionState};
use crate::needs::NeedKind;
use crate::pathfinding::can_move_character_to;

/// Interaction the character will start on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingInteraction {
    pub furniture: EntityId,
    pub action: ActionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub x: f32,
    pub z: f32,
    pub yaw: f32,
    pub state: InteractionState,
    /// Seconds spent in `state`.
    pub state_elapsed: f32,
    /// Remaining waypoints, next first.
    pub path: VecDeque<Cell>,
    pub pending: Option<PendingInteraction>,
    /// Set while directional input is held.
    pub player_driving: bool,
}

impl Default for Character {
    fn default() -> Self {
        Self::at(Cell::new(0, 0))
    }
}

impl Character {
    /// A character standing idle at the center of `cell`.
    pub fn at(cell: Cell) -> Self {
        let (x, z) = cell.center();
        Self {
            x,
            z,
            yaw: 0.0,
            state: InteractionState::Idle,
            state_elapsed: 0.0,
            path: VecDeque::new(),
            pending: None,
            player_driving: false,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    pub fn cell(&self) -> Cell {
        Cell::containing(self.x, self.z)
    }

    /// Busy characters do not accumulate idle time.
    pub fn is_busy(&self) -> bool {
        self.player_driving
            || !self.path.is_empty()
            || self.pending.is_some()
            || !self.state.is_idle()
    }

    /// Drop any path, pending interaction and activity.
    pub fn cancel(&mut self) {
        self.path.clear();
        self.pending = None;
        self.enter_state(InteractionState::Idle);
    }

    pub fn enter_state(&mut self, state: InteractionState) {
        self.state = state;
        self.state_elapsed = 0.0;
    }

    /// Need the current activity serves, counting the pending interaction.
    pub fn serving_need(&self) -> Option<NeedKind> {
        self.state
            .serves()
            .or_else(|| self.pending.and_then(|p| p.action.satisfies()))
    }

    /// Follow `path` (its first cell is usually the current cell).
    pub fn set_path(&mut self, path: Vec<Cell>) {
        let here = self.cell();
        self.path = path.into_iter().skip_while(|c| *c == here).collect();
    }

    /// Advance the state timer and apply timed transitions.
    /// Returns the new state if one happened.
    pub fn advance_state(
        &mut self,
        dt: f32,
        config: &InteractionConfig,
    ) -> Option<InteractionState> {
        self.state_elapsed += dt;
        let next = self.state.timed_transition(self.state_elapsed, config)?;
        self.enter_state(next);
        Some(next)
    }

    /// Walk toward the next waypoint center. Returns true when the final
    /// waypoint is reached on this call.
    pub fn step_along_path(&mut self, dt: f32, speed: f32) -> bool {
        let mut budget = (speed * dt).max(0.0);
        while let Some(next) = self.path.front().copied() {
            let (tx, tz) = next.center();
            let (dx, dz) = (tx - self.x, tz - self.z);
            let dist = (dx * dx + dz * dz).sqrt();
            if dist > 1e-6 {
                self.yaw = dx.atan2(dz);
            }
            if dist <= budget {
                self.x = tx;
                self.z = tz;
                budget -= dist;
                self.path.pop_front();
                if self.path.is_empty() {
                    return true;
                }
            } else {
                self.x += dx / dist * budget;
                self.z += dz / dist * budget;
                return false;
            }
        }
        false
    }

    /// Snap to the last waypoint, as if the walk finished.
    pub fn finish_path(&mut self) {
        if let Some(last) = self.path.back().copied() {
            let (x, z) = last.center();
            self.x = x;
            self.z = z;
        }
        self.path.clear();
    }
}

/// Result of a direct-control move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveResult {
    /// Full delta applied.
    Moved { x: f32, z: f32 },
    /// Blocked on one axis, slid along the other.
    Slide { x: f32, z: f32 },
    Blocked,
}

/// Resolve a directional move from `from` by `(dx, dz)`.
pub fn compute_move(world: &GridWorld, from: (f32, f32), dx: f32, dz: f32) -> MoveResult {
    let (px, pz) = from;
    let target = (px + dx, pz + dz);
    if can_move_character_to(world, from, target) {
        return MoveResult::Moved {
            x: target.0,
            z: target.1,
        };
    }

    // Prefer the axis with the larger component.
    let along_x = (px + dx, pz);
    let along_z = (px, pz + dz);
    let order = if dx.abs() >= dz.abs() {
        [(along_x, dx), (along_z, dz)]
    } else {
        [(along_z, dz), (along_x, dx)]
    };
    for (candidate, component) in order {
        if component != 0.0 && can_move_character_to(world, from, candidate) {
            return MoveResult::Slide {
                x: candidate.0,
                z: candidate.1,
            };
        }
    }
    MoveResult::Blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WallDir;

    fn corridor(len: i32) -> GridWorld {
        let mut world = GridWorld::default();
        for x in 0..len {
            world.place_floor(x, 0);
        }
        world
    }

    #[test]
    fn test_busy_flags() {
        let mut c = Character::default();
        assert!(!c.is_busy());
        c.enter_state(InteractionState::TvWatch);
        assert!(c.is_busy());
        c.cancel();
        assert!(!c.is_busy());
        c.player_driving = true;
        assert!(c.is_busy());
    }

    #[test]
    fn test_walks_path_at_speed() {
        let mut c = Character::at(Cell::new(0, 0));
        c.set_path(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]);
        assert_eq!(c.path.len(), 2);
        assert!(!c.step_along_path(0.5, 1.0));
        assert!((c.x - 1.0).abs() < 1e-5);
        assert!(!c.step_along_path(0.5, 1.0));
        assert_eq!(c.cell(), Cell::new(1, 0));
        assert!(c.step_along_path(1.0, 1.0));
        assert_eq!(c.position(), Cell::new(2, 0).center());
        assert!(c.path.is_empty());
    }

    #[test]
    fn test_large_step_consumes_several_waypoints() {
        let mut c = Character::at(Cell::new(0, 0));
        c.set_path(vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]);
        assert!(c.step_along_path(10.0, 2.0));
        assert_eq!(c.cell(), Cell::new(3, 0));
    }

    #[test]
    fn test_sleep_enter_blends_into_sleep() {
        let config = InteractionConfig::default();
        let mut c = Character::default();
        c.enter_state(InteractionState::SleepEnter);
        assert_eq!(c.advance_state(1.0, &config), None);
        assert_eq!(c.advance_state(0.3, &config), Some(InteractionState::Sleep));
        assert_eq!(c.state_elapsed, 0.0);
    }

    #[test]
    fn test_serving_need_counts_pending() {
        let mut c = Character::default();
        assert_eq!(c.serving_need(), None);
        c.pending = Some(PendingInteraction {
            furniture: EntityId(3),
            action: ActionId::EatFood,
        });
        assert_eq!(c.serving_need(), Some(NeedKind::Hunger));
    }

    #[test]
    fn test_compute_move_free_and_blocked() {
        let mut world = corridor(2);
        match compute_move(&world, (0.5, 0.5), 0.6, 0.0) {
            MoveResult::Moved { x, z } => {
                assert!((x - 1.1).abs() < 1e-5);
                assert_eq!(z, 0.5);
            }
            other => panic!("expected free move, got {:?}", other),
        }
        world.place_wall(1, 0, WallDir::Z);
        assert_eq!(compute_move(&world, (0.5, 0.5), 0.6, 0.0), MoveResult::Blocked);
    }

    #[test]
    fn test_compute_move_slides_along_wall() {
        let world = corridor(2);
        // z+ leaves the floor; x component survives
        match compute_move(&world, (0.5, 0.5), 0.6, 0.7) {
            MoveResult::Slide { x, z } => {
                assert!((x - 1.1).abs() < 1e-5);
                assert_eq!(z, 0.5);
            }
            other => panic!("expected slide, got {:?}", other),
        }
    }
}
