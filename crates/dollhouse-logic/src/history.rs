//! Bounded undo/redo over layout snapshots.
//!
//! Entries are layout JSON strings. Both stacks hold at most `limit` entries;
//! pushing past the limit drops the oldest. A new snapshot clears redo.

use std::collections::VecDeque;

use crate::error::LayoutError;
use crate::grid::GridWorld;
use crate::layout::{apply_layout, export_json, parse_layout};

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<String>,
    redo: VecDeque<String>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

fn push_bounded(stack: &mut VecDeque<String>, entry: String, limit: usize) {
    stack.push_back(entry);
    while stack.len() > limit {
        stack.pop_front();
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the world as it is now, before a mutation.
    pub fn snapshot(&mut self, world: &GridWorld) -> Result<(), LayoutError> {
        let entry = export_json(world)?;
        push_bounded(&mut self.undo, entry, self.limit);
        self.redo.clear();
        Ok(())
    }

    /// Restore the latest snapshot. Returns false if there is none.
    pub fn undo(&mut self, world: &mut GridWorld) -> Result<bool, LayoutError> {
        Self::step(&mut self.undo, &mut self.redo, self.limit, world)
    }

    /// Re-apply the last undone state. Returns false if there is none.
    pub fn redo(&mut self, world: &mut GridWorld) -> Result<bool, LayoutError> {
        Self::step(&mut self.redo, &mut self.undo, self.limit, world)
    }

    fn step(
        from: &mut VecDeque<String>,
        to: &mut VecDeque<String>,
        limit: usize,
        world: &mut GridWorld,
    ) -> Result<bool, LayoutError> {
        let Some(entry) = from.back() else {
            return Ok(false);
        };
        let doc = parse_layout(entry)?;
        let current = export_json(world)?;
        from.pop_back();
        push_bounded(to, current, limit);
        apply_layout(world, &doc);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{WallDir, WallKey};

    #[test]
    fn test_undo_redo_round_trip() {
        let mut world = GridWorld::default();
        let mut history = History::default();

        world.place_floor(0, 0);
        history.snapshot(&world).unwrap();
        world.place_wall(0, 0, WallDir::X);

        assert!(history.undo(&mut world).unwrap());
        assert!(world.has_floor_at(0, 0));
        assert!(!world.has_wall(WallKey::new(0, 0, WallDir::X)));

        assert!(history.redo(&mut world).unwrap());
        assert!(world.has_floor_at(0, 0));
        assert!(world.has_wall(WallKey::new(0, 0, WallDir::X)));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut world = GridWorld::default();
        world.place_floor(3, 3);
        let mut history = History::default();
        assert!(!history.undo(&mut world).unwrap());
        assert!(!history.redo(&mut world).unwrap());
        assert!(world.has_floor_at(3, 3));
    }

    #[test]
    fn test_snapshot_clears_redo() {
        let mut world = GridWorld::default();
        let mut history = History::default();
        history.snapshot(&world).unwrap();
        world.place_floor(0, 0);
        history.undo(&mut world).unwrap();
        assert!(history.can_redo());
        history.snapshot(&world).unwrap();
        assert!(!history.can_redo());
    }

    #[test]
    fn test_bounded_depth_evicts_oldest() {
        let mut world = GridWorld::default();
        let mut history = History::new(50);
        for i in 0..60 {
            history.snapshot(&world).unwrap();
            world.place_floor(i, 0);
        }
        assert_eq!(history.undo_len(), 50);
        let mut undone = 0;
        while history.undo(&mut world).unwrap() {
            undone += 1;
        }
        assert_eq!(undone, 50);
        // the oldest surviving snapshot was taken after floors 0..10 existed
        assert_eq!(world.floor_count(), 10);
        assert_eq!(history.redo_len(), 50);
    }
}
