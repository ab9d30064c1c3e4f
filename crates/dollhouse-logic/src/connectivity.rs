//! Wall- and door-aware adjacency, plus closed-room detection.
//!
//! Two notions of "wall between cells":
//! - structural: the wall record exists (room enclosure ignores doors)
//! - blocking: the wall exists and no open door overrides it (movement)

use std::collections::{BTreeSet, VecDeque};

use crate::grid::{Cell, GridWorld, WallDir, WallKey};

/// Wall identity separating two Manhattan-adjacent cells.
/// Returns `None` for any other pair.
pub fn separating_wall(a: Cell, b: Cell) -> Option<WallKey> {
    if a.manhattan(b) != 1 {
        return None;
    }
    if a.z == b.z {
        Some(WallKey::new(a.x.max(b.x), a.z, WallDir::Z))
    } else {
        Some(WallKey::new(a.x, a.z.max(b.z), WallDir::X))
    }
}

/// Structural wall test: true if a wall record separates `a` and `b`,
/// regardless of doors.
pub fn has_wall_between_cells(world: &GridWorld, a: Cell, b: Cell) -> bool {
    separating_wall(a, b)
        .map(|key| world.has_wall(key))
        .unwrap_or(false)
}

/// Movement wall test: a wall blocks unless a door with matching cell and
/// orientation is set to open. Non-adjacent pairs never block.
pub fn has_blocking_wall_between_cells(world: &GridWorld, a: Cell, b: Cell) -> bool {
    let Some(key) = separating_wall(a, b) else {
        return false;
    };
    if !world.has_wall(key) {
        return false;
    }
    !world.door_at(key).map(|door| door.is_open()).unwrap_or(false)
}

/// Flood-fill the room containing `start` using structural walls.
///
/// Returns the room's cells if it is closed: the start has a floor and the
/// fill never crosses an open edge into a floorless cell or past the floor
/// bounding box (expanded by one cell).
pub fn closed_room(world: &GridWorld, start: Cell) -> Option<BTreeSet<Cell>> {
    if !world.has_floor_at(start.x, start.z) {
        return None;
    }
    let bounds = world.floor_bounds()?.expanded(1);

    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if has_wall_between_cells(world, current, next) {
                continue;
            }
            if !bounds.contains(next) || !world.has_floor_at(next.x, next.z) {
                return None;
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    Some(visited)
}

/// True if `start` lies in a fully enclosed, floored room.
pub fn is_closed_room_cell(world: &GridWorld, start: Cell) -> bool {
    closed_room(world, start).is_some()
}
