//! Grid pathfinding over walkable cells.
//!
//! BFS with 4-connectivity, bounded to the floor bounding box expanded by
//! one cell. An edge is traversable when the destination is walkable and no
//! blocking wall separates the two cells (open doors let you through).

use std::collections::{HashMap, VecDeque};

use crate::connectivity::has_blocking_wall_between_cells;
use crate::grid::{Cell, GridWorld};

/// Can the character step from `a` into the adjacent cell `b`?
fn can_step(world: &GridWorld, a: Cell, b: Cell) -> bool {
    world.is_cell_walkable(b.x, b.z) && !has_blocking_wall_between_cells(world, a, b)
}

/// Shortest path from `start` to `target`, both inclusive.
///
/// Returns `None` if the target is not walkable or not reachable inside the
/// search bounds. Ties between equally short paths follow exploration order
/// (+x, -x, +z, -z).
pub fn find_path(world: &GridWorld, start: Cell, target: Cell) -> Option<Vec<Cell>> {
    if !world.is_cell_walkable(target.x, target.z) {
        return None;
    }
    if start == target {
        return Some(vec![start]);
    }
    let bounds = world.floor_bounds()?.expanded(1);

    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut queue: VecDeque<Cell> = VecDeque::new();
    came_from.insert(start, start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if !bounds.contains(next) || came_from.contains_key(&next) {
                continue;
            }
            if !can_step(world, current, next) {
                continue;
            }
            came_from.insert(next, current);
            if next == target {
                return Some(reconstruct(&came_from, start, target));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, start: Cell, target: Cell) -> Vec<Cell> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Continuous-position movement check used for direct (keyboard) control.
///
/// Moves within one cell are always allowed. Otherwise the destination cell
/// must be walkable and no blocking wall may separate the two cells. Only
/// adjacent cells can be separated by a wall, so diagonal and longer moves
/// only check the destination.
pub fn can_move_character_to(world: &GridWorld, from: (f32, f32), to: (f32, f32)) -> bool {
    let a = Cell::containing(from.0, from.1);
    let b = Cell::containing(to.0, to.1);
    a == b || can_step(world, a, b)
}
