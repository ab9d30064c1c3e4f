//! Authoritative building grid: floors, wall segments, wall caps, furniture.
//!
//! Every placed object gets an [`EntityId`]; the presentation layer tags its
//! meshes with that id and resolves clicks through [`GridWorld::resolve`].
//!
//! Placement is idempotent. Removing a door or window restores the full wall
//! it was cut into and deletes the cap segments created for the opening.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::connectivity;
use crate::error::PlacementError;
use crate::furniture::{Furniture, FurnitureType};

/// Unit grid cell covering [x, x+1) × [z, z+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing a continuous world position.
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            z: z.floor() as i32,
        }
    }

    pub fn center(self) -> (f32, f32) {
        (self.x as f32 + 0.5, self.z as f32 + 0.5)
    }

    /// Grid distance, saturating at `i32::MAX`.
    pub fn manhattan(self, other: Cell) -> i32 {
        let d = self.x.abs_diff(other.x).saturating_add(self.z.abs_diff(other.z));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// 4-neighbors in +x, -x, +z, -z order. Neighbors past the `i32` range
    /// are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .filter_map(move |(dx, dz)| {
                Some(Cell::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?))
            })
    }
}

/// Wall alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WallDir {
    /// Spans one cell-length in X; separates rows z-1 and z.
    #[serde(rename = "x")]
    X,
    /// Spans one cell-length in Z; separates columns x-1 and x.
    #[serde(rename = "z")]
    Z,
}

/// Identity of a wall segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WallKey {
    pub x: i32,
    pub z: i32,
    pub dir: WallDir,
}

impl WallKey {
    pub const fn new(x: i32, z: i32, dir: WallDir) -> Self {
        Self { x, z, dir }
    }
}

/// Stable handle for anything placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: EntityId,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub key: WallKey,
    /// A door or window has been cut into this wall.
    pub has_opening: bool,
    /// False while the full wall is replaced by caps around an opening.
    pub full_visible: bool,
    /// Cap segments filling the wall on either side of the opening.
    pub caps: Vec<EntityId>,
}

/// Short filler wall beside a door/window opening. `start`/`end` are
/// offsets along the parent wall in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallCap {
    pub id: EntityId,
    pub wall: WallKey,
    pub start: f32,
    pub end: f32,
}

/// What an [`EntityId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Floor(Cell),
    Wall(WallKey),
    Cap(WallKey),
    Furniture(FurnitureType),
}

/// An object removed from the grid whose visual removal is still pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDestroy {
    pub id: EntityId,
    pub kind: EntityKind,
    pub remaining: f32,
}

/// Inclusive cell bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Bounds {
    pub fn expanded(self, margin: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            max_x: self.max_x.saturating_add(margin),
            min_z: self.min_z.saturating_sub(margin),
            max_z: self.max_z.saturating_add(margin),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x && cell.z >= self.min_z && cell.z <= self.max_z
    }
}

/// The building grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    floors: BTreeMap<Cell, Floor>,
    walls: BTreeMap<WallKey, Wall>,
    caps: BTreeMap<EntityId, WallCap>,
    furniture: BTreeMap<EntityId, Furniture>,
    furniture_cells: BTreeMap<Cell, EntityId>,
    entities: BTreeMap<EntityId, EntityKind>,
    destroying: BTreeMap<EntityId, PendingDestroy>,
    next_id: u64,
    config: WorldConfig,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl GridWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            floors: BTreeMap::new(),
            walls: BTreeMap::new(),
            caps: BTreeMap::new(),
            furniture: BTreeMap::new(),
            furniture_cells: BTreeMap::new(),
            entities: BTreeMap::new(),
            destroying: BTreeMap::new(),
            next_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    fn allocate(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, kind);
        id
    }

    // ── Placement ──────────────────────────────────────────────────────

    /// Place a floor. Returns the existing id if one is already there.
    pub fn place_floor(&mut self, x: i32, z: i32) -> EntityId {
        let cell = Cell::new(x, z);
        if let Some(floor) = self.floors.get(&cell) {
            return floor.id;
        }
        let id = self.allocate(EntityKind::Floor(cell));
        self.floors.insert(cell, Floor { id, cell });
        id
    }

    /// Place a wall segment. Returns the existing id if identical.
    pub fn place_wall(&mut self, x: i32, z: i32, dir: WallDir) -> EntityId {
        let key = WallKey::new(x, z, dir);
        if let Some(wall) = self.walls.get(&key) {
            return wall.id;
        }
        let id = self.allocate(EntityKind::Wall(key));
        self.walls.insert(
            key,
            Wall {
                id,
                key,
                has_opening: false,
                full_visible: true,
                caps: Vec::new(),
            },
        );
        if let Some(width) = self.opening_at(key).map(|f| self.opening_width(f.kind)) {
            self.carve_opening(key, width);
        }
        id
    }

    /// Place a furniture item on a cell.
    ///
    /// Ceiling lights require the cell to be inside a closed room. Doors and
    /// windows cut an opening into the wall matching their cell and
    /// orientation, if one exists.
    pub fn place_furniture(
        &mut self,
        x: i32,
        z: i32,
        kind: FurnitureType,
        rotation_y: f32,
    ) -> Result<EntityId, PlacementError> {
        let cell = Cell::new(x, z);
        if self.furniture_cells.contains_key(&cell) {
            return Err(PlacementError::CellOccupied { x, z });
        }
        if kind == FurnitureType::CeilingLight && !connectivity::is_closed_room_cell(self, cell) {
            return Err(PlacementError::NotInClosedRoom { x, z });
        }

        let id = self.allocate(EntityKind::Furniture(kind));
        let item = Furniture::new(id, cell, kind, rotation_y);
        let wall_key = WallKey::new(x, z, item.orientation);
        self.furniture.insert(id, item);
        self.furniture_cells.insert(cell, id);

        if kind.is_opening() && self.walls.contains_key(&wall_key) {
            self.carve_opening(wall_key, self.opening_width(kind));
        }
        Ok(id)
    }

    fn opening_width(&self, kind: FurnitureType) -> f32 {
        match kind {
            FurnitureType::Window => self.config.window_width,
            _ => self.config.door_width,
        }
    }

    /// Replace the full wall with caps on either side of a centered opening.
    fn carve_opening(&mut self, key: WallKey, width: f32) {
        let width = width.clamp(0.0, 1.0);
        let Some(wall) = self.walls.get(&key) else {
            return;
        };
        if wall.has_opening {
            return;
        }
        let side = (1.0 - width) / 2.0;
        let mut caps = Vec::new();
        if side > 0.0 {
            for (start, end) in [(0.0, side), (1.0 - side, 1.0)] {
                let id = self.allocate(EntityKind::Cap(key));
                self.caps.insert(
                    id,
                    WallCap {
                        id,
                        wall: key,
                        start,
                        end,
                    },
                );
                caps.push(id);
            }
        }
        if let Some(wall) = self.walls.get_mut(&key) {
            wall.has_opening = true;
            wall.full_visible = false;
            wall.caps = caps;
        }
    }

    /// Undo [`Self::carve_opening`]: full wall visible again, caps deleted.
    fn restore_wall(&mut self, key: WallKey) {
        let Some(wall) = self.walls.get_mut(&key) else {
            return;
        };
        wall.has_opening = false;
        wall.full_visible = true;
        let caps = std::mem::take(&mut wall.caps);
        for cap in caps {
            self.caps.remove(&cap);
            self.entities.remove(&cap);
        }
    }

    // ── Removal ────────────────────────────────────────────────────────

    /// Remove any entity immediately. Returns what was removed.
    pub fn remove(&mut self, id: EntityId) -> Option<EntityKind> {
        let kind = *self.entities.get(&id)?;
        match kind {
            EntityKind::Floor(cell) => {
                self.floors.remove(&cell);
            }
            EntityKind::Wall(key) => {
                self.restore_wall(key);
                self.walls.remove(&key);
            }
            EntityKind::Cap(key) => {
                self.caps.remove(&id);
                if let Some(wall) = self.walls.get_mut(&key) {
                    wall.caps.retain(|c| *c != id);
                }
            }
            EntityKind::Furniture(_) => {
                if let Some(item) = self.furniture.remove(&id) {
                    self.furniture_cells.remove(&item.cell);
                    if item.kind.is_opening() {
                        self.restore_wall(WallKey::new(item.cell.x, item.cell.z, item.orientation));
                    }
                }
            }
        }
        self.entities.remove(&id);
        Some(kind)
    }

    pub fn remove_floor(&mut self, x: i32, z: i32) -> bool {
        match self.floors.get(&Cell::new(x, z)).map(|f| f.id) {
            Some(id) => self.remove(id).is_some(),
            None => false,
        }
    }

    pub fn remove_wall(&mut self, x: i32, z: i32, dir: WallDir) -> bool {
        match self.walls.get(&WallKey::new(x, z, dir)).map(|w| w.id) {
            Some(id) => self.remove(id).is_some(),
            None => false,
        }
    }

    pub fn remove_furniture_at(&mut self, x: i32, z: i32) -> bool {
        match self.furniture_cells.get(&Cell::new(x, z)).copied() {
            Some(id) => self.remove(id).is_some(),
            None => false,
        }
    }

    /// Remove an entity now and keep it in the destroy queue for the
    /// shrink/fade delay. Re-scheduling an entity already being destroyed
    /// is a no-op. Returns true if the entity was newly scheduled.
    pub fn schedule_destroy(&mut self, id: EntityId) -> bool {
        if self.destroying.contains_key(&id) {
            return false;
        }
        let Some(kind) = self.remove(id) else {
            return false;
        };
        self.destroying.insert(
            id,
            PendingDestroy {
                id,
                kind,
                remaining: self.config.destroy_delay,
            },
        );
        true
    }

    pub fn is_destroying(&self, id: EntityId) -> bool {
        self.destroying.contains_key(&id)
    }

    /// Count down pending destroys; returns the ones whose visuals should
    /// now be dropped.
    pub fn advance_destroys(&mut self, dt: f32) -> Vec<PendingDestroy> {
        let mut finished = Vec::new();
        for pending in self.destroying.values_mut() {
            pending.remaining -= dt;
        }
        self.destroying.retain(|_, pending| {
            if pending.remaining <= 0.0 {
                finished.push(pending.clone());
                false
            } else {
                true
            }
        });
        finished
    }

    /// Remove every floor, wall and furniture item.
    pub fn clear(&mut self) {
        self.floors.clear();
        self.walls.clear();
        self.caps.clear();
        self.furniture.clear();
        self.furniture_cells.clear();
        self.entities.clear();
    }

    // ── Door / light state ─────────────────────────────────────────────

    /// Set a door's or window's open target. Returns false if `id` is not
    /// an opening.
    pub fn set_open(&mut self, id: EntityId, open: bool) -> bool {
        match self.furniture.get_mut(&id).and_then(|f| f.opening.as_mut()) {
            Some(state) => {
                state.open_target = open;
                true
            }
            None => false,
        }
    }

    /// Flip a door's or window's open target; returns the new target.
    pub fn toggle_open(&mut self, id: EntityId) -> Option<bool> {
        let state = self.furniture.get_mut(&id)?.opening.as_mut()?;
        state.open_target = !state.open_target;
        Some(state.open_target)
    }

    pub fn set_light_on(&mut self, id: EntityId, on: bool) -> bool {
        match self.furniture.get_mut(&id).and_then(|f| f.light_on.as_mut()) {
            Some(light) => {
                *light = on;
                true
            }
            None => false,
        }
    }

    pub fn toggle_light(&mut self, id: EntityId) -> Option<bool> {
        let light = self.furniture.get_mut(&id)?.light_on.as_mut()?;
        *light = !*light;
        Some(*light)
    }

    /// Move every door/window's open progress toward its target.
    pub fn advance_openings(&mut self, dt: f32) {
        let step = self.config.open_speed * dt;
        for state in self.furniture.values_mut().filter_map(|f| f.opening.as_mut()) {
            state.advance(step);
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn resolve(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).copied()
    }

    pub fn has_floor_at(&self, x: i32, z: i32) -> bool {
        self.floors.contains_key(&Cell::new(x, z))
    }

    pub fn has_wall(&self, key: WallKey) -> bool {
        self.walls.contains_key(&key)
    }

    pub fn wall(&self, key: WallKey) -> Option<&Wall> {
        self.walls.get(&key)
    }

    pub fn cap(&self, id: EntityId) -> Option<&WallCap> {
        self.caps.get(&id)
    }

    pub fn furniture(&self, id: EntityId) -> Option<&Furniture> {
        self.furniture.get(&id)
    }

    pub fn furniture_at(&self, x: i32, z: i32) -> Option<&Furniture> {
        self.furniture_cells
            .get(&Cell::new(x, z))
            .and_then(|id| self.furniture.get(id))
    }

    /// Door or window whose cell and orientation match a wall identity.
    pub fn opening_at(&self, key: WallKey) -> Option<&Furniture> {
        self.furniture_at(key.x, key.z)
            .filter(|f| f.kind.is_opening() && f.orientation == key.dir)
    }

    /// Door matching a wall identity.
    pub fn door_at(&self, key: WallKey) -> Option<&Furniture> {
        self.opening_at(key).filter(|f| f.kind == FurnitureType::Door)
    }

    /// Floor present and no blocking furniture on the cell.
    pub fn is_cell_walkable(&self, x: i32, z: i32) -> bool {
        self.has_floor_at(x, z)
            && self
                .furniture_at(x, z)
                .map(|f| f.kind.is_passable())
                .unwrap_or(true)
    }

    /// Nearest furniture of one of `kinds` by squared distance from `origin`.
    /// Ties keep the lowest id.
    pub fn nearest_furniture_of_types(
        &self,
        kinds: &[FurnitureType],
        origin: (f32, f32),
    ) -> Option<&Furniture> {
        let mut best: Option<(&Furniture, f32)> = None;
        for item in self.furniture.values().filter(|f| kinds.contains(&f.kind)) {
            let (cx, cz) = item.center();
            let d2 = (cx - origin.0).powi(2) + (cz - origin.1).powi(2);
            if best.map(|(_, bd)| d2 < bd).unwrap_or(true) {
                best = Some((item, d2));
            }
        }
        best.map(|(item, _)| item)
    }

    /// Nearest furniture of a single type.
    pub fn furniture_of_type_near(
        &self,
        kind: FurnitureType,
        origin: (f32, f32),
    ) -> Option<&Furniture> {
        self.nearest_furniture_of_types(&[kind], origin)
    }

    /// True if any lit ceiling light is within `radius_sq` of `pos`.
    pub fn lit_light_within(&self, pos: (f32, f32), radius_sq: f32) -> bool {
        self.furniture.values().any(|f| {
            if !f.is_lit() {
                return false;
            }
            let (cx, cz) = f.center();
            (cx - pos.0).powi(2) + (cz - pos.1).powi(2) <= radius_sq
        })
    }

    /// Bounding box of all floor cells.
    pub fn floor_bounds(&self) -> Option<Bounds> {
        let mut cells = self.floors.keys();
        let first = cells.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_z: first.z,
            max_z: first.z,
        };
        for cell in cells {
            bounds.min_x = bounds.min_x.min(cell.x);
            bounds.max_x = bounds.max_x.max(cell.x);
            bounds.min_z = bounds.min_z.min(cell.z);
            bounds.max_z = bounds.max_z.max(cell.z);
        }
        Some(bounds)
    }

    pub fn floors(&self) -> impl Iterator<Item = &Floor> {
        self.floors.values()
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.values()
    }

    pub fn caps(&self) -> impl Iterator<Item = &WallCap> {
        self.caps.values()
    }

    pub fn furnitures(&self) -> impl Iterator<Item = &Furniture> {
        self.furniture.values()
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn furniture_count(&self) -> usize {
        self.furniture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty() && self.walls.is_empty() && self.furniture.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_floor_idempotent() {
        let mut world = GridWorld::default();
        let a = world.place_floor(2, 3);
        let b = world.place_floor(2, 3);
        assert_eq!(a, b);
        assert_eq!(world.floor_count(), 1);
        assert!(world.has_floor_at(2, 3));
    }

    #[test]
    fn test_place_wall_idempotent_per_direction() {
        let mut world = GridWorld::default();
        let a = world.place_wall(1, 0, WallDir::Z);
        let b = world.place_wall(1, 0, WallDir::Z);
        let c = world.place_wall(1, 0, WallDir::X);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(world.wall_count(), 2);
    }

    #[test]
    fn test_furniture_one_per_cell() {
        let mut world = GridWorld::default();
        world.place_floor(0, 0);
        assert!(world.place_furniture(0, 0, FurnitureType::Bed, 0.0).is_ok());
        assert_eq!(
            world.place_furniture(0, 0, FurnitureType::Sofa, 0.0),
            Err(PlacementError::CellOccupied { x: 0, z: 0 })
        );
        assert_eq!(world.furniture_count(), 1);
    }

    #[test]
    fn test_walkability() {
        let mut world = GridWorld::default();
        assert!(!world.is_cell_walkable(0, 0));
        world.place_floor(0, 0);
        world.place_floor(1, 0);
        world.place_floor(2, 0);
        world.place_furniture(0, 0, FurnitureType::Bed, 0.0).unwrap();
        world.place_furniture(1, 0, FurnitureType::Door, 0.0).unwrap();
        assert!(!world.is_cell_walkable(0, 0));
        assert!(world.is_cell_walkable(1, 0));
        assert!(world.is_cell_walkable(2, 0));
    }

    #[test]
    fn test_ceiling_light_requires_closed_room() {
        let mut world = GridWorld::default();
        world.place_floor(0, 0);
        assert_eq!(
            world.place_furniture(0, 0, FurnitureType::CeilingLight, 0.0),
            Err(PlacementError::NotInClosedRoom { x: 0, z: 0 })
        );
        world.place_wall(0, 0, WallDir::X);
        world.place_wall(0, 1, WallDir::X);
        world.place_wall(0, 0, WallDir::Z);
        world.place_wall(1, 0, WallDir::Z);
        assert!(world
            .place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
            .is_ok());
    }

    #[test]
    fn test_door_carves_opening_and_removal_restores_wall() {
        let mut world = GridWorld::default();
        let key = WallKey::new(1, 0, WallDir::Z);
        world.place_wall(1, 0, WallDir::Z);
        let door = world
            .place_furniture(1, 0, FurnitureType::Door, std::f32::consts::FRAC_PI_2)
            .unwrap();

        let wall = world.wall(key).unwrap();
        assert!(wall.has_opening);
        assert!(!wall.full_visible);
        assert_eq!(wall.caps.len(), 2);
        let caps = wall.caps.clone();
        let cap = world.cap(caps[0]).unwrap();
        assert!((cap.end - cap.start - 0.1).abs() < 1e-6);

        world.remove(door);
        let wall = world.wall(key).unwrap();
        assert!(!wall.has_opening);
        assert!(wall.full_visible);
        assert!(wall.caps.is_empty());
        for cap in caps {
            assert!(world.cap(cap).is_none());
            assert!(world.resolve(cap).is_none());
        }
    }

    #[test]
    fn test_wall_placed_after_door_is_carved() {
        let mut world = GridWorld::default();
        world.place_furniture(3, 2, FurnitureType::Window, 0.0).unwrap();
        world.place_wall(3, 2, WallDir::X);
        assert!(world.wall(WallKey::new(3, 2, WallDir::X)).unwrap().has_opening);
    }

    #[test]
    fn test_door_with_mismatched_orientation_leaves_wall_alone() {
        let mut world = GridWorld::default();
        world.place_wall(1, 0, WallDir::Z);
        world.place_furniture(1, 0, FurnitureType::Door, 0.0).unwrap();
        assert!(!world.wall(WallKey::new(1, 0, WallDir::Z)).unwrap().has_opening);
    }

    #[test]
    fn test_schedule_destroy_is_idempotent() {
        let mut world = GridWorld::default();
        let floor = world.place_floor(0, 0);
        assert!(world.schedule_destroy(floor));
        assert!(!world.has_floor_at(0, 0));
        assert!(world.is_destroying(floor));
        assert!(!world.schedule_destroy(floor));

        assert!(world.advance_destroys(0.1).is_empty());
        let finished = world.advance_destroys(0.15);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].kind, EntityKind::Floor(Cell::new(0, 0)));
        assert!(!world.is_destroying(floor));
    }

    #[test]
    fn test_scheduled_door_destroy_restores_wall() {
        let mut world = GridWorld::default();
        world.place_wall(0, 1, WallDir::X);
        let door = world.place_furniture(0, 1, FurnitureType::Door, 0.0).unwrap();
        world.schedule_destroy(door);
        let wall = world.wall(WallKey::new(0, 1, WallDir::X)).unwrap();
        assert!(wall.full_visible);
        assert!(wall.caps.is_empty());
    }

    #[test]
    fn test_nearest_furniture() {
        let mut world = GridWorld::default();
        let far = world.place_furniture(10, 10, FurnitureType::Food, 0.0).unwrap();
        let near = world.place_furniture(2, 1, FurnitureType::Fridge, 0.0).unwrap();
        world.place_furniture(1, 1, FurnitureType::Bed, 0.0).unwrap();

        let found = world
            .nearest_furniture_of_types(&[FurnitureType::Food, FurnitureType::Fridge], (0.5, 0.5))
            .unwrap();
        assert_eq!(found.id, near);
        let found = world
            .furniture_of_type_near(FurnitureType::Food, (0.5, 0.5))
            .unwrap();
        assert_eq!(found.id, far);
        assert!(world
            .furniture_of_type_near(FurnitureType::Tv, (0.5, 0.5))
            .is_none());
    }

    #[test]
    fn test_door_and_light_toggles() {
        let mut world = GridWorld::default();
        let door = world.place_furniture(0, 0, FurnitureType::Door, 0.0).unwrap();
        let bed = world.place_furniture(1, 0, FurnitureType::Bed, 0.0).unwrap();
        assert_eq!(world.toggle_open(door), Some(true));
        assert!(world.furniture(door).unwrap().is_open());
        assert!(!world.set_open(bed, true));
        assert_eq!(world.toggle_light(bed), None);

        world.advance_openings(0.2);
        let progress = world.furniture(door).unwrap().opening.unwrap().open_progress;
        assert!((progress - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_floor_bounds() {
        let mut world = GridWorld::default();
        assert!(world.floor_bounds().is_none());
        world.place_floor(-2, 1);
        world.place_floor(3, 4);
        let b = world.floor_bounds().unwrap();
        assert_eq!((b.min_x, b.max_x, b.min_z, b.max_z), (-2, 3, 1, 4));
        let e = b.expanded(1);
        assert!(e.contains(Cell::new(-3, 0)));
        assert!(!e.contains(Cell::new(-4, 0)));
    }

    #[test]
    fn test_extreme_coordinates_stay_in_range() {
        let corner = Cell::new(i32::MAX, i32::MIN);
        let around: Vec<Cell> = corner.neighbors().collect();
        assert_eq!(
            around,
            vec![Cell::new(i32::MAX - 1, i32::MIN), Cell::new(i32::MAX, i32::MIN + 1)]
        );
        assert_eq!(corner.manhattan(Cell::new(i32::MIN, i32::MAX)), i32::MAX);

        let b = Bounds {
            min_x: i32::MIN,
            max_x: i32::MAX,
            min_z: 0,
            max_z: 0,
        }
        .expanded(1);
        assert_eq!((b.min_x, b.max_x, b.min_z, b.max_z), (i32::MIN, i32::MAX, -1, 1));
    }

    #[test]
    fn test_resolve_entity_ids() {
        let mut world = GridWorld::default();
        let floor = world.place_floor(0, 0);
        let wall = world.place_wall(0, 0, WallDir::X);
        let bed = world.place_furniture(0, 0, FurnitureType::Bed, 0.0).unwrap();
        assert_eq!(world.resolve(floor), Some(EntityKind::Floor(Cell::new(0, 0))));
        assert_eq!(
            world.resolve(wall),
            Some(EntityKind::Wall(WallKey::new(0, 0, WallDir::X)))
        );
        assert_eq!(world.resolve(bed), Some(EntityKind::Furniture(FurnitureType::Bed)));
        world.clear();
        assert!(world.resolve(bed).is_none());
        assert!(world.is_empty());
    }
}
