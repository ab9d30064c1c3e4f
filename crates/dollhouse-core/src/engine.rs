//! Simulation engine - owns one house, one character and everything that
//! drives it.
//!
//! Each call to [`Simulation::tick`] runs, in order:
//! 1. scheduled destroys and door/window animation
//! 2. interaction-state timers (sleep blend, pillow fight expiry)
//! 3. movement: held directional input, else path following and arrival
//! 4. needs decay/recovery
//! 5. the decision pass (critical need, then free will)

use std::collections::BTreeSet;
use std::io::{Read, Write};

use dollhouse_logic::agent::{compute_move, Character, MoveResult, PendingInteraction};
use dollhouse_logic::config::SimConfig;
use dollhouse_logic::connectivity;
use dollhouse_logic::decision::{
    check_refusal, decide, plan_interaction, DecisionReason, DecisionState, InteractionPlan,
};
use dollhouse_logic::error::{InteractError, LayoutError};
use dollhouse_logic::furniture::FurnitureType;
use dollhouse_logic::grid::{Cell, EntityId, EntityKind, GridWorld, WallDir, WallKey};
use dollhouse_logic::history::History;
use dollhouse_logic::interaction::{actions_for, ActionId, InteractionState};
use dollhouse_logic::layout::{self, ImportReport};
use dollhouse_logic::needs::{Mood, NeedKind, Needs, NeedsEngine};
use dollhouse_logic::pathfinding::find_path;
use dollhouse_logic::personality::Personality;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::persistence::{self, SaveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Soft user-facing message. Nothing in the engine fails hard; rejected
/// operations leave state untouched and queue one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Structured output for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// The character started walking toward an interaction.
    InteractionPlanned {
        reason: Option<DecisionReason>,
        furniture: EntityId,
        action: ActionId,
        approach: Cell,
    },
    /// The character reached its target and began the activity.
    InteractionStarted { furniture: EntityId, action: ActionId },
    StateChanged {
        from: InteractionState,
        to: InteractionState,
    },
    /// A scheduled destroy finished; drop the entity's visual.
    VisualRemoved { id: EntityId, kind: EntityKind },
}

pub struct Simulation {
    pub world: GridWorld,
    pub character: Character,
    pub needs: NeedsEngine,
    pub personality: Personality,
    history: History,
    decision: DecisionState,
    config: SimConfig,
    seed: u64,
    rng: StdRng,
    /// Held direction, unit length or zero.
    input: Option<(f32, f32)>,
    notices: Vec<Notice>,
    events: Vec<SimEvent>,
    /// Seconds since start.
    pub sim_time: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default(), 0)
    }
}

impl Simulation {
    /// Create an empty house. All randomness comes from `seed`.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            world: GridWorld::new(config.world.clone()),
            character: Character::default(),
            needs: NeedsEngine::default(),
            personality: Personality::default(),
            history: History::new(config.history_limit),
            decision: DecisionState::new(&config.decision, &mut rng),
            config,
            seed,
            rng,
            input: None,
            notices: Vec::new(),
            events: Vec::new(),
            sim_time: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Place the character idle on `cell`.
    pub fn spawn_character(&mut self, cell: Cell) {
        self.character = Character::at(cell);
        self.input = None;
    }

    fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
            NoticeLevel::Error => log::error!("{}", message),
        }
        self.notices.push(Notice { level, message });
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Building ───────────────────────────────────────────────────────

    fn record_history(&mut self) {
        if let Err(e) = self.history.snapshot(&self.world) {
            self.notice(NoticeLevel::Error, format!("could not record undo step: {}", e));
        }
    }

    pub fn place_floor(&mut self, x: i32, z: i32) -> EntityId {
        if !self.world.has_floor_at(x, z) {
            self.record_history();
        }
        self.world.place_floor(x, z)
    }

    pub fn place_wall(&mut self, x: i32, z: i32, dir: WallDir) -> EntityId {
        if !self.world.has_wall(WallKey::new(x, z, dir)) {
            self.record_history();
        }
        self.world.place_wall(x, z, dir)
    }

    /// Place furniture. Rejections become a warning notice.
    pub fn place_furniture(
        &mut self,
        x: i32,
        z: i32,
        kind: FurnitureType,
        rotation_y: f32,
    ) -> Option<EntityId> {
        if self.world.furniture_at(x, z).is_some() {
            log::debug!("{} at ({}, {}) ignored: cell occupied", kind, x, z);
            return None;
        }
        let before = self.world.clone();
        match self.world.place_furniture(x, z, kind, rotation_y) {
            Ok(id) => {
                if let Err(e) = self.history.snapshot(&before) {
                    self.notice(NoticeLevel::Error, format!("could not record undo step: {}", e));
                }
                Some(id)
            }
            Err(e) => {
                self.notice(NoticeLevel::Warning, e.to_string());
                None
            }
        }
    }

    /// Remove an entity immediately.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if self.world.resolve(id).is_none() {
            return false;
        }
        self.record_history();
        self.world.remove(id);
        self.drop_stale_target();
        true
    }

    /// Remove an entity with the shrink/fade delay. Idempotent.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if self.world.is_destroying(id) || self.world.resolve(id).is_none() {
            return false;
        }
        self.record_history();
        let scheduled = self.world.schedule_destroy(id);
        self.drop_stale_target();
        scheduled
    }

    /// Cancel a pending interaction whose furniture is gone.
    fn drop_stale_target(&mut self) {
        if let Some(pending) = self.character.pending {
            if self.world.furniture(pending.furniture).is_none() {
                self.character.cancel();
            }
        }
    }

    pub fn set_door_open(&mut self, id: EntityId, open: bool) -> bool {
        self.world.set_open(id, open)
    }

    pub fn toggle_door(&mut self, id: EntityId) -> Option<bool> {
        self.world.toggle_open(id)
    }

    pub fn set_light_on(&mut self, id: EntityId, on: bool) -> bool {
        self.world.set_light_on(id, on)
    }

    pub fn toggle_light(&mut self, id: EntityId) -> Option<bool> {
        self.world.toggle_light(id)
    }

    pub fn closed_room(&self, cell: Cell) -> Option<BTreeSet<Cell>> {
        connectivity::closed_room(&self.world, cell)
    }

    // ── History and layout ─────────────────────────────────────────────

    /// Record the current layout as an undo step.
    pub fn snapshot(&mut self) {
        self.record_history();
    }

    pub fn undo(&mut self) -> bool {
        self.step_history(true)
    }

    pub fn redo(&mut self) -> bool {
        self.step_history(false)
    }

    fn step_history(&mut self, undo: bool) -> bool {
        let result = if undo {
            self.history.undo(&mut self.world)
        } else {
            self.history.redo(&mut self.world)
        };
        match result {
            Ok(true) => {
                log::info!("{} applied", if undo { "undo" } else { "redo" });
                // ids are reassigned on restore
                self.character.cancel();
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.notice(NoticeLevel::Error, e.to_string());
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn export_layout_json(&self) -> Result<String, LayoutError> {
        layout::export_json(&self.world)
    }

    /// Replace the house with a layout. Malformed JSON changes nothing.
    pub fn import_layout_json(&mut self, json: &str) -> Option<ImportReport> {
        let doc = match layout::parse_layout(json) {
            Ok(doc) => doc,
            Err(e) => {
                self.notice(NoticeLevel::Error, format!("import failed: {}", e));
                return None;
            }
        };
        self.record_history();
        let report = layout::apply_layout(&mut self.world, &doc);
        self.character.cancel();
        log::info!(
            "imported layout: {} floors, {} walls, {} furnitures",
            report.floors,
            report.walls,
            report.furnitures
        );
        for (record, err) in &report.rejected {
            self.notice(
                NoticeLevel::Warning,
                format!("skipped {} at ({}, {}): {}", record.kind, record.x, record.z, err),
            );
        }
        Some(report)
    }

    // ── Character commands ─────────────────────────────────────────────

    /// User-requested interaction. May be refused depending on mood and
    /// personality; refusal happens before the current activity is touched.
    pub fn interact(&mut self, furniture: EntityId, action: ActionId) -> Result<(), InteractError> {
        let result = self.try_interact(furniture, action);
        if let Err(e) = &result {
            let level = match e {
                InteractError::Refused { .. } => NoticeLevel::Info,
                _ => NoticeLevel::Warning,
            };
            self.notice(level, e.to_string());
        }
        result
    }

    fn try_interact(&mut self, furniture: EntityId, action: ActionId) -> Result<(), InteractError> {
        let kind = self
            .world
            .furniture(furniture)
            .ok_or(InteractError::UnknownFurniture)?
            .kind;
        if !actions_for(kind).contains(&action) {
            return Err(InteractError::UnsupportedAction { action });
        }
        check_refusal(&self.personality, self.needs.mood(), action, &mut self.rng)?;
        let plan = plan_interaction(&self.world, self.character.cell(), furniture, action)?;
        self.input = None;
        self.character.player_driving = false;
        self.start_plan(plan, None);
        Ok(())
    }

    /// Interact using the furniture's default action.
    pub fn interact_default(&mut self, furniture: EntityId) -> Result<(), InteractError> {
        let kind = self
            .world
            .furniture(furniture)
            .ok_or(InteractError::UnknownFurniture)?
            .kind;
        match actions_for(kind).first() {
            Some(action) => self.interact(furniture, *action),
            None => {
                let err = InteractError::NotInteractive { kind };
                self.notice(NoticeLevel::Warning, err.to_string());
                Err(err)
            }
        }
    }

    fn start_plan(&mut self, plan: InteractionPlan, reason: Option<DecisionReason>) {
        self.set_state(InteractionState::Idle);
        self.character.cancel();
        self.character.set_path(plan.path);
        self.character.pending = Some(PendingInteraction {
            furniture: plan.furniture,
            action: plan.action,
        });
        self.events.push(SimEvent::InteractionPlanned {
            reason,
            furniture: plan.furniture,
            action: plan.action,
            approach: plan.approach,
        });
    }

    /// Walk to `cell` without interacting.
    pub fn move_to(&mut self, cell: Cell) -> bool {
        match find_path(&self.world, self.character.cell(), cell) {
            Some(path) => {
                self.input = None;
                self.set_state(InteractionState::Idle);
                self.character.cancel();
                self.character.player_driving = false;
                self.character.set_path(path);
                true
            }
            None => {
                self.notice(
                    NoticeLevel::Info,
                    format!("no path to ({}, {})", cell.x, cell.z),
                );
                false
            }
        }
    }

    /// Hold a direction. Cancels any path or activity.
    pub fn player_input(&mut self, dx: f32, dz: f32) {
        let len = (dx * dx + dz * dz).sqrt();
        if !len.is_finite() || len < 1e-6 {
            self.release_input();
            return;
        }
        self.set_state(InteractionState::Idle);
        self.character.cancel();
        self.character.player_driving = true;
        self.input = Some((dx / len, dz / len));
    }

    pub fn release_input(&mut self) {
        self.input = None;
        self.character.player_driving = false;
    }

    /// Explicitly stop whatever the character is doing.
    pub fn cancel(&mut self) {
        self.set_state(InteractionState::Idle);
        self.character.cancel();
    }

    /// Arrival reported by an external animation layer.
    pub fn notify_arrival(&mut self) {
        self.character.finish_path();
        self.arrive();
    }

    fn set_state(&mut self, to: InteractionState) {
        let from = self.character.state;
        if from != to {
            self.character.enter_state(to);
            self.events.push(SimEvent::StateChanged { from, to });
        }
    }

    fn arrive(&mut self) {
        let Some(pending) = self.character.pending.take() else {
            return;
        };
        let Some(target) = self.world.furniture(pending.furniture) else {
            self.notice(NoticeLevel::Info, "the furniture is gone");
            return;
        };
        let (tx, tz) = target.center();
        let (dx, dz) = (tx - self.character.x, tz - self.character.z);
        if dx.abs() > 1e-6 || dz.abs() > 1e-6 {
            self.character.yaw = dx.atan2(dz);
        }
        self.set_state(pending.action.entry_state());
        self.events.push(SimEvent::InteractionStarted {
            furniture: pending.furniture,
            action: pending.action,
        });
    }

    // ── Needs, mood, personality ───────────────────────────────────────

    pub fn needs(&self) -> Needs {
        self.needs.snapshot()
    }

    pub fn set_needs(&mut self, needs: Needs) {
        self.needs.set_snapshot(needs);
    }

    pub fn set_need_value(&mut self, need: NeedKind, value: f32) -> bool {
        self.needs.set_need_value(need, value)
    }

    pub fn add_need_value(&mut self, need: NeedKind, delta: f32) -> bool {
        self.needs.add_need_value(need, delta)
    }

    pub fn set_ticking(&mut self, ticking: bool) {
        self.needs.ticking = ticking;
    }

    pub fn mood(&self) -> Mood {
        self.needs.mood()
    }

    pub fn set_mood_override(&mut self, mood: Option<Mood>) {
        match mood {
            Some(mood) => self.needs.set_mood_override(mood),
            None => self.needs.clear_mood_override(),
        }
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn personality_mut(&mut self) -> &mut Personality {
        &mut self.personality
    }

    // ── Tick ───────────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.sim_time += dt as f64;

        for done in self.world.advance_destroys(dt) {
            self.events.push(SimEvent::VisualRemoved {
                id: done.id,
                kind: done.kind,
            });
        }
        self.world.advance_openings(dt);

        let from = self.character.state;
        if let Some(to) = self.character.advance_state(dt, &self.config.interaction) {
            self.events.push(SimEvent::StateChanged { from, to });
        }

        self.update_movement(dt);

        let recovering = self.character.state.recovers();
        let lit = recovering == Some(NeedKind::Sleep)
            && self
                .world
                .lit_light_within(self.character.position(), self.config.needs.light_radius_sq);
        self.needs.tick(dt, &self.config.needs, recovering, lit);

        let needs = self.needs.snapshot();
        let decision = decide(
            &self.world,
            &self.character,
            &needs,
            &self.personality,
            &self.config,
            &mut self.decision,
            dt,
            &mut self.rng,
        );
        if let Some(decision) = decision {
            log::info!(
                "{:?}: {} on {:?}",
                decision.reason,
                decision.plan.action,
                decision.plan.furniture
            );
            self.start_plan(decision.plan, Some(decision.reason));
        }
    }

    fn update_movement(&mut self, dt: f32) {
        let speed = self.config.movement.walk_speed;
        if let Some((dx, dz)) = self.input {
            let step = speed * dt;
            match compute_move(&self.world, self.character.position(), dx * step, dz * step) {
                MoveResult::Moved { x, z } | MoveResult::Slide { x, z } => {
                    let (mx, mz) = (x - self.character.x, z - self.character.z);
                    if mx.abs() > 1e-6 || mz.abs() > 1e-6 {
                        self.character.yaw = mx.atan2(mz);
                    }
                    self.character.x = x;
                    self.character.z = z;
                }
                MoveResult::Blocked => {}
            }
            return;
        }

        if !self.character.path.is_empty() {
            if self.character.step_along_path(dt, speed) {
                self.arrive();
            }
        } else if self.character.pending.is_some() {
            // already standing at the approach cell
            self.arrive();
        }
    }

    // ── Save / load ────────────────────────────────────────────────────

    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_simulation(writer, self)?;
        log::info!("saved simulation at t={:.1}s", self.sim_time);
        Ok(())
    }

    /// Replace this simulation with a saved one. Undo history and queued
    /// notices are cleared; the RNG is reseeded from the saved seed.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_simulation(reader)?;
        let mut rng = StdRng::seed_from_u64(loaded.seed);
        self.decision = DecisionState::new(&loaded.config.decision, &mut rng);
        self.history = History::new(loaded.config.history_limit);
        self.world = loaded.world;
        self.character = loaded.character;
        self.needs = loaded.needs;
        self.personality = loaded.personality;
        self.config = loaded.config;
        self.seed = loaded.seed;
        self.rng = rng;
        self.input = None;
        self.character.player_driving = false;
        self.notices.clear();
        self.events.clear();
        self.sim_time = loaded.sim_time;
        log::info!("loaded simulation at t={:.1}s", self.sim_time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn walled_room(sim: &mut Simulation, x0: i32, z0: i32, w: i32, d: i32) {
        for x in x0..x0 + w {
            for z in z0..z0 + d {
                sim.place_floor(x, z);
            }
            sim.place_wall(x, z0, WallDir::X);
            sim.place_wall(x, z0 + d, WallDir::X);
        }
        for z in z0..z0 + d {
            sim.place_wall(x0, z, WallDir::Z);
            sim.place_wall(x0 + w, z, WallDir::Z);
        }
    }

    fn calm_sim() -> Simulation {
        let mut config = SimConfig::default();
        config.decision.idle_base = 1.0e6;
        Simulation::new(config, 42)
    }

    fn run(sim: &mut Simulation, seconds: f32) {
        let steps = (seconds / 0.1).round() as usize;
        for _ in 0..steps {
            sim.tick(0.1);
        }
    }

    #[test]
    fn test_interact_walks_then_starts_activity() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 4, 1);
        let tv = sim.place_furniture(3, 0, FurnitureType::Tv, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));

        sim.interact(tv, ActionId::TvWatch).unwrap();
        assert!(sim.character.pending.is_some());
        run(&mut sim, 3.0);
        assert_eq!(sim.character.state, InteractionState::TvWatch);
        assert_eq!(sim.character.cell(), Cell::new(2, 0));
        let events = sim.take_events();
        assert!(events.contains(&SimEvent::InteractionStarted {
            furniture: tv,
            action: ActionId::TvWatch
        }));
    }

    #[test]
    fn test_refusal_leaves_current_activity() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 3, 1);
        let sofa = sim.place_furniture(2, 0, FurnitureType::Sofa, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.character.enter_state(InteractionState::TableSit);
        sim.set_mood_override(Some(Mood::BreakingDown));

        let err = sim.interact(sofa, ActionId::SofaSit).unwrap_err();
        assert!(matches!(err, InteractError::Refused { certain: true, .. }));
        assert_eq!(sim.character.state, InteractionState::TableSit);
        assert_eq!(sim.take_notices().len(), 1);
    }

    #[test]
    fn test_unreachable_interaction_changes_nothing() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 2, 1);
        walled_room(&mut sim, 3, 0, 2, 1);
        let bed = sim.place_furniture(4, 0, FurnitureType::Bed, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        assert_eq!(sim.interact(bed, ActionId::Sleep), Err(InteractError::Unreachable));
        assert!(sim.character.pending.is_none());
        assert!(sim.character.path.is_empty());
    }

    #[test]
    fn test_default_action() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 3, 1);
        let bed = sim.place_furniture(2, 0, FurnitureType::Bed, 0.0).unwrap();
        let light = sim
            .place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
            .unwrap();
        sim.spawn_character(Cell::new(0, 0));
        assert_eq!(
            sim.interact_default(light),
            Err(InteractError::NotInteractive {
                kind: FurnitureType::CeilingLight
            })
        );
        sim.interact_default(bed).unwrap();
        assert_eq!(
            sim.character.pending.map(|p| p.action),
            Some(ActionId::Sleep)
        );
    }

    #[test]
    fn test_sleep_blends_then_recovers() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 2, 1);
        let bed = sim.place_furniture(1, 0, FurnitureType::Bed, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.set_need_value(NeedKind::Sleep, 50.0);
        sim.interact(bed, ActionId::Sleep).unwrap();

        sim.tick(0.1);
        assert_eq!(sim.character.state, InteractionState::SleepEnter);
        run(&mut sim, 1.5);
        assert_eq!(sim.character.state, InteractionState::Sleep);
        let before = sim.needs().sleep;
        run(&mut sim, 5.0);
        assert!(sim.needs().sleep > before);
    }

    #[test]
    fn test_lit_light_slows_sleep() {
        let mut dark = calm_sim();
        walled_room(&mut dark, 0, 0, 2, 1);
        dark.place_furniture(1, 0, FurnitureType::Bed, 0.0).unwrap();
        let light = dark
            .place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
            .unwrap();
        dark.set_light_on(light, false);
        dark.spawn_character(Cell::new(0, 0));
        dark.character.enter_state(InteractionState::Sleep);
        dark.set_need_value(NeedKind::Sleep, 10.0);

        let mut lit = calm_sim();
        walled_room(&mut lit, 0, 0, 2, 1);
        lit.place_furniture(1, 0, FurnitureType::Bed, 0.0).unwrap();
        lit.place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
            .unwrap();
        lit.spawn_character(Cell::new(0, 0));
        lit.character.enter_state(InteractionState::Sleep);
        lit.set_need_value(NeedKind::Sleep, 10.0);

        run(&mut dark, 2.0);
        run(&mut lit, 2.0);
        assert!(dark.needs().sleep > lit.needs().sleep);
    }

    #[test]
    fn test_critical_need_drives_character() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 4, 1);
        let toilet = sim.place_furniture(3, 0, FurnitureType::Toilet, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.set_need_value(NeedKind::Bladder, 5.0);

        sim.tick(0.1);
        assert_eq!(
            sim.character.pending.map(|p| p.furniture),
            Some(toilet)
        );
        run(&mut sim, 3.0);
        assert_eq!(sim.character.state, InteractionState::ToiletUse);
        run(&mut sim, 10.0);
        assert!(sim.needs().bladder > 5.0);
    }

    #[test]
    fn test_player_input_blocks_autonomy_and_slides() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 3, 1);
        sim.place_furniture(2, 0, FurnitureType::Toilet, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.set_need_value(NeedKind::Bladder, 5.0);

        sim.player_input(1.0, 1.0);
        run(&mut sim, 0.6);
        assert!(sim.character.pending.is_none());
        assert!(sim.character.x > 1.0);
        // wall on the +z edge; the diagonal slides along x
        assert!(sim.character.z < 1.0);

        sim.release_input();
        sim.tick(0.1);
        assert!(sim.character.pending.is_some());
    }

    #[test]
    fn test_pillow_fight_expires() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 2, 1);
        let bed = sim.place_furniture(1, 0, FurnitureType::Bed, 0.0).unwrap();
        sim.spawn_character(Cell::new(0, 0));
        sim.interact(bed, ActionId::PillowFight).unwrap();
        sim.tick(0.1);
        assert_eq!(sim.character.state, InteractionState::PillowFight);
        run(&mut sim, 3.1);
        assert_eq!(sim.character.state, InteractionState::Idle);
    }

    #[test]
    fn test_move_to_and_notify_arrival() {
        let mut sim = calm_sim();
        walled_room(&mut sim, 0, 0, 5, 1);
        sim.spawn_character(Cell::new(0, 0));
        assert!(sim.move_to(Cell::new(4, 0)));
        sim.notify_arrival();
        assert_eq!(sim.character.cell(), Cell::new(4, 0));
        assert!(!sim.move_to(Cell::new(9, 9)));
        assert_eq!(sim.take_notices().len(), 1);
    }

    #[test]
    fn test_ceiling_light_outside_room_is_a_notice() {
        let mut sim = calm_sim();
        sim.place_floor(0, 0);
        assert!(sim
            .place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
            .is_none());
        let notices = sim.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(sim.world.furniture_count(), 0);
    }

    #[test]
    fn test_undo_redo_through_engine() {
        let mut sim = calm_sim();
        sim.place_floor(0, 0);
        sim.place_wall(1, 0, WallDir::Z);
        assert!(sim.undo());
        assert!(!sim
            .world
            .has_wall(WallKey::new(1, 0, WallDir::Z)));
        assert!(sim.world.has_floor_at(0, 0));
        assert!(sim.redo());
        assert!(sim
            .world
            .has_wall(WallKey::new(1, 0, WallDir::Z)));
    }

    #[test]
    fn test_import_bad_json_is_noop() {
        let mut sim = calm_sim();
        sim.place_floor(0, 0);
        assert!(sim.import_layout_json("not json").is_none());
        assert!(sim.world.has_floor_at(0, 0));
        assert_eq!(sim.take_notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_scheduled_destroy_emits_visual_removal() {
        let mut sim = calm_sim();
        sim.place_floor(0, 0);
        sim.place_floor(1, 0);
        sim.place_wall(1, 0, WallDir::Z);
        let door = sim
            .place_furniture(1, 0, FurnitureType::Door, FRAC_PI_2)
            .unwrap();
        assert!(sim.destroy(door));
        assert!(!sim.destroy(door));
        sim.tick(0.1);
        assert!(sim.take_events().is_empty());
        sim.tick(0.15);
        assert!(sim
            .take_events()
            .iter()
            .any(|e| matches!(e, SimEvent::VisualRemoved { id, .. } if *id == door)));
    }
}
