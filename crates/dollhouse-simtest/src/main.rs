//! Dollhouse Headless Simulation Harness
//!
//! Validates pure simulation logic and the engine without a renderer.
//! Runs entirely in-process, no input layer, no UI.
//!
//! Usage:
//!   cargo run -p dollhouse-simtest
//!   cargo run -p dollhouse-simtest -- --verbose

use std::f32::consts::FRAC_PI_2;

use dollhouse_core::prelude::*;
use dollhouse_logic::config::NeedsConfig;
use dollhouse_logic::connectivity::{
    has_blocking_wall_between_cells, has_wall_between_cells, is_closed_room_cell,
};
use dollhouse_logic::decision::{check_refusal, critical_need_target};
use dollhouse_logic::grid::GridWorld;
use dollhouse_logic::layout::{export_layout, import_json};
use dollhouse_logic::needs::{Needs, NeedsEngine, NEED_MAX, NEED_MIN};
use dollhouse_logic::pathfinding::find_path;
use dollhouse_logic::personality::{
    adjusted_refuse_chance, mood_refuse_base, Personality, PREFERENCE_MAX, PREFERENCE_MIN,
    TENDENCY_MAX, TENDENCY_MIN,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Sample house (same JSON format as layout export) ────────────────────
const SAMPLE_HOUSE_JSON: &str = include_str!("../../../data/sample_house.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Dollhouse Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Sample house layout
    results.extend(validate_sample_house(verbose));

    // 2. Placement and door properties
    results.extend(validate_placement(verbose));

    // 3. Pathfinding sweep
    results.extend(validate_pathfinding(verbose));

    // 4. Needs and mood
    results.extend(validate_needs(verbose));

    // 5. Refusal model
    results.extend(validate_refusal(verbose));

    // 6. A day in the house
    results.extend(validate_day_in_house(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_sample_house() -> Result<GridWorld, String> {
    let mut world = GridWorld::default();
    import_json(&mut world, SAMPLE_HOUSE_JSON).map_err(|e| e.to_string())?;
    Ok(world)
}

// ── 1. Sample House ─────────────────────────────────────────────────────

fn validate_sample_house(verbose: bool) -> Vec<TestResult> {
    println!("--- Sample House ---");
    let mut results = Vec::new();

    let mut world = GridWorld::default();
    let report = match import_json(&mut world, SAMPLE_HOUSE_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "house_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "house_not_empty".into(),
        passed: report.floors > 20 && report.walls > 20,
        detail: format!(
            "{} floors, {} walls, {} furnitures",
            report.floors, report.walls, report.furnitures
        ),
    });

    results.push(TestResult {
        name: "house_no_rejections".into(),
        passed: report.rejected.is_empty(),
        detail: if report.rejected.is_empty() {
            "every furniture entry placed".into()
        } else {
            report
                .rejected
                .iter()
                .map(|(r, e)| format!("{} at ({}, {}): {}", r.kind, r.x, r.z, e))
                .collect::<Vec<_>>()
                .join(", ")
        },
    });

    // Every room closed
    let rooms = [
        ("bedroom", Cell::new(1, 1)),
        ("living room", Cell::new(5, 1)),
        ("bathroom", Cell::new(1, 3)),
    ];
    let open_rooms: Vec<_> = rooms
        .iter()
        .filter(|(_, cell)| !is_closed_room_cell(&world, *cell))
        .map(|(name, _)| *name)
        .collect();
    results.push(TestResult {
        name: "house_rooms_closed".into(),
        passed: open_rooms.is_empty(),
        detail: if open_rooms.is_empty() {
            "bedroom, living room and bathroom are enclosed".into()
        } else {
            format!("open: {}", open_rooms.join(", "))
        },
    });

    // Every door cut an opening
    let doors: Vec<_> = world
        .furnitures()
        .filter(|f| f.kind.is_opening())
        .map(|f| (f.cell, f.orientation))
        .collect();
    let uncut = doors
        .iter()
        .filter(|(cell, dir)| {
            world
                .wall(dollhouse_logic::grid::WallKey::new(cell.x, cell.z, *dir))
                .map(|w| !w.has_opening || w.caps.len() != 2)
                .unwrap_or(true)
        })
        .count();
    results.push(TestResult {
        name: "house_openings_carved".into(),
        passed: uncut == 0,
        detail: format!("{} openings, {} without caps", doors.len(), uncut),
    });

    // Export → import is stable
    let mut copy = GridWorld::default();
    let stable = dollhouse_logic::layout::export_json(&world)
        .map_err(|e| e.to_string())
        .and_then(|json| import_json(&mut copy, &json).map_err(|e| e.to_string()))
        .map(|_| export_layout(&copy) == export_layout(&world))
        .unwrap_or(false);
    results.push(TestResult {
        name: "house_export_stable".into(),
        passed: stable,
        detail: "export → import → export matches".into(),
    });

    if verbose {
        if let Some(b) = world.floor_bounds() {
            println!(
                "  bounds x {}..={}, z {}..={}",
                b.min_x, b.max_x, b.min_z, b.max_z
            );
        }
    }

    results
}

// ── 2. Placement ────────────────────────────────────────────────────────

fn validate_placement(_verbose: bool) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();

    // Idempotent floors and walls
    let mut world = GridWorld::default();
    let mut stable_ids = true;
    for x in -5..5 {
        for z in -5..5 {
            let id = world.place_floor(x, z);
            stable_ids &= world.place_floor(x, z) == id;
            let wall = world.place_wall(x, z, WallDir::X);
            stable_ids &= world.place_wall(x, z, WallDir::X) == wall;
        }
    }
    results.push(TestResult {
        name: "placement_idempotent".into(),
        passed: stable_ids && world.floor_count() == 100 && world.wall_count() == 100,
        detail: format!("{} floors, {} walls", world.floor_count(), world.wall_count()),
    });

    // Door reversibility on both orientations
    let mut reversible = true;
    for (dir, rotation, a, b) in [
        (WallDir::Z, FRAC_PI_2, Cell::new(0, 0), Cell::new(1, 0)),
        (WallDir::X, 0.0, Cell::new(1, 0), Cell::new(1, 1)),
    ] {
        let mut world = GridWorld::default();
        world.place_floor(a.x, a.z);
        world.place_floor(b.x, b.z);
        world.place_wall(b.x, b.z, dir);
        let Ok(door) = world.place_furniture(b.x, b.z, FurnitureType::Door, rotation) else {
            reversible = false;
            continue;
        };
        world.set_open(door, true);
        let opened = !has_blocking_wall_between_cells(&world, a, b);
        world.set_open(door, false);
        let closed = has_blocking_wall_between_cells(&world, a, b);
        let structural = has_wall_between_cells(&world, a, b);
        reversible &= opened && closed && structural;
    }
    results.push(TestResult {
        name: "door_reversible".into(),
        passed: reversible,
        detail: "open door lets through, closed door blocks, wall stays".into(),
    });

    // Ceiling light placement rule
    let mut open_plan = GridWorld::default();
    open_plan.place_floor(0, 0);
    let refused = open_plan
        .place_furniture(0, 0, FurnitureType::CeilingLight, 0.0)
        .is_err();
    let accepted = load_sample_house()
        .map(|mut w| {
            w.place_furniture(1, 2, FurnitureType::CeilingLight, 0.0)
                .is_ok()
        })
        .unwrap_or(false);
    results.push(TestResult {
        name: "ceiling_light_rule".into(),
        passed: refused && accepted,
        detail: "refused in the open, accepted in a closed room".into(),
    });

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn path_is_valid(world: &GridWorld, path: &[Cell]) -> bool {
    path.iter().all(|c| world.is_cell_walkable(c.x, c.z))
        && path.windows(2).all(|w| {
            w[0].manhattan(w[1]) == 1 && !has_blocking_wall_between_cells(world, w[0], w[1])
        })
}

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    let mut world = match load_sample_house() {
        Ok(w) => w,
        Err(e) => {
            results.push(TestResult {
                name: "pathfind_setup".into(),
                passed: false,
                detail: e,
            });
            return results;
        }
    };

    let bedroom = Cell::new(1, 2);
    let kitchen = Cell::new(5, 0);
    results.push(TestResult {
        name: "pathfind_closed_door".into(),
        passed: find_path(&world, bedroom, kitchen).is_none(),
        detail: "closed door separates bedroom and kitchen".into(),
    });

    let door_ids: Vec<_> = world
        .furnitures()
        .filter(|f| f.kind == FurnitureType::Door)
        .map(|f| f.id)
        .collect();
    for id in &door_ids {
        world.set_open(*id, true);
    }

    // All walkable pairs: any path found must be valid
    let walkable: Vec<Cell> = world
        .floors()
        .map(|f| f.cell)
        .filter(|c| world.is_cell_walkable(c.x, c.z))
        .collect();
    let mut found = 0;
    let mut invalid = 0;
    for a in &walkable {
        for b in &walkable {
            if let Some(path) = find_path(&world, *a, *b) {
                found += 1;
                if path.first() != Some(a) || path.last() != Some(b) || !path_is_valid(&world, &path)
                {
                    invalid += 1;
                }
            }
        }
    }
    let pairs = walkable.len() * walkable.len();
    results.push(TestResult {
        name: "pathfind_all_pairs_valid".into(),
        passed: invalid == 0 && found == pairs,
        detail: format!("{}/{} pairs connected, {} invalid", found, pairs, invalid),
    });

    let shortest = find_path(&world, bedroom, kitchen).map(|p| p.len());
    results.push(TestResult {
        name: "pathfind_shortest".into(),
        passed: shortest == Some(bedroom.manhattan(kitchen) as usize + 1),
        detail: format!("bedroom → kitchen = {:?} cells", shortest),
    });

    // Furniture cells are never part of a path
    let fridge = Cell::new(6, 0);
    results.push(TestResult {
        name: "pathfind_blocked_target".into(),
        passed: find_path(&world, bedroom, fridge).is_none(),
        detail: "solid furniture cell is not a destination".into(),
    });

    if verbose {
        println!("  {} walkable cells", walkable.len());
    }

    results
}

// ── 4. Needs ────────────────────────────────────────────────────────────

fn validate_needs(_verbose: bool) -> Vec<TestResult> {
    println!("--- Needs ---");
    let mut results = Vec::new();
    let config = NeedsConfig::default();

    // Long decay stays in range
    let mut engine = NeedsEngine::default();
    for _ in 0..20_000 {
        engine.tick(0.1, &config, None, false);
    }
    let in_range = engine
        .snapshot()
        .iter()
        .all(|(_, v)| (NEED_MIN..=NEED_MAX).contains(&v));
    results.push(TestResult {
        name: "needs_decay_bounded".into(),
        passed: in_range && engine.snapshot().min_value() == NEED_MIN,
        detail: format!("after 2000s min need = {:.1}", engine.snapshot().min_value()),
    });

    // Recovery stays in range
    let mut engine = NeedsEngine::default();
    for _ in 0..5_000 {
        engine.tick(0.1, &config, Some(NeedKind::Bladder), false);
    }
    results.push(TestResult {
        name: "needs_recovery_capped".into(),
        passed: engine.get(NeedKind::Bladder) <= NEED_MAX,
        detail: format!("bladder = {:.1}", engine.get(NeedKind::Bladder)),
    });

    // Paused needs do not move
    let mut engine = NeedsEngine::default();
    engine.set_need_value(NeedKind::Hunger, 42.0);
    engine.ticking = false;
    engine.tick(100.0, &config, None, false);
    results.push(TestResult {
        name: "needs_paused".into(),
        passed: engine.get(NeedKind::Hunger) == 42.0,
        detail: "ticking off freezes values".into(),
    });

    // Mood is monotone in the lowest need
    let mut last = Mood::from_min_need(NEED_MAX);
    let mut monotone = true;
    let order = |m: Mood| match m {
        Mood::VeryHappy => 4,
        Mood::Happy => 3,
        Mood::Neutral => 2,
        Mood::Uncomfortable => 1,
        Mood::BreakingDown => 0,
    };
    for v in (0..=100).rev() {
        let mood = Mood::from_min_need(v as f32);
        monotone &= order(mood) <= order(last);
        last = mood;
    }
    results.push(TestResult {
        name: "mood_monotone".into(),
        passed: monotone && last == Mood::BreakingDown,
        detail: "mood never improves as the lowest need drops".into(),
    });

    // Invalid input is ignored
    let mut needs = Needs::default();
    let accepted = needs.set(NeedKind::Fun, f32::NAN);
    results.push(TestResult {
        name: "needs_reject_nan".into(),
        passed: !accepted && needs.get(NeedKind::Fun) == NEED_MAX,
        detail: "NaN writes are dropped".into(),
    });

    results
}

// ── 5. Refusal ──────────────────────────────────────────────────────────

fn validate_refusal(_verbose: bool) -> Vec<TestResult> {
    println!("--- Refusal ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(2024);
    let mut out_of_range = 0;
    for _ in 0..10_000 {
        let base = rng.gen_range(0.0..=1.0);
        let pref = rng.gen_range(PREFERENCE_MIN..=PREFERENCE_MAX);
        let tendency = rng.gen_range(TENDENCY_MIN..=TENDENCY_MAX);
        let chance = adjusted_refuse_chance(base, pref, tendency);
        if !(0.0..=1.0).contains(&chance) {
            out_of_range += 1;
        }
    }
    results.push(TestResult {
        name: "refusal_in_unit_interval".into(),
        passed: out_of_range == 0,
        detail: format!("{} of 10000 samples out of range", out_of_range),
    });

    // Breaking down with neutral personality always refuses
    let personality = Personality::default();
    let always = ActionId::ALL.iter().all(|a| {
        check_refusal(&personality, Mood::BreakingDown, *a, &mut rng).is_err()
    });
    let never = ActionId::ALL
        .iter()
        .all(|a| check_refusal(&personality, Mood::VeryHappy, *a, &mut rng).is_ok());
    results.push(TestResult {
        name: "refusal_mood_extremes".into(),
        passed: always && never,
        detail: format!(
            "breaking down base {:.1}, very happy base {:.1}",
            mood_refuse_base(Mood::BreakingDown),
            mood_refuse_base(Mood::VeryHappy)
        ),
    });

    // Random personalities stay in bounds
    let bounded = (0..200).all(|_| {
        let p = Personality::random(&mut rng);
        (TENDENCY_MIN..=TENDENCY_MAX).contains(&p.refusal_tendency())
            && p
                .preferences()
                .values()
                .all(|v| (PREFERENCE_MIN..=PREFERENCE_MAX).contains(v))
    });
    results.push(TestResult {
        name: "personality_random_bounded".into(),
        passed: bounded,
        detail: "200 random personalities within limits".into(),
    });

    results
}

// ── 6. Day in the House ─────────────────────────────────────────────────

fn validate_day_in_house(verbose: bool) -> Vec<TestResult> {
    println!("--- Day in the House ---");
    let mut results = Vec::new();

    let mut sim = Simulation::new(SimConfig::default(), 7);
    if sim.import_layout_json(SAMPLE_HOUSE_JSON).is_none() {
        results.push(TestResult {
            name: "day_setup".into(),
            passed: false,
            detail: "sample house failed to import".into(),
        });
        return results;
    }
    let door_ids: Vec<_> = sim
        .world
        .furnitures()
        .filter(|f| f.kind == FurnitureType::Door)
        .map(|f| f.id)
        .collect();
    for id in door_ids {
        sim.set_door_open(id, true);
    }
    sim.spawn_character(Cell::new(1, 2));
    sim.set_need_value(NeedKind::Hunger, 15.0);

    // Critical hunger picks the fridge
    let target = critical_need_target(
        &sim.world,
        &sim.character,
        &sim.needs(),
        sim.personality(),
        sim.config(),
    );
    let fridge_chosen = target
        .as_ref()
        .and_then(|(_, plan)| sim.world.furniture(plan.furniture))
        .map(|f| f.kind == FurnitureType::Fridge)
        .unwrap_or(false);
    results.push(TestResult {
        name: "day_hunger_targets_fridge".into(),
        passed: fridge_chosen,
        detail: format!("critical target: {:?}", target.map(|(n, p)| (n, p.action))),
    });

    // Simulate ten minutes at 10 Hz
    let mut started = 0;
    let mut off_grid = 0;
    let mut out_of_range = 0;
    for _ in 0..6_000 {
        sim.tick(0.1);
        for event in sim.take_events() {
            if let SimEvent::InteractionStarted { action, .. } = event {
                started += 1;
                if verbose {
                    println!("  t={:>6.1}s  {}", sim.sim_time, action);
                }
            }
        }
        if !sim.world.has_floor_at(sim.character.cell().x, sim.character.cell().z) {
            off_grid += 1;
        }
        if !sim
            .needs()
            .iter()
            .all(|(_, v)| (NEED_MIN..=NEED_MAX).contains(&v))
        {
            out_of_range += 1;
        }
    }

    results.push(TestResult {
        name: "day_interactions".into(),
        passed: started > 0,
        detail: format!("{} interactions started", started),
    });
    results.push(TestResult {
        name: "day_stays_on_floor".into(),
        passed: off_grid == 0,
        detail: format!("{} ticks off the floor", off_grid),
    });
    results.push(TestResult {
        name: "day_needs_bounded".into(),
        passed: out_of_range == 0,
        detail: format!("mood at end: {}", sim.mood().label()),
    });

    // Save → load keeps the day intact
    let mut buffer = Vec::new();
    let round_trip = sim.save(&mut buffer).is_ok() && {
        let mut loaded = Simulation::default();
        loaded.load(&buffer[..]).is_ok()
            && loaded.character == sim.character
            && loaded.needs() == sim.needs()
    };
    results.push(TestResult {
        name: "day_save_load".into(),
        passed: round_trip,
        detail: format!("{} bytes", buffer.len()),
    });

    // Undo the import
    let undone = sim.undo() && sim.world.is_empty();
    results.push(TestResult {
        name: "day_undo_import".into(),
        passed: undone,
        detail: "undo restores the empty world".into(),
    });

    results
}
