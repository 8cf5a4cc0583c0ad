//! Tests for the simulation engine, wave scheduling, combat, economy and
//! structure lifecycle.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampart_core::commands::PlayerCommand;
use rampart_core::components::*;
use rampart_core::config::*;
use rampart_core::constants::*;
use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{PathCurve, Position};

use crate::combat::is_same_live_enemy;
use crate::economy::Economy;
use crate::engine::{SimConfig, SimulationEngine};
use crate::enemy_pool::EnemyPool;
use crate::lifecycle::{self, advance_path, effective_structure_damage, end_slow, slow_enemy};
use crate::systems::wave_spawner::{
    resolve_spawn_index, retire_inactive, weakest_spawn_index, NextSpawn, WaveScheduler, WaveStart,
};
use crate::timers::{TimerAction, TimerQueue};
use crate::world_setup;

// ---- Helpers ----

fn engine_with(game: GameConfig) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        game,
        ..Default::default()
    })
    .unwrap()
}

/// Default config with no automatic first wave.
fn quiet_config() -> GameConfig {
    GameConfig {
        first_wave_delay_secs: None,
        ..GameConfig::default()
    }
}

fn group(enemy: EnemyKind, count: u32, delay: f64) -> SpawnGroup {
    SpawnGroup {
        enemy,
        count,
        inter_spawn_delay_secs: delay,
        side: SpawnSide::Left,
    }
}

/// One straight 1000-unit path from (0, 100) to the base at (1000, 100)
/// and a single wave made of `groups`.
fn line_config(groups: Vec<SpawnGroup>, first_wave_delay: Option<f64>) -> GameConfig {
    let path = PathCurve::new(vec![Position::new(0.0, 100.0), Position::new(1000.0, 100.0)]);
    GameConfig {
        waves: vec![WaveDefinition {
            groups,
            break_time_secs: 0.0,
        }],
        map: MapLayout {
            width: 1200.0,
            height: 400.0,
            spawn_points: vec![path.start()],
            paths: vec![path],
            base: Position::new(1000.0, 100.0),
        },
        first_wave_delay_secs: first_wave_delay,
        ..GameConfig::default()
    }
}

/// Run `ticks` fixed ticks, collecting every emitted event.
fn run_collect(engine: &mut SimulationEngine, ticks: usize) -> (Vec<GameEvent>, GameStateSnapshot) {
    let mut events = Vec::new();
    let mut snapshot = GameStateSnapshot::default();
    for _ in 0..ticks {
        snapshot = engine.tick_fixed();
        events.extend(snapshot.events.iter().cloned());
    }
    (events, snapshot)
}

fn start(engine: &mut SimulationEngine) -> GameStateSnapshot {
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick_fixed()
}

fn build(engine: &mut SimulationEngine, kind: StructureKind, x: f64, y: f64) -> GameStateSnapshot {
    engine.queue_commands([
        PlayerCommand::SelectStructureType { kind },
        PlayerCommand::BuildAt { x, y },
    ]);
    engine.tick_fixed()
}

fn structure_core(engine: &SimulationEngine, id: u32) -> StructureCore {
    let entity = engine.find_structure(id).unwrap();
    (*engine.world().get::<&StructureCore>(entity).unwrap()).clone()
}

fn messages(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ShowMessage { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Build a wall at (200, 200) and run until it is Active.
fn engine_with_active_wall() -> SimulationEngine {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    build(&mut engine, StructureKind::Wall, 200.0, 200.0);
    run_collect(&mut engine, 120);
    assert_eq!(structure_core(&engine, 0).state, StructureState::Active);
    engine
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine_with(GameConfig::default());
    let mut engine_b = engine_with(GameConfig::default());
    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_commands([
            PlayerCommand::StartGame,
            PlayerCommand::SelectStructureType {
                kind: StructureKind::Tower,
            },
            PlayerCommand::BuildAt { x: 320.0, y: 360.0 },
        ]);
    }

    for _ in 0..(TICK_RATE as usize * 40) {
        let json_a = serde_json::to_string(&engine_a.tick_fixed()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick_fixed()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

// ---- Phase gating ----

#[test]
fn test_lobby_ignores_gameplay_and_time() {
    let mut engine = engine_with(quiet_config());
    engine.queue_commands([
        PlayerCommand::SelectStructureType {
            kind: StructureKind::Wall,
        },
        PlayerCommand::BuildAt { x: 200.0, y: 200.0 },
    ]);
    let snap = engine.tick_fixed();
    assert_eq!(snap.phase, GamePhase::Lobby);
    assert!(snap.structures.is_empty());
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_start_game_credits_initial_resources() {
    let mut engine = engine_with(quiet_config());
    let snap = start(&mut engine);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.economy.resources, 200);
    assert!(snap
        .events
        .contains(&GameEvent::CrystalsUpdated { amount: 200 }));
    assert_eq!(snap.builder.position, engine.config().map.base);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    engine.queue_command(PlayerCommand::Pause);
    let before = engine.tick_fixed().time.elapsed_secs;
    let after = engine.tick_fixed().time.elapsed_secs;
    assert_eq!(before, after);

    engine.queue_command(PlayerCommand::Resume);
    let resumed = engine.tick_fixed().time.elapsed_secs;
    assert!(resumed > after);
}

#[test]
fn test_set_time_scale_clamped() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    let t0 = engine.time().elapsed_secs;
    engine.tick(0.1);
    assert!((engine.time().elapsed_secs - t0 - 0.2).abs() < 1e-9);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 50.0 });
    engine.tick(0.0);
    assert_eq!(engine.time_scale(), MAX_TIME_SCALE);
}

// ---- Configuration ----

#[test]
fn test_invalid_config_rejected() {
    let result = SimulationEngine::new(SimConfig {
        game: GameConfig {
            base_health: 0.0,
            ..GameConfig::default()
        },
        ..Default::default()
    });
    assert!(matches!(result, Err(ConfigError::NonPositive { .. })));

    let mut game = GameConfig::default();
    game.structures
        .get_mut(&StructureKind::Wall)
        .unwrap()
        .upgrade_costs
        .pop();
    let result = SimulationEngine::new(SimConfig {
        game,
        ..Default::default()
    });
    assert!(matches!(
        result,
        Err(ConfigError::UpgradeCostMismatch {
            kind: StructureKind::Wall,
            ..
        })
    ));
}

// ---- Economy ----

fn economy_without_piles() -> Economy {
    Economy::new(EconomyConfig {
        pile_chance: 0.0,
        ..EconomyConfig::default()
    })
}

#[test]
fn test_debit_never_goes_negative() {
    let mut economy = economy_without_piles();
    let mut events = Vec::new();
    economy.credit(30, &mut events);
    assert!(!economy.debit(40, &mut events));
    assert_eq!(economy.resources(), 30);
    assert!(economy.debit(30, &mut events));
    assert_eq!(economy.resources(), 0);
    assert!(!economy.debit(1, &mut events));
}

#[test]
fn test_combo_multiplier_third_kill() {
    let mut economy = economy_without_piles();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut events = Vec::new();

    economy.on_enemy_killed(0.0, 10, &mut rng, &mut events);
    economy.on_enemy_killed(1.0, 10, &mut rng, &mut events);
    economy.on_enemy_killed(2.0, 10, &mut rng, &mut events);

    assert_eq!(economy.combo(), 3);
    assert!((economy.multiplier() - 1.2).abs() < 1e-9);
    // 10 + floor(11.0) + floor(12.0)
    assert_eq!(economy.resources(), 33);
}

#[test]
fn test_combo_resets_outside_window_and_decays() {
    let mut economy = economy_without_piles();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut events = Vec::new();

    economy.on_enemy_killed(0.0, 10, &mut rng, &mut events);
    economy.on_enemy_killed(1.0, 10, &mut rng, &mut events);
    economy.on_enemy_killed(5.0, 10, &mut rng, &mut events);
    assert_eq!(economy.combo(), 1);

    assert!(!economy.check_combo_decay(6.0, &mut events));
    assert!(economy.check_combo_decay(7.5, &mut events));
    assert_eq!(economy.combo(), 0);
    assert_eq!(economy.multiplier(), 1.0);
}

#[test]
fn test_pile_drop_values_in_range() {
    let mut economy = Economy::new(EconomyConfig {
        pile_chance: 1.0,
        ..EconomyConfig::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut events = Vec::new();
    for i in 0..50 {
        let drop = economy
            .on_enemy_killed(i as f64 * 10.0, 5, &mut rng, &mut events)
            .unwrap();
        match drop.rarity {
            PileRarity::Normal => assert!((30..=50).contains(&drop.value)),
            PileRarity::Rare => assert!((60..=80).contains(&drop.value)),
        }
    }
}

// ---- Damage ----

#[test]
fn test_structure_damage_resistance() {
    assert_eq!(effective_structure_damage(10.0, DamageType::Physical, 0.5), 5.0);
    assert_eq!(effective_structure_damage(10.0, DamageType::True, 0.5), 10.0);
    assert_eq!(effective_structure_damage(1.0, DamageType::Magical, 0.7), MIN_STRUCTURE_DAMAGE);
}

#[test]
fn test_damaged_wall_state_and_destruction() {
    let mut engine = engine_with_active_wall();
    engine.damage_structure(0, 10.0, DamageType::Physical);
    let core = structure_core(&engine, 0);
    assert_eq!(core.health, 195.0);
    assert_eq!(core.state, StructureState::Damaged);

    engine.damage_structure(0, 1000.0, DamageType::True);
    let snap = engine.tick_fixed();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::StructureDestroyed {
            structure_id: 0,
            kind: StructureKind::Wall
        }
    )));
    assert!(snap.structures.is_empty(), "Destroyed structures are cleaned up");
    assert!(engine.find_structure(0).is_none());
}

// ---- Building ----

#[test]
fn test_build_lifecycle() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    let snap = build(&mut engine, StructureKind::Wall, 200.0, 200.0);
    assert_eq!(snap.economy.resources, 180);
    assert_eq!(snap.structures.len(), 1);
    assert_eq!(snap.structures[0].state, StructureState::Building);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::BuildStarted {
            kind: StructureKind::Wall,
            ..
        }
    )));

    let (events, snap) = run_collect(&mut engine, 120);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::BuildComplete { .. }))
            .count(),
        1
    );
    assert_eq!(snap.structures[0].state, StructureState::Active);
    assert_eq!(snap.structures[0].build_progress, 1.0);
}

#[test]
fn test_build_rejections() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);

    engine.queue_command(PlayerCommand::BuildAt { x: 200.0, y: 200.0 });
    let snap = engine.tick_fixed();
    assert_eq!(messages(&snap.events), vec![MSG_NO_STRUCTURE_SELECTED]);

    build(&mut engine, StructureKind::Tower, 200.0, 200.0);
    let snap = build(&mut engine, StructureKind::Wall, 230.0, 200.0);
    assert_eq!(messages(&snap.events), vec![MSG_CANNOT_BUILD_HERE]);

    let snap = build(&mut engine, StructureKind::Wall, 5000.0, 200.0);
    assert_eq!(messages(&snap.events), vec![MSG_CANNOT_BUILD_HERE]);

    // 200 - 40 = 160 left: four towers fit, the fifth does not.
    for i in 0..4 {
        build(&mut engine, StructureKind::Tower, 400.0 + i as f64 * 100.0, 600.0);
    }
    let snap = build(&mut engine, StructureKind::Tower, 900.0, 600.0);
    assert_eq!(messages(&snap.events), vec![MSG_NOT_ENOUGH_CRYSTALS]);
    assert_eq!(snap.economy.resources, 0);
    assert_eq!(snap.structures.len(), 5);
}

// ---- Upgrades ----

#[test]
fn test_upgrade_cancel_refunds() {
    let mut engine = engine_with_active_wall();
    engine.queue_command(PlayerCommand::StartUpgrade { structure_id: 0 });
    let snap = engine.tick_fixed();
    assert_eq!(snap.economy.resources, 130);
    assert_eq!(snap.structures[0].state, StructureState::Upgrading);

    engine.queue_command(PlayerCommand::CancelUpgrade { structure_id: 0 });
    let snap = engine.tick_fixed();
    assert_eq!(snap.economy.resources, 180);
    assert_eq!(snap.structures[0].state, StructureState::Active);
    assert!(snap.events.contains(&GameEvent::UpgradeCancelled {
        structure_id: 0,
        refund: 50
    }));
}

#[test]
fn test_upgrade_completes_and_applies_level() {
    let mut engine = engine_with_active_wall();
    engine.queue_command(PlayerCommand::StartUpgrade { structure_id: 0 });
    let (events, snap) = run_collect(&mut engine, TICK_RATE as usize * 4);

    assert!(events.contains(&GameEvent::UpgradeComplete {
        structure_id: 0,
        level: 1
    }));
    let wall = &snap.structures[0];
    assert_eq!(wall.level, 1);
    assert_eq!(wall.max_health, 400.0);
    assert_eq!(wall.health, 400.0);
    assert_eq!(wall.state, StructureState::Active);
}

#[test]
fn test_upgrade_max_level_message() {
    let mut game = quiet_config();
    game.economy.initial_resources = 1000;
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Wall, 200.0, 200.0);
    run_collect(&mut engine, 120);

    for _ in 0..2 {
        engine.queue_command(PlayerCommand::StartUpgrade { structure_id: 0 });
        run_collect(&mut engine, TICK_RATE as usize * 4);
    }
    assert_eq!(structure_core(&engine, 0).level, 2);

    engine.queue_command(PlayerCommand::StartUpgrade { structure_id: 0 });
    let snap = engine.tick_fixed();
    assert_eq!(messages(&snap.events), vec![MSG_MAX_LEVEL]);
}

#[test]
fn test_tower_upgrade_improves_weapon() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    build(&mut engine, StructureKind::Tower, 200.0, 200.0);
    run_collect(&mut engine, 180);
    engine.queue_command(PlayerCommand::StartUpgrade { structure_id: 0 });
    run_collect(&mut engine, TICK_RATE as usize * 4);

    let entity = engine.find_structure(0).unwrap();
    let weapon = engine.world().get::<&TowerWeapon>(entity).unwrap();
    assert_eq!(weapon.range, 200.0);
    assert_eq!(weapon.damage, 40.0);
    assert_eq!(weapon.attack_interval_secs, 0.8);
}

// ---- Repair ----

#[test]
fn test_repair_cost_and_cooldown() {
    let mut engine = engine_with_active_wall();
    engine.damage_structure(0, 100.0, DamageType::Physical);
    assert_eq!(structure_core(&engine, 0).health, 150.0);

    engine.queue_commands([
        PlayerCommand::Repair {
            structure_id: 0,
            amount: 20.0,
        },
        PlayerCommand::Repair {
            structure_id: 0,
            amount: 20.0,
        },
    ]);
    let snap = engine.tick_fixed();
    assert_eq!(snap.economy.resources, 180 - 15);
    assert_eq!(snap.structures[0].health, 170.0);
    assert_eq!(messages(&snap.events), vec![MSG_REPAIR_NOT_READY]);

    run_collect(&mut engine, 40);
    engine.queue_command(PlayerCommand::Repair {
        structure_id: 0,
        amount: 100.0,
    });
    let snap = engine.tick_fixed();
    // Only the 30 missing hp are charged: ceil(30 * 15 / 20) = 23.
    assert_eq!(snap.economy.resources, 165 - 23);
    assert_eq!(snap.structures[0].health, 200.0);
    assert_eq!(snap.structures[0].state, StructureState::Active);
}

#[test]
fn test_repair_full_health_is_noop() {
    let mut engine = engine_with_active_wall();
    engine.queue_command(PlayerCommand::Repair {
        structure_id: 0,
        amount: 20.0,
    });
    let snap = engine.tick_fixed();
    assert_eq!(snap.economy.resources, 180);
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::StructureRepaired { .. })));
}

#[test]
fn test_remove_structure() {
    let mut engine = engine_with_active_wall();
    engine.queue_command(PlayerCommand::RemoveStructure { structure_id: 0 });
    let snap = engine.tick_fixed();
    assert!(snap.structures.is_empty());
    assert!(engine.structures().is_empty());
}

// ---- Builder ----

#[test]
fn test_dash_and_cooldown() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    engine.queue_command(PlayerCommand::MoveBuilder { x: 100.0, y: 300.0 });
    engine.tick_fixed();

    engine.queue_command(PlayerCommand::TriggerDash { dx: 1.0, dy: 0.0 });
    let snap = engine.tick_fixed();
    assert!(snap.events.contains(&GameEvent::BuilderDashed {
        from: Position::new(100.0, 300.0),
        to: Position::new(100.0 + DASH_DISTANCE, 300.0),
    }));
    // The dash happens before this tick advances time.
    assert!((snap.builder.dash_ready - DT / DASH_COOLDOWN_SECS).abs() < 1e-9);

    engine.queue_command(PlayerCommand::TriggerDash { dx: 1.0, dy: 0.0 });
    let snap = engine.tick_fixed();
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BuilderDashed { .. })));
}

#[test]
fn test_builder_clamped_to_map() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    engine.queue_command(PlayerCommand::MoveBuilder {
        x: -50.0,
        y: 10_000.0,
    });
    let snap = engine.tick_fixed();
    assert_eq!(snap.builder.position, Position::new(0.0, MAP_HEIGHT));
}

#[test]
fn test_pile_pickup() {
    let mut engine = engine_with(quiet_config());
    start(&mut engine);
    let at = engine.builder().position;
    world_setup::spawn_pile(engine.world_mut(), 99, at, 40, PileRarity::Rare);

    let snap = engine.tick_fixed();
    assert!(snap.events.contains(&GameEvent::PileCollected {
        pile_id: 99,
        value: 40
    }));
    assert_eq!(snap.economy.resources, 240);
    assert!(snap.piles.is_empty());
}

// ---- Path motion ----

#[test]
fn test_slow_preserves_progress() {
    let mut follower = PathFollower {
        path_index: 0,
        path_length: 1000.0,
        progress: 0.0,
        remaining_secs: 10.0,
        paused: false,
    };
    let mut stats = EnemyStats {
        health: 50.0,
        max_health: 50.0,
        base_speed: 100.0,
        current_speed: 100.0,
        damage: 10.0,
        crystal_reward: 5,
    };
    let mut status = EnemyStatus {
        active: true,
        ..Default::default()
    };

    assert!(!advance_path(&mut follower, 4.0));
    assert!((follower.progress - 0.4).abs() < 1e-9);

    assert!(slow_enemy(&mut stats, &mut status, &mut follower, 0.5));
    assert!((follower.progress - 0.4).abs() < 1e-9);
    assert!((follower.remaining_secs - 12.0).abs() < 1e-9);
    assert!(!slow_enemy(&mut stats, &mut status, &mut follower, 0.5), "No stacking");

    end_slow(&mut stats, &mut status, &mut follower);
    assert!(!status.slowed);
    assert!((follower.remaining_secs - 6.0).abs() < 1e-9);

    assert!(advance_path(&mut follower, 6.5));
    assert_eq!(follower.progress, 1.0);
}

#[test]
fn test_dead_enemy_stops_moving() {
    let mut follower = PathFollower {
        path_index: 0,
        path_length: 100.0,
        progress: 0.2,
        remaining_secs: 8.0,
        paused: false,
    };
    let mut stats = EnemyStats {
        health: 10.0,
        max_health: 10.0,
        base_speed: 10.0,
        current_speed: 10.0,
        damage: 10.0,
        crystal_reward: 5,
    };
    let mut status = EnemyStatus {
        active: true,
        ..Default::default()
    };
    assert!(lifecycle::damage_enemy(&mut stats, &mut status, &mut follower, 15.0));
    assert!(!lifecycle::damage_enemy(&mut stats, &mut status, &mut follower, 15.0));
    assert!(!advance_path(&mut follower, 1.0));
    assert_eq!(follower.progress, 0.2);
}

// ---- Wave scheduling ----

#[test]
fn test_scheduler_spawn_sequence() {
    let mut scheduler = WaveScheduler::new(vec![WaveDefinition {
        groups: vec![group(EnemyKind::Goblin, 2, 1.5), group(EnemyKind::Ogre, 1, 5.0)],
        break_time_secs: 12.0,
    }]);
    assert!(!scheduler.try_complete(true), "No completion before the first wave");
    assert_eq!(scheduler.start_next_wave(), WaveStart::Started(1));
    assert_eq!(scheduler.start_next_wave(), WaveStart::Busy);

    let first = scheduler.next_spawn(1).unwrap();
    assert_eq!(first.next, NextSpawn::After(1.5));
    let second = scheduler.next_spawn(1).unwrap();
    assert_eq!(second.next, NextSpawn::After(0.0));
    let ogre = scheduler.next_spawn(1).unwrap();
    assert_eq!(ogre.enemy, EnemyKind::Ogre);
    assert_eq!(
        ogre.next,
        NextSpawn::Finished {
            break_time_secs: 12.0
        }
    );
    assert!(scheduler.next_spawn(1).is_none());
    assert!(!scheduler.is_spawning());

    assert!(!scheduler.try_complete(false));
    assert!(scheduler.try_complete(true));
    assert!(scheduler.is_wave_complete());
    assert!(!scheduler.try_complete(true), "Completion fires exactly once");
    assert_eq!(scheduler.start_next_wave(), WaveStart::Exhausted);
}

#[test]
fn test_weakest_side_selection() {
    let spawns = [Position::new(0.0, 0.0), Position::new(1000.0, 0.0)];
    let defended_a = [Position::new(50.0, 0.0), Position::new(100.0, 50.0)];
    assert_eq!(weakest_spawn_index(&spawns, &defended_a, WEAKEST_SIDE_RADIUS), 1);
    assert_eq!(weakest_spawn_index(&spawns, &[], WEAKEST_SIDE_RADIUS), 0);

    // Exactly on the radius does not count.
    let edge = [Position::new(WEAKEST_SIDE_RADIUS, 0.0)];
    assert_eq!(weakest_spawn_index(&spawns, &edge, WEAKEST_SIDE_RADIUS), 0);

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..20 {
        let index =
            resolve_spawn_index(SpawnSide::Random, &spawns, &[], WEAKEST_SIDE_RADIUS, &mut rng);
        assert!(index < spawns.len());
    }
    assert_eq!(
        resolve_spawn_index(SpawnSide::Right, &spawns[..1], &[], WEAKEST_SIDE_RADIUS, &mut rng),
        0
    );
}

// ---- Timers ----

#[test]
fn test_timer_queue_order() {
    let mut timers = TimerQueue::new();
    timers.schedule(0.0, 2.0, TimerAction::SpawnNext { wave: 2 });
    timers.schedule(0.0, 1.0, TimerAction::SpawnNext { wave: 1 });
    timers.schedule(0.0, 1.0, TimerAction::ComboCheck);

    assert_eq!(timers.next_due(), Some(1.0));
    assert!(timers.any(|action| matches!(action, TimerAction::ComboCheck)));
    assert_eq!(timers.pop_due(0.5), None);
    assert_eq!(timers.pop_due(1.0), Some(TimerAction::SpawnNext { wave: 1 }));
    assert_eq!(timers.pop_due(1.0), Some(TimerAction::ComboCheck));
    assert_eq!(timers.pop_due(1.0), None);
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.pop_due(3.0), Some(TimerAction::SpawnNext { wave: 2 }));
    assert!(timers.is_empty());
}

// ---- Enemy pool ----

#[test]
fn test_pool_reuse_and_stale_identity() {
    let config = GameConfig::default();
    let spec = config.enemy(EnemyKind::Goblin).unwrap();
    let path = &config.map.paths[0];
    let mut world = World::new();
    let mut pool = EnemyPool::new(ENEMY_POOL_MAX);

    let first = world_setup::spawn_enemy(&mut world, &mut pool, 1, EnemyKind::Goblin, spec, 0, path);
    assert!(is_same_live_enemy(&world, first, 1));

    world.get::<&mut EnemyStatus>(first).unwrap().active = false;
    let mut roster = vec![first];
    retire_inactive(&mut world, &mut roster, &mut pool);
    assert!(roster.is_empty());
    assert_eq!(pool.available(EnemyKind::Goblin), 1);
    assert!(!is_same_live_enemy(&world, first, 1), "Pooled enemies are out of play");

    let second =
        world_setup::spawn_enemy(&mut world, &mut pool, 2, EnemyKind::Goblin, spec, 0, path);
    assert_eq!(first, second);
    assert_eq!(pool.reused, 1);
    assert_eq!(pool.created, 1);
    assert!(is_same_live_enemy(&world, second, 2));
    assert!(!is_same_live_enemy(&world, second, 1), "Old spawn id must not match");

    let stats = world.get::<&EnemyStats>(second).unwrap();
    assert_eq!(stats.health, spec.health);
    assert_eq!(world.get::<&PathFollower>(second).unwrap().progress, 0.0);

    // Other kinds never draw from this pool.
    drop(stats);
    let ogre_spec = config.enemy(EnemyKind::Ogre).unwrap();
    let ogre = world_setup::spawn_enemy(&mut world, &mut pool, 3, EnemyKind::Ogre, ogre_spec, 0, path);
    assert_ne!(ogre, second);
}

// ---- End to end ----

#[test]
fn test_goblin_reaches_base() {
    let mut engine = engine_with(line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(0.0)));
    // A zero first-wave delay starts the wave on the same tick as the game.
    let mut events = start(&mut engine).events;
    // Park the builder in a corner, out of reach of the bonus piles.
    engine.queue_command(PlayerCommand::MoveBuilder {
        x: 1200.0,
        y: 400.0,
    });
    let (rest, snap) = run_collect(&mut engine, TICK_RATE as usize * 12);
    events.extend(rest);

    assert!(events.contains(&GameEvent::WaveStarted { wave: 1 }));
    assert!(events.contains(&GameEvent::BaseAttacked { damage: 10.0 }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::WaveCompleted { wave: 1 }))
            .count(),
        1
    );
    let attacked = events
        .iter()
        .position(|e| matches!(e, GameEvent::BaseAttacked { .. }))
        .unwrap();
    let completed = events
        .iter()
        .position(|e| matches!(e, GameEvent::WaveCompleted { .. }))
        .unwrap();
    assert!(attacked < completed);
    assert!(events.contains(&GameEvent::AllWavesCompleted));

    assert_eq!(snap.base_health, 90.0);
    assert_eq!(snap.phase, GamePhase::Victory);
    assert!(snap.enemies.is_empty());
    assert_eq!(
        snap.piles.len() as u32,
        engine.config().economy.wave_bonus_piles,
        "Wave-end bonus piles"
    );
}

#[test]
fn test_base_destroyed_is_defeat() {
    let mut game = line_config(vec![group(EnemyKind::Goblin, 3, 0.5)], Some(0.0));
    game.base_health = 20.0;
    let mut engine = engine_with(game);
    start(&mut engine);
    let (events, snap) = run_collect(&mut engine, TICK_RATE as usize * 15);

    assert!(events.contains(&GameEvent::BaseDestroyed));
    assert_eq!(snap.phase, GamePhase::Defeat);
    assert_eq!(snap.base_health, 0.0);
    assert!(!events.contains(&GameEvent::AllWavesCompleted));
}

#[test]
fn test_trap_kill_rewards_and_removes() {
    let mut game = line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(2.0));
    game.enemies.get_mut(&EnemyKind::Goblin).unwrap().health = 15.0;
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Trap, 300.0, 100.0);

    let mut events = Vec::new();
    let mut resources_at_kill = None;
    for _ in 0..(TICK_RATE as usize * 10) {
        let snap = engine.tick_fixed();
        if resources_at_kill.is_none()
            && snap
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyDefeated { .. }))
        {
            resources_at_kill = Some(snap.economy.resources);
        }
        events.extend(snap.events);
    }

    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TrapTriggered { trap_id: 0, .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::EnemyDefeated {
            enemy_id: 0,
            crystal_reward: 5,
            ..
        }
    )));
    assert_eq!(resources_at_kill, Some(200 - 30 + 5));
    assert_eq!(engine.base_health(), 100.0);
    assert_eq!(engine.phase(), GamePhase::Victory);
}

#[test]
fn test_tower_shoots_down_goblin() {
    let game = line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(2.5));
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Tower, 500.0, 150.0);
    let (events, snap) = run_collect(&mut engine, TICK_RATE as usize * 15);

    let fired = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ProjectileFired { tower_id: 0, .. }))
        .count();
    assert!(fired >= 2);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::ProjectileHit { target_id: 0, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyDefeated { enemy_id: 0, .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::BaseAttacked { .. })));
    assert_eq!(snap.phase, GamePhase::Victory);
}

#[test]
fn test_ogre_sieges_nearby_wall() {
    let game = line_config(vec![group(EnemyKind::Ogre, 1, 0.0)], Some(2.0));
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Wall, 300.0, 160.0);

    let mut saw_sieging = false;
    let mut events = Vec::new();
    for _ in 0..(TICK_RATE as usize * 12) {
        let snap = engine.tick_fixed();
        saw_sieging |= snap.enemies.iter().any(|e| e.mode == EnemyMode::Sieging);
        events.extend(snap.events);
    }

    assert!(saw_sieging);
    let wall = structure_core(&engine, 0);
    assert!(wall.health < wall.max_health);
    // Physical 30 against 0.5 resistance.
    assert_eq!((wall.max_health - wall.health) % 15.0, 0.0);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::BaseAttacked { .. })));
}

#[test]
fn test_goblin_ignores_structures() {
    let game = line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(2.0));
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Wall, 300.0, 130.0);
    run_collect(&mut engine, TICK_RATE as usize * 8);
    let wall = structure_core(&engine, 0);
    assert_eq!(wall.health, wall.max_health);
}

#[test]
fn test_manual_next_wave_when_exhausted() {
    let mut engine = engine_with(line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], None));
    start(&mut engine);
    engine.queue_command(PlayerCommand::StartNextWave);
    let snap = engine.tick_fixed();
    assert!(snap.events.contains(&GameEvent::WaveStarted { wave: 1 }));
    assert_eq!(snap.wave.current, 1);

    // Spawning finished on the first call; the wave is in progress.
    engine.queue_command(PlayerCommand::StartNextWave);
    let snap = engine.tick_fixed();
    assert!(snap.events.contains(&GameEvent::AllWavesCompleted));
    assert_eq!(snap.phase, GamePhase::Active, "Enemies still on the field");
}

#[test]
fn test_scenario_selection() {
    let mut engine = engine_with(quiet_config());
    engine.queue_commands([
        PlayerCommand::SelectScenario {
            scenario: ScenarioId::Siege,
        },
        PlayerCommand::StartGame,
    ]);
    let snap = engine.tick_fixed();
    assert_eq!(snap.wave.total, 4);
}

#[test]
fn test_kill_removes_enemy_after_delay() {
    let mut engine = engine_with(line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(0.0)));
    start(&mut engine);
    engine.queue_command(PlayerCommand::MoveBuilder { x: 0.0, y: 400.0 });
    run_collect(&mut engine, 30);

    engine.damage_enemy(0, 100.0);
    let snap = engine.tick_fixed();
    assert!(snap.events.contains(&GameEvent::ComboChanged {
        combo: 1,
        multiplier: 1.0
    }));
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::EnemyDefeated {
            enemy_id: 0,
            crystal_reward: 5,
            ..
        }
    )));
    assert_eq!(snap.enemies.len(), 1, "Corpse lingers briefly");
    assert!(snap.enemies[0].dead);

    let (events, snap) = run_collect(&mut engine, 20);
    assert!(snap.enemies.is_empty());
    assert!(events.contains(&GameEvent::WaveCompleted { wave: 1 }));
    assert_eq!(engine.pool().available(EnemyKind::Goblin), 1);
}

#[test]
fn test_three_kills_complete_wave_once() {
    let mut engine = engine_with(line_config(vec![group(EnemyKind::Goblin, 3, 0.5)], Some(0.0)));
    let mut events = start(&mut engine).events;
    let (rest, snap) = run_collect(&mut engine, TICK_RATE as usize * 2);
    events.extend(rest);
    assert_eq!(snap.enemies.len(), 3);

    for id in 0..3 {
        engine.damage_enemy(id, 100.0);
    }
    let (rest, snap) = run_collect(&mut engine, TICK_RATE as usize * 2);
    events.extend(rest);

    let defeated = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDefeated { .. }))
        .count();
    let completed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::WaveCompleted { wave: 1 }))
        .count();
    assert_eq!(defeated, 3);
    assert_eq!(completed, 1);
    assert_eq!(snap.phase, GamePhase::Victory);
}

// ---- Scheduled callbacks ----

#[test]
fn test_trap_slow_expires_through_timers() {
    let mut game = line_config(vec![group(EnemyKind::Goblin, 1, 0.0)], Some(2.0));
    game.enemies.get_mut(&EnemyKind::Goblin).unwrap().health = 500.0;
    let mut engine = engine_with(game);
    start(&mut engine);
    build(&mut engine, StructureKind::Trap, 300.0, 100.0);

    let mut saw_slowed = false;
    let mut restored = false;
    let mut last_progress = 0.0;
    for _ in 0..(TICK_RATE as usize * 10) {
        let snap = engine.tick_fixed();
        let Some(view) = snap.enemies.first() else {
            continue;
        };
        assert!(view.progress >= last_progress, "Progress went backwards");
        last_progress = view.progress;

        if view.slowed {
            saw_slowed = true;
            let entity = engine.find_enemy(0).unwrap();
            let stats = engine.world().get::<&EnemyStats>(entity).unwrap();
            assert_eq!(stats.current_speed, stats.base_speed * 0.5);
        } else if saw_slowed && !restored {
            restored = true;
            let entity = engine.find_enemy(0).unwrap();
            let stats = engine.world().get::<&EnemyStats>(entity).unwrap();
            assert_eq!(stats.current_speed, stats.base_speed);
        }
    }
    assert!(saw_slowed);
    assert!(restored);
}

#[test]
fn test_stale_enemy_timers_are_ignored() {
    let mut engine = engine_with(line_config(vec![group(EnemyKind::Goblin, 2, 1.0)], Some(0.0)));
    start(&mut engine);
    let first = engine.find_enemy(0).unwrap();
    let paused = |engine: &SimulationEngine, entity: hecs::Entity| {
        engine.world().get::<&PathFollower>(entity).unwrap().paused
    };

    // Wrong spawn id: the halt stays.
    engine.world_mut().get::<&mut PathFollower>(first).unwrap().paused = true;
    engine.schedule_timer(0.0, TimerAction::SiegeResume { enemy: first, id: 7 });
    engine.tick_fixed();
    assert!(paused(&engine, first));
    engine.schedule_timer(0.0, TimerAction::SiegeResume { enemy: first, id: 0 });
    engine.tick_fixed();
    assert!(!paused(&engine, first));

    // Dead enemy: resuming must not make the corpse walk.
    engine.damage_enemy(0, 100.0);
    engine.schedule_timer(0.0, TimerAction::SiegeResume { enemy: first, id: 0 });
    engine.tick_fixed();
    assert!(paused(&engine, first));
    let corpse_progress = engine.world().get::<&PathFollower>(first).unwrap().progress;
    engine.tick_fixed();
    assert_eq!(
        engine.world().get::<&PathFollower>(first).unwrap().progress,
        corpse_progress
    );

    // The corpse is retired and its entity handed to the next goblin.
    run_collect(&mut engine, TICK_RATE as usize);
    let second = engine.find_enemy(1).unwrap();
    assert_eq!(second, first);

    {
        let (stats, status, follower) = engine
            .world_mut()
            .query_one_mut::<(&mut EnemyStats, &mut EnemyStatus, &mut PathFollower)>(second)
            .unwrap();
        assert!(slow_enemy(stats, status, follower, 0.5));
    }
    engine.schedule_timer(0.0, TimerAction::SlowExpired { enemy: first, id: 0 });
    engine.tick_fixed();
    assert!(engine.world().get::<&EnemyStatus>(second).unwrap().slowed);

    engine.schedule_timer(0.0, TimerAction::SlowExpired { enemy: second, id: 1 });
    engine.tick_fixed();
    assert!(!engine.world().get::<&EnemyStatus>(second).unwrap().slowed);
    let stats = engine.world().get::<&EnemyStats>(second).unwrap();
    assert_eq!(stats.current_speed, stats.base_speed);
}
