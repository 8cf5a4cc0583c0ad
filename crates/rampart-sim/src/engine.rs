//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! fires due timers, runs all systems in a fixed order, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use rampart_core::commands::PlayerCommand;
use rampart_core::components::*;
use rampart_core::config::{ConfigError, GameConfig};
use rampart_core::constants::*;
use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{Position, SimTime};

use crate::builder::{inside_map, Builder};
use crate::combat::KillReport;
use crate::economy::Economy;
use crate::enemy_pool::EnemyPool;
use crate::lifecycle;
use crate::scenario;
use crate::systems;
use crate::systems::wave_spawner::{NextSpawn, WaveScheduler, WaveStart};
use crate::timers::{TimerAction, TimerQueue};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Stat tables, waves, economy and map.
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: GameConfig,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    timers: TimerQueue,

    // --- Rosters (iteration order for ties) ---
    enemies: Vec<Entity>,
    structures: Vec<Entity>,
    kill_buffer: Vec<KillReport>,
    leak_buffer: Vec<Entity>,

    // --- Game state ---
    scenario: Option<ScenarioId>,
    waves: WaveScheduler,
    economy: Economy,
    pool: EnemyPool,
    builder: Builder,
    base_health: f64,
    next_enemy_id: u32,
    next_structure_id: u32,
    next_pile_id: u32,
}

impl SimulationEngine {
    /// Create a new simulation engine. Fails fast on invalid configuration.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.game.validate()?;
        let game = config.game;
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            timers: TimerQueue::new(),
            enemies: Vec::new(),
            structures: Vec::new(),
            kill_buffer: Vec::new(),
            leak_buffer: Vec::new(),
            scenario: None,
            waves: WaveScheduler::new(game.waves.clone()),
            economy: Economy::new(game.economy.clone()),
            pool: EnemyPool::new(ENEMY_POOL_MAX),
            builder: Builder::new(game.map.base),
            base_health: game.base_health,
            next_enemy_id: 0,
            next_structure_id: 0,
            next_pile_id: 0,
            config: game,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `delta_secs` of frame time (scaled by the
    /// time scale) and return the resulting snapshot.
    pub fn tick(&mut self, delta_secs: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = delta_secs.max(0.0) * self.time_scale;
            self.time.advance(dt);
            self.fire_due_timers();
            self.run_systems(dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.base_health,
            &self.waves,
            &self.economy,
            &self.builder,
            &self.enemies,
            &self.structures,
            events,
        )
    }

    /// Advance by one nominal frame.
    pub fn tick_fixed(&mut self) -> GameStateSnapshot {
        self.tick(DT)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    pub fn base_health(&self) -> f64 {
        self.base_health
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn pool(&self) -> &EnemyPool {
        &self.pool
    }

    /// Active enemy roster, in spawn order.
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    /// Structure roster, in build order.
    pub fn structures(&self) -> &[Entity] {
        &self.structures
    }

    /// Entity of the structure with the given id.
    pub fn find_structure(&self, structure_id: u32) -> Option<Entity> {
        self.structures.iter().copied().find(|&entity| {
            self.world
                .get::<&StructureTag>(entity)
                .is_ok_and(|tag| tag.id == structure_id)
        })
    }

    /// Entity of the enemy with the given id, if it is on the roster.
    pub fn find_enemy(&self, enemy_id: u32) -> Option<Entity> {
        self.enemies.iter().copied().find(|&entity| {
            self.world
                .get::<&EnemyTag>(entity)
                .is_ok_and(|tag| tag.id == enemy_id)
        })
    }

    /// Damage a structure directly (for tests of siege-free damage paths).
    #[cfg(test)]
    pub fn damage_structure(&mut self, structure_id: u32, amount: f64, damage_type: DamageType) {
        if let Some(entity) = self.find_structure(structure_id) {
            systems::siege::strike_structure(
                &mut self.world,
                entity,
                amount,
                damage_type,
                &mut self.events,
            );
        }
    }

    /// Damage an enemy directly, resolving the kill like a tower hit.
    #[cfg(test)]
    pub fn damage_enemy(&mut self, enemy_id: u32, amount: f64) {
        if let Some(entity) = self.find_enemy(enemy_id) {
            if let Some(kill) = crate::combat::strike_enemy(&mut self.world, entity, amount) {
                self.kill_buffer.push(kill);
            }
            self.resolve_kills();
        }
    }

    /// Schedule a timer action relative to the current game time.
    #[cfg(test)]
    pub fn schedule_timer(&mut self, delay_secs: f64, action: TimerAction) {
        self.timers.schedule(self.time.elapsed_secs, delay_secs, action);
    }

    /// Mutable world access for test fixtures.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SelectScenario { scenario } => {
                if self.phase == GamePhase::Lobby {
                    self.scenario = Some(scenario);
                }
            }
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::Lobby {
                    self.start_game();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
            _ if self.phase != GamePhase::Active => {
                debug!(?command, phase = ?self.phase, "command ignored outside active play");
            }
            PlayerCommand::SelectStructureType { kind } => {
                self.builder.selected = Some(kind);
            }
            PlayerCommand::BuildAt { x, y } => {
                self.build_at(Position::new(x, y));
            }
            PlayerCommand::StartUpgrade { structure_id } => {
                self.start_upgrade(structure_id);
            }
            PlayerCommand::CancelUpgrade { structure_id } => {
                self.cancel_upgrade(structure_id);
            }
            PlayerCommand::Repair {
                structure_id,
                amount,
            } => {
                self.repair(structure_id, amount);
            }
            PlayerCommand::RemoveStructure { structure_id } => {
                self.remove_structure(structure_id);
            }
            PlayerCommand::MoveBuilder { x, y } => {
                self.builder.move_to(Position::new(x, y), &self.config.map);
            }
            PlayerCommand::TriggerDash { dx, dy } => {
                let now = self.time.elapsed_secs;
                if let Some((from, to)) = self.builder.dash(dx, dy, now, &self.config.map) {
                    self.events.push(GameEvent::BuilderDashed { from, to });
                }
            }
            PlayerCommand::StartNextWave => {
                self.start_next_wave();
            }
        }
    }

    /// Leave the lobby: reset the world, fund the player, arm the recurring
    /// timers and the optional automatic first wave.
    fn start_game(&mut self) {
        self.world.clear();
        self.timers.clear();
        self.enemies.clear();
        self.structures.clear();
        self.pool.clear();
        self.time = SimTime::default();

        let waves = match self.scenario {
            Some(id) => scenario::build_schedule(id),
            None => self.config.waves.clone(),
        };
        info!(
            waves = waves.len(),
            enemies = scenario::total_enemies(&waves),
            "game started"
        );
        self.waves = WaveScheduler::new(waves);
        self.economy = Economy::new(self.config.economy.clone());
        self.economy
            .credit(self.config.economy.initial_resources, &mut self.events);
        self.builder = Builder::new(self.config.map.base);
        self.base_health = self.config.base_health;
        self.phase = GamePhase::Active;

        self.timers.schedule(
            0.0,
            self.config.economy.combo_check_interval_secs,
            TimerAction::ComboCheck,
        );
        if let Some(delay) = self.config.first_wave_delay_secs {
            self.timers
                .schedule(0.0, delay, TimerAction::StartNextWave { after_wave: 0 });
        }
    }

    fn show_message(&mut self, message: &str) {
        self.events.push(GameEvent::ShowMessage {
            message: message.to_string(),
            duration_secs: MESSAGE_DURATION_SECS,
        });
    }

    // ---- Waves ----

    /// Start the next wave: no-op while spawning, `AllWavesCompleted` once
    /// the sequence is exhausted.
    pub(crate) fn start_next_wave(&mut self) {
        match self.waves.start_next_wave() {
            WaveStart::Busy => {
                debug!("start_next_wave ignored: wave still spawning");
            }
            WaveStart::Exhausted => {
                self.events.push(GameEvent::AllWavesCompleted);
                if self.enemies.is_empty() {
                    self.declare_victory();
                }
            }
            WaveStart::Started(wave) => {
                info!(wave, "wave started");
                self.events.push(GameEvent::WaveStarted { wave });
                self.spawn_next(wave);
            }
        }
    }

    /// Spawn the next enemy of `wave` and schedule whatever follows.
    fn spawn_next(&mut self, wave: u32) {
        let Some(step) = self.waves.next_spawn(wave) else {
            return;
        };
        let now = self.time.elapsed_secs;

        let defended: Vec<Position> = self
            .structures
            .iter()
            .filter_map(|&entity| {
                let core = self.world.get::<&StructureCore>(entity).ok()?;
                if core.state == StructureState::Destroyed {
                    return None;
                }
                self.world.get::<&Position>(entity).ok().map(|p| *p)
            })
            .collect();
        let spawn_index = systems::wave_spawner::resolve_spawn_index(
            step.side,
            &self.config.map.spawn_points,
            &defended,
            WEAKEST_SIDE_RADIUS,
            &mut self.rng,
        );

        if let (Some(spec), Some(path)) = (
            self.config.enemies.get(&step.enemy),
            self.config.map.paths.get(spawn_index),
        ) {
            let id = self.next_enemy_id;
            self.next_enemy_id += 1;
            let entity = world_setup::spawn_enemy(
                &mut self.world,
                &mut self.pool,
                id,
                step.enemy,
                spec,
                spawn_index,
                path,
            );
            self.enemies.push(entity);
            debug!(id, kind = ?step.enemy, spawn_index, "enemy spawned");
            self.events.push(GameEvent::EnemySpawned {
                enemy_id: id,
                kind: step.enemy,
                spawn_index,
            });
        }

        match step.next {
            NextSpawn::After(delay) => {
                self.timers
                    .schedule(now, delay, TimerAction::SpawnNext { wave });
            }
            NextSpawn::Finished { break_time_secs } => {
                debug!(wave, "wave finished spawning");
                if break_time_secs > 0.0 {
                    self.timers
                        .schedule(now, break_time_secs, TimerAction::BreakElapsed { wave });
                }
            }
        }
    }

    /// Fire `WaveCompleted` (once per wave) when spawning is done and the
    /// roster is empty; queue the next wave or finish the game.
    fn check_wave_completion(&mut self) {
        if self.phase != GamePhase::Active || !self.waves.try_complete(self.enemies.is_empty()) {
            return;
        }
        let wave = self.waves.current_wave();
        info!(wave, "wave completed");
        self.events.push(GameEvent::WaveCompleted { wave });
        self.spawn_bonus_piles();

        if self.waves.has_more_waves() {
            let now = self.time.elapsed_secs;
            self.timers.schedule(
                now,
                self.waves.break_time_secs(wave),
                TimerAction::StartNextWave { after_wave: wave },
            );
        } else {
            self.events.push(GameEvent::AllWavesCompleted);
            self.declare_victory();
        }
    }

    fn declare_victory(&mut self) {
        if self.phase == GamePhase::Active {
            info!(base_health = self.base_health, "all waves cleared");
            self.phase = GamePhase::Victory;
        }
    }

    fn spawn_bonus_piles(&mut self) {
        let (width, height) = (self.config.map.width, self.config.map.height);
        let margin = BONUS_PILE_MARGIN.min(width / 2.0).min(height / 2.0);
        for _ in 0..self.config.economy.wave_bonus_piles {
            let position = Position::new(
                self.rng.gen_range(margin..=width - margin),
                self.rng.gen_range(margin..=height - margin),
            );
            let value = self.config.economy.wave_bonus_pile_value;
            self.spawn_pile(position, value, PileRarity::Normal);
        }
    }

    fn spawn_pile(&mut self, position: Position, value: u32, rarity: PileRarity) {
        let pile_id = self.next_pile_id;
        self.next_pile_id += 1;
        world_setup::spawn_pile(&mut self.world, pile_id, position, value, rarity);
        self.events.push(GameEvent::PileSpawned {
            pile_id,
            position,
            value,
            rarity,
        });
    }

    // ---- Structures ----

    fn build_at(&mut self, position: Position) {
        let Some(kind) = self.builder.selected else {
            self.show_message(MSG_NO_STRUCTURE_SELECTED);
            return;
        };
        if !inside_map(&position, &self.config.map) || self.is_occupied(&position) {
            self.show_message(MSG_CANNOT_BUILD_HERE);
            return;
        }
        let Some(spec) = self.config.structures.get(&kind) else {
            warn!(?kind, "no stat table for structure kind");
            return;
        };
        if !self.economy.debit(spec.cost, &mut self.events) {
            self.show_message(MSG_NOT_ENOUGH_CRYSTALS);
            return;
        }

        let id = self.next_structure_id;
        let Some(entity) =
            world_setup::spawn_structure(&mut self.world, id, kind, position, spec)
        else {
            return;
        };
        self.next_structure_id += 1;
        if let Ok(mut core) = self.world.get::<&mut StructureCore>(entity) {
            lifecycle::start_building(&mut core);
        }
        self.structures.push(entity);
        debug!(id, ?kind, x = position.x, y = position.y, "build started");
        self.events.push(GameEvent::BuildStarted {
            structure_id: id,
            kind,
            position,
        });
    }

    /// Another live structure sits within one grid cell.
    fn is_occupied(&self, position: &Position) -> bool {
        self.structures.iter().any(|&entity| {
            let destroyed = self
                .world
                .get::<&StructureCore>(entity)
                .map_or(true, |core| core.state == StructureState::Destroyed);
            !destroyed
                && self
                    .world
                    .get::<&Position>(entity)
                    .is_ok_and(|p| p.distance_to(position) < GRID_CELL_SIZE)
        })
    }

    fn start_upgrade(&mut self, structure_id: u32) {
        let Some(entity) = self.find_structure(structure_id) else {
            warn!(structure_id, "upgrade for unknown structure");
            return;
        };
        let Ok(tag) = self.world.get::<&StructureTag>(entity).map(|t| *t) else {
            return;
        };
        let Some(spec) = self.config.structures.get(&tag.kind) else {
            return;
        };
        let (state, level, can_upgrade) = match self.world.get::<&StructureCore>(entity) {
            Ok(core) => (core.state, core.level, lifecycle::can_upgrade(&core, spec)),
            Err(_) => return,
        };
        if !matches!(state, StructureState::Active | StructureState::Damaged) {
            return;
        }
        if !can_upgrade {
            self.show_message(MSG_MAX_LEVEL);
            return;
        }
        let cost = spec.upgrade_costs[level as usize];
        if !self.economy.debit(cost, &mut self.events) {
            self.show_message(MSG_NOT_ENOUGH_CRYSTALS);
            return;
        }
        if let Ok(mut core) = self.world.get::<&mut StructureCore>(entity) {
            core.state = StructureState::Upgrading;
            core.upgrade_progress = 0.0;
            core.upgrade_paid = cost;
        }
        debug!(structure_id, cost, "upgrade started");
        self.events
            .push(GameEvent::UpgradeStarted { structure_id, cost });
    }

    fn cancel_upgrade(&mut self, structure_id: u32) {
        let Some(entity) = self.find_structure(structure_id) else {
            return;
        };
        let refund = match self.world.get::<&mut StructureCore>(entity) {
            Ok(mut core) if core.state == StructureState::Upgrading => {
                core.state = if core.health < core.max_health {
                    StructureState::Damaged
                } else {
                    StructureState::Active
                };
                core.upgrade_progress = 0.0;
                std::mem::take(&mut core.upgrade_paid)
            }
            _ => return,
        };
        self.economy.credit(refund, &mut self.events);
        self.events
            .push(GameEvent::UpgradeCancelled { structure_id, refund });
    }

    fn repair(&mut self, structure_id: u32, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        let Some(entity) = self.find_structure(structure_id) else {
            warn!(structure_id, "repair for unknown structure");
            return;
        };
        let now = self.time.elapsed_secs;
        let cooldown_secs = self.config.economy.repair_cooldown_secs;
        let (repairable, cooling_down, missing) = match self.world.get::<&StructureCore>(entity) {
            Ok(core) => (
                matches!(
                    core.state,
                    StructureState::Active | StructureState::Damaged | StructureState::Upgrading
                ) && core.health < core.max_health,
                core.last_repair_secs
                    .is_some_and(|last| now - last < cooldown_secs),
                core.max_health - core.health,
            ),
            Err(_) => return,
        };
        if !repairable {
            return;
        }
        if cooling_down {
            self.show_message(MSG_REPAIR_NOT_READY);
            return;
        }
        // Only the health actually restored is paid for.
        let amount = amount.min(missing);
        let economy = &self.config.economy;
        let cost = (amount * economy.repair_cost as f64 / economy.repair_heal).ceil() as u32;
        if !self.economy.debit(cost, &mut self.events) {
            self.show_message(MSG_NOT_ENOUGH_CRYSTALS);
            return;
        }
        if let Ok(mut core) = self.world.get::<&mut StructureCore>(entity) {
            lifecycle::repair(&mut core, amount);
            core.last_repair_secs = Some(now);
            let health = core.health;
            drop(core);
            self.events.push(GameEvent::StructureRepaired {
                structure_id,
                health,
            });
        }
    }

    fn remove_structure(&mut self, structure_id: u32) {
        let Some(entity) = self.find_structure(structure_id) else {
            return;
        };
        let Ok((tag, core)) = self
            .world
            .query_one_mut::<(&StructureTag, &mut StructureCore)>(entity)
        else {
            return;
        };
        if core.state == StructureState::Destroyed {
            return;
        }
        core.state = StructureState::Destroyed;
        debug!(structure_id, "structure removed");
        self.events.push(GameEvent::StructureDestroyed {
            structure_id,
            kind: tag.kind,
        });
    }

    // ---- Timers ----

    /// Pop and apply every timer due at the current game time.
    fn fire_due_timers(&mut self) {
        let now = self.time.elapsed_secs;
        while let Some(action) = self.timers.pop_due(now) {
            self.fire_timer(action);
        }
    }

    fn fire_timer(&mut self, action: TimerAction) {
        let now = self.time.elapsed_secs;
        match action {
            TimerAction::SpawnNext { wave } => self.spawn_next(wave),
            TimerAction::BreakElapsed { wave } => {
                if wave == self.waves.current_wave() {
                    self.check_wave_completion();
                }
            }
            TimerAction::StartNextWave { after_wave } => {
                if after_wave == self.waves.current_wave() {
                    self.start_next_wave();
                }
            }
            TimerAction::SlowExpired { enemy, id } => {
                if !crate::combat::is_same_live_enemy(&self.world, enemy, id) {
                    return;
                }
                if let Ok((stats, status, follower)) = self
                    .world
                    .query_one_mut::<(&mut EnemyStats, &mut EnemyStatus, &mut PathFollower)>(enemy)
                {
                    lifecycle::end_slow(stats, status, follower);
                }
            }
            TimerAction::SiegeResume { enemy, id } => {
                if !crate::combat::is_same_live_enemy(&self.world, enemy, id) {
                    return;
                }
                if let Ok(mut follower) = self.world.get::<&mut PathFollower>(enemy) {
                    follower.paused = false;
                }
            }
            TimerAction::RemoveEnemy { enemy, id } => {
                let matches = self
                    .world
                    .get::<&EnemyTag>(enemy)
                    .is_ok_and(|tag| tag.id == id);
                if matches {
                    if let Ok(mut status) = self.world.get::<&mut EnemyStatus>(enemy) {
                        status.active = false;
                    }
                }
            }
            TimerAction::TrapRearm { trap } => {
                if let Ok(mut trigger) = self.world.get::<&mut TrapTrigger>(trap) {
                    trigger.ready = true;
                }
            }
            TimerAction::ComboCheck => {
                self.economy.check_combo_decay(now, &mut self.events);
                self.timers.schedule(
                    now,
                    self.config.economy.combo_check_interval_secs,
                    TimerAction::ComboCheck,
                );
            }
        }
    }

    // ---- Kills and leaks ----

    /// Reward every kill reported since the last call and schedule the
    /// corpse's removal.
    fn resolve_kills(&mut self) {
        let now = self.time.elapsed_secs;
        let kills = std::mem::take(&mut self.kill_buffer);
        for kill in &kills {
            debug!(enemy_id = kill.id, reward = kill.reward, "enemy defeated");
            self.events.push(GameEvent::EnemyDefeated {
                enemy_id: kill.id,
                position: kill.position,
                crystal_reward: kill.reward,
            });
            let drop = self
                .economy
                .on_enemy_killed(now, kill.reward, &mut self.rng, &mut self.events);
            if let Some(pile) = drop {
                self.spawn_pile(kill.position, pile.value, pile.rarity);
            }
            self.timers.schedule(
                now,
                ENEMY_REMOVAL_DELAY_SECS,
                TimerAction::RemoveEnemy {
                    enemy: kill.entity,
                    id: kill.id,
                },
            );
        }
        self.kill_buffer = kills;
        self.kill_buffer.clear();
    }

    /// Enemies that reached the base: damage it and take them out of play.
    fn resolve_leaks(&mut self) {
        let leaks = std::mem::take(&mut self.leak_buffer);
        for &entity in &leaks {
            let damage = match self
                .world
                .query_one_mut::<(&EnemyStats, &mut EnemyStatus)>(entity)
            {
                Ok((stats, status)) => {
                    status.active = false;
                    stats.damage
                }
                Err(_) => continue,
            };
            self.base_health = (self.base_health - damage).max(0.0);
            debug!(damage, base_health = self.base_health, "base attacked");
            self.events.push(GameEvent::BaseAttacked { damage });

            if self.base_health <= 0.0 && self.phase == GamePhase::Active {
                info!("base destroyed");
                self.events.push(GameEvent::BaseDestroyed);
                self.phase = GamePhase::Defeat;
            }
        }
        self.leak_buffer = leaks;
        self.leak_buffer.clear();
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Construction and upgrade progress
        systems::construction::run(
            &mut self.world,
            &self.structures,
            &self.config,
            dt,
            &mut self.events,
        );
        // 2. Tower targeting and firing
        systems::tower::run(
            &mut self.world,
            &self.structures,
            &self.enemies,
            now,
            &mut self.events,
        );
        // 3. Projectile pursuit and hits
        systems::projectile::run(
            &mut self.world,
            dt,
            &mut self.kill_buffer,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        self.resolve_kills();
        // 4. Trap triggers
        systems::trap::run(
            &mut self.world,
            &self.structures,
            &self.enemies,
            now,
            &mut self.timers,
            &mut self.kill_buffer,
            &mut self.events,
        );
        self.resolve_kills();
        // 5. Path motion
        systems::movement::run(
            &mut self.world,
            &self.enemies,
            &self.config.map.paths,
            dt,
            &mut self.leak_buffer,
        );
        self.resolve_leaks();
        // 6. Siege strikes
        systems::siege::run(
            &mut self.world,
            &self.enemies,
            &self.structures,
            now,
            &mut self.timers,
            &mut self.events,
        );
        // 7. Wave update: recycle inactive enemies, check completion
        systems::wave_spawner::retire_inactive(&mut self.world, &mut self.enemies, &mut self.pool);
        if !self.waves.is_spawning() && self.enemies.is_empty() {
            self.check_wave_completion();
        }
        // 8. Pile pickup
        systems::pickups::run(
            &mut self.world,
            &self.builder.position,
            &mut self.economy,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 9. Cleanup (destroyed structures)
        systems::cleanup::run(&mut self.world, &mut self.structures, &mut self.despawn_buffer);
    }
}
