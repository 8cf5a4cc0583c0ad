//! Rampart headless runner.
//!
//! Plays one full game without a renderer: builds a fixed defence around the
//! base, runs the simulation at the nominal tick rate until victory, defeat or
//! the time limit, and logs a summary. Useful for balancing config files and
//! for checking that a seed replays identically.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rampart_core::commands::PlayerCommand;
use rampart_core::config::GameConfig;
use rampart_core::enums::{GamePhase, ScenarioId, StructureKind};
use rampart_core::events::GameEvent;
use rampart_core::types::Position;
use rampart_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    Skirmish,
    Siege,
}

impl From<Scenario> for ScenarioId {
    fn from(scenario: Scenario) -> Self {
        match scenario {
            Scenario::Skirmish => ScenarioId::Skirmish,
            Scenario::Siege => ScenarioId::Siege,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rampart-headless")]
#[command(about = "Run a Rampart game without a renderer")]
struct Args {
    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Wave schedule to play
    #[arg(long, value_enum)]
    scenario: Option<Scenario>,

    /// Stop after this many seconds of game time
    #[arg(long, default_value = "300")]
    max_secs: f64,

    /// JSON game configuration (defaults to the built-in tables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Skip the scripted build order
    #[arg(long)]
    no_defence: bool,
}

/// Counters gathered from the event stream.
#[derive(Debug, Default)]
struct Tally {
    spawned: u32,
    defeated: u32,
    leaked: u32,
    built: u32,
    lost: u32,
    piles: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemySpawned { .. } => self.spawned += 1,
            GameEvent::EnemyDefeated { .. } => self.defeated += 1,
            GameEvent::BaseAttacked { .. } => self.leaked += 1,
            GameEvent::BuildComplete { .. } => self.built += 1,
            GameEvent::StructureDestroyed { .. } => self.lost += 1,
            GameEvent::PileCollected { .. } => self.piles += 1,
            GameEvent::WaveStarted { wave } => info!(wave, "wave started"),
            GameEvent::WaveCompleted { wave } => info!(wave, "wave completed"),
            GameEvent::ShowMessage { message, .. } => debug!(%message, "message"),
            _ => {}
        }
    }
}

/// A tower covering each path corner plus a wall and a trap at the base.
fn build_order(config: &GameConfig) -> Vec<PlayerCommand> {
    let mut commands = Vec::new();
    let mut place = |kind: StructureKind, at: Position| {
        commands.push(PlayerCommand::SelectStructureType { kind });
        commands.push(PlayerCommand::BuildAt { x: at.x, y: at.y });
    };

    for path in &config.map.paths {
        if let Some(corner) = path.points.get(1) {
            place(StructureKind::Tower, Position::new(corner.x, corner.y + 72.0));
        }
    }
    let base = config.map.base;
    place(StructureKind::Trap, Position::new(base.x, base.y + 96.0));
    place(StructureKind::Wall, Position::new(base.x - 80.0, base.y + 160.0));
    commands
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(GameConfig::from_json(&json)?)
        }
        None => Ok(GameConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let game = load_config(args.config.as_ref())?;

    if args.dump_config {
        println!("{}", game.to_json_pretty()?);
        return Ok(());
    }

    let defence = build_order(&game);
    let mut engine = SimulationEngine::new(SimConfig {
        seed: args.seed,
        game,
        ..Default::default()
    })?;

    if let Some(scenario) = args.scenario {
        engine.queue_command(PlayerCommand::SelectScenario {
            scenario: scenario.into(),
        });
    }
    engine.queue_command(PlayerCommand::StartGame);
    if !args.no_defence {
        engine.queue_commands(defence);
    }

    info!(seed = args.seed, scenario = ?args.scenario, "starting headless run");
    let mut tally = Tally::default();
    let snapshot = loop {
        let snapshot = engine.tick_fixed();
        for event in &snapshot.events {
            tally.record(event);
        }
        // Walk to the oldest pile on the field.
        if let Some(pile) = snapshot.piles.first() {
            engine.queue_command(PlayerCommand::MoveBuilder {
                x: pile.position.x,
                y: pile.position.y,
            });
        }
        let finished = matches!(snapshot.phase, GamePhase::Victory | GamePhase::Defeat);
        if finished || snapshot.time.elapsed_secs >= args.max_secs {
            break snapshot;
        }
    };

    if snapshot.phase == GamePhase::Active {
        warn!(max_secs = args.max_secs, "time limit reached before the game ended");
    }
    info!(
        outcome = ?snapshot.phase,
        secs = %format!("{:.1}", snapshot.time.elapsed_secs),
        waves = %format!("{}/{}", snapshot.wave.current, snapshot.wave.total),
        base_health = snapshot.base_health,
        crystals = snapshot.economy.resources,
        spawned = tally.spawned,
        defeated = tally.defeated,
        leaked = tally.leaked,
        built = tally.built,
        lost = tally.lost,
        piles = tally.piles,
        "run finished"
    );
    Ok(())
}
