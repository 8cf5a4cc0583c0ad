//! Wave scheduling: which enemy spawns next, from which entrance, and when
//! a wave counts as complete.
//!
//! The scheduler is pure bookkeeping. The engine drives it from the timer
//! queue (`SpawnNext`, `BreakElapsed`, `StartNextWave`) and from the
//! per-tick update, and performs the actual spawning.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampart_core::components::{EnemyStatus, EnemyTag};
use rampart_core::config::WaveDefinition;
use rampart_core::enums::{EnemyKind, SpawnSide};
use rampart_core::types::Position;

use crate::enemy_pool::EnemyPool;

/// Outcome of a request to start the next wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStart {
    /// A wave is still spawning; request ignored.
    Busy,
    /// No waves left.
    Exhausted,
    /// Wave with this one-based index started.
    Started(u32),
}

/// What follows a spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextSpawn {
    /// Another enemy of this wave is due after this many seconds.
    After(f64),
    /// That was the wave's last enemy.
    Finished { break_time_secs: f64 },
}

/// One enemy to spawn now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnStep {
    pub enemy: EnemyKind,
    pub side: SpawnSide,
    pub next: NextSpawn,
}

#[derive(Debug, Clone, Copy, Default)]
struct SpawnCursor {
    group: usize,
    index: u32,
}

/// Progress through the wave sequence.
#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    waves: Vec<WaveDefinition>,
    /// One-based index of the current wave; 0 before the first.
    current_wave: u32,
    spawning: bool,
    /// Set when the current wave's completion fires; reset only by
    /// `start_next_wave`.
    wave_complete: bool,
    cursor: SpawnCursor,
}

impl WaveScheduler {
    pub fn new(waves: Vec<WaveDefinition>) -> Self {
        Self {
            waves,
            ..Default::default()
        }
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn total_waves(&self) -> u32 {
        self.waves.len() as u32
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    pub fn is_wave_complete(&self) -> bool {
        self.wave_complete
    }

    pub fn has_more_waves(&self) -> bool {
        (self.current_wave as usize) < self.waves.len()
    }

    /// Break after `wave` (one-based), or zero for an unknown wave.
    pub fn break_time_secs(&self, wave: u32) -> f64 {
        wave.checked_sub(1)
            .and_then(|index| self.waves.get(index as usize))
            .map_or(0.0, |w| w.break_time_secs)
    }

    /// Advance to the next wave unless one is still spawning.
    pub fn start_next_wave(&mut self) -> WaveStart {
        if self.spawning {
            return WaveStart::Busy;
        }
        if !self.has_more_waves() {
            return WaveStart::Exhausted;
        }
        self.current_wave += 1;
        self.wave_complete = false;
        self.spawning = true;
        self.cursor = SpawnCursor::default();
        WaveStart::Started(self.current_wave)
    }

    /// Take the next enemy of `wave`. Returns `None` for a stale wave token
    /// or once spawning has finished, so a late timer can never spawn twice.
    pub fn next_spawn(&mut self, wave: u32) -> Option<SpawnStep> {
        if !self.spawning || wave != self.current_wave {
            return None;
        }
        let definition = self.waves.get(wave as usize - 1)?;
        let group = definition.groups.get(self.cursor.group)?;
        let (enemy, side, delay) = (group.enemy, group.side, group.inter_spawn_delay_secs);

        self.cursor.index += 1;
        let group_done = self.cursor.index >= group.count;
        if group_done {
            self.cursor.group += 1;
            self.cursor.index = 0;
        }

        let next = if self.cursor.group >= definition.groups.len() {
            self.spawning = false;
            NextSpawn::Finished {
                break_time_secs: definition.break_time_secs,
            }
        } else if group_done {
            // Next group starts right away.
            NextSpawn::After(0.0)
        } else {
            NextSpawn::After(delay)
        };
        Some(SpawnStep { enemy, side, next })
    }

    /// Mark the current wave complete if it is done. True exactly once per wave.
    pub fn try_complete(&mut self, roster_empty: bool) -> bool {
        if self.current_wave == 0 || self.spawning || !roster_empty || self.wave_complete {
            return false;
        }
        self.wave_complete = true;
        true
    }
}

/// Index of the spawn point with the fewest structures strictly within
/// `radius`. Ties go to the lowest index.
pub fn weakest_spawn_index(spawn_points: &[Position], structures: &[Position], radius: f64) -> usize {
    let mut weakest = 0;
    let mut lowest = usize::MAX;
    for (index, spawn) in spawn_points.iter().enumerate() {
        let count = structures
            .iter()
            .filter(|s| spawn.distance_to(s) < radius)
            .count();
        if count < lowest {
            lowest = count;
            weakest = index;
        }
    }
    weakest
}

/// Resolve a spawn side to a concrete spawn point index.
pub fn resolve_spawn_index(
    side: SpawnSide,
    spawn_points: &[Position],
    structures: &[Position],
    radius: f64,
    rng: &mut ChaCha8Rng,
) -> usize {
    let count = spawn_points.len().max(1);
    let index = match side {
        SpawnSide::Left => 0,
        SpawnSide::Right => 1.min(count - 1),
        SpawnSide::Weakest => weakest_spawn_index(spawn_points, structures, radius),
        SpawnSide::Random => rng.gen_range(0..count),
    };
    index.min(count - 1)
}

/// Drop inactive enemies from the roster and hand them to the pool.
pub fn retire_inactive(world: &mut World, roster: &mut Vec<Entity>, pool: &mut EnemyPool) {
    roster.retain(|&entity| {
        let active = world.get::<&EnemyStatus>(entity).ok().map(|s| s.active);
        let kind = world.get::<&EnemyTag>(entity).ok().map(|t| t.kind);
        match (active, kind) {
            (Some(true), Some(_)) => true,
            (Some(false), Some(kind)) => {
                pool.release(kind, entity, world);
                false
            }
            _ => false,
        }
    });
}
