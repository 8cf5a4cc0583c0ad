//! Events emitted by the simulation for rendering, UI and audio.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Everything observable that happened during a tick, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    // --- Waves ---
    WaveStarted { wave: u32 },
    WaveCompleted { wave: u32 },
    AllWavesCompleted,
    EnemySpawned {
        enemy_id: u32,
        kind: EnemyKind,
        spawn_index: usize,
    },

    // --- Enemies ---
    EnemyDefeated {
        enemy_id: u32,
        position: Position,
        crystal_reward: u32,
    },
    /// An enemy reached the end of its path.
    BaseAttacked { damage: f64 },
    BaseDestroyed,

    // --- Structures ---
    BuildStarted {
        structure_id: u32,
        kind: StructureKind,
        position: Position,
    },
    BuildComplete {
        structure_id: u32,
        kind: StructureKind,
    },
    StructureDestroyed {
        structure_id: u32,
        kind: StructureKind,
    },
    UpgradeStarted { structure_id: u32, cost: u32 },
    UpgradeComplete { structure_id: u32, level: u8 },
    UpgradeCancelled { structure_id: u32, refund: u32 },
    StructureRepaired { structure_id: u32, health: f64 },

    // --- Combat ---
    TrapTriggered {
        trap_id: u32,
        target_id: u32,
        damage: f64,
        slow_factor: f64,
    },
    ProjectileFired { tower_id: u32, target_id: u32 },
    ProjectileHit { target_id: u32, damage: f64 },

    // --- Economy ---
    CrystalsUpdated { amount: u32 },
    ComboChanged { combo: u32, multiplier: f64 },
    PileSpawned {
        pile_id: u32,
        position: Position,
        value: u32,
        rarity: PileRarity,
    },
    PileCollected { pile_id: u32, value: u32 },

    // --- Builder ---
    BuilderDashed { from: Position, to: Position },

    /// Player-facing message for the UI.
    ShowMessage { message: String, duration_secs: f64 },
}
