//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks an entity as an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Stable identity of an enemy, used in events and snapshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyTag {
    pub id: u32,
    pub kind: EnemyKind,
}

/// Combat and movement stats of an enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f64,
    pub max_health: f64,
    pub base_speed: f64,
    /// Speed currently in effect (base speed times any slow factor).
    pub current_speed: f64,
    /// Damage dealt to the base on arrival, or to structures while sieging.
    pub damage: f64,
    pub crystal_reward: u32,
}

/// Transient flags of an enemy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnemyStatus {
    /// In play. Cleared when the enemy leaks or its corpse is removed;
    /// inactive enemies leave the roster on the next wave update.
    pub active: bool,
    /// Set exactly once, when health first reaches zero.
    pub dead: bool,
    pub slowed: bool,
    pub mode: EnemyMode,
}

/// Progress of an enemy along its path.
///
/// Motion is a linear tween: `progress` covers the rest of the path in
/// `remaining_secs`, which is re-derived whenever the speed changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFollower {
    /// Index into the map's path list.
    pub path_index: usize,
    /// Cached arc length of the path.
    pub path_length: f64,
    /// Normalized progress in [0, 1].
    pub progress: f64,
    /// Seconds left to reach the end at the current speed.
    pub remaining_secs: f64,
    /// Motion is suspended (death, siege halt).
    pub paused: bool,
}

/// Siege bookkeeping for structure-targeting enemies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SiegeState {
    /// Game time of the last strike on a structure.
    pub last_strike_secs: Option<f64>,
    /// Structure struck last, for display.
    pub last_target: Option<u32>,
}

/// Marks an entity as a player structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Structure;

/// Stable identity of a structure, used in commands, events and snapshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StructureTag {
    pub id: u32,
    pub kind: StructureKind,
}

/// Shared lifecycle state of every structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureCore {
    pub state: StructureState,
    /// Zero-based level index.
    pub level: u8,
    pub health: f64,
    pub max_health: f64,
    /// Fraction of non-true damage absorbed, in [0, 1).
    pub damage_resistance: f64,
    /// Construction progress in [0, 1].
    pub build_progress: f64,
    pub build_time_secs: f64,
    /// Upgrade progress in [0, 1] while `Upgrading`.
    pub upgrade_progress: f64,
    /// Crystals paid for the upgrade in flight, refunded on cancel.
    pub upgrade_paid: u32,
    /// Game time of the last repair.
    pub last_repair_secs: Option<f64>,
}

/// Ranged attack state of a Tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerWeapon {
    pub range: f64,
    pub damage: f64,
    /// Minimum seconds between shots.
    pub attack_interval_secs: f64,
    pub damage_type: DamageType,
    /// Game time of the last shot; `None` until the first shot.
    pub last_attack_secs: Option<f64>,
    /// Enemy currently targeted.
    pub target: Option<u32>,
}

/// Proximity trigger state of a Trap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapTrigger {
    pub radius: f64,
    pub damage: f64,
    /// Speed multiplier applied to the victim.
    pub slow_factor: f64,
    pub slow_duration_secs: f64,
    pub cooldown_secs: f64,
    pub ready: bool,
    pub last_trigger_secs: Option<f64>,
}

/// A collectible crystal pile lying on the map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResourcePile {
    pub id: u32,
    pub value: u32,
    pub rarity: PileRarity,
}
