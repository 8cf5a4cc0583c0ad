//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Fast, fragile, cheap.
    #[default]
    Goblin,
    /// Mid-weight runner with a larger bounty.
    Carrier,
    /// Slow heavy that breaks off to smash nearby structures.
    Ogre,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Goblin, EnemyKind::Carrier, EnemyKind::Ogre];
}

/// Player-built structure type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StructureKind {
    /// Passive blocker with high resistance.
    #[default]
    Wall,
    /// Ranged attacker firing pursuit projectiles.
    Tower,
    /// Proximity trigger that damages and slows one enemy.
    Trap,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] =
        [StructureKind::Wall, StructureKind::Tower, StructureKind::Trap];
}

/// Structure lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureState {
    /// Placed but construction has not started.
    #[default]
    Placing,
    Building,
    Active,
    /// Below max health; still fully functional.
    Damaged,
    Upgrading,
    /// Terminal.
    Destroyed,
}

/// Damage classification used by resistance calculations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Physical,
    Magical,
    /// Ignores damage resistance entirely.
    True,
}

/// Which entrance a spawn group uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnSide {
    /// Spawn point 0.
    #[default]
    Left,
    /// Spawn point 1 (or the only one).
    Right,
    /// The spawn point with the fewest structures nearby.
    Weakest,
    /// Uniformly random spawn point. Unknown side names land here too.
    #[serde(other)]
    Random,
}

/// Overall game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Configured but not started.
    #[default]
    Lobby,
    Active,
    Paused,
    /// Every wave cleared.
    Victory,
    /// Base health reached zero.
    Defeat,
}

/// Enemy movement mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyMode {
    /// Following its path toward the base.
    #[default]
    Marching,
    /// Halted while striking a structure.
    Sieging,
}

/// Resource pile rarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileRarity {
    #[default]
    Normal,
    Rare,
}

/// Preset wave schedules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Three-wave adaptive schedule with a weakest-entrance Ogre.
    #[default]
    Skirmish,
    /// Four escalating waves ending in an Ogre push.
    Siege,
}
