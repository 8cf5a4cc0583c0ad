//! Game state snapshot: the complete visible state handed to renderers each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub base_health: f64,
    pub wave: WaveView,
    pub economy: EconomyView,
    pub builder: BuilderView,
    pub enemies: Vec<EnemyView>,
    pub structures: Vec<StructureView>,
    pub projectiles: Vec<ProjectileView>,
    pub piles: Vec<PileView>,
    /// Events emitted during this tick, in order.
    pub events: Vec<GameEvent>,
}

/// Wave progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// One-based index of the current wave, 0 before the first.
    pub current: u32,
    pub total: u32,
    pub spawning: bool,
    pub in_progress: bool,
    pub active_enemies: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub resources: u32,
    pub combo: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderView {
    pub position: Position,
    /// Dash readiness, 0.0 right after a dash, 1.0 when ready.
    pub dash_ready: f64,
    pub selected: Option<StructureKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub progress: f64,
    /// Renderers tint slowed enemies.
    pub slowed: bool,
    pub dead: bool,
    pub mode: EnemyMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureView {
    pub id: u32,
    pub kind: StructureKind,
    pub position: Position,
    pub state: StructureState,
    pub level: u8,
    pub health: f64,
    pub max_health: f64,
    pub build_progress: f64,
    pub upgrade_progress: f64,
    /// Attack or trigger radius, for range indicators.
    pub range: Option<f64>,
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub target_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileView {
    pub id: u32,
    pub position: Position,
    pub value: u32,
    pub rarity: PileRarity,
}
