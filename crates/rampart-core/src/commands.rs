//! Player commands sent from input/UI collaborators to the simulation.
//!
//! Commands are queued and applied at the next tick boundary. Invalid
//! commands are no-ops, optionally paired with a `ShowMessage` event.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Building ---
    /// Choose which structure `BuildAt` places.
    SelectStructureType { kind: StructureKind },
    /// Place and start building the selected structure.
    BuildAt { x: f64, y: f64 },
    /// Pay for and begin upgrading a structure.
    StartUpgrade { structure_id: u32 },
    /// Abort an upgrade in progress and refund its cost.
    CancelUpgrade { structure_id: u32 },
    /// Heal a structure by `amount` hit points.
    Repair { structure_id: u32, amount: f64 },
    /// Tear a structure down.
    RemoveStructure { structure_id: u32 },

    // --- Builder ---
    /// Move the builder avatar (clamped to the map).
    MoveBuilder { x: f64, y: f64 },
    /// Dash the builder along a direction.
    TriggerDash { dx: f64, dy: f64 },

    // --- Waves ---
    /// Start the next wave now instead of waiting for the break timer.
    StartNextWave,

    // --- Simulation control ---
    /// Select a preset wave schedule before starting.
    SelectScenario { scenario: ScenarioId },
    /// Leave the lobby and start the game.
    StartGame,
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
    Pause,
    Resume,
}
