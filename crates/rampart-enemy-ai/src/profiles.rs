//! Kind-specific behavioral profiles.
//!
//! Consolidates per-kind parameters for the enemy FSM.

use rampart_core::enums::{DamageType, EnemyKind};

/// Behavioral profile for an enemy kind.
pub struct EnemyBehaviorProfile {
    /// Whether this kind strikes structures it passes.
    pub targets_structures: bool,
    /// Radius in which structures are noticed.
    pub detection_radius: f64,
    /// Minimum seconds between strikes.
    pub siege_cooldown_secs: f64,
    /// How long path motion halts after a strike.
    pub siege_pause_secs: f64,
    pub siege_damage_type: DamageType,
}

/// Get the behavioral profile for a given kind.
pub fn get_profile(kind: EnemyKind) -> EnemyBehaviorProfile {
    use rampart_core::constants::*;

    match kind {
        EnemyKind::Goblin | EnemyKind::Carrier => EnemyBehaviorProfile {
            targets_structures: false,
            detection_radius: 0.0,
            siege_cooldown_secs: 0.0,
            siege_pause_secs: 0.0,
            siege_damage_type: DamageType::Physical,
        },
        EnemyKind::Ogre => EnemyBehaviorProfile {
            targets_structures: true,
            detection_radius: OGRE_DETECTION_RADIUS,
            siege_cooldown_secs: OGRE_SIEGE_COOLDOWN_SECS,
            siege_pause_secs: OGRE_SIEGE_PAUSE_SECS,
            siege_damage_type: DamageType::Physical,
        },
    }
}
