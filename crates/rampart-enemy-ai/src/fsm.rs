//! Enemy siege finite state machine.
//!
//! Pure functions that decide whether an enemy strikes a nearby structure
//! and how its movement mode changes. No ECS dependency: operates on
//! plain data gathered by the simulation.

use rampart_core::enums::{DamageType, EnemyKind, EnemyMode};

use crate::profiles::{get_profile, EnemyBehaviorProfile};

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext {
    pub kind: EnemyKind,
    pub mode: EnemyMode,
    pub dead: bool,
    /// Path motion is currently halted.
    pub halted: bool,
    pub now_secs: f64,
    pub last_strike_secs: Option<f64>,
    /// Distance to the nearest live structure, if any exists.
    pub nearest_structure_distance: Option<f64>,
    /// The enemy's damage stat.
    pub damage: f64,
}

/// A strike against the nearest structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: f64,
    pub damage_type: DamageType,
    /// Seconds to halt path motion afterwards.
    pub pause_secs: f64,
}

/// Output from the enemy FSM.
pub struct EnemyUpdate {
    pub new_mode: EnemyMode,
    pub strike: Option<Strike>,
    pub mode_changed: bool,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    let no_change = EnemyUpdate {
        new_mode: ctx.mode,
        strike: None,
        mode_changed: false,
    };

    if ctx.dead {
        return no_change;
    }

    let profile = get_profile(ctx.kind);
    if !profile.targets_structures {
        return no_change;
    }

    let in_range = ctx
        .nearest_structure_distance
        .is_some_and(|d| d <= profile.detection_radius);

    if in_range && cooldown_elapsed(ctx, &profile) {
        return EnemyUpdate {
            new_mode: EnemyMode::Sieging,
            strike: Some(Strike {
                damage: ctx.damage,
                damage_type: profile.siege_damage_type,
                pause_secs: profile.siege_pause_secs,
            }),
            mode_changed: ctx.mode != EnemyMode::Sieging,
        };
    }

    // Halt has run out: back to the path.
    if ctx.mode == EnemyMode::Sieging && !ctx.halted {
        return EnemyUpdate {
            new_mode: EnemyMode::Marching,
            strike: None,
            mode_changed: true,
        };
    }

    no_change
}

fn cooldown_elapsed(ctx: &EnemyContext, profile: &EnemyBehaviorProfile) -> bool {
    match ctx.last_strike_secs {
        None => true,
        Some(last) => ctx.now_secs - last >= profile.siege_cooldown_secs,
    }
}
