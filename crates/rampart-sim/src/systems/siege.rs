//! Siege behaviour: structure-targeting enemies strike the nearest
//! structure in reach, halt briefly, then walk on.
//!
//! Decisions come from `rampart_enemy_ai::fsm`; this system gathers the
//! context and applies the result.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::*;
use rampart_core::enums::{DamageType, StructureState};
use rampart_core::events::GameEvent;
use rampart_core::types::Position;
use rampart_enemy_ai::fsm::{evaluate, EnemyContext};

use crate::lifecycle::{DamageOutcome, Damageable};
use crate::timers::{TimerAction, TimerQueue};

/// Nearest non-destroyed structure to `from`. Ties go to roster order.
pub fn nearest_structure(
    world: &World,
    structures: &[Entity],
    from: &Position,
) -> Option<(Entity, f64)> {
    let mut best: Option<(Entity, f64)> = None;
    for &entity in structures {
        let Ok(core) = world.get::<&StructureCore>(entity) else {
            continue;
        };
        if core.state == StructureState::Destroyed {
            continue;
        }
        let Ok(position) = world.get::<&Position>(entity) else {
            continue;
        };
        let distance = from.distance_to(&position);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best
}

pub fn run(
    world: &mut World,
    enemies: &[Entity],
    structures: &[Entity],
    now_secs: f64,
    timers: &mut TimerQueue,
    events: &mut Vec<GameEvent>,
) {
    for &entity in enemies {
        let ctx_and_pos = {
            let Ok((tag, stats, status, follower, siege, position)) = world
                .query_one_mut::<(
                    &EnemyTag,
                    &EnemyStats,
                    &EnemyStatus,
                    &PathFollower,
                    &SiegeState,
                    &Position,
                )>(entity)
            else {
                continue;
            };
            if !status.active {
                continue;
            }
            (
                tag.id,
                EnemyContext {
                    kind: tag.kind,
                    mode: status.mode,
                    dead: status.dead,
                    halted: follower.paused,
                    now_secs,
                    last_strike_secs: siege.last_strike_secs,
                    nearest_structure_distance: None,
                    damage: stats.damage,
                },
                *position,
            )
        };
        let (enemy_id, mut ctx, position) = ctx_and_pos;

        let nearest = nearest_structure(world, structures, &position);
        ctx.nearest_structure_distance = nearest.map(|(_, d)| d);
        let update = evaluate(&ctx);

        if let Some(strike) = update.strike {
            if let Some((target, _)) = nearest {
                strike_structure(world, target, strike.damage, strike.damage_type, events);
                let target_id = world.get::<&StructureTag>(target).ok().map(|t| t.id);
                debug!(enemy_id, ?target_id, damage = strike.damage, "siege strike");

                if let Ok((follower, siege)) =
                    world.query_one_mut::<(&mut PathFollower, &mut SiegeState)>(entity)
                {
                    follower.paused = true;
                    siege.last_strike_secs = Some(now_secs);
                    siege.last_target = target_id;
                }
                timers.schedule(
                    now_secs,
                    strike.pause_secs,
                    TimerAction::SiegeResume {
                        enemy: entity,
                        id: enemy_id,
                    },
                );
            }
        }

        if update.mode_changed {
            if let Ok(mut status) = world.get::<&mut EnemyStatus>(entity) {
                status.mode = update.new_mode;
            }
        }
    }
}

/// Apply damage to a structure, emitting `StructureDestroyed` on the killing hit.
pub fn strike_structure(
    world: &mut World,
    target: Entity,
    damage: f64,
    damage_type: DamageType,
    events: &mut Vec<GameEvent>,
) {
    let Ok((tag, core)) = world.query_one_mut::<(&StructureTag, &mut StructureCore)>(target) else {
        return;
    };
    if let DamageOutcome::Destroyed { .. } = core.take_damage(damage, damage_type) {
        debug!(structure_id = tag.id, kind = ?tag.kind, "structure destroyed");
        events.push(GameEvent::StructureDestroyed {
            structure_id: tag.id,
            kind: tag.kind,
        });
    }
}
