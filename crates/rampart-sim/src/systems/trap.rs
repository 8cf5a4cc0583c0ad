//! Trap triggers: the first enemy inside a ready trap's radius takes damage
//! and is slowed; the trap then rearms after its cooldown.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::*;
use rampart_core::events::GameEvent;
use rampart_core::types::Position;

use crate::combat::{first_enemy_in_range, strike_enemy, KillReport};
use crate::lifecycle::{is_operational, slow_enemy, Attacker};
use crate::timers::{TimerAction, TimerQueue};

pub fn run(
    world: &mut World,
    structures: &[Entity],
    enemies: &[Entity],
    now_secs: f64,
    timers: &mut TimerQueue,
    kills: &mut Vec<KillReport>,
    events: &mut Vec<GameEvent>,
) {
    for &entity in structures {
        let Ok((tag, core, trigger, position)) = world
            .query_one_mut::<(&StructureTag, &StructureCore, &TrapTrigger, &Position)>(entity)
        else {
            continue;
        };
        if !is_operational(core) || !trigger.is_ready(now_secs) {
            continue;
        }
        let trap_id = tag.id;
        let origin = *position;
        let trigger = trigger.clone();

        let Some((target, target_id)) = first_enemy_in_range(world, enemies, &origin, trigger.reach())
        else {
            continue;
        };

        if let Ok(mut live) = world.get::<&mut TrapTrigger>(entity) {
            live.mark_fired(now_secs);
        }
        timers.schedule(now_secs, trigger.cooldown_secs, TimerAction::TrapRearm { trap: entity });

        debug!(trap_id, target_id, damage = trigger.damage, "trap triggered");
        events.push(GameEvent::TrapTriggered {
            trap_id,
            target_id,
            damage: trigger.damage,
            slow_factor: trigger.slow_factor,
        });

        if let Some(kill) = strike_enemy(world, target, trigger.damage) {
            kills.push(kill);
        }

        let slowed = match world
            .query_one_mut::<(&mut EnemyStats, &mut EnemyStatus, &mut PathFollower)>(target)
        {
            Ok((stats, status, follower)) => slow_enemy(stats, status, follower, trigger.slow_factor),
            Err(_) => false,
        };
        if slowed {
            timers.schedule(
                now_secs,
                trigger.slow_duration_secs,
                TimerAction::SlowExpired {
                    enemy: target,
                    id: target_id,
                },
            );
        }
    }
}
