//! Projectile pursuit: straight-line flight toward the target's current
//! position, hit within a small radius, discarded if the target is gone.

use hecs::{Entity, World};
use tracing::trace;

use rampart_core::constants::PROJECTILE_HIT_RADIUS;
use rampart_core::events::GameEvent;
use rampart_core::types::Position;

use crate::combat::{live_enemy, strike_enemy, KillReport, Projectile};

pub fn run(
    world: &mut World,
    dt: f64,
    kills: &mut Vec<KillReport>,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let flying: Vec<(Entity, Projectile, Position)> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(entity, (projectile, position))| (entity, projectile.clone(), *position))
        .collect();

    for (entity, projectile, position) in flying {
        let target = live_enemy(world, projectile.target)
            .filter(|(id, _)| *id == projectile.target_id);
        let Some((target_id, target_position)) = target else {
            despawn_buffer.push(entity);
            continue;
        };

        let next = position.step_toward(&target_position, projectile.speed * dt);
        if next.distance_to(&target_position) > PROJECTILE_HIT_RADIUS {
            if let Ok(mut current) = world.get::<&mut Position>(entity) {
                *current = next;
            }
            continue;
        }

        despawn_buffer.push(entity);
        trace!(target_id, damage = projectile.damage, "projectile hit");
        events.push(GameEvent::ProjectileHit {
            target_id,
            damage: projectile.damage,
        });
        if let Some(kill) = strike_enemy(world, projectile.target, projectile.damage) {
            kills.push(kill);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
