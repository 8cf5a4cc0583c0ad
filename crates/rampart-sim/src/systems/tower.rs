//! Tower targeting and firing.
//!
//! Each operational tower picks the closest live enemy in range and, when
//! its attack interval has elapsed, launches a pursuit projectile.

use hecs::{Entity, World};
use tracing::trace;

use rampart_core::components::{StructureCore, StructureTag, TowerWeapon};
use rampart_core::enums::DamageType;
use rampart_core::events::GameEvent;
use rampart_core::types::Position;

use crate::combat::nearest_enemy_in_range;
use crate::lifecycle::{is_operational, Attacker};
use crate::world_setup;

struct Shot {
    origin: Position,
    target: Entity,
    target_id: u32,
    tower_id: u32,
    damage: f64,
    damage_type: DamageType,
}

pub fn run(
    world: &mut World,
    structures: &[Entity],
    enemies: &[Entity],
    now_secs: f64,
    events: &mut Vec<GameEvent>,
) {
    let mut shots = Vec::new();

    for &entity in structures {
        let Ok(weapon) = world.get::<&TowerWeapon>(entity) else {
            continue;
        };
        let range = weapon.reach();
        drop(weapon);

        let (Ok(core), Ok(tag), Ok(position)) = (
            world.get::<&StructureCore>(entity),
            world.get::<&StructureTag>(entity),
            world.get::<&Position>(entity),
        ) else {
            continue;
        };
        let operational = is_operational(&core);
        let (tower_id, origin) = (tag.id, *position);
        drop((core, tag, position));

        let target = if operational {
            nearest_enemy_in_range(world, enemies, &origin, range)
        } else {
            None
        };

        let Ok(mut weapon) = world.get::<&mut TowerWeapon>(entity) else {
            continue;
        };
        weapon.target = target.map(|(_, id)| id);
        let Some((target, target_id)) = target else {
            continue;
        };
        if !weapon.is_ready(now_secs) {
            continue;
        }
        weapon.mark_fired(now_secs);
        shots.push(Shot {
            origin,
            target,
            target_id,
            tower_id,
            damage: weapon.damage,
            damage_type: weapon.damage_type,
        });
    }

    for shot in shots {
        world_setup::spawn_projectile(
            world,
            shot.origin,
            shot.target,
            shot.target_id,
            shot.damage,
            shot.damage_type,
        );
        trace!(tower_id = shot.tower_id, target_id = shot.target_id, "projectile fired");
        events.push(GameEvent::ProjectileFired {
            tower_id: shot.tower_id,
            target_id: shot.target_id,
        });
    }
}
