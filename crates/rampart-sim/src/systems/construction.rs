//! Construction and upgrade progress.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::*;
use rampart_core::config::GameConfig;
use rampart_core::enums::StructureState;
use rampart_core::events::GameEvent;

use crate::lifecycle::{advance_build, advance_upgrade, upgrade, Attacker};

/// Advance building and upgrading structures by `dt` seconds.
pub fn run(
    world: &mut World,
    structures: &[Entity],
    config: &GameConfig,
    dt: f64,
    events: &mut Vec<GameEvent>,
) {
    for &entity in structures {
        let Ok((tag, core)) = world.query_one_mut::<(&StructureTag, &mut StructureCore)>(entity)
        else {
            continue;
        };
        let tag = *tag;

        if advance_build(core, dt) {
            debug!(structure_id = tag.id, kind = ?tag.kind, "build complete");
            events.push(GameEvent::BuildComplete {
                structure_id: tag.id,
                kind: tag.kind,
            });
            continue;
        }

        if !advance_upgrade(core, dt, config.economy.upgrade_time_secs) {
            continue;
        }
        let Some(spec) = config.structure(tag.kind) else {
            continue;
        };
        let upgraded = upgrade(core, spec);
        core.state = StructureState::Active;
        core.upgrade_progress = 0.0;
        core.upgrade_paid = 0;
        if !upgraded {
            continue;
        }
        let level = core.level;

        if let Some(weapon) = spec.levels[level as usize].weapon.as_ref() {
            if let Ok(mut tower) = world.get::<&mut TowerWeapon>(entity) {
                tower.apply_level(weapon);
            }
            if let Ok(mut trap) = world.get::<&mut TrapTrigger>(entity) {
                trap.apply_level(weapon);
            }
        }
        debug!(structure_id = tag.id, level, "upgrade complete");
        events.push(GameEvent::UpgradeComplete {
            structure_id: tag.id,
            level,
        });
    }
}
