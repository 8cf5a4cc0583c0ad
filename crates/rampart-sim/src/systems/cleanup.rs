//! Cleanup system: removes destroyed structures from the world and roster.

use hecs::{Entity, World};

use rampart_core::components::StructureCore;
use rampart_core::enums::StructureState;

/// Despawn structures in the terminal `Destroyed` state, and drop roster
/// entries whose entity no longer exists.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, structures: &mut Vec<Entity>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    structures.retain(|&entity| match world.get::<&StructureCore>(entity) {
        Ok(core) if core.state == StructureState::Destroyed => {
            despawn_buffer.push(entity);
            false
        }
        Ok(_) => true,
        Err(_) => false,
    });

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
