//! Resource pile collection by the builder.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::ResourcePile;
use rampart_core::constants::PILE_COLLECT_RADIUS;
use rampart_core::events::GameEvent;
use rampart_core::types::Position;

use crate::economy::Economy;

/// Credit and remove every pile within reach of the builder.
pub fn run(
    world: &mut World,
    builder: &Position,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let mut collected: Vec<(Entity, ResourcePile)> = world
        .query::<(&ResourcePile, &Position)>()
        .iter()
        .filter(|(_, (_, position))| builder.distance_to(position) <= PILE_COLLECT_RADIUS)
        .map(|(entity, (pile, _))| (entity, *pile))
        .collect();
    collected.sort_by_key(|(_, pile)| pile.id);

    for (entity, pile) in collected {
        debug!(pile_id = pile.id, value = pile.value, "pile collected");
        economy.credit(pile.value, events);
        events.push(GameEvent::PileCollected {
            pile_id: pile.id,
            value: pile.value,
        });
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
