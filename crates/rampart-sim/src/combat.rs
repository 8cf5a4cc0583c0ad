//! Targeting queries and projectile data shared by the combat systems.
//!
//! Lives in the sim crate (not core) because it references `hecs::Entity`.

use hecs::{Entity, World};

use rampart_core::components::{Enemy, EnemyStats, EnemyStatus, EnemyTag, PathFollower};
use rampart_core::enums::DamageType;
use rampart_core::types::Position;

/// A tower shot in flight, pursuing its target's current position.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub target: Entity,
    /// Spawn id of the target, to reject recycled entities.
    pub target_id: u32,
    pub damage: f64,
    pub damage_type: DamageType,
    pub speed: f64,
}

/// An enemy killed this tick, awaiting reward and removal.
#[derive(Debug, Clone, Copy)]
pub struct KillReport {
    pub entity: Entity,
    pub id: u32,
    pub position: Position,
    pub reward: u32,
}

/// Id and position of `entity` if it is an enemy in play and alive.
pub fn live_enemy(world: &World, entity: Entity) -> Option<(u32, Position)> {
    world.get::<&Enemy>(entity).ok()?;
    let status = world.get::<&EnemyStatus>(entity).ok()?;
    if !status.active || status.dead {
        return None;
    }
    let tag = world.get::<&EnemyTag>(entity).ok()?;
    let position = world.get::<&Position>(entity).ok()?;
    Some((tag.id, *position))
}

/// Whether `entity` is still the live enemy that was spawned with `id`.
pub fn is_same_live_enemy(world: &World, entity: Entity, id: u32) -> bool {
    live_enemy(world, entity).is_some_and(|(live_id, _)| live_id == id)
}

/// Closest live enemy within `range` of `from`. Ties go to the earliest
/// entry in roster order.
pub fn nearest_enemy_in_range(
    world: &World,
    roster: &[Entity],
    from: &Position,
    range: f64,
) -> Option<(Entity, u32)> {
    let mut best: Option<(Entity, u32, f64)> = None;
    for &entity in roster {
        let Some((id, position)) = live_enemy(world, entity) else {
            continue;
        };
        let distance = from.distance_to(&position);
        if distance > range {
            continue;
        }
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((entity, id, distance));
        }
    }
    best.map(|(entity, id, _)| (entity, id))
}

/// First live enemy in roster order within `radius` of `from`.
pub fn first_enemy_in_range(
    world: &World,
    roster: &[Entity],
    from: &Position,
    radius: f64,
) -> Option<(Entity, u32)> {
    roster.iter().find_map(|&entity| {
        let (id, position) = live_enemy(world, entity)?;
        (from.distance_to(&position) <= radius).then_some((entity, id))
    })
}

/// Damage an enemy entity. Returns a kill report for the killing hit only.
pub fn strike_enemy(world: &mut World, entity: Entity, amount: f64) -> Option<KillReport> {
    let (stats, status, follower, tag, position) = world
        .query_one_mut::<(
            &mut EnemyStats,
            &mut EnemyStatus,
            &mut PathFollower,
            &EnemyTag,
            &Position,
        )>(entity)
        .ok()?;
    if !crate::lifecycle::damage_enemy(stats, status, follower, amount) {
        return None;
    }
    Some(KillReport {
        entity,
        id: tag.id,
        position: *position,
        reward: stats.crystal_reward,
    })
}
