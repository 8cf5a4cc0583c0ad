//! Entity spawn factories for the simulation world.
//!
//! Creates enemies, structures, projectiles and resource piles with the
//! appropriate component bundles.

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::config::{EnemySpec, StructureSpec, WeaponSpec};
use rampart_core::constants::PROJECTILE_SPEED;
use rampart_core::enums::*;
use rampart_core::types::{PathCurve, Position};

use crate::combat::Projectile;
use crate::enemy_pool::EnemyPool;
use crate::lifecycle::remaining_duration;

/// Spawn an enemy at the start of `path`, reusing a pooled entity when one
/// is available.
pub fn spawn_enemy(
    world: &mut World,
    pool: &mut EnemyPool,
    id: u32,
    kind: EnemyKind,
    spec: &EnemySpec,
    path_index: usize,
    path: &PathCurve,
) -> Entity {
    let stats = EnemyStats {
        health: spec.health,
        max_health: spec.health,
        base_speed: spec.speed,
        current_speed: spec.speed,
        damage: spec.damage,
        crystal_reward: spec.crystal_reward,
    };
    let mut follower = PathFollower {
        path_index,
        path_length: path.length(),
        progress: 0.0,
        remaining_secs: 0.0,
        paused: false,
    };
    follower.remaining_secs = remaining_duration(&follower, spec.speed);
    let status = EnemyStatus {
        active: true,
        ..Default::default()
    };

    let bundle = (
        Enemy,
        EnemyTag { id, kind },
        stats,
        status,
        follower,
        SiegeState::default(),
        path.start(),
    );

    if let Some(entity) = pool.acquire(kind) {
        if world.insert(entity, bundle.clone()).is_ok() {
            return entity;
        }
    }
    pool.note_created();
    world.spawn(bundle)
}

/// Spawn a structure in the `Placing` state at level 0.
pub fn spawn_structure(
    world: &mut World,
    id: u32,
    kind: StructureKind,
    position: Position,
    spec: &StructureSpec,
) -> Option<Entity> {
    let level = spec.levels.first()?;
    let core = StructureCore {
        state: StructureState::Placing,
        level: 0,
        health: level.health,
        max_health: level.health,
        damage_resistance: level.damage_resistance,
        build_progress: 0.0,
        build_time_secs: spec.build_time_secs,
        upgrade_progress: 0.0,
        upgrade_paid: 0,
        last_repair_secs: None,
    };
    let tag = StructureTag { id, kind };

    let entity = match &level.weapon {
        Some(WeaponSpec::Ranged {
            range,
            damage,
            attack_interval_secs,
            damage_type,
        }) => world.spawn((
            Structure,
            tag,
            core,
            position,
            TowerWeapon {
                range: *range,
                damage: *damage,
                attack_interval_secs: *attack_interval_secs,
                damage_type: *damage_type,
                last_attack_secs: None,
                target: None,
            },
        )),
        Some(WeaponSpec::Trigger {
            radius,
            damage,
            slow_factor,
            slow_duration_secs,
            cooldown_secs,
        }) => world.spawn((
            Structure,
            tag,
            core,
            position,
            TrapTrigger {
                radius: *radius,
                damage: *damage,
                slow_factor: *slow_factor,
                slow_duration_secs: *slow_duration_secs,
                cooldown_secs: *cooldown_secs,
                ready: true,
                last_trigger_secs: None,
            },
        )),
        None => world.spawn((Structure, tag, core, position)),
    };
    Some(entity)
}

/// Spawn a projectile at `origin` aimed at `target`.
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    target: Entity,
    target_id: u32,
    damage: f64,
    damage_type: DamageType,
) -> Entity {
    world.spawn((
        Projectile {
            target,
            target_id,
            damage,
            damage_type,
            speed: PROJECTILE_SPEED,
        },
        origin,
    ))
}

/// Spawn a collectible resource pile.
pub fn spawn_pile(
    world: &mut World,
    id: u32,
    position: Position,
    value: u32,
    rarity: PileRarity,
) -> Entity {
    world.spawn((ResourcePile { id, value, rarity }, position))
}
