//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::state::*;
use rampart_core::types::{Position, SimTime};

use crate::builder::Builder;
use crate::combat::Projectile;
use crate::economy::Economy;
use crate::systems::wave_spawner::WaveScheduler;

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    base_health: f64,
    waves: &WaveScheduler,
    economy: &Economy,
    builder: &Builder,
    enemies: &[Entity],
    structures: &[Entity],
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let enemy_views = build_enemies(world, enemies);
    let wave = WaveView {
        current: waves.current_wave(),
        total: waves.total_waves(),
        spawning: waves.is_spawning(),
        in_progress: waves.is_spawning() || !enemies.is_empty(),
        active_enemies: enemies.len() as u32,
    };

    GameStateSnapshot {
        time: *time,
        phase,
        base_health,
        wave,
        economy: EconomyView {
            resources: economy.resources(),
            combo: economy.combo(),
            multiplier: economy.multiplier(),
        },
        builder: BuilderView {
            position: builder.position,
            dash_ready: builder.dash_readiness(time.elapsed_secs),
            selected: builder.selected,
        },
        enemies: enemy_views,
        structures: build_structures(world, structures),
        projectiles: build_projectiles(world),
        piles: build_piles(world),
        events,
    }
}

/// Enemy views in roster order.
fn build_enemies(world: &World, roster: &[Entity]) -> Vec<EnemyView> {
    roster
        .iter()
        .filter_map(|&entity| {
            let tag = world.get::<&EnemyTag>(entity).ok()?;
            let stats = world.get::<&EnemyStats>(entity).ok()?;
            let status = world.get::<&EnemyStatus>(entity).ok()?;
            let follower = world.get::<&PathFollower>(entity).ok()?;
            let position = world.get::<&Position>(entity).ok()?;
            Some(EnemyView {
                id: tag.id,
                kind: tag.kind,
                position: *position,
                health: stats.health,
                max_health: stats.max_health,
                progress: follower.progress,
                slowed: status.slowed,
                dead: status.dead,
                mode: status.mode,
            })
        })
        .collect()
}

/// Structure views in roster order.
fn build_structures(world: &World, roster: &[Entity]) -> Vec<StructureView> {
    roster
        .iter()
        .filter_map(|&entity| {
            let tag = world.get::<&StructureTag>(entity).ok()?;
            let core = world.get::<&StructureCore>(entity).ok()?;
            let position = world.get::<&Position>(entity).ok()?;
            let tower = world.get::<&TowerWeapon>(entity).ok();
            let trap = world.get::<&TrapTrigger>(entity).ok();
            let range = tower
                .as_ref()
                .map(|t| t.range)
                .or_else(|| trap.as_ref().map(|t| t.radius));
            Some(StructureView {
                id: tag.id,
                kind: tag.kind,
                position: *position,
                state: core.state,
                level: core.level,
                health: core.health,
                max_health: core.max_health,
                build_progress: core.build_progress,
                upgrade_progress: core.upgrade_progress,
                range,
                target: tower.as_ref().and_then(|t| t.target),
            })
        })
        .collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (projectile, position))| ProjectileView {
            position: *position,
            target_id: projectile.target_id,
        })
        .collect()
}

fn build_piles(world: &World) -> Vec<PileView> {
    let mut piles: Vec<PileView> = world
        .query::<(&ResourcePile, &Position)>()
        .iter()
        .map(|(_, (pile, position))| PileView {
            id: pile.id,
            position: *position,
            value: pile.value,
            rarity: pile.rarity,
        })
        .collect();
    piles.sort_by_key(|pile| pile.id);
    piles
}
