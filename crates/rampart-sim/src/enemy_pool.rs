//! Per-kind pool of retired enemy entities.
//!
//! Retired enemies keep their entity and components but lose the `Enemy`
//! marker, so no system sees them. Spawning reuses one when available and
//! overwrites its components; the spawn id in `EnemyTag` changes on every
//! reuse, which is what scheduled timers check against.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use rampart_core::components::Enemy;
use rampart_core::enums::EnemyKind;

#[derive(Debug, Default)]
pub struct EnemyPool {
    free: BTreeMap<EnemyKind, Vec<Entity>>,
    max_per_kind: usize,
    /// Spawns served from the pool.
    pub reused: u32,
    /// Spawns that needed a fresh entity.
    pub created: u32,
}

impl EnemyPool {
    pub fn new(max_per_kind: usize) -> Self {
        Self {
            max_per_kind,
            ..Default::default()
        }
    }

    /// Take a retired entity of `kind`, if any. The caller reinitialises it.
    pub fn acquire(&mut self, kind: EnemyKind) -> Option<Entity> {
        let entity = self.free.get_mut(&kind)?.pop()?;
        self.reused += 1;
        Some(entity)
    }

    pub fn note_created(&mut self) {
        self.created += 1;
    }

    /// Retire an enemy. Kept for reuse while the kind's pool has room,
    /// otherwise despawned.
    pub fn release(&mut self, kind: EnemyKind, entity: Entity, world: &mut World) {
        let free = self.free.entry(kind).or_default();
        if free.len() < self.max_per_kind && world.remove_one::<Enemy>(entity).is_ok() {
            free.push(entity);
        } else {
            let _ = world.despawn(entity);
        }
    }

    /// Number of retired entities of `kind` waiting for reuse.
    pub fn available(&self, kind: EnemyKind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }
}
