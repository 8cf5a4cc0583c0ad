//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus the engine-owned buffers they need. They hold no state of their own.

pub mod cleanup;
pub mod construction;
pub mod movement;
pub mod pickups;
pub mod projectile;
pub mod siege;
pub mod snapshot;
pub mod tower;
pub mod trap;
pub mod wave_spawner;
