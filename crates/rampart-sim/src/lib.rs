//! Simulation engine for Rampart.
//!
//! Owns the hecs ECS world, the timer queue and the economy, runs the
//! per-tick systems in a fixed order, and produces `GameStateSnapshot`s
//! for renderers. Headless and deterministic for a given seed.

pub mod builder;
pub mod combat;
pub mod economy;
pub mod enemy_pool;
pub mod engine;
pub mod lifecycle;
pub mod scenario;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use rampart_core as core;

#[cfg(test)]
mod tests;
