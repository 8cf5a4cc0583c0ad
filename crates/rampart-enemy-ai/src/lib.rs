//! Enemy AI for Rampart.
//!
//! Implements the per-kind behaviour profiles and the siege state machine
//! that lets structure-targeting enemies break off to strike defences.

pub mod fsm;
pub mod profiles;

pub use rampart_core as core;
