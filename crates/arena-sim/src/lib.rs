//! Simulation engine for the arena shooter.
//!
//! Owns the hecs ECS world, runs all game systems, processes player
//! commands, and produces `GameStateSnapshot`s for the frontend.
//! Completely headless, enabling deterministic testing.

pub mod abilities;
pub mod combat;
pub mod context;
pub mod engine;
pub mod progression;
pub mod status;
pub mod systems;
pub mod weapons;
pub mod world_setup;

pub use arena_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
