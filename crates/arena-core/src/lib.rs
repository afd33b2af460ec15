//! Core types and definitions for the arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, the class-node table and modifier engine,
//! commands, events, state snapshots, match configuration and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod class_tree;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod modifiers;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
