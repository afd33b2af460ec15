//! Headless arena application.
//!
//! Wires the simulation crates together behind a game loop thread and
//! exposes them to a front end as JSON commands in and JSON snapshots out.

pub mod game_loop;
pub mod ipc;
pub mod state;

pub use arena_core as core;
