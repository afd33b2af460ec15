//! AI for arena bots and reinforcements.
//!
//! Goal and target selection, steering, probabilistic firing, and the
//! random progression choices bots make. Pure functions over plain data.

pub mod brain;
pub mod choices;

pub use arena_core as core;
