//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and applied at the next tick boundary. Selection
//! commands are validated against unlock and affordability rules; invalid
//! ones are dropped.

use serde::{Deserialize, Serialize};

use crate::class_tree::ClassNodeId;
use crate::enums::*;
use crate::types::Vec2;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Match flow ---
    /// Reset the world and start a match.
    StartMatch,
    Pause,
    Resume,
    /// Leave a finished or paused match.
    ReturnToMenu,

    // --- Per-tick control ---
    /// Movement intent (each axis in `[-1, 1]`), fire request and aim point.
    SetControl { thrust: Vec2, fire: bool, aim: Vec2 },
    /// Visible region of the arena, used for AI aggro.
    SetViewport { x: f64, y: f64, w: f64, h: f64 },

    // --- Loadout and progression ---
    SelectWeapon { weapon: WeaponKind },
    ApplyUpgrade { key: UpgradeKey },
    AcquireClassNode { node: ClassNodeId },

    // --- Abilities ---
    CallReinforcement,
    QuantumRoll,
    Teleport { x: f64, y: f64 },
    Ultimate,
}
