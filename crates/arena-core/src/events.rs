//! Events emitted by the simulation for audio and UI feedback.
//!
//! Each event maps to a `SoundCue`, and each cue to a sound-effect
//! identifier through a static table.

use serde::{Deserialize, Serialize};

use crate::class_tree::ClassNodeId;
use crate::enums::*;
use crate::types::{ShipId, TeamId, Vec2};

/// Feedback events produced during one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    WeaponFired { ship: ShipId, weapon: WeaponKind },
    /// Damage landed on a ship. `shielded` is true if any of it hit shield.
    Hit {
        ship: ShipId,
        amount: f64,
        shielded: bool,
        critical: bool,
        damage_type: DamageType,
    },
    ShipDestroyed { ship: ShipId, killer: Option<ShipId>, position: Vec2 },
    PointCaptured { point: usize, team: TeamId },
    LevelUp { ship: ShipId, level: u32 },
    ClassAcquired { ship: ShipId, node: ClassNodeId },
    AbilityUsed { ship: ShipId, ability: AbilityKind },
    QuantumRolled { ship: ShipId, outcome: QuantumOutcome },
    Teleported { ship: ShipId, from: Vec2, to: Vec2 },
    PickupCollected { ship: ShipId, value: u32 },
    Victory { team: TeamId },
}

/// Sound categories the frontend can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Laser,
    HitShield,
    HitBody,
    Critical,
    Explosion,
    Capture,
    LevelUp,
    Ability,
    Heal,
    PowerUp,
    Teleport,
    Pickup,
    Victory,
}

/// Cue to effect-file identifier, indexed by `SoundCue as usize`.
pub const SOUND_TABLE: &[(SoundCue, &str)] = &[
    (SoundCue::Shoot, "shoot"),
    (SoundCue::Laser, "laser"),
    (SoundCue::HitShield, "hit_shield"),
    (SoundCue::HitBody, "hit_body"),
    (SoundCue::Critical, "critical"),
    (SoundCue::Explosion, "explosion"),
    (SoundCue::Capture, "capture"),
    (SoundCue::LevelUp, "levelup"),
    (SoundCue::Ability, "ability"),
    (SoundCue::Heal, "heal"),
    (SoundCue::PowerUp, "powerup"),
    (SoundCue::Teleport, "teleport"),
    (SoundCue::Pickup, "pickup"),
    (SoundCue::Victory, "victory"),
];

impl SoundCue {
    pub fn effect_id(self) -> &'static str {
        SOUND_TABLE[self as usize].1
    }
}

impl AudioEvent {
    /// Sound to play for this event.
    pub fn cue(&self) -> SoundCue {
        match self {
            AudioEvent::WeaponFired { weapon: WeaponKind::Laser, .. } => SoundCue::Laser,
            AudioEvent::WeaponFired { .. } => SoundCue::Shoot,
            AudioEvent::Hit { critical: true, .. } => SoundCue::Critical,
            AudioEvent::Hit { shielded: true, .. } => SoundCue::HitShield,
            AudioEvent::Hit { .. } => SoundCue::HitBody,
            AudioEvent::ShipDestroyed { .. } => SoundCue::Explosion,
            AudioEvent::PointCaptured { .. } => SoundCue::Capture,
            AudioEvent::LevelUp { .. } => SoundCue::LevelUp,
            AudioEvent::ClassAcquired { .. } => SoundCue::PowerUp,
            AudioEvent::AbilityUsed { .. } => SoundCue::Ability,
            AudioEvent::QuantumRolled { outcome: QuantumOutcome::Heal, .. } => SoundCue::Heal,
            AudioEvent::QuantumRolled { .. } => SoundCue::PowerUp,
            AudioEvent::Teleported { .. } => SoundCue::Teleport,
            AudioEvent::PickupCollected { .. } => SoundCue::Pickup,
            AudioEvent::Victory { .. } => SoundCue::Victory,
        }
    }
}
