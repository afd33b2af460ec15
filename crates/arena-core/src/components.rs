//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in the simulation systems.

use serde::{Deserialize, Serialize};

use crate::constants::{INVULN_TIME, MAX_TEAMS, SHIELD_REGEN, SHIP_BASE_HP, SHIP_BASE_SHIELD};
use crate::enums::*;
use crate::types::{Rect, ShipId, TeamId, Vec2};

// --- Ships ---

/// Identity and life-cycle of a ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub team: TeamId,
    pub kind: ShipKind,
    pub life: LifeState,
}

/// Health, shield and invulnerability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hull {
    pub hp: f64,
    pub max_hp: f64,
    pub shield: f64,
    pub max_shield: f64,
    /// Shield regenerated per second while not invulnerable.
    pub shield_regen: f64,
    pub invuln_secs: f64,
}

impl Default for Hull {
    fn default() -> Self {
        Self {
            hp: SHIP_BASE_HP,
            max_hp: SHIP_BASE_HP,
            shield: SHIP_BASE_SHIELD,
            max_shield: SHIP_BASE_SHIELD,
            shield_regen: SHIELD_REGEN,
            invuln_secs: INVULN_TIME,
        }
    }
}

/// Movement tuning. `max_speed` is recomputed every tick from level,
/// speed upgrades and class modifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thrusters {
    pub base_speed: f64,
    pub max_speed: f64,
}

/// Unlock flag, level and private cooldown of one weapon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub unlocked: bool,
    pub level: u32,
    pub cooldown: f64,
}

/// Every weapon slot plus the active selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadout {
    pub slots: [WeaponSlot; WeaponKind::COUNT],
    pub selected: WeaponKind,
}

impl Default for Loadout {
    /// Every weapon at level 1, only the Blaster unlocked and selected.
    fn default() -> Self {
        let mut slots = [WeaponSlot { unlocked: false, level: 1, cooldown: 0.0 }; WeaponKind::COUNT];
        slots[WeaponKind::Blaster.index()].unlocked = true;
        Self { slots, selected: WeaponKind::Blaster }
    }
}

/// Generic upgrade levels, capped at `MAX_UPGRADE_LEVEL`. Speed, fire
/// rate, damage and armor start at 1; the rest start at 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Upgrades {
    pub speed: u32,
    pub firerate: u32,
    pub damage: u32,
    pub armor: u32,
    pub trail: u32,
    pub resource: u32,
    pub crit: u32,
    pub reinforce: u32,
    pub quantum: u32,
    pub teleport: u32,
    pub ultimate: u32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            speed: 1,
            firerate: 1,
            damage: 1,
            armor: 1,
            trail: 0,
            resource: 0,
            crit: 0,
            reinforce: 0,
            quantum: 0,
            teleport: 0,
            ultimate: 0,
        }
    }
}

/// Sphere/level/point counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    /// Spheres collected toward the next level. The requirement grows in
    /// half steps so the remainder after a level-up can be fractional.
    pub spheres: f64,
    pub upgrade_points: u32,
    pub class_points: u32,
    /// Class tiers whose point has already been granted.
    pub tiers_granted: usize,
}

impl Default for Progression {
    fn default() -> Self {
        Self { level: 1, spheres: 0.0, upgrade_points: 0, class_points: 0, tiers_granted: 0 }
    }
}

/// One timed damage-over-time entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: f64,
    pub dps: f64,
}

/// Active debuffs on a ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub entries: Vec<StatusEffect>,
    pub slow_secs: f64,
    pub stun_secs: f64,
}

/// Remaining cooldown of each ability (seconds).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AbilityCooldowns {
    pub reinforce: f64,
    pub quantum: f64,
    pub teleport: f64,
    pub ultimate: f64,
}

/// Marks a temporary ally with a finite lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reinforcement {
    pub summoner: ShipId,
    pub remaining: f64,
}

/// Per-ship match statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stats {
    pub score: u32,
    pub kills: u32,
    pub deaths: u32,
    pub captures: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
}

/// Region a ship respawns into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnZone(pub Rect);

/// AI bookkeeping. Only current references are kept; no plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AiBrain {
    pub target: Option<ShipId>,
    /// Index of the capture point being approached.
    pub goal: Option<usize>,
    pub aggro: bool,
    pub aggro_timer: f64,
}

/// Human control input for the current tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlIntent {
    /// Two-axis movement request, each axis in `[-1, 1]`.
    pub thrust: Vec2,
    pub fire: bool,
    pub aim: Vec2,
}

// --- Map ---

/// A contestable map location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapturePoint {
    pub index: usize,
    pub radius: f64,
    pub owner: Option<TeamId>,
    /// Seconds of accumulated progress per team.
    pub progress: [f64; MAX_TEAMS],
}

/// Collectible experience sphere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub value: u32,
    pub life: f64,
}

/// Static arena obstacle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub shape: ObstacleShape,
    /// Contact box; spikes use `radius` instead.
    pub bounds: Rect,
    pub radius: f64,
}

// --- Projectiles and effects ---

/// Ship and team that produced a projectile or effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Owner {
    pub ship: ShipId,
    pub team: TeamId,
}

/// Debuff applied by a projectile on impact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnHit {
    pub kind: StatusKind,
    pub secs: f64,
    pub dps: f64,
    pub slow_secs: f64,
}

/// Moving hit-once projectile. Pairs with `Position` and `Velocity`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub damage: f64,
    pub radius: f64,
    pub life: f64,
    pub damage_type: DamageType,
    pub critical: bool,
    pub on_hit: Option<OnHit>,
}

/// Steering state of a homing missile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Homing {
    pub target: Option<ShipId>,
    pub speed: f64,
    /// Maximum heading change (radians per second).
    pub turn_rate: f64,
}

/// Pulsed beam damaging everything along its segment while active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Beam {
    pub start: Vec2,
    pub end: Vec2,
    pub damage: f64,
    pub width: f64,
    pub remaining: f64,
}

/// Visual record of a resolved chain arc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainArc {
    pub points: Vec<Vec2>,
    pub remaining: f64,
}

/// Area pull centered on its `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GravityPulse {
    pub radius: f64,
    pub strength: f64,
    pub dps: f64,
    pub remaining: f64,
}

/// Short-lived energy-trail segment at its `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailSegment {
    pub radius: f64,
    pub dps: f64,
    pub remaining: f64,
}
