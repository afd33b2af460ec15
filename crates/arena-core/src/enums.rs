//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon selectable by a ship. Order matches the weapon bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Single linear bullet.
    #[default]
    Blaster,
    /// Multi-pellet spread.
    Shotgun,
    /// Fixed 3-way volley.
    Triple,
    /// Self-guided homing missile.
    Missile,
    /// Pulsed beam.
    Laser,
    /// Damage-chaining arc.
    Arc,
    /// Area gravity pulse.
    Gravity,
    /// Bullet applying a stacking acid debuff.
    Acid,
    /// Plasma ball applying a burn debuff.
    Plasma,
    /// Void projectile applying corruption and slow.
    Void,
}

impl WeaponKind {
    pub const COUNT: usize = 10;

    pub const ALL: [WeaponKind; Self::COUNT] = [
        WeaponKind::Blaster,
        WeaponKind::Shotgun,
        WeaponKind::Triple,
        WeaponKind::Missile,
        WeaponKind::Laser,
        WeaponKind::Arc,
        WeaponKind::Gravity,
        WeaponKind::Acid,
        WeaponKind::Plasma,
        WeaponKind::Void,
    ];

    /// Slot index into per-weapon arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Damage flavour carried by a hit. Drives debuffs and feedback only;
/// the numeric pipeline is identical for every type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Normal,
    Acid,
    Plasma,
    Void,
}

/// Timed damage-over-time entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Acid: health damage over time.
    Acid,
    /// Plasma burn: health damage over time.
    Burn,
    /// Void corruption: health damage, half-rate shield drain, slow.
    Void,
}

/// Special abilities, each on its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Reinforce,
    Quantum,
    Teleport,
    Ultimate,
}

/// Result of a random-buff roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantumOutcome {
    Heal,
    Shield,
    Invulnerability,
}

/// Ultimate variant, chosen by the top-tier class node a ship holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UltimateKind {
    /// Radial burst of heavy bullets.
    Barrage,
    /// Area damage plus corruption debuff.
    VoidBurst,
    /// Area slow.
    TimeSlow,
}

/// Key for a generic upgrade purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKey {
    Speed,
    FireRate,
    Damage,
    Armor,
    Trail,
    Resource,
    Crit,
    Reinforce,
    Quantum,
    Teleport,
    Ultimate,
    Weapon(WeaponKind),
}

impl UpgradeKey {
    /// Keys eligible for a random (bot) upgrade, in canonical order.
    pub fn random_pool() -> Vec<UpgradeKey> {
        let mut pool = vec![
            UpgradeKey::Speed,
            UpgradeKey::FireRate,
            UpgradeKey::Damage,
            UpgradeKey::Armor,
            UpgradeKey::Trail,
            UpgradeKey::Resource,
            UpgradeKey::Crit,
            UpgradeKey::Reinforce,
            UpgradeKey::Quantum,
        ];
        pool.extend(WeaponKind::ALL.iter().map(|&w| UpgradeKey::Weapon(w)));
        pool
    }
}

/// Who drives a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipKind {
    /// Controlled by player input.
    Player,
    /// Controlled by the AI; respawns on death.
    #[default]
    Bot,
    /// Temporary ally: AI-controlled, finite lifetime, never respawns.
    Reinforcement,
}

/// Ship life-cycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    /// Dead; respawns at the next orchestration pass.
    PendingRespawn,
    /// Dead reinforcement; purged at the next orchestration pass.
    PendingRemoval,
}

impl LifeState {
    pub fn is_alive(self) -> bool {
        self == LifeState::Alive
    }
}

/// Visual category for moving projectiles in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    AcidBullet,
    Missile,
    Plasma,
    Void,
}

/// Obstacle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Rectangular block (AABB contact).
    Block,
    /// Triangular block (contact uses its bounding box).
    Wedge,
    /// Spiked circular hazard; contact is lethal.
    Spike,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Active,
    Paused,
    Victory,
}
