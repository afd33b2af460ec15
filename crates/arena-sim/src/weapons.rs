//! Weapon firing.
//!
//! `fire` is pure over its inputs: it checks the selected weapon's own
//! cooldown, resets it, and returns what should be spawned. Chain arcs are
//! resolved here against a list of contacts so their hit order is fixed
//! before any damage is applied.

use rand::Rng;

use arena_ai::brain::Contact;
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::{DamageType, ProjectileKind, ShipKind, StatusKind, WeaponKind};
use arena_core::geometry::{angle_of, from_angle, normalize};
use arena_core::modifiers::{ModKey, ResolvedModifiers};
use arena_core::types::{ShipId, TeamId, Vec2};

use crate::context::Spawn;

/// The firing ship.
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub id: ShipId,
    pub team: TeamId,
    pub kind: ShipKind,
    pub position: Vec2,
}

impl Shooter {
    fn owner(&self) -> Owner {
        Owner { ship: self.id, team: self.team }
    }
}

/// Multiplier on fire rate from the global upgrade and class nodes.
pub fn fire_rate_mult(upgrades: &Upgrades, mods: &ResolvedModifiers) -> f64 {
    (1.0 + FIRE_RATE_PER_UPGRADE * (upgrades.firerate as f64 - 1.0)) * mods.get(ModKey::FireRateMul)
}

/// Multiplier on weapon damage from the damage upgrade and class nodes.
pub fn damage_mult(upgrades: &Upgrades, mods: &ResolvedModifiers) -> f64 {
    (1.0 + DAMAGE_PER_UPGRADE * (upgrades.damage as f64 - 1.0))
        * mods.get(ModKey::DamageMul)
        * mods.get(ModKey::AllStatsMul)
}

pub fn crit_chance(upgrades: &Upgrades, mods: &ResolvedModifiers) -> f64 {
    BASE_CRIT_CHANCE + CRIT_PER_UPGRADE * upgrades.crit as f64 + mods.get(ModKey::CritAdd)
}

/// Seconds between shots of `weapon` at slot level `level`.
pub fn cooldown(weapon: WeaponKind, level: u32, upgrades: &Upgrades, mods: &ResolvedModifiers) -> f64 {
    let lm = fire_rate_mult(upgrades, mods);
    let lvl = level.max(1) as f64;
    let (rate, floor) = match weapon {
        WeaponKind::Blaster => (BLASTER_FIRE_RATE * lm, MIN_WEAPON_COOLDOWN),
        WeaponKind::Shotgun => ((1.6 + 0.1 * (lvl - 1.0)) * lm, MIN_WEAPON_COOLDOWN),
        WeaponKind::Triple => (3.0 * lm, MIN_WEAPON_COOLDOWN),
        WeaponKind::Missile => (1.2 * (1.0 + 0.05 * (lvl - 1.0)) * lm, 0.25),
        WeaponKind::Laser => {
            // Fixed recharge shortened only by the global fire-rate upgrade.
            return (4.0 * (1.0 - 0.03 * (upgrades.firerate as f64 - 1.0))).max(2.5);
        }
        WeaponKind::Arc => (2.2 * lm, 0.18),
        WeaponKind::Gravity => (1.6 * lm, 0.4),
        WeaponKind::Acid => (3.2 * lm, MIN_WEAPON_COOLDOWN),
        WeaponKind::Plasma => (2.8 * lm, MIN_WEAPON_COOLDOWN),
        WeaponKind::Void => (2.0 * lm, 0.3),
    };
    if rate <= 0.0 {
        return floor.max(1.0);
    }
    (1.0 / rate).max(floor)
}

struct Shot {
    kind: ProjectileKind,
    speed: f64,
    damage: f64,
    life: f64,
    radius: f64,
    damage_type: DamageType,
    on_hit: Option<OnHit>,
}

fn shot(shooter: &Shooter, dir: Vec2, s: Shot, critical: bool) -> Spawn {
    let damage = if critical { s.damage * CRIT_MULTIPLIER } else { s.damage };
    Spawn::Projectile {
        owner: shooter.owner(),
        position: shooter.position,
        velocity: normalize(dir) * s.speed,
        projectile: Projectile {
            kind: s.kind,
            damage,
            radius: s.radius,
            life: s.life,
            damage_type: s.damage_type,
            critical,
            on_hit: s.on_hit,
        },
        homing: None,
    }
}

fn bullet(speed: f64, damage: f64, life: f64) -> Shot {
    Shot {
        kind: ProjectileKind::Bullet,
        speed,
        damage,
        life,
        radius: BULLET_RADIUS,
        damage_type: DamageType::Normal,
        on_hit: None,
    }
}

/// Fire the selected weapon toward `aim` if it is unlocked and ready.
///
/// Returns nothing when the weapon is locked, still cooling down, or (for
/// the arc) has no valid target; in those cases the cooldown is untouched.
pub fn fire<R: Rng>(
    shooter: &Shooter,
    loadout: &mut Loadout,
    upgrades: &Upgrades,
    mods: &ResolvedModifiers,
    aim: Vec2,
    contacts: &[Contact],
    rng: &mut R,
) -> Vec<Spawn> {
    let weapon = loadout.selected;
    let slot = loadout.slots[weapon.index()];
    if !slot.unlocked || slot.cooldown > 0.0 {
        return Vec::new();
    }
    let level = slot.level.clamp(1, MAX_UPGRADE_LEVEL);
    let lvl = level as f64;
    let dm = damage_mult(upgrades, mods);
    let crit = crit_chance(upgrades, mods);
    let heading = angle_of(aim - shooter.position);
    let aim_dir = from_angle(heading);

    let mut out = Vec::new();
    match weapon {
        WeaponKind::Blaster => {
            let dmg = (12.0 + 2.0 * (lvl - 1.0)) * dm;
            out.push(shot(shooter, aim_dir, bullet(950.0, dmg, BULLET_LIFE), rng.gen_bool(crit.clamp(0.0, 1.0))));
        }
        WeaponKind::Shotgun => {
            let pellets = 6 + level + mods.count(ModKey::ShotgunPelletsAdd);
            for _ in 0..pellets {
                let spread = rng.gen_range(-SHOTGUN_SPREAD..=SHOTGUN_SPREAD);
                let critical = rng.gen_bool(crit.clamp(0.0, 1.0));
                out.push(shot(shooter, from_angle(heading + spread), bullet(820.0, 7.0 * dm, 0.7), critical));
            }
        }
        WeaponKind::Triple => {
            for off in [-TRIPLE_OFFSET, 0.0, TRIPLE_OFFSET] {
                let critical = rng.gen_bool(crit.clamp(0.0, 1.0));
                out.push(shot(shooter, from_angle(heading + off), bullet(900.0, 10.0 * dm, BULLET_LIFE), critical));
            }
        }
        WeaponKind::Missile => {
            let count = 1 + mods.count(ModKey::MissileCountAdd);
            let damage = (MISSILE_DAMAGE * mods.get(ModKey::MissileDamageMul)).floor();
            let turn_rate = MISSILE_TURN_RATE * mods.get(ModKey::MissileTurnMul);
            for i in 0..count {
                let fan = (i as f64 - (count as f64 - 1.0) / 2.0) * 0.15;
                let mut spawn = shot(
                    shooter,
                    from_angle(heading + fan),
                    Shot {
                        kind: ProjectileKind::Missile,
                        speed: MISSILE_SPEED,
                        damage,
                        life: MISSILE_LIFE,
                        radius: MISSILE_RADIUS,
                        damage_type: DamageType::Normal,
                        on_hit: None,
                    },
                    false,
                );
                if let Spawn::Projectile { homing, .. } = &mut spawn {
                    *homing = Some(Homing { target: None, speed: MISSILE_SPEED, turn_rate });
                }
                out.push(spawn);
            }
        }
        WeaponKind::Laser => {
            let damage = (16.0 + 2.0 * (lvl - 1.0)) * dm * mods.get(ModKey::LaserDamageMul);
            let length = LASER_LENGTH + 20.0 * (lvl - 1.0) + mods.get(ModKey::LaserLenAdd);
            out.push(Spawn::Beam {
                owner: shooter.owner(),
                beam: Beam {
                    start: shooter.position,
                    end: shooter.position + aim_dir * length,
                    damage,
                    width: 8.0,
                    remaining: LASER_DURATION,
                },
            });
        }
        WeaponKind::Arc => {
            let chain = 2 + level + mods.count(ModKey::ArcChainAdd);
            let range = 420.0 + 25.0 * lvl + mods.get(ModKey::ArcRangeAdd);
            let damage = (16.0 + 2.0 * lvl) * dm;
            // A player arcs to whoever is nearest the cursor; bots to whoever is nearest them.
            let anchor = if shooter.kind == ShipKind::Player { aim } else { shooter.position };
            if let Some((path, hits)) = chain_arc(shooter, anchor, contacts, chain as usize, range) {
                out.push(Spawn::Arc { owner: shooter.owner(), path, hits, damage });
            }
        }
        WeaponKind::Gravity => {
            out.push(Spawn::Pulse {
                owner: shooter.owner(),
                position: shooter.position,
                pulse: GravityPulse {
                    radius: GRAVITY_RADIUS * mods.get(ModKey::GravityRadiusMul),
                    strength: GRAVITY_STRENGTH * mods.get(ModKey::GravityStrengthMul),
                    dps: GRAVITY_DPS,
                    remaining: GRAVITY_DURATION,
                },
            });
        }
        WeaponKind::Acid => {
            let (secs, dps) = ACID_DOT;
            let s = Shot {
                kind: ProjectileKind::AcidBullet,
                speed: 880.0,
                damage: 8.0 * dm,
                life: BULLET_LIFE,
                radius: BULLET_RADIUS,
                damage_type: DamageType::Acid,
                on_hit: Some(OnHit {
                    kind: StatusKind::Acid,
                    secs,
                    dps: dps * mods.get(ModKey::AcidDpsMul),
                    slow_secs: 0.0,
                }),
            };
            out.push(shot(shooter, aim_dir, s, rng.gen_bool(crit.clamp(0.0, 1.0))));
        }
        WeaponKind::Plasma => {
            let (secs, dps) = PLASMA_BURN;
            let s = Shot {
                kind: ProjectileKind::Plasma,
                speed: PLASMA_SPEED,
                damage: (18.0 + 2.0 * (lvl - 1.0)) * dm * mods.get(ModKey::PlasmaDamageMul),
                life: PLASMA_LIFE,
                radius: PLASMA_RADIUS,
                damage_type: DamageType::Plasma,
                on_hit: Some(OnHit {
                    kind: StatusKind::Burn,
                    secs,
                    dps: dps * mods.get(ModKey::PlasmaExplosionMul),
                    slow_secs: 0.0,
                }),
            };
            out.push(shot(shooter, aim_dir, s, false));
        }
        WeaponKind::Void => {
            let (secs, dps) = VOID_CORRUPTION;
            let s = Shot {
                kind: ProjectileKind::Void,
                speed: VOID_SPEED,
                damage: (25.0 + 3.0 * (lvl - 1.0)) * dm * mods.get(ModKey::VoidDamageMul),
                life: VOID_LIFE * mods.get(ModKey::VoidRangeMul),
                radius: VOID_RADIUS * mods.get(ModKey::VoidRadiusMul),
                damage_type: DamageType::Void,
                on_hit: Some(OnHit { kind: StatusKind::Void, secs, dps, slow_secs: VOID_SLOW_SECS }),
            };
            out.push(shot(shooter, aim_dir, s, false));
        }
    }

    if !out.is_empty() {
        loadout.slots[weapon.index()].cooldown = cooldown(weapon, level, upgrades, mods);
    }
    out
}

/// Resolve a chain arc: the live enemy nearest `anchor` within `range`,
/// then repeatedly the nearest unhit live enemy within `range` of the last
/// hit, up to `max_hits` ships. Returns the drawn path and hit order.
pub fn chain_arc(
    shooter: &Shooter,
    anchor: Vec2,
    contacts: &[Contact],
    max_hits: usize,
    range: f64,
) -> Option<(Vec<Vec2>, Vec<ShipId>)> {
    let range_sq = range * range;
    let enemies: Vec<&Contact> = contacts.iter().filter(|c| c.alive && c.team != shooter.team).collect();

    let nearest = |from: Vec2, hits: &[ShipId]| {
        enemies
            .iter()
            .filter(|c| !hits.contains(&c.id))
            .map(|c| (*c, c.position.distance_squared(from)))
            .filter(|(_, d)| *d <= range_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    };

    let first = nearest(anchor, &[])?;
    let mut path = vec![shooter.position, first.position];
    let mut hits = vec![first.id];
    let mut cursor = first.position;
    while hits.len() < max_hits {
        let Some(next) = nearest(cursor, &hits) else { break };
        path.push(next.position);
        hits.push(next.id);
        cursor = next.position;
    }
    Some((path, hits))
}
