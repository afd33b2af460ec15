//! Special abilities: reinforcement call, quantum roll, teleport and the
//! class ultimate. Each runs on its own cooldown, shortened by its upgrade
//! level down to a floor.

use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use arena_core::class_tree::ultimate_for;
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::{AbilityKind, DamageType, ProjectileKind, QuantumOutcome, StatusKind, UltimateKind};
use arena_core::events::AudioEvent;
use arena_core::geometry::from_angle;
use arena_core::modifiers::{ClassTree, ModKey};
use arena_core::types::{Position, TeamId, Vec2, Velocity};

use crate::combat::{self, Damage, DamageOutcome};
use crate::context::{SimContext, Spawn};
use crate::status;

/// Reinforcements appear this far from the summoner on each axis.
const REINFORCE_OFFSET: f64 = 40.0;
const BARRAGE_SPEED: f64 = 1200.0;
const BARRAGE_LIFE: f64 = 2.0;
const BARRAGE_RADIUS: f64 = 8.0;

/// Full cooldown of `ability` at the ship's upgrade level.
pub fn cooldown(ability: AbilityKind, upgrades: &Upgrades) -> f64 {
    let (base, level, floor) = match ability {
        AbilityKind::Reinforce => (REINFORCE_CD, upgrades.reinforce, 4.0),
        AbilityKind::Quantum => (QUANTUM_CD, upgrades.quantum, 4.0),
        AbilityKind::Teleport => (TELEPORT_CD, upgrades.teleport, 3.0),
        AbilityKind::Ultimate => (ULTIMATE_CD, upgrades.ultimate, 10.0),
    };
    (base * (1.0 - ABILITY_CD_PER_UPGRADE * level as f64)).max(floor)
}

/// Apply a quantum roll in `[0, 1)` to the hull. Thirds map to heal,
/// shield and invulnerability.
pub fn roll_quantum(hull: &mut Hull, level: u32, roll: f64) -> QuantumOutcome {
    let amount = 40.0 + 6.0 * level as f64;
    if roll < 1.0 / 3.0 {
        hull.hp = (hull.hp + amount).clamp(0.0, hull.max_hp);
        QuantumOutcome::Heal
    } else if roll < 2.0 / 3.0 {
        hull.shield = (hull.shield + amount).clamp(0.0, hull.max_shield);
        QuantumOutcome::Shield
    } else {
        hull.invuln_secs = hull.invuln_secs.max(1.0 + 0.2 * level as f64);
        QuantumOutcome::Invulnerability
    }
}

/// Summon a temporary ally next to the ship. The ally is queued as a spawn.
pub fn reinforce(world: &mut World, ctx: &mut SimContext, entity: Entity) -> bool {
    let Ok((ship, pos, upgrades, cds, zone)) =
        world.query_one_mut::<(&Ship, &Position, &Upgrades, &mut AbilityCooldowns, &SpawnZone)>(entity)
    else {
        return false;
    };
    if !ship.life.is_alive() || cds.reinforce > 0.0 {
        return false;
    }
    ctx.spawns.push(Spawn::Reinforcement {
        summoner: ship.id,
        team: ship.team,
        position: pos.0 + Vec2::splat(REINFORCE_OFFSET),
        lifetime: REINFORCE_LIFETIME * (1.0 + 0.08 * upgrades.reinforce as f64),
        zone: zone.0,
    });
    cds.reinforce = cooldown(AbilityKind::Reinforce, upgrades);
    ctx.events.push(AudioEvent::AbilityUsed { ship: ship.id, ability: AbilityKind::Reinforce });
    true
}

pub fn quantum(world: &mut World, ctx: &mut SimContext, entity: Entity) -> Option<QuantumOutcome> {
    let (ship, hull, upgrades, cds) =
        world.query_one_mut::<(&Ship, &mut Hull, &Upgrades, &mut AbilityCooldowns)>(entity).ok()?;
    if !ship.life.is_alive() || cds.quantum > 0.0 {
        return None;
    }
    let outcome = roll_quantum(hull, upgrades.quantum, ctx.rng.gen::<f64>());
    cds.quantum = cooldown(AbilityKind::Quantum, upgrades);
    ctx.events.push(AudioEvent::AbilityUsed { ship: ship.id, ability: AbilityKind::Quantum });
    ctx.events.push(AudioEvent::QuantumRolled { ship: ship.id, outcome });
    Some(outcome)
}

/// Jump to `target`. Targets within `TELEPORT_EDGE_MARGIN` of the arena
/// edge are refused without spending the cooldown.
pub fn teleport(world: &mut World, ctx: &mut SimContext, entity: Entity, target: Vec2) -> bool {
    let arena = ctx.arena().inset(TELEPORT_EDGE_MARGIN);
    let Ok((ship, pos, vel, upgrades, cds)) =
        world.query_one_mut::<(&Ship, &mut Position, &mut Velocity, &Upgrades, &mut AbilityCooldowns)>(entity)
    else {
        return false;
    };
    if !ship.life.is_alive() || cds.teleport > 0.0 {
        return false;
    }
    if !arena.contains(target) {
        debug!(ship = ship.id.0, x = target.x, y = target.y, "teleport target too close to the edge");
        return false;
    }
    let from = pos.0;
    pos.0 = target;
    vel.0 = Vec2::ZERO;
    cds.teleport = cooldown(AbilityKind::Teleport, upgrades);
    ctx.events.push(AudioEvent::AbilityUsed { ship: ship.id, ability: AbilityKind::Teleport });
    ctx.events.push(AudioEvent::Teleported { ship: ship.id, from, to: target });
    true
}

/// Fire the class ultimate. Requires an ultimate-unlocking node and a
/// top-tier node that picks the variant.
pub fn ultimate(world: &mut World, ctx: &mut SimContext, entity: Entity) -> Option<UltimateKind> {
    let (id, team, center, kind) = {
        let (ship, pos, upgrades, cds, tree) = world
            .query_one_mut::<(&Ship, &Position, &Upgrades, &mut AbilityCooldowns, &mut ClassTree)>(entity)
            .ok()?;
        if !ship.life.is_alive() || cds.ultimate > 0.0 || !tree.flag(ModKey::UltimateUnlock) {
            return None;
        }
        let kind = ultimate_for(tree.nodes())?;
        cds.ultimate = cooldown(AbilityKind::Ultimate, upgrades);
        (ship.id, ship.team, pos.0, kind)
    };

    match kind {
        UltimateKind::Barrage => {
            let owner = Owner { ship: id, team };
            for _ in 0..BARRAGE_BULLETS {
                let dir = from_angle(ctx.rng.gen_range(0.0..TAU));
                ctx.spawns.push(Spawn::Projectile {
                    owner,
                    position: center,
                    velocity: dir * BARRAGE_SPEED,
                    projectile: Projectile {
                        kind: ProjectileKind::Bullet,
                        damage: BARRAGE_DAMAGE,
                        radius: BARRAGE_RADIUS,
                        life: BARRAGE_LIFE,
                        damage_type: DamageType::Normal,
                        critical: false,
                        on_hit: None,
                    },
                    homing: None,
                });
            }
        }
        UltimateKind::VoidBurst => {
            let (secs, dps) = VOID_BURST_CORRUPTION;
            for victim in enemies_within(world, team, center, VOID_BURST_RADIUS) {
                let damage = Damage::new(VOID_BURST_DAMAGE).from(Some(id)).typed(DamageType::Void);
                if let DamageOutcome::Applied { .. } = combat::damage_ship(world, ctx, victim, damage) {
                    if let Ok(mut effects) = world.get::<&mut StatusEffects>(victim) {
                        status::add_effect(&mut effects, StatusKind::Void, secs, dps);
                    }
                }
            }
        }
        UltimateKind::TimeSlow => {
            for victim in enemies_within(world, team, center, TIME_SLOW_RADIUS) {
                if let Ok(mut effects) = world.get::<&mut StatusEffects>(victim) {
                    status::add_slow(&mut effects, TIME_SLOW_SECS);
                }
            }
        }
    }

    debug!(ship = id.0, ?kind, "ultimate");
    ctx.events.push(AudioEvent::AbilityUsed { ship: id, ability: AbilityKind::Ultimate });
    Some(kind)
}

fn enemies_within(world: &World, team: TeamId, center: Vec2, radius: f64) -> Vec<Entity> {
    world
        .query::<(&Ship, &Position)>()
        .iter()
        .filter(|(_, (ship, pos))| {
            ship.team != team && ship.life.is_alive() && pos.0.distance(center) < radius
        })
        .map(|(entity, _)| entity)
        .collect()
}
