//! Damage resolution and death.
//!
//! `apply_to_hull` is the pure numeric core: shield absorbs first, the
//! remainder comes off health. `damage_ship` wraps it with bookkeeping
//! (events, statistics, kill credit) against the world.

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::{DamageType, LifeState, ShipKind};
use arena_core::events::AudioEvent;
use arena_core::types::{Position, ShipId, Vec2, Velocity};

use crate::context::{SimContext, Spawn};

/// How damage is split between shield and health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Shield absorbs first; the remainder hits health.
    #[default]
    Standard,
    /// Beam contact: strips shield fast while bleeding some health.
    Beam,
    /// Bypasses the shield entirely (damage over time).
    Hull,
}

/// One damage request.
#[derive(Debug, Clone, Copy)]
pub struct Damage {
    pub amount: f64,
    pub attacker: Option<ShipId>,
    pub ignore_invuln: bool,
    pub critical: bool,
    pub damage_type: DamageType,
    pub delivery: Delivery,
}

impl Damage {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            attacker: None,
            ignore_invuln: false,
            critical: false,
            damage_type: DamageType::Normal,
            delivery: Delivery::Standard,
        }
    }

    pub fn from(mut self, attacker: Option<ShipId>) -> Self {
        self.attacker = attacker;
        self
    }

    pub fn typed(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn ignoring_invulnerability(mut self) -> Self {
        self.ignore_invuln = true;
        self
    }

    pub fn delivered(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }
}

/// Shield and health actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Absorption {
    pub shield: f64,
    pub hp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target dead or protected; nothing changed.
    Ignored,
    Applied { absorbed: Absorption, lethal: bool },
}

/// Take `amount` from shield first, then health.
pub fn absorb(hull: &mut Hull, amount: f64) -> Absorption {
    let amount = amount.max(0.0);
    let shield = hull.shield.min(amount).max(0.0);
    hull.shield -= shield;
    let hp = amount - shield;
    hull.hp -= hp;
    Absorption { shield, hp }
}

/// Apply one damage request to a hull. Pure; no world access.
pub fn apply_to_hull(hull: &mut Hull, alive: bool, damage: &Damage) -> DamageOutcome {
    if !alive {
        return DamageOutcome::Ignored;
    }
    if hull.invuln_secs > 0.0 && !damage.ignore_invuln {
        return DamageOutcome::Ignored;
    }
    let absorbed = match damage.delivery {
        Delivery::Standard => absorb(hull, damage.amount),
        Delivery::Beam => {
            if hull.shield > 0.0 {
                let before = hull.shield;
                hull.shield = (hull.shield - damage.amount * LASER_SHIELD_RATE).max(0.0);
                let hp = damage.amount * LASER_BLEED_RATE;
                hull.hp -= hp;
                Absorption { shield: before - hull.shield, hp }
            } else {
                let hp = damage.amount * LASER_HULL_RATE;
                hull.hp -= hp;
                Absorption { shield: 0.0, hp }
            }
        }
        Delivery::Hull => {
            let hp = damage.amount.max(0.0);
            hull.hp -= hp;
            Absorption { shield: 0.0, hp }
        }
    };
    DamageOutcome::Applied { absorbed, lethal: hull.hp <= 0.0 }
}

/// Apply damage to a ship entity, emitting feedback and handling death.
pub fn damage_ship(world: &mut World, ctx: &mut SimContext, entity: Entity, damage: Damage) -> DamageOutcome {
    let (outcome, victim, position) = {
        let Ok((ship, hull, pos)) = world.query_one_mut::<(&Ship, &mut Hull, &Position)>(entity) else {
            return DamageOutcome::Ignored;
        };
        let outcome = apply_to_hull(hull, ship.life.is_alive(), &damage);
        (outcome, ship.id, pos.0)
    };

    let DamageOutcome::Applied { absorbed, lethal } = outcome else {
        return outcome;
    };

    let total = absorbed.shield + absorbed.hp;
    if let Ok(mut stats) = world.get::<&mut Stats>(entity) {
        stats.damage_taken += total;
    }
    if let Some(attacker) = damage.attacker.and_then(|id| ctx.ship_entity(id)) {
        if let Ok(mut stats) = world.get::<&mut Stats>(attacker) {
            stats.damage_dealt += total;
        }
    }
    if damage.delivery != Delivery::Hull {
        ctx.events.push(AudioEvent::Hit {
            ship: victim,
            amount: total,
            shielded: absorbed.shield > 0.0,
            critical: damage.critical,
            damage_type: damage.damage_type,
        });
    }

    if lethal {
        kill(world, ctx, entity, damage.attacker, position);
    }
    outcome
}

/// Mark a ship dead, credit the killer and drop pickups.
pub fn kill(world: &mut World, ctx: &mut SimContext, entity: Entity, attacker: Option<ShipId>, position: Vec2) {
    let (victim, kind, level) = {
        let Ok((ship, prog, stats)) = world.query_one_mut::<(&mut Ship, &Progression, &mut Stats)>(entity) else {
            return;
        };
        if !ship.life.is_alive() {
            return;
        }
        ship.life = if ship.kind == ShipKind::Reinforcement {
            LifeState::PendingRemoval
        } else {
            LifeState::PendingRespawn
        };
        stats.deaths += 1;
        (ship.id, ship.kind, prog.level)
    };

    if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
        vel.0 = Vec2::ZERO;
    }

    // Self-inflicted deaths credit nobody.
    let killer = attacker.filter(|&id| id != victim);
    if let Some(killer_entity) = killer.and_then(|id| ctx.ship_entity(id)) {
        if let Ok(mut stats) = world.get::<&mut Stats>(killer_entity) {
            stats.score += KILL_SCORE;
            stats.kills += 1;
        }
    }

    if kind != ShipKind::Reinforcement {
        let drops = (level / 3).max(1);
        for _ in 0..drops {
            let offset = Vec2::new(
                ctx.rng.gen_range(-PICKUP_SCATTER..=PICKUP_SCATTER),
                ctx.rng.gen_range(-PICKUP_SCATTER..=PICKUP_SCATTER),
            );
            ctx.spawns.push(Spawn::Pickup { position: position + offset, value: 1 });
        }
    }

    debug!(ship = victim.0, killer = ?killer.map(|k| k.0), "ship destroyed");
    ctx.events.push(AudioEvent::ShipDestroyed { ship: victim, killer, position });
}
