//! Per-ship timers, debuffs, shield regeneration and movement.

use hecs::{Entity, World};
use rand::Rng;

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::geometry::{cap_length, clamp_to_arena};
use arena_core::modifiers::{ClassTree, ModKey};
use arena_core::types::{Position, Vec2, Velocity};

use crate::combat;
use crate::context::{SimContext, Spawn};
use crate::status;

/// Speed cap from base speed, level, speed upgrade and class multiplier.
pub fn max_speed(base_speed: f64, level: u32, speed_upgrade: u32, speed_mul: f64) -> f64 {
    (base_speed + SPEED_PER_LEVEL * (level as f64 - 1.0))
        * (1.0 + SPEED_PER_UPGRADE * (speed_upgrade as f64 - 1.0))
        * speed_mul
}

/// Apply an acceleration request for `dt`, scaled by `speed_mul` and capped.
pub fn accelerate(vel: &mut Velocity, accel: Vec2, dt: f64, speed_mul: f64, max_speed: f64) {
    vel.0 += accel * dt * speed_mul;
    vel.0 = cap_length(vel.0, max_speed);
}

fn tick_down(timer: &mut f64, dt: f64) {
    if *timer > 0.0 {
        *timer = (*timer - dt).max(0.0);
    }
}

pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let arena = ctx.arena();
    let mut deaths: Vec<(Entity, Vec2)> = Vec::new();

    for (entity, (ship, hull, pos, vel, thrusters, loadout, cds, effects, prog, upgrades, tree, reinforcement)) in world
        .query_mut::<(
            &Ship,
            &mut Hull,
            &mut Position,
            &mut Velocity,
            &mut Thrusters,
            &mut Loadout,
            &mut AbilityCooldowns,
            &mut StatusEffects,
            &Progression,
            &Upgrades,
            &mut ClassTree,
            Option<&mut Reinforcement>,
        )>()
    {
        if !ship.life.is_alive() {
            continue;
        }

        tick_down(&mut hull.invuln_secs, dt);
        for slot in loadout.slots.iter_mut() {
            tick_down(&mut slot.cooldown, dt);
        }
        tick_down(&mut cds.reinforce, dt);
        tick_down(&mut cds.quantum, dt);
        tick_down(&mut cds.teleport, dt);
        tick_down(&mut cds.ultimate, dt);

        if status::resolve(hull, effects, dt) {
            deaths.push((entity, pos.0));
            continue;
        }

        if hull.invuln_secs <= 0.0 {
            hull.shield = (hull.shield + hull.shield_regen * dt).clamp(0.0, hull.max_shield);
        }

        let speed_mul = tree.get(ModKey::SpeedMul);
        thrusters.max_speed = max_speed(thrusters.base_speed, prog.level, upgrades.speed, speed_mul);

        let factor = status::movement_factor(effects, dt);
        pos.0 = clamp_to_arena(pos.0 + vel.0 * dt * factor, arena.w, arena.h);
        vel.0 *= VELOCITY_DAMPING;

        if let Some(r) = reinforcement {
            r.remaining -= dt;
            if r.remaining <= 0.0 {
                deaths.push((entity, pos.0));
                continue;
            }
        }

        if upgrades.trail > 0 && ctx.rng.gen_bool(TRAIL_DROP_CHANCE) {
            let t = upgrades.trail as f64;
            ctx.spawns.push(Spawn::Trail {
                owner: Owner { ship: ship.id, team: ship.team },
                position: pos.0,
                segment: TrailSegment { radius: 6.0 + 2.0 * t, dps: TRAIL_DPS, remaining: 0.35 + 0.03 * t },
            });
        }
    }

    // Damage over time and expiry credit nobody.
    for (entity, position) in deaths {
        if let Ok(mut hull) = world.get::<&mut Hull>(entity) {
            hull.hp = hull.hp.min(0.0);
        }
        combat::kill(world, ctx, entity, None, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_speed_formula() {
        assert!((max_speed(300.0, 1, 1, 1.0) - 300.0).abs() < 1e-12);
        let expected = (300.0 + 6.0 * 9.0) * (1.0 + 0.08 * 2.0) * 0.92;
        assert!((max_speed(300.0, 10, 3, 0.92) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_accelerate_caps_speed() {
        let mut vel = Velocity::default();
        for _ in 0..600 {
            accelerate(&mut vel, Vec2::new(900.0, 900.0), DT, 1.0, 300.0);
        }
        assert!(vel.speed() <= 300.0 + 1e-9);
        assert!(vel.speed() > 299.0);
    }
}
