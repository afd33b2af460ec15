//! Projectile motion, missile guidance, gravity pulls and effect lifetimes.

use hecs::{Entity, World};

use arena_ai::brain::{nearest_enemy, Contact};
use arena_core::components::*;
use arena_core::geometry::rotate_toward;
use arena_core::types::{Position, TeamId, Vec2, Velocity};

use crate::combat::{self, Damage};
use crate::context::SimContext;

/// Projectiles feel this fraction of a pulse's strength, without falloff.
const PROJECTILE_PULL: f64 = 0.5;
/// Bodies closer than this to a pulse center are left alone.
const PULL_DEAD_ZONE: f64 = 1.0;

pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let contacts = super::contacts(world);

    for (entity, (owner, pos, vel, projectile, homing)) in world.query_mut::<(
        &Owner,
        &mut Position,
        &mut Velocity,
        &mut Projectile,
        Option<&mut Homing>,
    )>() {
        projectile.life -= dt;
        if let Some(homing) = homing {
            steer(homing, owner.team, pos.0, vel, &contacts, dt);
        }
        pos.0 += vel.0 * dt;
        if projectile.life <= 0.0 {
            ctx.despawn_buffer.push(entity);
        }
    }

    apply_gravity(world, ctx, dt);
    tick_effects(world, ctx, dt);
    ctx.flush_despawns(world);
}

/// Re-acquire a target if the current one is gone or dead, then turn toward
/// it by at most `turn_rate * dt`. Speed is constant.
pub fn steer(homing: &mut Homing, team: TeamId, position: Vec2, vel: &mut Velocity, contacts: &[Contact], dt: f64) {
    let current = homing
        .target
        .and_then(|id| contacts.iter().find(|c| c.id == id && c.alive));
    let target = match current {
        Some(c) => Some(c),
        None => {
            let next = nearest_enemy(position, team, contacts, None);
            homing.target = next.map(|c| c.id);
            next
        }
    };

    let mut heading = if vel.0.length_squared() > 0.0 { vel.0.normalize() } else { Vec2::X };
    if let Some(t) = target {
        heading = rotate_toward(heading, t.position - position, homing.turn_rate * dt);
    }
    vel.0 = heading * homing.speed;
}

fn apply_gravity(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let pulses: Vec<(Owner, Vec2, GravityPulse)> = world
        .query::<(&Owner, &Position, &GravityPulse)>()
        .iter()
        .map(|(_, (owner, pos, pulse))| (*owner, pos.0, *pulse))
        .collect();

    for (owner, center, pulse) in pulses {
        let mut caught: Vec<Entity> = Vec::new();
        for (entity, (ship, pos, vel)) in world.query_mut::<(&Ship, &Position, &mut Velocity)>() {
            if ship.team == owner.team || !ship.life.is_alive() {
                continue;
            }
            let to_center = center - pos.0;
            let d = to_center.length();
            if d < pulse.radius && d > PULL_DEAD_ZONE {
                let force = pulse.strength * (1.0 - d / pulse.radius);
                vel.0 += to_center / d * force * dt;
                caught.push(entity);
            }
        }
        for entity in caught {
            combat::damage_ship(world, ctx, entity, Damage::new(pulse.dps * dt).from(Some(owner.ship)));
        }

        for (_, (proj_owner, pos, vel, _)) in world.query_mut::<(&Owner, &Position, &mut Velocity, &Projectile)>() {
            if proj_owner.team == owner.team {
                continue;
            }
            let to_center = center - pos.0;
            let d = to_center.length();
            if d < pulse.radius && d > PULL_DEAD_ZONE {
                vel.0 += to_center / d * pulse.strength * PROJECTILE_PULL * dt;
            }
        }
    }
}

fn expire(timer: &mut f64, dt: f64) -> bool {
    *timer -= dt;
    *timer <= 0.0
}

fn tick_effects(world: &mut World, ctx: &mut SimContext, dt: f64) {
    for (entity, beam) in world.query_mut::<&mut Beam>() {
        if expire(&mut beam.remaining, dt) {
            ctx.despawn_buffer.push(entity);
        }
    }
    for (entity, arc) in world.query_mut::<&mut ChainArc>() {
        if expire(&mut arc.remaining, dt) {
            ctx.despawn_buffer.push(entity);
        }
    }
    for (entity, pulse) in world.query_mut::<&mut GravityPulse>() {
        if expire(&mut pulse.remaining, dt) {
            ctx.despawn_buffer.push(entity);
        }
    }
    for (entity, trail) in world.query_mut::<&mut TrailSegment>() {
        if expire(&mut trail.remaining, dt) {
            ctx.despawn_buffer.push(entity);
        }
    }
    for (entity, pickup) in world.query_mut::<&mut Pickup>() {
        if expire(&mut pickup.life, dt) {
            ctx.despawn_buffer.push(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::types::ShipId;

    fn contact(id: u32, team: TeamId, x: f64, y: f64, alive: bool) -> Contact {
        Contact { id: ShipId(id), team, position: Vec2::new(x, y), alive }
    }

    #[test]
    fn test_missile_acquires_nearest_live_enemy() {
        let contacts = [
            contact(1, 1, 100.0, 0.0, false),
            contact(2, 1, 300.0, 0.0, true),
            contact(3, 0, 50.0, 0.0, true),
        ];
        let mut homing = Homing { target: None, speed: 400.0, turn_rate: 3.2 };
        let mut vel = Velocity(Vec2::new(400.0, 0.0));
        steer(&mut homing, 0, Vec2::ZERO, &mut vel, &contacts, 1.0 / 60.0);
        assert_eq!(homing.target, Some(ShipId(2)));
    }

    #[test]
    fn test_missile_drops_dead_target() {
        let contacts = [contact(1, 1, 100.0, 0.0, false), contact(2, 1, 0.0, 500.0, true)];
        let mut homing = Homing { target: Some(ShipId(1)), speed: 400.0, turn_rate: 3.2 };
        let mut vel = Velocity(Vec2::new(400.0, 0.0));
        steer(&mut homing, 0, Vec2::ZERO, &mut vel, &contacts, 1.0 / 60.0);
        assert_eq!(homing.target, Some(ShipId(2)));
    }

    #[test]
    fn test_missile_turn_is_bounded_and_speed_constant() {
        let contacts = [contact(2, 1, 0.0, 500.0, true)];
        let mut homing = Homing { target: None, speed: 400.0, turn_rate: 3.2 };
        let mut vel = Velocity(Vec2::new(400.0, 0.0));
        let dt = 1.0 / 60.0;
        steer(&mut homing, 0, Vec2::ZERO, &mut vel, &contacts, dt);
        let turned = vel.0.y.atan2(vel.0.x);
        assert!((turned - 3.2 * dt).abs() < 1e-9);
        assert!((vel.speed() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_missile_without_enemies_flies_straight() {
        let mut homing = Homing { target: None, speed: 400.0, turn_rate: 3.2 };
        let mut vel = Velocity(Vec2::new(0.0, -10.0));
        steer(&mut homing, 0, Vec2::ZERO, &mut vel, &[], 0.1);
        assert_eq!(homing.target, None);
        assert!((vel.0 - Vec2::new(0.0, -400.0)).length() < 1e-9);
    }
}
