//! Hit detection between ships and beams, projectiles and trail segments.

use hecs::{Entity, World};

use arena_core::components::*;
use arena_core::constants::{LASER_TICK_FACTOR, SHIP_SIZE};
use arena_core::geometry::segment_distance_sq;
use arena_core::types::{Position, Rect, TeamId, Vec2};

use crate::combat::{self, Damage, DamageOutcome, Delivery};
use crate::context::SimContext;
use crate::status;

/// Ship hit box side for projectiles, as a multiple of `SHIP_SIZE`.
const PROJECTILE_HITBOX: f64 = 1.2;
/// Beam reach from its segment, as a multiple of `SHIP_SIZE`.
const BEAM_REACH: f64 = 0.7;
/// Extra trail reach, as a multiple of `SHIP_SIZE`.
const TRAIL_REACH: f64 = 0.3;

#[derive(Clone, Copy)]
struct Target {
    entity: Entity,
    team: TeamId,
    position: Vec2,
}

fn targets(world: &World) -> Vec<Target> {
    world
        .query::<(&Ship, &Position)>()
        .iter()
        .filter(|(_, (ship, _))| ship.life.is_alive())
        .map(|(entity, (ship, pos))| Target { entity, team: ship.team, position: pos.0 })
        .collect()
}

fn is_alive(world: &World, entity: Entity) -> bool {
    world.get::<&Ship>(entity).map(|s| s.life.is_alive()).unwrap_or(false)
}

/// Projectile box against the enlarged ship box.
pub fn projectile_hits(projectile_pos: Vec2, radius: f64, ship_pos: Vec2) -> bool {
    Rect::centered(projectile_pos, radius * 2.0).intersects(&Rect::centered(ship_pos, SHIP_SIZE * PROJECTILE_HITBOX))
}

/// Whether a ship center is within beam reach of the segment.
pub fn beam_hits(start: Vec2, end: Vec2, ship_pos: Vec2) -> bool {
    let reach = SHIP_SIZE * BEAM_REACH;
    segment_distance_sq(ship_pos, start, end) < reach * reach
}

pub fn trail_hits(center: Vec2, radius: f64, ship_pos: Vec2) -> bool {
    let reach = radius + SHIP_SIZE * TRAIL_REACH;
    center.distance_squared(ship_pos) < reach * reach
}

pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let ships = targets(world);
    beams(world, ctx, &ships, dt);
    projectiles(world, ctx, &ships);
    trails(world, ctx, &ships, dt);
    ctx.flush_despawns(world);
}

fn beams(world: &mut World, ctx: &mut SimContext, ships: &[Target], dt: f64) {
    let beams: Vec<(Owner, Beam)> = world
        .query::<(&Owner, &Beam)>()
        .iter()
        .map(|(_, (owner, beam))| (*owner, *beam))
        .collect();

    for (owner, beam) in beams {
        for ship in ships.iter().filter(|s| s.team != owner.team) {
            if !beam_hits(beam.start, beam.end, ship.position) || !is_alive(world, ship.entity) {
                continue;
            }
            let damage = Damage::new(beam.damage * LASER_TICK_FACTOR * dt)
                .from(Some(owner.ship))
                .delivered(Delivery::Beam);
            combat::damage_ship(world, ctx, ship.entity, damage);
        }
    }
}

fn projectiles(world: &mut World, ctx: &mut SimContext, ships: &[Target]) {
    let shots: Vec<(Entity, Owner, Vec2, Projectile)> = world
        .query::<(&Owner, &Position, &Projectile)>()
        .iter()
        .map(|(entity, (owner, pos, projectile))| (entity, *owner, pos.0, *projectile))
        .collect();

    for (shot, owner, position, projectile) in shots {
        let victim = ships.iter().find(|s| {
            s.team != owner.team && projectile_hits(position, projectile.radius, s.position) && is_alive(world, s.entity)
        });
        let Some(victim) = victim else { continue };

        let damage = Damage::new(projectile.damage)
            .from(Some(owner.ship))
            .typed(projectile.damage_type)
            .critical(projectile.critical);
        let outcome = combat::damage_ship(world, ctx, victim.entity, damage);
        if let (DamageOutcome::Applied { .. }, Some(on_hit)) = (outcome, projectile.on_hit) {
            if let Ok(mut effects) = world.get::<&mut StatusEffects>(victim.entity) {
                status::add_effect(&mut effects, on_hit.kind, on_hit.secs, on_hit.dps);
                if on_hit.slow_secs > 0.0 {
                    status::add_slow(&mut effects, on_hit.slow_secs);
                }
            }
        }
        ctx.despawn_buffer.push(shot);
    }
}

fn trails(world: &mut World, ctx: &mut SimContext, ships: &[Target], dt: f64) {
    let segments: Vec<(Owner, Vec2, TrailSegment)> = world
        .query::<(&Owner, &Position, &TrailSegment)>()
        .iter()
        .map(|(_, (owner, pos, seg))| (*owner, pos.0, *seg))
        .collect();

    for (owner, center, seg) in segments {
        for ship in ships.iter().filter(|s| s.team != owner.team) {
            if trail_hits(center, seg.radius, ship.position) && is_alive(world, ship.entity) {
                combat::damage_ship(world, ctx, ship.entity, Damage::new(seg.dps * dt));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_box_overlap() {
        let ship = Vec2::new(100.0, 100.0);
        // Ship box half-extent is 20.4, bullet half-extent 4.
        assert!(projectile_hits(Vec2::new(124.0, 100.0), 4.0, ship));
        assert!(!projectile_hits(Vec2::new(125.0, 100.0), 4.0, ship));
    }

    #[test]
    fn test_beam_reach() {
        let start = Vec2::ZERO;
        let end = Vec2::new(800.0, 0.0);
        assert!(beam_hits(start, end, Vec2::new(400.0, 23.0)));
        assert!(!beam_hits(start, end, Vec2::new(400.0, 24.0)));
        // Past the end of the segment.
        assert!(!beam_hits(start, end, Vec2::new(830.0, 0.0)));
    }

    #[test]
    fn test_trail_reach() {
        assert!(trail_hits(Vec2::ZERO, 8.0, Vec2::new(18.0, 0.0)));
        assert!(!trail_hits(Vec2::ZERO, 8.0, Vec2::new(18.3, 0.0)));
    }
}
