//! Obstacle contact, lethal spikes and sphere pickup collection.

use hecs::{Entity, World};
use rand::Rng;
use tracing::trace;

use arena_core::components::*;
use arena_core::constants::{HAZARD_DAMAGE, OBSTACLE_JITTER, PICKUP_RADIUS, SHIP_SIZE};
use arena_core::enums::ObstacleShape;
use arena_core::events::AudioEvent;
use arena_core::geometry::clamp_to_arena;
use arena_core::types::{Position, Rect, Vec2, Velocity};

use crate::combat::{self, Damage};
use crate::context::SimContext;
use crate::progression;
use crate::world_setup::collect_obstacles;

/// Spike reach beyond its radius, as a multiple of `SHIP_SIZE`.
const SPIKE_REACH: f64 = 0.4;

/// Damage from bumping a block, by impact speed.
pub fn impact_damage(speed: f64) -> f64 {
    if speed < 180.0 {
        1.0
    } else if speed < 280.0 {
        2.0
    } else if speed < 380.0 {
        5.0
    } else {
        10.0
    }
}

/// Whether a ship centered at `ship_pos` touches the obstacle.
pub fn touches(ship_pos: Vec2, center: Vec2, obstacle: &Obstacle) -> bool {
    match obstacle.shape {
        ObstacleShape::Spike => {
            let reach = obstacle.radius + SHIP_SIZE * SPIKE_REACH;
            ship_pos.distance_squared(center) < reach * reach
        }
        ObstacleShape::Block | ObstacleShape::Wedge => {
            Rect::centered(ship_pos, SHIP_SIZE).intersects(&obstacle.bounds)
        }
    }
}

pub fn run(world: &mut World, ctx: &mut SimContext) {
    obstacles(world, ctx);
    pickups(world, ctx);
    ctx.flush_despawns(world);
}

fn obstacles(world: &mut World, ctx: &mut SimContext) {
    let obstacles = collect_obstacles(world);
    if obstacles.is_empty() {
        return;
    }
    let ships: Vec<(Entity, Vec2)> = world
        .query::<(&Ship, &Position)>()
        .iter()
        .filter(|(_, (ship, _))| ship.life.is_alive())
        .map(|(entity, (_, pos))| (entity, pos.0))
        .collect();
    let arena = ctx.arena();

    for (entity, position) in ships {
        for (center, obstacle) in obstacles.iter().filter(|(c, o)| touches(position, *c, o)) {
            if obstacle.shape == ObstacleShape::Spike {
                let damage = Damage::new(HAZARD_DAMAGE).ignoring_invulnerability();
                combat::damage_ship(world, ctx, entity, damage);
                continue;
            }
            let speed = world.get::<&Velocity>(entity).map(|v| v.speed()).unwrap_or(0.0);
            combat::damage_ship(world, ctx, entity, Damage::new(impact_damage(speed)));
            let jitter = Vec2::new(
                ctx.rng.gen_range(-OBSTACLE_JITTER..=OBSTACLE_JITTER),
                ctx.rng.gen_range(-OBSTACLE_JITTER..=OBSTACLE_JITTER),
            );
            if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                pos.0 = clamp_to_arena(pos.0 + jitter, arena.w, arena.h);
            }
            trace!(x = center.x, y = center.y, speed, "obstacle bump");
        }
    }
}

fn pickups(world: &mut World, ctx: &mut SimContext) {
    let mut spheres: Vec<(Entity, Vec2, u32)> = world
        .query::<(&Position, &Pickup)>()
        .iter()
        .map(|(entity, (pos, pickup))| (entity, pos.0, pickup.value))
        .collect();
    if spheres.is_empty() {
        return;
    }

    for (_, (ship, pos, prog, upgrades)) in world.query_mut::<(&Ship, &Position, &mut Progression, &Upgrades)>() {
        if !ship.life.is_alive() {
            continue;
        }
        let hull_box = Rect::centered(pos.0, SHIP_SIZE);
        let mut i = 0;
        while i < spheres.len() {
            let (entity, at, value) = spheres[i];
            if !hull_box.intersects(&Rect::centered(at, PICKUP_RADIUS * 2.0)) {
                i += 1;
                continue;
            }
            spheres.swap_remove(i);
            ctx.despawn_buffer.push(entity);
            ctx.events.push(AudioEvent::PickupCollected { ship: ship.id, value });
            if progression::award_spheres(prog, upgrades, value) > 0 {
                ctx.events.push(AudioEvent::LevelUp { ship: ship.id, level: prog.level });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_bands() {
        assert_eq!(impact_damage(0.0), 1.0);
        assert_eq!(impact_damage(179.9), 1.0);
        assert_eq!(impact_damage(180.0), 2.0);
        assert_eq!(impact_damage(300.0), 5.0);
        assert_eq!(impact_damage(380.0), 10.0);
    }

    #[test]
    fn test_spike_reach() {
        let spike = Obstacle { shape: ObstacleShape::Spike, bounds: Rect::centered(Vec2::ZERO, 44.0), radius: 22.0 };
        // 22 + 34 * 0.4 = 35.6
        assert!(touches(Vec2::new(35.0, 0.0), Vec2::ZERO, &spike));
        assert!(!touches(Vec2::new(36.0, 0.0), Vec2::ZERO, &spike));
    }

    #[test]
    fn test_block_contact_uses_hull_box() {
        let block = Obstacle { shape: ObstacleShape::Block, bounds: Rect::new(100.0, 0.0, 50.0, 50.0), radius: 25.0 };
        assert!(touches(Vec2::new(84.0, 25.0), Vec2::ZERO, &block));
        assert!(!touches(Vec2::new(83.0, 25.0), Vec2::ZERO, &block));
    }
}
