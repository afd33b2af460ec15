//! Respawn dead ships and purge expired reinforcements.

use hecs::World;
use tracing::debug;

use arena_core::components::*;
use arena_core::constants::INVULN_TIME;
use arena_core::enums::LifeState;
use arena_core::types::{Position, ShipId, Vec2, Velocity};

use crate::context::SimContext;
use crate::world_setup::{collect_obstacles, find_spawn_position};

pub fn run(world: &mut World, ctx: &mut SimContext) {
    let obstacles = collect_obstacles(world);

    for (entity, (ship, hull, pos, vel, zone, status)) in world.query_mut::<(
        &mut Ship,
        &mut Hull,
        &mut Position,
        &mut Velocity,
        &SpawnZone,
        &mut StatusEffects,
    )>() {
        match ship.life {
            LifeState::Alive => {}
            LifeState::PendingRemoval => {
                ctx.despawn_buffer.push(entity);
            }
            LifeState::PendingRespawn => {
                ship.life = LifeState::Alive;
                hull.hp = hull.max_hp;
                hull.shield = hull.max_shield;
                hull.invuln_secs = INVULN_TIME;
                pos.0 = find_spawn_position(zone.0, &obstacles, &mut ctx.rng);
                vel.0 = Vec2::ZERO;
                *status = StatusEffects::default();
                debug!(ship = ship.id.0, x = pos.0.x, y = pos.0.y, "respawned");
            }
        }
    }

    let removed: Vec<ShipId> = ctx
        .despawn_buffer
        .iter()
        .filter_map(|&e| world.get::<&Ship>(e).ok().map(|s| s.id))
        .collect();
    for id in removed {
        debug!(ship = id.0, "reinforcement removed");
        ctx.unregister_ship(id);
    }
    ctx.flush_despawns(world);
}
