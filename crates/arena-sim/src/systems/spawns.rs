//! Materialize queued spawns into entities.

use hecs::World;

use arena_core::components::ChainArc;
use arena_core::constants::ARC_DURATION;
use arena_core::types::{Position, Velocity};

use crate::combat::{self, Damage};
use crate::context::{SimContext, Spawn};
use crate::world_setup::{spawn_pickup, spawn_reinforcement};

/// Drain `ctx.spawns` until empty. Spawning can queue more spawns (an arc
/// kill drops pickups), so the queue is re-checked after each batch.
pub fn flush(world: &mut World, ctx: &mut SimContext) {
    while !ctx.spawns.is_empty() {
        let batch = std::mem::take(&mut ctx.spawns);
        for spawn in batch {
            materialize(world, ctx, spawn);
        }
    }
}

fn materialize(world: &mut World, ctx: &mut SimContext, spawn: Spawn) {
    match spawn {
        Spawn::Projectile { owner, position, velocity, projectile, homing } => {
            let entity = world.spawn((owner, Position(position), Velocity(velocity), projectile));
            if let Some(homing) = homing {
                let _ = world.insert_one(entity, homing);
            }
        }
        Spawn::Beam { owner, beam } => {
            world.spawn((owner, beam));
        }
        Spawn::Arc { owner, path, hits, damage } => {
            for id in hits {
                if let Some(entity) = ctx.ship_entity(id) {
                    combat::damage_ship(world, ctx, entity, Damage::new(damage).from(Some(owner.ship)));
                }
            }
            world.spawn((owner, ChainArc { points: path, remaining: ARC_DURATION }));
        }
        Spawn::Pulse { owner, position, pulse } => {
            world.spawn((owner, Position(position), pulse));
        }
        Spawn::Trail { owner, position, segment } => {
            world.spawn((owner, Position(position), segment));
        }
        Spawn::Pickup { position, value } => {
            spawn_pickup(world, position, value);
        }
        Spawn::Reinforcement { summoner, team, position, lifetime, zone } => {
            spawn_reinforcement(world, ctx, summoner, team, position, lifetime, zone);
        }
    }
}
