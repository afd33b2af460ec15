//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` and the explicit
//! `SimContext`. They hold no state of their own.

pub mod capture;
pub mod collision;
pub mod control;
pub mod hazards;
pub mod lifecycle;
pub mod projectiles;
pub mod ships;
pub mod snapshot;
pub mod spawns;
pub mod victory;

use hecs::World;

use arena_ai::brain::{Contact, PointInfo};
use arena_core::components::{CapturePoint, Ship};
use arena_core::types::Position;

/// Every ship as seen by targeting code, in world iteration order.
pub fn contacts(world: &World) -> Vec<Contact> {
    world
        .query::<(&Ship, &Position)>()
        .iter()
        .map(|(_, (ship, pos))| Contact {
            id: ship.id,
            team: ship.team,
            position: pos.0,
            alive: ship.life.is_alive(),
        })
        .collect()
}

/// Every capture point, sorted by index.
pub fn point_infos(world: &World) -> Vec<PointInfo> {
    let mut points: Vec<PointInfo> = world
        .query::<(&CapturePoint, &Position)>()
        .iter()
        .map(|(_, (cp, pos))| PointInfo { index: cp.index, position: pos.0, owner: cp.owner })
        .collect();
    points.sort_by_key(|p| p.index);
    points
}
