//! Capture-point contention.
//!
//! Each tick a point sees the set of teams with a live ship inside its
//! radius. A sole occupant gains progress while every other team decays;
//! an empty or contested point only decays. Reaching the capture time
//! hands the point to that team and resets all progress.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use tracing::info;

use arena_core::components::{CapturePoint, Ship, Stats};
use arena_core::constants::*;
use arena_core::events::AudioEvent;
use arena_core::types::{Position, TeamId, Vec2};

use crate::context::SimContext;

/// Slack on the capture threshold so accumulated frame deltas that land a
/// hair short of it still count.
const CAPTURE_EPSILON: f64 = 1e-9;

fn decay_all(progress: &mut [f64; MAX_TEAMS], amount: f64) {
    for p in progress.iter_mut() {
        *p = (*p - amount).max(0.0);
    }
}

/// Advance one point by `dt`. Returns the team that completed a capture
/// this tick, if any.
pub fn advance(point: &mut CapturePoint, inside: &BTreeSet<TeamId>, dt: f64, capture_time: f64) -> Option<TeamId> {
    match inside.len() {
        0 => decay_all(&mut point.progress, CAPTURE_DECAY_EMPTY * dt),
        1 => {
            let team = *inside.iter().next()?;
            let idx = team as usize;
            if idx >= MAX_TEAMS {
                return None;
            }
            point.progress[idx] += dt;
            for (t, p) in point.progress.iter_mut().enumerate() {
                if t != idx {
                    *p = (*p - CAPTURE_DECAY_OTHERS * dt).max(0.0);
                }
            }
            if point.progress[idx] >= capture_time - CAPTURE_EPSILON {
                point.owner = Some(team);
                point.progress = [0.0; MAX_TEAMS];
                return Some(team);
            }
        }
        _ => decay_all(&mut point.progress, CAPTURE_DECAY_CONTESTED * dt),
    }
    None
}

pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let ships: Vec<(Entity, TeamId, Vec2)> = world
        .query::<(&Ship, &Position)>()
        .iter()
        .filter(|(_, (ship, _))| ship.life.is_alive())
        .map(|(entity, (ship, pos))| (entity, ship.team, pos.0))
        .collect();
    let capture_time = ctx.config.capture_time;

    let mut captured: Vec<(usize, TeamId, Vec2, f64)> = Vec::new();
    for (_, (point, pos)) in world.query_mut::<(&mut CapturePoint, &Position)>() {
        let r_sq = point.radius * point.radius;
        let inside: BTreeSet<TeamId> = ships
            .iter()
            .filter(|(_, _, p)| p.distance_squared(pos.0) <= r_sq)
            .map(|(_, team, _)| *team)
            .collect();
        let previous = point.owner;
        if let Some(team) = advance(point, &inside, dt, capture_time) {
            // Holding a point you already own just resets its progress.
            if previous != Some(team) {
                captured.push((point.index, team, pos.0, point.radius));
            }
        }
    }

    for (index, team, center, radius) in captured {
        let r_sq = radius * radius;
        for (entity, _, _) in ships.iter().filter(|(_, t, p)| *t == team && p.distance_squared(center) <= r_sq) {
            if let Ok(mut stats) = world.get::<&mut Stats>(*entity) {
                stats.score += CAPTURE_SCORE;
                stats.captures += 1;
            }
        }
        info!(point = index, team, "point captured");
        ctx.events.push(AudioEvent::PointCaptured { point: index, team });
    }
}
