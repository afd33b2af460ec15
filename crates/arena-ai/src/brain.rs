//! Per-tick decision loop for AI-controlled ships.
//!
//! Pure functions over plain data. The simulation gathers a `AiContext`
//! for each live bot, calls `evaluate`, and applies the returned
//! `AiDecision`. No ECS dependency.

use rand::Rng;

use arena_core::components::AiBrain;
use arena_core::constants::*;
use arena_core::geometry::normalize;
use arena_core::types::{ShipId, TeamId, Vec2};

/// What the AI can see of another ship.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub id: ShipId,
    pub team: TeamId,
    pub position: Vec2,
    pub alive: bool,
}

/// What the AI can see of a capture point.
#[derive(Debug, Clone, Copy)]
pub struct PointInfo {
    pub index: usize,
    pub position: Vec2,
    pub owner: Option<TeamId>,
}

/// Input to the decision loop for one ship.
pub struct AiContext<'a> {
    pub id: ShipId,
    pub team: TeamId,
    pub position: Vec2,
    pub brain: AiBrain,
    /// Whether the ship is inside the player's viewport this tick.
    pub on_screen: bool,
    pub class_points: u32,
    pub upgrade_points: u32,
    pub ships: &'a [Contact],
    pub points: &'a [PointInfo],
    pub dt: f64,
}

/// Output of the decision loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct AiDecision {
    pub brain: AiBrain,
    /// Requested acceleration (world units / s^2), before class scaling.
    pub accel: Vec2,
    /// Fire the selected weapon at this point.
    pub fire_at: Option<Vec2>,
    /// Spend one class point on a random available node.
    pub spend_class_point: bool,
    /// Switch to a random unlocked weapon.
    pub switch_weapon: bool,
    /// Grant one upgrade point and spend it on a random upgrade.
    pub take_upgrade: bool,
}

/// Nearest capture point not owned by `team`.
pub fn select_goal(position: Vec2, team: TeamId, points: &[PointInfo]) -> Option<usize> {
    points
        .iter()
        .filter(|p| p.owner != Some(team))
        .min_by(|a, b| {
            let da = a.position.distance_squared(position);
            let db = b.position.distance_squared(position);
            da.total_cmp(&db)
        })
        .map(|p| p.index)
}

/// Nearest live ship of another team, optionally within `max_range`.
///
/// Also used by homing missiles to re-acquire targets.
pub fn nearest_enemy(position: Vec2, team: TeamId, ships: &[Contact], max_range: Option<f64>) -> Option<&Contact> {
    ships
        .iter()
        .filter(|c| c.alive && c.team != team)
        .filter(|c| max_range.map_or(true, |r| c.position.distance_squared(position) < r * r))
        .min_by(|a, b| {
            let da = a.position.distance_squared(position);
            let db = b.position.distance_squared(position);
            da.total_cmp(&db)
        })
}

/// Evaluate one tick of AI for a live ship.
pub fn evaluate<R: Rng>(ctx: &AiContext, rng: &mut R) -> AiDecision {
    let mut brain = ctx.brain;

    // Aggro latches on first sighting. It only drives feedback.
    if ctx.on_screen && !brain.aggro {
        brain.aggro = true;
        brain.aggro_timer = rng.gen_range(AI_AGGRO_GRACE.0..AI_AGGRO_GRACE.1);
    } else {
        brain.aggro_timer = (brain.aggro_timer - ctx.dt).max(0.0);
    }

    let mut accel = Vec2::ZERO;

    brain.goal = select_goal(ctx.position, ctx.team, ctx.points);
    if let Some(goal) = brain.goal.and_then(|i| ctx.points.iter().find(|p| p.index == i)) {
        accel += normalize(goal.position - ctx.position) * AI_GOAL_ACCEL;
    }

    if let Some(nearest) = nearest_enemy(ctx.position, ctx.team, ctx.ships, Some(AI_DETECTION_RADIUS)) {
        brain.target = Some(nearest.id);
    }

    let target = brain
        .target
        .and_then(|id| ctx.ships.iter().find(|c| c.id == id))
        .filter(|c| c.alive);
    if target.is_none() {
        brain.target = None;
    }

    let mut fire_at = None;
    if let Some(t) = target {
        accel += normalize(t.position - ctx.position) * AI_TARGET_ACCEL;
        if rng.gen_bool(AI_FIRE_CHANCE) {
            fire_at = Some(t.position);
        }
    }

    let spend_class_point = ctx.class_points > 0 && rng.gen_bool(AI_CLASS_SPEND_CHANCE);
    let switch_weapon = rng.gen_bool(AI_WEAPON_SWITCH_CHANCE);
    let take_upgrade = rng.gen_bool(AI_UPGRADE_CHANCE) && ctx.upgrade_points < AI_UPGRADE_POINT_CAP;

    AiDecision {
        brain,
        accel,
        fire_at,
        spend_class_point,
        switch_weapon,
        take_upgrade,
    }
}
