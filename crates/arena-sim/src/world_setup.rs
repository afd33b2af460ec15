//! Entity spawn factories for setting up a match.
//!
//! Creates obstacles, hazards, capture points and the ships of every team
//! with their component bundles.

use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use tracing::debug;

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::modifiers::ClassTree;
use arena_core::types::{Position, Rect, ShipId, TeamId, Vec2, Velocity};

use crate::context::SimContext;

/// Distance of a spike hazard from each arena corner.
const CORNER_HAZARD_INSET: f64 = 80.0;
/// Capture points sit this far from the arena center on each axis.
const POINT_OFFSET: f64 = 700.0;
/// Ships start this far inside their zone.
const START_MARGIN: f64 = 60.0;

/// Team spawn zones in team order.
pub fn spawn_zones(arena: Rect) -> [Rect; MAX_TEAMS] {
    let s = SPAWN_ZONE_SIZE;
    let far_x = arena.right() - 300.0 - s;
    let far_y = arena.bottom() - 300.0 - s;
    let mid_x = arena.center().x - s * 0.5;
    [
        Rect::new(300.0, 300.0, s, s),
        Rect::new(far_x, 300.0, s, s),
        Rect::new(300.0, far_y, s, s),
        Rect::new(far_x, far_y, s, s),
        Rect::new(mid_x, 300.0, s, s),
        Rect::new(mid_x, far_y, s, s),
    ]
}

/// Capture point locations: four around the center, six with more than two teams.
pub fn capture_point_positions(arena: Rect, num_teams: usize) -> Vec<Vec2> {
    let c = arena.center();
    let o = POINT_OFFSET;
    let mut offsets = vec![(-o, -o), (o, -o), (-o, o), (o, o)];
    if num_teams > 2 {
        offsets.extend([(0.0, -o), (0.0, o)]);
    }
    offsets.into_iter().map(|(dx, dy)| c + Vec2::new(dx, dy)).collect()
}

/// Populate an empty world for a new match. Returns the human player's id.
pub fn setup_match(world: &mut World, ctx: &mut SimContext) -> Option<ShipId> {
    let arena = ctx.arena();
    spawn_obstacles(world, ctx, arena);
    spawn_hazards(world, ctx, arena);

    for (index, position) in capture_point_positions(arena, ctx.config.num_teams).into_iter().enumerate() {
        spawn_capture_point(world, index, position, ctx.config.capture_radius);
    }

    let zones = spawn_zones(arena);
    let mut player = None;
    for team in 0..ctx.config.num_teams {
        let zone = zones[team];
        for i in 0..ctx.config.team_size {
            let start = zone.inset(START_MARGIN);
            let position = Vec2::new(
                ctx.rng.gen_range(start.left()..=start.right()),
                ctx.rng.gen_range(start.top()..=start.bottom()),
            );
            let kind = if ctx.config.human_player && team == 0 && i == 0 {
                ShipKind::Player
            } else {
                ShipKind::Bot
            };
            let entity = spawn_ship(world, ctx, team as TeamId, kind, position, zone);
            if kind == ShipKind::Player {
                player = world.get::<&Ship>(entity).ok().map(|s| s.id);
            }
        }
    }
    player
}

fn spawn_obstacles(world: &mut World, ctx: &mut SimContext, arena: Rect) {
    let inner = arena.inset(300.0);
    for _ in 0..ctx.config.obstacle_count {
        let shape = if ctx.rng.gen_bool(0.5) { ObstacleShape::Block } else { ObstacleShape::Wedge };
        let w = ctx.rng.gen_range(40.0..=120.0_f64).floor();
        let h = ctx.rng.gen_range(40.0..=120.0_f64).floor();
        let x = ctx.rng.gen_range(inner.left()..=inner.right()).floor();
        let y = ctx.rng.gen_range(inner.top()..=inner.bottom()).floor();
        let bounds = Rect::new(x, y, w, h);
        world.spawn((Position(bounds.center()), Obstacle { shape, bounds, radius: w.min(h) * 0.5 }));
    }
}

fn spawn_hazards(world: &mut World, ctx: &mut SimContext, arena: Rect) {
    let corners = arena.inset(CORNER_HAZARD_INSET);
    let mut centers = vec![
        Vec2::new(corners.left(), corners.top()),
        Vec2::new(corners.right(), corners.top()),
        Vec2::new(corners.left(), corners.bottom()),
        Vec2::new(corners.right(), corners.bottom()),
    ];
    let mid = arena.center();
    for _ in 0..4 {
        centers.push(mid + Vec2::new(ctx.rng.gen_range(-300.0..=300.0), ctx.rng.gen_range(-300.0..=300.0)));
    }
    let radius = ctx.config.hazard_radius;
    for center in centers {
        world.spawn((
            Position(center),
            Obstacle { shape: ObstacleShape::Spike, bounds: Rect::centered(center, radius * 2.0), radius },
        ));
    }
}

pub fn spawn_capture_point(world: &mut World, index: usize, position: Vec2, radius: f64) -> Entity {
    world.spawn((
        Position(position),
        CapturePoint { index, radius, owner: None, progress: [0.0; MAX_TEAMS] },
    ))
}

/// Spawn a ship with default stats and register it with the context.
pub fn spawn_ship(
    world: &mut World,
    ctx: &mut SimContext,
    team: TeamId,
    kind: ShipKind,
    position: Vec2,
    zone: Rect,
) -> Entity {
    let (id, mut builder) = ship_builder(ctx, team, kind, position, zone);
    let entity = world.spawn(builder.build());
    ctx.register_ship(id, entity);
    entity
}

fn ship_builder(ctx: &mut SimContext, team: TeamId, kind: ShipKind, position: Vec2, zone: Rect) -> (ShipId, EntityBuilder) {
    let id = ctx.allocate_ship_id();
    let base_speed = ctx.config.ship_base_speed;

    let mut builder = EntityBuilder::new();
    builder
        .add(Ship { id, team, kind, life: LifeState::Alive })
        .add(Position(position))
        .add(Velocity::default())
        .add(Hull::default())
        .add(Thrusters { base_speed, max_speed: base_speed })
        .add(Loadout::default())
        .add(Upgrades::default())
        .add(Progression::default())
        .add(ClassTree::new())
        .add(StatusEffects::default())
        .add(AbilityCooldowns::default())
        .add(Stats::default())
        .add(SpawnZone(zone));
    match kind {
        ShipKind::Player => {
            builder.add(ControlIntent::default());
        }
        ShipKind::Bot | ShipKind::Reinforcement => {
            builder.add(AiBrain::default());
        }
    }
    (id, builder)
}

/// Spawn a temporary ally that expires after `lifetime` seconds.
pub fn spawn_reinforcement(
    world: &mut World,
    ctx: &mut SimContext,
    summoner: ShipId,
    team: TeamId,
    position: Vec2,
    lifetime: f64,
    zone: Rect,
) -> Entity {
    let arena = ctx.arena();
    let position = Vec2::new(position.x.clamp(0.0, arena.w), position.y.clamp(0.0, arena.h));
    let (id, mut builder) = ship_builder(ctx, team, ShipKind::Reinforcement, position, zone);
    builder.add(Reinforcement { summoner, remaining: lifetime });
    let entity = world.spawn(builder.build());
    ctx.register_ship(id, entity);
    entity
}

pub fn spawn_pickup(world: &mut World, position: Vec2, value: u32) -> Entity {
    world.spawn((Position(position), Pickup { value, life: PICKUP_LIFE }))
}

/// Whether a ship centered at `p` would touch any obstacle.
fn blocked(p: Vec2, obstacles: &[(Vec2, Obstacle)]) -> bool {
    let ship_box = Rect::centered(p, SHIP_SIZE);
    obstacles.iter().any(|(center, ob)| match ob.shape {
        ObstacleShape::Spike => p.distance(*center) < ob.radius + SHIP_SIZE * 0.7,
        ObstacleShape::Block | ObstacleShape::Wedge => ship_box.intersects(&ob.bounds),
    })
}

/// Pick a free point inside `zone`, falling back to an unchecked one after
/// `RESPAWN_ATTEMPTS` tries.
pub fn find_spawn_position<R: Rng>(zone: Rect, obstacles: &[(Vec2, Obstacle)], rng: &mut R) -> Vec2 {
    let area = zone.inset(SPAWN_MARGIN);
    let sample = |rng: &mut R| {
        Vec2::new(rng.gen_range(area.left()..=area.right()), rng.gen_range(area.top()..=area.bottom()))
    };
    for _ in 0..RESPAWN_ATTEMPTS {
        let p = sample(rng);
        if !blocked(p, obstacles) {
            return p;
        }
    }
    debug!(?zone, "no free spawn point found, placing unchecked");
    sample(rng)
}

/// Static obstacles as (center, obstacle) pairs.
pub fn collect_obstacles(world: &World) -> Vec<(Vec2, Obstacle)> {
    world.query::<(&Position, &Obstacle)>().iter().map(|(_, (pos, ob))| (pos.0, *ob)).collect()
}
