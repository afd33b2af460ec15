//! Build the per-tick `GameStateSnapshot` for rendering, HUD and audio.

use hecs::World;

use arena_core::class_tree::available_nodes;
use arena_core::components::*;
use arena_core::enums::{AbilityKind, GamePhase, StatusKind, WeaponKind};
use arena_core::events::AudioEvent;
use arena_core::modifiers::ClassTree;
use arena_core::state::*;
use arena_core::types::{Position, ShipId, SimTime, TeamId, Velocity};

use crate::abilities;
use crate::context::SimContext;
use crate::progression::spheres_needed;
use crate::status;
use crate::weapons;

/// Match-level values the engine owns.
pub struct SnapshotHeader {
    pub time: SimTime,
    pub phase: GamePhase,
    pub winner: Option<TeamId>,
    pub player: Option<ShipId>,
}

fn fraction(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn build_snapshot(
    world: &mut World,
    ctx: &SimContext,
    header: SnapshotHeader,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    let capture_time = ctx.config.capture_time;
    let num_teams = ctx.config.num_teams;

    let mut ships: Vec<ShipView> = world
        .query::<(&Ship, &Position, &Velocity, &Hull, &Progression, &Loadout, &StatusEffects)>()
        .iter()
        .map(|(_, (ship, pos, vel, hull, prog, loadout, effects))| ShipView {
            id: ship.id,
            team: ship.team,
            kind: ship.kind,
            position: pos.0,
            velocity: vel.0,
            alive: ship.life.is_alive(),
            invulnerable: hull.invuln_secs > 0.0,
            health_frac: fraction(hull.hp, hull.max_hp),
            shield_frac: fraction(hull.shield, hull.max_shield),
            level: prog.level,
            weapon: loadout.selected,
            status: StatusFlags {
                acid: status::has(effects, StatusKind::Acid),
                burn: status::has(effects, StatusKind::Burn),
                void: status::has(effects, StatusKind::Void),
                slowed: effects.slow_secs > 0.0,
                stunned: effects.stun_secs > 0.0,
            },
        })
        .collect();
    ships.sort_by_key(|s| s.id);

    let projectiles = world
        .query::<(&Owner, &Position, &Velocity, &Projectile)>()
        .iter()
        .map(|(_, (owner, pos, vel, p))| ProjectileView {
            kind: p.kind,
            position: pos.0,
            velocity: vel.0,
            radius: p.radius,
            team: owner.team,
        })
        .collect();
    let beams = world
        .query::<(&Owner, &Beam)>()
        .iter()
        .map(|(_, (owner, b))| BeamView { start: b.start, end: b.end, width: b.width, team: owner.team })
        .collect();
    let arcs = world
        .query::<(&Owner, &ChainArc)>()
        .iter()
        .map(|(_, (owner, a))| ArcView { points: a.points.clone(), team: owner.team })
        .collect();
    let pulses = world
        .query::<(&Owner, &Position, &GravityPulse)>()
        .iter()
        .map(|(_, (owner, pos, g))| PulseView { position: pos.0, radius: g.radius, team: owner.team })
        .collect();
    let trails = world
        .query::<(&Owner, &Position, &TrailSegment)>()
        .iter()
        .map(|(_, (owner, pos, t))| TrailView { position: pos.0, radius: t.radius, team: owner.team })
        .collect();

    let mut points: Vec<CapturePointView> = world
        .query::<(&Position, &CapturePoint)>()
        .iter()
        .map(|(_, (pos, cp))| CapturePointView {
            index: cp.index,
            position: pos.0,
            radius: cp.radius,
            owner: cp.owner,
            progress: cp.progress.iter().take(num_teams).map(|p| fraction(*p, capture_time)).collect(),
        })
        .collect();
    points.sort_by_key(|p| p.index);

    let pickups = world.query::<(&Position, &Pickup)>().iter().map(|(_, (pos, _))| pos.0).collect();
    let obstacles = world
        .query::<&Obstacle>()
        .iter()
        .map(|(_, o)| ObstacleView { shape: o.shape, bounds: o.bounds })
        .collect();

    let mut teams: Vec<TeamView> =
        (0..num_teams).map(|t| TeamView { team: t as TeamId, ..TeamView::default() }).collect();
    for (_, (ship, stats)) in world.query::<(&Ship, &Stats)>().iter() {
        if let Some(view) = teams.get_mut(ship.team as usize) {
            view.score += stats.score;
            if ship.life.is_alive() {
                view.ships_alive += 1;
            }
        }
    }
    for point in &points {
        if let Some(view) = point.owner.and_then(|o| teams.get_mut(o as usize)) {
            view.points_owned += 1;
        }
    }

    let player = header.player.and_then(|id| player_view(world, ctx, id));

    GameStateSnapshot {
        time: header.time,
        phase: header.phase,
        arena: ctx.arena(),
        ships,
        projectiles,
        beams,
        arcs,
        pulses,
        trails,
        points,
        pickups,
        obstacles,
        teams,
        player,
        winner: header.winner,
        audio_events,
    }
}

fn player_view(world: &mut World, ctx: &SimContext, id: ShipId) -> Option<PlayerView> {
    let entity = ctx.ship_entity(id)?;
    let (prog, stats, loadout, upgrades, cds, tree) = world
        .query_one_mut::<(&Progression, &Stats, &Loadout, &Upgrades, &AbilityCooldowns, &mut ClassTree)>(entity)
        .ok()?;

    let mods = tree.resolved();
    let selected = loadout.selected;
    let slot = loadout.slots[selected.index()];
    let weapon_full = weapons::cooldown(selected, slot.level, upgrades, &mods);

    Some(PlayerView {
        id,
        level: prog.level,
        spheres: prog.spheres,
        spheres_needed: spheres_needed(prog.level),
        upgrade_points: prog.upgrade_points,
        class_points: prog.class_points,
        score: stats.score,
        kills: stats.kills,
        deaths: stats.deaths,
        unlocked_weapons: WeaponKind::ALL.into_iter().filter(|w| loadout.slots[w.index()].unlocked).collect(),
        class_nodes: tree.nodes().iter().copied().collect(),
        available_nodes: available_nodes(prog.level, tree.nodes()),
        cooldowns: CooldownView {
            weapon: fraction(slot.cooldown, weapon_full),
            reinforce: fraction(cds.reinforce, abilities::cooldown(AbilityKind::Reinforce, upgrades)),
            quantum: fraction(cds.quantum, abilities::cooldown(AbilityKind::Quantum, upgrades)),
            teleport: fraction(cds.teleport, abilities::cooldown(AbilityKind::Teleport, upgrades)),
            ultimate: fraction(cds.ultimate, abilities::cooldown(AbilityKind::Ultimate, upgrades)),
        },
    })
}
