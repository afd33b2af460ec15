//! Tests for the simulation engine, damage pipeline, capture contention and
//! the systems working together.

use hecs::{Entity, World};

use arena_core::commands::PlayerCommand;
use arena_core::components::*;
use arena_core::config::MatchConfig;
use arena_core::constants::*;
use arena_core::enums::*;
use arena_core::events::AudioEvent;
use arena_core::modifiers::ClassTree;
use arena_core::types::{Position, Rect, ShipId, TeamId, Vec2, Velocity};

use crate::combat::{self, Damage, DamageOutcome};
use crate::context::SimContext;
use crate::engine::SimulationEngine;
use crate::systems;
use crate::world_setup;

fn small_config(seed: u64) -> MatchConfig {
    MatchConfig {
        arena_width: 2000.0,
        arena_height: 2000.0,
        num_teams: 2,
        team_size: 2,
        obstacle_count: 10,
        seed,
        ..MatchConfig::default()
    }
}

/// Engine with a running match and no obstacles or hazards.
fn running_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(small_config(seed));
    engine.queue_command(PlayerCommand::StartMatch);
    engine.tick(0.0);
    let obstacles: Vec<Entity> = engine.world().query::<&Obstacle>().iter().map(|(e, _)| e).collect();
    for e in obstacles {
        engine.world_mut().despawn(e).unwrap();
    }
    engine
}

fn bare_world(config: MatchConfig) -> (World, SimContext) {
    (World::new(), SimContext::new(config))
}

/// A bot with its spawn protection removed.
fn ship_at(world: &mut World, ctx: &mut SimContext, team: TeamId, position: Vec2) -> Entity {
    let zone = Rect::new(300.0, 300.0, 600.0, 600.0);
    let e = world_setup::spawn_ship(world, ctx, team, ShipKind::Bot, position, zone);
    world.get::<&mut Hull>(e).unwrap().invuln_secs = 0.0;
    e
}

fn ship_id(world: &World, e: Entity) -> ShipId {
    world.get::<&Ship>(e).unwrap().id
}

fn ship_count(engine: &SimulationEngine) -> usize {
    engine.world().query::<&Ship>().iter().count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(small_config(12345));
    let mut engine_b = SimulationEngine::new(small_config(12345));
    engine_a.queue_command(PlayerCommand::StartMatch);
    engine_b.queue_command(PlayerCommand::StartMatch);

    for _ in 0..300 {
        let snap_a = engine_a.tick(DT);
        let snap_b = engine_b.tick(DT);
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(small_config(111));
    let mut engine_b = SimulationEngine::new(small_config(222));
    engine_a.queue_command(PlayerCommand::StartMatch);
    engine_b.queue_command(PlayerCommand::StartMatch);

    let snap_a = engine_a.tick(DT);
    let snap_b = engine_b.tick(DT);
    assert_ne!(serde_json::to_string(&snap_a).unwrap(), serde_json::to_string(&snap_b).unwrap());
}

// ---- Phases and commands ----

#[test]
fn test_menu_does_not_advance() {
    let mut engine = SimulationEngine::new(small_config(1));
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Menu);
    assert_eq!(snap.time.tick, 0);
    assert!(snap.ships.is_empty());
}

#[test]
fn test_start_match_spawns_ships_and_points() {
    let mut engine = SimulationEngine::new(small_config(1));
    engine.queue_command(PlayerCommand::StartMatch);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.ships.len(), 4);
    assert_eq!(snap.points.len(), 4);
    assert_eq!(snap.teams.len(), 2);
    let player = snap.player.expect("player view");
    assert_eq!(player.level, 1);
    assert_eq!(player.unlocked_weapons, vec![WeaponKind::Blaster]);
}

#[test]
fn test_pause_and_resume() {
    let mut engine = running_engine(5);
    for _ in 0..10 {
        engine.tick(DT);
    }
    let before = engine.time();

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick(DT);
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time(), before);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, before.tick + 1);
}

#[test]
fn test_frame_delta_is_capped() {
    let mut engine = running_engine(5);
    let before = engine.time().elapsed_secs;
    engine.tick(1.0);
    assert!((engine.time().elapsed_secs - before - MAX_FRAME_DT).abs() < 1e-12);
    engine.tick(-3.0);
    assert!((engine.time().elapsed_secs - before - MAX_FRAME_DT).abs() < 1e-12);
}

#[test]
fn test_locked_weapon_selection_rejected() {
    let mut engine = running_engine(2);
    engine.queue_command(PlayerCommand::SelectWeapon { weapon: WeaponKind::Laser });
    let snap = engine.tick(DT);
    let player = engine.player().unwrap();
    let view = snap.ships.iter().find(|s| s.id == player).unwrap();
    assert_eq!(view.weapon, WeaponKind::Blaster);
}

#[test]
fn test_class_node_acquisition_is_idempotent() {
    let mut engine = running_engine(3);
    let entity = engine.ship_entity(engine.player().unwrap()).unwrap();
    {
        let mut prog = engine.world_mut().get::<&mut Progression>(entity).unwrap();
        prog.level = 8;
        prog.class_points = 2;
    }
    let node = arena_core::class_tree::ClassNodeId::Twin;
    engine.queue_command(PlayerCommand::AcquireClassNode { node });
    engine.queue_command(PlayerCommand::AcquireClassNode { node });
    let snap = engine.tick(DT);

    let player = snap.player.unwrap();
    assert_eq!(player.class_nodes, vec![node]);
    assert_eq!(player.class_points, 1);
    let acquired = snap
        .audio_events
        .iter()
        .filter(|e| matches!(e, AudioEvent::ClassAcquired { .. }))
        .count();
    assert!(acquired >= 1);
}

#[test]
fn test_teleport_respects_edge_margin() {
    let mut engine = running_engine(4);
    let id = engine.player().unwrap();
    engine.queue_command(PlayerCommand::Teleport { x: 10.0, y: 1000.0 });
    engine.tick(DT);
    let entity = engine.ship_entity(id).unwrap();
    assert_eq!(engine.world().get::<&AbilityCooldowns>(entity).unwrap().teleport, 0.0);

    engine.queue_command(PlayerCommand::Teleport { x: 1000.0, y: 1000.0 });
    let snap = engine.tick(DT);
    assert!(snap.audio_events.iter().any(|e| matches!(e, AudioEvent::Teleported { .. })));
    assert!(engine.world().get::<&AbilityCooldowns>(entity).unwrap().teleport > 0.0);
}

// ---- Ship invariants ----

#[test]
fn test_health_and_shield_stay_within_maxima() {
    let mut engine = running_engine(77);
    for _ in 0..600 {
        engine.tick(DT);
        for (_, hull) in engine.world().query::<&Hull>().iter() {
            assert!(hull.hp <= hull.max_hp + 1e-9);
            assert!(hull.shield >= 0.0 && hull.shield <= hull.max_shield + 1e-9);
        }
    }
}

#[test]
fn test_invulnerable_ship_takes_no_damage() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let e = ship_at(&mut world, &mut ctx, 0, Vec2::new(500.0, 500.0));
    world.get::<&mut Hull>(e).unwrap().invuln_secs = 1.0;
    let before = *world.get::<&Hull>(e).unwrap();

    let outcome = combat::damage_ship(&mut world, &mut ctx, e, Damage::new(50.0));
    assert_eq!(outcome, DamageOutcome::Ignored);
    let after = *world.get::<&Hull>(e).unwrap();
    assert_eq!(after.hp, before.hp);
    assert_eq!(after.shield, before.shield);
    assert!(ctx.events.is_empty());
}

#[test]
fn test_shield_then_health_split() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let e = ship_at(&mut world, &mut ctx, 0, Vec2::new(500.0, 500.0));
    {
        let mut hull = world.get::<&mut Hull>(e).unwrap();
        hull.shield = 10.0;
        hull.hp = 50.0;
    }
    combat::damage_ship(&mut world, &mut ctx, e, Damage::new(15.0));
    let hull = *world.get::<&Hull>(e).unwrap();
    assert!(hull.shield.abs() < 1e-12);
    assert!((hull.hp - 45.0).abs() < 1e-12);
}

#[test]
fn test_kill_credits_attacker_and_respawns() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let attacker = ship_at(&mut world, &mut ctx, 0, Vec2::new(400.0, 400.0));
    let victim = ship_at(&mut world, &mut ctx, 1, Vec2::new(600.0, 600.0));
    {
        let mut hull = world.get::<&mut Hull>(victim).unwrap();
        hull.shield = 0.0;
        hull.hp = 5.0;
    }
    let attacker_id = ship_id(&world, attacker);
    combat::damage_ship(&mut world, &mut ctx, victim, Damage::new(10.0).from(Some(attacker_id)));

    let stats = *world.get::<&Stats>(attacker).unwrap();
    assert_eq!(stats.kills, 1);
    assert_eq!(stats.score, KILL_SCORE);
    assert_eq!(world.get::<&Stats>(victim).unwrap().deaths, 1);
    assert_eq!(world.get::<&Ship>(victim).unwrap().life, LifeState::PendingRespawn);
    assert!(ctx.events.iter().any(|e| matches!(e, AudioEvent::ShipDestroyed { killer: Some(k), .. } if *k == attacker_id)));

    // Dropped sphere lands as a pickup.
    systems::spawns::flush(&mut world, &mut ctx);
    assert_eq!(world.query::<&Pickup>().iter().count(), 1);

    systems::lifecycle::run(&mut world, &mut ctx);
    let hull = *world.get::<&Hull>(victim).unwrap();
    assert_eq!(world.get::<&Ship>(victim).unwrap().life, LifeState::Alive);
    assert_eq!(hull.hp, hull.max_hp);
    assert_eq!(hull.invuln_secs, INVULN_TIME);
}

#[test]
fn test_self_kill_credits_nobody() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let e = ship_at(&mut world, &mut ctx, 0, Vec2::new(400.0, 400.0));
    let id = ship_id(&world, e);
    combat::damage_ship(&mut world, &mut ctx, e, Damage::new(1000.0).from(Some(id)));
    let stats = *world.get::<&Stats>(e).unwrap();
    assert_eq!(stats.kills, 0);
    assert_eq!(stats.score, 0);
    assert_eq!(stats.deaths, 1);
}

#[test]
fn test_spike_kills_through_invulnerability() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let e = ship_at(&mut world, &mut ctx, 0, Vec2::new(500.0, 500.0));
    world.get::<&mut Hull>(e).unwrap().invuln_secs = 3.0;
    let center = Vec2::new(510.0, 500.0);
    world.spawn((
        Position(center),
        Obstacle { shape: ObstacleShape::Spike, bounds: Rect::centered(center, 44.0), radius: 22.0 },
    ));
    systems::hazards::run(&mut world, &mut ctx);
    assert_eq!(world.get::<&Ship>(e).unwrap().life, LifeState::PendingRespawn);
}

#[test]
fn test_pickup_collected_once() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let a = ship_at(&mut world, &mut ctx, 0, Vec2::new(500.0, 500.0));
    let b = ship_at(&mut world, &mut ctx, 1, Vec2::new(505.0, 500.0));
    world_setup::spawn_pickup(&mut world, Vec2::new(502.0, 500.0), 3);
    systems::hazards::run(&mut world, &mut ctx);

    let total = world.get::<&Progression>(a).unwrap().spheres + world.get::<&Progression>(b).unwrap().spheres;
    assert!((total - 3.0).abs() < 1e-12);
    assert_eq!(world.query::<&Pickup>().iter().count(), 0);
}

// ---- Capture ----

#[test]
fn test_uncontested_capture_end_to_end() {
    let config = MatchConfig { capture_time: 8.0, ..small_config(1) };
    let (mut world, mut ctx) = bare_world(config);
    let center = Vec2::new(1000.0, 1000.0);
    let point = world_setup::spawn_capture_point(&mut world, 0, center, 150.0);
    let holder = ship_at(&mut world, &mut ctx, 0, center);
    ship_at(&mut world, &mut ctx, 1, Vec2::new(200.0, 200.0));

    let mut captured_at = None;
    for tick in 0..600 {
        systems::capture::run(&mut world, &mut ctx, DT);
        let cp = *world.get::<&CapturePoint>(point).unwrap();
        assert_eq!(cp.progress[1], 0.0, "team B progress rose");
        if cp.owner == Some(0) {
            captured_at = Some(tick + 1);
            break;
        }
    }
    assert_eq!(captured_at, Some(480));
    let cp = *world.get::<&CapturePoint>(point).unwrap();
    assert!(cp.progress.iter().all(|&p| p == 0.0));
    assert!(ctx.events.iter().any(|e| matches!(e, AudioEvent::PointCaptured { point: 0, team: 0 })));
    let stats = *world.get::<&Stats>(holder).unwrap();
    assert_eq!(stats.captures, 1);
    assert_eq!(stats.score, CAPTURE_SCORE);
}

#[test]
fn test_contested_point_never_changes_owner() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let center = Vec2::new(1000.0, 1000.0);
    let point = world_setup::spawn_capture_point(&mut world, 0, center, 150.0);
    ship_at(&mut world, &mut ctx, 0, center);
    ship_at(&mut world, &mut ctx, 1, center + Vec2::new(50.0, 0.0));

    let mut last = [0.0; MAX_TEAMS];
    for _ in 0..1200 {
        systems::capture::run(&mut world, &mut ctx, DT);
        let cp = *world.get::<&CapturePoint>(point).unwrap();
        assert_eq!(cp.owner, None);
        for (now, before) in cp.progress.iter().zip(last.iter()) {
            assert!(now <= before);
        }
        last = cp.progress;
    }
}

#[test]
fn test_dead_ships_do_not_hold_points() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let center = Vec2::new(1000.0, 1000.0);
    let point = world_setup::spawn_capture_point(&mut world, 0, center, 150.0);
    let e = ship_at(&mut world, &mut ctx, 0, center);
    world.get::<&mut Ship>(e).unwrap().life = LifeState::PendingRespawn;
    systems::capture::run(&mut world, &mut ctx, 1.0);
    assert_eq!(world.get::<&CapturePoint>(point).unwrap().progress[0], 0.0);
}

// ---- Victory ----

#[test]
fn test_holding_every_point_wins() {
    let mut engine = running_engine(9);
    for (_, cp) in engine.world_mut().query_mut::<&mut CapturePoint>() {
        cp.owner = Some(1);
    }
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Victory);
    assert_eq!(snap.winner, Some(1));
    assert!(snap.audio_events.iter().any(|e| matches!(e, AudioEvent::Victory { team: 1 })));

    let frozen = engine.time();
    engine.tick(DT);
    assert_eq!(engine.time(), frozen);

    engine.queue_command(PlayerCommand::StartMatch);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.winner, None);
}

#[test]
fn test_partial_ownership_does_not_win() {
    let mut engine = running_engine(9);
    let mut first = true;
    for (_, cp) in engine.world_mut().query_mut::<&mut CapturePoint>() {
        cp.owner = if first { None } else { Some(0) };
        first = false;
    }
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, GamePhase::Active);
}

// ---- Weapons and effects in the world ----

#[test]
fn test_player_fire_spawns_projectile_once_per_cooldown() {
    let mut engine = running_engine(6);
    let id = engine.player().unwrap();
    let entity = engine.ship_entity(id).unwrap();
    let pos = engine.world().get::<&Position>(entity).unwrap().0;
    engine.queue_command(PlayerCommand::SetControl { thrust: Vec2::ZERO, fire: true, aim: pos + Vec2::new(100.0, 0.0) });
    let snap = engine.tick(DT);

    let fired = snap
        .audio_events
        .iter()
        .filter(|e| matches!(e, AudioEvent::WeaponFired { ship, .. } if *ship == id))
        .count();
    assert_eq!(fired, 1);
    let own = snap.projectiles.iter().filter(|p| p.team == 0).count();
    assert!(own >= 1);

    // Blaster cooldown is a quarter second; the next frame must not fire.
    let snap = engine.tick(DT);
    assert!(!snap.audio_events.iter().any(|e| matches!(e, AudioEvent::WeaponFired { ship, .. } if *ship == id)));
}

#[test]
fn test_projectile_hit_applies_debuff_and_despawns() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let shooter = ship_at(&mut world, &mut ctx, 0, Vec2::new(200.0, 200.0));
    let target = ship_at(&mut world, &mut ctx, 1, Vec2::new(600.0, 600.0));
    let shooter_id = ship_id(&world, shooter);
    let (secs, dps) = ACID_DOT;
    world.spawn((
        Owner { ship: shooter_id, team: 0 },
        Position(Vec2::new(600.0, 600.0)),
        Velocity(Vec2::ZERO),
        Projectile {
            kind: ProjectileKind::AcidBullet,
            damage: 8.0,
            radius: BULLET_RADIUS,
            life: 1.0,
            damage_type: DamageType::Acid,
            critical: false,
            on_hit: Some(OnHit { kind: StatusKind::Acid, secs, dps, slow_secs: 0.0 }),
        },
    ));
    systems::collision::run(&mut world, &mut ctx, DT);

    assert_eq!(world.query::<&Projectile>().iter().count(), 0);
    let effects = world.get::<&StatusEffects>(target).unwrap();
    assert_eq!(effects.entries.len(), 1);
    assert_eq!(effects.entries[0].kind, StatusKind::Acid);
    assert!((world.get::<&Hull>(target).unwrap().shield - (SHIP_BASE_SHIELD - 8.0)).abs() < 1e-12);
}

#[test]
fn test_friendly_projectile_passes_through() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let ally = ship_at(&mut world, &mut ctx, 0, Vec2::new(600.0, 600.0));
    let owner = ship_id(&world, ally);
    world.spawn((
        Owner { ship: owner, team: 0 },
        Position(Vec2::new(600.0, 600.0)),
        Velocity(Vec2::ZERO),
        Projectile {
            kind: ProjectileKind::Bullet,
            damage: 12.0,
            radius: BULLET_RADIUS,
            life: 1.0,
            damage_type: DamageType::Normal,
            critical: false,
            on_hit: None,
        },
    ));
    systems::collision::run(&mut world, &mut ctx, DT);
    assert_eq!(world.query::<&Projectile>().iter().count(), 1);
    assert_eq!(world.get::<&Hull>(ally).unwrap().shield, SHIP_BASE_SHIELD);
}

#[test]
fn test_gravity_pulls_enemies_inward() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    let owner = ship_at(&mut world, &mut ctx, 0, Vec2::new(100.0, 100.0));
    let enemy = ship_at(&mut world, &mut ctx, 1, Vec2::new(500.0, 500.0));
    let owner_id = ship_id(&world, owner);
    world.spawn((
        Owner { ship: owner_id, team: 0 },
        Position(Vec2::new(600.0, 500.0)),
        GravityPulse { radius: GRAVITY_RADIUS, strength: GRAVITY_STRENGTH, dps: GRAVITY_DPS, remaining: GRAVITY_DURATION },
    ));
    systems::projectiles::run(&mut world, &mut ctx, 0.1);

    let vel = world.get::<&Velocity>(enemy).unwrap().0;
    assert!(vel.x > 0.0);
    assert!(vel.y.abs() < 1e-9);
    assert!(world.get::<&Hull>(enemy).unwrap().shield < SHIP_BASE_SHIELD);
    assert_eq!(world.get::<&Velocity>(owner).unwrap().0, Vec2::ZERO);
}

#[test]
fn test_effects_expire() {
    let (mut world, mut ctx) = bare_world(small_config(1));
    world.spawn((
        Owner { ship: ShipId(0), team: 0 },
        Beam { start: Vec2::ZERO, end: Vec2::new(100.0, 0.0), damage: 10.0, width: 8.0, remaining: LASER_DURATION },
    ));
    world_setup::spawn_pickup(&mut world, Vec2::new(50.0, 50.0), 1);
    systems::projectiles::run(&mut world, &mut ctx, 0.3);
    assert_eq!(world.query::<&Beam>().iter().count(), 1);
    systems::projectiles::run(&mut world, &mut ctx, 0.3);
    assert_eq!(world.query::<&Beam>().iter().count(), 0);
    assert_eq!(world.query::<&Pickup>().iter().count(), 1);
}

// ---- Abilities ----

#[test]
fn test_reinforcement_joins_then_expires() {
    let mut engine = running_engine(8);
    let before = ship_count(&engine);
    engine.queue_command(PlayerCommand::CallReinforcement);
    engine.tick(DT);
    assert_eq!(ship_count(&engine), before + 1);

    let ally = engine
        .world()
        .query::<(&Ship, &Reinforcement)>()
        .iter()
        .map(|(e, _)| e)
        .next()
        .unwrap();
    engine.world_mut().get::<&mut Reinforcement>(ally).unwrap().remaining = 0.001;
    engine.tick(DT);
    engine.tick(DT);
    assert_eq!(ship_count(&engine), before);

    // Cooldown blocks an immediate second call.
    engine.queue_command(PlayerCommand::CallReinforcement);
    engine.tick(DT);
    assert_eq!(ship_count(&engine), before);
}

#[test]
fn test_reinforcement_keeps_default_loadout() {
    let (mut world, mut ctx) = bare_world(small_config(21));
    let zone = Rect::new(300.0, 300.0, 600.0, 600.0);
    let ally = world_setup::spawn_reinforcement(&mut world, &mut ctx, ShipId(0), 0, Vec2::new(500.0, 500.0), 1000.0, zone);
    assert_eq!(world.get::<&Reinforcement>(ally).unwrap().remaining, 1000.0);
    let default_upgrades = serde_json::to_string(&Upgrades::default()).unwrap();

    // Thirty seconds of bot decisions, well past when bots start spending.
    for _ in 0..1800 {
        systems::control::run(&mut world, &mut ctx, DT);
    }

    let loadout = world.get::<&Loadout>(ally).unwrap();
    assert_eq!(loadout.selected, WeaponKind::Blaster);
    for weapon in WeaponKind::ALL {
        assert_eq!(loadout.slots[weapon.index()].unlocked, weapon == WeaponKind::Blaster, "{weapon:?}");
    }
    assert_eq!(serde_json::to_string(&*world.get::<&Upgrades>(ally).unwrap()).unwrap(), default_upgrades);
    assert!(world.get::<&ClassTree>(ally).unwrap().is_empty());
}

#[test]
fn test_ultimate_requires_unlock() {
    let mut engine = running_engine(8);
    engine.queue_command(PlayerCommand::Ultimate);
    let snap = engine.tick(DT);
    assert!(!snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::AbilityUsed { ability: AbilityKind::Ultimate, .. })));
}
