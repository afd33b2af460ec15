//! Control inputs: human intent and AI decisions become acceleration,
//! fire requests and progression choices.

use hecs::{Entity, World};

use arena_ai::brain::{evaluate, AiContext, Contact};
use arena_ai::choices::{choose_class_node, choose_weapon};
use arena_core::components::*;
use arena_core::constants::PLAYER_ACCEL;
use arena_core::enums::{ShipKind, WeaponKind};
use arena_core::events::AudioEvent;
use arena_core::modifiers::{ClassTree, ModKey};
use arena_core::types::{Position, Rect, Vec2, Velocity};

use crate::context::SimContext;
use crate::progression::{self, Sheet};
use crate::systems::ships::{accelerate, max_speed};
use crate::weapons::{self, Shooter};

/// Side of the box used to decide whether a bot is on screen.
const ON_SCREEN_BOX: f64 = 40.0;

pub fn run(world: &mut World, ctx: &mut SimContext, dt: f64) {
    let contacts = super::contacts(world);
    let points = super::point_infos(world);
    let mut fire_requests: Vec<(Entity, Vec2)> = Vec::new();

    for (entity, (ship, intent, vel, thrusters, prog, upgrades, tree)) in world.query_mut::<(
        &Ship,
        &ControlIntent,
        &mut Velocity,
        &Thrusters,
        &Progression,
        &Upgrades,
        &mut ClassTree,
    )>() {
        if !ship.life.is_alive() {
            continue;
        }
        let speed_mul = tree.get(ModKey::SpeedMul);
        let cap = max_speed(thrusters.base_speed, prog.level, upgrades.speed, speed_mul);
        let thrust = intent.thrust.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        accelerate(vel, thrust * PLAYER_ACCEL, dt, speed_mul, cap);
        if intent.fire {
            fire_requests.push((entity, intent.aim));
        }
    }

    let viewport = ctx.viewport;
    let mut decisions = Vec::new();
    for (entity, (ship, pos, brain, prog)) in world.query_mut::<(&Ship, &Position, &mut AiBrain, &Progression)>() {
        if !ship.life.is_alive() {
            continue;
        }
        let on_screen = viewport.w > 0.0 && viewport.intersects(&Rect::centered(pos.0, ON_SCREEN_BOX));
        let ai = AiContext {
            id: ship.id,
            team: ship.team,
            position: pos.0,
            brain: *brain,
            on_screen,
            class_points: prog.class_points,
            upgrade_points: prog.upgrade_points,
            ships: &contacts,
            points: &points,
            dt,
        };
        let decision = evaluate(&ai, &mut ctx.rng);
        *brain = decision.brain;
        decisions.push((entity, ship.kind, decision));
    }

    for (entity, kind, d) in decisions {
        if let Ok((vel, thrusters, prog, upgrades, tree)) = world
            .query_one_mut::<(&mut Velocity, &Thrusters, &Progression, &Upgrades, &mut ClassTree)>(entity)
        {
            let speed_mul = tree.get(ModKey::SpeedMul);
            let cap = max_speed(thrusters.base_speed, prog.level, upgrades.speed, speed_mul);
            accelerate(vel, d.accel, dt, speed_mul, cap);
        }
        if let Some(aim) = d.fire_at {
            fire_requests.push((entity, aim));
        }
        // Reinforcements keep their default loadout for their whole life.
        if kind != ShipKind::Reinforcement && (d.spend_class_point || d.switch_weapon || d.take_upgrade) {
            bot_progression(world, ctx, entity, d.spend_class_point, d.switch_weapon, d.take_upgrade);
        }
    }

    for (entity, aim) in fire_requests {
        fire_weapon(world, ctx, entity, aim, &contacts);
    }
    super::spawns::flush(world, ctx);
}

fn bot_progression(world: &mut World, ctx: &mut SimContext, entity: Entity, spend: bool, switch: bool, upgrade: bool) {
    let Ok((ship, hull, loadout, upgrades, progression, tree)) = world.query_one_mut::<(
        &Ship,
        &mut Hull,
        &mut Loadout,
        &mut Upgrades,
        &mut Progression,
        &mut ClassTree,
    )>(entity) else {
        return;
    };
    let mut sheet = Sheet { kind: ship.kind, hull, loadout, upgrades, progression, tree };

    if spend {
        let available = progression::purchasable_nodes(&sheet);
        if let Some(node) = choose_class_node(&available, &mut ctx.rng) {
            if progression::acquire_class_node(&mut sheet, node) {
                ctx.events.push(AudioEvent::ClassAcquired { ship: ship.id, node });
            }
        }
    }
    if switch {
        let unlocked: Vec<WeaponKind> = WeaponKind::ALL
            .into_iter()
            .filter(|w| sheet.loadout.slots[w.index()].unlocked)
            .collect();
        if let Some(weapon) = choose_weapon(&unlocked, &mut ctx.rng) {
            sheet.loadout.selected = weapon;
        }
    }
    if upgrade {
        // Bots gift themselves the point they spend.
        sheet.progression.upgrade_points += 1;
        progression::apply_random_upgrade(&mut sheet, &mut ctx.rng);
    }
}

/// Fire `entity`'s selected weapon toward `aim`, queueing what it produces.
/// Returns the number of spawns queued.
pub fn fire_weapon(world: &mut World, ctx: &mut SimContext, entity: Entity, aim: Vec2, contacts: &[Contact]) -> usize {
    let Ok((ship, pos, loadout, upgrades, tree)) =
        world.query_one_mut::<(&Ship, &Position, &mut Loadout, &Upgrades, &mut ClassTree)>(entity)
    else {
        return 0;
    };
    if !ship.life.is_alive() {
        return 0;
    }
    let shooter = Shooter { id: ship.id, team: ship.team, kind: ship.kind, position: pos.0 };
    let mods = tree.resolved();
    let weapon = loadout.selected;
    let spawns = weapons::fire(&shooter, loadout, upgrades, &mods, aim, contacts, &mut ctx.rng);
    let count = spawns.len();
    if count > 0 {
        ctx.events.push(AudioEvent::WeaponFired { ship: ship.id, weapon });
        ctx.spawns.extend(spawns);
    }
    count
}
