//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the explicit
//! `SimContext`, processes player commands at tick boundaries, runs every
//! system in a fixed order and produces `GameStateSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use tracing::{debug, info};

use arena_core::commands::PlayerCommand;
use arena_core::components::*;
use arena_core::config::MatchConfig;
use arena_core::constants::MAX_FRAME_DT;
use arena_core::enums::GamePhase;
use arena_core::events::AudioEvent;
use arena_core::modifiers::ClassTree;
use arena_core::state::GameStateSnapshot;
use arena_core::types::{Rect, ShipId, SimTime, TeamId, Vec2};

use crate::abilities;
use crate::context::SimContext;
use crate::progression::{self, Sheet};
use crate::systems;
use crate::systems::snapshot::SnapshotHeader;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all match state.
pub struct SimulationEngine {
    world: World,
    ctx: SimContext,
    time: SimTime,
    phase: GamePhase,
    winner: Option<TeamId>,
    player: Option<ShipId>,
    command_queue: VecDeque<PlayerCommand>,
}

impl SimulationEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            world: World::new(),
            ctx: SimContext::new(config),
            time: SimTime::default(),
            phase: GamePhase::default(),
            winner: None,
            player: None,
            command_queue: VecDeque::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting
    /// snapshot. `dt` is clamped to `[0, MAX_FRAME_DT]`.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
            self.run_systems(dt);
            self.time.advance(dt);
        }

        let audio_events = std::mem::take(&mut self.ctx.events);
        let header = SnapshotHeader { time: self.time, phase: self.phase, winner: self.winner, player: self.player };
        systems::snapshot::build_snapshot(&mut self.world, &self.ctx, header, audio_events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.winner
    }

    /// Id of the human-controlled ship, if the match has one.
    pub fn player(&self) -> Option<ShipId> {
        self.player
    }

    pub fn config(&self) -> &MatchConfig {
        &self.ctx.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    /// Entity of a ship by id.
    #[cfg(test)]
    pub fn ship_entity(&self, id: ShipId) -> Option<Entity> {
        self.ctx.ship_entity(id)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn player_entity(&self) -> Option<Entity> {
        self.player.and_then(|id| self.ctx.ship_entity(id))
    }

    fn start_match(&mut self) {
        self.world.clear();
        self.ctx.reset();
        self.player = world_setup::setup_match(&mut self.world, &mut self.ctx);
        self.time = SimTime::default();
        self.winner = None;
        self.phase = GamePhase::Active;
        info!(
            teams = self.ctx.config.num_teams,
            team_size = self.ctx.config.team_size,
            seed = self.ctx.config.seed,
            "match started"
        );
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch => {
                if matches!(self.phase, GamePhase::Menu | GamePhase::Victory) {
                    self.start_match();
                } else {
                    debug!(phase = ?self.phase, "start rejected");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ReturnToMenu => {
                if matches!(self.phase, GamePhase::Paused | GamePhase::Victory) {
                    self.world.clear();
                    self.ctx.reset();
                    self.player = None;
                    self.phase = GamePhase::Menu;
                }
            }
            PlayerCommand::SetViewport { x, y, w, h } => {
                self.ctx.viewport = Rect::new(x, y, w.max(0.0), h.max(0.0));
            }
            command => {
                if self.phase != GamePhase::Active {
                    debug!(?command, phase = ?self.phase, "command ignored outside an active match");
                    return;
                }
                let Some(entity) = self.player_entity() else {
                    debug!(?command, "no player ship");
                    return;
                };
                self.handle_player_command(entity, command);
            }
        }
    }

    fn handle_player_command(&mut self, entity: Entity, command: PlayerCommand) {
        match command {
            PlayerCommand::SetControl { thrust, fire, aim } => {
                if let Ok(mut intent) = self.world.get::<&mut ControlIntent>(entity) {
                    intent.thrust = if thrust.is_finite() { thrust } else { Vec2::ZERO };
                    intent.fire = fire;
                    intent.aim = aim;
                }
            }
            PlayerCommand::SelectWeapon { weapon } => {
                let Ok(mut loadout) = self.world.get::<&mut Loadout>(entity) else { return };
                if loadout.slots[weapon.index()].unlocked {
                    loadout.selected = weapon;
                } else {
                    debug!(?weapon, "weapon locked");
                }
            }
            PlayerCommand::ApplyUpgrade { key } => {
                let applied = self.with_sheet(entity, |sheet| progression::apply_upgrade(sheet, key));
                if applied != Some(true) {
                    debug!(?key, "upgrade rejected");
                }
            }
            PlayerCommand::AcquireClassNode { node } => {
                let acquired = self.with_sheet(entity, |sheet| progression::acquire_class_node(sheet, node));
                match (acquired, self.player) {
                    (Some(true), Some(ship)) => {
                        info!(ship = ship.0, node = node.as_str(), "class node acquired");
                        self.ctx.events.push(AudioEvent::ClassAcquired { ship, node });
                    }
                    _ => debug!(node = node.as_str(), "class node rejected"),
                }
            }
            PlayerCommand::CallReinforcement => {
                if !abilities::reinforce(&mut self.world, &mut self.ctx, entity) {
                    debug!("reinforcement not ready");
                }
            }
            PlayerCommand::QuantumRoll => {
                if abilities::quantum(&mut self.world, &mut self.ctx, entity).is_none() {
                    debug!("quantum roll not ready");
                }
            }
            PlayerCommand::Teleport { x, y } => {
                if !abilities::teleport(&mut self.world, &mut self.ctx, entity, Vec2::new(x, y)) {
                    debug!(x, y, "teleport rejected");
                }
            }
            PlayerCommand::Ultimate => {
                if abilities::ultimate(&mut self.world, &mut self.ctx, entity).is_none() {
                    debug!("ultimate unavailable");
                }
            }
            PlayerCommand::StartMatch
            | PlayerCommand::Pause
            | PlayerCommand::Resume
            | PlayerCommand::ReturnToMenu
            | PlayerCommand::SetViewport { .. } => {}
        }
        systems::spawns::flush(&mut self.world, &mut self.ctx);
    }

    /// Run `f` over the progression view of `entity`.
    fn with_sheet<T>(&mut self, entity: Entity, f: impl FnOnce(&mut Sheet) -> T) -> Option<T> {
        let (ship, hull, loadout, upgrades, progression, tree) = self
            .world
            .query_one_mut::<(&Ship, &mut Hull, &mut Loadout, &mut Upgrades, &mut Progression, &mut ClassTree)>(entity)
            .ok()?;
        let mut sheet = Sheet { kind: ship.kind, hull, loadout, upgrades, progression, tree };
        Some(f(&mut sheet))
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let world = &mut self.world;
        let ctx = &mut self.ctx;

        // 1. Respawns and removals queued last tick
        systems::lifecycle::run(world, ctx);
        // 2. Player and AI control, weapon fire
        systems::control::run(world, ctx, dt);
        // 3. Ship timers, debuffs, regeneration, movement
        systems::ships::run(world, ctx, dt);
        systems::spawns::flush(world, ctx);
        // 4. Projectile motion, guidance, effect lifetimes
        systems::projectiles::run(world, ctx, dt);
        // 5. Collisions
        systems::collision::run(world, ctx, dt);
        systems::hazards::run(world, ctx);
        // 6. Capture contention
        systems::capture::run(world, ctx, dt);
        // 7. Victory
        if let Some(team) = systems::victory::run(world, ctx) {
            self.winner = Some(team);
            self.phase = GamePhase::Victory;
            info!(team, elapsed = self.time.elapsed_secs, "match over");
        }
        systems::spawns::flush(world, ctx);
    }
}
