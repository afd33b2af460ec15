//! Front-end command handlers.
//!
//! These bridge front-end requests to the game loop thread via channels.
//! Commands arrive as JSON objects tagged by `type`, e.g.
//! `{"type":"Teleport","x":400.0,"y":300.0}`.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use arena_core::commands::PlayerCommand;
use arena_core::config::MatchConfig;
use arena_core::state::GameStateSnapshot;

use crate::game_loop::{self, SnapshotSink};
use crate::state::{AppState, GameLoopCommand};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|e| anyhow!("app state lock poisoned: {e}"))
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: MatchConfig, sink: SnapshotSink) -> Result<()> {
    let mut running = lock(&state.running)?;
    if *running {
        bail!("simulation already running");
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone(), sink)
        .context("failed to spawn game loop thread")?;

    *lock(&state.command_tx)? = Some(cmd_tx);
    *lock(&state.loop_handle)? = Some(handle);
    *running = true;
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<()> {
    let tx = lock(&state.command_tx)?;
    match tx.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| anyhow!("failed to send command: {e}")),
        None => bail!("simulation not started"),
    }
}

/// Latest snapshot, for polling and initial state.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>> {
    Ok(lock(&state.latest_snapshot)?.clone())
}

/// Stop the game loop and wait for its thread to exit. Stopping a
/// simulation that never started is a no-op.
pub fn stop_simulation(state: &AppState) -> Result<()> {
    let mut running = lock(&state.running)?;
    if !*running {
        return Ok(());
    }
    if let Some(tx) = lock(&state.command_tx)?.take() {
        // A closed channel means the loop already exited.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    if let Some(handle) = lock(&state.loop_handle)?.take() {
        handle.join().map_err(|_| anyhow!("game loop thread panicked"))?;
    }
    *running = false;
    info!("simulation stopped");
    Ok(())
}

/// Decode one JSON command line.
pub fn parse_command(line: &str) -> Result<PlayerCommand> {
    serde_json::from_str(line.trim()).with_context(|| format!("malformed command: {}", line.trim()))
}
