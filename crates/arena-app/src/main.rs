use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use arena_app::game_loop::SnapshotSink;
use arena_app::ipc;
use arena_app::state::AppState;
use arena_core::commands::PlayerCommand;
use arena_core::config::MatchConfig;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries the snapshot stream, so logs go to stderr.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// `ARENA_CONFIG` wins over the first argument. With neither, defaults apply.
fn load_config() -> Result<MatchConfig> {
    let path = std::env::var_os("ARENA_CONFIG")
        .or_else(|| std::env::args_os().nth(1))
        .map(PathBuf::from);
    match path {
        Some(path) => MatchConfig::load(&path)
            .with_context(|| format!("failed to load match config from {}", path.display())),
        None => Ok(MatchConfig::default()),
    }
}

/// Writes each snapshot to stdout as one JSON line.
fn stdout_sink() -> SnapshotSink {
    let stdout = std::io::stdout();
    Box::new(move |snapshot| match serde_json::to_string(snapshot) {
        Ok(line) => {
            let mut out = stdout.lock();
            if let Err(e) = writeln!(out, "{line}") {
                warn!(error = %e, "snapshot write failed");
            }
        }
        Err(e) => warn!(error = %e, "snapshot serialization failed"),
    })
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    info!(
        arena_width = config.arena_width,
        arena_height = config.arena_height,
        teams = config.num_teams,
        team_size = config.team_size,
        seed = config.seed,
        "config loaded"
    );

    let state = AppState::new();
    ipc::start_simulation(&state, config, stdout_sink())?;
    ipc::send_command(&state, PlayerCommand::StartMatch)?;

    // One JSON command per line until stdin closes.
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read command input")?;
        if line.trim().is_empty() {
            continue;
        }
        match ipc::parse_command(&line) {
            Ok(command) => ipc::send_command(&state, command)?,
            Err(e) => warn!(error = format!("{e:#}"), "ignoring command"),
        }
    }

    if let Some(snapshot) = ipc::get_snapshot(&state)? {
        info!(tick = snapshot.time.tick, phase = ?snapshot.phase, winner = ?snapshot.winner, "input closed");
    }
    ipc::stop_simulation(&state)
}
