//! Game loop thread: runs the simulation engine at the target frame rate
//! and hands each snapshot to a sink.
//!
//! The engine is created inside this thread so the thread owns it outright.
//! Commands arrive over an `mpsc` channel. The frame clock measures real
//! elapsed time and caps it, so a stalled frame never produces a huge step.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use arena_core::config::MatchConfig;
use arena_core::constants::{MAX_FRAME_DT, TARGET_FPS};
use arena_core::enums::GamePhase;
use arena_core::state::GameStateSnapshot;
use arena_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TARGET_FPS as u64);

/// Receives every snapshot the loop produces.
pub type SnapshotSink = Box<dyn FnMut(&GameStateSnapshot) + Send>;

/// Wall-clock pacing for the loop.
pub struct FrameClock {
    last: Instant,
    next: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last: now, next: now }
    }

    /// Seconds since the previous frame, capped at `MAX_FRAME_DT`.
    pub fn delta(&mut self, now: Instant) -> f64 {
        let dt = now.saturating_duration_since(self.last).as_secs_f64().min(MAX_FRAME_DT);
        self.last = now;
        dt
    }

    /// Time to sleep before the next frame is due. Falling more than two
    /// frames behind resets the schedule instead of catching up.
    pub fn wait(&mut self, now: Instant) -> Option<Duration> {
        self.next += FRAME_DURATION;
        if self.next > now {
            Some(self.next - now)
        } else {
            if now - self.next > FRAME_DURATION * 2 {
                self.next = now;
            }
            None
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: MatchConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    sink: SnapshotSink,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("arena-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, &latest_snapshot, sink))?;

    Ok((cmd_tx, handle))
}

/// Runs until a Shutdown command or channel disconnect.
fn run_game_loop(
    config: MatchConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut sink: SnapshotSink,
) {
    let mut engine = SimulationEngine::new(config);
    let mut clock = FrameClock::new(Instant::now());
    let mut last_phase = engine.phase();
    info!(fps = TARGET_FPS, "game loop started");

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the measured frame time
        let snapshot = engine.tick(clock.delta(Instant::now()));
        if snapshot.phase != last_phase {
            debug!(from = ?last_phase, to = ?snapshot.phase, "phase changed");
            if snapshot.phase == GamePhase::Victory {
                info!(winner = ?snapshot.winner, elapsed = snapshot.time.elapsed_secs, "victory");
            }
            last_phase = snapshot.phase;
        }

        // 3. Hand off to the front end, then keep a copy for polling
        sink(&snapshot);
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next frame
        if let Some(wait) = clock.wait(Instant::now()) {
            std::thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::commands::PlayerCommand;
    use arena_core::constants::DT;

    fn test_config() -> MatchConfig {
        MatchConfig { arena_width: 2000.0, arena_height: 2000.0, team_size: 2, ..MatchConfig::default() }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartMatch)).unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], GameLoopCommand::PlayerCommand(PlayerCommand::StartMatch)));
        assert!(matches!(commands[1], GameLoopCommand::PlayerCommand(PlayerCommand::Pause)));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_frame_clock_caps_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        assert!((clock.delta(t0 + Duration::from_secs(1)) - MAX_FRAME_DT).abs() < 1e-12);
        let dt = clock.delta(t0 + Duration::from_secs(1) + Duration::from_millis(10));
        assert!((dt - 0.010).abs() < 1e-9);
    }

    #[test]
    fn test_frame_clock_resets_when_far_behind() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0);
        assert!(clock.wait(t0).is_some());
        let late = t0 + Duration::from_secs(1);
        assert!(clock.wait(late).is_none());
        // Schedule restarts from `late` rather than replaying missed frames.
        assert_eq!(clock.wait(late), Some(FRAME_DURATION));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = SimulationEngine::new(test_config());
        engine.queue_command(PlayerCommand::StartMatch);
        for _ in 0..50 {
            engine.tick(DT);
        }
        let json = serde_json::to_string(&engine.tick(DT)).unwrap();
        assert!(json.contains("\"ships\""));
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut engine = SimulationEngine::new(test_config());

        engine.queue_command(PlayerCommand::StartMatch);
        let snap = engine.tick(DT);
        assert_eq!(snap.phase, GamePhase::Active);

        engine.queue_command(PlayerCommand::Pause);
        let snap = engine.tick(DT);
        assert_eq!(snap.phase, GamePhase::Paused);
        let paused_tick = snap.time.tick;

        let snap = engine.tick(DT);
        assert_eq!(snap.time.tick, paused_tick);

        engine.queue_command(PlayerCommand::Resume);
        let snap = engine.tick(DT);
        assert_eq!(snap.phase, GamePhase::Active);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_frame_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(FRAME_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_loop_thread_runs_and_stops() {
        let latest = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(test_config(), latest.clone(), Box::new(|_| {})).unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartMatch)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut active = false;
        while Instant::now() < deadline && !active {
            std::thread::sleep(Duration::from_millis(20));
            active = latest.lock().unwrap().as_ref().is_some_and(|s| s.phase == GamePhase::Active);
        }
        assert!(active);

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
