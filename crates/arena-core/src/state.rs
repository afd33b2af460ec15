//! Game state snapshot: everything the renderer, HUD and audio need each tick.

use serde::{Deserialize, Serialize};

use crate::class_tree::ClassNodeId;
use crate::enums::*;
use crate::events::AudioEvent;
use crate::types::{Rect, ShipId, SimTime, TeamId, Vec2};

/// Complete visible state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub arena: Rect,
    pub ships: Vec<ShipView>,
    pub projectiles: Vec<ProjectileView>,
    pub beams: Vec<BeamView>,
    pub arcs: Vec<ArcView>,
    pub pulses: Vec<PulseView>,
    pub trails: Vec<TrailView>,
    pub points: Vec<CapturePointView>,
    pub pickups: Vec<Vec2>,
    pub obstacles: Vec<ObstacleView>,
    pub teams: Vec<TeamView>,
    /// The human-controlled ship, if any.
    pub player: Option<PlayerView>,
    pub winner: Option<TeamId>,
    pub audio_events: Vec<AudioEvent>,
}

/// Flags for debuffs currently affecting a ship.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusFlags {
    pub acid: bool,
    pub burn: bool,
    pub void: bool,
    pub slowed: bool,
    pub stunned: bool,
}

/// One ship as drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: ShipId,
    pub team: TeamId,
    pub kind: ShipKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub alive: bool,
    pub invulnerable: bool,
    /// `hp / max_hp` in `[0, 1]`.
    pub health_frac: f64,
    pub shield_frac: f64,
    pub level: u32,
    pub weapon: WeaponKind,
    pub status: StatusFlags,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub team: TeamId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeamView {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f64,
    pub team: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcView {
    pub points: Vec<Vec2>,
    pub team: TeamId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PulseView {
    pub position: Vec2,
    pub radius: f64,
    pub team: TeamId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailView {
    pub position: Vec2,
    pub radius: f64,
    pub team: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePointView {
    pub index: usize,
    pub position: Vec2,
    pub radius: f64,
    pub owner: Option<TeamId>,
    /// Progress fraction of the capture time, one entry per team.
    pub progress: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleView {
    pub shape: ObstacleShape,
    pub bounds: Rect,
}

/// Per-team totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamView {
    pub team: TeamId,
    pub score: u32,
    pub points_owned: u32,
    pub ships_alive: u32,
}

/// HUD details for the human-controlled ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: ShipId,
    pub level: u32,
    pub spheres: f64,
    pub spheres_needed: f64,
    pub upgrade_points: u32,
    pub class_points: u32,
    pub score: u32,
    pub kills: u32,
    pub deaths: u32,
    pub unlocked_weapons: Vec<WeaponKind>,
    pub class_nodes: Vec<ClassNodeId>,
    pub available_nodes: Vec<ClassNodeId>,
    /// Remaining fraction of each ability cooldown, `0.0` when ready.
    pub cooldowns: CooldownView,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CooldownView {
    pub weapon: f64,
    pub reinforce: f64,
    pub quantum: f64,
    pub teleport: f64,
    pub ultimate: f64,
}
