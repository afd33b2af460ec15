//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D vector in arena space (world units, y grows downward).
pub type Vec2 = DVec2;

/// Team index, `0..num_teams`.
pub type TeamId = u8;

/// Stable identifier for a ship, unique for the lifetime of a match.
///
/// Ship references (AI targets, homing targets, attacker credit) are held
/// as ids rather than ECS handles so they survive in snapshots and in the
/// ECS-free AI crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// Position in arena space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Axis-aligned rectangle (spawn zones, viewport, obstacle bounds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.0.distance(other.0)
    }

    /// Squared distance to another position.
    pub fn distance_sq_to(&self, other: &Position) -> f64 {
        self.0.distance_squared(other.0)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.0.length()
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`.
    pub fn centered(center: Vec2, size: f64) -> Self {
        Self::new(center.x - size * 0.5, center.y - size * 0.5, size, size)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Whether `p` lies inside (edges inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Whether two rectangles overlap (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shrink on every side by `margin`. Never produces a negative size.
    pub fn inset(&self, margin: f64) -> Rect {
        let mx = margin.min(self.w * 0.5);
        let my = margin.min(self.h * 0.5);
        Rect::new(self.x + mx, self.y + my, self.w - 2.0 * mx, self.h - 2.0 * my)
    }
}
