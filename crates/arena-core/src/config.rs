//! Match configuration, loaded once from TOML before a match starts.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TEAMS;

/// Flat key set describing one match. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    pub num_teams: usize,
    pub team_size: usize,
    /// Seconds of uncontested presence needed to capture a point.
    pub capture_time: f64,
    pub capture_radius: f64,
    pub ship_base_speed: f64,
    /// Radius of lethal spiked hazards.
    pub hazard_radius: f64,
    pub obstacle_count: usize,
    /// Whether the first ship of team 0 takes player input.
    pub human_player: bool,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena_width: 8000.0,
            arena_height: 8000.0,
            num_teams: 2,
            team_size: 4,
            capture_time: 8.0,
            capture_radius: 150.0,
            ship_base_speed: 300.0,
            hazard_radius: 22.0,
            obstacle_count: 120,
            human_player: true,
            seed: 0,
        }
    }
}

/// Smallest arena side that still fits opposing spawn zones.
pub const MIN_ARENA_SIDE: f64 = 2000.0;

/// Largest team size accepted.
pub const MAX_TEAM_SIZE: usize = 32;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed config: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {v}")))
    }
}

impl MatchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: MatchConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, side) in [("arena_width", self.arena_width), ("arena_height", self.arena_height)] {
            positive(field, side)?;
            if side < MIN_ARENA_SIDE {
                return Err(invalid(field, format!("must be at least {MIN_ARENA_SIDE}")));
            }
        }
        if !(2..=MAX_TEAMS).contains(&self.num_teams) {
            return Err(invalid("num_teams", format!("must be in 2..={MAX_TEAMS}")));
        }
        if !(1..=MAX_TEAM_SIZE).contains(&self.team_size) {
            return Err(invalid("team_size", format!("must be in 1..={MAX_TEAM_SIZE}")));
        }
        positive("capture_time", self.capture_time)?;
        positive("capture_radius", self.capture_radius)?;
        positive("ship_base_speed", self.ship_base_speed)?;
        if !self.hazard_radius.is_finite() || self.hazard_radius < 0.0 {
            return Err(invalid("hazard_radius", "must be zero or positive"));
        }
        Ok(())
    }
}
