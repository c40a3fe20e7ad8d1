//! Game Configuration
//!
//! Planet size, player tuning, NPC defaults and simulation settings in one
//! place. `Default` holds the shipped values; a JSON file only needs to name
//! the fields it overrides.
//!
//! ```json
//! { "planet": { "radius": 80.0 }, "player": { "run_speed": 10.0 } }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerConfig;
use crate::world::SphereSurface;

/// Errors raised while loading the game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// The sphere everyone walks on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// World-space center of the planet
    pub center: Vec3,
    /// Planet radius in world units
    pub radius: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 50.0,
        }
    }
}

impl PlanetConfig {
    pub fn surface(&self) -> SphereSurface {
        SphereSurface::new(self.center, self.radius)
    }
}

/// Values NPC definitions fall back to when they omit a field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcDefaults {
    /// Heading easing rate while walking
    pub turn_speed: f32,
    /// Fraction of `turn_speed` used while facing the player
    pub look_turn_factor: f32,
    /// Distance at which a waypoint counts as reached
    pub arrival_distance: f32,
    /// Radial lift of the visual container
    pub height_offset: f32,
    /// Packed `0x00RRGGBB` body color
    pub color: u32,
}

impl Default for NpcDefaults {
    fn default() -> Self {
        Self {
            turn_speed: 3.0,
            look_turn_factor: 0.5,
            arrival_distance: 1.0,
            height_offset: 0.0,
            color: 0xD0D0D0,
        }
    }
}

/// Stepping and hand-off settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest `dt` a single tick will integrate, in seconds
    pub max_frame_delta: f32,
    /// Seconds between player position pushes to the game-state layer
    pub position_push_interval: f32,
    /// Player spawn latitude in degrees
    pub spawn_lat: f32,
    /// Player spawn longitude in degrees
    pub spawn_lon: f32,
    /// Direction toward the sun
    pub light_direction: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.1,
            position_push_interval: 0.5,
            spawn_lat: 0.0,
            spawn_lon: 0.0,
            light_direction: Vec3::new(0.5, 1.0, 0.3),
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub planet: PlanetConfig,
    pub player: PlayerConfig,
    pub npc: NpcDefaults,
    pub sim: SimConfig,
}

impl GameConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), radius = config.planet.radius, "loaded game config");
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot recover from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        let non_negative = |value: f32| value.is_finite() && value >= 0.0;
        let checks: [(&'static str, bool, &'static str); 9] = [
            ("planet.radius", positive(self.planet.radius), "must be positive"),
            ("player.walk_speed", non_negative(self.player.walk_speed), "must not be negative"),
            ("player.run_speed", non_negative(self.player.run_speed), "must not be negative"),
            ("player.acceleration", positive(self.player.acceleration), "must be positive"),
            ("player.deceleration", positive(self.player.deceleration), "must be positive"),
            ("player.slide_strength", (0.0..=1.0).contains(&self.player.slide_strength), "must be within [0, 1]"),
            ("npc.turn_speed", positive(self.npc.turn_speed), "must be positive"),
            ("sim.max_frame_delta", positive(self.sim.max_frame_delta), "must be positive"),
            ("sim.position_push_interval", positive(self.sim.position_push_interval), "must be positive"),
        ];
        match checks.iter().find(|(_, ok, _)| !ok) {
            Some(&(field, _, reason)) => Err(ConfigError::Invalid { field, reason }),
            None => Ok(()),
        }
    }
}
