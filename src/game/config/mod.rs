//! Config Module
//!
//! Centralized configuration for the planet, player tuning and simulation.

pub mod game_config;

pub use game_config::{ConfigError, GameConfig, NpcDefaults, PlanetConfig, SimConfig};
