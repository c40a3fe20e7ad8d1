//! Game Module
//!
//! Game-level systems built on top of the engine's locomotion core: authored
//! world data, the patrolling NPCs and the world that steps them together
//! with the player.

pub mod config;
pub mod context;
pub mod definitions;
pub mod npc;
pub mod world;

pub use config::{ConfigError, GameConfig, NpcDefaults, PlanetConfig, SimConfig};
pub use context::SimContext;
pub use definitions::{
    DefinitionError, NpcDefinition, PropDef, WaypointDef, WaypointRegistry, WorldDefinitions,
    FALLBACK_WAYPOINT_ID,
};
pub use npc::{NpcController, NpcError, NpcManager, NpcState};
pub use world::{PlanetWorld, PositionPush, TickReport, clamp_frame_delta};
