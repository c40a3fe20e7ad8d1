//! Render Module
//!
//! GPU-facing data for the presentation layer. Only plain `Pod` structs live
//! here; the host application owns the device, pipelines and meshes.

pub mod instance;

pub use instance::{
    ActorBufferData, ActorInstance, MAX_ACTORS, actor_kind, pack_color, parse_hex_color,
};
