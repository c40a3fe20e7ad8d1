//! NPC Module
//!
//! Patrolling villagers built on the same sphere math as the player.

pub mod controller;
pub mod manager;

pub use controller::{NpcController, NpcState};
pub use manager::{NpcError, NpcManager, NpcResult};
