//! Postal Planet Engine Library
//!
//! Locomotion core for a small spherical world: sphere geometry, a
//! momentum-driven player controller and patrolling NPCs that share it.
//!
//! # Modules
//!
//! - [`world`] - Sphere surface math (lat/lon, tangent frames, orientation) and actor state
//! - [`physics`] - Tangent-plane integration, heading easing, collision and wall sliding
//! - [`player`] - Player controller and interaction targets
//! - [`input`] - Platform-agnostic keyboard state and movement intent
//! - [`render`] - GPU-ready actor instance data
//! - [`game`] - World definitions, NPCs, configuration and the world tick
//!
//! # Example
//!
//! ```ignore
//! use postal_planet_engine::game::{GameConfig, PlanetWorld, WorldDefinitions};
//! use postal_planet_engine::input::{KeyCode, KeyboardState};
//!
//! let definitions = WorldDefinitions::builtin()?;
//! let mut world = PlanetWorld::new(GameConfig::default(), &definitions)?;
//! let mut keyboard = KeyboardState::new();
//!
//! // Each frame:
//! keyboard.handle_key(KeyCode::W, true);
//! let report = world.tick(frame_delta, &mut keyboard);
//! if let Some(npc) = report.nearest_npc {
//!     // show the talk prompt for `npc`
//! }
//! let instances = world.render_instances();
//! queue.write_buffer(&actor_buffer, 0, instances.as_bytes());
//! ```

pub mod input;
pub mod physics;
pub mod player;
pub mod render;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export world types for convenience
pub use world::{ActorState, ActorTransform, LocalBasis, SphereSurface};
// Re-export commonly used input types
pub use input::{IntentSource, KeyCode, KeyboardState, MovementIntent};
// Re-export player types
pub use player::{PlayerConfig, PlayerController};
