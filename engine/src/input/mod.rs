//! Input Module
//!
//! Platform-agnostic input for the player controller. A host feeds key
//! events into [`KeyboardState`] (or supplies any other [`IntentSource`]);
//! the controller polls it once per step.
//!
//! # Example
//!
//! ```rust,ignore
//! use postal_planet_engine::input::{IntentSource, KeyCode, KeyboardState};
//!
//! let mut keyboard = KeyboardState::new();
//! keyboard.handle_key(KeyCode::W, true);
//! if keyboard.is_moving() {
//!     // walk forward
//! }
//! ```

pub mod intent;
pub mod keyboard;

pub use intent::{IntentSource, MovementIntent, ScriptedIntent};
pub use keyboard::{KeyCode, KeyboardState, MovementKeys};
