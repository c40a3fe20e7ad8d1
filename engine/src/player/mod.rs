//! Player Module
//!
//! Player character locomotion on the planet surface.
//!
//! # Components
//!
//! - [`PlayerController`] - Momentum-based movement with intent-relative controls
//!   - Smooth acceleration/deceleration and heading easing
//!   - Wall sliding against registered collision geometry
//!   - Flat-world fallback when no planet is bound
//! - [`PlayerConfig`] - Tunable speeds and rates
//! - [`Interactable`] - Buildings, mailboxes and NPCs the player can use

pub mod interaction;
pub mod movement_controller;

pub use interaction::{Interactable, InteractableId, InteractableKind, nearest_within};
pub use movement_controller::{
    Momentum, PlayerConfig, PlayerController, PlayerStep,
    WALK_SPEED, RUN_SPEED, ACCELERATION, DECELERATION, TURN_ACCELERATION,
    SLIDE_STRENGTH, MIN_SLIDE_ANGLE, INTERACTION_RANGE,
};
