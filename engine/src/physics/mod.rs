//! Physics module
//!
//! Kinematic movement for actors walking on a small planet. No rigid bodies:
//! actors move in the tangent plane, snap back to the sphere, and slide along
//! obstacles instead of stopping dead.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, velocities in m/s, angles in radians.
//!
//! # Submodules
//!
//! - [`locomotion`] - Tangent-plane integration and heading easing
//! - [`collision`] - Obstacle queries and the wall-slide rule

pub mod collision;
pub mod locomotion;

pub use collision::{CollisionMeshes, CollisionQuery, Obstacle, slide_along};
pub use locomotion::LocomotionIntegrator;
