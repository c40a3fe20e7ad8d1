//! World Module
//!
//! Spherical-world geometry and the actor state built on it.
//!
//! ## Default World
//! The default world is a small planet of radius 50 centred at the origin.
//! Every walking actor stays on its surface; with no surface bound, actors
//! fall back to a flat, radius-clamped plane.

pub mod actor;
pub mod sphere;

pub use actor::{ActorState, ActorTransform};
pub use sphere::{
    LocalBasis, SphereSurface, heading_of_tangent, shortest_angle_delta, tangent_from_heading,
    wrap_angle,
};
