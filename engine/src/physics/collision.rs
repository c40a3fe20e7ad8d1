//! Collision Queries
//!
//! Obstacle geometry the walkers test candidate positions against, and the
//! wall-slide rule that redirects blocked movement along an obstacle.
//!
//! Obstacles are simple bounding volumes (spheres for round props and houses,
//! axis-aligned boxes for walls and fences). An empty obstacle set permits
//! every move.
//!
//! # Example
//!
//! ```ignore
//! use postal_planet_engine::physics::collision::{CollisionMeshes, CollisionQuery, Obstacle};
//! use glam::Vec3;
//!
//! let meshes = CollisionMeshes::new(vec![Obstacle::sphere(Vec3::new(0.0, 50.0, 0.0), 2.0)]);
//! if meshes.can_move_to(candidate) {
//!     position = candidate;
//! }
//! ```

use glam::Vec3;

use crate::world::SphereSurface;

/// Default horizontal radius of a walking actor.
pub const ACTOR_RADIUS: f32 = 0.4;

/// Height above the ground sampled by the spherical query (roughly hip height).
pub const PROBE_HEIGHT: f32 = 1.0;

/// Answers whether an actor may occupy a candidate position.
///
/// Implemented by [`CollisionMeshes`]; tests and hosts can supply their own.
pub trait CollisionQuery {
    /// Whether an actor may stand at `candidate`.
    fn can_move_to(&self, candidate: Vec3) -> bool;

    /// Whether an actor standing on `surface` below/above `candidate` is free,
    /// sampling the radial segment from the ground up to [`PROBE_HEIGHT`].
    fn can_move_to_spherical(&self, candidate: Vec3, surface: &SphereSurface) -> bool;

    /// Outward normal of the obstacle blocking `candidate`, if any.
    fn contact_normal(&self, candidate: Vec3) -> Option<Vec3>;

    /// Outward normal of the first obstacle met along the radial probe.
    fn contact_normal_spherical(&self, candidate: Vec3, surface: &SphereSurface) -> Option<Vec3> {
        let ground = surface.project_to_surface(candidate);
        let up = surface.up_at(candidate);
        PROBE_SAMPLES
            .iter()
            .find_map(|t| self.contact_normal(ground + up * (PROBE_HEIGHT * t)))
    }
}

/// Fractions of [`PROBE_HEIGHT`] sampled by the spherical queries.
const PROBE_SAMPLES: [f32; 3] = [0.0, 0.5, 1.0];

/// A single bounding volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Sphere { center: Vec3, radius: f32 },
    Box { min: Vec3, max: Vec3 },
}

impl Obstacle {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Axis-aligned box from two opposite corners, in any order.
    pub fn aabb(a: Vec3, b: Vec3) -> Self {
        Self::Box {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Closest point of the volume to `point`.
    fn closest_point(&self, point: Vec3) -> Vec3 {
        match *self {
            Obstacle::Sphere { center, radius } => {
                let offset = point - center;
                if offset.length_squared() <= radius * radius {
                    point
                } else {
                    center + offset.normalize() * radius
                }
            }
            Obstacle::Box { min, max } => point.clamp(min, max),
        }
    }

    /// Whether an actor of `actor_radius` centred at `point` overlaps the volume.
    pub fn overlaps(&self, point: Vec3, actor_radius: f32) -> bool {
        self.closest_point(point).distance_squared(point) < actor_radius * actor_radius
    }

    /// Outward normal of the volume as seen from `point`.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match *self {
            Obstacle::Sphere { center, .. } => {
                let offset = point - center;
                if offset.length_squared() < 1.0e-8 {
                    Vec3::Y
                } else {
                    offset.normalize()
                }
            }
            Obstacle::Box { min, max } => {
                let outside = point - point.clamp(min, max);
                if outside.length_squared() > 1.0e-8 {
                    return outside.normalize();
                }
                // Inside: push out through the nearest face.
                let center = (min + max) * 0.5;
                let half_extents = ((max - min) * 0.5).max(Vec3::splat(1.0e-4));
                let normalized = (point - center) / half_extents;
                let abs = normalized.abs();
                if abs.x >= abs.y && abs.x >= abs.z {
                    Vec3::new(normalized.x.signum(), 0.0, 0.0)
                } else if abs.y >= abs.z {
                    Vec3::new(0.0, normalized.y.signum(), 0.0)
                } else {
                    Vec3::new(0.0, 0.0, normalized.z.signum())
                }
            }
        }
    }
}

/// The registered collision geometry for a walker.
#[derive(Debug, Clone)]
pub struct CollisionMeshes {
    obstacles: Vec<Obstacle>,
    actor_radius: f32,
}

impl Default for CollisionMeshes {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CollisionMeshes {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles,
            actor_radius: ACTOR_RADIUS,
        }
    }

    pub fn with_actor_radius(mut self, actor_radius: f32) -> Self {
        self.actor_radius = actor_radius.max(0.0);
        self
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    fn blocking(&self, candidate: Vec3) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.overlaps(candidate, self.actor_radius))
    }
}

impl CollisionQuery for CollisionMeshes {
    fn can_move_to(&self, candidate: Vec3) -> bool {
        self.blocking(candidate).is_none()
    }

    fn can_move_to_spherical(&self, candidate: Vec3, surface: &SphereSurface) -> bool {
        let ground = surface.project_to_surface(candidate);
        let up = surface.up_at(candidate);
        PROBE_SAMPLES
            .iter()
            .all(|t| self.can_move_to(ground + up * (PROBE_HEIGHT * t)))
    }

    fn contact_normal(&self, candidate: Vec3) -> Option<Vec3> {
        self.blocking(candidate)
            .map(|obstacle| obstacle.normal_at(candidate))
    }
}

/// Redirect a blocked velocity along the wall.
///
/// `wall_normal` should already be projected into the plane of motion.
/// Returns `None` when the approach is too close to head-on (within
/// `min_slide_angle` radians of the inverted normal) and the actor should stop.
/// Velocities moving away from the wall pass through unchanged.
pub fn slide_along(
    velocity: Vec3,
    wall_normal: Vec3,
    slide_strength: f32,
    min_slide_angle: f32,
) -> Option<Vec3> {
    let normal = wall_normal.normalize_or_zero();
    let speed = velocity.length();
    if normal == Vec3::ZERO || speed < 1.0e-6 {
        return None;
    }

    let into_wall = velocity.dot(normal);
    if into_wall >= 0.0 {
        return Some(velocity);
    }

    let approach_angle = (-into_wall / speed).clamp(-1.0, 1.0).acos();
    if approach_angle < min_slide_angle {
        return None;
    }

    Some((velocity - normal * into_wall) * slide_strength)
}
