//! Locomotion Integrator
//!
//! Shared numeric core for everything that walks: converts tangent-plane
//! movement into world space, advances a position and reprojects it onto the
//! sphere, and eases headings along the shortest arc.
//!
//! Movement is integrated in two steps: a straight move in the tangent plane,
//! then a radial snap back to the surface. This is a first-order geodesic
//! approximation; it drifts slightly inward on long steps, which the snap
//! removes, and its path error grows with `speed * dt / radius`.
//!
//! Tangent vectors and headings are stored in the heading-0 frame of the
//! current position. That frame turns as the position moves (by a half turn
//! when crossing a pole), so anything kept across a step must be carried
//! into the new frame with [`LocomotionIntegrator::transport_tangent`].
//!
//! With no surface bound the integrator works on the flat `y = 0` plane.

use glam::{Quat, Vec2, Vec3};

use crate::world::{
    LocalBasis, SphereSurface, heading_of_tangent, shortest_angle_delta, tangent_from_heading,
    wrap_angle,
};

/// Stateless integration helpers shared by the player and NPC controllers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocomotionIntegrator;

impl LocomotionIntegrator {
    /// Heading-0 frame at `position`.
    #[inline]
    pub fn reference_basis(surface: Option<&SphereSurface>, position: Vec3) -> LocalBasis {
        match surface {
            Some(surface) => surface.get_local_axes(position, 0.0),
            None => LocalBasis::flat(0.0),
        }
    }

    /// Convert a reference-frame tangent vector (`x` right, `y` forward) to world space.
    #[inline]
    pub fn tangent_to_world(surface: Option<&SphereSurface>, position: Vec3, v: Vec2) -> Vec3 {
        Self::reference_basis(surface, position).tangent_to_world(v)
    }

    /// Position after travelling with `world_velocity` for `dt` seconds.
    ///
    /// On a sphere the result is reprojected onto the surface; on the flat
    /// fallback it stays on `y = 0`.
    pub fn advance(
        surface: Option<&SphereSurface>,
        position: Vec3,
        world_velocity: Vec3,
        dt: f32,
    ) -> Vec3 {
        let distance = world_velocity.length() * dt;
        if distance <= 0.0 || !distance.is_finite() {
            return position;
        }
        let direction = world_velocity.normalize_or_zero();
        match surface {
            Some(surface) => {
                let moved = surface.move_on_surface(position, direction, distance);
                surface.project_to_surface(moved)
            }
            None => {
                let moved = position + direction * distance;
                Vec3::new(moved.x, 0.0, moved.z)
            }
        }
    }

    /// Position after walking `distance` along `heading`.
    pub fn advance_along_heading(
        surface: Option<&SphereSurface>,
        position: Vec3,
        heading: f32,
        distance: f32,
    ) -> Vec3 {
        let forward = match surface {
            Some(surface) => surface.get_local_axes(position, heading).forward,
            None => LocalBasis::flat(heading).forward,
        };
        Self::advance(surface, position, forward * distance, 1.0)
    }

    /// Carry a reference-frame tangent vector from `from` to `to`.
    ///
    /// The world-space vector is rotated by the arc between the two surface
    /// normals, then re-expressed in the heading-0 frame at `to`. Length is
    /// preserved. The flat fallback has a single frame, so `v` is returned as is.
    pub fn transport_tangent(surface: Option<&SphereSurface>, from: Vec3, to: Vec3, v: Vec2) -> Vec2 {
        let Some(surface) = surface else {
            return v;
        };
        let world = surface.get_local_axes(from, 0.0).tangent_to_world(v);
        let arc = Quat::from_rotation_arc(surface.up_at(from), surface.up_at(to));
        surface.get_local_axes(to, 0.0).world_to_tangent(arc * world)
    }

    /// Carry a heading from `from` to `to` so it keeps pointing the same way
    /// along the path.
    pub fn transport_heading(surface: Option<&SphereSurface>, from: Vec3, to: Vec3, heading: f32) -> f32 {
        let carried = Self::transport_tangent(surface, from, to, tangent_from_heading(heading));
        heading_of_tangent(carried).unwrap_or(heading)
    }

    /// Ease `current` toward `target` along the shortest arc.
    ///
    /// The remaining difference is scaled by `min(1, rate * dt)`, so the
    /// heading never overshoots. The result is wrapped to `(-PI, PI]`.
    #[inline]
    pub fn turn_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
        let factor = (rate * dt).clamp(0.0, 1.0);
        wrap_angle(current + shortest_angle_delta(current, target) * factor)
    }

    /// Clamp a flat-world position to a disc of `max_radius` around the origin.
    pub fn clamp_flat(position: Vec3, max_radius: f32) -> Vec3 {
        let horizontal = Vec2::new(position.x, position.z);
        let clamped = horizontal.clamp_length_max(max_radius.max(0.0));
        Vec3::new(clamped.x, 0.0, clamped.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_advance_stays_on_sphere() {
        let surface = SphereSurface::new(Vec3::ZERO, 50.0);
        let mut position = surface.lat_lon_to_position(0.0, 0.0);
        for _ in 0..1000 {
            position = LocomotionIntegrator::advance_along_heading(Some(&surface), position, 0.3, 0.05);
            assert!((position.length() - 50.0).abs() < 50.0 * 1.0e-4);
        }
    }

    #[test]
    fn test_advance_moves_expected_distance() {
        let surface = SphereSurface::new(Vec3::ZERO, 50.0);
        let start = surface.lat_lon_to_position(0.0, 0.0);
        let end = LocomotionIntegrator::advance_along_heading(Some(&surface), start, 0.0, 0.1);
        let travelled = surface.great_circle_distance(start, end);
        assert!((travelled - 0.1).abs() < 1.0e-3);
        // Heading 0 walks north
        assert!(end.y > start.y);
    }

    #[test]
    fn test_zero_velocity_holds_position() {
        let surface = SphereSurface::new(Vec3::ZERO, 50.0);
        let start = surface.lat_lon_to_position(12.0, 7.0);
        assert_eq!(LocomotionIntegrator::advance(Some(&surface), start, Vec3::ZERO, 0.016), start);
    }

    #[test]
    fn test_flat_advance() {
        let end = LocomotionIntegrator::advance(None, Vec3::ZERO, Vec3::new(0.0, 3.0, -2.0), 0.5);
        assert!(end.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1.0e-5));
    }

    #[test]
    fn test_turn_toward_shortest_path() {
        let turned = LocomotionIntegrator::turn_toward(PI - 0.1, -PI + 0.1, 1.0, 0.5);
        // Half of the 0.2 rad gap, across the seam
        assert!((turned - PI).abs() < 1.0e-4 || (turned + PI).abs() < 1.0e-4);
    }

    #[test]
    fn test_turn_toward_never_overshoots() {
        let turned = LocomotionIntegrator::turn_toward(0.0, 1.0, 100.0, 1.0);
        assert!((turned - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn test_repeated_turning_stays_wrapped() {
        let mut heading = 0.0;
        for i in 0..10_000 {
            heading = LocomotionIntegrator::turn_toward(heading, heading + 3.0, 0.9, 1.0);
            assert!(heading > -PI && heading <= PI, "step {i}: {heading}");
        }
    }

    #[test]
    fn test_transport_across_pole_reverses_reference_heading() {
        let surface = SphereSurface::new(Vec3::ZERO, 50.0);
        let before = surface.lat_lon_to_position(89.9, 0.0);
        let after = surface.lat_lon_to_position(89.9, 180.0);
        // Northbound on one side of the pole is southbound on the other
        let carried = LocomotionIntegrator::transport_tangent(Some(&surface), before, after, Vec2::Y);
        assert!(carried.abs_diff_eq(Vec2::NEG_Y, 1.0e-2), "{carried:?}");
        let heading = LocomotionIntegrator::transport_heading(Some(&surface), before, after, 0.0);
        assert!((heading.abs() - PI).abs() < 1.0e-2, "{heading}");
    }

    #[test]
    fn test_transport_along_equator_is_identity() {
        let surface = SphereSurface::new(Vec3::ZERO, 50.0);
        let from = surface.lat_lon_to_position(0.0, 0.0);
        let to = surface.lat_lon_to_position(0.0, 1.0);
        let v = Vec2::new(0.6, -0.8);
        let carried = LocomotionIntegrator::transport_tangent(Some(&surface), from, to, v);
        assert!(carried.abs_diff_eq(v, 1.0e-4));
        assert_eq!(LocomotionIntegrator::transport_tangent(None, from, to, v), v);
    }

    #[test]
    fn test_clamp_flat() {
        let clamped = LocomotionIntegrator::clamp_flat(Vec3::new(30.0, 5.0, 40.0), 10.0);
        assert!((Vec2::new(clamped.x, clamped.z).length() - 10.0).abs() < 1.0e-4);
        assert_eq!(clamped.y, 0.0);
    }
}
