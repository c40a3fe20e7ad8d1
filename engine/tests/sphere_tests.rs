//! Sphere Tests - Surface Projection, Tangent Frames and Heading Wrap
//!
//! Property checks for the sphere math every walker is built on, swept over
//! a grid of positions and headings including the poles.

use std::f32::consts::PI;

use glam::Vec3;
use postal_planet_engine::physics::LocomotionIntegrator;
use postal_planet_engine::world::{SphereSurface, wrap_angle};

const RADIUS: f32 = 50.0;

fn planet() -> SphereSurface {
    SphereSurface::new(Vec3::ZERO, RADIUS)
}

/// Positions scattered over the sphere, poles included.
fn sample_points(surface: &SphereSurface) -> Vec<Vec3> {
    let mut points = Vec::new();
    for lat in (-90..=90).step_by(15) {
        for lon in (-180..180).step_by(30) {
            points.push(surface.lat_lon_to_position(lat as f32, lon as f32));
        }
    }
    points
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_projection_lands_on_surface() {
    let surface = planet();
    let offsets = [
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-80.0, 10.0, 0.5),
        Vec3::new(0.0, -0.01, 0.0),
        Vec3::new(1000.0, -1000.0, 250.0),
    ];
    for offset in offsets {
        let projected = surface.project_to_surface(offset);
        assert!(
            (projected.length() - RADIUS).abs() <= RADIUS * 1.0e-4,
            "{offset} projected to {projected}"
        );
    }
}

#[test]
fn test_projection_is_idempotent() {
    let surface = SphereSurface::new(Vec3::new(5.0, -3.0, 2.0), RADIUS);
    for point in sample_points(&surface) {
        let nudged = point * 1.01 + Vec3::new(0.3, -0.2, 0.1);
        let once = surface.project_to_surface(nudged);
        let twice = surface.project_to_surface(once);
        assert!(once.abs_diff_eq(twice, 1.0e-3), "{once} vs {twice}");
    }
}

#[test]
fn test_projection_of_center_is_finite() {
    let surface = planet();
    let projected = surface.project_to_surface(Vec3::ZERO);
    assert!(projected.is_finite());
    assert!((projected.length() - RADIUS).abs() < 1.0e-3);
}

// ============================================================================
// Local Axes
// ============================================================================

#[test]
fn test_local_axes_orthonormal_and_right_handed() {
    let surface = planet();
    let headings = [-PI + 0.01, -2.0, -0.5, 0.0, 0.7, 1.5, 3.0, PI];
    for point in sample_points(&surface) {
        for heading in headings {
            let axes = surface.get_local_axes(point, heading);
            for axis in [axes.forward, axes.right, axes.up] {
                assert!(axis.is_finite(), "non-finite axis at {point}");
                assert!((axis.length() - 1.0).abs() < 1.0e-3);
            }
            assert!(axes.forward.dot(axes.right).abs() < 1.0e-3);
            assert!(axes.forward.dot(axes.up).abs() < 1.0e-3);
            assert!(axes.right.dot(axes.up).abs() < 1.0e-3);
            assert!(axes.forward.cross(axes.up).dot(axes.right) > 0.0);
        }
    }
}

#[test]
fn test_up_is_surface_normal() {
    let surface = planet();
    for point in sample_points(&surface) {
        let axes = surface.get_local_axes(point, 0.3);
        assert!(axes.up.abs_diff_eq(point.normalize(), 1.0e-3));
    }
}

#[test]
fn test_orientation_aligns_with_axes() {
    let surface = planet();
    for point in sample_points(&surface) {
        let axes = surface.get_local_axes(point, -1.2);
        let rotation = surface.get_surface_orientation(point, -1.2);
        assert!((rotation * Vec3::Y).abs_diff_eq(axes.up, 1.0e-3));
        assert!((rotation * Vec3::Z).abs_diff_eq(axes.forward, 1.0e-3));
    }
}

// ============================================================================
// Distances and Headings
// ============================================================================

#[test]
fn test_equator_to_pole_quarter_circle() {
    let surface = planet();
    let equator = surface.lat_lon_to_position(0.0, 0.0);
    let pole = surface.lat_lon_to_position(90.0, 0.0);
    let distance = surface.great_circle_distance(equator, pole);
    assert!((distance - RADIUS * PI / 2.0).abs() < 1.0e-3, "{distance}");
}

#[test]
fn test_lat_lon_round_trip_away_from_poles() {
    let surface = planet();
    for (lat, lon) in [(10.0, 20.0), (-45.0, 170.0), (60.0, -120.0)] {
        let (back_lat, back_lon) = surface.position_to_lat_lon(surface.lat_lon_to_position(lat, lon));
        assert!((back_lat - lat).abs() < 1.0e-3);
        assert!((back_lon - lon).abs() < 1.0e-3);
    }
}

#[test]
fn test_repeated_turns_stay_wrapped() {
    let mut heading = 0.0f32;
    for step in 0..5000 {
        heading = wrap_angle(heading + 0.731);
        assert!(heading > -PI && heading <= PI, "step {step}: {heading}");
    }
    let mut eased = 3.0f32;
    for step in 0..5000 {
        let target = if step % 2 == 0 { -3.0 } else { 3.1 };
        eased = LocomotionIntegrator::turn_toward(eased, target, 20.0, 0.05);
        assert!(eased > -PI && eased <= PI, "step {step}: {eased}");
    }
}

#[test]
fn test_long_walk_stays_on_surface() {
    let surface = planet();
    let mut position = surface.lat_lon_to_position(-30.0, 45.0);
    let mut heading = 0.4;
    for step in 0..5000 {
        heading = wrap_angle(heading + 0.002);
        position = LocomotionIntegrator::advance_along_heading(Some(&surface), position, heading, 0.1);
        assert!(
            (position.length() - RADIUS).abs() <= RADIUS * 1.0e-4,
            "drifted at step {step}"
        );
    }
}
