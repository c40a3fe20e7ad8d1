//! Sphere Surface Geometry
//!
//! Pure geometry for actors that walk on the outside of a sphere.
//!
//! # Conventions
//!
//! - Y-up world. `lat_lon_to_position(0, 0)` lies on +Z, latitude 90 on +Y.
//! - The local reference "forward" at a point is world +Y (the north pole)
//!   projected onto the tangent plane. At the poles world -Z is used instead.
//! - A heading of `h` rotates the reference forward counter-clockwise about the
//!   local up axis by `h` radians (positive headings turn left).
//! - `right = forward x up`, so `{forward, right, up}` is right-handed in the
//!   sense `dot(cross(forward, up), right) > 0`.
//! - Tangent-plane 2D vectors are `Vec2 { x: right, y: forward }` expressed in
//!   the heading-0 reference frame.
//!
//! Every normalization site has an explicit fallback so that no NaN can leave
//! this module, even for positions at the sphere center or at the poles.
//!
//! # Example
//!
//! ```rust,ignore
//! use postal_planet_engine::world::SphereSurface;
//! use glam::Vec3;
//!
//! let planet = SphereSurface::new(Vec3::ZERO, 50.0);
//! let spawn = planet.lat_lon_to_position(10.0, -20.0);
//! let axes = planet.get_local_axes(spawn, 0.3);
//! let next = planet.project_to_surface(planet.move_on_surface(spawn, axes.forward, 0.1));
//! ```

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Quat, Vec2, Vec3};

/// Squared length below which a vector is treated as degenerate.
pub const DEGENERATE_EPSILON_SQ: f32 = 1.0e-8;

/// Smallest radius accepted by [`SphereSurface::new`].
pub const MIN_RADIUS: f32 = 1.0e-3;

/// Candidates for the heading-0 direction, in order: north, then -Z at the poles.
const REFERENCE_AXES: [Vec3; 2] = [Vec3::Y, Vec3::NEG_Z];

/// Wrap an angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in `(-PI, PI]`.
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Heading of a tangent-plane vector (`x` = right, `y` = forward).
///
/// Returns `None` for vectors too short to have a direction.
#[inline]
pub fn heading_of_tangent(v: Vec2) -> Option<f32> {
    if v.length_squared() < DEGENERATE_EPSILON_SQ {
        None
    } else {
        Some(wrap_angle((-v.x).atan2(v.y)))
    }
}

/// Unit tangent-plane vector pointing along `heading`.
#[inline]
pub fn tangent_from_heading(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), heading.cos())
}

/// Orthonormal frame at a point on the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBasis {
    /// Outward radial unit vector (surface normal)
    pub up: Vec3,
    /// Facing direction, tangent to the surface
    pub forward: Vec3,
    /// `forward x up`, tangent to the surface
    pub right: Vec3,
}

impl LocalBasis {
    /// Flat-world basis rotated by `heading` about +Y.
    ///
    /// Used when no surface is bound and as the final fallback for degenerate input.
    pub fn flat(heading: f32) -> Self {
        let rotation = Quat::from_rotation_y(heading);
        let forward = rotation * Vec3::NEG_Z;
        Self {
            up: Vec3::Y,
            forward,
            right: forward.cross(Vec3::Y).normalize_or(Vec3::X),
        }
    }

    /// Convert a tangent 2D vector expressed in this basis into world space.
    #[inline]
    pub fn tangent_to_world(&self, v: Vec2) -> Vec3 {
        self.right * v.x + self.forward * v.y
    }

    /// Project a world vector onto this basis' tangent plane as a 2D vector.
    #[inline]
    pub fn world_to_tangent(&self, v: Vec3) -> Vec2 {
        Vec2::new(v.dot(self.right), v.dot(self.forward))
    }

    /// Rotation mapping actor space (+Z forward, +Y up) onto this basis.
    pub fn orientation(&self) -> Quat {
        // Columns are the images of local X, Y and Z. Local X = Y x Z = up x forward = -right.
        Quat::from_mat3(&Mat3::from_cols(-self.right, self.up, self.forward)).normalize()
    }
}

/// Sphere that actors walk on. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSurface {
    center: Vec3,
    radius: f32,
}

impl Default for SphereSurface {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 50.0)
    }
}

impl SphereSurface {
    /// Create a sphere surface.
    ///
    /// Non-finite or too small radii are raised to [`MIN_RADIUS`] so the
    /// `radius > 0` invariant always holds.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = if radius.is_finite() && radius >= MIN_RADIUS {
            radius
        } else {
            tracing::warn!(radius, "invalid sphere radius, clamping to minimum");
            MIN_RADIUS
        };
        Self { center, radius }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Outward unit normal at `position`. Falls back to +Y at the center.
    #[inline]
    pub fn up_at(&self, position: Vec3) -> Vec3 {
        let offset = position - self.center;
        if offset.length_squared() < DEGENERATE_EPSILON_SQ {
            Vec3::Y
        } else {
            offset.normalize()
        }
    }

    /// Signed height of `position` above the surface.
    #[inline]
    pub fn height_above_surface(&self, position: Vec3) -> f32 {
        (position - self.center).length() - self.radius
    }

    /// Convert latitude/longitude in degrees to a point on the surface.
    pub fn lat_lon_to_position(&self, lat: f32, lon: f32) -> Vec3 {
        let lat = lat.to_radians();
        let lon = lon.to_radians();
        let direction = Vec3::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos());
        self.center + direction * self.radius
    }

    /// Convert a point to latitude/longitude in degrees.
    ///
    /// The center itself maps to the north pole.
    pub fn position_to_lat_lon(&self, position: Vec3) -> (f32, f32) {
        let up = self.up_at(position);
        let lat = up.y.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = if up.x.abs() < 1.0e-6 && up.z.abs() < 1.0e-6 {
            0.0
        } else {
            up.x.atan2(up.z).to_degrees()
        };
        (lat, lon)
    }

    /// Snap a point back onto the sphere along its radial direction.
    ///
    /// A point at the center is degenerate and maps to the north pole.
    #[inline]
    pub fn project_to_surface(&self, position: Vec3) -> Vec3 {
        self.project_to_surface_with_height(position, 0.0)
    }

    /// Like [`Self::project_to_surface`] but onto a sphere of radius
    /// `radius + height`. Used for visual containers floating above ground.
    pub fn project_to_surface_with_height(&self, position: Vec3, height: f32) -> Vec3 {
        self.center + self.up_at(position) * (self.radius + height)
    }

    /// Move along a tangent direction without reprojecting.
    ///
    /// Callers must pass the result through [`Self::project_to_surface`]; the
    /// pair is a first-order approximation of geodesic motion, valid while the
    /// per-step distance stays small relative to the radius.
    #[inline]
    pub fn move_on_surface(&self, position: Vec3, forward_dir: Vec3, distance: f32) -> Vec3 {
        position + forward_dir * distance
    }

    /// Great-circle distance between the radial projections of two points.
    pub fn great_circle_distance(&self, a: Vec3, b: Vec3) -> f32 {
        let cos_angle = self.up_at(a).dot(self.up_at(b)).clamp(-1.0, 1.0);
        cos_angle.acos() * self.radius
    }

    /// First of `axes` with a usable projection onto the tangent plane at `up`.
    fn reference_forward(up: Vec3, axes: &[Vec3]) -> Option<Vec3> {
        axes.iter().find_map(|&axis| {
            let tangent = axis - up * axis.dot(up);
            (tangent.length_squared() > 1.0e-6).then(|| tangent.normalize())
        })
    }

    /// Local frame at `position` facing `heading`.
    pub fn get_local_axes(&self, position: Vec3, heading: f32) -> LocalBasis {
        Self::axes_from_reference(self.up_at(position), heading, &REFERENCE_AXES)
    }

    /// Frame at unit normal `up`, with heading 0 along the first usable
    /// candidate in `axes`. When none is usable an arbitrary tangent is taken.
    fn axes_from_reference(up: Vec3, heading: f32, axes: &[Vec3]) -> LocalBasis {
        let reference = Self::reference_forward(up, axes).unwrap_or_else(|| {
            tracing::warn!(?up, "no reference axis for tangent frame, using an arbitrary one");
            up.any_orthonormal_vector()
        });

        let forward = (Quat::from_axis_angle(up, heading) * reference).normalize_or(reference);
        let right = forward.cross(up).normalize_or(Vec3::X);
        // Re-derive forward so the triple is exactly orthogonal after rounding.
        let forward = up.cross(right).normalize_or(forward);

        LocalBasis { up, forward, right }
    }

    /// Rotation mapping actor space (+Z forward, +Y up) to the local frame.
    pub fn get_surface_orientation(&self, position: Vec3, heading: f32) -> Quat {
        self.get_local_axes(position, heading).orientation()
    }

    /// Heading at `from` that points toward `to` along the surface.
    ///
    /// Returns `None` when `to` has no tangent component (coincident or antipodal).
    pub fn heading_toward(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let reference = self.get_local_axes(from, 0.0);
        let offset = to - from;
        let tangent = offset - reference.up * offset.dot(reference.up);
        heading_of_tangent(reference.world_to_tangent(tangent))
    }
}
