//! Actor state shared by the player and NPC controllers.

use glam::{Quat, Vec3};

use super::sphere::{LocalBasis, SphereSurface, wrap_angle};

/// Position, heading and speed of anything that walks on the planet.
///
/// Owned exclusively by its controller; other systems read copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorState {
    /// Physics position (on the sphere surface when a surface is bound)
    pub position: Vec3,
    /// Facing angle in the local tangent plane, always in `(-PI, PI]`
    pub heading: f32,
    /// Current ground speed in units per second
    pub current_speed: f32,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
            current_speed: 0.0,
        }
    }
}

impl ActorState {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading: wrap_angle(heading),
            current_speed: 0.0,
        }
    }

    /// Set the heading, keeping it wrapped.
    #[inline]
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = wrap_angle(heading);
    }

    /// Local frame at the actor's position, flat when no surface is bound.
    pub fn basis(&self, surface: Option<&SphereSurface>) -> LocalBasis {
        match surface {
            Some(surface) => surface.get_local_axes(self.position, self.heading),
            None => LocalBasis::flat(self.heading),
        }
    }

    /// Presentation transform for this actor.
    ///
    /// `height_offset` lifts the visual container radially; physics is unaffected.
    pub fn transform(&self, surface: Option<&SphereSurface>, height_offset: f32) -> ActorTransform {
        let basis = self.basis(surface);
        let container_position = match surface {
            Some(surface) => surface.project_to_surface_with_height(self.position, height_offset),
            None => self.position + Vec3::Y * height_offset,
        };
        ActorTransform {
            position: self.position,
            rotation: basis.orientation(),
            container_position,
        }
    }
}

/// What the presentation layer needs to place an actor. A plain value copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorTransform {
    /// Physics position on the surface
    pub position: Vec3,
    /// Rotation mapping actor space (+Z forward, +Y up) onto the local frame
    pub rotation: Quat,
    /// Height-adjusted position for the visual container
    pub container_position: Vec3,
}

impl Default for ActorTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            container_position: Vec3::ZERO,
        }
    }
}
