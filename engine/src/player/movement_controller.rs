//! Player Movement Controller
//!
//! Momentum-based locomotion for the player avatar on a spherical world.
//!
//! # Movement Model
//!
//! - Velocity lives in the local tangent plane as a 2D vector
//!   (`x` right, `y` forward, in the heading-0 reference frame).
//!   After every move the velocity, the facing and the view heading are
//!   carried into the frame at the new position, so a held direction keeps
//!   following its great circle, over the poles included.
//! - Current velocity chases the target velocity with the frame-rate
//!   independent factor `1 - exp(-rate * dt)`, using `acceleration` while
//!   speeding up and `deceleration` while slowing down.
//! - Heading eases toward the direction of travel at `turn_acceleration`,
//!   decoupled from speed, so the avatar visibly leans into turns.
//! - Blocked moves slide along the obstacle (scaled by `slide_strength`)
//!   unless the approach is nearly head-on.
//!
//! # Surface Modes
//!
//! - **Spherical (normal)**: movement is integrated in the tangent plane and
//!   snapped back to the sphere after every step.
//! - **Flat (degraded)**: with no [`SphereSurface`] bound, movement happens on
//!   the `y = 0` plane inside a disc of `flat_world_radius`.
//!
//! `dt` is not clamped here. Hosts should clamp frame spikes before calling
//! [`PlayerController::update`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use postal_planet_engine::player::{PlayerController, PlayerConfig};
//! use postal_planet_engine::world::SphereSurface;
//! use glam::Vec3;
//!
//! let mut player = PlayerController::new(PlayerConfig::default());
//! player.set_planet(SphereSurface::new(Vec3::ZERO, 50.0));
//!
//! // Each frame:
//! let step = player.update(delta_time, &mut keyboard, &interactables);
//! if let Some(target) = step.interaction {
//!     // open dialogue / mailbox for `target`
//! }
//! ```

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::interaction::{Interactable, InteractableId, nearest_within};
use crate::input::IntentSource;
use crate::physics::collision::{CollisionMeshes, CollisionQuery, Obstacle, slide_along};
use crate::physics::LocomotionIntegrator;
use crate::world::{ActorState, ActorTransform, SphereSurface, heading_of_tangent};

/// Walk speed in meters per second
pub const WALK_SPEED: f32 = 4.0;

/// Run speed in meters per second
pub const RUN_SPEED: f32 = 8.0;

/// Rate used while speeding up, per second
pub const ACCELERATION: f32 = 12.0;

/// Rate used while slowing down, per second
pub const DECELERATION: f32 = 8.0;

/// Rate at which the heading catches up with the direction of travel, per second
pub const TURN_ACCELERATION: f32 = 6.0;

/// Fraction of the wall-parallel velocity kept while sliding
pub const SLIDE_STRENGTH: f32 = 0.85;

/// Approaches closer than this to head-on (radians) stop instead of sliding
pub const MIN_SLIDE_ANGLE: f32 = 0.3;

/// Distance within which interactables are offered to the player
pub const INTERACTION_RANGE: f32 = 2.5;

/// Velocities closer than this to their target snap onto it
const VELOCITY_SNAP: f32 = 1.0e-3;

/// Below this speed the player is idle and keeps its facing
const IDLE_SPEED: f32 = 1.0e-3;

/// Tunable player movement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Walking speed in m/s
    pub walk_speed: f32,
    /// Running speed in m/s
    pub run_speed: f32,
    /// Momentum rate while speeding up
    pub acceleration: f32,
    /// Momentum rate while slowing down
    pub deceleration: f32,
    /// Heading easing rate
    pub turn_acceleration: f32,
    /// Fraction of velocity kept when sliding along a wall
    pub slide_strength: f32,
    /// Minimum approach angle (radians) for sliding
    pub min_slide_angle: f32,
    /// Interaction prompt distance
    pub interaction_range: f32,
    /// Radial lift of the visual container (render only)
    pub height_offset: f32,
    /// Disc radius for the flat fallback mode
    pub flat_world_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            turn_acceleration: TURN_ACCELERATION,
            slide_strength: SLIDE_STRENGTH,
            min_slide_angle: MIN_SLIDE_ANGLE,
            interaction_range: INTERACTION_RANGE,
            height_offset: 0.05,
            flat_world_radius: 50.0,
        }
    }
}

impl PlayerConfig {
    /// Target speed for the run state.
    #[inline]
    pub fn target_speed(&self, running: bool) -> f32 {
        if running { self.run_speed } else { self.walk_speed }
    }
}

/// Tangent-plane velocities in the heading-0 reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Momentum {
    pub current_velocity: Vec2,
    pub target_velocity: Vec2,
}

/// Result of one [`PlayerController::update`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStep {
    /// Nearest interactable in range after this step
    pub nearby: Option<InteractableId>,
    /// Interactable the player asked to use this step
    pub interaction: Option<InteractableId>,
    /// Whether a collision redirected or stopped the move
    pub collided: bool,
}

/// Player locomotion state machine.
#[derive(Debug, Clone)]
pub struct PlayerController {
    actor: ActorState,
    momentum: Momentum,
    config: PlayerConfig,
    is_running: bool,
    /// Heading the input intent is relative to (camera yaw in the tangent frame)
    view_heading: f32,
    surface: Option<SphereSurface>,
    collision: CollisionMeshes,
    nearby_interactable: Option<InteractableId>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl PlayerController {
    /// Create a controller at the origin in flat mode.
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            actor: ActorState::default(),
            momentum: Momentum::default(),
            config,
            is_running: false,
            view_heading: 0.0,
            surface: None,
            collision: CollisionMeshes::default(),
            nearby_interactable: None,
        }
    }

    /// Create a controller standing on `surface` at the given latitude/longitude.
    pub fn on_surface(config: PlayerConfig, surface: SphereSurface, lat: f32, lon: f32) -> Self {
        let mut controller = Self::new(config);
        controller.actor.position = surface.lat_lon_to_position(lat, lon);
        controller.surface = Some(surface);
        controller
    }

    /// Bind to a sphere and immediately snap the player onto it.
    ///
    /// Safe to call mid-movement: the player is reprojected from wherever it is.
    pub fn set_planet(&mut self, surface: SphereSurface) {
        self.actor.position = surface.project_to_surface(self.actor.position);
        self.surface = Some(surface);
        tracing::debug!(radius = surface.radius(), "player bound to planet");
    }

    /// Unbind the sphere and fall back to flat movement.
    pub fn clear_planet(&mut self) {
        self.surface = None;
        self.actor.position =
            LocomotionIntegrator::clamp_flat(self.actor.position, self.config.flat_world_radius);
        tracing::warn!("player has no planet, using flat-world movement");
    }

    pub fn planet(&self) -> Option<&SphereSurface> {
        self.surface.as_ref()
    }

    /// Replace the collision geometry.
    pub fn set_collision_meshes(&mut self, obstacles: Vec<Obstacle>) {
        self.collision = CollisionMeshes::new(obstacles);
    }

    pub fn collision_meshes(&self) -> &CollisionMeshes {
        &self.collision
    }

    /// Heading the input intent is expressed relative to.
    pub fn set_view_heading(&mut self, heading: f32) {
        self.view_heading = crate::world::wrap_angle(heading);
    }

    pub fn view_heading(&self) -> f32 {
        self.view_heading
    }

    /// Move the player, reprojecting onto the bound surface.
    pub fn set_position(&mut self, position: Vec3) {
        self.actor.position = match &self.surface {
            Some(surface) => surface.project_to_surface(position),
            None => LocomotionIntegrator::clamp_flat(position, self.config.flat_world_radius),
        };
    }

    /// Place the player at a latitude/longitude. Ignored in flat mode.
    pub fn teleport_to_lat_lon(&mut self, lat: f32, lon: f32) -> bool {
        match &self.surface {
            Some(surface) => {
                self.actor.position = surface.lat_lon_to_position(lat, lon);
                self.momentum = Momentum::default();
                self.actor.current_speed = 0.0;
                true
            }
            None => {
                tracing::warn!(lat, lon, "teleport ignored without a planet");
                false
            }
        }
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.actor.set_heading(heading);
    }

    pub fn get_position(&self) -> Vec3 {
        self.actor.position
    }

    /// Orientation keeping the avatar upright on the surface, facing its heading.
    pub fn get_rotation(&self) -> Quat {
        self.actor.basis(self.surface.as_ref()).orientation()
    }

    /// Full presentation transform, including the lifted container position.
    pub fn transform(&self) -> ActorTransform {
        self.actor
            .transform(self.surface.as_ref(), self.config.height_offset)
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn heading(&self) -> f32 {
        self.actor.heading
    }

    pub fn current_speed(&self) -> f32 {
        self.actor.current_speed
    }

    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PlayerConfig) {
        self.config = config;
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Always true: the player is kinematically pinned to the surface (or the
    /// flat plane) after every step and has no airborne state.
    pub fn is_grounded(&self) -> bool {
        true
    }

    pub fn nearby_interactable(&self) -> Option<&InteractableId> {
        self.nearby_interactable.as_ref()
    }

    /// Velocity in world space.
    pub fn world_velocity(&self) -> Vec3 {
        LocomotionIntegrator::tangent_to_world(
            self.surface.as_ref(),
            self.actor.position,
            self.momentum.current_velocity,
        )
    }

    /// Advance one simulation step.
    pub fn update<I: IntentSource + ?Sized>(
        &mut self,
        dt: f32,
        input: &mut I,
        interactables: &[Interactable],
    ) -> PlayerStep {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let intent = input.intent();

        self.is_running = intent.running;
        self.update_momentum(intent.direction, dt);
        self.update_heading(dt);
        let collided = self.integrate(dt);
        self.actor.current_speed = self.momentum.current_velocity.length();

        self.nearby_interactable =
            nearest_within(interactables, self.actor.position, self.config.interaction_range)
                .map(|target| target.id.clone());

        let interaction = if input.poll_interact() {
            self.nearby_interactable.clone()
        } else {
            None
        };
        if let Some(target) = &interaction {
            tracing::debug!(%target, "player interaction");
        }

        PlayerStep {
            nearby: self.nearby_interactable.clone(),
            interaction,
            collided,
        }
    }

    /// Chase the target velocity with asymmetric rates.
    fn update_momentum(&mut self, direction: Vec2, dt: f32) {
        let direction = direction.clamp_length_max(1.0);
        let in_reference = Vec2::from_angle(self.view_heading).rotate(direction);
        let target = in_reference * self.config.target_speed(self.is_running);
        self.momentum.target_velocity = target;

        let current = self.momentum.current_velocity;
        let rate = if target.length_squared() >= current.length_squared() {
            self.config.acceleration
        } else {
            self.config.deceleration
        };
        let factor = 1.0 - (-rate.max(0.0) * dt).exp();
        let next = current + (target - current) * factor;

        self.momentum.current_velocity = if next.distance(target) < VELOCITY_SNAP {
            target
        } else {
            next
        };
    }

    /// Ease the heading toward the direction of travel. Idle keeps the last facing.
    fn update_heading(&mut self, dt: f32) {
        if self.momentum.current_velocity.length() < IDLE_SPEED {
            return;
        }
        if let Some(target) = heading_of_tangent(self.momentum.current_velocity) {
            self.actor.heading = LocomotionIntegrator::turn_toward(
                self.actor.heading,
                target,
                self.config.turn_acceleration,
                dt,
            );
        }
    }

    /// Move with collision and wall sliding. Returns whether a collision occurred.
    fn integrate(&mut self, dt: f32) -> bool {
        let surface = self.surface;
        let position = self.actor.position;
        let velocity = self.world_velocity();
        if velocity.length_squared() < IDLE_SPEED * IDLE_SPEED || dt <= 0.0 {
            return false;
        }

        let candidate = self.advance(position, velocity, dt);
        if self.collision.is_empty() || Self::is_free(&self.collision, surface.as_ref(), candidate) {
            self.actor.position = candidate;
            self.carry_frame(position, candidate);
            return false;
        }

        let up = match &surface {
            Some(surface) => surface.up_at(position),
            None => Vec3::Y,
        };
        let contact = match &surface {
            Some(surface) => self.collision.contact_normal_spherical(candidate, surface),
            None => self.collision.contact_normal(candidate),
        };
        let slid = contact
            .map(|normal| normal - up * normal.dot(up))
            .and_then(|normal| {
                slide_along(
                    velocity,
                    normal,
                    self.config.slide_strength,
                    self.config.min_slide_angle,
                )
            });

        match slid {
            Some(slid) => {
                let slide_candidate = self.advance(position, slid, dt);
                if Self::is_free(&self.collision, surface.as_ref(), slide_candidate) {
                    self.actor.position = slide_candidate;
                    let reference = LocomotionIntegrator::reference_basis(surface.as_ref(), position);
                    self.momentum.current_velocity = reference.world_to_tangent(slid);
                    self.carry_frame(position, slide_candidate);
                } else {
                    self.momentum.current_velocity = Vec2::ZERO;
                }
            }
            None => self.momentum.current_velocity = Vec2::ZERO,
        }
        true
    }

    /// Re-express frame-relative state after moving from `from` to `to`.
    fn carry_frame(&mut self, from: Vec3, to: Vec3) {
        let surface = self.surface.as_ref();
        self.momentum.current_velocity =
            LocomotionIntegrator::transport_tangent(surface, from, to, self.momentum.current_velocity);
        self.momentum.target_velocity =
            LocomotionIntegrator::transport_tangent(surface, from, to, self.momentum.target_velocity);
        self.actor.heading = LocomotionIntegrator::transport_heading(surface, from, to, self.actor.heading);
        self.view_heading = LocomotionIntegrator::transport_heading(surface, from, to, self.view_heading);
    }

    fn advance(&self, position: Vec3, velocity: Vec3, dt: f32) -> Vec3 {
        let moved = LocomotionIntegrator::advance(self.surface.as_ref(), position, velocity, dt);
        match self.surface {
            Some(_) => moved,
            None => LocomotionIntegrator::clamp_flat(moved, self.config.flat_world_radius),
        }
    }

    fn is_free<C: CollisionQuery + ?Sized>(
        collision: &C,
        surface: Option<&SphereSurface>,
        candidate: Vec3,
    ) -> bool {
        match surface {
            Some(surface) => collision.can_move_to_spherical(candidate, surface),
            None => collision.can_move_to(candidate),
        }
    }

    /// Release held geometry and interaction state (world unload).
    pub fn dispose(&mut self) {
        self.collision = CollisionMeshes::default();
        self.nearby_interactable = None;
        self.momentum = Momentum::default();
        self.actor.current_speed = 0.0;
    }
}
