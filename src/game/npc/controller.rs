//! NPC Patrol Controller
//!
//! Each NPC walks an ordered list of waypoints, pausing at each one, and
//! stops to face the player when they come close.
//!
//! # States
//!
//! - `Idle`: no route. Terminal.
//! - `Walking`: heading eases toward the current waypoint, then the NPC
//!   advances `speed * dt` along its heading. Arrival (closer than
//!   `arrival_distance`) switches to `Paused`.
//! - `Paused`: waits `pause_time`, then targets the next waypoint
//!   (wrapping to the first) and walks again.
//! - `Looking`: the player is within `interaction_radius`. The NPC stands
//!   still and turns toward the player at half `turn_speed`. Checked before
//!   every other transition; returns to `Walking` once the player leaves.
//!
//! NPCs do not collide with each other or the world. Without a bound
//! surface they hold position.

use glam::Vec3;

use crate::game::config::NpcDefaults;
use crate::game::context::SimContext;
use crate::game::definitions::{NpcDefinition, WaypointDef, WaypointRegistry};
use crate::physics::LocomotionIntegrator;
use crate::render::parse_hex_color;
use crate::world::{ActorState, ActorTransform, SphereSurface};

/// Patrol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcState {
    Idle,
    Walking,
    Paused,
    Looking,
}

impl NpcState {
    pub fn name(&self) -> &'static str {
        match self {
            NpcState::Idle => "idle",
            NpcState::Walking => "walking",
            NpcState::Paused => "paused",
            NpcState::Looking => "looking",
        }
    }
}

/// One patrolling character.
#[derive(Debug, Clone)]
pub struct NpcController {
    id: String,
    name: String,
    color: u32,
    actor: ActorState,
    start: WaypointDef,
    /// Resolved route, in patrol order
    route: Vec<WaypointDef>,
    current_waypoint_index: usize,
    target: Option<Vec3>,
    state: NpcState,
    pause_timer: f32,
    speed: f32,
    turn_speed: f32,
    pause_time: f32,
    interaction_radius: f32,
    arrival_distance: f32,
    look_turn_factor: f32,
    height_offset: f32,
    surface: Option<SphereSurface>,
    placed: bool,
}

impl NpcController {
    /// Build a controller from its definition.
    ///
    /// Waypoint ids are resolved once here; unknown ids resolve to the
    /// registry's fallback waypoint.
    pub fn new(
        definition: &NpcDefinition,
        waypoints: &WaypointRegistry,
        defaults: &NpcDefaults,
        surface: Option<SphereSurface>,
    ) -> Self {
        let route: Vec<WaypointDef> = definition
            .patrol_route
            .iter()
            .map(|id| waypoints.resolve(id).clone())
            .collect();
        let state = if route.is_empty() {
            NpcState::Idle
        } else {
            NpcState::Walking
        };
        let color = definition
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(defaults.color);

        let mut npc = Self {
            id: definition.id.clone(),
            name: definition.display_name().to_string(),
            color,
            actor: ActorState::default(),
            start: waypoints.resolve(&definition.start_waypoint).clone(),
            route,
            current_waypoint_index: 0,
            target: None,
            state,
            pause_timer: 0.0,
            speed: definition.speed,
            turn_speed: definition.turn_speed.unwrap_or(defaults.turn_speed),
            pause_time: definition.pause_time,
            interaction_radius: definition.interaction_radius,
            arrival_distance: defaults.arrival_distance,
            look_turn_factor: defaults.look_turn_factor,
            height_offset: defaults.height_offset,
            surface: None,
            placed: false,
        };
        if let Some(surface) = surface {
            npc.bind_surface(surface);
        }
        npc
    }

    /// Bind to a sphere.
    ///
    /// The first binding places the NPC at its start waypoint; later ones
    /// reproject it from where it stands.
    pub fn bind_surface(&mut self, surface: SphereSurface) {
        self.actor.position = if self.placed {
            surface.project_to_surface(self.actor.position)
        } else {
            surface.lat_lon_to_position(self.start.lat, self.start.lon)
        };
        self.placed = true;
        self.surface = Some(surface);
        self.target = self.resolve_target();
        if let Some(target) = self.target {
            if let Some(heading) = surface.heading_toward(self.actor.position, target) {
                self.actor.set_heading(heading);
            }
        }
    }

    pub fn unbind_surface(&mut self) {
        self.surface = None;
        self.target = None;
    }

    fn resolve_target(&self) -> Option<Vec3> {
        let surface = self.surface.as_ref()?;
        let waypoint = self.route.get(self.current_waypoint_index)?;
        Some(surface.lat_lon_to_position(waypoint.lat, waypoint.lon))
    }

    /// Advance the patrol by one step.
    pub fn update(&mut self, dt: f32, ctx: &SimContext) {
        let Some(surface) = self.surface else {
            return;
        };
        if self.state == NpcState::Idle || dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let player_near = ctx
            .player_position
            .is_some_and(|player| self.actor.position.distance(player) < self.interaction_radius);

        if player_near {
            if self.state != NpcState::Looking {
                self.transition(NpcState::Looking);
            }
        } else if self.state == NpcState::Looking {
            self.transition(NpcState::Walking);
        }

        match self.state {
            NpcState::Looking => {
                self.actor.current_speed = 0.0;
                if let Some(player) = ctx.player_position {
                    self.face(&surface, player, self.turn_speed * self.look_turn_factor, dt);
                }
            }
            NpcState::Paused => {
                self.actor.current_speed = 0.0;
                self.pause_timer -= dt;
                if self.pause_timer <= 0.0 {
                    self.pause_timer = 0.0;
                    self.current_waypoint_index = (self.current_waypoint_index + 1) % self.route.len();
                    self.target = self.resolve_target();
                    self.transition(NpcState::Walking);
                }
            }
            NpcState::Walking => self.walk(&surface, dt),
            NpcState::Idle => {}
        }
    }

    fn walk(&mut self, surface: &SphereSurface, dt: f32) {
        let Some(target) = self.target else {
            self.target = self.resolve_target();
            return;
        };

        if surface.great_circle_distance(self.actor.position, target) < self.arrival_distance {
            self.actor.current_speed = 0.0;
            self.pause_timer = self.pause_time;
            self.transition(NpcState::Paused);
            return;
        }

        self.face(surface, target, self.turn_speed, dt);
        self.actor.position = LocomotionIntegrator::advance_along_heading(
            Some(surface),
            self.actor.position,
            self.actor.heading,
            self.speed * dt,
        );
        self.actor.current_speed = self.speed;
    }

    fn face(&mut self, surface: &SphereSurface, point: Vec3, rate: f32, dt: f32) {
        if let Some(target_heading) = surface.heading_toward(self.actor.position, point) {
            self.actor.heading =
                LocomotionIntegrator::turn_toward(self.actor.heading, target_heading, rate, dt);
        }
    }

    fn transition(&mut self, next: NpcState) {
        tracing::debug!(
            npc = %self.id,
            from = self.state.name(),
            to = next.name(),
            waypoint = self.current_waypoint_index,
            "npc state change"
        );
        self.state = next;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Packed `0x00RRGGBB` body color.
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn state(&self) -> NpcState {
        self.state
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn position(&self) -> Vec3 {
        self.actor.position
    }

    pub fn heading(&self) -> f32 {
        self.actor.heading
    }

    pub fn current_waypoint_index(&self) -> usize {
        self.current_waypoint_index
    }

    /// Id of the waypoint currently targeted.
    pub fn current_waypoint(&self) -> Option<&str> {
        self.route
            .get(self.current_waypoint_index)
            .map(|waypoint| waypoint.id.as_str())
    }

    pub fn route(&self) -> &[WaypointDef] {
        &self.route
    }

    pub fn pause_timer(&self) -> f32 {
        self.pause_timer
    }

    pub fn interaction_radius(&self) -> f32 {
        self.interaction_radius
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    pub fn surface(&self) -> Option<&SphereSurface> {
        self.surface.as_ref()
    }

    /// Presentation transform, same shape as the player's.
    pub fn transform(&self) -> ActorTransform {
        self.actor.transform(self.surface.as_ref(), self.height_offset)
    }

    /// Release the route and detach from the surface. The NPC stays `Idle`.
    pub fn dispose(&mut self) {
        self.route.clear();
        self.target = None;
        self.surface = None;
        self.state = NpcState::Idle;
        self.actor.current_speed = 0.0;
    }
}
