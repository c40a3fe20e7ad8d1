//! Planet World
//!
//! Ties the locomotion core together for one loaded world: the planet, the
//! player, the NPCs and the static props. [`PlanetWorld::tick`] runs one
//! simulation step in a fixed order:
//!
//! 1. clamp `dt` to `sim.max_frame_delta`
//! 2. step the player against the props and the NPC positions left by the
//!    previous tick
//! 3. write the player position into the shared [`SimContext`]
//! 4. step every NPC with that context and refresh the nearest NPC
//! 5. emit a position push every `sim.position_push_interval` seconds

use glam::Vec3;

use crate::game::config::GameConfig;
use crate::game::context::SimContext;
use crate::game::definitions::WorldDefinitions;
use crate::game::npc::{NpcManager, NpcResult};
use crate::input::IntentSource;
use crate::physics::Obstacle;
use crate::player::{Interactable, PlayerController, PlayerStep};
use crate::render::{ActorBufferData, ActorInstance, actor_kind};
use crate::world::SphereSurface;

/// Player body color in the instance buffer.
const PLAYER_COLOR: u32 = 0x3A6EA5;

/// Player location handed to the game-state layer. A plain copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPush {
    pub position: Vec3,
    /// Latitude in degrees
    pub lat: f32,
    /// Longitude in degrees
    pub lon: f32,
    /// Simulated seconds since the world loaded
    pub elapsed: f32,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The `dt` actually integrated, after clamping
    pub dt: f32,
    pub player: PlayerStep,
    /// Id of the nearest NPC whose interaction radius holds the player
    pub nearest_npc: Option<String>,
    pub position_push: Option<PositionPush>,
}

/// One loaded world.
#[derive(Debug)]
pub struct PlanetWorld {
    config: GameConfig,
    surface: SphereSurface,
    player: PlayerController,
    npcs: NpcManager,
    props: Vec<Interactable>,
    ctx: SimContext,
    elapsed: f32,
    since_push: f32,
}

impl PlanetWorld {
    /// Build the world: bind the planet, place the player and spawn every NPC.
    pub fn new(config: GameConfig, definitions: &WorldDefinitions) -> NpcResult<Self> {
        let surface = config.planet.surface();

        let mut player = PlayerController::on_surface(
            config.player,
            surface,
            config.sim.spawn_lat,
            config.sim.spawn_lon,
        );
        let props: Vec<Interactable> = definitions
            .props
            .iter()
            .map(|prop| Interactable::new(prop.id.clone(), prop.kind, surface.lat_lon_to_position(prop.lat, prop.lon)))
            .collect();
        let obstacles: Vec<Obstacle> = definitions
            .props
            .iter()
            .filter_map(|prop| {
                prop.collision_radius
                    .map(|radius| Obstacle::sphere(surface.lat_lon_to_position(prop.lat, prop.lon), radius))
            })
            .collect();
        player.set_collision_meshes(obstacles);

        let mut npcs = NpcManager::new(config.npc).with_surface(surface);
        npcs.spawn_all(definitions)?;

        tracing::info!(
            radius = surface.radius(),
            npcs = npcs.len(),
            props = props.len(),
            "world loaded"
        );

        Ok(Self {
            config,
            surface,
            player,
            npcs,
            props,
            ctx: SimContext::new(config.sim.light_direction),
            elapsed: 0.0,
            since_push: 0.0,
        })
    }

    /// Run one simulation step.
    ///
    /// The player moves first, so its interaction targets use where the NPCs
    /// stood at the end of the previous tick. NPCs then react to the player's
    /// new position in the same tick.
    pub fn tick<I: IntentSource + ?Sized>(&mut self, dt: f32, input: &mut I) -> TickReport {
        let dt = clamp_frame_delta(dt, self.config.sim.max_frame_delta);

        let interactables: Vec<Interactable> = self
            .props
            .iter()
            .cloned()
            .chain(self.npcs.interactables())
            .collect();
        let player = self.player.update(dt, input, &interactables);

        self.ctx.player_position = Some(self.player.get_position());
        let nearest_npc = self.npcs.update(dt, &self.ctx).map(|npc| npc.id().to_string());

        self.elapsed += dt;
        self.since_push += dt;
        let position_push = if self.since_push >= self.config.sim.position_push_interval {
            self.since_push = 0.0;
            let position = self.player.get_position();
            let (lat, lon) = self.surface.position_to_lat_lon(position);
            Some(PositionPush {
                position,
                lat,
                lon,
                elapsed: self.elapsed,
            })
        } else {
            None
        };

        TickReport {
            dt,
            player,
            nearest_npc,
            position_push,
        }
    }

    /// Instance buffer for the presentation layer: the player first, then NPCs.
    pub fn render_instances(&self) -> ActorBufferData {
        let mut buffer = ActorBufferData::new(self.ctx.light_direction);
        buffer.push(ActorInstance::from_transform(
            &self.player.transform(),
            PLAYER_COLOR,
            actor_kind::PLAYER,
        ));
        for npc in self.npcs.iter() {
            if !buffer.push(ActorInstance::from_transform(&npc.transform(), npc.color(), actor_kind::NPC)) {
                tracing::warn!(npc = %npc.id(), "actor buffer full, npc not drawn");
                break;
            }
        }
        buffer
    }

    pub fn set_light_direction(&mut self, direction: Vec3) {
        self.ctx.set_light_direction(direction);
    }

    /// Release everything held by the world's actors.
    pub fn unload(&mut self) {
        self.player.dispose();
        self.npcs.clear();
        self.props.clear();
        self.ctx.player_position = None;
        tracing::info!("world unloaded");
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &SphereSurface {
        &self.surface
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn npcs(&self) -> &NpcManager {
        &self.npcs
    }

    pub fn npcs_mut(&mut self) -> &mut NpcManager {
        &mut self.npcs
    }

    pub fn props(&self) -> &[Interactable] {
        &self.props
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Clamp a wall-clock frame delta to what one tick may integrate.
pub fn clamp_frame_delta(dt: f32, max_frame_delta: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, max_frame_delta.max(0.0))
}
