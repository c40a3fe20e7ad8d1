//! NPC Manager
//!
//! Owns every [`NpcController`], steps them with the shared [`SimContext`]
//! and tracks which NPC is nearest to the player for interaction prompts.
//!
//! NPCs are kept in spawn order. The nearest-NPC query is a linear scan;
//! the world holds a handful of characters, so no spatial index is kept.

use glam::Vec3;
use thiserror::Error;

use super::controller::{NpcController, NpcState};
use crate::game::config::NpcDefaults;
use crate::game::context::SimContext;
use crate::game::definitions::{NpcDefinition, WorldDefinitions};
use crate::player::{Interactable, InteractableKind};
use crate::world::SphereSurface;

/// Errors for NPC bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NpcError {
    #[error("npc not found: {0}")]
    NotFound(String),
    #[error("npc already spawned: {0}")]
    AlreadySpawned(String),
}

pub type NpcResult<T> = Result<T, NpcError>;

/// Owner of all NPC controllers.
#[derive(Debug, Default)]
pub struct NpcManager {
    npcs: Vec<NpcController>,
    surface: Option<SphereSurface>,
    defaults: NpcDefaults,
    nearest: Option<String>,
}

impl NpcManager {
    pub fn new(defaults: NpcDefaults) -> Self {
        Self {
            npcs: Vec::new(),
            surface: None,
            defaults,
            nearest: None,
        }
    }

    pub fn with_surface(mut self, surface: SphereSurface) -> Self {
        self.set_surface(surface);
        self
    }

    /// Bind every current and future NPC to `surface`.
    pub fn set_surface(&mut self, surface: SphereSurface) {
        self.surface = Some(surface);
        for npc in &mut self.npcs {
            npc.bind_surface(surface);
        }
    }

    pub fn surface(&self) -> Option<&SphereSurface> {
        self.surface.as_ref()
    }

    /// Spawn one NPC from its definition.
    pub fn spawn(
        &mut self,
        definition: &NpcDefinition,
        definitions: &WorldDefinitions,
    ) -> NpcResult<&NpcController> {
        if self.get(&definition.id).is_some() {
            return Err(NpcError::AlreadySpawned(definition.id.clone()));
        }
        let npc = NpcController::new(definition, &definitions.waypoints, &self.defaults, self.surface);
        tracing::info!(
            npc = %npc.id(),
            name = %npc.name(),
            route = npc.route().len(),
            state = npc.state().name(),
            "spawned npc"
        );
        self.npcs.push(npc);
        let index = self.npcs.len() - 1;
        Ok(&self.npcs[index])
    }

    /// Spawn every NPC in `definitions`. Returns how many were spawned.
    pub fn spawn_all(&mut self, definitions: &WorldDefinitions) -> NpcResult<usize> {
        for definition in &definitions.npcs {
            self.spawn(definition, definitions)?;
        }
        Ok(definitions.npcs.len())
    }

    /// Dispose and remove one NPC.
    pub fn despawn(&mut self, id: &str) -> NpcResult<NpcController> {
        let index = self
            .npcs
            .iter()
            .position(|npc| npc.id() == id)
            .ok_or_else(|| NpcError::NotFound(id.to_string()))?;
        let mut npc = self.npcs.remove(index);
        npc.dispose();
        if self.nearest.as_deref() == Some(id) {
            self.nearest = None;
        }
        tracing::info!(npc = id, "despawned npc");
        Ok(npc)
    }

    /// Dispose and remove every NPC (world unload).
    pub fn clear(&mut self) {
        for npc in &mut self.npcs {
            npc.dispose();
        }
        self.npcs.clear();
        self.nearest = None;
    }

    /// Step every NPC, then refresh the nearest NPC to the player.
    ///
    /// An NPC counts as in range when the player is inside its own
    /// interaction radius.
    pub fn update(&mut self, dt: f32, ctx: &SimContext) -> Option<&NpcController> {
        for npc in &mut self.npcs {
            npc.update(dt, ctx);
        }

        let nearest = ctx.player_position.and_then(|player| {
            self.npcs
                .iter()
                .map(|npc| (npc, npc.position().distance(player)))
                .filter(|(npc, distance)| *distance < npc.interaction_radius())
                .fold(None, |best: Option<(&NpcController, f32)>, candidate| match best {
                    Some((_, best_distance)) if best_distance <= candidate.1 => best,
                    _ => Some(candidate),
                })
                .map(|(npc, _)| npc.id().to_string())
        });
        if nearest != self.nearest {
            tracing::debug!(from = ?self.nearest, to = ?nearest, "nearest npc changed");
            self.nearest = nearest;
        }
        self.nearest_npc()
    }

    /// NPC nearest to the player as of the last update.
    pub fn nearest_npc(&self) -> Option<&NpcController> {
        self.nearest.as_deref().and_then(|id| self.get(id))
    }

    /// Nearest NPC strictly closer than `range` to `position`.
    pub fn nearest_in_range(&self, position: Vec3, range: f32) -> Option<&NpcController> {
        self.npcs
            .iter()
            .map(|npc| (npc, npc.position().distance(position)))
            .filter(|(_, distance)| *distance < range)
            .fold(None, |best: Option<(&NpcController, f32)>, candidate| match best {
                Some((_, best_distance)) if best_distance <= candidate.1 => best,
                _ => Some(candidate),
            })
            .map(|(npc, _)| npc)
    }

    pub fn get(&self, id: &str) -> Option<&NpcController> {
        self.npcs.iter().find(|npc| npc.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut NpcController> {
        self.npcs.iter_mut().find(|npc| npc.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NpcController> {
        self.npcs.iter()
    }

    /// NPCs currently in `state`.
    pub fn in_state(&self, state: NpcState) -> impl Iterator<Item = &NpcController> {
        self.npcs.iter().filter(move |npc| npc.state() == state)
    }

    /// Current NPC positions as interactables.
    pub fn interactables(&self) -> impl Iterator<Item = Interactable> + '_ {
        self.npcs
            .iter()
            .map(|npc| Interactable::new(npc.id(), InteractableKind::Npc, npc.position()))
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}
