//! Simulation Context
//!
//! Broadcast state shared by every controller during one step. There is
//! exactly one writer per field: the world tick writes the player position
//! after the player has moved, the host writes the light direction. NPC
//! controllers only ever read it, through the reference passed into
//! `update`.

use glam::Vec3;

/// Shared per-step state passed explicitly into NPC updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    /// Player's last known physics position, `None` before the first step
    pub player_position: Option<Vec3>,
    /// Direction toward the sun, unit length
    pub light_direction: Vec3,
}

impl Default for SimContext {
    fn default() -> Self {
        Self {
            player_position: None,
            light_direction: Vec3::new(0.5, 1.0, 0.3).normalize(),
        }
    }
}

impl SimContext {
    pub fn new(light_direction: Vec3) -> Self {
        Self {
            player_position: None,
            light_direction: light_direction.normalize_or(Vec3::Y),
        }
    }

    pub fn with_player(mut self, position: Vec3) -> Self {
        self.player_position = Some(position);
        self
    }

    pub fn set_light_direction(&mut self, direction: Vec3) {
        self.light_direction = direction.normalize_or(Vec3::Y);
    }
}
