//! Actor Instances - GPU-ready per-actor data built from presentation transforms
//!
//! The locomotion core never touches the renderer. Each frame the host copies
//! the [`ActorTransform`] of the player and every NPC into an
//! [`ActorBufferData`] and uploads it as-is (the structs are `Pod`).
//!
//! WGSL layout of one instance (80 bytes, 5 rows of 16 bytes):
//!   Row 0-3 (offset 0-63):  model matrix, column-major mat4x4<f32>
//!   Row 4   (offset 64-79): color_packed, actor_kind, _pad0, _pad1

use glam::{Mat4, Vec3};

use crate::world::ActorTransform;

/// Maximum number of actors uploaded per frame (player + NPCs)
pub const MAX_ACTORS: usize = 16;

/// Actor kind constants matching shader definitions
pub mod actor_kind {
    pub const PLAYER: u32 = 0;
    pub const NPC: u32 = 1;
}

/// Per-actor instance data - must match WGSL ActorInstance struct
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ActorInstance {
    /// Model matrix (rotation + lifted container position)
    pub model: [[f32; 4]; 4],
    /// Packed RGB color as u32: 0x00RRGGBB
    pub color_packed: u32,
    /// See [`actor_kind`]
    pub actor_kind: u32,
    pub _pad0: u32,
    pub _pad1: u32,
}

impl Default for ActorInstance {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color_packed: 0xFFFFFF,
            actor_kind: actor_kind::NPC,
            _pad0: 0,
            _pad1: 0,
        }
    }
}

impl ActorInstance {
    /// Build an instance from an actor's presentation transform.
    ///
    /// The model matrix uses the height-adjusted container position, so the
    /// mesh floats `height_offset` above the physics position.
    pub fn from_transform(transform: &ActorTransform, color_packed: u32, kind: u32) -> Self {
        let model = Mat4::from_rotation_translation(transform.rotation, transform.container_position);
        Self {
            model: model.to_cols_array_2d(),
            color_packed,
            actor_kind: kind,
            ..Self::default()
        }
    }

    /// Translation column of the model matrix.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        let column = self.model[3];
        Vec3::new(column[0], column[1], column[2])
    }
}

/// Actor buffer header + instances array - must match WGSL ActorBuffer struct
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ActorBufferData {
    /// Directional light shared by every actor (xyz, w unused)
    pub light_dir: [f32; 4],
    /// Number of active instances
    pub count: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
    pub instances: [ActorInstance; MAX_ACTORS],
}

impl Default for ActorBufferData {
    fn default() -> Self {
        Self {
            light_dir: [0.0, 1.0, 0.0, 0.0],
            count: 0,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
            instances: [ActorInstance::default(); MAX_ACTORS],
        }
    }
}

impl ActorBufferData {
    pub fn new(light_direction: Vec3) -> Self {
        let light = light_direction.normalize_or(Vec3::Y);
        Self {
            light_dir: [light.x, light.y, light.z, 0.0],
            ..Self::default()
        }
    }

    /// Append an instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: ActorInstance) -> bool {
        let index = self.count as usize;
        if index >= MAX_ACTORS {
            return false;
        }
        self.instances[index] = instance;
        self.count += 1;
        true
    }

    /// Active instances.
    pub fn active(&self) -> &[ActorInstance] {
        &self.instances[..self.count as usize]
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Raw bytes for buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Pack RGB color components into a single u32 value
/// Format: 0x00RRGGBB
#[inline]
pub fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Parse a `#RRGGBB` (or `RRGGBB`) hex string into a packed color.
pub fn parse_hex_color(hex: &str) -> Option<u32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

static_assertions::assert_eq_size!(ActorInstance, [u8; 80]);
static_assertions::assert_eq_size!(ActorBufferData, [u8; 32 + 80 * MAX_ACTORS]);
