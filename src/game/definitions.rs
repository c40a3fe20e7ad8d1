//! World Definitions
//!
//! Immutable records describing the authored world: patrol waypoints, NPCs
//! and static props (buildings, mailboxes). Loaded once at startup from JSON
//! and validated up front, so controllers never see a malformed record.
//!
//! ```json
//! {
//!   "waypoints": [{ "id": "plaza", "lat": 0.0, "lon": 0.0 }],
//!   "npcs": [{
//!     "id": "baker",
//!     "start_waypoint": "plaza",
//!     "patrol_route": ["plaza", "bakery"],
//!     "speed": 1.5,
//!     "pause_time": 2.0,
//!     "interaction_radius": 3.0
//!   }],
//!   "props": [{ "id": "post_office", "kind": "building", "lat": 4.0, "lon": 2.0 }]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::InteractableKind;
use crate::render::parse_hex_color;

/// Id of the waypoint unknown references resolve to.
pub const FALLBACK_WAYPOINT_ID: &str = "origin";

/// Built-in default world, embedded at compile time.
pub const DEFAULT_WORLD_JSON: &str = include_str!("../../data/world.json");

/// Errors raised while loading or validating world definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read definitions: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse definitions: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("invalid waypoint '{id}': {reason}")]
    InvalidWaypoint { id: String, reason: String },
    #[error("invalid npc '{id}': {reason}")]
    InvalidNpc { id: String, reason: String },
    #[error("invalid prop '{id}': {reason}")]
    InvalidProp { id: String, reason: String },
}

/// An authored `{lat, lon}` location, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDef {
    pub id: String,
    pub lat: f32,
    pub lon: f32,
}

impl WaypointDef {
    pub fn new(id: impl Into<String>, lat: f32, lon: f32) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: &str| DefinitionError::InvalidWaypoint {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        Ok(())
    }
}

/// One patrolling character.
///
/// `turn_speed` and `color` are optional; the game config supplies defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Body color as `#RRGGBB`
    #[serde(default)]
    pub color: Option<String>,
    pub start_waypoint: String,
    pub patrol_route: Vec<String>,
    /// Walking speed in units per second
    pub speed: f32,
    /// Seconds spent at each waypoint
    pub pause_time: f32,
    /// Distance at which the NPC stops to look at the player
    pub interaction_radius: f32,
    /// Heading easing rate, per second
    #[serde(default)]
    pub turn_speed: Option<f32>,
}

impl NpcDefinition {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: &str| DefinitionError::InvalidNpc {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(invalid("speed must be positive"));
        }
        if !self.pause_time.is_finite() || self.pause_time < 0.0 {
            return Err(invalid("pause_time must not be negative"));
        }
        if !self.interaction_radius.is_finite() || self.interaction_radius <= 0.0 {
            return Err(invalid("interaction_radius must be positive"));
        }
        if let Some(turn_speed) = self.turn_speed {
            if !turn_speed.is_finite() || turn_speed <= 0.0 {
                return Err(invalid("turn_speed must be positive"));
            }
        }
        if let Some(color) = &self.color {
            if parse_hex_color(color).is_none() {
                return Err(invalid("color must be #RRGGBB"));
            }
        }
        Ok(())
    }
}

/// A static point of interest placed on the planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDef {
    pub id: String,
    pub kind: InteractableKind,
    pub lat: f32,
    pub lon: f32,
    /// Radius of the blocking volume; props without one can be walked through
    #[serde(default)]
    pub collision_radius: Option<f32>,
}

impl PropDef {
    fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: &str| DefinitionError::InvalidProp {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.kind == InteractableKind::Npc {
            return Err(invalid("npcs are declared in the npcs list"));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        if let Some(radius) = self.collision_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(invalid("collision_radius must be positive"));
            }
        }
        Ok(())
    }
}

/// Waypoint lookup by id, with a fallback for unknown references.
#[derive(Debug, Clone)]
pub struct WaypointRegistry {
    waypoints: HashMap<String, WaypointDef>,
    fallback: WaypointDef,
}

impl Default for WaypointRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl WaypointRegistry {
    pub fn new(waypoints: Vec<WaypointDef>) -> Self {
        let waypoints: HashMap<String, WaypointDef> = waypoints
            .into_iter()
            .map(|waypoint| (waypoint.id.clone(), waypoint))
            .collect();
        let fallback = waypoints
            .get(FALLBACK_WAYPOINT_ID)
            .cloned()
            .unwrap_or_else(|| WaypointDef::new(FALLBACK_WAYPOINT_ID, 0.0, 0.0));
        Self { waypoints, fallback }
    }

    pub fn get(&self, id: &str) -> Option<&WaypointDef> {
        self.waypoints.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.waypoints.contains_key(id)
    }

    /// Look up `id`, resolving unknown ids to the fallback waypoint.
    pub fn resolve(&self, id: &str) -> &WaypointDef {
        match self.waypoints.get(id) {
            Some(waypoint) => waypoint,
            None => {
                tracing::warn!(waypoint = id, fallback = FALLBACK_WAYPOINT_ID, "unknown waypoint");
                &self.fallback
            }
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WorldFile {
    #[serde(default)]
    waypoints: Vec<WaypointDef>,
    #[serde(default)]
    npcs: Vec<NpcDefinition>,
    #[serde(default)]
    props: Vec<PropDef>,
}

/// Everything authored about the world, validated.
#[derive(Debug, Clone, Default)]
pub struct WorldDefinitions {
    pub waypoints: WaypointRegistry,
    pub npcs: Vec<NpcDefinition>,
    pub props: Vec<PropDef>,
}

impl WorldDefinitions {
    /// The world shipped with the game.
    pub fn builtin() -> Result<Self, DefinitionError> {
        Self::from_json_str(DEFAULT_WORLD_JSON)
    }

    /// Load definitions from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let text = std::fs::read_to_string(path)?;
        let definitions = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            waypoints = definitions.waypoints.len(),
            npcs = definitions.npcs.len(),
            props = definitions.props.len(),
            "loaded world definitions"
        );
        Ok(definitions)
    }

    /// Parse and validate definitions from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DefinitionError> {
        let file: WorldFile = serde_json::from_str(text)?;
        Self::from_records(file.waypoints, file.npcs, file.props)
    }

    /// Validate raw records.
    ///
    /// Field errors and duplicate ids fail the load. References to unknown
    /// waypoints only warn: they resolve to the fallback waypoint at spawn.
    pub fn from_records(
        waypoints: Vec<WaypointDef>,
        npcs: Vec<NpcDefinition>,
        props: Vec<PropDef>,
    ) -> Result<Self, DefinitionError> {
        let mut seen = HashSet::new();
        for waypoint in &waypoints {
            waypoint.validate()?;
            if !seen.insert(waypoint.id.as_str()) {
                return Err(DefinitionError::DuplicateId {
                    kind: "waypoint",
                    id: waypoint.id.clone(),
                });
            }
        }

        // NPCs and props share the interactable id space
        let mut interactable_ids = HashSet::new();
        for npc in &npcs {
            npc.validate()?;
            if !interactable_ids.insert(npc.id.as_str()) {
                return Err(DefinitionError::DuplicateId {
                    kind: "npc",
                    id: npc.id.clone(),
                });
            }
            let references = std::iter::once(&npc.start_waypoint).chain(npc.patrol_route.iter());
            for waypoint in references {
                if !seen.contains(waypoint.as_str()) {
                    tracing::warn!(npc = %npc.id, waypoint = %waypoint, "npc references unknown waypoint");
                }
            }
        }
        for prop in &props {
            prop.validate()?;
            if !interactable_ids.insert(prop.id.as_str()) {
                return Err(DefinitionError::DuplicateId {
                    kind: "prop",
                    id: prop.id.clone(),
                });
            }
        }

        Ok(Self {
            waypoints: WaypointRegistry::new(waypoints),
            npcs,
            props,
        })
    }

    pub fn npc(&self, id: &str) -> Option<&NpcDefinition> {
        self.npcs.iter().find(|npc| npc.id == id)
    }
}
