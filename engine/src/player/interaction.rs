//! Interaction Targets
//!
//! Things the player can walk up to and use: buildings, mailboxes and NPCs.
//! The player keeps only the id of the nearest one in range, never a
//! reference to the target itself.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier of an interactable (the same id the definition data uses).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractableId(pub String);

impl InteractableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InteractableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InteractableId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What kind of thing an interactable is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractableKind {
    Building,
    Mailbox,
    Npc,
}

/// A point of interest supplied by the game-state layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub id: InteractableId,
    pub kind: InteractableKind,
    pub position: Vec3,
}

impl Interactable {
    pub fn new(id: impl Into<String>, kind: InteractableKind, position: Vec3) -> Self {
        Self {
            id: InteractableId::new(id),
            kind,
            position,
        }
    }
}

/// Nearest interactable strictly closer than `range` to `position`.
///
/// Ties keep the earlier entry.
pub fn nearest_within<'a>(
    interactables: &'a [Interactable],
    position: Vec3,
    range: f32,
) -> Option<&'a Interactable> {
    let range_sq = range * range;
    interactables
        .iter()
        .map(|target| (target, target.position.distance_squared(position)))
        .filter(|(_, distance_sq)| *distance_sq < range_sq)
        .fold(None, |best: Option<(&Interactable, f32)>, candidate| match best {
            Some((_, best_sq)) if best_sq <= candidate.1 => best,
            _ => Some(candidate),
        })
        .map(|(target, _)| target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_within_range() {
        let targets = vec![
            Interactable::new("post_office", InteractableKind::Building, Vec3::new(5.0, 0.0, 0.0)),
            Interactable::new("mailbox_3", InteractableKind::Mailbox, Vec3::new(0.0, 0.0, 2.0)),
            Interactable::new("baker", InteractableKind::Npc, Vec3::new(0.0, 1.5, 0.0)),
        ];
        let nearest = nearest_within(&targets, Vec3::ZERO, 2.5).unwrap();
        assert_eq!(nearest.id.as_str(), "baker");
    }

    #[test]
    fn test_nothing_in_range() {
        let targets = vec![Interactable::new(
            "far",
            InteractableKind::Mailbox,
            Vec3::new(10.0, 0.0, 0.0),
        )];
        assert!(nearest_within(&targets, Vec3::ZERO, 2.5).is_none());
        assert!(nearest_within(&[], Vec3::ZERO, 2.5).is_none());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&InteractableKind::Mailbox).unwrap();
        assert_eq!(json, "\"mailbox\"");
    }
}
