//! Movement Intent
//!
//! The contract between an input device and the player controller: a 2D
//! movement direction, a run flag and a discrete "interact" action.

use glam::Vec2;

/// Player movement intent for a single step.
///
/// `direction.x` is right, `direction.y` is forward, both relative to the
/// controller's view heading. Magnitude is at most 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    pub direction: Vec2,
    pub running: bool,
}

impl MovementIntent {
    pub fn new(direction: Vec2, running: bool) -> Self {
        Self {
            direction: direction.clamp_length_max(1.0),
            running,
        }
    }

    /// No movement.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Full forward intent.
    pub fn forward(running: bool) -> Self {
        Self::new(Vec2::Y, running)
    }

    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > 1.0e-6
    }
}

/// Source of player input, polled once per step.
pub trait IntentSource {
    /// Movement direction (`x` right, `y` forward), magnitude at most 1.
    fn movement_direction(&self) -> Vec2;

    /// Whether the run modifier or run toggle is active.
    fn is_running(&self) -> bool;

    /// Whether any movement is requested.
    fn is_moving(&self) -> bool {
        self.movement_direction().length_squared() > 1.0e-6
    }

    /// Consume a pending interact action. Returns `true` at most once per press.
    fn poll_interact(&mut self) -> bool;

    /// Snapshot of the movement part of this source.
    fn intent(&self) -> MovementIntent {
        MovementIntent::new(self.movement_direction(), self.is_running())
    }
}

/// Fixed intent, used by headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIntent {
    pub intent: MovementIntent,
    pending_interact: bool,
}

impl ScriptedIntent {
    pub fn new(intent: MovementIntent) -> Self {
        Self {
            intent,
            pending_interact: false,
        }
    }

    /// Queue one interact action for the next poll.
    pub fn press_interact(&mut self) {
        self.pending_interact = true;
    }
}

impl IntentSource for ScriptedIntent {
    fn movement_direction(&self) -> Vec2 {
        self.intent.direction
    }

    fn is_running(&self) -> bool {
        self.intent.running
    }

    fn poll_interact(&mut self) -> bool {
        std::mem::take(&mut self.pending_interact)
    }
}
