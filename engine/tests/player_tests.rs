//! Player Tests - Momentum, Surface Contact, Keyboard Intent and Wall Sliding
//!
//! End-to-end checks of the player controller through its public API.

use glam::{Vec2, Vec3};
use postal_planet_engine::input::{KeyCode, KeyboardState, MovementIntent, ScriptedIntent};
use postal_planet_engine::physics::Obstacle;
use postal_planet_engine::player::{Interactable, InteractableKind, PlayerConfig, PlayerController};
use postal_planet_engine::world::SphereSurface;

const STEP: f32 = 1.0 / 60.0;

fn player_on_planet() -> PlayerController {
    PlayerController::on_surface(
        PlayerConfig::default(),
        SphereSurface::new(Vec3::ZERO, 50.0),
        10.0,
        -20.0,
    )
}

// ============================================================================
// Momentum
// ============================================================================

#[test]
fn test_first_tenth_of_a_second() {
    let mut player = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    player.update(0.1, &mut input, &[]);
    let expected = 4.0 * (1.0 - (-1.2f32).exp());
    assert!(
        (player.current_speed() - expected).abs() < 1.0e-3,
        "expected {expected}, got {}",
        player.current_speed()
    );
}

#[test]
fn test_walk_speed_converges_within_two_seconds() {
    let mut player = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    let mut previous = 0.0f32;
    let mut reached_at = None;
    for step in 0..120 {
        player.update(STEP, &mut input, &[]);
        let speed = player.current_speed();
        assert!(speed <= 4.0 + 1.0e-4, "overshoot at step {step}: {speed}");
        if reached_at.is_none() {
            assert!(speed > previous, "stalled at step {step}");
            if (speed - 4.0).abs() < 1.0e-4 {
                reached_at = Some(step);
            }
        }
        previous = speed;
    }
    assert!(reached_at.is_some(), "never reached walk speed");
}

#[test]
fn test_run_speed_without_overshoot() {
    let mut player = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::forward(true));
    for _ in 0..180 {
        player.update(STEP, &mut input, &[]);
        assert!(player.current_speed() <= 8.0 + 1.0e-4);
    }
    assert!((player.current_speed() - 8.0).abs() < 1.0e-3);
}

#[test]
fn test_frame_rate_independence() {
    let mut coarse = player_on_planet();
    let mut fine = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    for _ in 0..10 {
        coarse.update(0.05, &mut input, &[]);
    }
    for _ in 0..50 {
        fine.update(0.01, &mut input, &[]);
    }
    assert!((coarse.current_speed() - fine.current_speed()).abs() < 1.0e-3);
}

// ============================================================================
// Surface Contact
// ============================================================================

#[test]
fn test_player_never_leaves_surface() {
    let mut player = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::new(Vec2::new(-0.4, 0.9), true));
    for step in 0..1200 {
        if step % 200 == 0 {
            player.set_view_heading(step as f32 * 0.01);
        }
        player.update(STEP, &mut input, &[]);
        let radius = player.get_position().length();
        assert!((radius - 50.0).abs() <= 50.0 * 1.0e-4, "step {step}: radius {radius}");
    }
}

#[test]
fn test_upright_on_surface() {
    let mut player = player_on_planet();
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    for _ in 0..90 {
        player.update(STEP, &mut input, &[]);
    }
    let up = player.get_rotation() * Vec3::Y;
    assert!(up.abs_diff_eq(player.get_position().normalize(), 1.0e-3));

    let transform = player.transform();
    let lift = transform.container_position.length() - transform.position.length();
    assert!((lift - player.config().height_offset).abs() < 1.0e-3);
}

#[test]
fn test_set_planet_mid_movement() {
    let mut player = PlayerController::default();
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    for _ in 0..30 {
        player.update(STEP, &mut input, &[]);
    }
    assert_eq!(player.get_position().y, 0.0);

    player.set_planet(SphereSurface::new(Vec3::new(0.0, -50.0, 0.0), 50.0));
    let offset = player.get_position() - Vec3::new(0.0, -50.0, 0.0);
    assert!((offset.length() - 50.0).abs() < 1.0e-3);

    for _ in 0..30 {
        player.update(STEP, &mut input, &[]);
    }
    let offset = player.get_position() - Vec3::new(0.0, -50.0, 0.0);
    assert!((offset.length() - 50.0).abs() < 1.0e-2);
}

// ============================================================================
// Keyboard Intent
// ============================================================================

#[test]
fn test_keyboard_drives_player() {
    let mut player = player_on_planet();
    let mut keyboard = KeyboardState::new();
    keyboard.handle_key(KeyCode::W, true);
    keyboard.handle_key(KeyCode::ShiftLeft, true);
    for _ in 0..120 {
        player.update(STEP, &mut keyboard, &[]);
    }
    assert!(player.is_running());
    assert!((player.current_speed() - 8.0).abs() < 1.0e-2);

    keyboard.handle_key(KeyCode::W, false);
    keyboard.handle_key(KeyCode::ShiftLeft, false);
    for _ in 0..180 {
        player.update(STEP, &mut keyboard, &[]);
    }
    assert!(player.current_speed() < 1.0e-3);
}

#[test]
fn test_keyboard_interact() {
    let mut player = player_on_planet();
    let mailbox = Interactable::new(
        "mailbox_square",
        InteractableKind::Mailbox,
        player.get_position() + Vec3::new(0.0, 0.0, 1.0),
    );
    let targets = vec![mailbox];
    let mut keyboard = KeyboardState::new();

    keyboard.handle_key(KeyCode::E, true);
    let step = player.update(STEP, &mut keyboard, &targets);
    assert_eq!(step.interaction.as_ref().map(|id| id.as_str()), Some("mailbox_square"));

    // Holding E does not repeat
    let step = player.update(STEP, &mut keyboard, &targets);
    assert!(step.interaction.is_none());
    assert_eq!(step.nearby.as_ref().map(|id| id.as_str()), Some("mailbox_square"));
}

// ============================================================================
// Wall Sliding
// ============================================================================

#[test]
fn test_slides_along_wall_at_glancing_angle() {
    let mut player = PlayerController::default();
    player.set_collision_meshes(vec![Obstacle::aabb(
        Vec3::new(-30.0, -1.0, -4.0),
        Vec3::new(30.0, 2.0, -3.0),
    )]);
    let mut input = ScriptedIntent::new(MovementIntent::new(Vec2::new(1.0, 2.0), false));
    let mut any_collision = false;
    for _ in 0..240 {
        let step = player.update(STEP, &mut input, &[]);
        any_collision |= step.collided;
    }
    let position = player.get_position();
    assert!(any_collision);
    assert!(position.z >= -2.6 - 1.0e-3, "penetrated wall: {position}");
    assert!(position.x > 2.0, "stopped instead of sliding: {position}");
}

#[test]
fn test_collision_free_world_is_unobstructed() {
    let mut blocked = player_on_planet();
    let mut free = player_on_planet();
    blocked.set_collision_meshes(Vec::new());
    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    for _ in 0..60 {
        let a = blocked.update(STEP, &mut input, &[]);
        let b = free.update(STEP, &mut input, &[]);
        assert!(!a.collided && !b.collided);
    }
    assert!(blocked.get_position().abs_diff_eq(free.get_position(), 1.0e-5));
}
