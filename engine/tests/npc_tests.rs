//! NPC Tests - Patrol Cycle, Looking Override and Pause Timing
//!
//! Drives NPC controllers through the manager and the shared context the
//! same way the world tick does.

use glam::Vec3;
use postal_planet_engine::game::{
    NpcDefaults, NpcDefinition, NpcManager, NpcState, SimContext, WaypointDef, WorldDefinitions,
};
use postal_planet_engine::world::SphereSurface;

const STEP: f32 = 1.0 / 30.0;

fn planet() -> SphereSurface {
    SphereSurface::new(Vec3::ZERO, 50.0)
}

fn square_world(pause_time: f32) -> WorldDefinitions {
    let waypoints = vec![
        WaypointDef::new("w0", 0.0, 0.0),
        WaypointDef::new("w1", 0.0, 4.0),
        WaypointDef::new("w2", 4.0, 4.0),
        WaypointDef::new("w3", 4.0, 0.0),
    ];
    let courier = NpcDefinition {
        id: "courier".to_string(),
        name: None,
        color: None,
        start_waypoint: "w0".to_string(),
        patrol_route: ["w0", "w1", "w2", "w3"].iter().map(|id| id.to_string()).collect(),
        speed: 2.0,
        pause_time,
        interaction_radius: 2.0,
        turn_speed: Some(20.0),
    };
    WorldDefinitions::from_records(waypoints, vec![courier], Vec::new()).unwrap()
}

fn spawn(definitions: &WorldDefinitions) -> NpcManager {
    let mut npcs = NpcManager::new(NpcDefaults::default()).with_surface(planet());
    npcs.spawn_all(definitions).unwrap();
    npcs
}

// ============================================================================
// Patrol Cycle
// ============================================================================

#[test]
fn test_patrol_visits_waypoints_in_order_and_wraps() {
    let definitions = square_world(0.5);
    let mut npcs = spawn(&definitions);
    let ctx = SimContext::default();

    let mut arrivals = Vec::new();
    let mut departures = Vec::new();
    let mut previous = npcs.get("courier").unwrap().state();
    for _ in 0..(60.0 / STEP) as usize {
        npcs.update(STEP, &ctx);
        let npc = npcs.get("courier").unwrap();
        match (previous, npc.state()) {
            (NpcState::Walking, NpcState::Paused) => arrivals.push(npc.current_waypoint_index()),
            (NpcState::Paused, NpcState::Walking) => departures.push(npc.current_waypoint_index()),
            _ => {}
        }
        previous = npc.state();
        if departures.len() == 4 {
            break;
        }
    }

    assert_eq!(arrivals, vec![0, 1, 2, 3]);
    assert_eq!(departures, vec![1, 2, 3, 0]);
    assert_eq!(npcs.get("courier").unwrap().current_waypoint_index(), 0);
}

#[test]
fn test_patrol_arrives_near_each_waypoint() {
    let definitions = square_world(0.2);
    let mut npcs = spawn(&definitions);
    let surface = planet();
    let ctx = SimContext::default();

    let mut previous = NpcState::Walking;
    for _ in 0..(60.0 / STEP) as usize {
        npcs.update(STEP, &ctx);
        let npc = npcs.get("courier").unwrap();
        if previous == NpcState::Walking && npc.state() == NpcState::Paused {
            let waypoint = &npc.route()[npc.current_waypoint_index()];
            let target = surface.lat_lon_to_position(waypoint.lat, waypoint.lon);
            assert!(surface.great_circle_distance(npc.position(), target) < 1.0);
        }
        assert!((npc.position().length() - 50.0).abs() < 1.0e-2);
        previous = npc.state();
    }
}

// ============================================================================
// Looking Override
// ============================================================================

#[test]
fn test_player_nearby_interrupts_walking() {
    let definitions = square_world(0.1);
    let mut npcs = spawn(&definitions);
    let quiet = SimContext::default();

    // Leave the first waypoint and get walking
    for _ in 0..30 {
        npcs.update(STEP, &quiet);
    }
    assert_eq!(npcs.get("courier").unwrap().state(), NpcState::Walking);

    let here = npcs.get("courier").unwrap().position();
    let close = SimContext::default().with_player(here + Vec3::new(0.0, 1.0, 0.0));
    npcs.update(STEP, &close);
    let npc = npcs.get("courier").unwrap();
    assert_eq!(npc.state(), NpcState::Looking);
    assert_eq!(npcs.nearest_npc().map(|npc| npc.id()), Some("courier"));

    // Stands still while looking
    let held = npc.position();
    for _ in 0..10 {
        npcs.update(STEP, &close);
    }
    assert_eq!(npcs.get("courier").unwrap().position(), held);

    npcs.update(STEP, &quiet);
    assert_eq!(npcs.get("courier").unwrap().state(), NpcState::Walking);
    assert!(npcs.nearest_npc().is_none());
}

#[test]
fn test_player_nearby_interrupts_pause() {
    let definitions = square_world(10.0);
    let mut npcs = spawn(&definitions);
    let quiet = SimContext::default();
    npcs.update(STEP, &quiet);
    assert_eq!(npcs.get("courier").unwrap().state(), NpcState::Paused);

    let here = npcs.get("courier").unwrap().position();
    npcs.update(STEP, &SimContext::default().with_player(here));
    assert_eq!(npcs.get("courier").unwrap().state(), NpcState::Looking);
}

// ============================================================================
// Pause Timing
// ============================================================================

#[test]
fn test_pause_lasts_exactly_pause_time() {
    let definitions = square_world(2.0);
    let mut npcs = spawn(&definitions);
    let ctx = SimContext::default();

    // Spawned on its first waypoint: arrives on the first update
    npcs.update(STEP, &ctx);
    assert_eq!(npcs.get("courier").unwrap().state(), NpcState::Paused);

    npcs.update(1.0, &ctx);
    let npc = npcs.get("courier").unwrap();
    assert_eq!(npc.state(), NpcState::Paused);
    assert_eq!(npc.current_waypoint(), Some("w0"));

    npcs.update(1.0, &ctx);
    let npc = npcs.get("courier").unwrap();
    assert_eq!(npc.state(), NpcState::Walking);
    assert_eq!(npc.current_waypoint(), Some("w1"));
}

// ============================================================================
// Recoveries
// ============================================================================

#[test]
fn test_unknown_route_waypoint_falls_back() {
    let waypoints = vec![WaypointDef::new("origin", 1.0, 1.0), WaypointDef::new("a", 3.0, 3.0)];
    let lost = NpcDefinition {
        id: "lost".to_string(),
        name: None,
        color: None,
        start_waypoint: "a".to_string(),
        patrol_route: vec!["a".to_string(), "atlantis".to_string()],
        speed: 1.0,
        pause_time: 1.0,
        interaction_radius: 2.0,
        turn_speed: None,
    };
    let definitions = WorldDefinitions::from_records(waypoints, vec![lost], Vec::new()).unwrap();
    let npcs = spawn(&definitions);
    let npc = npcs.get("lost").unwrap();
    assert_eq!(npc.route()[1].id, "origin");
    assert_eq!(npc.route()[1].lat, 1.0);
}

#[test]
fn test_unbound_npcs_hold_position() {
    let definitions = square_world(0.5);
    let mut npcs = NpcManager::new(NpcDefaults::default());
    npcs.spawn_all(&definitions).unwrap();
    let start = npcs.get("courier").unwrap().position();
    for _ in 0..60 {
        npcs.update(STEP, &SimContext::default().with_player(start));
    }
    let npc = npcs.get("courier").unwrap();
    assert_eq!(npc.position(), start);
    assert!(npc.position().is_finite());

    npcs.set_surface(planet());
    let npc = npcs.get("courier").unwrap();
    assert!((npc.position().length() - 50.0).abs() < 1.0e-3);
}
