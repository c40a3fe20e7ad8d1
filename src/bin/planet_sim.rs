//! Headless Planet Simulation
//!
//! Run with: `cargo run --bin planet_sim -- [--config config.json] [--world world.json] [--steps N]`
//!
//! Loads the world (built-in data unless JSON paths are given), walks the
//! player around the planet with a scripted intent and logs what happens.
//! Set `RUST_LOG=debug` to see NPC state changes.
//!
//! Script:
//! - Walks forward, running for every other 4 seconds
//! - Slowly swings the view heading so the route curves around the village
//! - Presses interact whenever something is in range

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use postal_planet_engine::game::{GameConfig, PlanetWorld, WorldDefinitions};
use postal_planet_engine::input::{MovementIntent, ScriptedIntent};

/// Simulated frame delta (60 Hz)
const FRAME_DELTA: f32 = 1.0 / 60.0;

/// View heading swing rate in radians per second
const VIEW_SWING_RATE: f32 = 0.15;

/// Headless planet walk
#[derive(Parser, Debug)]
#[command(name = "planet_sim")]
#[command(about = "Walk the player around the planet and log what happens")]
struct Args {
    /// Game config JSON; fields it omits keep their defaults
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// World definitions JSON (defaults to the built-in world)
    #[arg(long, short = 'w')]
    world: Option<PathBuf>,

    /// Number of 60 Hz frames to simulate
    #[arg(long, short = 's', default_value_t = 3600)]
    steps: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let definitions = match &args.world {
        Some(path) => WorldDefinitions::load(path)?,
        None => WorldDefinitions::builtin()?,
    };
    let mut world = PlanetWorld::new(config, &definitions)?;

    let mut input = ScriptedIntent::new(MovementIntent::forward(false));
    let mut conversations = 0usize;

    for frame in 0..args.steps {
        let time = frame as f32 * FRAME_DELTA;
        let running = (time / 4.0) as u32 % 2 == 1;
        input.intent = MovementIntent::new(Vec2::Y, running);
        world.player_mut().set_view_heading(time * VIEW_SWING_RATE);

        let report = world.tick(FRAME_DELTA, &mut input);

        if let Some(target) = &report.player.interaction {
            conversations += 1;
            tracing::info!(%target, time, "player interacted");
        } else if report.player.nearby.is_some() {
            input.press_interact();
        }
        if report.player.collided {
            tracing::debug!(time, "player slid along an obstacle");
        }
        if let Some(push) = report.position_push {
            tracing::info!(
                lat = push.lat,
                lon = push.lon,
                speed = world.player().current_speed(),
                nearest_npc = report.nearest_npc.as_deref().unwrap_or("-"),
                "player position"
            );
        }
    }

    let (lat, lon) = world.surface().position_to_lat_lon(world.player().get_position());
    tracing::info!(
        steps = args.steps,
        seconds = world.elapsed(),
        lat,
        lon,
        conversations,
        "simulation finished"
    );
    for npc in world.npcs().iter() {
        tracing::info!(
            npc = %npc.id(),
            state = npc.state().name(),
            waypoint = npc.current_waypoint().unwrap_or("-"),
            "npc final state"
        );
    }

    world.unload();
    Ok(())
}
