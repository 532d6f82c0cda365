#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! Headless dev harness for the simulation core.
//!
//! There is no content loader or command vocabulary here -- both are
//! external collaborators. This binary exists so the tick pipeline, RNG
//! determinism, and save/load round trip can be exercised by hand without
//! wiring up a renderer.

use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use uuid::Uuid;

use emberreach_core::entity::Stats;
use emberreach_core::player::Player;
use emberreach_core::snapshot;
use emberreach_core::world::World;

const TICK_SECONDS: f64 = 1.0;
const WARMUP_TICKS: u32 = 60;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    info!("starting emberreach_core dev harness");

    let player = Player::new(Uuid::new_v4(), "Ash", "warrior", Uuid::new_v4(), Uuid::new_v4(), Stats::default());
    let mut world = World::new("dev-harness", player, 1);

    for _ in 0..WARMUP_TICKS {
        world.tick(TICK_SECONDS);
    }
    info!("ran {WARMUP_TICKS} ticks at {TICK_SECONDS}s each, world clock now at {:.1}s", world.now());

    let dir = snapshot::save_dir_for_slug(&world.world_slug);
    let path = snapshot::save(&world, &dir, "autosave").context("saving dev-harness world")?;
    info!("wrote snapshot to {}", path.display());

    let reloaded = snapshot::load(&path).context("reloading dev-harness world")?;
    info!("reloaded world '{}' at clock {:.1}s", reloaded.world_slug, reloaded.now());

    Ok(())
}
