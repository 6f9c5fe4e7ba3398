//! brawl-cli: run one headless match and print the outcome.
//!
//! Usage:
//!   brawl-cli <level.json> <tuning.json> [--ticks N] [--seed S] [--tick-ms MS] [--events]
//! Example:
//!   cargo run -p brawl-cli -- crates/brawl-cli/data/level1.json crates/brawl-cli/data/tuning.json --seed 7
//!
//! Both players follow the same script: head for the opponent, switch to the
//! newest picked-up weapon, and attack when close or when a ranged weapon
//! has a clear line of sight. `RUST_LOG` controls log verbosity (default
//! `info`). `--events` writes every event to stdout as one JSON line.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use brawl_core::config::{LevelDef, Tuning};
use brawl_core::entity::{Actor, EntityId, Side};
use brawl_core::simulation::{ActorInput, Simulation};
use brawl_core::weapon::WeaponClass;
use brawl_core::Millis;
use clap::Parser;
use glam::Vec2;
use tracing::{debug, info};
use walkmap::line_of_sight;

/// Distance at which melee swings start.
const MELEE_RANGE: f32 = 80.0;
/// Distance at which ranged weapons open fire.
const FIRE_RANGE: f32 = 450.0;

/// Run one headless match between two scripted players.
#[derive(Debug, Parser)]
#[command(name = "brawl-cli", version, about)]
struct Args {
    /// Level document (JSON).
    #[arg(value_name = "LEVEL")]
    level: PathBuf,
    /// Tuning document (JSON).
    #[arg(value_name = "TUNING")]
    tuning: PathBuf,
    /// Maximum number of ticks to run.
    #[arg(long, value_name = "COUNT", default_value_t = 3_600)]
    ticks: u64,
    /// Master seed for level population.
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    seed: u64,
    /// Milliseconds between ticks.
    #[arg(
        long = "tick-ms",
        value_name = "MILLISECONDS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    tick_ms: Millis,
    /// Write every event to stdout as one JSON line.
    #[arg(long)]
    events: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

/// Scripted input for `me` chasing `them`.
fn chase(sim: &Simulation, me: &Actor, them: &Actor) -> ActorInput {
    let delta: Vec2 = them.center() - me.center();
    let distance = delta.length();

    let newest = me.inventory.len().saturating_sub(1);
    let holding_newest = me
        .inventory
        .weapons()
        .get(newest)
        .zip(me.inventory.active())
        .is_some_and(|(last, active)| last.kind() == active.kind());
    let ranged = me
        .inventory
        .active()
        .is_some_and(|w| w.kind().class() != WeaponClass::Melee);

    let attack = if ranged {
        distance < FIRE_RANGE && line_of_sight(sim.surface(), me.center(), them.center())
    } else {
        distance < MELEE_RANGE
    };

    ActorInput {
        left: delta.x < -1.0,
        right: delta.x > 1.0,
        up: delta.y < -1.0,
        down: delta.y > 1.0,
        attack,
        cycle: i8::from(!holding_newest),
        drop: false,
    }
}

fn script(sim: &Simulation) -> BTreeMap<EntityId, ActorInput> {
    let arena = sim.arena();
    Side::ALL
        .into_iter()
        .filter_map(|side| {
            let me = arena.player(side)?;
            let them = arena.player(side.opponent())?;
            Some((me.id(), chase(sim, me, them)))
        })
        .collect()
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let level_text = fs::read_to_string(&args.level)
        .with_context(|| format!("read level {}", args.level.display()))?;
    let tuning_text = fs::read_to_string(&args.tuning)
        .with_context(|| format!("read tuning {}", args.tuning.display()))?;
    let level = LevelDef::from_json(&level_text)
        .with_context(|| format!("parse level {}", args.level.display()))?;
    let tuning = Tuning::from_json(&tuning_text)
        .with_context(|| format!("parse tuning {}", args.tuning.display()))?;
    let profile = tuning
        .profiles()
        .next()
        .map(str::to_owned)
        .context("tuning has no player profiles")?;

    let mut sim = Simulation::from_level(&level, tuning, [profile.as_str(), profile.as_str()], args.seed)
        .context("build simulation")?;
    let population = sim.populate(0);
    info!(
        seed = args.seed,
        weapons = population.weapons.len(),
        enemies = population.enemies.len(),
        "match start"
    );

    for t in 1..=args.ticks {
        let now = t * args.tick_ms;
        let inputs = script(&sim);
        for event in sim.step(now, &inputs) {
            debug!(now, ?event, "event");
            if args.events {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        if sim.outcome().is_some() {
            break;
        }
    }

    match sim.outcome() {
        Some(outcome) => println!("{outcome} after {} ticks", sim.tick()),
        None => println!("no winner after {} ticks", sim.tick()),
    }
    Ok(())
}
