//! Test helper functions for setting up simulations and actors.
//!
//! This module provides tuning fixtures, simulation factories and input
//! shorthands shared by the scenario and determinism tests.

use std::collections::BTreeMap;

use glam::Vec2;
use walkmap::{WalkGrid, Walkability};

use crate::config::{LevelDef, Tuning};
use crate::entity::{EntityId, Side};
use crate::output::Event;
use crate::simulation::{ActorInput, Simulation};
use crate::Millis;

/// Milliseconds between test ticks.
pub const TICK_MS: Millis = 16;

// =============================================================================
// Fixtures
// =============================================================================

/// Tuning document with stats for every weapon type, listing only `types`.
///
/// One profile, `default`: speed 5, health 30, three inventory slots.
pub fn tuning_json(types: &[&str]) -> String {
    let types = types
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"{{
            "player_stats": {{
                "default": {{ "speed": 5, "health": 30, "inventory_limit": 3 }}
            }},
            "enemy": {{
                "speed": 2, "health_range": [5, 10], "damage": 1, "attack_delay": 1000,
                "min_spawn_distance": 200, "vision_range": 300
            }},
            "weapons": {{
                "types": [{types}],
                "stats": {{
                    "fist": {{ "damage": 1, "cooldown": 300 }},
                    "bat": {{ "damage": 3, "cooldown": 500 }},
                    "knife": {{ "damage": 2, "cooldown": 300 }},
                    "shotgun": {{ "damage": 2, "cooldown": 800,
                                  "projectile": {{ "spread_angles": [-20, -7, 7, 20] }} }},
                    "boomerang": {{ "damage": 2, "cooldown": 1000 }},
                    "yoyo": {{ "damage": 2, "cooldown": 100 }},
                    "molotov": {{ "damage": 0, "cooldown": 2000,
                                  "projectile": {{ "explosion_damage": 5, "burn_damage": 1 }} }}
                }}
            }}
        }}"#
    )
}

/// Resolved tuning for `types`.
pub fn tuning(types: &[&str]) -> Tuning {
    Tuning::from_json(&tuning_json(types)).unwrap()
}

/// Every weapon type.
pub const ALL_TYPES: [&str; 7] = ["fist", "bat", "knife", "shotgun", "boomerang", "yoyo", "molotov"];

/// An empty simulation over an open 1000x1000 world (fist only).
pub fn open_sim(seed: u64) -> Simulation {
    sim_on(WalkGrid::open(100, 100, 10.0).unwrap(), &["fist"], seed)
}

/// An empty simulation over `grid` with every weapon type configured.
pub fn armed_sim(grid: WalkGrid, seed: u64) -> Simulation {
    sim_on(grid, &ALL_TYPES, seed)
}

fn sim_on(grid: WalkGrid, types: &[&str], seed: u64) -> Simulation {
    let bounds = grid.bounds();
    Simulation::new(grid, bounds, tuning(types), seed)
}

/// Spawns both players at the given top-left corners.
pub fn duel(sim: &mut Simulation, one: Vec2, two: Vec2) -> (EntityId, EntityId) {
    let a = sim.spawn_player(Side::One, "default", one).unwrap();
    let b = sim.spawn_player(Side::Two, "default", two).unwrap();
    (a, b)
}

/// An 800x600 level with a wall block in the middle.
pub fn walled_level() -> LevelDef {
    let layout: Vec<String> = (0..15)
        .map(|row| {
            (0..20)
                .map(|col| {
                    if (6..9).contains(&row) && (9..11).contains(&col) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();
    LevelDef {
        world_size: Vec2::new(800.0, 600.0),
        player_spawn: crate::config::PlayerSpawn {
            player1: Vec2::new(60.0, 280.0),
            player2: Vec2::new(700.0, 280.0),
        },
        background_color: None,
        layout,
        cell_size: 40.0,
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Walk input for a per-axis direction (`-1`, `0` or `1` each).
pub fn walk(dx: i8, dy: i8) -> ActorInput {
    ActorInput {
        left: dx < 0,
        right: dx > 0,
        up: dy < 0,
        down: dy > 0,
        ..ActorInput::default()
    }
}

/// Attack without moving.
pub fn attack() -> ActorInput {
    ActorInput {
        attack: true,
        ..ActorInput::default()
    }
}

/// Input map for one actor.
pub fn only(id: EntityId, input: ActorInput) -> BTreeMap<EntityId, ActorInput> {
    BTreeMap::from([(id, input)])
}

// =============================================================================
// Running
// =============================================================================

/// Steps `ticks` times from tick index `from`, with inputs chosen per tick.
///
/// Returns every `(now, event)` pair in order.
pub fn run<F>(sim: &mut Simulation, from: u64, ticks: u64, mut inputs: F) -> Vec<(Millis, Event)>
where
    F: FnMut(Millis) -> BTreeMap<EntityId, ActorInput>,
{
    let mut out = Vec::new();
    for t in from..from + ticks {
        let now = t * TICK_MS;
        let step_inputs = inputs(now);
        out.extend(sim.step(now, &step_inputs).into_iter().map(|e| (now, e)));
    }
    out
}

/// Hit points of an actor, if still present.
pub fn hp(sim: &Simulation, id: EntityId) -> Option<i32> {
    sim.arena().actor(id).map(|a| a.health.hp)
}

/// Top-left corner of an actor, if still present.
pub fn position(sim: &Simulation, id: EntityId) -> Option<Vec2> {
    sim.arena().actor(id).map(|a| a.rect().pos)
}
