//! # Brawl Core
//!
//! Deterministic tick-based combat simulation for top-down brawler arenas.
//!
//! Two player sides and any number of hostile enemies move over a static
//! walkability surface, pick up weapons and trade damage through melee
//! hit-boxes, bullets, boomerangs, yo-yos and incendiary area effects until
//! one side is eliminated.
//!
//! ## Architecture
//!
//! One [`Simulation::step`](simulation::Simulation::step) runs a fixed phase
//! order:
//!
//! 1. **Intents**: stun expiry, weapon cycle/drop, attacks
//! 2. **Movement**: player input, pickup, enemy perception and steering
//! 3. **Projectiles**: update then collide against a start-of-phase snapshot
//! 4. **Resolution**: [`Modifier`](output::Modifier)s routed to
//!    [`Resolver`](resolver::Resolver)s, then cleanup of dead and finished
//!    objects
//! 5. **Outcome**: the edge-triggered winner signal
//!
//! - **Entities**: players and enemies ([`entity`]), ground weapons and
//!   projectiles ([`arena`], [`projectile`])
//! - **Plugins**: per-phase behaviour functions ([`plugins`])
//! - **Resolvers**: the only code that applies damage or removes objects
//!   ([`resolver`])
//!
//! ## Usage
//!
//! ```
//! use brawl_core::config::{LevelDef, Tuning};
//! use brawl_core::simulation::Simulation;
//! use std::collections::BTreeMap;
//!
//! let level = LevelDef::from_json(r#"{
//!     "world_size": [200, 100],
//!     "player_spawn": { "player1": [10, 30], "player2": [150, 30] },
//!     "layout": ["....", "...."],
//!     "cell_size": 50
//! }"#).unwrap();
//! let tuning = Tuning::from_json(r#"{
//!     "player_stats": { "default": { "speed": 5, "health": 30, "inventory_limit": 3 } },
//!     "enemy": {
//!         "speed": 2, "health_range": [5, 10], "damage": 1, "attack_delay": 1000,
//!         "min_spawn_distance": 200, "vision_range": 300
//!     },
//!     "weapons": { "types": ["fist"], "stats": { "fist": { "damage": 1, "cooldown": 300 } } }
//! }"#).unwrap();
//!
//! let mut sim = Simulation::from_level(&level, tuning, ["default", "default"], 42).unwrap();
//! let events = sim.step(16, &BTreeMap::new());
//! assert!(events.is_empty());
//! assert_eq!(sim.tick(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export walkmap for surface queries
pub use walkmap;

pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod geom;
pub mod output;
pub mod plugins;
pub mod projectile;
pub mod resolver;
pub mod simulation;
pub mod spawn;
pub mod weapon;

#[cfg(test)]
mod tests;

/// Wall-clock timestamp or duration in milliseconds.
///
/// Sampled once per tick by the caller and passed to
/// [`Simulation::step`](simulation::Simulation::step); every timer in the
/// crate compares against it.
pub type Millis = u64;
