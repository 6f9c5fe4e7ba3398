//! Per-phase behaviour of the simulation.
//!
//! Each plugin is a set of plain functions run by
//! [`Simulation::step`](crate::simulation::Simulation::step) at a fixed point
//! of the tick:
//!
//! - [`weapon`]: turns attack intents into hits and launches
//! - [`movement`]: validates player moves and steers enemies
//! - [`perception`]: enemy state machine (sight, memory, idle)
//! - [`projectile`]: updates and collides every live projectile
//!
//! # Architecture
//!
//! Plugins read a start-of-phase snapshot ([`ActorView`](crate::entity::ActorView)s)
//! and emit [`Modifier`](crate::output::Modifier)s as proposals. Only the
//! resolvers turn those into damage, stuns and displacement.

pub mod movement;
pub mod perception;
pub mod projectile;
pub mod weapon;

pub use movement::{input_delta, steer, try_move};
pub use perception::{perceive, Perception};
pub use weapon::{strike, Attacker, Strike};
