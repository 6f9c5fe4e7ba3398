//! Crate-level tests that drive the full simulation.
//!
//! - **Determinism tests**: same seed and inputs give the same match
//! - **Scenario tests**: end-to-end combat, movement and inventory flows
//! - **Helper functions**: tuning fixtures and input shorthands
//!
//! # Test Structure
//!
//! - `determinism.rs`: replay and population reproducibility
//! - `scenarios.rs`: one module per mechanic
//! - `helpers.rs`: test setup utilities and factory functions

mod helpers;
mod scenarios;

// Re-export for convenience
pub use helpers::*;
