//! Load-time errors.
//!
//! Everything that can go wrong happens before the first tick: malformed
//! tuning, a weapon type without stats, an unusable level layout. The tick
//! loop itself never fails.

use crate::weapon::WeaponKind;

/// Failure to turn tuning or level documents into a runnable simulation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A weapon type is listed (or required) but has no stats entry.
    #[error("no stats configured for weapon type `{0}`")]
    MissingWeapon(WeaponKind),

    /// The `projectile` object of a weapon type does not parse.
    #[error("invalid projectile parameters for `{kind}`: {source}")]
    InvalidProjectile {
        /// Weapon type whose parameters failed
        kind: WeaponKind,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// A projectile parameter has an unusable value.
    #[error("invalid projectile parameters for `{kind}`: {reason}")]
    InvalidParameter {
        /// Weapon type whose parameters failed
        kind: WeaponKind,
        /// What is wrong
        reason: &'static str,
    },

    /// A `[min, max]` range is inverted or starts below its allowed minimum.
    #[error("invalid range for {field}: [{min}, {max}]")]
    InvalidRange {
        /// Dotted field name
        field: &'static str,
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },

    /// A player or enemy stat has an unusable value.
    #[error("invalid value for {field}: {reason}")]
    InvalidStat {
        /// Dotted field name
        field: String,
        /// What is wrong
        reason: &'static str,
    },

    /// A player profile allows no weapons at all.
    #[error("player profile `{0}` must allow at least one weapon")]
    InvalidInventoryLimit(String),

    /// A requested player profile is not configured.
    #[error("unknown player profile `{0}`")]
    UnknownProfile(String),

    /// The level's walkability layout is unusable.
    #[error("invalid level surface: {0}")]
    Surface(#[from] walkmap::SurfaceError),
}
