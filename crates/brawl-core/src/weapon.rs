//! Weapon types, per-type parameters and cooldown state.
//!
//! A [`WeaponSpec`] is the immutable, resolved tuning for one weapon type.
//! A [`Weapon`] is a held or ground-placed instance of that spec with its own
//! cooldown timestamp.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Millis;

/// Weapon type tag as it appears in tuning files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Bare hands; every player starts with one and cannot drop it
    Fist,
    /// Blunt melee
    Bat,
    /// Blade melee
    Knife,
    /// Spread-fire
    Shotgun,
    /// Spiralling throw that returns to its owner
    Boomerang,
    /// Straight throw that stuns and pulls on hit
    Yoyo,
    /// Delayed incendiary area effect
    Molotov,
}

impl WeaponKind {
    /// Every weapon type.
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::Fist,
        WeaponKind::Bat,
        WeaponKind::Knife,
        WeaponKind::Shotgun,
        WeaponKind::Boomerang,
        WeaponKind::Yoyo,
        WeaponKind::Molotov,
    ];

    /// The behaviour family this type belongs to.
    #[must_use]
    pub const fn class(self) -> WeaponClass {
        match self {
            Self::Fist | Self::Bat | Self::Knife => WeaponClass::Melee,
            Self::Shotgun => WeaponClass::Spread,
            Self::Boomerang => WeaponClass::Boomerang,
            Self::Yoyo => WeaponClass::Yoyo,
            Self::Molotov => WeaponClass::Incendiary,
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fist => "fist",
            Self::Bat => "bat",
            Self::Knife => "knife",
            Self::Shotgun => "shotgun",
            Self::Boomerang => "boomerang",
            Self::Yoyo => "yoyo",
            Self::Molotov => "molotov",
        };
        f.write_str(name)
    }
}

/// Behaviour family of a weapon type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WeaponClass {
    /// Instant forward hit-box
    Melee,
    /// Fan of straight bullets
    Spread,
    /// Returning spiral projectile
    Boomerang,
    /// Outgoing/returning stun projectile
    Yoyo,
    /// Timed area effect
    Incendiary,
}

// =============================================================================
// Projectile parameters
// =============================================================================

/// Melee hit-box parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeParams {
    /// Distance from the attacker's box to the hit-box along facing
    pub offset: f32,
}

impl Default for MeleeParams {
    fn default() -> Self {
        Self { offset: 40.0 }
    }
}

/// Spread-fire parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadParams {
    /// Offsets from facing, one bullet each, in degrees
    pub spread_angles: Vec<f32>,
    /// Bullet speed per tick
    pub speed: f32,
    /// Bullet box size
    pub size: Vec2,
    /// Optional bullet lifetime
    pub max_lifetime: Option<Millis>,
    /// Remove bullets that leave the world
    pub despawn_out_of_bounds: bool,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            spread_angles: vec![-20.0, -7.0, 7.0, 20.0],
            speed: 10.0,
            size: Vec2::new(5.0, 5.0),
            max_lifetime: None,
            despawn_out_of_bounds: true,
        }
    }
}

/// Boomerang parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoomerangParams {
    /// Drift speed outbound and homing speed returning
    pub speed: f32,
    /// Box size
    pub size: Vec2,
    /// Length of the outbound phase
    pub max_time: Millis,
    /// Spiral angle advance per tick, radians
    pub angular_speed: f32,
    /// Spiral radius growth per tick
    pub radius_step: f32,
    /// Minimum time between hits on the same target
    pub hit_interval: Millis,
    /// Distance to the owner at which the boomerang is caught
    pub return_threshold: f32,
}

impl Default for BoomerangParams {
    fn default() -> Self {
        Self {
            speed: 5.0,
            size: Vec2::new(35.0, 35.0),
            max_time: 1_500,
            angular_speed: 0.2,
            radius_step: 1.0,
            hit_interval: 100,
            return_threshold: 15.0,
        }
    }
}

/// Yo-yo parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoyoParams {
    /// Speed per tick in both directions
    pub speed: f32,
    /// Box size
    pub size: Vec2,
    /// Outgoing travel before turning back unhit
    pub max_distance: f32,
    /// Stun applied on hit
    pub stun_duration: Millis,
    /// Length of the pull toward the owner on hit
    pub pull_speed: f32,
}

impl Default for YoyoParams {
    fn default() -> Self {
        Self {
            speed: 10.0,
            size: Vec2::new(30.0, 30.0),
            max_distance: 200.0,
            stun_duration: 1_200,
            pull_speed: 30.0,
        }
    }
}

/// Incendiary area-effect parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncendiaryParams {
    /// Delay between throw and explosion
    pub explosion_delay: Millis,
    /// Burn phase length after the explosion
    pub fire_duration: Millis,
    /// Effect radius around the impact point
    pub radius: f32,
    /// Time between burn ticks
    pub burn_interval: Millis,
    /// Damage dealt once on explosion
    pub explosion_damage: i32,
    /// Damage dealt on each burn tick
    pub burn_damage: i32,
    /// Impact point distance from the thrower along facing
    pub throw_distance: f32,
}

impl Default for IncendiaryParams {
    fn default() -> Self {
        Self {
            explosion_delay: 800,
            fire_duration: 3_000,
            radius: 100.0,
            burn_interval: 300,
            explosion_damage: 5,
            burn_damage: 1,
            throw_distance: 0.0,
        }
    }
}

/// Typed parameters for one weapon class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileParams {
    /// Melee hit-box
    Melee(MeleeParams),
    /// Spread-fire bullets
    Spread(SpreadParams),
    /// Boomerang
    Boomerang(BoomerangParams),
    /// Yo-yo
    Yoyo(YoyoParams),
    /// Incendiary
    Incendiary(IncendiaryParams),
}

impl ProjectileParams {
    /// Default parameters for `kind`'s class.
    #[must_use]
    pub fn default_for(kind: WeaponKind) -> Self {
        match kind.class() {
            WeaponClass::Melee => Self::Melee(MeleeParams::default()),
            WeaponClass::Spread => Self::Spread(SpreadParams::default()),
            WeaponClass::Boomerang => Self::Boomerang(BoomerangParams::default()),
            WeaponClass::Yoyo => Self::Yoyo(YoyoParams::default()),
            WeaponClass::Incendiary => Self::Incendiary(IncendiaryParams::default()),
        }
    }
}

// =============================================================================
// Weapon
// =============================================================================

/// Resolved tuning for one weapon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Type tag
    pub kind: WeaponKind,
    /// Display name, carried for front ends
    pub name: Option<String>,
    /// Damage per hit
    pub damage: i32,
    /// Minimum time between attacks
    pub cooldown: Millis,
    /// Class-specific parameters
    pub params: ProjectileParams,
}

/// A weapon instance with its own cooldown.
///
/// # Example
///
/// ```
/// use brawl_core::weapon::{ProjectileParams, Weapon, WeaponKind, WeaponSpec};
///
/// let mut bat = Weapon::new(WeaponSpec {
///     kind: WeaponKind::Bat,
///     name: None,
///     damage: 3,
///     cooldown: 500,
///     params: ProjectileParams::default_for(WeaponKind::Bat),
/// });
///
/// assert!(bat.try_use(0));
/// assert!(!bat.try_use(499));
/// assert!(bat.try_use(500));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    spec: WeaponSpec,
    last_used: Option<Millis>,
}

impl Weapon {
    /// Creates a weapon that is ready immediately.
    #[must_use]
    pub const fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            last_used: None,
        }
    }

    /// Type tag.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.spec.kind
    }

    /// Resolved tuning.
    #[must_use]
    pub const fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    /// Timestamp of the last successful attack.
    #[must_use]
    pub const fn last_used(&self) -> Option<Millis> {
        self.last_used
    }

    /// Returns true if the cooldown has elapsed at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Millis) -> bool {
        self.last_used
            .map_or(true, |last| now.saturating_sub(last) >= self.spec.cooldown)
    }

    /// Consumes the cooldown if ready. Returns false (and changes nothing)
    /// while cooling down.
    pub fn try_use(&mut self, now: Millis) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_used = Some(now);
        true
    }
}
