//! Tuning and level documents.
//!
//! Both are plain JSON read once before the simulation starts:
//!
//! - [`TuningConfig`] mirrors the tuning file. [`TuningConfig::resolve`]
//!   validates it and produces an immutable [`Tuning`] with one typed
//!   [`WeaponSpec`] per weapon type.
//! - [`LevelDef`] describes one arena: world size, spawn points and an
//!   ASCII walkability layout.
//!
//! # Example
//!
//! ```
//! use brawl_core::config::TuningConfig;
//! use brawl_core::weapon::WeaponKind;
//!
//! let tuning = TuningConfig::from_json(r#"{
//!     "player_stats": { "default": { "speed": 5, "health": 30, "inventory_limit": 3 } },
//!     "enemy": {
//!         "speed": 2, "health_range": [5, 10], "damage": 1, "attack_delay": 1000,
//!         "min_spawn_distance": 200, "vision_range": 300
//!     },
//!     "weapons": {
//!         "types": ["fist", "shotgun"],
//!         "stats": {
//!             "fist": { "damage": 1, "cooldown": 300 },
//!             "shotgun": { "damage": 2, "cooldown": 800, "projectile": { "speed": 12 } }
//!         }
//!     }
//! }"#).unwrap().resolve().unwrap();
//!
//! assert_eq!(tuning.weapon(WeaponKind::Shotgun).map(|w| w.damage), Some(2));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use walkmap::{Rect, WalkGrid};

use crate::error::ConfigError;
use crate::weapon::{
    BoomerangParams, IncendiaryParams, MeleeParams, ProjectileParams, SpreadParams, WeaponClass,
    WeaponKind, WeaponSpec, YoyoParams,
};
use crate::Millis;

// =============================================================================
// Tuning file
// =============================================================================

/// Per-profile player stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Movement per tick on each axis
    pub speed: f32,
    /// Starting hit points
    pub health: i32,
    /// Maximum number of held weapons, fist included
    pub inventory_limit: usize,
    /// Body size
    #[serde(default = "default_actor_size")]
    pub size: Vec2,
    /// Display colour, carried for front ends
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

/// Enemy tuning shared by every enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Steering speed per tick
    pub speed: f32,
    /// Inclusive `[min, max]` range for the starting health roll
    pub health_range: [i32; 2],
    /// Contact damage
    pub damage: i32,
    /// Time that must strictly pass between contact attacks
    pub attack_delay: Millis,
    /// Minimum spawn distance from any player
    pub min_spawn_distance: f32,
    /// Maximum distance at which a player can be seen
    pub vision_range: f32,
    /// How long a sighting stays usable
    #[serde(default = "default_memory_ms")]
    pub memory_ms: Millis,
    /// Body size
    #[serde(default = "default_actor_size")]
    pub size: Vec2,
}

/// Stats entry for one weapon type, before class-specific parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStatsConfig {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Damage per hit
    pub damage: i32,
    /// Minimum time between attacks
    pub cooldown: Millis,
    /// Class-specific parameters; omitted fields take defaults
    #[serde(default)]
    pub projectile: Option<serde_json::Value>,
}

/// The `weapons` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponsConfig {
    /// Weapon types present in the game
    pub types: Vec<WeaponKind>,
    /// Stats per type
    pub stats: BTreeMap<WeaponKind, WeaponStatsConfig>,
}

/// Level population settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Inclusive range for the number of ground weapons
    pub weapon_count: [u32; 2],
    /// Placement attempts per ground weapon
    pub weapon_attempts: u32,
    /// Inclusive range for the number of enemies guarding each weapon
    pub enemies_per_weapon: [u32; 2],
    /// Placement attempts per enemy
    pub enemy_attempts: u32,
    /// Border kept free of ground weapons
    pub margin: f32,
    /// Inflation applied to weapons and players when checking weapon clearance
    pub clearance: f32,
    /// Ground weapon box size
    pub weapon_size: Vec2,
    /// Maximum enemy offset from its weapon on each axis
    pub enemy_offset: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            weapon_count: [3, 20],
            weapon_attempts: 100,
            enemies_per_weapon: [1, 3],
            enemy_attempts: 30,
            margin: 32.0,
            clearance: 100.0,
            weapon_size: Vec2::new(32.0, 32.0),
            enemy_offset: 80.0,
        }
    }
}

/// The tuning document as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Player profiles by name
    pub player_stats: BTreeMap<String, PlayerStats>,
    /// Enemy tuning
    pub enemy: EnemySpec,
    /// Weapon types and stats
    pub weapons: WeaponsConfig,
    /// Level population
    #[serde(default)]
    pub spawn: SpawnSettings,
    /// How long a dropped weapon ignores the actor that dropped it
    #[serde(default = "default_drop_repickup_ms")]
    pub drop_repickup_ms: Millis,
}

fn default_actor_size() -> Vec2 {
    Vec2::new(40.0, 40.0)
}

const fn default_memory_ms() -> Millis {
    15_000
}

const fn default_drop_repickup_ms() -> Millis {
    1_000
}

impl TuningConfig {
    /// Parses a tuning document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or missing fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates the document and resolves typed weapon specs.
    ///
    /// # Errors
    ///
    /// Fails when a listed weapon type (or the fist) has no stats, when its
    /// `projectile` object does not parse or holds an unusable value, when
    /// a damage is negative, when a range is inverted or an enemy could
    /// spawn without health, or when a player profile has no health,
    /// negative speed or no inventory room.
    pub fn resolve(self) -> Result<Tuning, ConfigError> {
        check_range("enemy.health_range", self.enemy.health_range.map(i64::from))?;
        check_range("spawn.weapon_count", self.spawn.weapon_count.map(i64::from))?;
        check_range(
            "spawn.enemies_per_weapon",
            self.spawn.enemies_per_weapon.map(i64::from),
        )?;
        if self.enemy.health_range[0] <= 0 {
            let [min, max] = self.enemy.health_range.map(i64::from);
            return Err(ConfigError::InvalidRange {
                field: "enemy.health_range",
                min,
                max,
            });
        }
        check_stat("enemy.speed", self.enemy.speed < 0.0, "must not be negative")?;
        check_stat("enemy.damage", self.enemy.damage < 0, "must not be negative")?;
        for (profile, stats) in &self.player_stats {
            if stats.inventory_limit == 0 {
                return Err(ConfigError::InvalidInventoryLimit(profile.clone()));
            }
            check_stat(
                format!("player_stats.{profile}.health"),
                stats.health <= 0,
                "must be positive",
            )?;
            check_stat(
                format!("player_stats.{profile}.speed"),
                stats.speed < 0.0,
                "must not be negative",
            )?;
        }

        let mut kinds = self.weapons.types.clone();
        if !kinds.contains(&WeaponKind::Fist) {
            kinds.push(WeaponKind::Fist);
        }

        let mut weapons = BTreeMap::new();
        for kind in kinds {
            let stats = self
                .weapons
                .stats
                .get(&kind)
                .ok_or(ConfigError::MissingWeapon(kind))?;
            if stats.damage < 0 {
                return Err(ConfigError::InvalidParameter {
                    kind,
                    reason: "damage must not be negative",
                });
            }
            let params = parse_params(kind, stats.projectile.clone())?;
            check_params(kind, &params)?;
            weapons.insert(
                kind,
                WeaponSpec {
                    kind,
                    name: stats.name.clone(),
                    damage: stats.damage,
                    cooldown: stats.cooldown,
                    params,
                },
            );
        }

        tracing::debug!(weapons = weapons.len(), profiles = self.player_stats.len(), "tuning resolved");

        Ok(Tuning {
            players: self.player_stats,
            enemy: self.enemy,
            weapons,
            spawn: self.spawn,
            drop_repickup_ms: self.drop_repickup_ms,
        })
    }
}

fn check_range(field: &'static str, [min, max]: [i64; 2]) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { field, min, max });
    }
    Ok(())
}

fn check_stat(field: impl Into<String>, bad: bool, reason: &'static str) -> Result<(), ConfigError> {
    if bad {
        return Err(ConfigError::InvalidStat {
            field: field.into(),
            reason,
        });
    }
    Ok(())
}

fn parse_params(
    kind: WeaponKind,
    value: Option<serde_json::Value>,
) -> Result<ProjectileParams, ConfigError> {
    let value = value.unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    let invalid = |source| ConfigError::InvalidProjectile { kind, source };
    let params = match kind.class() {
        WeaponClass::Melee => {
            ProjectileParams::Melee(serde_json::from_value::<MeleeParams>(value).map_err(invalid)?)
        }
        WeaponClass::Spread => {
            ProjectileParams::Spread(serde_json::from_value::<SpreadParams>(value).map_err(invalid)?)
        }
        WeaponClass::Boomerang => ProjectileParams::Boomerang(
            serde_json::from_value::<BoomerangParams>(value).map_err(invalid)?,
        ),
        WeaponClass::Yoyo => {
            ProjectileParams::Yoyo(serde_json::from_value::<YoyoParams>(value).map_err(invalid)?)
        }
        WeaponClass::Incendiary => ProjectileParams::Incendiary(
            serde_json::from_value::<IncendiaryParams>(value).map_err(invalid)?,
        ),
    };
    Ok(params)
}

fn check_params(kind: WeaponKind, params: &ProjectileParams) -> Result<(), ConfigError> {
    let reason = match params {
        ProjectileParams::Spread(p) if p.spread_angles.is_empty() => Some("spread_angles is empty"),
        ProjectileParams::Boomerang(p) if p.hit_interval == 0 => Some("hit_interval must be positive"),
        ProjectileParams::Incendiary(p) if p.burn_interval == 0 => {
            Some("burn_interval must be positive")
        }
        ProjectileParams::Incendiary(p) if p.explosion_damage < 0 || p.burn_damage < 0 => {
            Some("explosion_damage and burn_damage must not be negative")
        }
        _ => None,
    };
    reason.map_or(Ok(()), |reason| Err(ConfigError::InvalidParameter { kind, reason }))
}

/// Validated, immutable tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    players: BTreeMap<String, PlayerStats>,
    enemy: EnemySpec,
    weapons: BTreeMap<WeaponKind, WeaponSpec>,
    spawn: SpawnSettings,
    drop_repickup_ms: Millis,
}

impl Tuning {
    /// Parses and resolves a tuning document in one go.
    ///
    /// # Errors
    ///
    /// See [`TuningConfig::from_json`] and [`TuningConfig::resolve`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        TuningConfig::from_json(text)?.resolve()
    }

    /// Stats for a player profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] if the profile is not configured.
    pub fn player(&self, profile: &str) -> Result<&PlayerStats, ConfigError> {
        self.players
            .get(profile)
            .ok_or_else(|| ConfigError::UnknownProfile(profile.to_owned()))
    }

    /// Configured profile names in sorted order.
    pub fn profiles(&self) -> impl Iterator<Item = &str> + '_ {
        self.players.keys().map(String::as_str)
    }

    /// Enemy tuning.
    #[must_use]
    pub const fn enemy(&self) -> &EnemySpec {
        &self.enemy
    }

    /// Spec for a weapon type, if configured.
    #[must_use]
    pub fn weapon(&self, kind: WeaponKind) -> Option<&WeaponSpec> {
        self.weapons.get(&kind)
    }

    /// Weapon types that may be placed on the ground (everything but the fist).
    #[must_use]
    pub fn spawnable_kinds(&self) -> Vec<WeaponKind> {
        self.weapons
            .keys()
            .copied()
            .filter(|k| *k != WeaponKind::Fist)
            .collect()
    }

    /// Level population settings.
    #[must_use]
    pub const fn spawn(&self) -> &SpawnSettings {
        &self.spawn
    }

    /// Repickup block for dropped weapons.
    #[must_use]
    pub const fn drop_repickup_ms(&self) -> Millis {
        self.drop_repickup_ms
    }
}

// =============================================================================
// Level file
// =============================================================================

/// Player spawn points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    /// Top-left corner of player one's body
    pub player1: Vec2,
    /// Top-left corner of player two's body
    pub player2: Vec2,
}

/// One arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    /// World width and height
    pub world_size: Vec2,
    /// Where the players start
    pub player_spawn: PlayerSpawn,
    /// Fill colour, carried for front ends
    #[serde(default)]
    pub background_color: Option<[u8; 3]>,
    /// Walkability rows: `.` floor, `#` obstacle, `~` or space void
    pub layout: Vec<String>,
    /// Edge length of one layout cell in world units
    pub cell_size: f32,
}

impl LevelDef {
    /// Parses a level document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or missing fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// World rectangle anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.world_size)
    }

    /// Builds the walkability surface from the layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Surface`] for an empty, ragged or unreadable
    /// layout.
    pub fn surface(&self) -> Result<WalkGrid, ConfigError> {
        Ok(WalkGrid::from_ascii(&self.layout, self.cell_size)?)
    }
}
