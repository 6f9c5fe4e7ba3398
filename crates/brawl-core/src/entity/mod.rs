//! Entity types for the arena.
//!
//! This module provides the actor types of the simulation:
//! - [`EntityId`]: Unique identifier shared by actors, projectiles and ground weapons
//! - [`Side`]: Which contender a player fights for
//! - [`ActorKind`]: Player or enemy, with enemy-only state carried inline
//! - [`Actor`]: The complete actor container
//!
//! # Example
//!
//! ```
//! use brawl_core::entity::{Actor, ActorKind, Body, EntityId, Side};
//! use glam::Vec2;
//!
//! let player = Actor::new(
//!     EntityId::new(1),
//!     ActorKind::Player(Side::One),
//!     Body::centered(Vec2::new(100.0, 100.0), Vec2::splat(40.0), 5.0),
//!     30,
//!     3,
//! );
//!
//! assert_eq!(player.side(), Some(Side::One));
//! assert!(player.is_alive());
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use walkmap::Rect;

pub use components::{
    ActorFlags, Body, EnemyBrain, EnemyState, Health, Inventory, Sighting, ThrowSlots,
};

use crate::Millis;

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Actors, projectiles and
/// ground weapons draw from one counter, so an id never names two things.
///
/// # Ordering
///
/// Entity IDs are ordered by their numeric value, which is used to ensure
/// deterministic iteration order across all entities.
///
/// # Example
///
/// ```
/// use brawl_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    ///
    /// # Arguments
    ///
    /// * `id` - The raw identifier value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// One of the two competing player sides.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First player
    One,
    /// Second player
    Two,
}

impl Side {
    /// Both sides in order.
    pub const ALL: [Side; 2] = [Side::One, Side::Two];

    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "player1"),
            Self::Two => write!(f, "player2"),
        }
    }
}

/// Actor classification.
///
/// Players are driven by [`crate::simulation::ActorInput`]; enemies by
/// their [`EnemyBrain`] and hostile to both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    /// Player-controlled contender
    Player(Side),
    /// Hostile AI unit
    Enemy(EnemyBrain),
}

/// A live combatant on the map.
///
/// # Invariants
///
/// - `health.hp` never goes below zero
/// - `flags` contains `STUNNED` exactly when `stun_until` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    id: EntityId,
    kind: ActorKind,
    /// Position, size, speed and facing
    pub body: Body,
    /// Hit points
    pub health: Health,
    /// Stun deadline while stunned
    pub stun_until: Option<Millis>,
    /// Status flags
    pub flags: ActorFlags,
    /// Held weapons
    pub inventory: Inventory,
    /// Thrown weapons in flight
    pub slots: ThrowSlots,
}

impl Actor {
    /// Creates an actor at full health with an empty inventory.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier; the arena overwrites it on spawn
    /// * `kind` - Player side or enemy brain
    /// * `body` - Initial body
    /// * `hp` - Starting hit points
    /// * `inventory_limit` - Maximum number of held weapons
    #[must_use]
    pub const fn new(
        id: EntityId,
        kind: ActorKind,
        body: Body,
        hp: i32,
        inventory_limit: usize,
    ) -> Self {
        Self {
            id,
            kind,
            body,
            health: Health::new(hp),
            stun_until: None,
            flags: ActorFlags::empty(),
            inventory: Inventory::new(inventory_limit),
            slots: ThrowSlots {
                boomerang: None,
                yoyo: None,
            },
        }
    }

    /// Returns the actor's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Returns the actor's kind.
    #[must_use]
    pub const fn kind(&self) -> &ActorKind {
        &self.kind
    }

    /// The player side, or `None` for enemies.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        match self.kind {
            ActorKind::Player(side) => Some(side),
            ActorKind::Enemy(_) => None,
        }
    }

    /// Returns `true` if this actor is a player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player(_))
    }

    /// Returns `true` if this actor is an enemy.
    #[must_use]
    pub const fn is_enemy(&self) -> bool {
        matches!(self.kind, ActorKind::Enemy(_))
    }

    /// Returns the enemy brain if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyBrain> {
        match &self.kind {
            ActorKind::Enemy(brain) => Some(brain),
            ActorKind::Player(_) => None,
        }
    }

    /// Returns the mutable enemy brain if this is an enemy.
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyBrain> {
        match &mut self.kind {
            ActorKind::Enemy(brain) => Some(brain),
            ActorKind::Player(_) => None,
        }
    }

    /// Bounding box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.body.rect
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Returns true while hit points remain.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Returns true while a stun is in effect.
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        self.flags.contains(ActorFlags::STUNNED)
    }

    /// Stuns the actor until `until`, extending an earlier deadline.
    pub fn stun(&mut self, until: Millis) {
        let until = self.stun_until.map_or(until, |prev| prev.max(until));
        self.stun_until = Some(until);
        self.flags.insert(ActorFlags::STUNNED);
    }

    /// Clears the stun once `now` reaches the deadline. Returns true if the
    /// stun ended on this call.
    pub fn expire_stun(&mut self, now: Millis) -> bool {
        match self.stun_until {
            Some(until) if now >= until => {
                self.stun_until = None;
                self.flags.remove(ActorFlags::STUNNED);
                true
            }
            _ => false,
        }
    }

    /// Read-only snapshot used by per-tick systems.
    #[must_use]
    pub fn view(&self) -> ActorView {
        ActorView {
            id: self.id,
            rect: self.body.rect,
            side: self.side(),
            alive: self.is_alive(),
        }
    }
}

/// Start-of-phase snapshot of one actor.
///
/// Systems that look at other actors read these instead of the live arena,
/// so no actor observes another's half-updated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    /// Actor id
    pub id: EntityId,
    /// Bounding box at snapshot time
    pub rect: Rect,
    /// Player side, `None` for enemies
    pub side: Option<Side>,
    /// Hit points remained at snapshot time
    pub alive: bool,
}

impl ActorView {
    /// Centre of the snapshot box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

// =============================================================================
// Tests
// =============================================================================
