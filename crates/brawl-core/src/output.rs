//! Outputs of the tick systems.
//!
//! Systems never mutate combat state directly. They emit:
//! - [`Modifier`]s: proposed changes to actors (damage, stun, displacement),
//!   applied by the resolvers in one batch after every system has run
//! - [`Event`]s: notifications of things that happened, returned from
//!   [`Simulation::step`](crate::simulation::Simulation::step) for rendering,
//!   audio and replay layers to consume
//!
//! # Example
//!
//! ```
//! use brawl_core::entity::EntityId;
//! use brawl_core::output::{Modifier, ModifierKind};
//!
//! let hit = Modifier::ApplyDamage {
//!     source: EntityId::new(1),
//!     target: EntityId::new(2),
//!     amount: 3,
//! };
//!
//! assert_eq!(hit.kind(), ModifierKind::Damage);
//! assert_eq!(hit.target(), EntityId::new(2));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{EnemyState, EntityId, Side};
use crate::projectile::{Phase, ProjectileClass};
use crate::weapon::WeaponKind;
use crate::Millis;

// =============================================================================
// Modifiers
// =============================================================================

/// Proposed change to an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Subtract hit points
    ApplyDamage {
        /// Actor responsible (owner for projectiles)
        source: EntityId,
        /// Actor hit
        target: EntityId,
        /// Hit points removed
        amount: i32,
    },
    /// Suspend input and AI until a deadline
    Stun {
        /// Actor responsible
        source: EntityId,
        /// Actor stunned
        target: EntityId,
        /// Stun deadline
        until: Millis,
    },
    /// Move an actor by a fixed offset, clamped to the world
    Displace {
        /// Actor moved
        target: EntityId,
        /// Translation in world units
        offset: Vec2,
    },
}

impl Modifier {
    /// Returns the actor this modifier applies to.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::ApplyDamage { target, .. }
            | Self::Stun { target, .. }
            | Self::Displace { target, .. } => *target,
        }
    }

    /// Returns the routing kind of this modifier.
    #[must_use]
    pub const fn kind(&self) -> ModifierKind {
        match self {
            Self::ApplyDamage { .. } => ModifierKind::Damage,
            Self::Stun { .. } => ModifierKind::Stun,
            Self::Displace { .. } => ModifierKind::Displace,
        }
    }
}

/// Routing category of a [`Modifier`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// [`Modifier::ApplyDamage`]
    Damage,
    /// [`Modifier::Stun`]
    Stun,
    /// [`Modifier::Displace`]
    Displace,
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage => write!(f, "Damage"),
            Self::Stun => write!(f, "Stun"),
            Self::Displace => write!(f, "Displace"),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// How a match ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Only this side still has a living player
    Winner(Side),
    /// Both sides were eliminated on the same tick
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(side) => write!(f, "{side} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An actor's box moved
    ActorMoved {
        /// Actor moved
        actor: EntityId,
        /// New top-left corner
        position: Vec2,
    },
    /// An actor lost hit points
    ActorDamaged {
        /// Actor hit
        actor: EntityId,
        /// Actor responsible
        source: EntityId,
        /// Hit points removed
        amount: i32,
        /// Hit points left
        hp: i32,
    },
    /// An actor was stunned
    ActorStunned {
        /// Actor stunned
        actor: EntityId,
        /// Stun deadline
        until: Millis,
    },
    /// An actor reached zero hit points and was removed
    ActorDied {
        /// Actor removed
        actor: EntityId,
    },
    /// A ground weapon went into an inventory
    WeaponPickedUp {
        /// Actor picking up
        actor: EntityId,
        /// Ground item id (no longer valid)
        item: EntityId,
        /// Weapon type
        kind: WeaponKind,
    },
    /// A held weapon was put on the ground
    WeaponDropped {
        /// Actor dropping
        actor: EntityId,
        /// New ground item id
        item: EntityId,
        /// Weapon type
        kind: WeaponKind,
    },
    /// A projectile or area effect was created
    ProjectileSpawned {
        /// Projectile id
        projectile: EntityId,
        /// Thrower
        owner: EntityId,
        /// Behaviour family
        class: ProjectileClass,
    },
    /// A projectile changed lifecycle phase
    PhaseChanged {
        /// Projectile id
        projectile: EntityId,
        /// Previous phase
        from: Phase,
        /// New phase
        to: Phase,
    },
    /// A finished projectile was removed
    ProjectileDespawned {
        /// Projectile id
        projectile: EntityId,
    },
    /// An enemy changed perception state
    EnemyStateChanged {
        /// Enemy id
        actor: EntityId,
        /// Previous state
        from: EnemyState,
        /// New state
        to: EnemyState,
    },
    /// The match ended; fired once
    MatchOver(Outcome),
}
