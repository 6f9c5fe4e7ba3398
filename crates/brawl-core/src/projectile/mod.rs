//! Projectiles and area effects.
//!
//! Every thrown or fired thing is a [`Projectile`]: a closed set of variants
//! ([`Bullet`], [`Boomerang`], [`Yoyo`], [`Incendiary`]) behind one
//! [`Behavior`] interface. Each tick the projectile system calls
//! [`Behavior::update`] (movement and timed phase changes), then
//! [`Behavior::collide`] (hits against the start-of-phase actor snapshot).
//! Hits come out as [`Modifier`]s; nothing here touches an actor.
//!
//! A projectile never removes itself. It reaches [`Phase::Finished`] and the
//! cleanup resolver sweeps it up.

mod boomerang;
mod bullet;
mod incendiary;
mod yoyo;

pub use boomerang::Boomerang;
pub use bullet::Bullet;
pub use incendiary::Incendiary;
pub use yoyo::Yoyo;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use walkmap::Rect;

use crate::entity::{ActorView, EntityId};
use crate::output::Modifier;
use crate::weapon::WeaponKind;
use crate::Millis;

/// Lifecycle phase shared by all projectile variants.
///
/// Each variant only uses its own subset:
/// - bullet: `InFlight` → `Finished`
/// - boomerang: `Outbound` → `Returning` → `Finished`
/// - yo-yo: `Outgoing` → (`Stuck` →) `Returning` → `Finished`
/// - incendiary: `Waiting` → `Active` → `Finished`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Straight flight
    InFlight,
    /// Boomerang spiral
    Outbound,
    /// Yo-yo flying away from its owner
    Outgoing,
    /// Yo-yo attached to a target for one tick
    Stuck,
    /// Homing back on the owner
    Returning,
    /// Incendiary fuse burning
    Waiting,
    /// Incendiary fire burning
    Active,
    /// Done; removed by cleanup
    Finished,
}

impl Phase {
    /// Returns true for the terminal phase.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InFlight => "in_flight",
            Self::Outbound => "outbound",
            Self::Outgoing => "outgoing",
            Self::Stuck => "stuck",
            Self::Returning => "returning",
            Self::Waiting => "waiting",
            Self::Active => "active",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Read-only view of the world handed to a projectile each tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Tick timestamp
    pub now: Millis,
    /// Who threw the projectile
    pub owner: EntityId,
    /// Owner's centre, `None` once the owner is gone
    pub owner_center: Option<Vec2>,
    /// Actor snapshot taken before any projectile ran
    pub actors: &'a [ActorView],
    /// World rectangle
    pub bounds: Rect,
}

impl TickContext<'_> {
    /// Living actors other than the owner, in id order.
    pub fn targets(&self) -> impl Iterator<Item = &ActorView> + '_ {
        let owner = self.owner;
        self.actors.iter().filter(move |a| a.alive && a.id != owner)
    }
}

/// Per-tick behaviour of a projectile or effect.
///
/// # Example
///
/// ```
/// use brawl_core::entity::EntityId;
/// use brawl_core::projectile::{Behavior, Bullet, Phase, TickContext};
/// use brawl_core::weapon::SpreadParams;
/// use glam::Vec2;
/// use walkmap::Rect;
///
/// let mut bullet = Bullet::new(Vec2::new(50.0, 50.0), 0.0, 2, &SpreadParams::default(), 0);
/// let ctx = TickContext {
///     now: 16,
///     owner: EntityId::new(1),
///     owner_center: None,
///     actors: &[],
///     bounds: Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)),
/// };
///
/// bullet.update(&ctx);
/// assert_eq!(bullet.phase(), Phase::InFlight);
/// assert_eq!(bullet.rect().center(), Vec2::new(60.0, 50.0));
/// ```
pub trait Behavior {
    /// Advances movement and timed phase changes.
    fn update(&mut self, ctx: &TickContext<'_>);

    /// Checks contact with the actor snapshot and pushes resulting hits.
    ///
    /// The default does nothing.
    fn collide(&mut self, _ctx: &TickContext<'_>, _hits: &mut Vec<Modifier>) {}

    /// Current lifecycle phase.
    fn phase(&self) -> Phase;

    /// Contact box, `None` for area effects.
    fn hitbox(&self) -> Option<Rect>;
}

/// Per-target rate limit for repeated contact.
///
/// A target may be hit when it has never been hit, or when at least
/// `interval` has passed since its last hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLimiter {
    interval: Millis,
    last_hit: BTreeMap<EntityId, Millis>,
}

impl HitLimiter {
    /// Creates a limiter with the given interval.
    #[must_use]
    pub const fn new(interval: Millis) -> Self {
        Self {
            interval,
            last_hit: BTreeMap::new(),
        }
    }

    /// Records a hit on `target` at `now` if allowed. Returns whether it was.
    pub fn try_hit(&mut self, target: EntityId, now: Millis) -> bool {
        let allowed = self
            .last_hit
            .get(&target)
            .map_or(true, |last| now.saturating_sub(*last) >= self.interval);
        if allowed {
            self.last_hit.insert(target, now);
        }
        allowed
    }
}

/// Behaviour family tag of a projectile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileClass {
    /// [`Bullet`]
    Bullet,
    /// [`Boomerang`]
    Boomerang,
    /// [`Yoyo`]
    Yoyo,
    /// [`Incendiary`]
    Incendiary,
}

/// Variant storage for a projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight bullet
    Bullet(Bullet),
    /// Returning spiral
    Boomerang(Boomerang),
    /// Stun-and-pull throw
    Yoyo(Yoyo),
    /// Timed area effect
    Incendiary(Incendiary),
}

impl ProjectileKind {
    /// Behaviour family tag.
    #[must_use]
    pub const fn class(&self) -> ProjectileClass {
        match self {
            Self::Bullet(_) => ProjectileClass::Bullet,
            Self::Boomerang(_) => ProjectileClass::Boomerang,
            Self::Yoyo(_) => ProjectileClass::Yoyo,
            Self::Incendiary(_) => ProjectileClass::Incendiary,
        }
    }

    fn behavior(&self) -> &dyn Behavior {
        match self {
            Self::Bullet(b) => b,
            Self::Boomerang(b) => b,
            Self::Yoyo(y) => y,
            Self::Incendiary(i) => i,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Self::Bullet(b) => b,
            Self::Boomerang(b) => b,
            Self::Yoyo(y) => y,
            Self::Incendiary(i) => i,
        }
    }
}

/// A live projectile or effect in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    id: EntityId,
    owner: EntityId,
    source: WeaponKind,
    kind: ProjectileKind,
}

impl Projectile {
    /// Creates a projectile thrown by `owner` with a weapon of type `source`.
    ///
    /// The arena assigns the id on spawn.
    #[must_use]
    pub const fn new(owner: EntityId, source: WeaponKind, kind: ProjectileKind) -> Self {
        Self {
            id: EntityId::new(0),
            owner,
            source,
            kind,
        }
    }

    /// Returns the projectile's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// The thrower. Used for target exclusion and homing only.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Weapon type that produced this projectile.
    #[must_use]
    pub const fn source(&self) -> WeaponKind {
        self.source
    }

    /// Behaviour family tag.
    #[must_use]
    pub const fn class(&self) -> ProjectileClass {
        self.kind.class()
    }

    /// Variant storage.
    #[must_use]
    pub const fn kind(&self) -> &ProjectileKind {
        &self.kind
    }

    /// Mutable variant storage.
    pub fn kind_mut(&mut self) -> &mut ProjectileKind {
        &mut self.kind
    }
}

impl Behavior for Projectile {
    fn update(&mut self, ctx: &TickContext<'_>) {
        self.kind.behavior_mut().update(ctx);
    }

    fn collide(&mut self, ctx: &TickContext<'_>, hits: &mut Vec<Modifier>) {
        self.kind.behavior_mut().collide(ctx, hits);
    }

    fn phase(&self) -> Phase {
        self.kind.behavior().phase()
    }

    fn hitbox(&self) -> Option<Rect> {
        self.kind.behavior().hitbox()
    }
}

// =============================================================================
// Tests
// =============================================================================
