//! Arena module for the combat simulation.
//!
//! The Arena is the container for everything live in a match:
//! - Actors (players and enemies)
//! - Projectiles and area effects
//! - Weapons lying on the ground
//!
//! # Architecture
//!
//! All three collections are `BTreeMap`s keyed by [`EntityId`], so iteration
//! is always in id order. Ids come from one monotonically increasing counter
//! and are never reused within an arena.
//!
//! Removal happens only through the cleanup resolver (or explicit calls
//! between ticks), never while a system is iterating.
//!
//! # Example
//!
//! ```
//! use brawl_core::arena::Arena;
//! use brawl_core::entity::{Actor, ActorKind, Body, EntityId, Side};
//! use glam::Vec2;
//! use walkmap::Rect;
//!
//! let mut arena = Arena::new(Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0)));
//! let id = arena.spawn_actor(Actor::new(
//!     EntityId::new(0),
//!     ActorKind::Player(Side::One),
//!     Body::centered(Vec2::new(100.0, 100.0), Vec2::splat(40.0), 5.0),
//!     30,
//!     3,
//! ));
//!
//! assert_eq!(arena.actor(id).map(|a| a.center()), Some(Vec2::new(100.0, 100.0)));
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use walkmap::Rect;

use crate::entity::{Actor, ActorView, EntityId, Side};
use crate::projectile::Projectile;
use crate::weapon::Weapon;
use crate::Millis;

// =============================================================================
// Ground weapons
// =============================================================================

/// A weapon lying on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundWeapon {
    /// The weapon itself, cooldown included
    pub weapon: Weapon,
    /// Pickup box
    pub rect: Rect,
    /// Actor that may not pick it up again before the given time
    pub blocked: Option<(EntityId, Millis)>,
}

impl GroundWeapon {
    /// A freely available ground weapon.
    #[must_use]
    pub const fn new(weapon: Weapon, rect: Rect) -> Self {
        Self {
            weapon,
            rect,
            blocked: None,
        }
    }

    /// Returns true if `actor` is still on the repickup block at `now`.
    #[must_use]
    pub fn is_blocked_for(&self, actor: EntityId, now: Millis) -> bool {
        self.blocked
            .is_some_and(|(who, until)| who == actor && now < until)
    }
}

// =============================================================================
// Arena
// =============================================================================

/// The arena containing every live object of a match.
///
/// # Determinism
///
/// Uses `BTreeMap` for all storage. Iterating actors, projectiles or ground
/// weapons always yields ascending ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// World rectangle; actors are always clamped inside it.
    bounds: Rect,
    /// Next id to hand out, shared by every collection.
    next_id: u64,
    actors: BTreeMap<EntityId, Actor>,
    projectiles: BTreeMap<EntityId, Projectile>,
    ground: BTreeMap<EntityId, GroundWeapon>,
    /// Completed ticks.
    tick: u64,
}

impl Arena {
    /// Creates an empty arena covering `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            next_id: 0,
            actors: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            ground: BTreeMap::new(),
            tick: 0,
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// World rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    // -------------------------------------------------------------------------
    // Actors
    // -------------------------------------------------------------------------

    /// Adds an actor, assigning it a fresh id.
    ///
    /// # Returns
    ///
    /// The id assigned to the actor.
    pub fn spawn_actor(&mut self, mut actor: Actor) -> EntityId {
        let id = self.allocate();
        actor.set_id(id);
        self.actors.insert(id, actor);
        id
    }

    /// Removes an actor.
    pub fn remove_actor(&mut self, id: EntityId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    /// Returns a reference to an actor by ID.
    #[must_use]
    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Returns a mutable reference to an actor by ID.
    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    /// Mutable actors in id order.
    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut Actor> + '_ {
        self.actors.values_mut()
    }

    /// Actor ids in id order.
    #[must_use]
    pub fn actor_ids(&self) -> Vec<EntityId> {
        self.actors.keys().copied().collect()
    }

    /// Players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values().filter(|a| a.is_player())
    }

    /// Enemies in id order.
    pub fn enemies(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values().filter(|a| a.is_enemy())
    }

    /// Snapshot of every actor.
    #[must_use]
    pub fn actor_views(&self) -> Vec<ActorView> {
        self.actors.values().map(Actor::view).collect()
    }

    /// The living player on `side`, if any.
    #[must_use]
    pub fn player(&self, side: Side) -> Option<&Actor> {
        self.players()
            .find(|a| a.side() == Some(side) && a.is_alive())
    }

    /// Number of actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // -------------------------------------------------------------------------
    // Projectiles
    // -------------------------------------------------------------------------

    /// Adds a projectile, assigning it a fresh id.
    pub fn spawn_projectile(&mut self, mut projectile: Projectile) -> EntityId {
        let id = self.allocate();
        projectile.set_id(id);
        self.projectiles.insert(id, projectile);
        id
    }

    /// Removes a projectile.
    pub fn remove_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    /// Returns a reference to a projectile by ID.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Projectiles in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.values()
    }

    /// Mutable projectiles in id order.
    pub fn projectiles_mut(&mut self) -> impl Iterator<Item = &mut Projectile> + '_ {
        self.projectiles.values_mut()
    }

    /// Number of projectiles and effects.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    // -------------------------------------------------------------------------
    // Ground weapons
    // -------------------------------------------------------------------------

    /// Puts a weapon on the ground, assigning it a fresh id.
    pub fn place_weapon(&mut self, item: GroundWeapon) -> EntityId {
        let id = self.allocate();
        self.ground.insert(id, item);
        id
    }

    /// Picks a weapon up off the ground.
    pub fn take_weapon(&mut self, id: EntityId) -> Option<GroundWeapon> {
        self.ground.remove(&id)
    }

    /// Ground weapons in id order.
    pub fn ground_weapons(&self) -> impl Iterator<Item = (EntityId, &GroundWeapon)> + '_ {
        self.ground.iter().map(|(id, item)| (*id, item))
    }

    /// Ground weapon boxes overlapping `rect` that `actor` may pick up at `now`.
    #[must_use]
    pub fn reachable_weapons(&self, rect: &Rect, actor: EntityId, now: Millis) -> Vec<EntityId> {
        self.ground
            .iter()
            .filter(|(_, item)| item.rect.intersects(rect) && !item.is_blocked_for(actor, now))
            .map(|(id, _)| *id)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    /// Returns the number of completed ticks.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Centre of a living actor, used for homing projectiles.
    #[must_use]
    pub fn living_center(&self, id: EntityId) -> Option<Vec2> {
        self.actors
            .get(&id)
            .filter(|a| a.is_alive())
            .map(Actor::center)
    }
}

// =============================================================================
// Tests
// =============================================================================
