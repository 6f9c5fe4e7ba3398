//! Component structs carried by every actor.
//!
//! Actors share one layout: a body on the map, a health pool, stun and flag
//! state, an inventory, and the slots that track thrown weapons in flight.
//! Enemy-only perception state lives in [`EnemyBrain`].

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use walkmap::Rect;

use super::EntityId;
use crate::weapon::{Weapon, WeaponKind};
use crate::Millis;

bitflags! {
    /// Status flags for actors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActorFlags: u8 {
        /// Input and AI are suspended until the stun deadline.
        const STUNNED = 0b0000_0001;
        /// A yo-yo thrown by this actor is still out.
        const WEAPON_IN_USE = 0b0000_0010;
    }
}

/// Position, size, speed and facing of an actor.
///
/// Facing is in degrees, counter-clockwise from +x with y pointing up, the
/// convention of [`crate::geom::heading_vector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Bounding box in world coordinates
    pub rect: Rect,
    /// Movement per tick in world units
    pub speed: f32,
    /// Facing angle in degrees
    pub facing: f32,
}

impl Body {
    /// Creates a body of `size` centred on `center`, facing +x.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            rect: Rect::from_center(center, size),
            speed,
            facing: 0.0,
        }
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Integer hit points, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points
    pub hp: i32,
    /// Starting hit points
    pub max_hp: i32,
}

impl Health {
    /// Creates a full health pool.
    #[must_use]
    pub const fn new(max_hp: i32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    /// Subtracts `amount`, clamping at zero. A negative amount is a no-op.
    /// Returns `true` if this call brought the pool to zero.
    pub fn take(&mut self, amount: i32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(amount.max(0)).max(0);
        was_alive && self.hp == 0
    }

    /// Returns true while hit points remain.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Ordered, capacity-limited weapon inventory with an active slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    weapons: Vec<Weapon>,
    active: usize,
    limit: usize,
}

impl Inventory {
    /// Creates an empty inventory holding at most `limit` weapons.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            weapons: Vec::new(),
            active: 0,
            limit,
        }
    }

    /// Adds a weapon if there is room. Returns the weapon back when full.
    ///
    /// # Errors
    ///
    /// Returns the weapon unchanged when the inventory is at capacity.
    pub fn push(&mut self, weapon: Weapon) -> Result<(), Weapon> {
        if self.is_full() {
            return Err(weapon);
        }
        self.weapons.push(weapon);
        Ok(())
    }

    /// Returns true if no further weapon fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.weapons.len() >= self.limit
    }

    /// Moves the active slot by `direction`, wrapping around.
    pub fn cycle(&mut self, direction: i8) {
        if self.weapons.is_empty() || direction == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            let len = self.weapons.len() as i64;
            self.active = (self.active as i64 + i64::from(direction)).rem_euclid(len) as usize;
        }
    }

    /// Removes the active weapon unless it is the fist.
    pub fn take_active(&mut self) -> Option<Weapon> {
        let kind = self.active()?.kind();
        if kind == WeaponKind::Fist {
            return None;
        }
        let weapon = self.weapons.remove(self.active);
        self.active = self.active.min(self.weapons.len().saturating_sub(1));
        Some(weapon)
    }

    /// The weapon in the active slot.
    #[must_use]
    pub fn active(&self) -> Option<&Weapon> {
        self.weapons.get(self.active)
    }

    /// Mutable access to the weapon in the active slot.
    pub fn active_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.active)
    }

    /// Index of the active slot.
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    /// All held weapons in slot order.
    #[must_use]
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    /// Number of held weapons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

/// Thrown weapons currently in flight for one owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowSlots {
    /// Live boomerang, if any
    pub boomerang: Option<EntityId>,
    /// Live yo-yo, if any
    pub yoyo: Option<EntityId>,
}

impl ThrowSlots {
    /// Clears whichever slot holds `projectile`. Returns true if one did.
    pub fn release(&mut self, projectile: EntityId) -> bool {
        if self.boomerang == Some(projectile) {
            self.boomerang = None;
            true
        } else if self.yoyo == Some(projectile) {
            self.yoyo = None;
            true
        } else {
            false
        }
    }
}

/// Enemy perception state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// No target and no usable memory
    #[default]
    Idle,
    /// A player is in range and in sight
    ChasingVisible,
    /// Heading for the last place a player was seen
    ChasingMemory,
    /// Frozen until the stun deadline passes
    Stunned,
}

impl fmt::Display for EnemyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ChasingVisible => "chasing_visible",
            Self::ChasingMemory => "chasing_memory",
            Self::Stunned => "stunned",
        };
        f.write_str(name)
    }
}

/// Where and when a player was last seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Player centre at the time
    pub position: Vec2,
    /// Timestamp of the observation
    pub seen_at: Millis,
}

/// Perception and contact-attack state for enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    /// Current perception state
    pub state: EnemyState,
    /// Most recent sighting, if any
    pub last_known: Option<Sighting>,
    /// Timestamp of the last contact attack (spawn time initially)
    pub last_attack: Millis,
}

impl EnemyBrain {
    /// Creates an idle brain whose attack timer starts at `now`.
    #[must_use]
    pub const fn new(now: Millis) -> Self {
        Self {
            state: EnemyState::Idle,
            last_known: None,
            last_attack: now,
        }
    }

    /// The remembered position while the memory is still fresh.
    #[must_use]
    pub fn memory(&self, now: Millis, memory_ms: Millis) -> Option<Vec2> {
        self.last_known
            .filter(|s| now.saturating_sub(s.seen_at) <= memory_ms)
            .map(|s| s.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::{ProjectileParams, WeaponSpec};

    fn weapon(kind: WeaponKind) -> Weapon {
        Weapon::new(WeaponSpec {
            kind,
            name: None,
            damage: 1,
            cooldown: 0,
            params: ProjectileParams::default_for(kind),
        })
    }

    mod health_tests {
        use super::*;

        #[test]
        fn take_clamps_at_zero_and_reports_death_once() {
            let mut health = Health::new(5);
            assert!(!health.take(3));
            assert!(health.take(10));
            assert_eq!(health.hp, 0);
            assert!(!health.take(1));
            assert!(!health.is_alive());
        }

        #[test]
        fn negative_or_extreme_amounts_never_heal_or_overflow() {
            let mut health = Health::new(30);
            assert!(!health.take(-7));
            assert_eq!(health.hp, 30);
            assert!(!health.take(i32::MIN));
            assert_eq!(health.hp, 30);
            assert!(health.take(i32::MAX));
            assert_eq!(health.hp, 0);
        }
    }

    mod inventory_tests {
        use super::*;

        #[test]
        fn push_respects_limit() {
            let mut inv = Inventory::new(2);
            assert!(inv.push(weapon(WeaponKind::Fist)).is_ok());
            assert!(inv.push(weapon(WeaponKind::Bat)).is_ok());
            let rejected = inv.push(weapon(WeaponKind::Knife));
            assert_eq!(rejected.map_err(|w| w.kind()), Err(WeaponKind::Knife));
            assert_eq!(inv.len(), 2);
        }

        #[test]
        fn cycle_wraps_both_ways() {
            let mut inv = Inventory::new(3);
            for kind in [WeaponKind::Fist, WeaponKind::Bat, WeaponKind::Shotgun] {
                inv.push(weapon(kind)).unwrap();
            }
            inv.cycle(-1);
            assert_eq!(inv.active_index(), 2);
            inv.cycle(1);
            assert_eq!(inv.active_index(), 0);
            inv.cycle(1);
            assert_eq!(inv.active().map(Weapon::kind), Some(WeaponKind::Bat));
        }

        #[test]
        fn fist_cannot_be_taken() {
            let mut inv = Inventory::new(3);
            inv.push(weapon(WeaponKind::Fist)).unwrap();
            assert!(inv.take_active().is_none());
            assert_eq!(inv.len(), 1);
        }

        #[test]
        fn take_active_clamps_index() {
            let mut inv = Inventory::new(3);
            inv.push(weapon(WeaponKind::Fist)).unwrap();
            inv.push(weapon(WeaponKind::Yoyo)).unwrap();
            inv.cycle(1);
            let taken = inv.take_active().map(|w| w.kind());
            assert_eq!(taken, Some(WeaponKind::Yoyo));
            assert_eq!(inv.active_index(), 0);
            assert_eq!(inv.active().map(Weapon::kind), Some(WeaponKind::Fist));
        }
    }

    mod brain_tests {
        use super::*;

        #[test]
        fn memory_expires() {
            let mut brain = EnemyBrain::new(0);
            brain.last_known = Some(Sighting {
                position: Vec2::new(10.0, 10.0),
                seen_at: 1_000,
            });
            assert_eq!(brain.memory(16_000, 15_000), Some(Vec2::new(10.0, 10.0)));
            assert_eq!(brain.memory(16_001, 15_000), None);
        }
    }

    #[test]
    fn throw_slots_release_matching_projectile() {
        let mut slots = ThrowSlots {
            boomerang: Some(EntityId::new(4)),
            yoyo: Some(EntityId::new(7)),
        };
        assert!(!slots.release(EntityId::new(5)));
        assert!(slots.release(EntityId::new(7)));
        assert_eq!(slots.yoyo, None);
        assert_eq!(slots.boomerang, Some(EntityId::new(4)));
    }
}
