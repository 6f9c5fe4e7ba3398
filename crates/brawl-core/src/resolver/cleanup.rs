//! Cleanup resolver: the sweep half of mark-and-sweep.
//!
//! Projectiles mark themselves [`Phase::Finished`](crate::projectile::Phase)
//! and actors are marked dead by the combat resolver. Nothing is removed
//! while a collection is being iterated; this resolver removes both in one
//! pass at the end of the tick.

use tracing::info;

use crate::arena::Arena;
use crate::entity::{ActorFlags, EntityId};
use crate::output::{Event, Modifier, ModifierKind};
use crate::projectile::{Behavior, ProjectileClass};
use crate::Millis;

use super::Resolver;

/// Removes finished projectiles and dead actors.
///
/// Releasing a projectile frees its owner's throw slot; a returning yo-yo
/// also clears the owner's `WEAPON_IN_USE` flag.
#[derive(Debug, Clone, Default)]
pub struct CleanupResolver;

impl CleanupResolver {
    /// Creates a new cleanup resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn sweep_projectiles(arena: &mut Arena, events: &mut Vec<Event>) {
        let finished: Vec<EntityId> = arena
            .projectiles()
            .filter(|p| p.phase().is_finished())
            .map(|p| p.id())
            .collect();

        for id in finished {
            let Some(projectile) = arena.remove_projectile(id) else {
                continue;
            };
            if let Some(owner) = arena.actor_mut(projectile.owner()) {
                owner.slots.release(id);
                if projectile.class() == ProjectileClass::Yoyo {
                    owner.flags.remove(ActorFlags::WEAPON_IN_USE);
                }
            }
            events.push(Event::ProjectileDespawned { projectile: id });
        }
    }

    fn sweep_actors(arena: &mut Arena, events: &mut Vec<Event>) {
        let dead: Vec<EntityId> = arena
            .actors()
            .filter(|a| !a.is_alive())
            .map(|a| a.id())
            .collect();

        for id in dead {
            if let Some(actor) = arena.remove_actor(id) {
                match actor.side() {
                    Some(side) => info!(actor = %id, %side, "player died"),
                    None => info!(actor = %id, "enemy died"),
                }
                events.push(Event::ActorDied { actor: id });
            }
        }
    }
}

impl Resolver for CleanupResolver {
    fn handles(&self) -> &[ModifierKind] {
        &[]
    }

    fn resolve(
        &self,
        _modifiers: &[&Modifier],
        _now: Millis,
        arena: &mut Arena,
        events: &mut Vec<Event>,
    ) {
        Self::sweep_projectiles(arena, events);
        Self::sweep_actors(arena, events);
    }
}
