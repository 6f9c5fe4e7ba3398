//! Combat resolver for damage, stun and displacement.
//!
//! The `CombatResolver` handles:
//! - `ApplyDamage` modifiers: reduce hit points, clamped at zero
//! - `Stun` modifiers: suspend input and AI until a deadline
//! - `Displace` modifiers: move an actor, clamped to the world
//!
//! # Death Handling
//!
//! An actor whose hit points reach zero stays in the arena until the
//! [`CleanupResolver`](super::CleanupResolver) runs. Modifiers aimed at an
//! actor that is already dead (or gone) are ignored.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::entity::{EnemyState, EntityId};
use crate::output::{Event, Modifier, ModifierKind};
use crate::Millis;

use super::Resolver;

/// Resolver for combat-related modifiers.
///
/// # Processing Order
///
/// Modifiers are applied in the order they were emitted. A target killed
/// by an earlier modifier ignores the rest.
///
/// # Example
///
/// ```
/// use brawl_core::resolver::{CombatResolver, Resolver};
/// use brawl_core::output::ModifierKind;
///
/// let resolver = CombatResolver::new();
/// assert!(resolver.handles().contains(&ModifierKind::Damage));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn apply_damage(
        arena: &mut Arena,
        source: EntityId,
        target: EntityId,
        amount: i32,
        events: &mut Vec<Event>,
    ) {
        let Some(actor) = arena.actor_mut(target).filter(|a| a.is_alive()) else {
            return;
        };
        let died = actor.health.take(amount);
        trace!(actor = %target, source = %source, amount, hp = actor.health.hp, "damage");
        if died {
            debug!(actor = %target, source = %source, "killed");
        }
        events.push(Event::ActorDamaged {
            actor: target,
            source,
            amount,
            hp: actor.health.hp,
        });
    }

    fn apply_stun(arena: &mut Arena, target: EntityId, until: Millis, events: &mut Vec<Event>) {
        let Some(actor) = arena.actor_mut(target).filter(|a| a.is_alive()) else {
            return;
        };
        actor.stun(until);
        let until = actor.stun_until.unwrap_or(until);
        events.push(Event::ActorStunned {
            actor: target,
            until,
        });

        if let Some(brain) = actor.as_enemy_mut() {
            let from = brain.state;
            if from != EnemyState::Stunned {
                brain.state = EnemyState::Stunned;
                debug!(actor = %target, %from, "enemy stunned");
                events.push(Event::EnemyStateChanged {
                    actor: target,
                    from,
                    to: EnemyState::Stunned,
                });
            }
        }
    }

    fn apply_displace(
        arena: &mut Arena,
        target: EntityId,
        offset: glam::Vec2,
        events: &mut Vec<Event>,
    ) {
        let bounds = arena.bounds();
        let Some(actor) = arena.actor_mut(target).filter(|a| a.is_alive()) else {
            return;
        };
        let moved = actor.body.rect.translated(offset).clamped_within(&bounds);
        if moved == actor.body.rect {
            return;
        }
        actor.body.rect = moved;
        events.push(Event::ActorMoved {
            actor: target,
            position: moved.pos,
        });
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[ModifierKind] {
        &[ModifierKind::Damage, ModifierKind::Stun, ModifierKind::Displace]
    }

    fn resolve(
        &self,
        modifiers: &[&Modifier],
        _now: Millis,
        arena: &mut Arena,
        events: &mut Vec<Event>,
    ) {
        for modifier in modifiers {
            match modifier {
                Modifier::ApplyDamage {
                    source,
                    target,
                    amount,
                } => Self::apply_damage(arena, *source, *target, *amount, events),
                Modifier::Stun { target, until, .. } => {
                    Self::apply_stun(arena, *target, *until, events);
                }
                Modifier::Displace { target, offset } => {
                    Self::apply_displace(arena, *target, *offset, events);
                }
            }
        }
    }
}
