//! Resolver module: the write phase of a tick.
//!
//! Resolvers process plugin outputs and mutate the arena. They run after
//! every plugin has finished, so all hits of a tick are judged against the
//! same start-of-phase state and applied in one batch.
//!
//! # Architecture
//!
//! Each resolver declares which modifier kinds it handles via
//! [`Resolver::handles()`]. During resolution:
//! 1. Modifiers are collected from all plugins
//! 2. Modifiers are routed to resolvers based on their kind
//! 3. Each resolver processes its modifiers in order and mutates the arena
//!
//! A resolver may handle no kinds at all and act on arena state instead;
//! [`CleanupResolver`] sweeps dead actors and finished projectiles that way.
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same inputs and modifier order
//! - Removal from the arena happens here and nowhere else during a tick
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: damage, stun and displacement
//! - [`CleanupResolver`]: removal of dead actors and finished projectiles

mod cleanup;
mod combat;

pub use cleanup::CleanupResolver;
pub use combat::CombatResolver;

use crate::arena::Arena;
use crate::output::{Event, Modifier, ModifierKind};
use crate::Millis;

/// Resolver processes modifiers and mutates the arena.
///
/// # Example
///
/// ```
/// use brawl_core::arena::Arena;
/// use brawl_core::output::{Event, Modifier, ModifierKind};
/// use brawl_core::resolver::Resolver;
/// use brawl_core::Millis;
///
/// struct CountingResolver;
///
/// impl Resolver for CountingResolver {
///     fn handles(&self) -> &[ModifierKind] {
///         &[ModifierKind::Damage]
///     }
///
///     fn resolve(
///         &self,
///         modifiers: &[&Modifier],
///         _now: Millis,
///         _arena: &mut Arena,
///         _events: &mut Vec<Event>,
///     ) {
///         tracing::debug!(count = modifiers.len(), "damage modifiers");
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the modifier kinds this resolver handles.
    ///
    /// The execution loop uses this to route modifiers to the appropriate
    /// resolver. An empty slice means the resolver runs with no modifiers.
    fn handles(&self) -> &[ModifierKind];

    /// Applies modifiers to the arena.
    ///
    /// # Arguments
    ///
    /// * `modifiers` - The modifiers routed to this resolver (filtered by `handles()`)
    /// * `now` - Tick timestamp
    /// * `arena` - The arena to mutate
    /// * `events` - Sink for the events produced
    fn resolve(
        &self,
        modifiers: &[&Modifier],
        now: Millis,
        arena: &mut Arena,
        events: &mut Vec<Event>,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe
    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn default_resolvers_route_disjoint_kinds() {
        let combat = CombatResolver::new();
        let cleanup = CleanupResolver::new();
        assert!(cleanup.handles().is_empty());
        for kind in [ModifierKind::Damage, ModifierKind::Stun, ModifierKind::Displace] {
            assert!(combat.handles().contains(&kind));
        }
    }
}
