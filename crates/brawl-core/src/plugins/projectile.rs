//! Projectile phase of the tick.
//!
//! Every live projectile is updated and then collided against one actor
//! snapshot taken before the first projectile ran, so no projectile sees
//! the result of another's hits. Hits are returned as modifiers for the
//! resolvers; phase changes are reported as events.

use glam::Vec2;
use std::collections::BTreeMap;
use tracing::debug;

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::output::{Event, Modifier};
use crate::projectile::{Behavior, TickContext};
use crate::Millis;

/// Runs every projectile for one tick.
///
/// # Returns
///
/// The hits produced, in projectile id order.
pub fn advance(arena: &mut Arena, now: Millis, events: &mut Vec<Event>) -> Vec<Modifier> {
    let actors = arena.actor_views();
    let centers: BTreeMap<EntityId, Vec2> = actors
        .iter()
        .filter(|a| a.alive)
        .map(|a| (a.id, a.center()))
        .collect();
    let bounds = arena.bounds();

    let mut hits = Vec::new();
    for projectile in arena.projectiles_mut() {
        let before = projectile.phase();
        if before.is_finished() {
            continue;
        }
        let ctx = TickContext {
            now,
            owner: projectile.owner(),
            owner_center: centers.get(&projectile.owner()).copied(),
            actors: &actors,
            bounds,
        };
        projectile.update(&ctx);
        projectile.collide(&ctx, &mut hits);

        let after = projectile.phase();
        if after != before {
            debug!(projectile = %projectile.id(), from = %before, to = %after, "phase change");
            events.push(Event::PhaseChanged {
                projectile: projectile.id(),
                from: before,
                to: after,
            });
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Actor, ActorKind, Body, Side};
    use crate::projectile::{Bullet, Phase, Projectile, ProjectileKind, Yoyo};
    use crate::weapon::{SpreadParams, WeaponKind, YoyoParams};
    use walkmap::Rect;

    fn arena_with_players() -> (Arena, EntityId, EntityId) {
        let mut arena = Arena::new(Rect::new(Vec2::ZERO, Vec2::splat(1_000.0)));
        let one = arena.spawn_actor(Actor::new(
            EntityId::new(0),
            ActorKind::Player(Side::One),
            Body::centered(Vec2::new(100.0, 100.0), Vec2::splat(40.0), 5.0),
            30,
            3,
        ));
        let two = arena.spawn_actor(Actor::new(
            EntityId::new(0),
            ActorKind::Player(Side::Two),
            Body::centered(Vec2::new(125.0, 100.0), Vec2::splat(40.0), 5.0),
            30,
            3,
        ));
        (arena, one, two)
    }

    #[test]
    fn hits_use_the_start_snapshot_and_report_phases() {
        let (mut arena, one, two) = arena_with_players();
        let bullet = |heading| {
            Projectile::new(
                one,
                WeaponKind::Shotgun,
                ProjectileKind::Bullet(Bullet::new(
                    Vec2::new(100.0, 100.0),
                    heading,
                    2,
                    &SpreadParams::default(),
                    0,
                )),
            )
        };
        let first = arena.spawn_projectile(bullet(0.0));
        let second = arena.spawn_projectile(bullet(0.0));

        let mut events = Vec::new();
        let hits = advance(&mut arena, 16, &mut events);

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.target() == two));
        assert_eq!(
            events,
            vec![
                Event::PhaseChanged {
                    projectile: first,
                    from: Phase::InFlight,
                    to: Phase::Finished,
                },
                Event::PhaseChanged {
                    projectile: second,
                    from: Phase::InFlight,
                    to: Phase::Finished,
                },
            ]
        );

        // Finished projectiles are skipped until cleanup removes them.
        let mut events = Vec::new();
        assert!(advance(&mut arena, 32, &mut events).is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn homing_without_living_owner_finishes() {
        let (mut arena, one, _) = arena_with_players();
        let id = arena.spawn_projectile(Projectile::new(
            one,
            WeaponKind::Yoyo,
            ProjectileKind::Yoyo(Yoyo::new(
                Vec2::new(500.0, 500.0),
                0.0,
                1,
                &YoyoParams::default(),
            )),
        ));
        let mut events = Vec::new();
        for step in 1..=20 {
            advance(&mut arena, step * 16, &mut events);
        }
        assert_eq!(arena.projectile(id).map(Behavior::phase), Some(Phase::Returning));

        arena.remove_actor(one);
        advance(&mut arena, 400, &mut events);
        assert_eq!(arena.projectile(id).map(Behavior::phase), Some(Phase::Finished));
        assert_eq!(
            events.last(),
            Some(&Event::PhaseChanged {
                projectile: id,
                from: Phase::Returning,
                to: Phase::Finished,
            })
        );
    }
}
