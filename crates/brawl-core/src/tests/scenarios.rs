//! End-to-end scenarios through [`Simulation::step`].
//!
//! Each test builds a small arena, drives it tick by tick and checks the
//! event stream and the final arena state.

use std::collections::BTreeMap;

use glam::Vec2;
use walkmap::{Rect, WalkGrid};

use crate::entity::{EnemyState, Side};
use crate::geom::heading_degrees;
use crate::output::{Event, Outcome};
use crate::projectile::{Phase, ProjectileClass, ProjectileKind};
use crate::simulation::ActorInput;
use crate::weapon::WeaponKind;

use super::helpers::{armed_sim, attack, duel, hp, only, position, run, walk, TICK_MS};

fn open_grid() -> WalkGrid {
    WalkGrid::open(100, 100, 10.0).unwrap()
}

/// Cycle to slot 1 and attack in the same tick.
fn cycle_and_attack() -> ActorInput {
    ActorInput {
        cycle: 1,
        attack: true,
        ..ActorInput::default()
    }
}

mod spread_tests {
    use super::*;

    #[test]
    fn shotgun_spawns_one_bullet_per_angle() {
        let mut sim = armed_sim(open_grid(), 1);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        assert!(sim.give_weapon(hero, WeaponKind::Shotgun));

        let events = sim.step(0, &only(hero, cycle_and_attack()));

        let spawned = events
            .iter()
            .filter(|e| {
                matches!(e, Event::ProjectileSpawned { owner, class: ProjectileClass::Bullet, .. } if *owner == hero)
            })
            .count();
        assert_eq!(spawned, 4);

        let mut angles: Vec<f32> = sim
            .arena()
            .projectiles()
            .filter_map(|p| match p.kind() {
                ProjectileKind::Bullet(b) => Some(heading_degrees(b.velocity())),
                _ => None,
            })
            .collect();
        angles.sort_by(f32::total_cmp);
        for (got, want) in angles.iter().zip([-20.0, -7.0, 7.0, 20.0]) {
            assert!((got - want).abs() < 1e-3, "angle {got} != {want}");
        }
    }

    #[test]
    fn bullets_leave_the_world_and_despawn() {
        let mut sim = armed_sim(open_grid(), 1);
        let (hero, _) = duel(&mut sim, Vec2::new(900.0, 100.0), Vec2::new(100.0, 800.0));
        assert!(sim.give_weapon(hero, WeaponKind::Shotgun));

        sim.step(0, &only(hero, cycle_and_attack()));
        assert_eq!(sim.arena().projectile_count(), 4);
        let events = run(&mut sim, 1, 30, |_| BTreeMap::new());

        let despawned = events
            .iter()
            .filter(|(_, e)| matches!(e, Event::ProjectileDespawned { .. }))
            .count();
        assert_eq!(despawned, 4);
        assert_eq!(sim.arena().projectile_count(), 0);
    }
}

mod elimination_tests {
    use super::*;

    #[test]
    fn enemy_at_zero_is_gone_after_the_tick() {
        let mut sim = armed_sim(open_grid(), 2);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        let enemy = sim.spawn_enemy(Vec2::new(160.0, 120.0), 1, 0);

        let events = sim.step(0, &only(hero, attack()));

        assert!(events.contains(&Event::ActorDied { actor: enemy }));
        assert!(sim.arena().actor(enemy).is_none());
        assert_eq!(sim.arena().enemies().count(), 0);

        sim.step(TICK_MS, &BTreeMap::new());
        assert_eq!(sim.arena().enemies().count(), 0);
    }

    #[test]
    fn winner_fires_exactly_once() {
        let mut sim = armed_sim(open_grid(), 3);
        let (one, two) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        if let Some(actor) = sim.arena_mut().actor_mut(two) {
            actor.health.hp = 0;
        }

        let events = run(&mut sim, 0, 5, |_| BTreeMap::new());
        let overs: Vec<_> = events
            .iter()
            .filter_map(|(now, e)| match e {
                Event::MatchOver(outcome) => Some((*now, *outcome)),
                _ => None,
            })
            .collect();

        assert_eq!(overs, vec![(0, Outcome::Winner(Side::One))]);
        assert_eq!(sim.outcome(), Some(Outcome::Winner(Side::One)));
        assert!(sim.arena().actor(one).is_some());
        assert!(sim.arena().actor(two).is_none());
    }

    #[test]
    fn simultaneous_elimination_is_a_draw() {
        let mut sim = armed_sim(open_grid(), 4);
        let (one, two) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        for id in [one, two] {
            if let Some(actor) = sim.arena_mut().actor_mut(id) {
                actor.health.hp = 0;
            }
        }

        let events = sim.step(0, &BTreeMap::new());
        assert!(events.contains(&Event::MatchOver(Outcome::Draw)));
        assert!(sim.step(TICK_MS, &BTreeMap::new()).is_empty());
    }
}

mod movement_tests {
    use super::*;

    #[test]
    fn blocked_move_rolls_back_fully() {
        let grid = open_grid().with_obstacle_rect(Rect::new(Vec2::new(140.0, 100.0), Vec2::new(10.0, 40.0)));
        let mut sim = armed_sim(grid, 5);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));

        let events = sim.step(0, &only(hero, walk(1, 0)));

        assert_eq!(position(&sim, hero), Some(Vec2::new(100.0, 100.0)));
        assert!(!events.iter().any(|e| matches!(e, Event::ActorMoved { .. })));
        // Facing still follows the input.
        assert_eq!(sim.arena().actor(hero).map(|a| a.body.facing), Some(0.0));
    }

    #[test]
    fn open_move_is_per_axis() {
        let mut sim = armed_sim(open_grid(), 5);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));

        let events = sim.step(0, &only(hero, walk(1, 1)));

        assert_eq!(position(&sim, hero), Some(Vec2::new(105.0, 105.0)));
        assert_eq!(
            events,
            vec![Event::ActorMoved {
                actor: hero,
                position: Vec2::new(105.0, 105.0),
            }]
        );
        let facing = sim.arena().actor(hero).map(|a| a.body.facing);
        assert!(facing.is_some_and(|f| (f + 45.0).abs() < 1e-4));
    }

    #[test]
    fn moves_clamp_to_the_world() {
        let mut sim = armed_sim(open_grid(), 5);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 0.0), Vec2::new(800.0, 800.0));

        sim.step(0, &only(hero, walk(0, -1)));
        assert_eq!(position(&sim, hero), Some(Vec2::new(100.0, 0.0)));
    }
}

mod boomerang_tests {
    use super::*;

    #[test]
    fn outbound_for_max_time_then_returns_and_frees_slot() {
        let mut sim = armed_sim(open_grid(), 6);
        let (hero, _) = duel(&mut sim, Vec2::new(300.0, 300.0), Vec2::new(900.0, 900.0));
        assert!(sim.give_weapon(hero, WeaponKind::Boomerang));

        let first = sim.step(0, &only(hero, cycle_and_attack()));
        let Some(boomerang) = first.iter().find_map(|e| match e {
            Event::ProjectileSpawned { projectile, class: ProjectileClass::Boomerang, .. } => Some(*projectile),
            _ => None,
        }) else {
            panic!("no boomerang spawned: {first:?}");
        };
        assert_eq!(sim.arena().actor(hero).and_then(|a| a.slots.boomerang), Some(boomerang));

        // A second throw while the first is out is refused.
        let events = run(&mut sim, 1, 400, |now| {
            if now == 1_200 {
                only(hero, attack())
            } else {
                BTreeMap::new()
            }
        });
        let spawns = events
            .iter()
            .filter(|(_, e)| matches!(e, Event::ProjectileSpawned { .. }))
            .count();
        assert_eq!(spawns, 0);

        let returned_at = events.iter().find_map(|(now, e)| match e {
            Event::PhaseChanged { projectile, from: Phase::Outbound, to: Phase::Returning }
                if *projectile == boomerang => Some(*now),
            _ => None,
        });
        // First tick at or past 1500 ms.
        assert_eq!(returned_at, Some(1_504));

        assert!(events
            .iter()
            .any(|(_, e)| *e == Event::ProjectileDespawned { projectile: boomerang }));
        assert_eq!(sim.arena().actor(hero).and_then(|a| a.slots.boomerang), None);
        assert_eq!(sim.arena().projectile_count(), 0);
    }
}

mod yoyo_tests {
    use super::*;

    #[test]
    fn only_one_yoyo_at_a_time() {
        let mut sim = armed_sim(open_grid(), 7);
        let (hero, _) = duel(&mut sim, Vec2::new(300.0, 300.0), Vec2::new(900.0, 900.0));
        assert!(sim.give_weapon(hero, WeaponKind::Yoyo));

        sim.step(0, &only(hero, cycle_and_attack()));
        assert_eq!(sim.arena().projectile_count(), 1);
        let thrown_at = sim
            .arena()
            .actor(hero)
            .and_then(|a| a.inventory.active())
            .and_then(|w| w.last_used());
        assert_eq!(thrown_at, Some(0));

        // Cooldown (100 ms) has passed but the first yo-yo is still out.
        let events = run(&mut sim, 1, 12, |_| only(hero, attack()));
        assert!(!events
            .iter()
            .any(|(_, e)| matches!(e, Event::ProjectileSpawned { .. })));
        assert_eq!(sim.arena().projectile_count(), 1);

        // The refused throws left the cooldown untouched.
        let last = sim
            .arena()
            .actor(hero)
            .and_then(|a| a.inventory.active())
            .and_then(|w| w.last_used());
        assert_eq!(last, Some(0));
    }

    #[test]
    fn hit_stuns_pulls_and_gates_input() {
        let mut sim = armed_sim(open_grid(), 8);
        let (hero, foe) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(250.0, 100.0));
        assert!(sim.give_weapon(hero, WeaponKind::Yoyo));

        sim.step(0, &only(hero, cycle_and_attack()));
        let events = run(&mut sim, 1, 20, |_| BTreeMap::new());

        let Some((hit_at, until)) = events.iter().find_map(|(now, e)| match e {
            Event::ActorStunned { actor, until } if *actor == foe => Some((*now, *until)),
            _ => None,
        }) else {
            panic!("yo-yo never connected: {events:?}");
        };
        assert_eq!(until, hit_at + 1_200);
        assert_eq!(hp(&sim, foe), Some(28));
        // Pulled 30 units toward the thrower.
        assert_eq!(position(&sim, foe), Some(Vec2::new(220.0, 100.0)));

        // Input is ignored until the deadline.
        let pinned = position(&sim, foe);
        let first = 21;
        let last = until.div_ceil(TICK_MS);
        run(&mut sim, first, last - first, |_| only(foe, walk(1, 0)));
        assert_eq!(position(&sim, foe), pinned);
        assert!(sim.arena().actor(foe).is_some_and(|a| a.is_stunned()));

        // Once the stun expires the same input moves them.
        sim.step(last * TICK_MS, &only(foe, walk(1, 0)));
        assert!(sim.arena().actor(foe).is_some_and(|a| !a.is_stunned()));
        assert_eq!(position(&sim, foe), Some(Vec2::new(225.0, 100.0)));
    }
}

mod inventory_tests {
    use super::*;

    #[test]
    fn dropped_weapon_waits_out_the_repickup_block() {
        let mut sim = armed_sim(open_grid(), 9);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        assert!(sim.give_weapon(hero, WeaponKind::Bat));

        let drop = ActorInput {
            cycle: 1,
            drop: true,
            ..ActorInput::default()
        };
        let events = sim.step(0, &only(hero, drop));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::WeaponDropped { kind: WeaponKind::Bat, .. })));
        assert_eq!(sim.arena().actor(hero).map(|a| a.inventory.len()), Some(1));
        assert_eq!(sim.arena().actor(hero).map(|a| a.inventory.active_index()), Some(0));

        let events = run(&mut sim, 1, 62, |_| BTreeMap::new());
        assert!(!events
            .iter()
            .any(|(_, e)| matches!(e, Event::WeaponPickedUp { .. })));

        let events = sim.step(1_000, &BTreeMap::new());
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::WeaponPickedUp { actor, kind: WeaponKind::Bat, .. } if *actor == hero)));
        assert_eq!(sim.arena().actor(hero).map(|a| a.inventory.len()), Some(2));
    }

    #[test]
    fn fist_cannot_be_dropped() {
        let mut sim = armed_sim(open_grid(), 9);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        let drop = ActorInput {
            drop: true,
            ..ActorInput::default()
        };
        assert!(sim.step(0, &only(hero, drop)).is_empty());
        assert_eq!(sim.arena().ground_weapons().count(), 0);
    }

    #[test]
    fn walking_over_a_weapon_picks_it_up_until_full() {
        let mut sim = armed_sim(open_grid(), 10);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        sim.place_weapon(WeaponKind::Knife, Vec2::new(150.0, 120.0));
        sim.place_weapon(WeaponKind::Bat, Vec2::new(152.0, 120.0));
        sim.place_weapon(WeaponKind::Shotgun, Vec2::new(154.0, 120.0));

        run(&mut sim, 0, 3, |_| only(hero, walk(1, 0)));

        let held: Vec<_> = sim
            .arena()
            .actor(hero)
            .map(|a| a.inventory.weapons().iter().map(|w| w.kind()).collect())
            .unwrap_or_default();
        assert_eq!(held, vec![WeaponKind::Fist, WeaponKind::Knife, WeaponKind::Bat]);
        assert_eq!(sim.arena().ground_weapons().count(), 1);
    }
}

mod enemy_tests {
    use super::*;

    #[test]
    fn contact_attacks_respect_the_delay() {
        let mut sim = armed_sim(open_grid(), 11);
        let (hero, _) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        let enemy = sim.spawn_enemy(Vec2::new(150.0, 120.0), 8, 0);

        let events = run(&mut sim, 0, 132, |_| BTreeMap::new());

        assert_eq!(
            events.first().map(|(_, e)| e.clone()),
            Some(Event::EnemyStateChanged {
                actor: enemy,
                from: EnemyState::Idle,
                to: EnemyState::ChasingVisible,
            })
        );
        let bites: Vec<_> = events
            .iter()
            .filter_map(|(now, e)| match e {
                Event::ActorDamaged { actor, source, .. } if *actor == hero && *source == enemy => Some(*now),
                _ => None,
            })
            .collect();
        assert_eq!(bites, vec![1_008, 2_016]);
        assert_eq!(hp(&sim, hero), Some(28));
    }

    #[test]
    fn wall_blocks_sight() {
        let grid = open_grid().with_obstacle_rect(Rect::new(Vec2::new(200.0, 0.0), Vec2::new(10.0, 1_000.0)));
        let mut sim = armed_sim(grid, 12);
        duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(800.0, 800.0));
        let enemy = sim.spawn_enemy(Vec2::new(300.0, 120.0), 8, 0);

        let events = sim.step(0, &BTreeMap::new());
        assert!(events.is_empty());
        assert_eq!(
            sim.arena().actor(enemy).and_then(|a| a.as_enemy()).map(|b| b.state),
            Some(EnemyState::Idle)
        );
    }
}

mod incendiary_tests {
    use super::*;

    #[test]
    fn explodes_once_burns_and_spares_the_thrower() {
        let mut sim = armed_sim(open_grid(), 13);
        let (hero, foe) = duel(&mut sim, Vec2::new(100.0, 100.0), Vec2::new(170.0, 100.0));
        assert!(sim.give_weapon(hero, WeaponKind::Molotov));

        sim.step(0, &only(hero, cycle_and_attack()));
        let events = run(&mut sim, 1, 300, |_| BTreeMap::new());

        let phases: Vec<_> = events
            .iter()
            .filter_map(|(now, e)| match e {
                Event::PhaseChanged { from, to, .. } => Some((*now, *from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0], (800, Phase::Waiting, Phase::Active));
        assert_eq!((phases[1].1, phases[1].2), (Phase::Active, Phase::Finished));
        assert!(phases[1].0 >= 3_800);

        let hits: Vec<_> = events
            .iter()
            .filter_map(|(_, e)| match e {
                Event::ActorDamaged { actor, amount, .. } => Some((*actor, *amount)),
                _ => None,
            })
            .collect();
        assert!(hits.iter().all(|(actor, _)| *actor == foe));
        assert_eq!(hits.iter().filter(|(_, amount)| *amount == 5).count(), 1);
        assert_eq!(hp(&sim, hero), Some(30));
        assert_eq!(sim.arena().projectile_count(), 0);
    }
}
