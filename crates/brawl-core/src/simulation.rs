//! Simulation module with the fixed-order World Tick.
//!
//! The `Simulation` struct owns the arena, the walkability surface, the
//! resolved tuning and the seeded random stream, and advances them through
//! one deterministic tick per [`Simulation::step`]:
//!
//! 1. **STUNS**: expired stuns clear; stunned enemies fall back to idle
//! 2. **INTENTS**: players cycle, drop, turn and attack
//! 3. **MOVEMENT**: player moves validated against the surface
//! 4. **PICKUP**: ground weapons under an actor go into its inventory
//! 5. **AI**: enemy perception, steering and contact attacks
//! 6. **PROJECTILES**: update then collide every live projectile
//! 7. **RESOLUTION**: modifiers routed to resolvers, then cleanup
//! 8. **OUTCOME**: the edge-triggered winner signal
//!
//! # Determinism
//!
//! - Actors, projectiles and ground weapons are iterated in id order
//!   (via `BTreeMap`)
//! - Player inputs are applied in id order
//! - Every random draw comes from one `ChaCha8Rng` seeded by the master seed
//!
//! # Example
//!
//! ```
//! use brawl_core::config::Tuning;
//! use brawl_core::entity::Side;
//! use brawl_core::simulation::{ActorInput, Simulation};
//! use brawl_core::walkmap::{WalkGrid, Walkability};
//! use glam::Vec2;
//! use std::collections::BTreeMap;
//!
//! let tuning = Tuning::from_json(r#"{
//!     "player_stats": { "default": { "speed": 5, "health": 30, "inventory_limit": 3 } },
//!     "enemy": {
//!         "speed": 2, "health_range": [5, 10], "damage": 1, "attack_delay": 1000,
//!         "min_spawn_distance": 200, "vision_range": 300
//!     },
//!     "weapons": { "types": ["fist"], "stats": { "fist": { "damage": 1, "cooldown": 300 } } }
//! }"#).unwrap();
//!
//! let grid = WalkGrid::open(40, 30, 10.0).unwrap();
//! let bounds = grid.bounds();
//! let mut sim = Simulation::new(grid, bounds, tuning, 42);
//! let hero = sim.spawn_player(Side::One, "default", Vec2::new(20.0, 20.0)).unwrap();
//!
//! let walk_right = ActorInput { right: true, ..ActorInput::default() };
//! for now in 0..10 {
//!     sim.step(now * 16, &BTreeMap::from([(hero, walk_right)]));
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.arena().actor(hero).map(|a| a.rect().pos.x), Some(70.0));
//! ```

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info, trace};
use walkmap::{Rect, WalkGrid, Walkability};

use crate::arena::{Arena, GroundWeapon};
use crate::config::{EnemySpec, LevelDef, Tuning};
use crate::entity::{
    Actor, ActorFlags, ActorKind, ActorView, Body, EnemyBrain, EnemyState, EntityId, Side,
};
use crate::error::ConfigError;
use crate::geom::heading_degrees;
use crate::output::{Event, Modifier, Outcome};
use crate::plugins::{self, input_delta, perceive, steer, strike, try_move, Attacker};
use crate::projectile::{Projectile, ProjectileClass};
use crate::resolver::{CleanupResolver, CombatResolver, Resolver};
use crate::spawn::{roll, Spawner};
use crate::weapon::{Weapon, WeaponKind};
use crate::Millis;

// =============================================================================
// Input
// =============================================================================

/// One tick of input for one player.
///
/// Movement keys are held states; `attack`, `cycle` and `drop` are edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInput {
    /// Move up (negative y)
    pub up: bool,
    /// Move down (positive y)
    pub down: bool,
    /// Move left
    pub left: bool,
    /// Move right
    pub right: bool,
    /// Attack with the active weapon
    pub attack: bool,
    /// Active-slot change: -1, 0 or +1
    pub cycle: i8,
    /// Drop the active weapon
    pub drop: bool,
}

/// What [`Simulation::populate`] placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
    /// Ground weapon ids in placement order
    pub weapons: Vec<EntityId>,
    /// Enemy ids in placement order
    pub enemies: Vec<EntityId>,
}

// =============================================================================
// Simulation
// =============================================================================

/// The World Tick orchestrator.
///
/// `Simulation` manages:
/// - The arena of actors, projectiles and ground weapons
/// - The static walkability surface
/// - Resolvers for modifier processing
/// - A seeded random stream for level population
///
/// # Determinism
///
/// Given the same seed, level, tuning and input sequence, the simulation
/// produces identical arenas and event streams.
pub struct Simulation<S: Walkability = WalkGrid> {
    arena: Arena,
    surface: S,
    tuning: Tuning,
    rng: ChaCha8Rng,
    /// Run in order; cleanup is always last.
    resolvers: Vec<Box<dyn Resolver>>,
    master_seed: u64,
    /// Sides that have had a player in the arena.
    contenders: BTreeSet<Side>,
    outcome: Option<Outcome>,
}

impl<S: Walkability + fmt::Debug> fmt::Debug for Simulation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("surface", &self.surface)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("master_seed", &self.master_seed)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Simulation<WalkGrid> {
    /// Builds a simulation for a level and spawns both players.
    ///
    /// # Arguments
    ///
    /// * `level` - Level document; supplies bounds, surface and spawn points
    /// * `tuning` - Resolved tuning
    /// * `profiles` - Player profile names for player one and player two
    /// * `seed` - Master seed
    ///
    /// # Errors
    ///
    /// Fails on an unusable layout or an unknown player profile.
    pub fn from_level(
        level: &LevelDef,
        tuning: Tuning,
        profiles: [&str; 2],
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut sim = Self::new(level.surface()?, level.bounds(), tuning, seed);
        sim.spawn_player(Side::One, profiles[0], level.player_spawn.player1)?;
        sim.spawn_player(Side::Two, profiles[1], level.player_spawn.player2)?;
        Ok(sim)
    }
}

impl<S: Walkability> Simulation<S> {
    /// Creates an empty simulation.
    ///
    /// Starts at tick 0 with the default resolvers (Combat, Cleanup).
    ///
    /// # Arguments
    ///
    /// * `surface` - Static walkability surface
    /// * `bounds` - World rectangle actors are clamped to
    /// * `tuning` - Resolved tuning
    /// * `seed` - Master seed for the random stream
    #[must_use]
    pub fn new(surface: S, bounds: Rect, tuning: Tuning, seed: u64) -> Self {
        Self {
            arena: Arena::new(bounds),
            surface,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            resolvers: vec![
                Box::new(CombatResolver::new()),
                Box::new(CleanupResolver::new()),
            ],
            master_seed: seed,
            contenders: BTreeSet::new(),
            outcome: None,
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Spawns a player holding only a fist.
    ///
    /// # Arguments
    ///
    /// * `side` - The side the player fights for
    /// * `profile` - Player profile name in the tuning
    /// * `top_left` - Top-left corner of the body
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] for an unconfigured profile.
    pub fn spawn_player(
        &mut self,
        side: Side,
        profile: &str,
        top_left: Vec2,
    ) -> Result<EntityId, ConfigError> {
        let stats = self.tuning.player(profile)?;
        let fist = self
            .tuning
            .weapon(WeaponKind::Fist)
            .ok_or(ConfigError::MissingWeapon(WeaponKind::Fist))?;

        let body = Body {
            rect: Rect::new(top_left, stats.size).clamped_within(&self.arena.bounds()),
            speed: stats.speed,
            facing: 0.0,
        };
        let mut actor = Actor::new(
            EntityId::new(0),
            ActorKind::Player(side),
            body,
            stats.health,
            stats.inventory_limit,
        );
        if actor.inventory.push(Weapon::new(fist.clone())).is_err() {
            return Err(ConfigError::InvalidInventoryLimit(profile.to_owned()));
        }

        let id = self.arena.spawn_actor(actor);
        self.contenders.insert(side);
        info!(actor = %id, %side, profile, "player spawned");
        Ok(id)
    }

    /// Spawns an enemy centred on `center` whose attack timer starts at `now`.
    pub fn spawn_enemy(&mut self, center: Vec2, hp: i32, now: Millis) -> EntityId {
        let rect = Rect::from_center(center, self.tuning.enemy().size);
        let actor = enemy_actor(self.tuning.enemy(), rect, hp, now);
        self.arena.spawn_actor(actor)
    }

    /// Puts a fresh weapon of `kind` on the ground centred on `center`.
    ///
    /// Returns `None` if the type is not configured.
    pub fn place_weapon(&mut self, kind: WeaponKind, center: Vec2) -> Option<EntityId> {
        let spec = self.tuning.weapon(kind)?.clone();
        let rect = Rect::from_center(center, self.tuning.spawn().weapon_size);
        Some(self.arena.place_weapon(GroundWeapon::new(Weapon::new(spec), rect)))
    }

    /// Adds a fresh weapon of `kind` to an actor's inventory.
    ///
    /// Returns false if the actor is gone, the inventory is full or the type
    /// is not configured.
    pub fn give_weapon(&mut self, actor: EntityId, kind: WeaponKind) -> bool {
        let Some(spec) = self.tuning.weapon(kind) else {
            return false;
        };
        self.arena
            .actor_mut(actor)
            .is_some_and(|a| a.inventory.push(Weapon::new(spec.clone())).is_ok())
    }

    /// Places the stochastic ground weapons and their guarding enemies.
    ///
    /// Call after the players are spawned: placement keeps clear of them.
    /// Every draw comes from the simulation's seeded stream.
    pub fn populate(&mut self, now: Millis) -> Population {
        let mut population = Population::default();
        let kinds = self.tuning.spawnable_kinds();
        if kinds.is_empty() {
            debug!("no spawnable weapon types, skipping population");
            return population;
        }

        let settings = self.tuning.spawn();
        let enemy = self.tuning.enemy();
        let spawner = Spawner::new(&self.surface, self.arena.bounds(), settings);
        let player_rects: Vec<Rect> = self.arena.players().map(Actor::rect).collect();
        let player_centers: Vec<Vec2> = self.arena.players().map(Actor::center).collect();
        let mut weapon_rects: Vec<Rect> = Vec::new();
        let mut enemy_rects: Vec<Rect> = Vec::new();

        let count = roll(&mut self.rng, settings.weapon_count);
        for _ in 0..count {
            let spot = spawner.weapon_spot(&mut self.rng, &weapon_rects, &player_rects);
            let Some(spec) = kinds
                .choose(&mut self.rng)
                .and_then(|kind| self.tuning.weapon(*kind))
            else {
                continue;
            };
            let item = self
                .arena
                .place_weapon(GroundWeapon::new(Weapon::new(spec.clone()), spot.rect));
            weapon_rects.push(spot.rect);
            population.weapons.push(item);

            let guards = roll(&mut self.rng, settings.enemies_per_weapon);
            for _ in 0..guards {
                let guard = spawner.enemy_spot(
                    &mut self.rng,
                    spot.rect.pos,
                    enemy.size,
                    &enemy_rects,
                    &player_centers,
                    enemy.min_spawn_distance,
                );
                let hp = roll(&mut self.rng, enemy.health_range);
                let id = self.arena.spawn_actor(enemy_actor(enemy, guard.rect, hp, now));
                enemy_rects.push(guard.rect);
                population.enemies.push(id);
            }
        }

        info!(
            weapons = population.weapons.len(),
            enemies = population.enemies.len(),
            "level populated"
        );
        population
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Executes one simulation tick.
    ///
    /// # Arguments
    ///
    /// * `now` - Timestamp sampled once for this tick; every timer compares
    ///   against it
    /// * `inputs` - Input per player id; missing, dead and non-player ids
    ///   are ignored
    ///
    /// # Returns
    ///
    /// Every event produced during the tick, in phase order.
    pub fn step(&mut self, now: Millis, inputs: &BTreeMap<EntityId, ActorInput>) -> Vec<Event> {
        let mut events = Vec::new();
        let mut modifiers = Vec::new();

        self.expire_stuns(now, &mut events);

        let snapshot = self.arena.actor_views();
        self.player_intents(now, inputs, &snapshot, &mut modifiers, &mut events);
        self.player_movement(inputs, &mut events);
        self.pickup(now, &mut events);

        self.enemy_phase(now, &mut modifiers, &mut events);

        modifiers.extend(plugins::projectile::advance(&mut self.arena, now, &mut events));

        for resolver in &self.resolvers {
            let routed: Vec<&Modifier> = modifiers
                .iter()
                .filter(|m| resolver.handles().contains(&m.kind()))
                .collect();
            resolver.resolve(&routed, now, &mut self.arena, &mut events);
        }

        self.judge(&mut events);
        self.arena.advance_tick();
        events
    }

    fn expire_stuns(&mut self, now: Millis, events: &mut Vec<Event>) {
        for actor in self.arena.actors_mut() {
            if !actor.expire_stun(now) {
                continue;
            }
            let id = actor.id();
            if let Some(brain) = actor.as_enemy_mut() {
                if brain.state == EnemyState::Stunned {
                    brain.state = EnemyState::Idle;
                    debug!(actor = %id, "stun expired");
                    events.push(Event::EnemyStateChanged {
                        actor: id,
                        from: EnemyState::Stunned,
                        to: EnemyState::Idle,
                    });
                }
            }
        }
    }

    fn player_intents(
        &mut self,
        now: Millis,
        inputs: &BTreeMap<EntityId, ActorInput>,
        snapshot: &[ActorView],
        modifiers: &mut Vec<Modifier>,
        events: &mut Vec<Event>,
    ) {
        let repickup = self.tuning.drop_repickup_ms();
        let item_size = self.tuning.spawn().weapon_size;

        for (&id, input) in inputs {
            let Some(actor) = self
                .arena
                .actor_mut(id)
                .filter(|a| a.is_player() && a.is_alive() && !a.is_stunned())
            else {
                continue;
            };

            actor.inventory.cycle(input.cycle);
            let dropped = if input.drop {
                actor.inventory.take_active().map(|w| (w, actor.center()))
            } else {
                None
            };

            let delta = input_delta(input, actor.body.speed);
            if delta != Vec2::ZERO {
                actor.body.facing = heading_degrees(delta);
            }

            let attack = if input.attack {
                let attacker = Attacker {
                    id,
                    rect: actor.rect(),
                    facing: actor.body.facing,
                    slots: actor.slots,
                    flags: actor.flags,
                };
                actor.inventory.active_mut().and_then(|weapon| {
                    let kind = weapon.kind();
                    strike(&attacker, weapon, snapshot, now).map(|s| (kind, s))
                })
            } else {
                None
            };

            if let Some((weapon, center)) = dropped {
                let kind = weapon.kind();
                let item = self.arena.place_weapon(GroundWeapon {
                    weapon,
                    rect: Rect::from_center(center, item_size),
                    blocked: Some((id, now + repickup)),
                });
                info!(actor = %id, %kind, "weapon dropped");
                events.push(Event::WeaponDropped {
                    actor: id,
                    item,
                    kind,
                });
            }

            let Some((source, hit)) = attack else {
                continue;
            };
            trace!(actor = %id, %source, hits = hit.modifiers.len(), launches = hit.launches.len(), "attack");
            modifiers.extend(hit.modifiers);
            for launch in hit.launches {
                let class = launch.class();
                let projectile = self
                    .arena
                    .spawn_projectile(Projectile::new(id, source, launch));
                if let Some(actor) = self.arena.actor_mut(id) {
                    match class {
                        ProjectileClass::Boomerang => actor.slots.boomerang = Some(projectile),
                        ProjectileClass::Yoyo => {
                            actor.slots.yoyo = Some(projectile);
                            actor.flags.insert(ActorFlags::WEAPON_IN_USE);
                        }
                        ProjectileClass::Bullet | ProjectileClass::Incendiary => {}
                    }
                }
                events.push(Event::ProjectileSpawned {
                    projectile,
                    owner: id,
                    class,
                });
            }
        }
    }

    fn player_movement(&mut self, inputs: &BTreeMap<EntityId, ActorInput>, events: &mut Vec<Event>) {
        let bounds = self.arena.bounds();
        for (&id, input) in inputs {
            let Some(actor) = self
                .arena
                .actor_mut(id)
                .filter(|a| a.is_player() && a.is_alive() && !a.is_stunned())
            else {
                continue;
            };
            let delta = input_delta(input, actor.body.speed);
            let Some(moved) = try_move(&self.surface, &bounds, &actor.rect(), delta) else {
                continue;
            };
            if moved != actor.rect() {
                actor.body.rect = moved;
                events.push(Event::ActorMoved {
                    actor: id,
                    position: moved.pos,
                });
            }
        }
    }

    fn pickup(&mut self, now: Millis, events: &mut Vec<Event>) {
        for id in self.arena.actor_ids() {
            let Some(rect) = self
                .arena
                .actor(id)
                .filter(|a| a.is_alive() && !a.inventory.is_full())
                .map(Actor::rect)
            else {
                continue;
            };

            for item in self.arena.reachable_weapons(&rect, id, now) {
                if self.arena.actor(id).map_or(true, |a| a.inventory.is_full()) {
                    break;
                }
                let Some(ground) = self.arena.take_weapon(item) else {
                    continue;
                };
                let kind = ground.weapon.kind();
                let taken = self
                    .arena
                    .actor_mut(id)
                    .is_some_and(|a| a.inventory.push(ground.weapon).is_ok());
                if taken {
                    info!(actor = %id, %kind, "weapon picked up");
                    events.push(Event::WeaponPickedUp {
                        actor: id,
                        item,
                        kind,
                    });
                }
            }
        }
    }

    fn enemy_phase(&mut self, now: Millis, modifiers: &mut Vec<Modifier>, events: &mut Vec<Event>) {
        let players: Vec<ActorView> = self.arena.players().map(Actor::view).collect();
        let spec = self.tuning.enemy();
        let bounds = self.arena.bounds();

        for id in self.arena.actor_ids() {
            let Some(actor) = self
                .arena
                .actor_mut(id)
                .filter(|a| a.is_alive() && !a.is_stunned())
            else {
                continue;
            };
            let Some(brain) = actor.as_enemy().copied() else {
                continue;
            };

            let perception = perceive(&self.surface, &brain, actor.center(), &players, spec, now);
            let mut next = perception.apply(&brain, now);
            if next.state != brain.state {
                debug!(actor = %id, from = %brain.state, to = %next.state, "enemy state");
                events.push(Event::EnemyStateChanged {
                    actor: id,
                    from: brain.state,
                    to: next.state,
                });
            }

            if let Some(goal) = perception.goal {
                let rect = actor.rect();
                if let Some((moved, direction)) =
                    steer(&self.surface, &bounds, &rect, goal, actor.body.speed)
                {
                    actor.body.facing = heading_degrees(direction);
                    if moved != rect {
                        actor.body.rect = moved;
                        events.push(Event::ActorMoved {
                            actor: id,
                            position: moved.pos,
                        });
                    }
                }
            }

            if let Some(target) = perception.sighted {
                let touching = actor.rect().intersects(&target.rect);
                if touching && now.saturating_sub(next.last_attack) > spec.attack_delay {
                    trace!(actor = %id, target = %target.id, "contact attack");
                    modifiers.push(Modifier::ApplyDamage {
                        source: id,
                        target: target.id,
                        amount: spec.damage,
                    });
                    next.last_attack = now;
                }
            }

            if let Some(slot) = actor.as_enemy_mut() {
                *slot = next;
            }
        }
    }

    fn judge(&mut self, events: &mut Vec<Event>) {
        if self.outcome.is_some() || self.contenders.len() < Side::ALL.len() {
            return;
        }
        let alive: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| self.arena.player(*side).is_some())
            .collect();
        let outcome = match alive.as_slice() {
            [] => Outcome::Draw,
            [side] => Outcome::Winner(*side),
            _ => return,
        };
        info!(%outcome, tick = self.arena.current_tick(), "match over");
        self.outcome = Some(outcome);
        events.push(Event::MatchOver(outcome));
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns a reference to the arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns a mutable reference to the arena.
    ///
    /// Mutate between ticks only.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Returns the master seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.master_seed
    }

    /// The match result once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Resolved tuning.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The walkability surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Adds a custom resolver.
    ///
    /// Custom resolvers run after the combat resolver and before cleanup,
    /// in the order they are added.
    ///
    /// # Arguments
    ///
    /// * `resolver` - The resolver to add
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        let at = self.resolvers.len().saturating_sub(1);
        self.resolvers.insert(at, resolver);
    }

    /// Returns the number of resolvers in the simulation.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

fn enemy_actor(spec: &EnemySpec, rect: Rect, hp: i32, now: Millis) -> Actor {
    let body = Body {
        rect,
        speed: spec.speed,
        facing: 0.0,
    };
    Actor::new(
        EntityId::new(0),
        ActorKind::Enemy(EnemyBrain::new(now)),
        body,
        hp,
        0,
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ModifierKind;
    use crate::tests::{open_sim, tuning};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingResolver {
        seen: Arc<AtomicUsize>,
    }

    impl Resolver for CountingResolver {
        fn handles(&self) -> &[ModifierKind] {
            &[ModifierKind::Damage]
        }

        fn resolve(&self, modifiers: &[&Modifier], _now: Millis, _arena: &mut Arena, _events: &mut Vec<Event>) {
            self.seen.fetch_add(modifiers.len(), Ordering::SeqCst);
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn new_starts_empty_at_tick_zero() {
            let sim = open_sim(7);
            assert_eq!(sim.tick(), 0);
            assert_eq!(sim.seed(), 7);
            assert_eq!(sim.arena().actor_count(), 0);
            assert_eq!(sim.resolver_count(), 2);
            assert_eq!(sim.outcome(), None);
        }

        #[test]
        fn players_start_with_a_fist() {
            let mut sim = open_sim(1);
            let id = sim
                .spawn_player(Side::One, "default", Vec2::new(10.0, 10.0))
                .unwrap();
            let actor = sim.arena().actor(id).unwrap();
            assert_eq!(actor.inventory.len(), 1);
            assert_eq!(actor.inventory.active().map(Weapon::kind), Some(WeaponKind::Fist));
            assert_eq!(actor.rect().pos, Vec2::new(10.0, 10.0));
        }

        #[test]
        fn unknown_profile_fails() {
            let mut sim = open_sim(1);
            let err = sim
                .spawn_player(Side::One, "ghost", Vec2::ZERO)
                .unwrap_err();
            assert!(matches!(err, ConfigError::UnknownProfile(_)));
            assert_eq!(sim.arena().actor_count(), 0);
        }

        #[test]
        fn enemies_hold_nothing() {
            let mut sim = open_sim(1);
            let id = sim.spawn_enemy(Vec2::new(100.0, 100.0), 5, 0);
            assert!(!sim.give_weapon(id, WeaponKind::Bat));
            let enemy = sim.arena().actor(id).unwrap();
            assert!(enemy.inventory.is_empty());
            assert_eq!(enemy.as_enemy().map(|b| b.last_attack), Some(0));
        }

        #[test]
        fn debug_summarises_resolvers() {
            let sim = open_sim(3);
            let text = format!("{sim:?}");
            assert!(text.contains("[2 resolvers]"));
        }
    }

    mod resolver_tests {
        use super::*;

        #[test]
        fn custom_resolver_runs_before_cleanup() {
            let mut sim = open_sim(1);
            let seen = Arc::new(AtomicUsize::new(0));
            sim.add_resolver(Box::new(CountingResolver { seen: Arc::clone(&seen) }));
            assert_eq!(sim.resolver_count(), 3);

            let hero = sim
                .spawn_player(Side::One, "default", Vec2::new(100.0, 100.0))
                .unwrap();
            sim.spawn_player(Side::Two, "default", Vec2::new(140.0, 100.0))
                .unwrap();
            let punch = ActorInput {
                attack: true,
                ..ActorInput::default()
            };
            sim.step(0, &BTreeMap::from([(hero, punch)]));
            assert_eq!(seen.load(Ordering::SeqCst), 1);
        }
    }

    mod populate_tests {
        use super::*;

        #[test]
        fn populate_without_spawnable_types_is_empty() {
            let mut sim = open_sim(9);
            assert_eq!(sim.populate(0), Population::default());
        }

        #[test]
        fn populate_respects_configured_counts() {
            let surface = WalkGrid::open(100, 100, 10.0).unwrap();
            let bounds = surface.bounds();
            let mut sim = Simulation::new(surface, bounds, tuning(&["fist", "bat", "shotgun"]), 21);
            sim.spawn_player(Side::One, "default", Vec2::new(50.0, 50.0))
                .unwrap();

            let placed = sim.populate(0);
            assert!((3..=20).contains(&placed.weapons.len()));
            assert!(placed.enemies.len() >= placed.weapons.len());
            assert!(placed.enemies.len() <= placed.weapons.len() * 3);
            for (_, ground) in sim.arena().ground_weapons() {
                assert_ne!(ground.weapon.kind(), WeaponKind::Fist);
            }
            for enemy in sim.arena().enemies() {
                assert!((5..=10).contains(&enemy.health.hp));
            }
        }
    }
}
