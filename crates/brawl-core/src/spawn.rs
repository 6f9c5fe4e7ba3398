//! Stochastic level population.
//!
//! Ground weapons and the enemies guarding them are placed by bounded
//! retry: random candidates are drawn until one satisfies the walkability
//! and distance constraints, or the attempt budget runs out. An exhausted
//! budget never fails the level; the spot falls back to an unconstrained
//! random position inside the world and a warning is logged.
//!
//! Every draw comes from the simulation's single `ChaCha8Rng`, so the same
//! seed always produces the same layout.

use glam::Vec2;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use tracing::warn;
use walkmap::{Rect, Walkability};

use crate::config::SpawnSettings;

/// Uniform inclusive roll over `[lo, hi]`. An inverted range yields `lo`.
pub fn roll<T, R>(rng: &mut R, [lo, hi]: [T; 2]) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng + ?Sized,
{
    if lo >= hi {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// Whole-unit coordinate roll over `[lo, hi]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn roll_coord<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    roll(rng, [lo.ceil() as i64, hi.floor() as i64]) as f32
}

/// A chosen spawn position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    /// The placed box
    pub rect: Rect,
    /// True when every constrained attempt failed
    pub fallback: bool,
}

/// Placement rules over one surface.
#[derive(Debug, Clone, Copy)]
pub struct Spawner<'a, S: ?Sized> {
    surface: &'a S,
    bounds: Rect,
    settings: &'a SpawnSettings,
}

impl<'a, S: Walkability + ?Sized> Spawner<'a, S> {
    /// Creates a spawner for `surface` within `bounds`.
    #[must_use]
    pub fn new(surface: &'a S, bounds: Rect, settings: &'a SpawnSettings) -> Self {
        Self {
            surface,
            bounds,
            settings,
        }
    }

    /// Picks a ground weapon box.
    ///
    /// A candidate is accepted when it stays clear (by the configured
    /// clearance) of every already placed weapon and every player, and its
    /// centre and corners are walkable.
    pub fn weapon_spot<R: Rng + ?Sized>(&self, rng: &mut R, weapons: &[Rect], players: &[Rect]) -> Spot {
        let size = self.settings.weapon_size;
        let pad = Vec2::splat(self.settings.clearance);
        let margin = self.settings.margin;
        let max = self.bounds.max();

        for _ in 0..self.settings.weapon_attempts {
            let pos = Vec2::new(
                roll_coord(rng, self.bounds.pos.x + margin, max.x - margin),
                roll_coord(rng, self.bounds.pos.y + margin, max.y - margin),
            );
            let candidate = Rect::new(pos, size).clamped_within(&self.bounds);
            let clear = weapons
                .iter()
                .chain(players)
                .all(|other| !candidate.intersects(&other.inflated(pad)));
            if clear && self.surface.samples_walkable(&candidate) {
                return Spot {
                    rect: candidate,
                    fallback: false,
                };
            }
        }

        let rect = self.anywhere(rng, size);
        warn!(x = rect.pos.x, y = rect.pos.y, "weapon placement exhausted, using fallback");
        Spot {
            rect,
            fallback: true,
        }
    }

    /// Picks an enemy box near `anchor` (a weapon's top-left corner).
    ///
    /// A candidate is accepted when its centre and corners are walkable, it
    /// does not overlap another enemy (shrunk by 10 units), and its centre
    /// is at least `min_distance` from every player centre.
    pub fn enemy_spot<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        anchor: Vec2,
        size: Vec2,
        enemies: &[Rect],
        players: &[Vec2],
        min_distance: f32,
    ) -> Spot {
        let reach = self.settings.enemy_offset;
        let shrink = Vec2::splat(-10.0);

        for _ in 0..self.settings.enemy_attempts {
            let offset = Vec2::new(roll_coord(rng, -reach, reach), roll_coord(rng, -reach, reach));
            let candidate = Rect::new(anchor + offset, size).clamped_within(&self.bounds);
            if !self.surface.samples_walkable(&candidate) {
                continue;
            }
            let overlaps = enemies
                .iter()
                .any(|e| candidate.intersects(&e.inflated(shrink)));
            let center = candidate.center();
            let too_close = players
                .iter()
                .any(|p| center.distance_squared(*p) < min_distance * min_distance);
            if !overlaps && !too_close {
                return Spot {
                    rect: candidate,
                    fallback: false,
                };
            }
        }

        let rect = self.anywhere(rng, size);
        warn!(x = rect.pos.x, y = rect.pos.y, "enemy placement exhausted, using fallback");
        Spot {
            rect,
            fallback: true,
        }
    }

    /// Unconstrained box of `size` anywhere inside the world.
    fn anywhere<R: Rng + ?Sized>(&self, rng: &mut R, size: Vec2) -> Rect {
        let max = self.bounds.max() - size;
        let pos = Vec2::new(
            roll_coord(rng, self.bounds.pos.x, max.x),
            roll_coord(rng, self.bounds.pos.y, max.y),
        );
        Rect::new(pos, size).clamped_within(&self.bounds)
    }
}
