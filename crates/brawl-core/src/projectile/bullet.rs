use glam::Vec2;
use serde::{Deserialize, Serialize};
use walkmap::Rect;

use super::{Behavior, Phase, TickContext};
use crate::geom::heading_vector;
use crate::output::Modifier;
use crate::weapon::SpreadParams;
use crate::Millis;

/// Straight-line bullet from a spread-fire weapon.
///
/// Removed on its first contact with a non-owner actor, on leaving the world
/// (when enabled) or when its lifetime runs out (when set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    rect: Rect,
    velocity: Vec2,
    damage: i32,
    spawned_at: Millis,
    max_lifetime: Option<Millis>,
    despawn_out_of_bounds: bool,
    phase: Phase,
}

impl Bullet {
    /// Creates a bullet centred on `center` travelling along `heading` degrees.
    #[must_use]
    pub fn new(center: Vec2, heading: f32, damage: i32, params: &SpreadParams, now: Millis) -> Self {
        Self {
            rect: Rect::from_center(center, params.size),
            velocity: heading_vector(heading) * params.speed,
            damage,
            spawned_at: now,
            max_lifetime: params.max_lifetime,
            despawn_out_of_bounds: params.despawn_out_of_bounds,
            phase: Phase::InFlight,
        }
    }

    /// Current box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Displacement per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl Behavior for Bullet {
    fn update(&mut self, ctx: &TickContext<'_>) {
        if self.phase.is_finished() {
            return;
        }
        self.rect = self.rect.translated(self.velocity);

        let expired = self
            .max_lifetime
            .is_some_and(|life| ctx.now.saturating_sub(self.spawned_at) >= life);
        let escaped = self.despawn_out_of_bounds && !self.rect.intersects(&ctx.bounds);
        if expired || escaped {
            self.phase = Phase::Finished;
        }
    }

    fn collide(&mut self, ctx: &TickContext<'_>, hits: &mut Vec<Modifier>) {
        if self.phase.is_finished() {
            return;
        }
        if let Some(target) = ctx.targets().find(|a| a.rect.intersects(&self.rect)) {
            hits.push(Modifier::ApplyDamage {
                source: ctx.owner,
                target: target.id,
                amount: self.damage,
            });
            self.phase = Phase::Finished;
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn hitbox(&self) -> Option<Rect> {
        Some(self.rect)
    }
}
