use glam::Vec2;
use serde::{Deserialize, Serialize};
use walkmap::Rect;

use super::{Behavior, HitLimiter, Phase, TickContext};
use crate::geom::heading_vector;
use crate::output::Modifier;
use crate::weapon::BoomerangParams;
use crate::Millis;

/// Returning throw.
///
/// Outbound it spirals away: the spiral radius grows by `radius_step` and
/// its angle by `angular_speed` every tick, around a centre drifting along
/// the throw direction. After `max_time` it homes on its owner's current
/// position and is caught within `return_threshold`. It can hit any number
/// of targets, each at most once per `hit_interval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boomerang {
    rect: Rect,
    origin: Vec2,
    direction: Vec2,
    spawned_at: Millis,
    radius: f32,
    angle: f32,
    damage: i32,
    params: BoomerangParams,
    hits: HitLimiter,
    phase: Phase,
}

impl Boomerang {
    /// Creates a boomerang thrown from `origin` along `heading` degrees.
    #[must_use]
    pub fn new(origin: Vec2, heading: f32, damage: i32, params: &BoomerangParams, now: Millis) -> Self {
        Self {
            rect: Rect::from_center(origin, params.size),
            origin,
            direction: heading_vector(heading),
            spawned_at: now,
            radius: 0.0,
            angle: 0.0,
            damage,
            params: params.clone(),
            hits: HitLimiter::new(params.hit_interval),
            phase: Phase::Outbound,
        }
    }

    /// Current box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    fn spiral(&mut self, elapsed: Millis) {
        self.radius += self.params.radius_step;
        self.angle += self.params.angular_speed;
        #[allow(clippy::cast_precision_loss)]
        let drift = self.direction * self.params.speed * (elapsed as f32 / 60.0);
        let orbit = Vec2::new(self.angle.cos(), self.angle.sin()) * self.radius;
        self.rect = self.rect.centered_at(self.origin + drift + orbit);
    }

    fn home(&mut self, owner: Vec2) {
        let to_owner = owner - self.rect.center();
        let distance = to_owner.length();
        let step = to_owner.normalize_or_zero() * distance.min(self.params.speed);
        self.rect = self.rect.translated(step);
        if self.rect.center().distance(owner) < self.params.return_threshold {
            self.phase = Phase::Finished;
        }
    }
}

impl Behavior for Boomerang {
    fn update(&mut self, ctx: &TickContext<'_>) {
        if self.phase == Phase::Outbound {
            let elapsed = ctx.now.saturating_sub(self.spawned_at);
            if elapsed < self.params.max_time {
                self.spiral(elapsed);
                return;
            }
            self.phase = Phase::Returning;
        }
        if self.phase == Phase::Returning {
            match ctx.owner_center {
                Some(owner) => self.home(owner),
                None => self.phase = Phase::Finished,
            }
        }
    }

    fn collide(&mut self, ctx: &TickContext<'_>, hits: &mut Vec<Modifier>) {
        if self.phase.is_finished() {
            return;
        }
        for target in ctx.targets().filter(|a| a.rect.intersects(&self.rect)) {
            if self.hits.try_hit(target.id, ctx.now) {
                hits.push(Modifier::ApplyDamage {
                    source: ctx.owner,
                    target: target.id,
                    amount: self.damage,
                });
            }
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn hitbox(&self) -> Option<Rect> {
        Some(self.rect)
    }
}
