use glam::Vec2;
use serde::{Deserialize, Serialize};
use walkmap::Rect;

use super::{Behavior, Phase, TickContext};
use crate::geom::within_radius;
use crate::output::Modifier;
use crate::weapon::IncendiaryParams;
use crate::Millis;

/// Timed area effect left by an incendiary throw.
///
/// Does not move. `Waiting` until the fuse runs out, then explodes once
/// (`explosion_damage` to everything within `radius`) and burns
/// (`burn_damage` every `burn_interval`) until `fire_duration` has passed.
/// Targets are tested by the squared distance of their centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incendiary {
    center: Vec2,
    explode_at: Millis,
    end_at: Millis,
    last_burn: Millis,
    detonated: bool,
    params: IncendiaryParams,
    phase: Phase,
}

impl Incendiary {
    /// Creates an effect at `center` whose fuse starts at `now`.
    #[must_use]
    pub fn new(center: Vec2, params: &IncendiaryParams, now: Millis) -> Self {
        let explode_at = now + params.explosion_delay;
        Self {
            center,
            explode_at,
            end_at: explode_at + params.fire_duration,
            last_burn: explode_at,
            detonated: false,
            params: params.clone(),
            phase: Phase::Waiting,
        }
    }

    /// Impact point.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Effect radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.params.radius
    }

    /// Timestamp of the explosion.
    #[must_use]
    pub const fn explode_at(&self) -> Millis {
        self.explode_at
    }

    /// Timestamp at which the fire goes out.
    #[must_use]
    pub const fn end_at(&self) -> Millis {
        self.end_at
    }

    fn scorch(&self, ctx: &TickContext<'_>, amount: i32, hits: &mut Vec<Modifier>) {
        for target in ctx.targets() {
            if within_radius(self.center, target.center(), self.params.radius) {
                hits.push(Modifier::ApplyDamage {
                    source: ctx.owner,
                    target: target.id,
                    amount,
                });
            }
        }
    }
}

impl Behavior for Incendiary {
    fn update(&mut self, ctx: &TickContext<'_>) {
        match self.phase {
            Phase::Waiting if ctx.now >= self.explode_at => {
                self.phase = Phase::Active;
                self.last_burn = ctx.now;
            }
            Phase::Active if ctx.now >= self.end_at => self.phase = Phase::Finished,
            _ => {}
        }
    }

    fn collide(&mut self, ctx: &TickContext<'_>, hits: &mut Vec<Modifier>) {
        if self.phase != Phase::Active {
            return;
        }
        if !self.detonated {
            self.detonated = true;
            self.scorch(ctx, self.params.explosion_damage, hits);
        } else if ctx.now.saturating_sub(self.last_burn) >= self.params.burn_interval {
            self.last_burn = ctx.now;
            self.scorch(ctx, self.params.burn_damage, hits);
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn hitbox(&self) -> Option<Rect> {
        None
    }
}
