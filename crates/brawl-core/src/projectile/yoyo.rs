use glam::Vec2;
use serde::{Deserialize, Serialize};
use walkmap::Rect;

use super::{Behavior, Phase, TickContext};
use crate::geom::heading_vector;
use crate::output::Modifier;
use crate::weapon::YoyoParams;
use crate::Millis;

/// Stun-and-pull throw.
///
/// Flies straight out until it hits something or has travelled
/// `max_distance`. A hit damages and stuns the target, pulls it toward the
/// owner by `pull_speed`, and sticks for one tick. Then it flies back to
/// the owner's current position and finishes within one step of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yoyo {
    rect: Rect,
    direction: Vec2,
    traveled: f32,
    damage: i32,
    params: YoyoParams,
    phase: Phase,
}

impl Yoyo {
    /// Creates a yo-yo thrown from `origin` along `heading` degrees.
    #[must_use]
    pub fn new(origin: Vec2, heading: f32, damage: i32, params: &YoyoParams) -> Self {
        Self {
            rect: Rect::from_center(origin, params.size),
            direction: heading_vector(heading),
            traveled: 0.0,
            damage,
            params: params.clone(),
            phase: Phase::Outgoing,
        }
    }

    /// Current box.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Distance covered while outgoing.
    #[must_use]
    pub const fn traveled(&self) -> f32 {
        self.traveled
    }

    fn stun_until(&self, now: Millis) -> Millis {
        now + self.params.stun_duration
    }
}

impl Behavior for Yoyo {
    fn update(&mut self, ctx: &TickContext<'_>) {
        match self.phase {
            Phase::Outgoing => {
                self.rect = self.rect.translated(self.direction * self.params.speed);
                self.traveled += self.params.speed;
            }
            Phase::Stuck => self.phase = Phase::Returning,
            Phase::Returning => {
                let Some(owner) = ctx.owner_center else {
                    self.phase = Phase::Finished;
                    return;
                };
                let to_owner = owner - self.rect.center();
                if to_owner.length() < self.params.speed {
                    self.phase = Phase::Finished;
                } else {
                    self.rect = self
                        .rect
                        .translated(to_owner.normalize_or_zero() * self.params.speed);
                }
            }
            _ => {}
        }
    }

    fn collide(&mut self, ctx: &TickContext<'_>, hits: &mut Vec<Modifier>) {
        if self.phase != Phase::Outgoing {
            return;
        }
        if let Some(target) = ctx.targets().find(|a| a.rect.intersects(&self.rect)) {
            hits.push(Modifier::ApplyDamage {
                source: ctx.owner,
                target: target.id,
                amount: self.damage,
            });
            hits.push(Modifier::Stun {
                source: ctx.owner,
                target: target.id,
                until: self.stun_until(ctx.now),
            });
            if let Some(owner) = ctx.owner_center {
                let pull = (owner - target.center()).normalize_or_zero() * self.params.pull_speed;
                if pull != Vec2::ZERO {
                    hits.push(Modifier::Displace {
                        target: target.id,
                        offset: pull,
                    });
                }
            }
            self.phase = Phase::Stuck;
        } else if self.traveled >= self.params.max_distance {
            self.phase = Phase::Returning;
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn hitbox(&self) -> Option<Rect> {
        Some(self.rect)
    }
}
