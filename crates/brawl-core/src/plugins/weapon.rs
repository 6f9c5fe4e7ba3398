//! Weapon attacks.
//!
//! [`strike`] turns one attack request into hits and launches:
//!
//! | Params | Result |
//! |---|---|
//! | melee | `ApplyDamage` for every target overlapping the forward hit-box |
//! | spread | one [`Bullet`] per spread angle |
//! | boomerang | one [`Boomerang`], unless one is already out |
//! | yo-yo | one [`Yoyo`], unless one is already out |
//! | incendiary | one [`Incendiary`] at the throw point |
//!
//! The attack is gated by the weapon cooldown. A refused throw leaves the
//! cooldown untouched.

use walkmap::Rect;

use crate::entity::{ActorFlags, ActorView, EntityId, ThrowSlots};
use crate::geom::heading_vector;
use crate::output::Modifier;
use crate::projectile::{Boomerang, Bullet, Incendiary, ProjectileKind, Yoyo};
use crate::weapon::{ProjectileParams, Weapon};
use crate::Millis;

/// The attacking actor as seen by [`strike`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attacker {
    /// Actor id
    pub id: EntityId,
    /// Bounding box
    pub rect: Rect,
    /// Facing in degrees
    pub facing: f32,
    /// Thrown weapons in flight
    pub slots: ThrowSlots,
    /// Status flags
    pub flags: ActorFlags,
}

/// Result of an attack that went off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strike {
    /// Immediate hits (melee only)
    pub modifiers: Vec<Modifier>,
    /// Projectiles and effects to spawn
    pub launches: Vec<ProjectileKind>,
}

/// Forward melee hit-box: the attacker's box pushed `offset` along `facing`.
#[must_use]
pub fn melee_hitbox(rect: &Rect, facing: f32, offset: f32) -> Rect {
    rect.translated(heading_vector(facing) * offset)
}

fn throw_blocked(attacker: &Attacker, params: &ProjectileParams) -> bool {
    match params {
        ProjectileParams::Boomerang(_) => attacker.slots.boomerang.is_some(),
        ProjectileParams::Yoyo(_) => {
            attacker.slots.yoyo.is_some() || attacker.flags.contains(ActorFlags::WEAPON_IN_USE)
        }
        _ => false,
    }
}

/// Attempts an attack with `weapon`.
///
/// # Arguments
///
/// * `attacker` - The attacking actor
/// * `weapon` - Its active weapon; the cooldown is consumed on success
/// * `targets` - Snapshot of every actor (the attacker and the dead are skipped)
/// * `now` - Tick timestamp
///
/// # Returns
///
/// `None` while cooling down or when a single-instance throw is already
/// out; otherwise the hits and launches.
pub fn strike(
    attacker: &Attacker,
    weapon: &mut Weapon,
    targets: &[ActorView],
    now: Millis,
) -> Option<Strike> {
    if throw_blocked(attacker, &weapon.spec().params) || !weapon.try_use(now) {
        return None;
    }

    let spec = weapon.spec();
    let center = attacker.rect.center();
    let mut out = Strike::default();
    match &spec.params {
        ProjectileParams::Melee(p) => {
            let hitbox = melee_hitbox(&attacker.rect, attacker.facing, p.offset);
            out.modifiers = targets
                .iter()
                .filter(|t| t.alive && t.id != attacker.id && t.rect.intersects(&hitbox))
                .map(|t| Modifier::ApplyDamage {
                    source: attacker.id,
                    target: t.id,
                    amount: spec.damage,
                })
                .collect();
        }
        ProjectileParams::Spread(p) => {
            out.launches = p
                .spread_angles
                .iter()
                .map(|offset| {
                    ProjectileKind::Bullet(Bullet::new(
                        center,
                        attacker.facing + offset,
                        spec.damage,
                        p,
                        now,
                    ))
                })
                .collect();
        }
        ProjectileParams::Boomerang(p) => {
            out.launches.push(ProjectileKind::Boomerang(Boomerang::new(
                center,
                attacker.facing,
                spec.damage,
                p,
                now,
            )));
        }
        ProjectileParams::Yoyo(p) => {
            out.launches.push(ProjectileKind::Yoyo(Yoyo::new(
                center,
                attacker.facing,
                spec.damage,
                p,
            )));
        }
        ProjectileParams::Incendiary(p) => {
            let impact = center + heading_vector(attacker.facing) * p.throw_distance;
            out.launches
                .push(ProjectileKind::Incendiary(Incendiary::new(impact, p, now)));
        }
    }

    tracing::trace!(
        actor = %attacker.id,
        weapon = %spec.kind,
        hits = out.modifiers.len(),
        launches = out.launches.len(),
        "attack"
    );
    Some(out)
}
