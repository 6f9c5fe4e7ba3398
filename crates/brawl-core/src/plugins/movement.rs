//! Movement against the walkability surface.
//!
//! Two movers share one rule: a tentative box is either accepted whole or
//! the actor stays put for the tick. There is no sliding along walls.
//!
//! - [`try_move`]: player movement. All four corners must be walkable.
//! - [`steer`]: enemy movement toward a goal. The centre and four corners
//!   must be walkable; blocked moves retry along a fixed fan of deflections.

use glam::Vec2;
use walkmap::{Rect, Walkability};

use crate::geom::rotated;
use crate::simulation::ActorInput;

/// Deflections tried in order when the direct step is blocked.
pub const DEFLECTIONS: [f32; 6] = [30.0, -30.0, 45.0, -45.0, 60.0, -60.0];

/// Per-axis movement delta for one tick of player input.
///
/// Opposing keys cancel. Diagonals are not normalised.
#[must_use]
pub fn input_delta(input: &ActorInput, speed: f32) -> Vec2 {
    let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
    Vec2::new(axis(input.left, input.right), axis(input.up, input.down)) * speed
}

/// Moves `rect` by `delta` if every corner of the result is walkable.
///
/// The accepted box is clamped to `bounds`.
///
/// # Returns
///
/// The new box, or `None` for a rejected (or zero) move.
#[must_use]
pub fn try_move<S: Walkability + ?Sized>(
    surface: &S,
    bounds: &Rect,
    rect: &Rect,
    delta: Vec2,
) -> Option<Rect> {
    if delta == Vec2::ZERO || !delta.is_finite() {
        return None;
    }
    let moved = rect.translated(delta);
    surface
        .corners_walkable(&moved)
        .then(|| moved.clamped_within(bounds))
}

/// Steps `rect` toward `goal` at `speed`, deflecting around obstacles.
///
/// The step never overshoots the goal. A goal at the box centre is no
/// movement.
///
/// # Returns
///
/// The new box and the direction actually taken, or `None` when every
/// candidate is blocked.
#[must_use]
pub fn steer<S: Walkability + ?Sized>(
    surface: &S,
    bounds: &Rect,
    rect: &Rect,
    goal: Vec2,
    speed: f32,
) -> Option<(Rect, Vec2)> {
    let to_goal = goal - rect.center();
    let distance = to_goal.length();
    if distance <= f32::EPSILON || speed <= 0.0 {
        return None;
    }
    let step = to_goal / distance * speed.min(distance);

    std::iter::once(step)
        .chain(DEFLECTIONS.iter().map(|deg| rotated(step, *deg)))
        .find_map(|candidate| {
            let moved = rect.translated(candidate);
            surface
                .samples_walkable(&moved)
                .then(|| (moved.clamped_within(bounds), candidate))
        })
}
