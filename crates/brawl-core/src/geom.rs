//! Angle helpers.
//!
//! World coordinates grow downward, but headings are measured the usual
//! way: degrees counter-clockwise from +x with y pointing up. Every piece
//! of facing-dependent geometry (melee offset, spread angles, throw
//! direction, enemy facing) goes through these two functions.

use glam::Vec2;

/// Unit vector in world coordinates for a heading in degrees.
///
/// ```
/// use brawl_core::geom::heading_vector;
///
/// let up = heading_vector(90.0);
/// assert!(up.x.abs() < 1e-6);
/// assert!((up.y + 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, -sin)
}

/// Heading in degrees of a world-space direction. Zero for a zero vector.
#[must_use]
pub fn heading_degrees(direction: Vec2) -> f32 {
    (-direction.y).atan2(direction.x).to_degrees()
}

/// `direction` turned by `degrees` in the heading convention.
#[must_use]
pub fn rotated(direction: Vec2, degrees: f32) -> Vec2 {
    heading_vector(heading_degrees(direction) + degrees) * direction.length()
}

/// Squared-distance radius test.
#[must_use]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}
