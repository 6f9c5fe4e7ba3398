//! The walkability query contract.

use glam::Vec2;

use crate::Rect;

/// Read-only classification of which world coordinates are traversable.
///
/// Implementations must be deterministic and immutable for their lifetime:
/// the same coordinates always produce the same answer, and every point
/// outside [`Walkability::bounds`] is non-walkable.
pub trait Walkability {
    /// Returns `true` if an actor may stand at `(x, y)`.
    fn is_walkable(&self, x: f32, y: f32) -> bool;

    /// The world rectangle the surface covers.
    fn bounds(&self) -> Rect;

    /// Edge length of one classification cell in world units.
    ///
    /// Line-of-sight traces step one cell at a time.
    fn cell_size(&self) -> f32 {
        1.0
    }

    /// Point query taking a vector.
    fn is_walkable_at(&self, point: Vec2) -> bool {
        self.is_walkable(point.x, point.y)
    }

    /// All four corners of `rect` are walkable.
    fn corners_walkable(&self, rect: &Rect) -> bool {
        rect.corners().iter().all(|p| self.is_walkable_at(*p))
    }

    /// The centre and all four corners of `rect` are walkable.
    fn samples_walkable(&self, rect: &Rect) -> bool {
        rect.sample_points().iter().all(|p| self.is_walkable_at(*p))
    }
}

impl<T: Walkability + ?Sized> Walkability for &T {
    fn is_walkable(&self, x: f32, y: f32) -> bool {
        (**self).is_walkable(x, y)
    }

    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn cell_size(&self) -> f32 {
        (**self).cell_size()
    }
}
