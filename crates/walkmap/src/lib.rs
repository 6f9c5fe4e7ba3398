//! # Walkmap
//!
//! Static walkability surfaces for 2D arenas.
//!
//! A surface answers one question: can an actor stand at `(x, y)`? It is built
//! once per level and never mutated afterwards, so it can be shared freely by
//! every system that needs to validate movement or trace sight lines.
//!
//! - [`Walkability`]: the query contract (`is_walkable`, world bounds)
//! - [`WalkGrid`]: a per-cell implementation backed by two boolean layers
//!   (void and obstacle)
//! - [`line_of_sight`] / [`GridLine`]: stepped integer trace between two points
//! - [`Rect`]: the axis-aligned box used for actor bodies and hit-boxes
//!
//! ## Quick Start
//!
//! ```
//! use walkmap::{line_of_sight, WalkGrid, Walkability};
//! use glam::Vec2;
//!
//! let grid = WalkGrid::from_ascii(&[
//!     "......",
//!     "..#...",
//!     "......",
//! ], 10.0).unwrap();
//!
//! assert!(grid.is_walkable(5.0, 5.0));
//! assert!(!grid.is_walkable(25.0, 15.0)); // obstacle cell
//! assert!(!grid.is_walkable(-1.0, 5.0)); // outside the world
//!
//! assert!(!line_of_sight(&grid, Vec2::new(5.0, 15.0), Vec2::new(55.0, 15.0)));
//! assert!(line_of_sight(&grid, Vec2::new(5.0, 5.0), Vec2::new(55.0, 5.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod sight;
pub mod surface;

// Re-exports for convenience
pub use grid::{Cell, WalkGrid};
pub use sight::{line_of_sight, GridLine};
pub use surface::Walkability;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors raised while building a walkability surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The layout has no rows or no columns.
    #[error("walkability layout is empty")]
    Empty,
    /// A row has a different width from the first row.
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },
    /// A glyph that is neither walkable, obstacle nor void.
    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph {
        /// The offending character
        glyph: char,
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        col: usize,
    },
    /// Layer buffers do not match `width * height`.
    #[error("layer length {found} does not match {width}x{height} grid")]
    LayerSize {
        /// Grid width in cells
        width: usize,
        /// Grid height in cells
        height: usize,
        /// Length of the offending layer
        found: usize,
    },
    /// Cell size must be a positive, finite number.
    #[error("cell size must be positive and finite, got {0}")]
    CellSize(f32),
}

/// Axis-aligned rectangle in world coordinates (y grows downward).
///
/// `pos` is the top-left corner. Intersection is strict: rectangles that
/// only share an edge do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Create a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// The same rectangle moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// The same rectangle with its centre moved to `center`.
    #[must_use]
    pub fn centered_at(&self, center: Vec2) -> Self {
        Self::from_center(center, self.size)
    }

    /// Grow (or shrink, for negative amounts) by `amount` in total on each
    /// axis, keeping the centre fixed.
    #[must_use]
    pub fn inflated(&self, amount: Vec2) -> Self {
        Self::from_center(self.center(), (self.size + amount).max(Vec2::ZERO))
    }

    /// Strict overlap test.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && a_max.x > other.pos.x && self.pos.y < b_max.y && a_max.y > other.pos.y
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.pos,
            Vec2::new(max.x, self.pos.y),
            Vec2::new(self.pos.x, max.y),
            max,
        ]
    }

    /// Centre followed by the four corners.
    #[must_use]
    pub fn sample_points(&self) -> [Vec2; 5] {
        let [tl, tr, bl, br] = self.corners();
        [self.center(), tl, tr, bl, br]
    }

    /// Move the rectangle the minimum distance needed to lie inside `bounds`.
    ///
    /// A rectangle larger than `bounds` is pinned to the top-left corner.
    #[must_use]
    pub fn clamped_within(&self, bounds: &Rect) -> Self {
        let max_pos = (bounds.max() - self.size).max(bounds.pos);
        Self {
            pos: self.pos.clamp(bounds.pos, max_pos),
            size: self.size,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO)
    }
}
