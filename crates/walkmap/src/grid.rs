//! Per-cell walkability backed by two boolean layers.
//!
//! A cell is walkable when it is inside the grid, is not void (off the map,
//! e.g. a pit or the black background) and holds no obstacle (a wall).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::Walkability;
use crate::{Rect, SurfaceError};

/// Glyph for a walkable cell in ASCII layouts.
pub const GLYPH_FLOOR: char = '.';
/// Glyph for an obstacle cell.
pub const GLYPH_WALL: char = '#';
/// Glyphs for void cells.
pub const GLYPHS_VOID: [char; 2] = ['~', ' '];

/// Integer cell coordinate. May lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Cell {
    /// Create a cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance to another cell.
    #[must_use]
    pub fn chebyshev(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Immutable grid of walkability cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkGrid {
    width: usize,
    height: usize,
    cell_size: f32,
    void: Vec<bool>,
    obstacle: Vec<bool>,
}

impl WalkGrid {
    /// A fully walkable grid.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if a dimension is zero or `cell_size` is not
    /// positive.
    pub fn open(width: usize, height: usize, cell_size: f32) -> Result<Self, SurfaceError> {
        let len = width * height;
        Self::from_layers(width, height, cell_size, vec![false; len], vec![false; len])
    }

    /// Build a grid from explicit void and obstacle layers (row-major).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] on empty dimensions, a non-positive cell size
    /// or layers whose length is not `width * height`.
    pub fn from_layers(
        width: usize,
        height: usize,
        cell_size: f32,
        void: Vec<bool>,
        obstacle: Vec<bool>,
    ) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty);
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SurfaceError::CellSize(cell_size));
        }
        for layer in [&void, &obstacle] {
            if layer.len() != width * height {
                return Err(SurfaceError::LayerSize {
                    width,
                    height,
                    found: layer.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            cell_size,
            void,
            obstacle,
        })
    }

    /// Parse a grid from rows of glyphs: `.` floor, `#` wall, `~` or space void.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] for an empty layout, rows of unequal width or
    /// an unknown glyph.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S], cell_size: f32) -> Result<Self, SurfaceError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(SurfaceError::Empty);
        }

        let mut void = Vec::with_capacity(width * height);
        let mut obstacle = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(SurfaceError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                match glyph {
                    GLYPH_FLOOR => {
                        void.push(false);
                        obstacle.push(false);
                    }
                    GLYPH_WALL => {
                        void.push(false);
                        obstacle.push(true);
                    }
                    g if GLYPHS_VOID.contains(&g) => {
                        void.push(true);
                        obstacle.push(false);
                    }
                    _ => return Err(SurfaceError::UnknownGlyph { glyph, row, col }),
                }
            }
        }

        let grid = Self::from_layers(width, height, cell_size, void, obstacle)?;
        tracing::debug!(width, height, cell_size, "walk grid parsed");
        Ok(grid)
    }

    /// Returns a copy with the given cell turned into an obstacle.
    ///
    /// Cells outside the grid are ignored.
    #[must_use]
    pub fn with_obstacle(mut self, cell: Cell) -> Self {
        if let Some(idx) = self.index(cell) {
            self.obstacle[idx] = true;
        }
        self
    }

    /// Returns a copy with every cell overlapped by `rect` turned into an obstacle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_obstacle_rect(mut self, rect: Rect) -> Self {
        let from = self.cell_at(rect.pos);
        let max = rect.max() / self.cell_size;
        let (to_x, to_y) = (max.x.ceil() as i32 - 1, max.y.ceil() as i32 - 1);
        for y in from.y..=to_y {
            for x in from.x..=to_x {
                self = self.with_obstacle(Cell::new(x, y));
            }
        }
        self
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell containing a world point (may be outside the grid).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at(&self, point: Vec2) -> Cell {
        Cell::new(
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// World-space centre of a cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Walkability of a single cell; `false` outside the grid.
    #[must_use]
    pub fn is_cell_walkable(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|idx| !self.void[idx] && !self.obstacle[idx])
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Walkability for WalkGrid {
    fn is_walkable(&self, x: f32, y: f32) -> bool {
        // NaN fails every comparison and lands here too.
        if !(x >= 0.0 && y >= 0.0) {
            return false;
        }
        self.is_cell_walkable(self.cell_at(Vec2::new(x, y)))
    }

    #[allow(clippy::cast_precision_loss)]
    fn bounds(&self) -> Rect {
        Rect::new(
            Vec2::ZERO,
            Vec2::new(
                self.width as f32 * self.cell_size,
                self.height as f32 * self.cell_size,
            ),
        )
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> WalkGrid {
        WalkGrid::from_ascii(&["....", ".#..", "..~.", "...."], 10.0).unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn parses_ascii_layers() {
            let grid = sample();
            assert_eq!(grid.width(), 4);
            assert_eq!(grid.height(), 4);
            assert!(grid.is_cell_walkable(Cell::new(0, 0)));
            assert!(!grid.is_cell_walkable(Cell::new(1, 1)));
            assert!(!grid.is_cell_walkable(Cell::new(2, 2)));
        }

        #[test]
        fn rejects_empty_layout() {
            let rows: [&str; 0] = [];
            assert_eq!(WalkGrid::from_ascii(&rows, 1.0), Err(SurfaceError::Empty));
        }

        #[test]
        fn rejects_ragged_rows() {
            let err = WalkGrid::from_ascii(&["...", ".."], 1.0).unwrap_err();
            assert_eq!(
                err,
                SurfaceError::RaggedRow {
                    row: 1,
                    expected: 3,
                    found: 2
                }
            );
        }

        #[test]
        fn rejects_unknown_glyph() {
            let err = WalkGrid::from_ascii(&["..x"], 1.0).unwrap_err();
            assert!(matches!(err, SurfaceError::UnknownGlyph { glyph: 'x', .. }));
        }

        #[test]
        fn rejects_bad_cell_size() {
            assert!(matches!(
                WalkGrid::open(2, 2, 0.0),
                Err(SurfaceError::CellSize(_))
            ));
            assert!(matches!(
                WalkGrid::open(2, 2, f32::NAN),
                Err(SurfaceError::CellSize(_))
            ));
        }

        #[test]
        fn rejects_mismatched_layers() {
            let err = WalkGrid::from_layers(2, 2, 1.0, vec![false; 4], vec![false; 3]).unwrap_err();
            assert_eq!(
                err,
                SurfaceError::LayerSize {
                    width: 2,
                    height: 2,
                    found: 3
                }
            );
        }

        #[test]
        fn obstacle_rect_marks_covered_cells() {
            let grid = WalkGrid::open(10, 10, 10.0)
                .unwrap()
                .with_obstacle_rect(Rect::new(Vec2::new(20.0, 20.0), Vec2::new(20.0, 10.0)));
            assert!(!grid.is_cell_walkable(Cell::new(2, 2)));
            assert!(!grid.is_cell_walkable(Cell::new(3, 2)));
            assert!(grid.is_cell_walkable(Cell::new(4, 2)));
            assert!(grid.is_cell_walkable(Cell::new(2, 3)));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn world_queries_map_to_cells() {
            let grid = sample();
            assert!(grid.is_walkable(5.0, 5.0));
            assert!(!grid.is_walkable(15.0, 15.0));
            assert!(!grid.is_walkable(25.0, 25.0));
            assert!(grid.is_walkable(39.9, 39.9));
        }

        #[test]
        fn outside_bounds_is_not_walkable() {
            let grid = sample();
            assert!(!grid.is_walkable(-0.1, 5.0));
            assert!(!grid.is_walkable(5.0, -0.1));
            assert!(!grid.is_walkable(40.0, 5.0));
            assert!(!grid.is_walkable(5.0, 40.0));
            assert!(!grid.is_walkable(f32::NAN, 5.0));
        }

        #[test]
        fn bounds_cover_grid() {
            let grid = sample();
            assert_eq!(grid.bounds(), Rect::new(Vec2::ZERO, Vec2::splat(40.0)));
        }

        #[test]
        fn corner_and_sample_checks() {
            let grid = sample();
            let clear = Rect::new(Vec2::new(21.0, 1.0), Vec2::splat(8.0));
            assert!(grid.corners_walkable(&clear));
            assert!(grid.samples_walkable(&clear));

            let straddling = Rect::new(Vec2::new(5.0, 5.0), Vec2::splat(8.0));
            assert!(!grid.corners_walkable(&straddling));
        }
    }

    proptest! {
        #[test]
        fn walkability_is_deterministic(x in -50.0f32..90.0, y in -50.0f32..90.0) {
            let grid = sample();
            let first = grid.is_walkable(x, y);
            for _ in 0..3 {
                prop_assert_eq!(grid.is_walkable(x, y), first);
            }
        }

        #[test]
        fn outside_bounds_never_walkable(
            x in prop_oneof![-1000.0f32..-0.001, 40.0f32..1000.0],
            y in -1000.0f32..1000.0,
        ) {
            let grid = WalkGrid::open(4, 4, 10.0).unwrap();
            prop_assert!(!grid.is_walkable(x, y));
            prop_assert!(!grid.is_walkable(y, x));
        }
    }
}
