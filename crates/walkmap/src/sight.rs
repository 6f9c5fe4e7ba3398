//! Stepped line-of-sight traces.
//!
//! Sight lines are walked cell by cell with an integer Bresenham line. A trace
//! between two cells visits exactly `chebyshev(a, b) + 1` cells, every one of
//! them inside the bounding box of the two endpoints, and stops early at the
//! first non-walkable cell.

use glam::Vec2;

use crate::grid::Cell;
use crate::surface::Walkability;

/// Iterator over the cells of a Bresenham line, both endpoints included.
///
/// # Example
///
/// ```
/// use walkmap::{Cell, GridLine};
///
/// let cells: Vec<Cell> = GridLine::new(Cell::new(0, 0), Cell::new(3, 1)).collect();
/// assert_eq!(cells.len(), 4);
/// assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
/// assert_eq!(cells.last(), Some(&Cell::new(3, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct GridLine {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl GridLine {
    /// Create a line from `start` to `end`.
    #[must_use]
    pub fn new(start: Cell, end: Cell) -> Self {
        let (x0, y0) = (i64::from(start.x), i64::from(start.y));
        let (x1, y1) = (i64::from(end.x), i64::from(end.y));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            end_x: x1,
            end_y: y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for GridLine {
    type Item = Cell;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Cell> {
        if self.done {
            return None;
        }
        // Coordinates stay between the two i32 endpoints.
        let cell = Cell::new(self.x as i32, self.y as i32);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(cell);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(cell)
    }
}

/// Returns `true` if every cell on the stepped line from `from` to `to` is
/// walkable.
///
/// Cells are sampled at their centres through [`Walkability::is_walkable`],
/// so any surface implementation can be traced.
#[must_use]
pub fn line_of_sight<S: Walkability + ?Sized>(surface: &S, from: Vec2, to: Vec2) -> bool {
    let cs = surface.cell_size();
    let start = to_cell(from, cs);
    let end = to_cell(to, cs);
    let clear = GridLine::new(start, end).all(|cell| {
        #[allow(clippy::cast_precision_loss)]
        let center = Vec2::new((cell.x as f32 + 0.5) * cs, (cell.y as f32 + 0.5) * cs);
        surface.is_walkable_at(center)
    });
    tracing::trace!(?start, ?end, clear, "sight trace");
    clear
}

#[allow(clippy::cast_possible_truncation)]
fn to_cell(point: Vec2, cell_size: f32) -> Cell {
    Cell::new(
        (point.x / cell_size).floor() as i32,
        (point.y / cell_size).floor() as i32,
    )
}
