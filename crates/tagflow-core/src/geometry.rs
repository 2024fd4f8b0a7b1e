//! Grid geometry for process diagrams.
//!
//! Layout happens on a coarse grid: every object sits in a grid cell given by
//! a column and a row, and carries a size in layout units. Converting grid
//! cells into pixel or world coordinates is the renderer's job.
//!
//! # Overview
//!
//! - [`Size`] - Width and height in layout units
//! - [`GridRect`] - A grid cell plus the size of the object placed in it
//! - [`GridSize`] - The extent of the whole grid
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +col
//!     │
//!     │
//!     ▼
//!   +row
//! ```
//!
//! Each subprocess owns a horizontal band of rows; columns advance with the
//! order of events inside the band.

use serde::Serialize;

/// Represents the dimensions of an object with width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> u32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> u32 {
        self.height
    }
}

/// The grid placement of a single layout object.
///
/// # Examples
///
/// ```
/// # use tagflow_core::geometry::{GridRect, Size};
/// let rect = GridRect::new(2, 4, Size::new(80, 60));
/// assert_eq!(rect.col(), 2);
/// assert_eq!(rect.row(), 4);
/// assert_eq!(rect.width(), 80);
///
/// let wider = rect.with_width(120);
/// assert_eq!(wider.width(), 120);
/// assert_eq!(wider.height(), 60);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridRect {
    col: u32,
    row: u32,
    width: u32,
    height: u32,
}

impl GridRect {
    pub fn new(col: u32, row: u32, size: Size) -> Self {
        Self {
            col,
            row,
            width: size.width(),
            height: size.height(),
        }
    }

    /// Grid column of the object.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Grid row of the object.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Width in layout units.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in layout units.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns a copy with a different width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with a different height.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }
}

/// The number of grid columns and rows a diagram spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    pub fn columns(self) -> u32 {
        self.columns
    }

    pub fn rows(self) -> u32 {
        self.rows
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}
