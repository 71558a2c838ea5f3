//! Grid geometry: sizing from an image count, cell anchors, occupancy and
//! pixel metrics.
//!
//! Pure integer math — no drawing, no randomness.
//!
//! # Example
//!
//! ```
//! use covergrid::compute_grid_config;
//!
//! let config = compute_grid_config(20, 6).unwrap();
//! assert_eq!(config.cells_per_side, 3);
//! assert_eq!(config.num_large_cells, 1);
//! ```

use alloc::collections::BTreeSet;
use core::fmt;
use core::ops::Range;

use crate::color::CanvasColor;
use crate::settings::CollageSettings;

/// Largest accepted canvas side. Every pixel coordinate, including the
/// overdraw ring past the far edge, then fits in an `i32`.
pub const MAX_CANVAS_SIZE: u32 = (i32::MAX / 2) as u32;

/// Top-left grid coordinate of a placement.
///
/// For a large cell the anchor's 2×2 footprint is
/// `(row, col)`, `(row + 1, col)`, `(row, col + 1)`, `(row + 1, col + 1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAnchor {
    pub row: i32,
    pub col: i32,
}

impl CellAnchor {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four cells covered by a large cell anchored here, row-major.
    pub const fn footprint(self) -> [(i32, i32); 4] {
        let Self { row, col } = self;
        [
            (row, col),
            (row, col + 1),
            (row + 1, col),
            (row + 1, col + 1),
        ]
    }

    /// True when the 2×2 footprints of `self` and `other` share a cell.
    pub const fn overlaps(self, other: CellAnchor) -> bool {
        (self.row - other.row).abs() < 2 && (self.col - other.col).abs() < 2
    }

    /// True when the whole 2×2 footprint lies inside an `n`×`n` grid.
    pub const fn fits_within(self, cells_per_side: u32) -> bool {
        let max = cells_per_side as i32 - 2;
        self.row >= 0 && self.col >= 0 && self.row <= max && self.col <= max
    }
}

/// Grid coordinates covered by large-cell footprints.
///
/// Derived from an anchor list; rebuild it whenever the anchors change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupiedSet {
    cells: BTreeSet<(i32, i32)>,
}

impl OccupiedSet {
    pub fn from_anchors(anchors: &[CellAnchor]) -> Self {
        let cells = anchors.iter().flat_map(|a| a.footprint()).collect();
        Self { cells }
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        self.cells.contains(&(row, col))
    }

    /// Number of distinct occupied coordinates.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().copied()
    }
}

/// Coarse classification of [`LayoutError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input. Fatal, never retried.
    InvalidInput,
    /// No legal column remained for a sampled row. Retried with fresh rows.
    PlacementInfeasible,
}

/// Layout computation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// No images were supplied.
    EmptyImagePool,
    /// Cells per side (or its ceiling) is zero.
    ZeroGridDimension,
    /// Canvas size is zero.
    ZeroCanvas,
    /// Canvas side exceeds [`MAX_CANVAS_SIZE`].
    CanvasTooLarge { canvas_size: u32 },
    /// Gaps leave less than one pixel per cell.
    CellsTooSmall {
        cells_per_side: u32,
        gap_size: u32,
        canvas_size: u32,
    },
    /// More large cells requested than the grid can hold (`cells_per_side - 1`).
    TooManyLargeCells { cells_per_side: u32, count: u32 },
    /// Every column was excluded for some sampled row.
    PlacementInfeasible { cells_per_side: u32, count: u32 },
}

impl LayoutError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PlacementInfeasible { .. } => ErrorKind::PlacementInfeasible,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImagePool => f.write_str("image pool is empty"),
            Self::ZeroGridDimension => f.write_str("grid must have at least one cell per side"),
            Self::ZeroCanvas => f.write_str("canvas size must be positive"),
            Self::CanvasTooLarge { canvas_size } => write!(
                f,
                "canvas size {canvas_size}px exceeds the {MAX_CANVAS_SIZE}px limit"
            ),
            Self::CellsTooSmall {
                cells_per_side,
                gap_size,
                canvas_size,
            } => write!(
                f,
                "{cells_per_side} cells with {gap_size}px gaps do not fit a {canvas_size}px canvas"
            ),
            Self::TooManyLargeCells {
                cells_per_side,
                count,
            } => write!(
                f,
                "{count} large cells requested, a {cells_per_side}-cell grid holds at most {}",
                cells_per_side.saturating_sub(1)
            ),
            Self::PlacementInfeasible {
                cells_per_side,
                count,
            } => write!(
                f,
                "could not place {count} large cells on a {cells_per_side}-cell grid"
            ),
        }
    }
}

impl core::error::Error for LayoutError {}

/// Immutable description of one collage grid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Cells per side of the nominal (unrotated) grid. At least 1.
    pub cells_per_side: u32,
    /// Configured ceiling for `cells_per_side`.
    pub max_cells_per_side: u32,
    /// Number of 2×2 cells, at most `cells_per_side - 1`.
    pub num_large_cells: u32,
    /// Gap between cells and around the grid, in pixels.
    pub gap_size: u32,
    /// Side of the square canvas, in pixels.
    pub canvas_size: u32,
    /// Global grid rotation in degrees. Any nonzero value adds an overdraw ring.
    pub tilt_degrees: f32,
    pub background: CanvasColor,
}

/// Pixel metrics derived from a [`GridConfig`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellMetrics {
    pub cell_size: u32,
    /// `2 * cell_size + gap`: a large cell spans the gap it swallows.
    pub large_cell_size: u32,
    pub gap: u32,
    /// Distance between the top-left corners of adjacent cells.
    pub stride: u32,
    /// Rings of cells drawn outside the nominal grid (0 or 1).
    pub extra_cells: i32,
}

impl CellMetrics {
    /// Top-left pixel of grid coordinate `(row, col)`, before rotation.
    ///
    /// Coordinates outside the nominal grid (the overdraw ring) map to
    /// negative or past-the-edge pixels.
    pub const fn position(&self, row: i32, col: i32) -> (i32, i32) {
        let stride = self.stride as i32;
        let gap = self.gap as i32;
        (col * stride + gap, row * stride + gap)
    }
}

impl GridConfig {
    /// Check the invariants every other operation relies on.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.cells_per_side == 0 || self.max_cells_per_side == 0 {
            return Err(LayoutError::ZeroGridDimension);
        }
        if self.canvas_size == 0 {
            return Err(LayoutError::ZeroCanvas);
        }
        if self.canvas_size > MAX_CANVAS_SIZE {
            return Err(LayoutError::CanvasTooLarge {
                canvas_size: self.canvas_size,
            });
        }
        if self.num_large_cells > self.cells_per_side - 1 {
            return Err(LayoutError::TooManyLargeCells {
                cells_per_side: self.cells_per_side,
                count: self.num_large_cells,
            });
        }
        self.cell_size().map(|_| ())
    }

    fn cell_size(&self) -> Result<u32, LayoutError> {
        let n = self.cells_per_side as u64;
        let gaps = self.gap_size as u64 * (n + 1);
        let free = (self.canvas_size as u64).saturating_sub(gaps);
        match free / n {
            0 => Err(LayoutError::CellsTooSmall {
                cells_per_side: self.cells_per_side,
                gap_size: self.gap_size,
                canvas_size: self.canvas_size,
            }),
            // free <= canvas_size, so this fits in u32
            size => Ok(size as u32),
        }
    }

    /// Derive cell sizes, stride and the overdraw ring.
    pub fn metrics(&self) -> Result<CellMetrics, LayoutError> {
        self.validate()?;
        let cell_size = self.cell_size()?;
        Ok(CellMetrics {
            cell_size,
            large_cell_size: 2 * cell_size + self.gap_size,
            gap: self.gap_size,
            stride: cell_size + self.gap_size,
            extra_cells: if self.tilt_degrees == 0.0 { 0 } else { 1 },
        })
    }

    /// Row (and column) indices visited by rendering, including the
    /// overdraw ring when tilted.
    pub fn iteration_range(&self) -> Range<i32> {
        let extra = if self.tilt_degrees == 0.0 { 0 } else { 1 };
        -extra..self.cells_per_side as i32 + extra
    }

    /// Number of cells in the square [`iteration_range`](Self::iteration_range).
    pub fn expanded_cell_count(&self) -> usize {
        let side = self.iteration_range().len();
        side * side
    }
}

/// Size a grid for `image_count` images, capped at `max_cells_per_side`.
///
/// `cells_per_side = clamp(floor(sqrt(image_count)) - 1, 1, max)` and
/// `num_large_cells = max(0, cells_per_side - 2)`. The other fields take
/// the [`CollageSettings`] defaults.
pub fn compute_grid_config(
    image_count: usize,
    max_cells_per_side: u32,
) -> Result<GridConfig, LayoutError> {
    CollageSettings::default()
        .max_cells_per_side(max_cells_per_side)
        .grid_config(image_count)
}

/// Cells per side for an image count: one less than the integer square root,
/// never below 1 and never above `max_cells_per_side`.
pub(crate) fn cells_for_images(image_count: usize, max_cells_per_side: u32) -> u32 {
    let root = image_count.isqrt().saturating_sub(1);
    let root = u32::try_from(root).unwrap_or(u32::MAX);
    root.min(max_cells_per_side).max(1)
}
