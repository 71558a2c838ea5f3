//! Static collage defaults and the ranges users may adjust them within.

use core::ops::RangeInclusive;

use crate::color::CanvasColor;
use crate::grid::{GridConfig, LayoutError, cells_for_images};

/// Tilt range offered to users, in degrees.
pub const TILT_RANGE: RangeInclusive<f32> = -180.0..=180.0;
/// Gap range offered to users, in pixels.
pub const GAP_RANGE: RangeInclusive<u32> = 0..=32;
/// Hard ceiling on cells per side for generated covers.
pub const DEFAULT_MAX_CELLS_PER_SIDE: u32 = 6;

/// Defaults and user overrides that feed [`GridConfig`] creation.
///
/// Builder style:
///
/// ```
/// use covergrid::{CanvasColor, CollageSettings};
///
/// let settings = CollageSettings::default()
///     .canvas_size(1024)
///     .gap_size(12)
///     .tilt(0.0)
///     .background(CanvasColor::black());
/// let config = settings.grid_config(50).unwrap();
/// assert_eq!(config.cells_per_side, 6);
/// assert_eq!(config.gap_size, 12);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollageSettings {
    pub background: CanvasColor,
    pub tilt_degrees: f32,
    pub canvas_size: u32,
    pub gap_size: u32,
    pub max_cells_per_side: u32,
}

impl Default for CollageSettings {
    fn default() -> Self {
        Self {
            background: CanvasColor::slate(),
            tilt_degrees: 15.0,
            canvas_size: 640,
            gap_size: 8,
            max_cells_per_side: DEFAULT_MAX_CELLS_PER_SIDE,
        }
    }
}

impl CollageSettings {
    pub fn background(mut self, color: CanvasColor) -> Self {
        self.background = color;
        self
    }

    /// Set the tilt, clamped to [`TILT_RANGE`].
    pub fn tilt(mut self, degrees: f32) -> Self {
        self.tilt_degrees = clamp_tilt(degrees);
        self
    }

    pub fn canvas_size(mut self, pixels: u32) -> Self {
        self.canvas_size = pixels;
        self
    }

    /// Set the gap, clamped to [`GAP_RANGE`].
    pub fn gap_size(mut self, pixels: u32) -> Self {
        self.gap_size = clamp_gap(pixels);
        self
    }

    pub fn max_cells_per_side(mut self, cells: u32) -> Self {
        self.max_cells_per_side = cells;
        self
    }

    /// Size a grid for `image_count` images using these settings.
    pub fn grid_config(&self, image_count: usize) -> Result<GridConfig, LayoutError> {
        if image_count == 0 {
            return Err(LayoutError::EmptyImagePool);
        }
        if self.max_cells_per_side == 0 {
            return Err(LayoutError::ZeroGridDimension);
        }
        let cells_per_side = cells_for_images(image_count, self.max_cells_per_side);
        let config = GridConfig {
            cells_per_side,
            max_cells_per_side: self.max_cells_per_side,
            num_large_cells: cells_per_side.saturating_sub(2),
            gap_size: self.gap_size,
            canvas_size: self.canvas_size,
            tilt_degrees: self.tilt_degrees,
            background: self.background,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Clamp a tilt to [`TILT_RANGE`]. NaN becomes 0.
pub(crate) fn clamp_tilt(degrees: f32) -> f32 {
    if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(*TILT_RANGE.start(), *TILT_RANGE.end())
    }
}

pub(crate) fn clamp_gap(pixels: u32) -> u32 {
    pixels.min(*GAP_RANGE.end())
}
