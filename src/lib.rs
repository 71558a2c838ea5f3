//! Procedural photo-collage layout for square cover images.
//!
//! A grid sized from the number of available images, a few cells enlarged
//! to 2×2 at randomly sampled non-overlapping anchors, and a tilted render
//! pass that cycles through the image pool. Pure geometry — no pixel
//! operations, `no_std` compatible with `alloc`.
//!
//! # Modules
//!
//! - [`grid`] — Grid sizing, anchors, occupancy, pixel metrics, errors
//! - [`placement`] — Constrained random placement of large cells
//! - [`render`] — Image pool and draw-instruction generation
//! - [`collage`] — Orchestration, retry, and the editable [`Collage`] session
//! - [`settings`] — Defaults and user-adjustable ranges
//! - `svg` — SVG preview of a [`Frame`] (feature `svg`)
//!
//! # Example
//!
//! ```
//! use covergrid::{CollageSettings, ImagePool, generate};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let pool = ImagePool::new((0..20).collect::<Vec<u32>>()).unwrap();
//! let frame = generate(&pool, &CollageSettings::default(), &mut StdRng::seed_from_u64(5)).unwrap();
//!
//! // 3×3 grid plus the tilt ring is 5×5; one large cell covers four of them.
//! assert_eq!(frame.instructions.len(), 25 - 4 + 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod collage;
pub mod color;
pub mod grid;
pub mod placement;
pub mod render;
pub mod settings;
#[cfg(feature = "svg")]
pub mod svg;

pub use collage::{Collage, Frame, MAX_PLACEMENT_ATTEMPTS, generate, place_with_retry};
pub use color::CanvasColor;
pub use grid::{
    CellAnchor, CellMetrics, ErrorKind, GridConfig, LayoutError, MAX_CANVAS_SIZE, OccupiedSet,
    compute_grid_config,
};
pub use placement::place_large_cells;
pub use render::{CellKind, DrawInstruction, ImagePool, render_layout};
pub use settings::{CollageSettings, DEFAULT_MAX_CELLS_PER_SIDE, GAP_RANGE, TILT_RANGE};
