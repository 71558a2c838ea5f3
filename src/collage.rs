//! Collage orchestration: size → place → render, and a session that keeps
//! placements stable across cosmetic setting changes.
//!
//! # Example
//!
//! ```
//! use covergrid::{Collage, CollageSettings};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(9);
//! let covers: Vec<u32> = (0..40).collect();
//! let mut collage = Collage::new(covers, &CollageSettings::default(), &mut rng).unwrap();
//!
//! let before = collage.anchors().to_vec();
//! collage.set_tilt(-20.0);
//! collage.set_gap_size(4).unwrap();
//! assert_eq!(collage.anchors(), &before[..]);
//!
//! let frame = collage.frame().unwrap();
//! assert_eq!(frame.rotation_degrees, 20.0);
//! ```

use alloc::vec::Vec;

use num_traits::Float;
use rand::Rng;

use crate::color::CanvasColor;
use crate::grid::{CellAnchor, ErrorKind, GridConfig, LayoutError, cells_for_images};
use crate::placement::place_large_cells;
use crate::render::{DrawInstruction, ImagePool, render_layout};
use crate::settings::{CollageSettings, clamp_gap, clamp_tilt};

/// Placement attempts before [`LayoutError::PlacementInfeasible`] is surfaced.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 16;

/// [`place_large_cells`] with fresh row samples on infeasible draws.
///
/// Invalid input fails immediately. After [`MAX_PLACEMENT_ATTEMPTS`]
/// infeasible draws the last error is returned; an overlapping placement is
/// never produced.
pub fn place_with_retry<R: Rng + ?Sized>(
    cells_per_side: u32,
    count: u32,
    rng: &mut R,
) -> Result<Vec<CellAnchor>, LayoutError> {
    let mut attempt = 1;
    loop {
        match place_large_cells(cells_per_side, count, rng) {
            Err(e)
                if e.kind() == ErrorKind::PlacementInfeasible
                    && attempt < MAX_PLACEMENT_ATTEMPTS =>
            {
                log::warn!("placement attempt {attempt}/{MAX_PLACEMENT_ATTEMPTS} failed: {e}");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Everything a drawing surface needs for one pass.
///
/// Fill the canvas with `background`, rotate by `rotation_degrees` about
/// the canvas centre, then draw `instructions` in order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame<H> {
    pub canvas_size: u32,
    /// Clockwise in y-down canvas space. The negated tilt.
    pub rotation_degrees: f32,
    pub background: CanvasColor,
    pub instructions: Vec<DrawInstruction<H>>,
}

impl<H> Frame<H> {
    pub fn center(&self) -> f32 {
        self.canvas_size as f32 / 2.0
    }

    /// Map an unrotated instruction-space point onto the canvas.
    pub fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        let c = self.center();
        let (sin, cos) = Float::sin_cos(Float::to_radians(self.rotation_degrees));
        let (dx, dy) = (x - c, y - c);
        (c + dx * cos - dy * sin, c + dx * sin + dy * cos)
    }
}

/// One-shot layout: size the grid for `pool`, place large cells, shuffle
/// a copy of the pool and render.
pub fn generate<H: Clone, R: Rng + ?Sized>(
    pool: &ImagePool<H>,
    settings: &CollageSettings,
    rng: &mut R,
) -> Result<Frame<H>, LayoutError> {
    Collage::new(pool.as_slice().to_vec(), settings, rng)?.frame()
}

/// A collage being edited.
///
/// Anchors are only re-placed when the grid size or the large-cell count
/// changes; gap, tilt and background edits re-render the same placement
/// with the same image order. Every setter either commits fully or leaves
/// the collage untouched.
#[derive(Clone, Debug)]
pub struct Collage<H> {
    pool: ImagePool<H>,
    config: GridConfig,
    anchors: Vec<CellAnchor>,
}

impl<H> Collage<H> {
    /// Size, place and shuffle for a freshly loaded set of images.
    pub fn new<R: Rng + ?Sized>(
        images: impl Into<Vec<H>>,
        settings: &CollageSettings,
        rng: &mut R,
    ) -> Result<Self, LayoutError> {
        let mut pool = ImagePool::new(images.into())?;
        let config = settings.grid_config(pool.len())?;
        let anchors = place_with_retry(config.cells_per_side, config.num_large_cells, rng)?;
        pool.shuffle(rng);
        log::debug!(
            "new collage: {} images, {} cells per side, anchors {anchors:?}",
            pool.len(),
            config.cells_per_side
        );
        Ok(Self {
            pool,
            config,
            anchors,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn anchors(&self) -> &[CellAnchor] {
        &self.anchors
    }

    /// Images in their current draw order.
    pub fn pool(&self) -> &ImagePool<H> {
        &self.pool
    }

    /// New image order, same placement.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool.shuffle(rng);
    }

    /// Largest grid the pool supports without heavy image repetition:
    /// the sizing rule applied to the pool length, capped by
    /// `max_cells_per_side`.
    pub fn cell_ceiling(&self) -> u32 {
        cells_for_images(self.pool.len(), self.config.max_cells_per_side)
    }

    /// Resize the grid, clamped to [`cell_ceiling`](Self::cell_ceiling),
    /// and re-place.
    ///
    /// The large-cell count shrinks to fit a smaller grid, and keeps
    /// shrinking while no placement of that many cells exists.
    pub fn set_cells_per_side<R: Rng + ?Sized>(
        &mut self,
        cells: u32,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        if cells == 0 {
            return Err(LayoutError::ZeroGridDimension);
        }
        let cells = cells.min(self.cell_ceiling());
        if cells == self.config.cells_per_side {
            return Ok(());
        }
        let mut config = GridConfig {
            cells_per_side: cells,
            num_large_cells: self.config.num_large_cells.min(cells - 1),
            ..self.config
        };
        config.validate()?;
        loop {
            match place_with_retry(config.cells_per_side, config.num_large_cells, rng) {
                Ok(anchors) => {
                    self.commit(config, anchors);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::PlacementInfeasible => {
                    // zero large cells always places, so this terminates
                    log::warn!("{e}, trying {}", config.num_large_cells - 1);
                    config.num_large_cells -= 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Change how many cells are large and re-place.
    pub fn set_num_large_cells<R: Rng + ?Sized>(
        &mut self,
        count: u32,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        if count == self.config.num_large_cells {
            return Ok(());
        }
        let config = GridConfig {
            num_large_cells: count,
            ..self.config
        };
        self.replace(config, rng)
    }

    /// Gap in pixels, clamped to [`GAP_RANGE`](crate::GAP_RANGE).
    pub fn set_gap_size(&mut self, pixels: u32) -> Result<(), LayoutError> {
        let config = GridConfig {
            gap_size: clamp_gap(pixels),
            ..self.config
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Tilt in degrees, clamped to [`TILT_RANGE`](crate::TILT_RANGE).
    pub fn set_tilt(&mut self, degrees: f32) {
        self.config.tilt_degrees = clamp_tilt(degrees);
    }

    pub fn set_background(&mut self, color: CanvasColor) {
        self.config.background = color;
    }

    fn replace<R: Rng + ?Sized>(&mut self, config: GridConfig, rng: &mut R) -> Result<(), LayoutError> {
        config.validate()?;
        let anchors = place_with_retry(config.cells_per_side, config.num_large_cells, rng)?;
        self.commit(config, anchors);
        Ok(())
    }

    fn commit(&mut self, config: GridConfig, anchors: Vec<CellAnchor>) {
        log::debug!(
            "re-placed {} large cells on a {}-cell grid: {anchors:?}",
            config.num_large_cells,
            config.cells_per_side
        );
        self.config = config;
        self.anchors = anchors;
    }

    /// Render the current state.
    pub fn frame(&self) -> Result<Frame<H>, LayoutError>
    where
        H: Clone,
    {
        Ok(Frame {
            canvas_size: self.config.canvas_size,
            rotation_degrees: -self.config.tilt_degrees,
            background: self.config.background,
            instructions: render_layout(&self.pool, &self.anchors, &self.config)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn collage(images: usize, seed: u64) -> (Collage<usize>, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let c = Collage::new((0..images).collect::<Vec<_>>(), &CollageSettings::default(), &mut rng)
            .unwrap();
        (c, rng)
    }

    // ── Retry ───────────────────────────────────────────────────────────

    #[test]
    fn retry_surfaces_persistent_infeasibility() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            place_with_retry(3, 2, &mut rng),
            Err(LayoutError::PlacementInfeasible {
                cells_per_side: 3,
                count: 2
            })
        );
    }

    #[test]
    fn retry_does_not_retry_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(place_with_retry(0, 1, &mut rng), Err(LayoutError::ZeroGridDimension));
    }

    #[test]
    fn retry_recovers_dense_placements() {
        // 4×4 with two large cells fails on some row draws but not all.
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let anchors = place_with_retry(4, 2, &mut rng).unwrap();
            assert_eq!(anchors.len(), 2);
            assert!(!anchors[0].overlaps(anchors[1]));
        }
    }

    // ── Session ─────────────────────────────────────────────────────────

    #[test]
    fn new_sizes_from_image_count() {
        let (c, _) = collage(20, 1);
        assert_eq!(c.config().cells_per_side, 3);
        assert_eq!(c.anchors().len(), 1);
        assert_eq!(c.pool().len(), 20);
    }

    #[test]
    fn empty_images_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Collage::<u8>::new(Vec::new(), &CollageSettings::default(), &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::EmptyImagePool);
    }

    #[test]
    fn shuffle_keeps_anchors() {
        let (mut c, mut rng) = collage(60, 2);
        let anchors = c.anchors().to_vec();
        let order = c.pool().as_slice().to_vec();
        c.shuffle(&mut rng);
        assert_eq!(c.anchors(), &anchors[..]);
        assert_ne!(c.pool().as_slice(), &order[..]);
    }

    #[test]
    fn cosmetic_changes_keep_placement_and_order() {
        let (mut c, _) = collage(60, 3);
        let anchors = c.anchors().to_vec();
        let before = c.frame().unwrap();

        c.set_gap_size(16).unwrap();
        c.set_tilt(0.0);
        c.set_background(CanvasColor::black());

        let after = c.frame().unwrap();
        assert_eq!(c.anchors(), &anchors[..]);
        assert_eq!(after.background, CanvasColor::black());
        assert_eq!(after.rotation_degrees, 0.0);
        // Ring dropped: 64 → 36 coordinates.
        assert_eq!(before.instructions.len(), 64 - 3 * anchors.len());
        assert_eq!(after.instructions.len(), 36 - 3 * anchors.len());
    }

    #[test]
    fn rejected_gap_leaves_config_untouched() {
        let mut rng = StdRng::seed_from_u64(4);
        let settings = CollageSettings::default().canvas_size(100);
        let mut c = Collage::new((0..60).collect::<Vec<u32>>(), &settings, &mut rng).unwrap();
        let config = *c.config();
        // 16px gaps around 6 cells need 112px.
        assert!(matches!(
            c.set_gap_size(16),
            Err(LayoutError::CellsTooSmall { .. })
        ));
        assert_eq!(*c.config(), config);
        c.set_gap_size(4).unwrap();
        assert_eq!(c.config().gap_size, 4);
    }

    #[test]
    fn large_count_change_re_places() {
        let (mut c, mut rng) = collage(60, 5);
        assert_eq!(c.config().cells_per_side, 6);
        c.set_num_large_cells(1, &mut rng).unwrap();
        assert_eq!(c.anchors().len(), 1);
        assert_eq!(c.config().num_large_cells, 1);
    }

    #[test]
    fn too_many_large_cells_rejected() {
        let (mut c, mut rng) = collage(60, 6);
        let anchors = c.anchors().to_vec();
        assert_eq!(
            c.set_num_large_cells(6, &mut rng),
            Err(LayoutError::TooManyLargeCells {
                cells_per_side: 6,
                count: 6
            })
        );
        assert_eq!(c.anchors(), &anchors[..]);
        assert_eq!(c.config().num_large_cells, 4);
    }

    #[test]
    fn shrinking_grid_shrinks_large_count() {
        let (mut c, mut rng) = collage(60, 7);
        c.set_cells_per_side(2, &mut rng).unwrap();
        assert_eq!(c.config().cells_per_side, 2);
        assert_eq!(c.config().num_large_cells, 1);
        assert_eq!(c.anchors(), &[CellAnchor::new(0, 0)]);
    }

    #[test]
    fn shrinking_to_small_grids_always_places() {
        for seed in 0..20 {
            for (cells, large) in [(3, 1), (4, 2)] {
                let (mut c, mut rng) = collage(60, seed);
                assert_eq!(c.config().num_large_cells, 4);
                c.set_cells_per_side(cells, &mut rng).unwrap();
                assert_eq!(c.config().cells_per_side, cells);
                assert_eq!(c.config().num_large_cells, large, "seed {seed}");
                assert_eq!(c.anchors().len(), large as usize);
                assert!(c.anchors().iter().all(|a| a.fits_within(cells)));
            }
        }
    }

    #[test]
    fn shrinking_to_five_keeps_as_many_as_fit() {
        for seed in 0..20 {
            let (mut c, mut rng) = collage(60, seed);
            c.set_cells_per_side(5, &mut rng).unwrap();
            let large = c.config().num_large_cells;
            assert!((3..=4).contains(&large), "seed {seed}: {large}");
            assert_eq!(c.anchors().len(), large as usize);
        }
    }

    #[test]
    fn grid_size_clamped_to_pool_ceiling() {
        let (mut c, mut rng) = collage(25, 8);
        assert_eq!(c.config().cells_per_side, 4);
        assert_eq!(c.cell_ceiling(), 4);
        c.set_cells_per_side(2, &mut rng).unwrap();
        c.set_cells_per_side(50, &mut rng).unwrap();
        assert_eq!(c.config().cells_per_side, 4);
        assert!(c.anchors().iter().all(|a| a.fits_within(4)));

        let (mut big, mut rng) = collage(400, 8);
        assert_eq!(big.cell_ceiling(), 6);
        big.set_cells_per_side(3, &mut rng).unwrap();
        big.set_cells_per_side(50, &mut rng).unwrap();
        assert_eq!(big.config().cells_per_side, 6);
    }

    #[test]
    fn zero_grid_size_rejected() {
        let (mut c, mut rng) = collage(25, 9);
        assert_eq!(
            c.set_cells_per_side(0, &mut rng),
            Err(LayoutError::ZeroGridDimension)
        );
    }

    #[test]
    fn unchanged_values_do_not_re_place() {
        let (mut c, mut rng) = collage(60, 10);
        let anchors = c.anchors().to_vec();
        c.set_cells_per_side(6, &mut rng).unwrap();
        c.set_num_large_cells(4, &mut rng).unwrap();
        assert_eq!(c.anchors(), &anchors[..]);
    }

    // ── Frame ───────────────────────────────────────────────────────────

    #[test]
    fn frame_rotates_against_tilt() {
        let (c, _) = collage(20, 11);
        let f = c.frame().unwrap();
        assert_eq!(f.rotation_degrees, -15.0);
        assert_eq!(f.canvas_size, 640);
        assert_eq!(f.background, CanvasColor::slate());
    }

    #[test]
    fn to_canvas_keeps_center_fixed() {
        let (c, _) = collage(20, 12);
        let f = c.frame().unwrap();
        let (x, y) = f.to_canvas(320.0, 320.0);
        assert!((x - 320.0).abs() < 1e-3 && (y - 320.0).abs() < 1e-3);
    }

    #[test]
    fn to_canvas_quarter_turn() {
        let f = Frame::<u8> {
            canvas_size: 100,
            rotation_degrees: 90.0,
            background: CanvasColor::Transparent,
            instructions: Vec::new(),
        };
        // Clockwise in y-down space: right of centre goes below it.
        let (x, y) = f.to_canvas(100.0, 50.0);
        assert!((x - 50.0).abs() < 1e-3, "{x}");
        assert!((y - 100.0).abs() < 1e-3, "{y}");
    }

    #[test]
    fn generate_is_reproducible_with_seed() {
        let pool = ImagePool::new((0..30).collect::<Vec<u16>>()).unwrap();
        let settings = CollageSettings::default();
        let a = generate(&pool, &settings, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate(&pool, &settings, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
