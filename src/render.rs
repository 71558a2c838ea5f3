//! Turn a grid and its large-cell anchors into ordered draw instructions.
//!
//! Small cells are emitted first in row-major order over the (possibly
//! ring-expanded) grid, skipping coordinates under a large cell. Large
//! cells follow in anchor order. Every draw takes the next image from the
//! pool, wrapping around when the pool runs out.

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{CellAnchor, GridConfig, LayoutError, OccupiedSet};

/// Non-empty, ordered sequence of image handles, indexed cyclically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePool<H> {
    images: Vec<H>,
}

impl<H> ImagePool<H> {
    /// Wrap loaded image handles. Fails on an empty list.
    pub fn new(images: Vec<H>) -> Result<Self, LayoutError> {
        if images.is_empty() {
            return Err(LayoutError::EmptyImagePool);
        }
        Ok(Self { images })
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Image at `index` modulo the pool length.
    pub fn get(&self, index: usize) -> &H {
        &self.images[index % self.images.len()]
    }

    pub fn as_slice(&self) -> &[H] {
        &self.images
    }

    pub fn into_inner(self) -> Vec<H> {
        self.images
    }

    /// Reorder in place with a fresh random permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.images.shuffle(rng);
    }

    /// A shuffled copy, leaving `self` untouched.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self
    where
        H: Clone,
    {
        let mut copy = self.clone();
        copy.shuffle(rng);
        copy
    }
}

/// Whether an instruction draws a 1×1 or a 2×2 cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    Small,
    Large,
}

/// One image placed in unrotated canvas pixel space.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawInstruction<H> {
    /// Left edge; negative for the overdraw ring.
    pub x: i32,
    /// Top edge; negative for the overdraw ring.
    pub y: i32,
    /// Square side in pixels.
    pub size: u32,
    pub kind: CellKind,
    /// Grid coordinate this instruction was emitted for.
    pub cell: CellAnchor,
    /// Position in the pool the image was taken from.
    pub pool_index: usize,
    pub image: H,
}

/// Walks the pool cyclically.
struct PoolCursor<'a, H> {
    pool: &'a ImagePool<H>,
    next: usize,
}

impl<'a, H> PoolCursor<'a, H> {
    fn new(pool: &'a ImagePool<H>) -> Self {
        Self { pool, next: 0 }
    }

    fn take(&mut self) -> (usize, &'a H) {
        let index = self.next;
        self.next = (self.next + 1) % self.pool.len();
        (index, self.pool.get(index))
    }
}

/// Resolve every cell of `config` into a draw instruction.
///
/// `anchors` must lie inside the nominal grid with disjoint footprints,
/// as produced by [`place_large_cells`](crate::place_large_cells).
/// Deterministic: the same inputs always give the same sequence.
pub fn render_layout<H: Clone>(
    pool: &ImagePool<H>,
    anchors: &[CellAnchor],
    config: &GridConfig,
) -> Result<Vec<DrawInstruction<H>>, LayoutError> {
    let metrics = config.metrics()?;
    let occupied = OccupiedSet::from_anchors(anchors);
    let range = config.iteration_range();

    let mut cursor = PoolCursor::new(pool);
    let mut out = Vec::with_capacity(
        config
            .expanded_cell_count()
            .saturating_sub(3 * anchors.len()),
    );
    let mut draw = |cell: CellAnchor, kind: CellKind| {
        let (x, y) = metrics.position(cell.row, cell.col);
        let size = match kind {
            CellKind::Small => metrics.cell_size,
            CellKind::Large => metrics.large_cell_size,
        };
        let (pool_index, image) = cursor.take();
        log::trace!("{kind:?} cell ({}, {}) at ({x}, {y}) gets image {pool_index}", cell.row, cell.col);
        out.push(DrawInstruction {
            x,
            y,
            size,
            kind,
            cell,
            pool_index,
            image: image.clone(),
        });
    };

    for row in range.clone() {
        for col in range.clone() {
            if !occupied.contains(row, col) {
                draw(CellAnchor::new(row, col), CellKind::Small);
            }
        }
    }
    for &anchor in anchors {
        draw(anchor, CellKind::Large);
    }

    log::debug!(
        "rendered {} instructions ({} large) from {} images",
        out.len(),
        anchors.len(),
        pool.len()
    );
    Ok(out)
}
