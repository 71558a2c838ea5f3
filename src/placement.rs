//! Large-cell placement by constrained random sampling.
//!
//! Rows are drawn without replacement, so footprints can only touch
//! between consecutive rows. Each row then picks a column uniformly from
//! those not excluded by the two previously placed anchors:
//!
//! - one row below the last anchor: its column and both neighbours
//!   (no overlap, no side-by-side touching)
//! - two rows below the last anchor: its column (no stacked columns)
//! - two rows below the anchor before that: its column
//!
//! Neighbour columns wrap with a truncating remainder by the anchor span,
//! so the right neighbour of the last column is column 0 while column 0
//! has no left neighbour.

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;

use crate::grid::{CellAnchor, LayoutError};

/// Choose anchors for `count` non-overlapping 2×2 cells on an
/// `cells_per_side`×`cells_per_side` grid.
///
/// Anchors come back in ascending row order, every row distinct. A grid
/// of side `n` holds at most `n - 1` large cells; larger counts are cut
/// down to that.
///
/// Returns [`LayoutError::PlacementInfeasible`] when some sampled row has
/// no legal column left. A different row sample may succeed, see
/// [`place_with_retry`](crate::place_with_retry).
pub fn place_large_cells<R: Rng + ?Sized>(
    cells_per_side: u32,
    count: u32,
    rng: &mut R,
) -> Result<Vec<CellAnchor>, LayoutError> {
    if cells_per_side == 0 {
        return Err(LayoutError::ZeroGridDimension);
    }
    let span = cells_per_side - 1;
    let count = if count > span {
        log::warn!("{count} large cells do not fit a {cells_per_side}-cell grid, placing {span}");
        span
    } else {
        count
    };
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut rows = index::sample(rng, span as usize, count as usize).into_vec();
    rows.sort_unstable();

    let mut history = History::default();
    let mut anchors = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row as i32;
        let excluded = history.excluded_columns(row, span as i32);
        let candidates: Vec<i32> = (0..span as i32)
            .filter(|col| !excluded.contains(col))
            .collect();

        let Some(&col) = candidates.choose(rng) else {
            log::debug!("row {row}: every column excluded by {excluded:?}");
            return Err(LayoutError::PlacementInfeasible {
                cells_per_side,
                count,
            });
        };
        log::debug!("row {row}: chose column {col} from {candidates:?}");

        let anchor = CellAnchor::new(row, col);
        history.push(anchor);
        anchors.push(anchor);
    }

    Ok(anchors)
}

/// The two most recently placed anchors.
#[derive(Copy, Clone, Debug, Default)]
struct History {
    last: Option<CellAnchor>,
    before_last: Option<CellAnchor>,
}

impl History {
    fn push(&mut self, anchor: CellAnchor) {
        self.before_last = self.last;
        self.last = Some(anchor);
    }

    fn excluded_columns(&self, row: i32, span: i32) -> Vec<i32> {
        let mut excluded = Vec::with_capacity(4);
        if let Some(last) = self.last {
            match row - last.row {
                1 => excluded.extend([(last.col - 1) % span, last.col, (last.col + 1) % span]),
                2 => excluded.push(last.col),
                _ => {}
            }
        }
        if let Some(before) = self.before_last
            && row - before.row == 2
        {
            excluded.push(before.col);
        }
        excluded
    }
}
