//! Front-to-back grid traversal of a convex volume.
//!
//! [`GridSweep`] enumerates exactly the cells of a uniform grid whose
//! boxes overlap a [`ConvexVolume`], ordered front to back along a given
//! direction. The sweep walks the grid slice by slice along the
//! direction's dominant axis; inside a slice the volume's cross-section
//! is a convex polygon that is rasterized row by row.
//!
//! All internal work happens in *algorithm space*: axes are permuted so
//! the slice axis is `z` and the row axis `y`, and each axis is folded
//! so the sweep always ascends from the grid corner nearest the viewer.
//! Cell indices are mapped back to world axes on the way out.

mod active_edges;
mod raster;
mod slice;

use glam::{DVec2, DVec3, IVec3};
use smallvec::SmallVec;
use thiserror::Error;

use crate::geom::grid::{GridBounds, cell_floor, cell_last};
use crate::geom::util::sort_dimensions;
use crate::volume::{ConvexVolume, Edge};

use active_edges::ActiveEdges;
use raster::ChainCursor;

pub(crate) type PointBuf = SmallVec<[DVec2; 16]>;
pub(crate) type Chain = SmallVec<[DVec2; 16]>;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("cell dimensions must be positive and finite")]
    BadCellSize,
    #[error("sweep direction must be a finite non-zero vector")]
    BadDirection,
}

/// Observer for the sweep's internal progress, meant for debugging and
/// visualization. Coordinates are algorithm-space: slice `0` is the grid
/// face nearest the viewer regardless of the world direction's signs.
pub trait SweepTrace {
    fn slice(&mut self, slice: i32, left: &[DVec2], right: &[DVec2]) {
        let _ = (slice, left, right);
    }
    fn row(&mut self, row: i32, cols: (i32, i32)) {
        let _ = (row, cols);
    }
}

/// The default, cost-free trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl SweepTrace for NoTrace {}

/*─────────────────────── algorithm-space mapping ───────────────────────*/

#[derive(Debug, Clone, Copy)]
struct SpaceMap {
    /// World axis backing each algorithm axis; `axes[2]` is the slice
    /// axis (dominant direction component), `axes[0]` the column axis.
    axes: [usize; 3],
    /// Per world axis: `-1` folds the axis so the sweep ascends.
    sign: [i8; 3],
    bounds: GridBounds,
    world_min: DVec3,
    world_max: DVec3,
    /// Cell dimensions, counts and world extent, axis-permuted.
    cell: DVec3,
    cells: IVec3,
    extent: DVec3,
}

impl SpaceMap {
    fn new(direction: DVec3, bounds: GridBounds, cell_dims: DVec3) -> Self {
        let order = sort_dimensions(direction);
        let axes = [order[2], order[1], order[0]];
        let mut sign = [1i8; 3];
        for w in 0..3 {
            if direction[w] < 0.0 {
                sign[w] = -1;
            }
        }
        let counts = bounds.cells();
        let cell = DVec3::new(
            cell_dims[axes[0]],
            cell_dims[axes[1]],
            cell_dims[axes[2]],
        );
        let cells = IVec3::new(counts[axes[0]], counts[axes[1]], counts[axes[2]]);
        Self {
            axes,
            sign,
            bounds,
            world_min: bounds.world_min(cell_dims),
            world_max: bounds.world_max(cell_dims),
            cell,
            cells,
            extent: cells.as_dvec3() * cell,
        }
    }

    /// World point to algorithm space, grid near corner at the origin.
    fn to_algo(&self, p: DVec3) -> DVec3 {
        let mut out = [0.0; 3];
        for (k, slot) in out.iter_mut().enumerate() {
            let w = self.axes[k];
            *slot = if self.sign[w] > 0 {
                p[w] - self.world_min[w]
            } else {
                self.world_max[w] - p[w]
            };
        }
        DVec3::from_array(out)
    }

    /// Algorithm-space cell `(col, row, slice)` back to world indices.
    fn cell_to_world(&self, col: i64, row: i64, slice: i64) -> IVec3 {
        let algo = [col as i32, row as i32, slice as i32];
        let mut out = [0i32; 3];
        for (k, &c) in algo.iter().enumerate() {
            let w = self.axes[k];
            out[w] = if self.sign[w] > 0 {
                self.bounds.min[w] + c
            } else {
                self.bounds.max[w] - c
            };
        }
        IVec3::from_array(out)
    }
}

/*──────────────────────────── the sweep ────────────────────────────────*/

/// Cursor over the grid cells a convex volume overlaps, front to back.
///
/// After a successful construction the cursor rests on the first cell
/// (unless the volume misses the grid entirely, in which case
/// [`GridSweep::at_end`] is `true` from the start). [`GridSweep::forward`]
/// advances one cell at a time; [`GridSweep::position`] reads the current
/// cell and panics once the traversal is exhausted.
#[derive(Debug)]
pub struct GridSweep<T: SweepTrace = NoTrace> {
    map: SpaceMap,
    /// Volume geometry, already mapped to algorithm space.
    points: SmallVec<[DVec3; 8]>,
    edges: SmallVec<[Edge; 12]>,
    active: ActiveEdges,
    /// Points carried into the current slice: near-plane crossings plus
    /// projections of volume points swept so far this slice.
    carry: PointBuf,
    /// Far-plane crossings of the current slice; becomes `carry` on
    /// advance.
    front: PointBuf,
    merge: PointBuf,
    left: Chain,
    right: Chain,
    left_cur: ChainCursor,
    right_cur: ChainCursor,
    slice: i64,
    slice_hi: i64,
    row: i64,
    row_hi: i64,
    col: i64,
    col_hi: i64,
    y_bot: f64,
    y_top: f64,
    done: bool,
    trace: T,
}

impl GridSweep<NoTrace> {
    pub fn new(
        volume: &ConvexVolume,
        direction: DVec3,
        bounds: GridBounds,
        cell_dims: DVec3,
    ) -> Result<Self, SweepError> {
        Self::with_trace(volume, direction, bounds, cell_dims, NoTrace)
    }
}

impl<T: SweepTrace> GridSweep<T> {
    pub fn with_trace(
        volume: &ConvexVolume,
        direction: DVec3,
        bounds: GridBounds,
        cell_dims: DVec3,
        trace: T,
    ) -> Result<Self, SweepError> {
        if !cell_dims.is_finite() || cell_dims.min_element() <= 0.0 {
            return Err(SweepError::BadCellSize);
        }
        if !direction.is_finite() || direction == DVec3::ZERO {
            return Err(SweepError::BadDirection);
        }

        let map = SpaceMap::new(direction, bounds, cell_dims);
        let points: SmallVec<[DVec3; 8]> =
            volume.points().iter().map(|&p| map.to_algo(p)).collect();
        let edges: SmallVec<[Edge; 12]> = volume.edges().iter().copied().collect();

        let z_min = points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
        let z_max = points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);
        let dz = map.cell.z;
        let slice_lo = cell_floor(z_min, dz).max(0);
        let slice_hi = cell_last(z_max, dz).min(i64::from(map.cells.z) - 1);

        let mut sweep = Self {
            active: ActiveEdges::new(points.len(), edges.len()),
            map,
            points,
            edges,
            carry: PointBuf::new(),
            front: PointBuf::new(),
            merge: PointBuf::new(),
            left: Chain::new(),
            right: Chain::new(),
            left_cur: ChainCursor::default(),
            right_cur: ChainCursor::default(),
            slice: slice_lo,
            slice_hi,
            row: 0,
            row_hi: 0,
            col: 0,
            col_hi: 0,
            y_bot: 0.0,
            y_top: 0.0,
            done: slice_hi < slice_lo,
            trace,
        };
        if sweep.done {
            return Ok(sweep);
        }

        sweep.active.seed(
            &sweep.points,
            &sweep.edges,
            sweep.slice,
            sweep.map.cell.z,
            &mut sweep.carry,
        );
        if !sweep.setup_slice() && !sweep.next_slice() {
            sweep.done = true;
        }
        Ok(sweep)
    }

    /// True once every overlapped cell has been visited.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.done
    }

    /// Cell the cursor currently rests on, in world grid indices.
    ///
    /// # Panics
    /// Panics when the traversal is exhausted; check [`GridSweep::at_end`]
    /// first.
    pub fn position(&self) -> IVec3 {
        assert!(!self.done, "grid sweep cursor used past the end");
        self.map.cell_to_world(self.col, self.row, self.slice)
    }

    /// Step to the next cell. Returns `false`, once, when the previous
    /// cell was the last; the cursor is exhausted afterwards.
    pub fn forward(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.col < self.col_hi {
            self.col += 1;
            return true;
        }
        if self.next_row() {
            return true;
        }
        if self.next_slice() {
            return true;
        }
        self.done = true;
        false
    }

    /// The attached trace observer.
    #[inline]
    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Consume the cursor as a standard iterator over cell indices.
    pub fn cells(mut self) -> impl Iterator<Item = IVec3> {
        std::iter::from_fn(move || {
            if self.at_end() {
                return None;
            }
            let cell = self.position();
            self.forward();
            Some(cell)
        })
    }

    /// World plane (algorithm space `z`) where the current slice ends.
    #[inline]
    fn slice_end(&self) -> f64 {
        (self.slice + 1) as f64 * self.map.cell.z
    }

    /// Build the cross-section for the current slice and position the
    /// cursor on its first cell. False if the slice holds no cells.
    fn setup_slice(&mut self) -> bool {
        self.front.clear();
        let z_end = self.slice_end();
        self.active
            .crossings(&self.points, &self.edges, z_end, &mut self.front);

        self.merge.clear();
        self.merge.extend_from_slice(&self.carry);
        self.merge.extend_from_slice(&self.front);
        let rect = DVec2::new(self.map.extent.x, self.map.extent.y);
        if !slice::build(&mut self.merge, rect, &mut self.left, &mut self.right) {
            return false;
        }
        self.trace
            .slice(self.slice as i32, &self.left, &self.right);

        let dy = self.map.cell.y;
        self.y_bot = self.right[0].y;
        self.y_top = self.right[self.right.len() - 1].y;
        self.row = cell_floor(self.y_bot, dy);
        self.row_hi = cell_last(self.y_top, dy);
        if self.row_hi < self.row {
            return false;
        }
        self.left_cur.reset();
        self.right_cur.reset();
        if self.compute_row() {
            return true;
        }
        self.next_row()
    }

    /// Rasterize the current row. False when the chains pinch to less
    /// than a cell at this row, which happens at tangent corners.
    fn compute_row(&mut self) -> bool {
        let dy = self.map.cell.y;
        let dx = self.map.cell.x;
        let band_lo = self.y_bot.max(self.row as f64 * dy);
        let band_hi = self.y_top.min((self.row + 1) as f64 * dy);
        let x_right = self
            .right_cur
            .band_extreme(&self.right, band_lo, band_hi, 1);
        let x_left = self.left_cur.band_extreme(&self.left, band_lo, band_hi, -1);

        let col_lo = cell_floor(x_left, dx);
        let col_hi = cell_last(x_right, dx);
        if col_hi < col_lo {
            return false;
        }
        self.col = col_lo;
        self.col_hi = col_hi;
        self.trace
            .row(self.row as i32, (col_lo as i32, col_hi as i32));
        true
    }

    /// Advance to the next row of the slice that produces cells.
    fn next_row(&mut self) -> bool {
        while self.row < self.row_hi {
            self.row += 1;
            if self.compute_row() {
                return true;
            }
        }
        false
    }

    /// Advance to the next slice that produces cells.
    fn next_slice(&mut self) -> bool {
        while self.slice < self.slice_hi {
            self.slice += 1;
            // last slice's far crossings sit on this slice's near plane
            std::mem::swap(&mut self.carry, &mut self.front);
            self.active.advance(
                &self.points,
                &self.edges,
                self.slice,
                self.map.cell.z,
                &mut self.carry,
            );
            if self.setup_slice() {
                return true;
            }
        }
        false
    }
}
