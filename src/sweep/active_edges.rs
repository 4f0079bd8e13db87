//! Active edge table for the slice sweep.
//!
//! Works entirely in algorithm space: the slice axis is `z`, ascending
//! from the grid's near face at `z = 0`. An edge becomes *active* when
//! one endpoint has been swept past while the other lies in a later
//! slice; its countdown is decremented once per slice and the far point
//! joins the sweep when it hits zero.

use glam::DVec3;
use smallvec::SmallVec;

use crate::geom::grid::cell_floor;
use crate::geom::util::line_intercept_xy;
use crate::sweep::PointBuf;
use crate::volume::Edge;

#[derive(Debug, Clone, Copy)]
struct ActiveEdge {
    edge: u16,
    /// Slices left until the far endpoint's slice is reached.
    countdown: i64,
    /// Index of the far endpoint.
    dest: u16,
}

#[derive(Debug)]
pub(crate) struct ActiveEdges {
    entries: SmallVec<[ActiveEdge; 12]>,
    /// Each edge is examined exactly once over the whole sweep.
    checked: SmallVec<[bool; 12]>,
    /// Each point enters the sweep exactly once.
    visited: SmallVec<[bool; 8]>,
    worklist: SmallVec<[u16; 8]>,
}

impl ActiveEdges {
    pub fn new(point_count: usize, edge_count: usize) -> Self {
        let mut checked = SmallVec::new();
        checked.resize(edge_count, false);
        let mut visited = SmallVec::new();
        visited.resize(point_count, false);
        Self {
            entries: SmallVec::new(),
            checked,
            visited,
            worklist: SmallVec::new(),
        }
    }

    /// Number of edges currently crossing the sweep front.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Feed every point that already lies in the starting slice (or in
    /// front of the grid, for volumes that begin before it).
    pub fn seed(
        &mut self,
        points: &[DVec3],
        edges: &[Edge],
        slice: i64,
        dz: f64,
        out: &mut PointBuf,
    ) {
        for i in 0..points.len() {
            if !self.visited[i] && cell_floor(points[i].z, dz) <= slice {
                self.add_point(i as u16, points, edges, slice, dz, out);
            }
        }
    }

    /// Decrement all countdowns for a move to `slice`; edges that reach
    /// zero retire and their far points enter the sweep, possibly
    /// activating further edges.
    pub fn advance(
        &mut self,
        points: &[DVec3],
        edges: &[Edge],
        slice: i64,
        dz: f64,
        out: &mut PointBuf,
    ) {
        let mut expired: SmallVec<[u16; 12]> = SmallVec::new();
        let old = std::mem::take(&mut self.entries);
        for mut ae in old {
            ae.countdown -= 1;
            if ae.countdown == 0 {
                expired.push(ae.dest);
            } else {
                self.entries.push(ae);
            }
        }
        for dest in expired {
            self.add_point(dest, points, edges, slice, dz, out);
        }
    }

    /// Cross-sections of all active edges with the plane `z = slice_end`,
    /// appended to `out` as 2D points.
    pub fn crossings(&self, points: &[DVec3], edges: &[Edge], slice_end: f64, out: &mut PointBuf) {
        for ae in &self.entries {
            let e = edges[ae.edge as usize];
            let a = points[e.a as usize];
            let b = points[e.b as usize];
            out.push(line_intercept_xy(a, b, slice_end).truncate());
        }
    }

    /// Take `point` into the sweep at `slice`: record its projection,
    /// activate edges leading to later slices and chase edges whose far
    /// endpoint lands in this same slice.
    ///
    /// Points in front of the grid (`z < 0`) contribute no projection of
    /// their own; instead every edge leaving the pre-grid region drops
    /// its crossing with the `z = 0` entry plane, so the first slice sees
    /// the cross-section where the volume enters the grid rather than an
    /// inflated shadow of what lies before it.
    fn add_point(
        &mut self,
        point: u16,
        points: &[DVec3],
        edges: &[Edge],
        slice: i64,
        dz: f64,
        out: &mut PointBuf,
    ) {
        self.worklist.clear();
        self.worklist.push(point);
        while let Some(pt) = self.worklist.pop() {
            if self.visited[pt as usize] {
                continue;
            }
            self.visited[pt as usize] = true;
            let p = points[pt as usize];
            if p.z >= 0.0 {
                out.push(p.truncate());
            }
            for (i, e) in edges.iter().enumerate() {
                if self.checked[i] || (e.a != pt && e.b != pt) {
                    continue;
                }
                self.checked[i] = true;
                let other = e.other(pt);
                let q = points[other as usize];
                if (p.z < 0.0) != (q.z < 0.0) {
                    out.push(line_intercept_xy(p, q, 0.0).truncate());
                }
                let countdown = cell_floor(q.z, dz) - slice;
                if countdown <= 0 {
                    self.worklist.push(other);
                } else {
                    self.entries.push(ActiveEdge {
                        edge: i as u16,
                        countdown,
                        dest: other,
                    });
                }
            }
        }
    }
}
