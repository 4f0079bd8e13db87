//! Convex polyhedra described as a point cloud plus an edge list.
//!
//! The sweep only ever walks edges, so a volume carries no face data. A
//! well-formed volume is watertight in the edge sense: every point joins
//! at least three edges, no edge repeats, and the points span 3D space.
//! Convexity itself is the caller's contract; validation rejects the
//! structurally broken inputs it can detect cheaply.

use glam::DVec3;
use smallvec::SmallVec;
use thiserror::Error;

/// Undirected edge between two point indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: u16,
    pub b: u16,
}

impl Edge {
    #[inline]
    pub fn new(a: u16, b: u16) -> Self {
        Self { a, b }
    }

    /// The endpoint that is not `pt`.
    #[inline]
    pub fn other(&self, pt: u16) -> u16 {
        if self.a == pt { self.b } else { self.a }
    }

    #[inline]
    fn same_pair(&self, o: &Edge) -> bool {
        (self.a == o.a && self.b == o.b) || (self.a == o.b && self.b == o.a)
    }
}

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("a volume needs at least 4 points, got {0}")]
    TooFewPoints(usize),
    #[error("point coordinates must be finite")]
    NonFinite,
    #[error("edge {edge} references a point outside the point list")]
    EdgeOutOfRange { edge: usize },
    #[error("edge {edge} joins a point to itself or has zero length")]
    DegenerateEdge { edge: usize },
    #[error("edge {edge} repeats an earlier edge")]
    DuplicateEdge { edge: usize },
    #[error("point {point} joins fewer than 3 edges; the boundary is open")]
    OpenBoundary { point: usize },
    #[error("all points lie in one plane")]
    Coplanar,
}

/// Convex polyhedron as points plus undirected edges.
///
/// Inline capacities fit a frustum (8 points, 12 edges) without touching
/// the heap; larger hulls spill once at construction.
#[derive(Debug, Clone)]
pub struct ConvexVolume {
    points: SmallVec<[DVec3; 8]>,
    edges: SmallVec<[Edge; 12]>,
}

impl ConvexVolume {
    pub fn new(
        points: impl IntoIterator<Item = DVec3>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, VolumeError> {
        let vol = Self {
            points: points.into_iter().collect(),
            edges: edges.into_iter().collect(),
        };
        vol.validate()?;
        Ok(vol)
    }

    /// Eight corners of a frustum: near quad then far quad, each ordered
    /// bottom-left, bottom-right, top-left, top-right.
    pub fn frustum(corners: [DVec3; 8]) -> Result<Self, VolumeError> {
        const EDGES: [(u16, u16); 12] = [
            (0, 1), (1, 3), (3, 2), (2, 0), // near quad
            (4, 5), (5, 7), (7, 6), (6, 4), // far quad
            (0, 4), (1, 5), (2, 6), (3, 7), // sides
        ];
        Self::new(corners, EDGES.iter().map(|&(a, b)| Edge::new(a, b)))
    }

    /// Axis-aligned box from two opposite corners.
    pub fn cuboid(min: DVec3, max: DVec3) -> Result<Self, VolumeError> {
        Self::frustum([
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ])
    }

    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn validate(&self) -> Result<(), VolumeError> {
        if self.points.iter().any(|p| !p.is_finite()) {
            return Err(VolumeError::NonFinite);
        }
        if self.points.len() < 4 {
            return Err(VolumeError::TooFewPoints(self.points.len()));
        }

        let n = self.points.len() as u16;
        let mut degree: SmallVec<[u8; 8]> = SmallVec::new();
        degree.resize(self.points.len(), 0);

        for (i, e) in self.edges.iter().enumerate() {
            if e.a >= n || e.b >= n {
                return Err(VolumeError::EdgeOutOfRange { edge: i });
            }
            if e.a == e.b
                || self.points[e.a as usize].distance_squared(self.points[e.b as usize])
                    < f64::EPSILON
            {
                return Err(VolumeError::DegenerateEdge { edge: i });
            }
            if self.edges[..i].iter().any(|prev| prev.same_pair(e)) {
                return Err(VolumeError::DuplicateEdge { edge: i });
            }
            degree[e.a as usize] = degree[e.a as usize].saturating_add(1);
            degree[e.b as usize] = degree[e.b as usize].saturating_add(1);
        }

        if let Some(point) = degree.iter().position(|&d| d < 3) {
            return Err(VolumeError::OpenBoundary { point });
        }

        self.check_spatial()
    }

    /// Reject point sets that span less than 3D space.
    fn check_spatial(&self) -> Result<(), VolumeError> {
        let origin = self.points[0];
        let scale = self
            .points
            .iter()
            .map(|p| (*p - origin).abs().max_element())
            .fold(1.0_f64, f64::max);
        let tol = 1e-9 * scale;

        // first point off the origin, then a normal from two spanning
        // directions, then any point off that plane
        let u = self
            .points
            .iter()
            .map(|p| *p - origin)
            .find(|v| v.length_squared() > tol * tol);
        let Some(u) = u else {
            return Err(VolumeError::Coplanar);
        };
        let normal = self
            .points
            .iter()
            .map(|p| u.cross(*p - origin))
            .find(|v| v.length_squared() > tol * tol);
        let Some(normal) = normal else {
            return Err(VolumeError::Coplanar);
        };
        let normal = normal.normalize();
        if self
            .points
            .iter()
            .all(|p| (*p - origin).dot(normal).abs() <= tol)
        {
            return Err(VolumeError::Coplanar);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    fn tetrahedron() -> (Vec<DVec3>, Vec<Edge>) {
        let points = vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(2.0, 0.0, 0.0),
            dvec3(0.0, 2.0, 0.0),
            dvec3(0.0, 0.0, 2.0),
        ];
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
            .iter()
            .map(|&(a, b)| Edge::new(a, b))
            .collect();
        (points, edges)
    }

    #[test]
    fn accepts_tetrahedron_and_frustum() {
        let (p, e) = tetrahedron();
        assert!(ConvexVolume::new(p, e).is_ok());
        assert!(ConvexVolume::cuboid(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 2.0, 3.0)).is_ok());
    }

    #[test]
    fn rejects_too_few_points() {
        let (mut p, _) = tetrahedron();
        p.truncate(3);
        let err = ConvexVolume::new(p, []).unwrap_err();
        assert!(matches!(err, VolumeError::TooFewPoints(3)));
    }

    #[test]
    fn rejects_non_finite() {
        let (mut p, e) = tetrahedron();
        p[1].y = f64::NAN;
        assert!(matches!(
            ConvexVolume::new(p, e).unwrap_err(),
            VolumeError::NonFinite
        ));
    }

    #[test]
    fn rejects_bad_edges() {
        let (p, mut e) = tetrahedron();
        e[4] = Edge::new(1, 9);
        assert!(matches!(
            ConvexVolume::new(p.clone(), e).unwrap_err(),
            VolumeError::EdgeOutOfRange { edge: 4 }
        ));

        let (_, mut e) = tetrahedron();
        e[2] = Edge::new(3, 3);
        assert!(matches!(
            ConvexVolume::new(p.clone(), e).unwrap_err(),
            VolumeError::DegenerateEdge { edge: 2 }
        ));

        let (_, mut e) = tetrahedron();
        e[5] = Edge::new(1, 0); // (0,1) again, reversed
        assert!(matches!(
            ConvexVolume::new(p, e).unwrap_err(),
            VolumeError::DuplicateEdge { edge: 5 }
        ));
    }

    #[test]
    fn rejects_open_boundary() {
        let (p, mut e) = tetrahedron();
        e.pop(); // points 2 and 3 drop to degree 2
        assert!(matches!(
            ConvexVolume::new(p, e).unwrap_err(),
            VolumeError::OpenBoundary { point: 2 }
        ));
    }

    #[test]
    fn rejects_flat_point_set() {
        // complete graph on 4 coplanar points keeps every degree at 3
        let p = vec![
            dvec3(0.0, 0.0, 1.0),
            dvec3(2.0, 0.0, 1.0),
            dvec3(0.0, 2.0, 1.0),
            dvec3(2.0, 2.0, 1.0),
        ];
        let e: Vec<Edge> = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
            .iter()
            .map(|&(a, b)| Edge::new(a, b))
            .collect();
        assert!(matches!(
            ConvexVolume::new(p, e).unwrap_err(),
            VolumeError::Coplanar
        ));
    }

    #[test]
    fn cuboid_with_zero_extent_is_flat() {
        let err = ConvexVolume::cuboid(dvec3(0.0, 0.0, 1.0), dvec3(2.0, 2.0, 1.0)).unwrap_err();
        assert!(matches!(err, VolumeError::DegenerateEdge { .. }));
    }
}
