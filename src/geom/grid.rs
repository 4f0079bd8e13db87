//! Uniform grid bounds and the rule mapping a world extent to cell indices.

use glam::{DVec3, IVec3};

use super::util::EPS;

/// Inclusive cell-index box of a uniform grid.
///
/// Cell `(i, j, k)` occupies the world box
/// `[i*dx, (i+1)*dx) × [j*dy, (j+1)*dy) × [k*dz, (k+1)*dz)` for cell
/// dimensions `(dx, dy, dz)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl GridBounds {
    /// Both corners inclusive; `min` must not exceed `max` on any axis.
    pub fn new(min: IVec3, max: IVec3) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "inverted grid bounds {min}..{max}"
        );
        Self { min, max }
    }

    /// Cell count per axis.
    #[inline]
    pub fn cells(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    #[inline]
    pub fn contains(&self, cell: IVec3) -> bool {
        cell.cmpge(self.min).all() && cell.cmple(self.max).all()
    }

    /// World-space corner of the lowest cell.
    #[inline]
    pub fn world_min(&self, cell_dims: DVec3) -> DVec3 {
        self.min.as_dvec3() * cell_dims
    }

    /// World-space corner just past the highest cell.
    #[inline]
    pub fn world_max(&self, cell_dims: DVec3) -> DVec3 {
        (self.max + IVec3::ONE).as_dvec3() * cell_dims
    }
}

/// `v / d` with coordinates within tolerance of a cell boundary snapped
/// onto it, so an extent that ends exactly on a boundary never claims the
/// neighbouring cell through float noise.
#[inline]
fn snapped_quot(v: f64, d: f64) -> f64 {
    let q = v / d;
    let r = q.round();
    if (q - r).abs() <= EPS { r } else { q }
}

/// First cell index whose span reaches world coordinate `v`.
#[inline]
pub fn cell_floor(v: f64, d: f64) -> i64 {
    snapped_quot(v, d).floor() as i64
}

/// Last cell index overlapped by an extent ending at world coordinate `v`.
///
/// Boundary-exact ends are exclusive: an extent `[0, 2]` with `d = 1`
/// occupies cells `0..=1`, and a zero-width extent sitting on a boundary
/// occupies nothing (`cell_last` drops below `cell_floor`).
#[inline]
pub fn cell_last(v: f64, d: f64) -> i64 {
    snapped_quot(v, d).ceil() as i64 - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::ivec3;

    #[test]
    fn bounds_basics() {
        let b = GridBounds::new(ivec3(-2, 0, 1), ivec3(2, 4, 1));
        assert_eq!(b.cells(), ivec3(5, 5, 1));
        assert!(b.contains(ivec3(0, 4, 1)));
        assert!(!b.contains(ivec3(0, 5, 1)));
        assert_eq!(b.world_min(glam::dvec3(2.0, 1.0, 0.5)).x, -4.0);
        assert_eq!(b.world_max(glam::dvec3(2.0, 1.0, 0.5)).x, 6.0);
    }

    #[test]
    #[should_panic]
    fn inverted_bounds_panic() {
        GridBounds::new(ivec3(0, 0, 0), ivec3(-1, 0, 0));
    }

    #[test]
    fn index_rule() {
        // extent [0.5, 2.5] with unit cells touches cells 0..=2
        assert_eq!(cell_floor(0.5, 1.0), 0);
        assert_eq!(cell_last(2.5, 1.0), 2);

        // boundary-exact extent [1, 3] touches cells 1..=2 only
        assert_eq!(cell_floor(1.0, 1.0), 1);
        assert_eq!(cell_last(3.0, 1.0), 2);

        // zero-width extent on a boundary occupies nothing
        assert!(cell_last(2.0, 1.0) < cell_floor(2.0, 1.0));

        // float noise around a boundary snaps onto it
        assert_eq!(cell_floor(2.0 - 1e-9, 1.0), 2);
        assert_eq!(cell_last(3.0 + 1e-9, 1.0), 2);

        // non-unit cells, negative coordinates
        assert_eq!(cell_floor(-0.1, 0.5), -1);
        assert_eq!(cell_last(-0.1, 0.5), -1);
        assert_eq!(cell_floor(1.2, 0.5), 2);
    }
}
