//! Small geometric helpers shared by the sweep: sign-aware comparisons,
//! segment intercepts and the dimension ordering that picks the sweep axes.

use glam::{DVec2, DVec3};

/// Absolute tolerance for "same coordinate" decisions.
pub const EPS: f64 = 1e-7;

#[inline]
pub fn eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

/// Snap `v` onto `target` when it is within tolerance, otherwise leave it.
#[inline]
pub fn fix_precision(v: f64, target: f64) -> f64 {
    if eq(v, target) { target } else { v }
}

/*──────────────────────── sign-aware comparisons ───────────────────────*/
//
// The rasterizer walks the two hull chains with a side sign: +1 means
// "greater is farther out", -1 flips the ordering. Folding the sign into
// the comparison keeps one code path for both sides.

#[inline]
pub fn s_lt(a: f64, b: f64, sign: i8) -> bool {
    if sign >= 0 { a < b } else { a > b }
}

#[inline]
pub fn s_gt(a: f64, b: f64, sign: i8) -> bool {
    if sign >= 0 { a > b } else { a < b }
}

#[inline]
pub fn s_leq(a: f64, b: f64, sign: i8) -> bool {
    if sign >= 0 { a <= b } else { a >= b }
}

#[inline]
pub fn s_geq(a: f64, b: f64, sign: i8) -> bool {
    if sign >= 0 { a >= b } else { a <= b }
}

/// Sign-aware maximum: whichever of `a`, `b` lies farther in `sign` direction.
#[inline]
pub fn s_max(a: f64, b: f64, sign: i8) -> f64 {
    if s_geq(a, b, sign) { a } else { b }
}

/*──────────────────────────── intercepts ───────────────────────────────*/

/// 2D pseudo-cross product (z component of the 3D cross).
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// X coordinate where the line through `p1`/`p2` crosses the horizontal `y`.
#[inline]
pub fn line_intercept_x(p1: DVec2, p2: DVec2, y: f64) -> f64 {
    p2.x + (p2.x - p1.x) / (p2.y - p1.y) * (y - p2.y)
}

/// Y coordinate where the line through `p1`/`p2` crosses the vertical `x`.
#[inline]
pub fn line_intercept_y(p1: DVec2, p2: DVec2, x: f64) -> f64 {
    p2.y + (p2.y - p1.y) / (p2.x - p1.x) * (x - p2.x)
}

/// Point where the segment `p1`→`p2` crosses the plane `z = const`.
#[inline]
pub fn line_intercept_xy(p1: DVec3, p2: DVec3, z: f64) -> DVec3 {
    let t = (z - p1.z) / (p2.z - p1.z);
    DVec3::new(p1.x + (p2.x - p1.x) * t, p1.y + (p2.y - p1.y) * t, z)
}

/// Axis indices ordered by descending `|direction|` component.
///
/// The first entry is the dominant axis (the slice axis of a sweep), the
/// last the least aligned (the column axis). Equal magnitudes resolve to
/// the higher axis index, so a pure Z direction yields `[2, 1, 0]`.
pub fn sort_dimensions(direction: DVec3) -> [usize; 3] {
    let mag = direction.abs();
    let mut order = [0usize, 1, 2];
    order.sort_unstable_by(|&a, &b| mag[b].total_cmp(&mag[a]).then(b.cmp(&a)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{dvec2, dvec3};

    #[test]
    fn signed_comparisons_flip() {
        assert!(s_lt(1.0, 2.0, 1));
        assert!(s_lt(2.0, 1.0, -1));
        assert!(s_geq(3.0, 3.0, 1));
        assert!(s_geq(1.0, 3.0, -1));
        assert_eq!(s_max(1.0, 5.0, 1), 5.0);
        assert_eq!(s_max(1.0, 5.0, -1), 1.0);
    }

    #[test]
    fn intercepts() {
        let a = dvec2(0.0, 0.0);
        let b = dvec2(2.0, 4.0);
        assert_relative_eq!(line_intercept_x(a, b, 2.0), 1.0);
        assert_relative_eq!(line_intercept_y(a, b, 1.0), 2.0);

        let p = line_intercept_xy(dvec3(0.0, 0.0, 0.0), dvec3(4.0, 2.0, 2.0), 1.0);
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn dimension_order_descending() {
        assert_eq!(sort_dimensions(dvec3(3.0, -5.0, 1.0)), [1, 0, 2]);
        assert_eq!(sort_dimensions(dvec3(0.0, 0.0, 1.0)), [2, 1, 0]);
        // ties resolve to the higher axis first
        assert_eq!(sort_dimensions(dvec3(1.0, -1.0, 0.0)), [1, 0, 2]);
        assert_eq!(sort_dimensions(dvec3(2.0, 2.0, 2.0)), [2, 1, 0]);
    }

    #[test]
    fn precision_snap() {
        assert_eq!(fix_precision(1.0 + 1e-9, 1.0), 1.0);
        assert_eq!(fix_precision(1.5, 1.0), 1.5);
    }
}
