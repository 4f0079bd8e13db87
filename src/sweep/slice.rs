//! Per-slice cross-section polygon.
//!
//! The raw material is an unordered bag of 2D points: projections of the
//! volume points swept in this slice, plus the crossings of active edges
//! with the slice's near and far planes. This module turns the bag into
//! the convex hull clipped to the grid's cross-section rectangle, split
//! into a left and a right row-monotone chain for the rasterizer.

use glam::{DVec2, dvec2};

use crate::geom::util::{EPS, cross, eq, fix_precision, line_intercept_x, line_intercept_y, s_leq};
use crate::sweep::{Chain, PointBuf};

/// Half of a convex hull, monotone in `y`. `left` runs along minimal `x`
/// from bottom to top, `right` along maximal `x`.
fn build_chain(sorted: &[DVec2], side_sign: i8, out: &mut Chain) {
    out.clear();
    for &p in sorted {
        if let Some(&prev) = out.last() {
            if eq(p.x, prev.x) && eq(p.y, prev.y) {
                continue;
            }
        }
        while out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            // drop points that turn the wrong way for this side, and
            // collinear runs with them
            if s_leq(cross(a - p, b - p), 0.0, side_sign) {
                out.pop();
            } else {
                break;
            }
        }
        out.push(p);
    }
}

/// Sutherland–Hodgman pass against one half-plane.
fn clip_halfplane(
    input: &[DVec2],
    out: &mut PointBuf,
    inside: impl Fn(DVec2) -> bool,
    crossing: impl Fn(DVec2, DVec2) -> DVec2,
) {
    out.clear();
    let Some(&last) = input.last() else {
        return;
    };
    let mut prev = last;
    let mut prev_in = inside(prev);
    for &cur in input {
        let cur_in = inside(cur);
        if cur_in {
            if !prev_in {
                out.push(crossing(prev, cur));
            }
            out.push(cur);
        } else if prev_in {
            out.push(crossing(prev, cur));
        }
        prev = cur;
        prev_in = cur_in;
    }
}

/// Drop leading/trailing chain points that only span a horizontal edge of
/// the hull; the surviving endpoint is the one farther along the chain's
/// own side, which is the only one rasterization can ever reach.
fn trim_horizontal_ends(chain: &mut Chain) {
    while chain.len() >= 2 && eq(chain[0].y, chain[1].y) {
        chain.remove(0);
    }
    while chain.len() >= 2 && eq(chain[chain.len() - 1].y, chain[chain.len() - 2].y) {
        chain.pop();
    }
}

/// Build the clipped cross-section chains for one slice.
///
/// `points` is consumed as scratch. `rect` is the grid cross-section
/// extent; the polygon is clipped to `[0, rect.x] × [0, rect.y]`.
/// Returns `false` when the slice holds no area inside the rectangle.
pub(crate) fn build(
    points: &mut PointBuf,
    rect: DVec2,
    left: &mut Chain,
    right: &mut Chain,
) -> bool {
    for p in points.iter_mut() {
        p.x = fix_precision(fix_precision(p.x, 0.0), rect.x);
        p.y = fix_precision(fix_precision(p.y, 0.0), rect.y);
    }
    if points.len() < 3 {
        return false;
    }
    points.sort_unstable_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    build_chain(points, 1, right);
    build_chain(points, -1, left);
    if right.len() < 2 || left.len() < 2 {
        return false;
    }

    // closed hull: right chain bottom-to-top, left interior top-to-bottom
    let mut poly = PointBuf::new();
    poly.extend_from_slice(right);
    poly.extend(left[1..left.len() - 1].iter().rev().copied());

    let mut clipped = PointBuf::new();
    clip_halfplane(
        &poly,
        &mut clipped,
        |p| p.x >= 0.0,
        |a, b| dvec2(0.0, line_intercept_y(a, b, 0.0)),
    );
    clip_halfplane(
        &clipped,
        &mut poly,
        |p| p.x <= rect.x,
        |a, b| dvec2(rect.x, line_intercept_y(a, b, rect.x)),
    );
    clip_halfplane(
        &poly,
        &mut clipped,
        |p| p.y >= 0.0,
        |a, b| dvec2(line_intercept_x(a, b, 0.0), 0.0),
    );
    clip_halfplane(
        &clipped,
        &mut poly,
        |p| p.y <= rect.y,
        |a, b| dvec2(line_intercept_x(a, b, rect.y), rect.y),
    );
    if poly.len() < 3 {
        return false;
    }

    // clipping may have replaced the extremes; rebuild the chains
    poly.sort_unstable_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    build_chain(&poly, 1, right);
    build_chain(&poly, -1, left);
    trim_horizontal_ends(right);
    trim_horizontal_ends(left);
    if right.len() < 2 || left.len() < 2 {
        return false;
    }

    // both chains must agree on the slice's row extent
    let bottom = right[0].y.max(left[0].y);
    let top = right[right.len() - 1].y.min(left[left.len() - 1].y);
    if top - bottom <= EPS {
        return false;
    }
    right[0].y = bottom;
    left[0].y = bottom;
    let n = right.len() - 1;
    right[n].y = top;
    let n = left.len() - 1;
    left[n].y = top;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(pts: &[(f64, f64)], rect: (f64, f64)) -> Option<(Chain, Chain)> {
        let mut buf: PointBuf = pts.iter().map(|&(x, y)| dvec2(x, y)).collect();
        let mut left = Chain::new();
        let mut right = Chain::new();
        build(&mut buf, dvec2(rect.0, rect.1), &mut left, &mut right).then(|| (left, right))
    }

    #[test]
    fn square_splits_into_vertical_chains() {
        let (left, right) = run(
            &[(1.0, 1.0), (3.0, 1.0), (1.0, 3.0), (3.0, 3.0)],
            (8.0, 8.0),
        )
        .unwrap();
        assert_eq!(left.as_slice(), &[dvec2(1.0, 1.0), dvec2(1.0, 3.0)]);
        assert_eq!(right.as_slice(), &[dvec2(3.0, 1.0), dvec2(3.0, 3.0)]);
    }

    #[test]
    fn interior_and_duplicate_points_are_dropped() {
        let (left, right) = run(
            &[
                (1.0, 1.0),
                (3.0, 1.0),
                (1.0, 3.0),
                (3.0, 3.0),
                (2.0, 2.0),         // interior
                (1.0 + 1e-9, 1.0),  // duplicate after snapping
            ],
            (8.0, 8.0),
        )
        .unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn triangle_chains() {
        // apex to the right: left chain is the single vertical edge
        let (left, right) = run(&[(1.0, 1.0), (1.0, 5.0), (5.0, 3.0)], (8.0, 8.0)).unwrap();
        assert_eq!(left.as_slice(), &[dvec2(1.0, 1.0), dvec2(1.0, 5.0)]);
        assert_eq!(
            right.as_slice(),
            &[dvec2(1.0, 1.0), dvec2(5.0, 3.0), dvec2(1.0, 5.0)]
        );
    }

    #[test]
    fn clips_to_rect() {
        // diamond poking out of all four sides of a 4x4 rect
        let (left, right) = run(
            &[(-2.0, 2.0), (2.0, -2.0), (6.0, 2.0), (2.0, 6.0)],
            (4.0, 4.0),
        )
        .unwrap();
        for p in left.iter().chain(right.iter()) {
            assert!(p.x >= 0.0 && p.x <= 4.0);
            assert!(p.y >= 0.0 && p.y <= 4.0);
        }
        assert_relative_eq!(left[0].y, 0.0);
        assert_relative_eq!(left[left.len() - 1].y, 4.0);
        // the clipped diamond passes through the rect corners
        assert!(left.iter().any(|p| eq(p.x, 0.0) && eq(p.y, 0.0)));
        assert!(right.iter().any(|p| eq(p.x, 4.0) && eq(p.y, 4.0)));
    }

    #[test]
    fn outside_rect_is_empty() {
        assert!(run(&[(5.0, 5.0), (7.0, 5.0), (5.0, 7.0), (7.0, 7.0)], (4.0, 4.0)).is_none());
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        // fewer than three points
        assert!(run(&[(1.0, 1.0), (2.0, 2.0)], (4.0, 4.0)).is_none());
        // collinear horizontal sliver
        assert!(run(&[(0.5, 1.0), (1.5, 1.0), (2.5, 1.0)], (4.0, 4.0)).is_none());
        // zero-height sliver on the far edge of the rect
        assert!(run(&[(1.0, 4.0), (2.0, 4.0), (3.0, 4.0)], (4.0, 4.0)).is_none());
    }
}
