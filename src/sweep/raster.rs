//! Row rasterization of a slice's hull chains.
//!
//! Each chain is row-monotone, so a cursor walks it once per slice while
//! the driver steps through rows in order. For every row band the cursor
//! reports the chain's extreme column coordinate inside the band.

use glam::DVec2;

use crate::geom::util::{line_intercept_x, s_geq, s_max};

#[derive(Debug, Default)]
pub(crate) struct ChainCursor {
    seg: usize,
}

impl ChainCursor {
    pub fn reset(&mut self) {
        self.seg = 0;
    }

    /// Extreme `x` of `chain` over the closed row band `[lo, hi]`.
    ///
    /// `side_sign` is `+1` for the right chain (maximal `x` is extreme)
    /// and `-1` for the left. Bands must be visited bottom to top; the
    /// cursor stays on the segment that continues past the band so the
    /// next call resumes there.
    ///
    /// A segment running *outward* (away from the polygon interior for
    /// this side) peaks where it leaves the band, an *inward* one where
    /// it enters; a segment contained in the band peaks at whichever
    /// endpoint its slope favours, which the same rule covers.
    pub fn band_extreme(&mut self, chain: &[DVec2], lo: f64, hi: f64, side_sign: i8) -> f64 {
        debug_assert!(chain.len() >= 2);
        let mut seg = self.seg.min(chain.len() - 2);
        let mut best: Option<f64> = None;
        loop {
            let a = chain[seg];
            let b = chain[seg + 1];
            if b.y.min(hi) >= a.y.max(lo) {
                let enter = if a.y >= lo {
                    a.x
                } else {
                    line_intercept_x(a, b, lo)
                };
                let leave = if b.y <= hi {
                    b.x
                } else {
                    line_intercept_x(a, b, hi)
                };
                let outward = s_geq(leave, enter, side_sign);
                let peak = if outward { leave } else { enter };
                best = Some(match best {
                    None => peak,
                    Some(v) => s_max(v, peak, side_sign),
                });
            }
            if b.y > hi || seg + 2 >= chain.len() {
                break;
            }
            seg += 1;
        }
        self.seg = seg;
        best.expect("row band outside the slice's chains")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn single_segment_extremes() {
        // right-leaning edge from (0,0) to (4,4)
        let chain = [dvec2(0.0, 0.0), dvec2(4.0, 4.0)];
        let mut cur = ChainCursor::default();
        // right side: outward segment peaks at the top of each band
        assert_relative_eq!(cur.band_extreme(&chain, 0.0, 1.0, 1), 1.0);
        assert_relative_eq!(cur.band_extreme(&chain, 1.0, 2.0, 1), 2.0);
        assert_relative_eq!(cur.band_extreme(&chain, 3.0, 4.0, 1), 4.0);

        // left side: the same edge is inward, peaks at the bottom
        cur.reset();
        assert_relative_eq!(cur.band_extreme(&chain, 0.0, 1.0, -1), 0.0);
        assert_relative_eq!(cur.band_extreme(&chain, 2.0, 3.0, -1), 2.0);
    }

    #[test]
    fn bend_inside_band_wins() {
        // chain bulging right between y=1.25 and y=1.75
        let chain = [
            dvec2(1.0, 0.0),
            dvec2(3.0, 1.25),
            dvec2(3.5, 1.75),
            dvec2(2.0, 3.0),
        ];
        let mut cur = ChainCursor::default();
        assert_relative_eq!(cur.band_extreme(&chain, 0.0, 1.0, 1), 2.6);
        // the whole bulge sits inside this band
        assert_relative_eq!(cur.band_extreme(&chain, 1.0, 2.0, 1), 3.5);
        assert_relative_eq!(cur.band_extreme(&chain, 2.0, 3.0, 1), 3.5 - 1.5 * 0.25 / 1.25);
    }

    #[test]
    fn cursor_resumes_mid_segment() {
        let chain = [dvec2(0.0, 0.0), dvec2(8.0, 8.0)];
        let mut cur = ChainCursor::default();
        assert_relative_eq!(cur.band_extreme(&chain, 0.0, 2.0, 1), 2.0);
        // later band on the same long segment
        assert_relative_eq!(cur.band_extreme(&chain, 6.0, 8.0, 1), 8.0);
    }
}
