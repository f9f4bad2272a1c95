use crate::math::{Point, Real};

/// Squared Euclidean distance from `pt` to the segment `[a, b]`.
///
/// A zero-length segment degrades to the point-to-point distance.
#[inline]
pub fn point_segment_dist2(a: &Point<Real>, b: &Point<Real>, pt: &Point<Real>) -> Real {
    let ab = b - a;
    let ap = pt - a;
    let ab_ap = ab.dot(&ap);
    let sqnab = ab.norm_squared();

    if ab_ap <= 0.0 || sqnab == 0.0 {
        // Voronoï region of vertex 'a', or a degenerate segment.
        ap.norm_squared()
    } else if ab_ap >= sqnab {
        // Voronoï region of vertex 'b'.
        (pt - b).norm_squared()
    } else {
        // Voronoï region of the segment interior.
        let u = ab_ap / sqnab;
        (ap - ab * u).norm_squared()
    }
}
