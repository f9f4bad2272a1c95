use crate::math::{Point, Real};
use crate::query::point_segment_dist2;

/// Squared Euclidean distance from `pt` to the closed triangle `(a, b, c)`.
///
/// The closest feature is found by walking the Voronoï regions of the
/// triangle: vertices first, then edges (using cross products, which are
/// more numerically stable than the scalar checks alone), then the face.
/// Degenerate triangles, whose face region vanishes, fall back to the
/// distance to their longest edge; the result is never NaN.
pub fn point_triangle_dist2(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    pt: &Point<Real>,
) -> Real {
    let ab = b - a;
    let ac = c - a;
    let ap = pt - a;

    let ab_ap = ab.dot(&ap);
    let ac_ap = ac.dot(&ap);

    if ab_ap <= 0.0 && ac_ap <= 0.0 {
        // Voronoï region of `a`.
        return ap.norm_squared();
    }

    let bp = pt - b;
    let ab_bp = ab.dot(&bp);
    let ac_bp = ac.dot(&bp);

    if ab_bp >= 0.0 && ac_bp <= ab_bp {
        // Voronoï region of `b`.
        return bp.norm_squared();
    }

    let cp = pt - c;
    let ab_cp = ab.dot(&cp);
    let ac_cp = ac.dot(&cp);

    if ac_cp >= 0.0 && ab_cp <= ac_cp {
        // Voronoï region of `c`.
        return cp.norm_squared();
    }

    let bc = c - b;
    let n = ab.cross(&ac);

    let vc = n.dot(&ab.cross(&ap));
    if vc < 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
        // Voronoï region of `ab`.
        let v = ab_ap / ab.norm_squared();
        return (ap - ab * v).norm_squared();
    }

    let vb = -n.dot(&ac.cross(&cp));
    if vb < 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
        // Voronoï region of `ac`.
        let w = ac_ap / ac.norm_squared();
        return (ap - ac * w).norm_squared();
    }

    let va = n.dot(&bc.cross(&bp));
    if va < 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
        // Voronoï region of `bc`.
        let u = bc.dot(&bp) / bc.norm_squared();
        return (bp - bc * u).norm_squared();
    }

    // Voronoï region of the face. The denominator vanishes exactly when the
    // triangle is degenerate (collinear or coincident vertices).
    let denom = va + vb + vc;
    if denom != 0.0 {
        let inv = 1.0 / denom;
        let v = vb * inv;
        let w = vc * inv;
        let proj = a + ab * v + ac * w;
        return (pt - proj).norm_squared();
    }

    longest_edge_dist2(a, b, c, pt)
}

/// Distance to the longest edge of a degenerate triangle. The segment query
/// itself degrades to point-to-point for coincident vertices.
fn longest_edge_dist2(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    pt: &Point<Real>,
) -> Real {
    let lab = (b - a).norm_squared();
    let lac = (c - a).norm_squared();
    let lbc = (c - b).norm_squared();

    if lab >= lac && lab >= lbc {
        point_segment_dist2(a, b, pt)
    } else if lac >= lbc {
        point_segment_dist2(a, c, pt)
    } else {
        point_segment_dist2(b, c, pt)
    }
}
