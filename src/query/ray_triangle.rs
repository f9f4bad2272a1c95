use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};

/// Parametric distance `t >= 0` at which the ray `origin + t·dir` crosses
/// the triangle `(a, b, c)`, or `None` when there is no crossing.
///
/// Back-face hits count and boundary hits are inclusive. Rays
/// (near-)parallel to the triangle plane and crossings behind the origin
/// return `None`; degenerate triangles have a zero normal and are rejected
/// by the same parallelism test.
pub fn ray_triangle_toi(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    origin: &Point<Real>,
    dir: &Vector<Real>,
) -> Option<Real> {
    let ab = *b - *a;
    let ac = *c - *a;

    let n = ab.cross(&ac);
    let d = n.dot(dir);

    // The ray direction and the triangle plane are parallel.
    if d.abs() <= DEFAULT_EPSILON {
        return None;
    }

    let ap = *origin - *a;
    let t = ap.dot(&n);

    // The crossing would be behind the ray origin.
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    let d_abs = d.abs();
    let e = -dir.cross(&ap);

    // Barycentric rejection, mirrored for the two plane sides.
    let (v, w) = if t < 0.0 {
        (-ac.dot(&e), ab.dot(&e))
    } else {
        (ac.dot(&e), -ab.dot(&e))
    };

    if v < 0.0 || v > d_abs || w < 0.0 || v + w > d_abs {
        return None;
    }

    Some(t.abs() / d_abs)
}
