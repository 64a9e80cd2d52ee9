use crate::{EPSILON, Vec3};

/// Ordered vertex loop in world or raw grid space.
pub type Polygon = Vec<Vec3>;

/// True for fewer than 3 vertices or a near-zero fan area.
pub fn is_degenerate(poly: &[Vec3]) -> bool {
    if poly.len() < 3 {
        return true;
    }
    let origin = poly[0];
    let mut n = Vec3::ZERO;
    for pair in poly[1..].windows(2) {
        n += (pair[0] - origin).cross(pair[1] - origin);
    }
    n.x * n.x + n.y * n.y + n.z * n.z < 1e-12
}

/// Whether any polygon in the set can produce a visible face.
pub fn has_renderable(polys: &[Polygon]) -> bool {
    polys.iter().any(|p| !is_degenerate(p))
}

/// Point-set equality: same vertex count and every vertex of `a` present in `b`.
pub fn polygons_equal(a: &[Vec3], b: &[Vec3], eps: f64) -> bool {
    a.len() == b.len() && a.iter().all(|p| b.iter().any(|q| p.approx_eq(*q, eps)))
}

/// Keeps the first of each group of equal polygons.
pub fn dedupe(polys: Vec<Polygon>, eps: f64) -> Vec<Polygon> {
    let mut out: Vec<Polygon> = Vec::with_capacity(polys.len());
    for poly in polys {
        if !out.iter().any(|existing| polygons_equal(existing, &poly, eps)) {
            out.push(poly);
        }
    }
    out
}

/// Drops repeated and collinear end vertices. `None` if nothing usable remains.
pub fn simplify(poly: &[Vec3]) -> Option<Polygon> {
    if poly.len() < 3 {
        return None;
    }
    let mut out: Polygon = Vec::with_capacity(poly.len());
    for &p in poly {
        if out.last().is_none_or(|last| !last.approx_eq(p, EPSILON)) {
            out.push(p);
        }
    }
    if out.len() > 1 && out[0].approx_eq(out[out.len() - 1], EPSILON) {
        out.pop();
    }
    let n = out.len();
    if n >= 3 && is_point_between(out[n - 2], out[0], out[n - 1], EPSILON) {
        out.pop();
    }
    let n = out.len();
    if n >= 3 && is_point_between(out[n - 1], out[1], out[0], EPSILON) {
        out.remove(0);
    }
    if out.len() < 3 || is_degenerate(&out) {
        return None;
    }
    Some(out)
}

/// Collinearity test: `between` lies on the line through `start` and `end`.
pub(crate) fn is_point_between(start: Vec3, end: Vec3, between: Vec3, eps: f64) -> bool {
    let x = (end.y - start.y) * (between.z - start.z) - (end.z - start.z) * (between.y - start.y);
    let y = (between.x - start.x) * (end.z - start.z) - (between.z - start.z) * (end.x - start.x);
    let z = (end.x - start.x) * (between.y - start.y) - (end.y - start.y) * (between.x - start.x);
    x.abs() + y.abs() + z.abs() < eps
}

/// Axis-aligned rectangle lying in the plane `axis = c`, spanning `a0..a1`
/// and `b0..b1` on the two remaining axes in increasing index order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneRect {
    pub axis: usize,
    pub positive: bool,
    pub c: f64,
    pub a0: f64,
    pub a1: f64,
    pub b0: f64,
    pub b1: f64,
}

impl PlaneRect {
    /// Corner loop wound the way the renderer emits each facing.
    pub fn vertices(&self) -> Polygon {
        let PlaneRect {
            axis,
            positive,
            c,
            a0,
            a1,
            b0,
            b1,
        } = *self;
        let v = Vec3::new;
        match (axis, positive) {
            (0, true) => vec![v(c, a0, b0), v(c, a1, b0), v(c, a1, b1), v(c, a0, b1)],
            (0, false) => vec![v(c, a0, b1), v(c, a1, b1), v(c, a1, b0), v(c, a0, b0)],
            (1, true) => vec![v(a0, c, b1), v(a1, c, b1), v(a1, c, b0), v(a0, c, b0)],
            (1, false) => vec![v(a0, c, b0), v(a1, c, b0), v(a1, c, b1), v(a0, c, b1)],
            (_, true) => vec![v(a0, b0, c), v(a1, b0, c), v(a1, b1, c), v(a0, b1, c)],
            (_, false) => vec![v(a1, b0, c), v(a0, b0, c), v(a0, b1, c), v(a1, b1, c)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_removes_duplicates_and_collinear_points() {
        let poly = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ];
        let out = simplify(&poly).expect("square");
        assert_eq!(out.len(), 4);
        assert!(polygons_equal(&out, &poly[1..5], 1e-9));
    }

    #[test]
    fn simplify_rejects_line() {
        let poly = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        assert!(simplify(&poly).is_none());
    }

    #[test]
    fn rect_winding_matches_facing_normal() {
        for axis in 0..3 {
            for positive in [true, false] {
                let rect = PlaneRect {
                    axis,
                    positive,
                    c: 1.0,
                    a0: 0.0,
                    a1: 1.0,
                    b0: 0.0,
                    b1: 1.0,
                };
                let p = rect.vertices();
                let n = (p[1] - p[0]).cross(p[2] - p[0]);
                let sign = if positive { 1.0 } else { -1.0 };
                assert!(n[axis] * sign > 0.0, "axis={axis} positive={positive}");
            }
        }
    }
}
