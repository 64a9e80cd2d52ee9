//! Planar polygon operations within one face plane.
//!
//! Every function works on the `(one, two)` axis pair of the face; the third
//! coordinate is carried through unchanged. `inverse` flips the orientation
//! convention for faces whose winding runs the other way in that pair.

use crate::polygon::{Polygon, simplify};
use crate::ray2d::{Ray2d, eq_eps};
use crate::{EPSILON, Vec3, third_axis};

/// True when `a` and `b` share area (touching edges do not count).
pub fn intersects(a: &[Vec3], b: &[Vec3], one: usize, two: usize, inverse: bool, epsilon: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if equals_cyclic(a, b, one, two, EPSILON) {
        return true;
    }

    let mut parallel = 0;
    for (i, &start1) in a.iter().enumerate() {
        let end1 = a[(i + 1) % a.len()];
        let ray1 = Ray2d::through(one, two, start1, end1);

        let mut on_edge_low = false;
        let mut on_edge_high = false;
        let mut side_check = false;

        for (j, &start2) in b.iter().enumerate() {
            let end2 = b[(j + 1) % b.len()];
            let ray2 = Ray2d::through(one, two, start2, end2);

            let crossing = ray1
                .intersect_when(&ray2)
                .and_then(|t| ray2.intersect_when(&ray1).map(|other| (t, other)));
            match crossing {
                Ok((t, other)) => {
                    if t > epsilon && t < 1.0 - epsilon && other > epsilon && other < 1.0 - epsilon {
                        return true;
                    }
                    if within(other, 0.0, 1.0, epsilon) {
                        if eq_eps(t, 0.0, epsilon) {
                            on_edge_low = true;
                        }
                        if eq_eps(t, 1.0, epsilon) {
                            on_edge_high = true;
                        }
                    }
                    if on_edge_low && on_edge_high {
                        side_check = true;
                    }
                }
                Err(_) => {
                    let (start_t, end_t) = if ray1.dir_one.abs() <= EPSILON {
                        (
                            ray1.t_at(two, ray2.origin_two),
                            ray1.t_at(two, ray2.origin_two + ray2.dir_two),
                        )
                    } else {
                        (
                            ray1.t_at(one, ray2.origin_one),
                            ray1.t_at(one, ray2.origin_one + ray2.dir_one),
                        )
                    };
                    let inner = |t: f64| t > epsilon && t < 1.0 - epsilon;
                    if inner(start_t) || inner(end_t) {
                        parallel += 1;
                        if parallel > 1 {
                            return true;
                        }
                    }
                }
            }
        }

        if side_check {
            let mut side: Option<bool> = None;
            for p in b {
                if let Some(result) = ray1.side(p[one], p[two]) {
                    match side {
                        None => side = Some(result),
                        Some(s) if s != result => return true,
                        Some(_) => {}
                    }
                }
            }
        }
    }

    is_inside(a, one, two, b, inverse) || is_inside(b, one, two, a, inverse)
}

/// Subtracts `cutter` from `poly` edge by edge.
///
/// Each cutter edge splits off the part of the remaining piece outside the
/// cutter; those remainders are returned. With `take_inner` only the final
/// inner piece is returned instead.
pub fn cut(poly: &[Vec3], cutter: &[Vec3], one: usize, two: usize, inverse: bool, take_inner: bool) -> Vec<Polygon> {
    let mut done: Vec<Polygon> = Vec::new();
    if cutter.is_empty() {
        return done;
    }
    let mut to_cut: Polygon = poly.to_vec();
    for (i, &start) in cutter.iter().enumerate() {
        let end = cutter[(i + 1) % cutter.len()];
        let ray = Ray2d::through(one, two, start, end);
        let remainder = if take_inner { None } else { Some(&mut done) };
        match cut_by_ray(to_cut, &ray, remainder, inverse) {
            Some(inner) => to_cut = inner,
            None => return done,
        }
    }
    if take_inner {
        done.push(to_cut);
    }
    done
}

/// Triangle-fan containment of every point of `other` within `subject`.
fn is_inside(subject: &[Vec3], one: usize, two: usize, other: &[Vec3], inverse: bool) -> bool {
    let accepts = |r: Option<bool>| r.is_none_or(|right| !right == inverse);
    let edge = |a: Vec3, b: Vec3, p: Vec3| accepts(Ray2d::through(one, two, a, b).side(p[one], p[two]));

    other.iter().all(|&p| {
        (0..subject.len().saturating_sub(2)).any(|i| {
            let first = subject[0];
            let second = subject[i + 1];
            let third = subject[i + 2];
            edge(first, second, p) && edge(second, third, p) && edge(third, first, p)
        })
    })
}

/// Splits `poly` along `ray`. The right part is returned; the left part goes to
/// `done` when a sink is supplied.
fn cut_by_ray(poly: Polygon, ray: &Ray2d, done: Option<&mut Vec<Polygon>>, inverse: bool) -> Option<Polygon> {
    let (one, two) = (ray.one, ray.two);
    let mut sides: Vec<Option<bool>> = Vec::with_capacity(poly.len());
    let mut all_same = true;
    let mut all_value: Option<bool> = None;
    for (i, p) in poly.iter().enumerate() {
        let value = ray.side(p[one], p[two]).map(|right| right != inverse);
        sides.push(value);
        if all_same {
            if i == 0 || all_value.is_none() {
                all_value = value;
            } else if value.is_some() && all_value != value {
                all_same = false;
            }
        }
    }

    if all_same {
        return match all_value {
            None => None,
            Some(true) => Some(poly),
            Some(false) => {
                if let Some(done) = done {
                    done.push(poly);
                }
                None
            }
        };
    }

    let third_value = poly[0][third_axis(one, two)];
    let mut left: Polygon = Vec::with_capacity(poly.len() + 2);
    let mut right: Polygon = Vec::with_capacity(poly.len() + 2);
    let mut before_side = sides[sides.len() - 1];
    let mut before = poly[poly.len() - 1];
    for (i, &vec) in poly.iter().enumerate() {
        let value = sides[i];
        let crosses = matches!((before_side, value), (Some(false), Some(true)) | (Some(true), Some(false)));
        if crosses {
            if let Some(hit) = ray.intersect_segment(vec, before, third_value) {
                left.push(hit);
                right.push(hit);
            }
        }
        match value {
            Some(true) => right.push(vec),
            Some(false) => left.push(vec),
            None => {
                left.push(vec);
                right.push(vec);
            }
        }
        before_side = value;
        before = vec;
    }

    if let (Some(done), Some(left)) = (done, simplify(&left)) {
        done.push(left);
    }
    simplify(&right)
}

fn equals_cyclic(a: &[Vec3], b: &[Vec3], one: usize, two: usize, eps: f64) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let eq = |p: Vec3, q: Vec3| (p[one] - q[one]).abs() <= eps && (p[two] - q[two]).abs() <= eps;
    let Some(mut start) = a.iter().position(|&p| eq(p, b[0])) else {
        return false;
    };
    for &q in &b[1..] {
        start = (start + 1) % a.len();
        if !eq(a[start], q) {
            return false;
        }
    }
    true
}

#[inline]
fn within(value: f64, min: f64, max: f64, eps: f64) -> bool {
    (value > min || eq_eps(value, min, eps)) && (value < max || eq_eps(value, max, eps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::polygons_equal;

    // Square in the XZ plane (y fixed), as seen by an UP face.
    fn square(x0: f64, z0: f64, x1: f64, z1: f64) -> Polygon {
        vec![
            Vec3::new(x0, 1.0, z1),
            Vec3::new(x1, 1.0, z1),
            Vec3::new(x1, 1.0, z0),
            Vec3::new(x0, 1.0, z0),
        ]
    }

    #[test]
    fn identical_squares_intersect() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        assert!(intersects(&a, &a, 0, 2, false, 0.001));
    }

    #[test]
    fn adjacent_squares_do_not_intersect() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(1.0, 0.0, 2.0, 1.0);
        assert!(!intersects(&a, &b, 0, 2, false, 0.001));
    }

    #[test]
    fn contained_square_intersects() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(0.25, 0.25, 0.75, 0.75);
        assert!(intersects(&a, &b, 0, 2, false, 0.001));
        assert!(intersects(&b, &a, 0, 2, false, 0.001));
    }

    #[test]
    fn cut_outside_cutter_leaves_polygon() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let cutter = square(2.0, 0.0, 3.0, 1.0);
        let pieces = cut(&a, &cutter, 0, 2, false, false);
        assert_eq!(pieces.len(), 1);
        assert!(polygons_equal(&pieces[0], &a, 1e-9));
    }

    #[test]
    fn take_inner_returns_overlap() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let cutter = square(0.5, 0.0, 1.0, 1.0);
        let inner = cut(&a, &cutter, 0, 2, false, true);
        assert_eq!(inner.len(), 1);
        assert!(polygons_equal(&inner[0], &cutter, 1e-9));
    }
}
