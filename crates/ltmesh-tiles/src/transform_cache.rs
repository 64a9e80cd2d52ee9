//! Face fragments of transformable boxes.
//!
//! Every side of a corner-displaced box splits into up to two tilted
//! fragments (one per triangle of its diagonal) plus whatever part of the
//! undisplaced side rectangle survives being cut by all tilted planes. The
//! whole decomposition runs in raw grid units and is scaled to world units at
//! the end.

use ltmesh_geom::polygon::{Polygon, dedupe, is_degenerate, polygons_equal, simplify};
use ltmesh_geom::{CUT_EPSILON, EPSILON, Plane, Vec3, polygon2d};

use crate::facing::Facing;
use crate::transform::{Corner, CornerTransform, FACE_CORNERS, base_corners, face_corners};

const FILLED_EPSILON: f64 = 1e-4;
const DEDUPE_EPSILON: f64 = 1e-4;
const FACING_TOLERANCE: f64 = 2e-3;
const OVERLAP_EPSILON: f64 = 0.001;
const AXIS_CUT_EPSILON: f64 = 5e-4;
// Downward sides keep slivers that sit almost on a cut plane.
const AXIS_CUT_EPSILON_DOWN: f64 = 1e-7;

/// Render-ready fragments for one facing, in world units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceCache {
    pub axis_strips: Vec<Polygon>,
    pub tilted_render: Vec<Polygon>,
    /// The side still covers its entire undisplaced rectangle.
    pub completely_filled: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformCache {
    faces: [FaceCache; 6],
}

#[derive(Clone, Debug)]
struct RawFace {
    convex: bool,
    tilted1: Option<Polygon>,
    tilted2: Option<Polygon>,
    plane1: Option<Plane>,
    plane2: Option<Plane>,
    axis_strips: Vec<Polygon>,
    tilted_render: Vec<Polygon>,
}

impl Default for RawFace {
    fn default() -> Self {
        Self {
            convex: true,
            tilted1: None,
            tilted2: None,
            plane1: None,
            plane2: None,
            axis_strips: Vec::new(),
            tilted_render: Vec::new(),
        }
    }
}

impl TransformCache {
    /// Cache of a transformable box without payload: no faces at all.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn face(&self, facing: Facing) -> &FaceCache {
        &self.faces[facing.index()]
    }

    pub fn build(min: [i32; 3], max: [i32; 3], grid: i32, transform: &CornerTransform) -> Self {
        let base = base_corners(min, max);
        let raw = build_raw(min, max, transform, &base);
        let inv_grid = 1.0 / grid as f64;
        let to_world = |polys: &[Polygon]| -> Vec<Polygon> {
            polys
                .iter()
                .filter(|p| !is_degenerate(p))
                .map(|p| p.iter().map(|v| *v * inv_grid).collect())
                .collect()
        };

        let faces = Facing::ALL.map(|facing| {
            let face = &raw[facing.index()];
            let full = strip_from(&face_corners(facing), &base);
            let completely_filled = face.tilted1.is_none()
                && face.tilted2.is_none()
                && face.axis_strips.len() == 1
                && full
                    .as_ref()
                    .is_some_and(|full| polygons_equal(&face.axis_strips[0], full, FILLED_EPSILON));
            FaceCache {
                axis_strips: to_world(&face.axis_strips),
                tilted_render: to_world(&face.tilted_render),
                completely_filled,
            }
        });
        TransformCache { faces }
    }
}

fn build_raw(min: [i32; 3], max: [i32; 3], transform: &CornerTransform, base: &[Vec3; 8]) -> [RawFace; 6] {
    let corners = transform.corners(min, max);
    let mut raw: [RawFace; 6] = Default::default();
    let box_planes = Facing::ALL.map(|f| box_plane(min, max, f));

    for (facing, quad) in FACE_CORNERS {
        let q = quad.map(|c| c.index());
        let (tri_a, tri_b) = if transform.flipped(facing) {
            ([q[0], q[1], q[3]], [q[1], q[2], q[3]])
        } else {
            ([q[0], q[1], q[2]], [q[0], q[2], q[3]])
        };

        let axis = facing.axis();
        let first_same = on_base_plane(&corners, base, &tri_a, axis);
        let second_same = on_base_plane(&corners, base, &tri_b, axis);
        if first_same && second_same {
            continue;
        }

        let normal_a = triangle_normal(&corners, &tri_a).normalized_f32();
        let normal_b = triangle_normal(&corners, &tri_b).normalized_f32();

        let mut strip1: Option<Polygon> = None;
        let mut strip2: Option<Polygon> = None;
        let mut plane1: Option<Plane> = None;
        let mut plane2: Option<Plane> = None;

        if normal_a.approx_eq(normal_b, EPSILON) {
            if !first_same && !normal_a.approx_eq(Vec3::ZERO, EPSILON) {
                strip1 = strip_from_indices(&q, &corners);
                plane1 = strip1.as_ref().map(|_| Plane::new(corners[tri_a[0]], normal_a));
            }
        } else {
            if !first_same && !normal_a.approx_eq(Vec3::ZERO, EPSILON) {
                strip1 = strip_from_indices(&tri_a, &corners);
                plane1 = strip1.as_ref().map(|_| Plane::new(corners[tri_a[0]], normal_a));
            }
            if !second_same && !normal_b.approx_eq(Vec3::ZERO, EPSILON) {
                strip2 = strip_from_indices(&tri_b, &corners);
                plane2 = strip2.as_ref().map(|_| Plane::new(corners[tri_b[0]], normal_b));
            }
        }

        if !plane1.is_some_and(|p| p.is_valid()) {
            strip1 = None;
        }
        if !plane2.is_some_and(|p| p.is_valid()) {
            strip2 = None;
        }

        let face = &mut raw[facing.index()];
        if let (Some(s2), Some(p1)) = (&strip2, &plane1) {
            if strip1.is_some() && s2.iter().any(|v| p1.side(*v, EPSILON) == Some(true)) {
                face.convex = false;
            }
        }

        for plane in &box_planes {
            strip1 = strip1.and_then(|s| plane.clip(&s, CUT_EPSILON));
            strip2 = strip2.and_then(|s| plane.clip(&s, CUT_EPSILON));
        }

        face.tilted1 = strip1.clone();
        face.tilted2 = strip2.clone();
        face.plane1 = plane1;
        face.plane2 = plane2;

        if let (Some(s), Some(p)) = (strip1, plane1) {
            raw[Facing::nearest(p.normal).index()].tilted_render.push(s);
        }
        if let (Some(s), Some(p)) = (strip2, plane2) {
            raw[Facing::nearest(p.normal).index()].tilted_render.push(s);
        }
    }

    let axis_strips = Facing::ALL.map(|facing| cut_side(facing, &raw, base));
    for (face, strips) in raw.iter_mut().zip(axis_strips) {
        face.axis_strips = strips;
    }
    raw
}

/// Cuts the undisplaced side rectangle of `facing` by every facing's planes.
fn cut_side(facing: Facing, raw: &[RawFace; 6], base: &[Vec3; 8]) -> Vec<Polygon> {
    let mut strips: Vec<Polygon> = strip_from(&face_corners(facing), base).into_iter().collect();
    let epsilon = if facing == Facing::Down {
        AXIS_CUT_EPSILON_DOWN
    } else {
        AXIS_CUT_EPSILON
    };

    for other in Facing::ALL {
        if strips.is_empty() {
            break;
        }
        let source = &raw[other.index()];
        let (cut1, cut2) = match (&source.tilted1, &source.tilted2) {
            (None, None) => (source.plane1, source.plane2),
            _ if !source.convex => (source.plane1, source.plane2),
            (Some(_), Some(_)) => (source.plane1, source.plane2),
            (Some(_), None) => (source.plane1, None),
            (None, Some(_)) => (source.plane2, None),
        };

        strips = if source.convex {
            let strips = cut_single(strips, facing, cut1, epsilon);
            cut_single(strips, facing, cut2, epsilon)
        } else {
            cut_dual(strips, facing, cut1, cut2, epsilon)
        };
    }
    strips
}

fn cut_single(strips: Vec<Polygon>, facing: Facing, plane: Option<Plane>, epsilon: f64) -> Vec<Polygon> {
    let Some(plane) = plane.filter(|p| p.is_valid() && !plane_is_facing(p, facing)) else {
        return strips;
    };
    strips.iter().filter_map(|s| plane.clip(s, epsilon)).collect()
}

/// Cut by two planes of a non-convex side: the union of both half-spaces.
fn cut_dual(
    strips: Vec<Polygon>,
    facing: Facing,
    plane1: Option<Plane>,
    plane2: Option<Plane>,
    epsilon: f64,
) -> Vec<Polygon> {
    let (p1, p2) = match (plane1.filter(Plane::is_valid), plane2.filter(Plane::is_valid)) {
        (None, None) => return strips,
        (None, p2) => return cut_single(strips, facing, p2, epsilon),
        (p1, None) => return cut_single(strips, facing, p1, epsilon),
        (Some(p1), Some(p2)) => (p1, p2),
    };

    let (one, two) = facing.plane_axes();
    let inverse = facing.is_positive();
    let mut out: Vec<Polygon> = Vec::new();
    for strip in &strips {
        match (p1.clip(strip, epsilon), p2.clip(strip, epsilon)) {
            (Some(c1), Some(c2)) => {
                if polygon2d::intersects(&c1, &c2, one, two, inverse, OVERLAP_EPSILON) {
                    let fans = polygon2d::cut(&c1, &c2, one, two, inverse, false);
                    out.push(c2);
                    out.extend(fans.into_iter().filter(|f| f.len() >= 3));
                } else {
                    out.push(c1);
                    out.push(c2);
                }
            }
            (Some(c), None) | (None, Some(c)) => out.push(c),
            (None, None) => {}
        }
    }
    dedupe(out, DEDUPE_EPSILON)
}

/// Outward bounding plane of the undisplaced box on `facing`.
fn box_plane(min: [i32; 3], max: [i32; 3], facing: Facing) -> Plane {
    let axis = facing.axis();
    let value = if facing.is_positive() { max[axis] } else { min[axis] };
    Plane::new(Vec3::ZERO.with_axis(axis, value as f64), facing.normal())
}

fn plane_is_facing(plane: &Plane, facing: Facing) -> bool {
    plane.normal.approx_eq(facing.normal(), FACING_TOLERANCE)
}

fn on_base_plane(corners: &[Vec3; 8], base: &[Vec3; 8], tri: &[usize; 3], axis: usize) -> bool {
    tri.iter().all(|&i| (corners[i][axis] - base[i][axis]).abs() <= EPSILON)
}

fn triangle_normal(corners: &[Vec3; 8], tri: &[usize; 3]) -> Vec3 {
    let a = corners[tri[0]];
    corners[tri[1]].sub_f32(a).cross_f32(corners[tri[2]].sub_f32(a))
}

fn strip_from(quad: &[Corner; 4], points: &[Vec3; 8]) -> Option<Polygon> {
    strip_from_indices(&quad.map(|c| c.index()), points)
}

/// Polygon through the given corners with coincident corners merged.
fn strip_from_indices(indices: &[usize], points: &[Vec3; 8]) -> Option<Polygon> {
    let mut out: Polygon = Vec::with_capacity(indices.len());
    for &i in indices {
        let p = points[i];
        if !out.iter().any(|e| e.approx_eq(p, EPSILON)) {
            out.push(p);
        }
    }
    simplify(&out)
}
