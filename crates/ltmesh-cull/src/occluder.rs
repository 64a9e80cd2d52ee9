//! Cutting partially covered faces against the boxes that cover them.

use ltmesh_geom::polygon::{dedupe, is_degenerate, polygons_equal, simplify};
use ltmesh_geom::{BOUNDARY_EPSILON, Polygon, polygon2d};
use ltmesh_tiles::{Tile, TileBox};

use crate::candidate::FaceCandidate;

const OVERLAP_EPSILON: f64 = 0.001;
const DEDUPE_EPSILON: f64 = 1e-4;

/// A face on or beyond its block's boundary in the box's own grid.
pub fn is_outside_face(face: &FaceCandidate) -> bool {
    let grid = face.tile_box.grid;
    if grid <= 0 {
        return false;
    }
    !(face.origin_raw > 0 && face.origin_raw < grid)
}

/// Block index, along the face axis, of the cell the face looks into.
pub fn outside_neighbour_index(face: &FaceCandidate) -> Option<i32> {
    let grid = face.tile_box.grid;
    if grid <= 0 {
        return None;
    }
    let owner = if face.sign() > 0 {
        (face.origin_raw - 1).div_euclid(grid)
    } else {
        face.origin_raw.div_euclid(grid)
    };
    Some(owner + face.sign())
}

/// Whether `other` starts in the neighbouring block cell `neighbour`.
pub fn matches_outside_neighbour(face: &FaceCandidate, other: &TileBox, neighbour: Option<i32>) -> bool {
    let Some(neighbour) = neighbour else {
        return false;
    };
    let grid = face.tile_box.grid;
    if grid <= 0 {
        return false;
    }
    let index = if face.sign() > 0 {
        other.min[face.axis].div_euclid(grid)
    } else {
        (other.max[face.axis] - 1).div_euclid(grid)
    };
    index == neighbour
}

/// Hook for a vanilla block next to the structure. A static conversion has no
/// surrounding world, so nothing ever blocks.
#[inline]
pub fn has_static_external_neighbour(_face: &FaceCandidate) -> bool {
    false
}

/// Subtracts every occluding neighbour box from `start`.
pub fn apply_occluders(face: &FaceCandidate, start: Vec<Polygon>, all_tiles: &[Tile]) -> Vec<Polygon> {
    let mut visible = start;
    let outside = is_outside_face(face);
    let neighbour = if outside { outside_neighbour_index(face) } else { None };

    for tile in all_tiles.iter().filter(|t| t.occludes_for(face.tile)) {
        for other in &tile.boxes {
            if other.id == face.tile_box.id {
                continue;
            }
            if outside && !matches_outside_neighbour(face, other, neighbour) {
                continue;
            }
            if visible.is_empty() {
                return visible;
            }
            visible = apply_fill_from_box(face, visible, other);
        }
    }
    visible
}

/// Cuts away the part of `visible` that `other`'s opposing side covers.
pub fn apply_fill_from_box(face: &FaceCandidate, visible: Vec<Polygon>, other: &TileBox) -> Vec<Polygon> {
    if !box_touches_face(other, face) {
        return visible;
    }
    let inverse = !face.facing.is_positive();
    let opposite = face.facing.opposite();
    let w = &other.world;

    if other.is_face_solid(opposite) {
        let min_one = face.min_one.max(w.min[face.one]);
        let max_one = face.max_one.min(w.max[face.one]);
        let min_two = face.min_two.max(w.min[face.two]);
        let max_two = face.max_two.min(w.max[face.two]);
        if max_one - min_one <= BOUNDARY_EPSILON || max_two - min_two <= BOUNDARY_EPSILON {
            return visible;
        }
        let cutter = face.rect(min_one, max_one, min_two, max_two);
        return cut_polygons_2d(visible, &[cutter], face.one, face.two, inverse);
    }

    let cutters = opposing_strip_cutters(face, other);
    if cutters.is_empty() {
        return visible;
    }
    cut_polygons_2d(visible, &cutters, face.one, face.two, inverse)
}

/// Axis strips of a transformable box's opposing side, flattened onto the
/// face plane.
fn opposing_strip_cutters(face: &FaceCandidate, other: &TileBox) -> Vec<Polygon> {
    let Some(cache) = other.transform_cache() else {
        return Vec::new();
    };
    cache
        .face(face.facing.opposite())
        .axis_strips
        .iter()
        .filter(|s| s.len() >= 3)
        .map(|s| s.iter().map(|v| v.with_axis(face.axis, face.origin)).collect())
        .collect()
}

/// Subtracts each cutter from every polygon in turn.
pub fn cut_polygons_2d(polys: Vec<Polygon>, cutters: &[Polygon], one: usize, two: usize, inverse: bool) -> Vec<Polygon> {
    let mut result = polys;
    for cutter in cutters {
        let mut next: Vec<Polygon> = Vec::with_capacity(result.len());
        for poly in result.into_iter().filter(|p| p.len() >= 3) {
            let pieces = polygon2d::cut(&poly, cutter, one, two, inverse, false);
            if pieces.is_empty() {
                if !polygon2d::intersects(&poly, cutter, one, two, inverse, OVERLAP_EPSILON) {
                    next.push(poly);
                }
                continue;
            }
            let unchanged = pieces.len() == 1 && polygons_equal(&pieces[0], &poly, DEDUPE_EPSILON);
            if unchanged && !polygon2d::intersects(&poly, cutter, one, two, inverse, OVERLAP_EPSILON) {
                next.push(poly);
                continue;
            }
            next.extend(
                pieces
                    .iter()
                    .filter_map(|p| simplify(p))
                    .filter(|p| !is_degenerate(p)),
            );
        }
        result = dedupe(next, DEDUPE_EPSILON);
        if result.is_empty() {
            break;
        }
    }
    result
}

fn box_touches_face(other: &TileBox, face: &FaceCandidate) -> bool {
    let w = &other.world;
    let plane = if face.sign() > 0 {
        w.min[face.axis]
    } else {
        w.max[face.axis]
    };
    if (plane - face.origin).abs() > BOUNDARY_EPSILON {
        return false;
    }
    face.max_one > w.min[face.one] + BOUNDARY_EPSILON
        && face.min_one < w.max[face.one] - BOUNDARY_EPSILON
        && face.max_two > w.min[face.two] + BOUNDARY_EPSILON
        && face.min_two < w.max[face.two] - BOUNDARY_EPSILON
}
