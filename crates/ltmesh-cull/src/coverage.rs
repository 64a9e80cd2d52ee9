//! Grid-cell coverage of a face by neighbouring box sides.
//!
//! All box bounds are integers in their own grid, so the bitmap works in
//! exact integer cells of the evaluated box's grid.

use ltmesh_tiles::{Tile, TileBox};

use crate::candidate::FaceCandidate;
use crate::occluder::{matches_outside_neighbour, outside_neighbour_index};
use crate::profile::FaceBehaviorProfile;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub covered_fully: bool,
    pub partially: bool,
    pub needs_axis_cutting: bool,
}

/// Rescales a grid coordinate between subdivisions by their integer ratio.
///
/// Coarsening truncates toward zero; refining multiplies. Grids that do not
/// divide evenly use the truncated ratio.
pub fn convert_raw_coord(value: i64, from_grid: i64, to_grid: i64) -> i64 {
    if from_grid <= 0 || to_grid <= 0 {
        return value;
    }
    if from_grid > to_grid {
        value / (from_grid / to_grid)
    } else {
        value * (to_grid / from_grid)
    }
}

/// Occupancy bitmap over the face's cells.
struct CellGrid {
    cells_one: i64,
    cells_two: i64,
    filled: Vec<bool>,
    count: usize,
}

impl CellGrid {
    fn new(cells_one: i64, cells_two: i64) -> Self {
        CellGrid {
            cells_one,
            cells_two,
            filled: vec![false; (cells_one * cells_two) as usize],
            count: 0,
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.count == self.filled.len()
    }

    /// Marks the cell rectangle `one0..one1 x two0..two1`, clamped to the grid.
    fn fill(&mut self, one0: i64, one1: i64, two0: i64, two1: i64) {
        let (one0, one1) = (one0.clamp(0, self.cells_one), one1.clamp(0, self.cells_one));
        let (two0, two1) = (two0.clamp(0, self.cells_two), two1.clamp(0, self.cells_two));
        for one in one0..one1 {
            for two in two0..two1 {
                let cell = &mut self.filled[(one * self.cells_two + two) as usize];
                if !*cell {
                    *cell = true;
                    self.count += 1;
                }
            }
        }
    }
}

/// Integer footprint of a face on its plane, in the face box's grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Footprint {
    min_one: i64,
    max_one: i64,
    min_two: i64,
    max_two: i64,
}

/// Overlap of `other` with the face, in the face's grid, when `other` lies
/// directly against the face plane.
fn project_overlap(face: &FaceCandidate, extent: &Footprint, other: &TileBox) -> Option<Footprint> {
    let grid = face.tile_box.grid as i64;
    let conv = |v: i32| convert_raw_coord(v as i64, other.grid as i64, grid);
    let touching = if face.sign() > 0 {
        other.min[face.axis]
    } else {
        other.max[face.axis]
    };
    if conv(touching) != face.origin_raw as i64 {
        return None;
    }

    let ov = Footprint {
        min_one: extent.min_one.max(conv(other.min[face.one])),
        max_one: extent.max_one.min(conv(other.max[face.one])),
        min_two: extent.min_two.max(conv(other.min[face.two])),
        max_two: extent.max_two.min(conv(other.max[face.two])),
    };
    if ov.max_one <= ov.min_one || ov.max_two <= ov.min_two {
        return None;
    }
    Some(ov)
}

/// Rasterises how much of `face` is hidden by other boxes of tiles that
/// occlude for the face's tile. With `outside` set, only boxes in the cell
/// across the block boundary are considered.
pub fn compute(face: &FaceCandidate, all_tiles: &[Tile], profile: &FaceBehaviorProfile, outside: bool) -> Coverage {
    let b = face.tile_box;
    let extent = Footprint {
        min_one: b.min[face.one] as i64,
        max_one: b.max[face.one] as i64,
        min_two: b.min[face.two] as i64,
        max_two: b.max[face.two] as i64,
    };
    let cells_one = (extent.max_one - extent.min_one).max(0);
    let cells_two = (extent.max_two - extent.min_two).max(0);
    if cells_one == 0 || cells_two == 0 {
        return Coverage::default();
    }

    let mut cells = CellGrid::new(cells_one, cells_two);
    let mut partial_by_non_solid = false;
    let neighbour = if outside { outside_neighbour_index(face) } else { None };
    let opposite = face.facing.opposite();

    for tile in all_tiles.iter().filter(|t| t.occludes_for(face.tile)) {
        for other in &tile.boxes {
            if other.id == b.id {
                continue;
            }
            if outside && !matches_outside_neighbour(face, other, neighbour) {
                continue;
            }
            let Some(ov) = project_overlap(face, &extent, other) else {
                continue;
            };
            if !other.is_face_solid(opposite) {
                if !profile.supports_cutting {
                    partial_by_non_solid = true;
                }
                continue;
            }
            cells.fill(
                ov.min_one - extent.min_one,
                ov.max_one - extent.min_one,
                ov.min_two - extent.min_two,
                ov.max_two - extent.min_two,
            );
        }
    }

    let covered_fully = cells.is_full();
    let partially = !covered_fully && (cells.count > 0 || partial_by_non_solid);
    Coverage {
        covered_fully,
        partially,
        needs_axis_cutting: partially,
    }
}
