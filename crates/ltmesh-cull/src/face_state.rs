use ltmesh_geom::polygon::has_renderable;
use ltmesh_tiles::Tile;
use serde::Serialize;

use crate::candidate::FaceCandidate;
use crate::coverage;
use crate::occluder::is_outside_face;
use crate::pipeline::GeometryMode;
use crate::profile::FaceBehaviorProfile;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceStateKind {
    Unloaded,
    InsideUncovered,
    InsidePartiallyCovered,
    InsideCovered,
    OutsideUncovered,
    OutsidePartiallyCovered,
    OutsideCovered,
}

impl FaceStateKind {
    pub fn name(self) -> &'static str {
        match self {
            FaceStateKind::Unloaded => "UNLOADED",
            FaceStateKind::InsideUncovered => "INSIDE_UNCOVERED",
            FaceStateKind::InsidePartiallyCovered => "INSIDE_PARTIALLY_COVERED",
            FaceStateKind::InsideCovered => "INSIDE_COVERED",
            FaceStateKind::OutsideUncovered => "OUTSIDE_UNCOVERED",
            FaceStateKind::OutsidePartiallyCovered => "OUTSIDE_PARTIALLY_COVERED",
            FaceStateKind::OutsideCovered => "OUTSIDE_COVERED",
        }
    }
}

/// Why a face ended up in its state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    FaceUnloaded,
    InsideUncovered,
    InsidePartiallyCovered,
    InsideCovered,
    OutsideCullOverEdgeDisabled,
    OutsideAssumeAirNeighbour,
    OutsideUncovered,
    OutsidePartiallyCovered,
    OutsideCovered,
}

impl Reason {
    pub fn name(self) -> &'static str {
        match self {
            Reason::FaceUnloaded => "face_unloaded",
            Reason::InsideUncovered => "inside_uncovered",
            Reason::InsidePartiallyCovered => "inside_partially_covered",
            Reason::InsideCovered => "inside_covered",
            Reason::OutsideCullOverEdgeDisabled => "outside_cull_over_edge_disabled",
            Reason::OutsideAssumeAirNeighbour => "outside_assume_air_neighbour",
            Reason::OutsideUncovered => "outside_uncovered",
            Reason::OutsidePartiallyCovered => "outside_partially_covered",
            Reason::OutsideCovered => "outside_covered",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FaceState {
    pub outside: bool,
    pub kind: FaceStateKind,
    pub covered_fully: bool,
    pub partially: bool,
    pub renderable: bool,
    pub reason: Reason,
    pub needs_axis_cutting: bool,
}

impl FaceState {
    fn unloaded(outside: bool) -> Self {
        FaceState {
            outside,
            kind: FaceStateKind::Unloaded,
            covered_fully: false,
            partially: false,
            renderable: false,
            reason: Reason::FaceUnloaded,
            needs_axis_cutting: false,
        }
    }

    fn uncovered(outside: bool, reason: Reason) -> Self {
        FaceState {
            outside,
            kind: if outside {
                FaceStateKind::OutsideUncovered
            } else {
                FaceStateKind::InsideUncovered
            },
            covered_fully: false,
            partially: false,
            renderable: true,
            reason,
            needs_axis_cutting: false,
        }
    }

    fn covered(outside: bool) -> Self {
        let (kind, reason) = if outside {
            (FaceStateKind::OutsideCovered, Reason::OutsideCovered)
        } else {
            (FaceStateKind::InsideCovered, Reason::InsideCovered)
        };
        FaceState {
            outside,
            kind,
            covered_fully: true,
            partially: false,
            renderable: false,
            reason,
            needs_axis_cutting: false,
        }
    }

    fn partially_covered(outside: bool, needs_axis_cutting: bool) -> Self {
        let (kind, reason) = if outside {
            (FaceStateKind::OutsidePartiallyCovered, Reason::OutsidePartiallyCovered)
        } else {
            (FaceStateKind::InsidePartiallyCovered, Reason::InsidePartiallyCovered)
        };
        FaceState {
            outside,
            kind,
            covered_fully: false,
            partially: true,
            renderable: true,
            reason,
            needs_axis_cutting,
        }
    }

    fn from_coverage(outside: bool, c: coverage::Coverage) -> Self {
        if c.covered_fully {
            FaceState::covered(outside)
        } else if c.partially {
            FaceState::partially_covered(outside, c.needs_axis_cutting)
        } else if outside {
            FaceState::uncovered(true, Reason::OutsideUncovered)
        } else {
            FaceState::uncovered(false, Reason::InsideUncovered)
        }
    }
}

/// Classifies a candidate against every tile of the conversion.
pub fn evaluate(face: &FaceCandidate, all_tiles: &[Tile], profile: &FaceBehaviorProfile, mode: GeometryMode) -> FaceState {
    let outside = is_outside_face(face);
    let has_axis = has_renderable(&face.axis_polys);
    let has_tilted = has_renderable(&face.tilted_polys);

    if !has_axis && !has_tilted {
        return FaceState::unloaded(outside);
    }
    if mode == GeometryMode::Client && !has_axis {
        return tilted_only(outside, face.tile);
    }
    if !outside {
        return FaceState::from_coverage(false, coverage::compute(face, all_tiles, profile, false));
    }

    if !face.tile.cull_over_edge {
        return FaceState::uncovered(true, Reason::OutsideCullOverEdgeDisabled);
    }
    if !profile.occludes_outside_faces() {
        return FaceState::uncovered(true, Reason::OutsideAssumeAirNeighbour);
    }
    FaceState::from_coverage(true, coverage::compute(face, all_tiles, profile, true))
}

/// Tilted-only faces of client geometry are never culled.
fn tilted_only(outside: bool, tile: &Tile) -> FaceState {
    if !outside {
        FaceState::uncovered(false, Reason::InsideUncovered)
    } else if !tile.cull_over_edge {
        FaceState::uncovered(true, Reason::OutsideCullOverEdgeDisabled)
    } else {
        FaceState::uncovered(true, Reason::OutsideAssumeAirNeighbour)
    }
}
