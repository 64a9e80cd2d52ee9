use ltmesh_tiles::{BoxKind, Facing};
use serde::Serialize;

use crate::pipeline::{FaceType, RenderableCandidate, VisibleFace};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceKindCounts {
    pub aabb: usize,
    pub transformable: usize,
}

impl SourceKindCounts {
    fn add(&mut self, kind: BoxKind) {
        match kind {
            BoxKind::Aabb => self.aabb += 1,
            BoxKind::Transformable => self.transformable += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FaceTypeCounts {
    pub axis: usize,
    pub tilted: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutsideCounts {
    pub inside: usize,
    pub outside: usize,
}

impl OutsideCounts {
    fn add(&mut self, outside: bool) {
        if outside {
            self.outside += 1;
        } else {
            self.inside += 1;
        }
    }
}

/// Per-facing counts indexed by `Facing::index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FacingCounts(pub [usize; 6]);

impl FacingCounts {
    #[inline]
    pub fn get(&self, facing: Facing) -> usize {
        self.0[facing.index()]
    }

    fn add(&mut self, facing: Facing) {
        self.0[facing.index()] += 1;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FaceSummary {
    pub total_faces: usize,
    pub by_facing: FacingCounts,
    pub by_source_kind: SourceKindCounts,
    pub by_face_type: FaceTypeCounts,
    pub by_outside: OutsideCounts,
}

pub fn summarize_faces(faces: &[VisibleFace]) -> FaceSummary {
    let mut s = FaceSummary {
        total_faces: faces.len(),
        ..FaceSummary::default()
    };
    for f in faces {
        s.by_facing.add(f.facing);
        s.by_source_kind.add(f.source_kind);
        match f.face_type {
            FaceType::Axis => s.by_face_type.axis += 1,
            FaceType::Tilted => s.by_face_type.tilted += 1,
        }
        s.by_outside.add(f.outside);
    }
    s
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub total_visible_candidates: usize,
    pub by_facing: FacingCounts,
    pub by_source_kind: SourceKindCounts,
    pub by_outside: OutsideCounts,
}

/// Counts renderable candidates before any cutting.
pub fn summarize_candidates<'a>(candidates: impl IntoIterator<Item = RenderableCandidate<'a>>) -> CandidateSummary {
    let mut s = CandidateSummary::default();
    for rc in candidates {
        s.total_visible_candidates += 1;
        s.by_facing.add(rc.candidate.facing);
        s.by_source_kind.add(rc.candidate.tile_box.kind);
        s.by_outside.add(rc.outside);
    }
    s
}
