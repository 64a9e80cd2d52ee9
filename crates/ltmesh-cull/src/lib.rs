//! Face culling for tile structures.
//!
//! `build_visible_faces` walks every box side, classifies it against the
//! other tiles, cuts partially covered sides, and returns the polygons that
//! remain visible. `apply_geometry_mode` optionally cleans that list up.
#![forbid(unsafe_code)]

pub mod candidate;
pub mod coverage;
pub mod face_state;
pub mod occluder;
pub mod pipeline;
pub mod postprocess;
pub mod profile;
pub mod stats;

pub use candidate::{FaceCandidate, build_candidates};
pub use face_state::{FaceState, FaceStateKind, Reason, evaluate};
pub use pipeline::{
    CullOptions, FaceType, GeometryMode, RenderableCandidate, VisibleFace, build_visible_faces, prepare_transform_caches,
    renderable_candidates,
};
pub use postprocess::{GeometryStats, PassStats, apply_geometry_mode};
pub use profile::{FaceBehaviorProfile, OutsideNeighborPolicy, ProfileOverrides, RuntimeInfo};
pub use stats::{CandidateSummary, FaceSummary, summarize_candidates, summarize_faces};
