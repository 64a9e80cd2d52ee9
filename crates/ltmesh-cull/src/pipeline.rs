use std::time::Instant;

use ltmesh_geom::Polygon;
use ltmesh_geom::polygon::{has_renderable, is_degenerate};
use ltmesh_tiles::{BoxKind, Facing, Tile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::candidate::{FaceCandidate, build_candidates};
use crate::face_state::{FaceState, evaluate};
use crate::occluder::{apply_occluders, has_static_external_neighbour, is_outside_face};
use crate::profile::FaceBehaviorProfile;

/// Which faces of transformable boxes are emitted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryMode {
    /// Also emits sides that consist of tilted fragments only.
    #[default]
    Client,
    Server,
}

impl GeometryMode {
    /// Lenient parse: trims and lowercases, unknown values become `Client`.
    pub fn parse(s: &str) -> GeometryMode {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => GeometryMode::Server,
            _ => GeometryMode::Client,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GeometryMode::Client => "client",
            GeometryMode::Server => "server",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CullOptions {
    /// When off, every non-degenerate polygon of every candidate is visible.
    pub evaluate_internal_occlusion: bool,
    pub geometry_mode: GeometryMode,
    pub profile: FaceBehaviorProfile,
}

impl Default for CullOptions {
    fn default() -> Self {
        Self {
            evaluate_internal_occlusion: true,
            geometry_mode: GeometryMode::Client,
            profile: FaceBehaviorProfile::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceType {
    Axis,
    Tilted,
}

/// One emitted polygon together with the tile data the mesh stage needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisibleFace {
    pub block_state: String,
    pub block_id: String,
    pub color: i32,
    pub provides_solid_face: bool,
    pub source_kind: BoxKind,
    pub facing: Facing,
    pub face_type: FaceType,
    pub outside: bool,
    pub vertices: Polygon,
}

/// A candidate that survived face-state evaluation.
#[derive(Clone, Debug)]
pub struct RenderableCandidate<'a> {
    pub candidate: FaceCandidate<'a>,
    /// `None` when internal occlusion is not evaluated.
    pub state: Option<FaceState>,
    pub outside: bool,
}

/// Every renderable candidate in tile, box, facing order.
pub fn renderable_candidates<'a>(tiles: &'a [Tile], opts: &'a CullOptions) -> impl Iterator<Item = RenderableCandidate<'a>> + 'a {
    let allow_tilted_only = opts.geometry_mode == GeometryMode::Client;
    tiles
        .iter()
        .flat_map(move |tile| {
            tile.boxes
                .iter()
                .flat_map(move |b| build_candidates(tile, b, allow_tilted_only))
        })
        .filter_map(move |candidate| {
            if opts.evaluate_internal_occlusion {
                let state = evaluate(&candidate, tiles, &opts.profile, opts.geometry_mode);
                if !state.renderable {
                    return None;
                }
                let outside = state.outside;
                return Some(RenderableCandidate {
                    candidate,
                    state: Some(state),
                    outside,
                });
            }
            if !(has_renderable(&candidate.axis_polys) || has_renderable(&candidate.tilted_polys)) {
                return None;
            }
            let outside = is_outside_face(&candidate);
            Some(RenderableCandidate {
                candidate,
                state: None,
                outside,
            })
        })
}

/// Culls the faces of `tiles` down to the visible polygons.
pub fn build_visible_faces(tiles: &[Tile], opts: &CullOptions) -> Vec<VisibleFace> {
    let t0 = Instant::now();
    let mut out = Vec::new();
    let mut cut_faces = 0usize;

    for rc in renderable_candidates(tiles, opts) {
        let RenderableCandidate {
            candidate,
            state,
            outside,
        } = rc;
        let needs_cutting = opts.evaluate_internal_occlusion
            && !candidate.axis_polys.is_empty()
            && state.is_some_and(|s| s.needs_axis_cutting);

        let axis_polys = if !needs_cutting {
            candidate.axis_polys.clone()
        } else if !outside {
            cut_faces += 1;
            apply_occluders(&candidate, candidate.axis_polys.clone(), tiles)
        } else if opts.profile.occludes_outside_faces() {
            cut_faces += 1;
            if has_static_external_neighbour(&candidate) {
                Vec::new()
            } else {
                apply_occluders(&candidate, candidate.axis_polys.clone(), tiles)
            }
        } else {
            candidate.axis_polys.clone()
        };

        let emit = |out: &mut Vec<VisibleFace>, polys: Vec<Polygon>, face_type: FaceType| {
            for vertices in polys {
                if vertices.len() < 3 || is_degenerate(&vertices) {
                    continue;
                }
                out.push(VisibleFace {
                    block_state: candidate.tile.block_state.clone(),
                    block_id: candidate.tile.block_id.clone(),
                    color: candidate.tile.color,
                    provides_solid_face: candidate.tile.provides_solid_face,
                    source_kind: candidate.tile_box.kind,
                    facing: candidate.facing,
                    face_type,
                    outside,
                    vertices,
                });
            }
        };
        emit(&mut out, axis_polys, FaceType::Axis);
        emit(&mut out, candidate.tilted_polys.clone(), FaceType::Tilted);
    }

    log::info!(
        target: "perf",
        "ms={} cull_visible_faces tiles={} faces={} cut={} mode={} occlusion={}",
        t0.elapsed().as_millis(),
        tiles.len(),
        out.len(),
        cut_faces,
        opts.geometry_mode.name(),
        opts.evaluate_internal_occlusion
    );
    out
}

/// Builds every transformable box's face cache on the rayon pool. Returns
/// the number of caches that were filled by this call.
pub fn prepare_transform_caches(tiles: &[Tile]) -> usize {
    let t0 = Instant::now();
    let built: usize = tiles
        .par_iter()
        .flat_map_iter(|t| t.boxes.iter())
        .filter(|b| b.is_transformable() && !b.is_cache_ready())
        .map(|b| usize::from(b.transform_cache().is_some()))
        .sum();
    log::info!(target: "perf", "ms={} cull_prepare_caches built={}", t0.elapsed().as_millis(), built);
    built
}
