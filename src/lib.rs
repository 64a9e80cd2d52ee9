//! Converts a tile structure into the list of faces that are actually
//! visible, with summary statistics for the mesh stage.
#![forbid(unsafe_code)]

pub mod config;

use std::time::Instant;

use ltmesh_cull::{
    CandidateSummary, FaceSummary, GeometryStats, VisibleFace, apply_geometry_mode, build_visible_faces,
    prepare_transform_caches, renderable_candidates, summarize_candidates, summarize_faces,
};
use ltmesh_tiles::{Group, Tile, normalize};
use serde::Serialize;

pub use config::ConvertOptions;
pub use ltmesh_cull as cull;
pub use ltmesh_geom as geom;
pub use ltmesh_tiles as tiles;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionStats {
    pub box_count: usize,
    pub face_summary: FaceSummary,
    pub geometry: GeometryStats,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Conversion {
    pub faces: Vec<VisibleFace>,
    pub stats: ConversionStats,
}

/// Normalizes `root` with the configured behaviour overrides and converts it.
pub fn convert(root: &Group, options: &ConvertOptions) -> Conversion {
    let t0 = Instant::now();
    let tiles = normalize(root, &options.behavior_overrides);
    log::info!(
        target: "perf",
        "ms={} normalize tiles={}",
        t0.elapsed().as_millis(),
        tiles.len()
    );
    convert_tiles(&tiles, options)
}

/// Converts an already normalized tile list.
pub fn convert_tiles(tiles: &[Tile], options: &ConvertOptions) -> Conversion {
    let t0 = Instant::now();
    let cull = options.cull_options();
    log::debug!(
        "convert profile={} mode={} optimize={}",
        cull.profile.profile_id,
        cull.geometry_mode.name(),
        options.optimize
    );
    if options.warm_transform_caches {
        prepare_transform_caches(tiles);
    }

    let visible = build_visible_faces(tiles, &cull);
    let (faces, geometry) = apply_geometry_mode(visible, cull.geometry_mode, options.optimize);
    let face_summary = summarize_faces(&faces);
    let box_count = tiles.iter().map(|t| t.boxes.len()).sum();

    log::info!(
        target: "perf",
        "ms={} convert boxes={} faces={} removed={}",
        t0.elapsed().as_millis(),
        box_count,
        faces.len(),
        geometry.removed_face_count
    );
    Conversion {
        faces,
        stats: ConversionStats {
            box_count,
            face_summary,
            geometry,
        },
    }
}

/// Counts the candidates that survive classification, before any cutting.
pub fn candidate_summary(root: &Group, options: &ConvertOptions) -> CandidateSummary {
    let tiles = normalize(root, &options.behavior_overrides);
    let cull = options.cull_options();
    summarize_candidates(renderable_candidates(&tiles, &cull))
}
