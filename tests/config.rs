use std::fs;

use ltmesh::ConvertOptions;
use ltmesh::cull::{GeometryMode, OutsideNeighborPolicy};
use ltmesh::cull::profile::{CURRENT_PROFILE_ID, DEFAULT_PROFILE_ID};

#[test]
fn empty_document_gives_defaults() {
    let opts = ConvertOptions::from_toml_str("").expect("parse");
    assert!(opts.evaluate_internal_occlusion);
    assert_eq!(opts.geometry_mode, GeometryMode::Client);
    assert!(!opts.optimize);
    assert!(opts.behavior_overrides.is_empty());

    let profile = opts.profile();
    assert_eq!(profile.profile_id, DEFAULT_PROFILE_ID);
    assert_eq!(profile.outside_neighbor_policy, OutsideNeighborPolicy::Air);
    assert!(!profile.supports_cutting);
    assert!(!profile.occlude_outside_faces_with_tiles);
}

#[test]
fn geometry_mode_is_parsed_leniently() {
    let server = ConvertOptions::from_toml_str("geometry_mode = \"  SERVER \"").expect("parse");
    assert_eq!(server.geometry_mode, GeometryMode::Server);
    let unknown = ConvertOptions::from_toml_str("geometry_mode = \"mobile\"").expect("parse");
    assert_eq!(unknown.geometry_mode, GeometryMode::Client);
}

#[test]
fn runtime_selects_profile_and_layers_apply_in_order() {
    let doc = r#"
        runtime_profile = "   "

        [runtime]
        minecraft_version = "1.21.1"
        little_tiles_version = "1.6.0-pre205"

        [runtime_behavior_overrides]
        supports_cutting = true
        outside_neighbor_policy = "tiles"

        [face_behavior_profile]
        supports_cutting = false
        occlude_outside_faces_with_tiles = true
    "#;
    let opts = ConvertOptions::from_toml_str(doc).expect("parse");
    let profile = opts.profile();
    assert_eq!(profile.profile_id, CURRENT_PROFILE_ID);
    assert!(!profile.supports_cutting);
    assert_eq!(profile.outside_neighbor_policy, OutsideNeighborPolicy::Tiles);
    assert!(profile.occludes_outside_faces());

    let cull = opts.cull_options();
    assert_eq!(cull.profile, profile);
    assert!(cull.evaluate_internal_occlusion);
}

#[test]
fn explicit_profile_id_wins_over_runtime() {
    let doc = r#"
        runtime_profile = "default"

        [runtime]
        minecraft_version = "1.21.1"
        little_tiles_version = "1.6.3"
    "#;
    let opts = ConvertOptions::from_toml_str(doc).expect("parse");
    assert_eq!(opts.profile().profile_id, DEFAULT_PROFILE_ID);
}

#[test]
fn block_overrides_are_read_by_canonical_id() {
    let doc = r#"
        [behavior_overrides.blocks."minecraft:tinted_glass"]
        provides_solid_face = true
    "#;
    let opts = ConvertOptions::from_toml_str(doc).expect("parse");
    let entry = opts.behavior_overrides.get("minecraft:tinted_glass").expect("override");
    assert_eq!(entry.provides_solid_face, Some(true));
    assert_eq!(entry.cull_over_edge, None);
}

#[test]
fn malformed_documents_are_errors() {
    assert!(ConvertOptions::from_toml_str("optimize = \"yes\"").is_err());
    assert!(ConvertOptions::from_toml_str("[runtime").is_err());
    assert!(ConvertOptions::from_path("/nonexistent/ltmesh/options.toml").is_err());
}

#[test]
fn loads_from_path() {
    let path = std::env::temp_dir().join(format!("ltmesh-options-{}.toml", std::process::id()));
    fs::write(&path, "optimize = true\nevaluate_internal_occlusion = false\n").expect("write");
    let opts = ConvertOptions::from_path(&path);
    let _ = fs::remove_file(&path);
    let opts = opts.expect("load");
    assert!(opts.optimize);
    assert!(!opts.evaluate_internal_occlusion);
}
