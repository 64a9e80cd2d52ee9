use ltmesh::cull::{FaceType, GeometryMode};
use ltmesh::tiles::{BoxSpec, Facing, Group, TileSpec};
use ltmesh::{ConvertOptions, candidate_summary, convert};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn group(tiles: Vec<TileSpec>) -> Group {
    Group {
        tiles,
        ..Group::default()
    }
}

fn pack_shorts(high: i16, low: i16) -> i32 {
    (((high as u16 as u32) << 16) | low as u16 as u32) as i32
}

#[test]
fn full_block_converts_to_six_faces_with_stats() {
    init_logs();
    let root = group(vec![TileSpec::new(
        "minecraft:stone",
        vec![BoxSpec::aabb([0, 0, 0], [16, 16, 16])],
    )]);
    let out = convert(&root, &ConvertOptions::default());

    assert_eq!(out.faces.len(), 6);
    assert!(out.faces.iter().all(|f| f.outside && f.face_type == FaceType::Axis));
    assert_eq!(out.stats.box_count, 1);
    assert_eq!(out.stats.face_summary.total_faces, 6);
    assert_eq!(out.stats.face_summary.by_outside.outside, 6);
    for facing in Facing::ALL {
        assert_eq!(out.stats.face_summary.by_facing.get(facing), 1);
    }
    assert_eq!(out.stats.geometry.mode, GeometryMode::Client);
    assert!(!out.stats.geometry.optimize);
    assert!(out.stats.geometry.passes.is_empty());
    assert_eq!(out.stats.geometry.output_face_count, 6);
}

#[test]
fn optimize_removes_translucent_seams_end_to_end() {
    init_logs();
    let root = group(vec![
        TileSpec::new("minecraft:glass", vec![BoxSpec::aabb([0, 0, 0], [8, 8, 8])]),
        TileSpec::new("minecraft:glass", vec![BoxSpec::aabb([8, 0, 0], [16, 8, 8])]),
    ]);
    let mut opts = ConvertOptions {
        evaluate_internal_occlusion: false,
        ..ConvertOptions::default()
    };
    assert_eq!(convert(&root, &opts).faces.len(), 12);

    opts.optimize = true;
    let out = convert(&root, &opts);
    assert_eq!(out.faces.len(), 10);
    assert_eq!(out.stats.geometry.input_face_count, 12);
    assert_eq!(out.stats.geometry.removed_face_count, 2);
    assert_eq!(out.stats.geometry.passes.len(), 2);
    assert_eq!(out.stats.geometry.passes[1].pass_id, "remove_transparent_coplanar_seams");
    assert_eq!(out.stats.geometry.passes[1].removed, 2);

    opts.geometry_mode = GeometryMode::Server;
    let server = convert(&root, &opts);
    assert_eq!(server.faces.len(), 12);
    assert!(server.stats.geometry.passes.is_empty());
}

#[test]
fn toml_overrides_change_occlusion() {
    let root = group(vec![
        TileSpec::new("minecraft:stone", vec![BoxSpec::aabb([0, 0, 0], [8, 8, 8])]),
        TileSpec::new("minecraft:glass", vec![BoxSpec::aabb([8, 0, 0], [16, 8, 8])]),
    ]);
    assert_eq!(convert(&root, &ConvertOptions::default()).faces.len(), 11);

    let opts = ConvertOptions::from_toml_str(
        r#"
        [behavior_overrides.blocks."minecraft:glass"]
        provides_solid_face = true
        "#,
    )
    .expect("parse");
    let out = convert(&root, &opts);
    assert_eq!(out.faces.len(), 10);
    assert!(!out.faces.iter().any(|f| !f.outside && matches!(f.facing, Facing::East | Facing::West)));
}

#[test]
fn outside_policy_from_toml_hides_faces_between_blocks() {
    let root = group(vec![TileSpec::new(
        "minecraft:stone",
        vec![BoxSpec::aabb([0, 0, 0], [16, 16, 16]), BoxSpec::aabb([16, 0, 0], [32, 16, 16])],
    )]);
    assert_eq!(convert(&root, &ConvertOptions::default()).faces.len(), 12);

    let opts = ConvertOptions::from_toml_str(
        r#"
        [face_behavior_profile]
        outside_neighbor_policy = "tiles"
        occlude_outside_faces_with_tiles = true
        "#,
    )
    .expect("parse");
    assert_eq!(convert(&root, &opts).faces.len(), 10);
}

#[test]
fn ramp_top_only_exists_in_client_geometry() {
    let indicator = (1 << 13) | (1 << 16);
    let root = group(vec![TileSpec::new(
        "minecraft:stone",
        vec![BoxSpec::transformable(
            [0, 0, 0],
            [16, 15, 16],
            vec![indicator, pack_shorts(-15, -15)],
        )],
    )]);

    let client = ConvertOptions {
        warm_transform_caches: true,
        ..ConvertOptions::default()
    };
    let out = convert(&root, &client);
    assert_eq!(out.stats.face_summary.by_face_type.tilted, 1);
    assert_eq!(candidate_summary(&root, &client).by_facing.get(Facing::Up), 1);

    let server = ConvertOptions {
        geometry_mode: GeometryMode::Server,
        ..ConvertOptions::default()
    };
    let out = convert(&root, &server);
    assert_eq!(out.stats.face_summary.by_face_type.tilted, 0);
    assert_eq!(out.stats.face_summary.by_facing.get(Facing::Up), 0);
    assert_eq!(candidate_summary(&root, &server).total_visible_candidates, 4);
}

#[test]
fn boxes_decoded_from_arrays_convert() {
    let boxes = [[0, 0, 0, 16, 8, 16], [0, 8, 0, 16, 16, 16]]
        .iter()
        .map(|a| BoxSpec::from_array(a).expect("valid box"))
        .collect();
    let out = convert(&group(vec![TileSpec::new("minecraft:oak_planks", boxes)]), &ConvertOptions::default());
    // The two halves hide each other's inner sides.
    assert_eq!(out.faces.len(), 10);
    assert_eq!(out.stats.box_count, 2);
    assert!(out.faces.iter().all(|f| f.outside));
}
