use ltmesh_cull::postprocess::{dedupe_exact_faces, remove_transparent_coplanar_seams};
use ltmesh_cull::{FaceType, GeometryMode, VisibleFace, apply_geometry_mode};
use ltmesh_geom::Vec3;
use ltmesh_tiles::{BoxKind, Facing};

fn quad(y: f64) -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, y, 1.0),
        Vec3::new(1.0, y, 1.0),
        Vec3::new(1.0, y, 0.0),
        Vec3::new(0.0, y, 0.0),
    ]
}

fn face(block: &str, solid: bool, facing: Facing, vertices: Vec<Vec3>) -> VisibleFace {
    VisibleFace {
        block_state: block.to_string(),
        block_id: block.to_string(),
        color: -1,
        provides_solid_face: solid,
        source_kind: BoxKind::Aabb,
        facing,
        face_type: FaceType::Axis,
        outside: false,
        vertices,
    }
}

#[test]
fn exact_duplicates_collapse_regardless_of_vertex_order() {
    let a = face("minecraft:stone", true, Facing::Up, quad(0.5));
    let mut rotated = quad(0.5);
    rotated.rotate_left(2);
    let b = face("minecraft:stone", true, Facing::Up, rotated);
    let mut noisy = quad(0.5);
    noisy[0].x += 1e-9;
    let c = face("minecraft:stone", true, Facing::Up, noisy);
    let other_facing = face("minecraft:stone", true, Facing::Down, quad(0.5));
    let mut outside = a.clone();
    outside.outside = true;

    let out = dedupe_exact_faces(vec![a.clone(), b, c, other_facing.clone(), outside.clone()]);
    assert_eq!(out, vec![a, other_facing, outside]);
}

#[test]
fn translucent_back_to_back_faces_are_removed_in_pairs() {
    let glass_up = face("minecraft:glass", false, Facing::Up, quad(0.5));
    let glass_down = face("minecraft:glass", false, Facing::Down, quad(0.5));
    let stone_up = face("minecraft:stone", true, Facing::Up, quad(0.5));
    let stone_down = face("minecraft:stone", true, Facing::Down, quad(0.5));
    let mut tilted_up = glass_up.clone();
    tilted_up.face_type = FaceType::Tilted;

    let input = vec![
        glass_up.clone(),
        stone_up.clone(),
        glass_down.clone(),
        glass_up.clone(),
        stone_down.clone(),
        tilted_up.clone(),
    ];
    let out = remove_transparent_coplanar_seams(input);
    // The second glass UP has no partner left.
    assert_eq!(out, vec![stone_up, glass_up, stone_down, tilted_up]);
}

#[test]
fn different_footprints_do_not_pair() {
    let up = face("minecraft:glass", false, Facing::Up, quad(0.5));
    let down = face("minecraft:glass", false, Facing::Down, quad(0.25));
    let out = remove_transparent_coplanar_seams(vec![up.clone(), down.clone()]);
    assert_eq!(out, vec![up, down]);
}

#[test]
fn passes_run_only_for_optimized_client_geometry() {
    let faces = vec![
        face("minecraft:glass", false, Facing::Up, quad(0.5)),
        face("minecraft:glass", false, Facing::Up, quad(0.5)),
        face("minecraft:glass", false, Facing::Down, quad(0.5)),
    ];

    let (kept, stats) = apply_geometry_mode(faces.clone(), GeometryMode::Client, false);
    assert_eq!(kept.len(), 3);
    assert!(stats.passes.is_empty());
    assert_eq!(stats.removed_face_count, 0);

    let (kept, stats) = apply_geometry_mode(faces.clone(), GeometryMode::Server, true);
    assert_eq!(kept.len(), 3);
    assert!(stats.passes.is_empty());

    let (kept, stats) = apply_geometry_mode(faces, GeometryMode::Client, true);
    assert!(kept.is_empty());
    assert_eq!(stats.input_face_count, 3);
    assert_eq!(stats.output_face_count, 0);
    assert_eq!(stats.removed_face_count, 3);
    let removed: Vec<(&str, usize)> = stats.passes.iter().map(|p| (p.pass_id, p.removed)).collect();
    assert_eq!(
        removed,
        vec![("dedupe_exact_faces", 1), ("remove_transparent_coplanar_seams", 2)]
    );
}
