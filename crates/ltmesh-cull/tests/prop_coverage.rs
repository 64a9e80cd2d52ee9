use ltmesh_cull::{CullOptions, FaceStateKind, build_candidates, build_visible_faces, evaluate};
use ltmesh_tiles::{BehaviorOverrides, BoxSpec, Facing, Group, Tile, TileSpec, normalize};
use proptest::prelude::*;

fn stone_tiles(boxes: Vec<BoxSpec>) -> Vec<Tile> {
    let root = Group {
        tiles: vec![TileSpec::new("minecraft:stone", boxes)],
        ..Group::default()
    };
    normalize(&root, &BehaviorOverrides::new())
}

fn rank(kind: FaceStateKind) -> u8 {
    match kind {
        FaceStateKind::InsideUncovered | FaceStateKind::OutsideUncovered => 0,
        FaceStateKind::InsidePartiallyCovered | FaceStateKind::OutsidePartiallyCovered => 1,
        FaceStateKind::InsideCovered | FaceStateKind::OutsideCovered => 2,
        FaceStateKind::Unloaded => 3,
    }
}

/// Boxes standing on the top of a half slab, inside the same block.
fn arb_toppers() -> impl Strategy<Value = Vec<BoxSpec>> {
    prop::collection::vec(
        (0i32..15, 0i32..15, 1i32..9, 1i32..9, 1i32..8),
        0..6,
    )
    .prop_map(|v| {
        v.into_iter()
            .map(|(x, z, w, d, h)| BoxSpec::aabb([x, 8, z], [(x + w).min(16), 8 + h, (z + d).min(16)]))
            .collect()
    })
}

fn slab_top_state(toppers: &[BoxSpec]) -> FaceStateKind {
    let mut boxes = vec![BoxSpec::aabb([0, 0, 0], [16, 8, 16])];
    boxes.extend_from_slice(toppers);
    let tiles = stone_tiles(boxes);
    let opts = CullOptions::default();
    let slab = &tiles[0].boxes[0];
    let up = build_candidates(&tiles[0], slab, true)
        .into_iter()
        .find(|c| c.facing == Facing::Up)
        .map(|c| evaluate(&c, &tiles, &opts.profile, opts.geometry_mode));
    up.map_or(FaceStateKind::Unloaded, |s| s.kind)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn more_solid_neighbours_never_uncover(toppers in arb_toppers(), extra in arb_toppers()) {
        let before = slab_top_state(&toppers);
        let mut all = toppers.clone();
        all.extend(extra);
        let after = slab_top_state(&all);
        prop_assert!(rank(after) >= rank(before), "{before:?} -> {after:?}");

        all.push(BoxSpec::aabb([0, 8, 0], [16, 9, 16]));
        prop_assert_eq!(slab_top_state(&all), FaceStateKind::InsideCovered);
    }

    #[test]
    fn only_boundary_sides_are_outside(
        min in prop::array::uniform3(0i32..15),
        size in prop::array::uniform3(1i32..16),
    ) {
        let max = [0, 1, 2].map(|i| (min[i] + size[i]).min(16));
        let tiles = stone_tiles(vec![BoxSpec::aabb(min, max)]);
        let faces = build_visible_faces(&tiles, &CullOptions::default());
        prop_assert_eq!(faces.len(), 6);
        for f in &faces {
            let axis = f.facing.axis();
            let expected = if f.facing.is_positive() { max[axis] == 16 } else { min[axis] == 0 };
            prop_assert_eq!(f.outside, expected, "{:?}", f.facing);
        }
    }
}
