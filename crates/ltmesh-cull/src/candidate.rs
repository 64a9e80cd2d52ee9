use ltmesh_geom::{PlaneRect, Polygon};
use ltmesh_tiles::{Facing, Tile, TileBox};

/// One side of one box, with the polygons it would draw if nothing hid it.
#[derive(Clone, Debug)]
pub struct FaceCandidate<'a> {
    pub tile: &'a Tile,
    pub tile_box: &'a TileBox,
    pub facing: Facing,
    pub axis: usize,
    pub one: usize,
    pub two: usize,
    /// Plane coordinate in world units.
    pub origin: f64,
    /// Plane coordinate in the box's grid units.
    pub origin_raw: i32,
    pub min_one: f64,
    pub max_one: f64,
    pub min_two: f64,
    pub max_two: f64,
    pub axis_polys: Vec<Polygon>,
    pub tilted_polys: Vec<Polygon>,
}

impl<'a> FaceCandidate<'a> {
    fn new(tile: &'a Tile, tile_box: &'a TileBox, facing: Facing) -> Self {
        let axis = facing.axis();
        let (one, two) = facing.plane_axes();
        let w = &tile_box.world;
        let (origin, origin_raw) = if facing.is_positive() {
            (w.max[axis], tile_box.max[axis])
        } else {
            (w.min[axis], tile_box.min[axis])
        };
        FaceCandidate {
            tile,
            tile_box,
            facing,
            axis,
            one,
            two,
            origin,
            origin_raw,
            min_one: w.min[one],
            max_one: w.max[one],
            min_two: w.min[two],
            max_two: w.max[two],
            axis_polys: Vec::new(),
            tilted_polys: Vec::new(),
        }
    }

    #[inline]
    pub fn sign(&self) -> i32 {
        self.facing.sign()
    }

    /// Rectangle on this face's plane, wound like the face itself.
    pub fn rect(&self, min_one: f64, max_one: f64, min_two: f64, max_two: f64) -> Polygon {
        PlaneRect {
            axis: self.axis,
            positive: self.facing.is_positive(),
            c: self.origin,
            a0: min_one,
            a1: max_one,
            b0: min_two,
            b1: max_two,
        }
        .vertices()
    }

    /// The whole undisplaced side.
    pub fn full_rect(&self) -> Polygon {
        self.rect(self.min_one, self.max_one, self.min_two, self.max_two)
    }
}

/// Face candidates of one box in facing order.
///
/// Plain boxes always yield all six sides. Transformable boxes yield a side
/// when it has axis strips or tilted fragments; sides with tilted fragments
/// only are kept when `allow_tilted_only` is set (client geometry).
pub fn build_candidates<'a>(tile: &'a Tile, tile_box: &'a TileBox, allow_tilted_only: bool) -> Vec<FaceCandidate<'a>> {
    let Some(cache) = tile_box.transform_cache() else {
        return Facing::ALL
            .iter()
            .map(|&facing| {
                let mut c = FaceCandidate::new(tile, tile_box, facing);
                c.axis_polys.push(c.full_rect());
                c
            })
            .collect();
    };

    let mut out = Vec::with_capacity(6);
    for facing in Facing::ALL {
        let face = cache.face(facing);
        if !allow_tilted_only && !face.completely_filled && face.axis_strips.is_empty() {
            continue;
        }
        let mut c = FaceCandidate::new(tile, tile_box, facing);
        if face.completely_filled {
            c.axis_polys.push(c.full_rect());
        } else {
            c.axis_polys = face.axis_strips.clone();
        }
        c.tilted_polys = face.tilted_render.clone();
        if c.axis_polys.is_empty() && c.tilted_polys.is_empty() {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltmesh_tiles::{BehaviorOverrides, BoxSpec, Group, TileSpec, normalize};

    fn single(spec: BoxSpec) -> Vec<Tile> {
        let root = Group {
            tiles: vec![TileSpec::new("minecraft:stone", vec![spec])],
            ..Group::default()
        };
        normalize(&root, &BehaviorOverrides::new())
    }

    #[test]
    fn plain_box_yields_six_full_sides() {
        let tiles = single(BoxSpec::aabb([2, 0, 4], [6, 8, 12]));
        let cands = build_candidates(&tiles[0], &tiles[0].boxes[0], false);
        assert_eq!(cands.len(), 6);
        let up = &cands[Facing::Up.index()];
        assert_eq!(up.facing, Facing::Up);
        assert_eq!(up.origin_raw, 8);
        assert_eq!(up.origin, 0.5);
        assert_eq!((up.min_one, up.max_one), (0.125, 0.375));
        assert_eq!((up.min_two, up.max_two), (0.25, 0.75));
        assert_eq!(up.axis_polys.len(), 1);
        assert!(up.tilted_polys.is_empty());
        for v in &up.axis_polys[0] {
            assert_eq!(v.y, 0.5);
        }
    }

    #[test]
    fn transformable_without_payload_has_no_sides() {
        let tiles = single(BoxSpec::transformable([0, 0, 0], [4, 4, 4], vec![]));
        assert!(build_candidates(&tiles[0], &tiles[0].boxes[0], true).is_empty());
    }

    #[test]
    fn transformable_without_offsets_matches_plain_box() {
        let tiles = single(BoxSpec::transformable([0, 0, 0], [4, 4, 4], vec![i32::MIN]));
        let cands = build_candidates(&tiles[0], &tiles[0].boxes[0], false);
        assert_eq!(cands.len(), 6);
        assert!(cands.iter().all(|c| c.axis_polys.len() == 1 && c.tilted_polys.is_empty()));
    }
}
