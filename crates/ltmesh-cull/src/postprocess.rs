//! Optional clean-up passes over the visible face list.

use hashbrown::{HashMap, HashSet};
use ltmesh_geom::Vec3;
use ltmesh_tiles::Facing;
use serde::Serialize;

use crate::pipeline::{FaceType, GeometryMode, VisibleFace};

const QUANTIZE_SCALE: f64 = 1e6;
const NON_FINITE: i64 = i64::MIN;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub pass_id: &'static str,
    pub before: usize,
    pub after: usize,
    pub removed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeometryStats {
    pub mode: GeometryMode,
    pub optimize: bool,
    pub input_face_count: usize,
    pub output_face_count: usize,
    pub removed_face_count: usize,
    pub passes: Vec<PassStats>,
}

/// Runs the exact-duplicate and seam passes when optimising client geometry;
/// otherwise returns `faces` untouched.
pub fn apply_geometry_mode(faces: Vec<VisibleFace>, mode: GeometryMode, optimize: bool) -> (Vec<VisibleFace>, GeometryStats) {
    let input = faces.len();
    let mut working = faces;
    let mut passes = Vec::new();

    if optimize && mode == GeometryMode::Client {
        type Pass = fn(Vec<VisibleFace>) -> Vec<VisibleFace>;
        let steps: [(&'static str, Pass); 2] = [
            ("dedupe_exact_faces", dedupe_exact_faces),
            ("remove_transparent_coplanar_seams", remove_transparent_coplanar_seams),
        ];
        for (pass_id, pass) in steps {
            let before = working.len();
            working = pass(working);
            let after = working.len();
            log::debug!("geometry pass {} before={} after={}", pass_id, before, after);
            passes.push(PassStats {
                pass_id,
                before,
                after,
                removed: before - after,
            });
        }
    }

    let stats = GeometryStats {
        mode,
        optimize,
        input_face_count: input,
        output_face_count: working.len(),
        removed_face_count: input - working.len(),
        passes,
    };
    (working, stats)
}

/// Material identity of a face: block, colour and solidity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct RenderKey {
    block_id: String,
    color: i32,
    solid: bool,
}

impl RenderKey {
    fn of(face: &VisibleFace) -> Self {
        RenderKey {
            block_id: face.block_id.clone(),
            color: face.color,
            solid: face.provides_solid_face,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ExactKey {
    render: RenderKey,
    facing: Facing,
    face_type: FaceType,
    outside: bool,
    vertices: Vec<[i64; 3]>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SeamKey {
    render: RenderKey,
    outside: bool,
    vertices: Vec<[i64; 3]>,
}

/// Keeps the first of faces with identical material, facing, type, outside
/// flag and vertex set.
pub fn dedupe_exact_faces(faces: Vec<VisibleFace>) -> Vec<VisibleFace> {
    let mut seen: HashSet<ExactKey> = HashSet::with_capacity(faces.len());
    faces
        .into_iter()
        .filter(|f| {
            seen.insert(ExactKey {
                render: RenderKey::of(f),
                facing: f.facing,
                face_type: f.face_type,
                outside: f.outside,
                vertices: polygon_key(&f.vertices),
            })
        })
        .collect()
}

/// Drops back-to-back pairs of translucent axis faces sharing a footprint.
///
/// Faces are paired in list order within each opposite-facing pair; a face
/// left without a partner stays.
pub fn remove_transparent_coplanar_seams(faces: Vec<VisibleFace>) -> Vec<VisibleFace> {
    let mut buckets: HashMap<SeamKey, [Vec<usize>; 6]> = HashMap::new();
    for (i, f) in faces.iter().enumerate() {
        if f.provides_solid_face || f.face_type != FaceType::Axis {
            continue;
        }
        let key = SeamKey {
            render: RenderKey::of(f),
            outside: f.outside,
            vertices: polygon_key(&f.vertices),
        };
        buckets.entry(key).or_default()[f.facing.index()].push(i);
    }

    let mut removed: HashSet<usize> = HashSet::new();
    for bucket in buckets.values() {
        for (a, b) in [
            (Facing::Up, Facing::Down),
            (Facing::North, Facing::South),
            (Facing::West, Facing::East),
        ] {
            for (i, j) in bucket[a.index()].iter().zip(&bucket[b.index()]) {
                removed.insert(*i);
                removed.insert(*j);
            }
        }
    }
    if removed.is_empty() {
        return faces;
    }
    faces
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, f)| f)
        .collect()
}

/// Order-independent vertex set quantised to 1e-6.
fn polygon_key(vertices: &[Vec3]) -> Vec<[i64; 3]> {
    let mut key: Vec<[i64; 3]> = vertices
        .iter()
        .map(|v| [quantize(v.x), quantize(v.y), quantize(v.z)])
        .collect();
    key.sort_unstable();
    key
}

#[inline]
fn quantize(v: f64) -> i64 {
    if !v.is_finite() {
        return NON_FINITE;
    }
    // Halves round toward positive infinity.
    (v * QUANTIZE_SCALE + 0.5).floor() as i64
}
