use std::sync::OnceLock;

use ltmesh_geom::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

use crate::facing::Facing;
use crate::transform::CornerTransform;
use crate::transform_cache::TransformCache;

pub const DEFAULT_GRID: i32 = 16;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    #[default]
    Aabb,
    Transformable,
}

impl BoxKind {
    pub fn name(self) -> &'static str {
        match self {
            BoxKind::Aabb => "aabb",
            BoxKind::Transformable => "transformable",
        }
    }
}

// --- Input tree ---

/// One node of the input structure tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Subdivision count; inherited by children when absent or non-positive.
    pub grid: Option<i32>,
    pub structure_id: Option<String>,
    pub tiles: Vec<TileSpec>,
    pub children: Vec<Group>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSpec {
    pub block_state: String,
    /// ARGB colour, `-1` for none.
    pub color: i32,
    pub grid: Option<i32>,
    pub boxes: Vec<BoxSpec>,
}

impl Default for TileSpec {
    fn default() -> Self {
        Self {
            block_state: "minecraft:air".to_string(),
            color: -1,
            grid: None,
            boxes: Vec::new(),
        }
    }
}

impl TileSpec {
    pub fn new(block_state: impl Into<String>, boxes: Vec<BoxSpec>) -> Self {
        Self {
            block_state: block_state.into(),
            boxes,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSpec {
    pub kind: BoxKind,
    pub min: [i32; 3],
    pub max: [i32; 3],
    /// Indicator word followed by packed 16-bit corner offsets.
    pub transform_data: Vec<i32>,
    pub grid: Option<i32>,
}

impl BoxSpec {
    pub fn aabb(min: [i32; 3], max: [i32; 3]) -> Self {
        Self {
            kind: BoxKind::Aabb,
            min,
            max,
            ..Self::default()
        }
    }

    pub fn transformable(min: [i32; 3], max: [i32; 3], transform_data: Vec<i32>) -> Self {
        Self {
            kind: BoxKind::Transformable,
            min,
            max,
            transform_data,
            grid: None,
        }
    }

    pub fn with_grid(mut self, grid: i32) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Decodes the flat integer box encoding.
    ///
    /// Six values are a plain box; a negative seventh value marks a
    /// transformable box carrying everything from index 6 on; lengths 7 and 11
    /// are older plain encodings with trailing data.
    pub fn from_array(values: &[i32]) -> Result<Self, BoxError> {
        if values.len() < 6 {
            return Err(BoxError::TooShort(values.len()));
        }
        let min = [values[0], values[1], values[2]];
        let max = [values[3], values[4], values[5]];
        let spec = match values.len() {
            6 => Self::aabb(min, max),
            _ if values[6] < 0 => Self::transformable(min, max, values[6..].to_vec()),
            7 | 11 => Self::aabb(min, max),
            n => return Err(BoxError::UnsupportedLength(n)),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), BoxError> {
        for axis in 0..3 {
            if self.min[axis] >= self.max[axis] {
                return Err(BoxError::InvertedBounds {
                    axis,
                    min: self.min[axis],
                    max: self.max[axis],
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoxError {
    TooShort(usize),
    UnsupportedLength(usize),
    InvertedBounds { axis: usize, min: i32, max: i32 },
}

impl std::fmt::Display for BoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoxError::TooShort(n) => write!(f, "box array needs at least 6 values, got {}", n),
            BoxError::UnsupportedLength(n) => write!(f, "unsupported box array length {}", n),
            BoxError::InvertedBounds { axis, min, max } => {
                write!(f, "box min must be below max on axis {}: {} >= {}", axis, min, max)
            }
        }
    }
}

impl std::error::Error for BoxError {}

// --- Normalized tiles ---

#[derive(Clone, Debug)]
pub struct Tile {
    pub id: u32,
    pub block_state: String,
    pub block_id: String,
    pub color: i32,
    pub structure_id: Option<String>,
    pub grid: i32,
    pub provides_solid_face: bool,
    pub cull_over_edge: bool,
    pub structure_no_collision: bool,
    pub boxes: Vec<TileBox>,
}

impl Tile {
    /// Same block and colour: faces between the two merge when rendered.
    #[inline]
    pub fn can_render_combine(&self, other: &Tile) -> bool {
        self.block_id == other.block_id && self.color == other.color
    }

    /// Whether this tile takes part in occluding other faces against `rendered`.
    #[inline]
    pub fn occludes_for(&self, rendered: &Tile) -> bool {
        !self.structure_no_collision && (self.provides_solid_face || self.can_render_combine(rendered))
    }
}

#[derive(Clone, Debug)]
pub struct TileBox {
    /// Unique across every tile of a conversion.
    pub id: u32,
    pub kind: BoxKind,
    pub grid: i32,
    pub min: [i32; 3],
    pub max: [i32; 3],
    pub world: Aabb,
    transform: Option<CornerTransform>,
    cache: OnceLock<TransformCache>,
}

impl TileBox {
    pub fn new(id: u32, kind: BoxKind, grid: i32, min: [i32; 3], max: [i32; 3], transform_data: &[i32]) -> Self {
        let inv = 1.0 / grid as f64;
        let world = Aabb::new(
            Vec3::new(min[0] as f64 * inv, min[1] as f64 * inv, min[2] as f64 * inv),
            Vec3::new(max[0] as f64 * inv, max[1] as f64 * inv, max[2] as f64 * inv),
        );
        let transform = match kind {
            BoxKind::Transformable if !transform_data.is_empty() => Some(CornerTransform::decode(transform_data)),
            _ => None,
        };
        Self {
            id,
            kind,
            grid,
            min,
            max,
            world,
            transform,
            cache: OnceLock::new(),
        }
    }

    #[inline]
    pub fn is_transformable(&self) -> bool {
        self.kind == BoxKind::Transformable
    }

    pub fn transform(&self) -> Option<&CornerTransform> {
        self.transform.as_ref()
    }

    /// Per-facing fragments of a transformable box, built on first use.
    /// `None` for plain boxes.
    pub fn transform_cache(&self) -> Option<&TransformCache> {
        if !self.is_transformable() {
            return None;
        }
        Some(self.cache.get_or_init(|| match &self.transform {
            Some(t) => TransformCache::build(self.min, self.max, self.grid, t),
            None => TransformCache::empty(),
        }))
    }

    pub fn is_cache_ready(&self) -> bool {
        self.cache.get().is_some()
    }

    /// A face side is solid when it fully covers its rectangle.
    pub fn is_face_solid(&self, facing: Facing) -> bool {
        match self.transform_cache() {
            None => true,
            Some(cache) => cache.face(facing).completely_filled,
        }
    }
}
