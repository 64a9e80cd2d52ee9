//! Tile data model: input structure tree, normalized tiles and boxes, block
//! behaviour, and the transformable-box face cache.
#![forbid(unsafe_code)]

pub mod behavior;
pub mod facing;
pub mod model;
pub mod normalize;
pub mod transform;
pub mod transform_cache;

pub use behavior::{BehaviorOverride, BehaviorOverrides, BlockBehavior, canonical_block_id};
pub use facing::Facing;
pub use model::{BoxError, BoxKind, BoxSpec, DEFAULT_GRID, Group, Tile, TileBox, TileSpec};
pub use normalize::normalize;
pub use transform::{Corner, CornerTransform};
pub use transform_cache::{FaceCache, TransformCache};
