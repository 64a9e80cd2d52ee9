use std::error::Error;
use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

// Path tokens of blocks the game renders as translucent.
const TRANSLUCENT_PATH_TOKENS: [&str; 8] = ["air", "leaves", "glass", "pane", "ice", "water", "lava", "barrier"];
const NO_EDGE_CULL_PATH_TOKENS: [&str; 1] = ["leaves"];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockBehavior {
    pub provides_solid_face: bool,
    pub cull_over_edge: bool,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BehaviorOverride {
    pub provides_solid_face: Option<bool>,
    pub cull_over_edge: Option<bool>,
}

/// Per-block behaviour corrections keyed by canonical block id.
///
/// ```toml
/// [blocks."minecraft:tinted_glass"]
/// provides_solid_face = true
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BehaviorOverrides {
    #[serde(default)]
    pub blocks: HashMap<String, BehaviorOverride>,
}

impl BehaviorOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block_id: impl Into<String>, entry: BehaviorOverride) {
        self.blocks.insert(block_id.into(), entry);
    }

    pub fn get(&self, block_id: &str) -> Option<&BehaviorOverride> {
        self.blocks.get(block_id)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let overrides: BehaviorOverrides = toml::from_str(toml_str)?;
        Ok(overrides)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

/// Block id without properties or a legacy numeric meta suffix.
///
/// `minecraft:oak_stairs[facing=east]` becomes `minecraft:oak_stairs` and
/// `minecraft:wool:14` becomes `minecraft:wool`.
pub fn canonical_block_id(block_state: &str) -> String {
    let name = match block_state.find('[') {
        Some(i) => &block_state[..i],
        None => block_state,
    };
    let id = name.trim();
    let parts: Vec<&str> = id.split(':').collect();
    if let [ns, path, meta] = parts.as_slice() {
        let digits = meta.strip_prefix('-').unwrap_or(meta);
        if !ns.is_empty() && !path.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return format!("{}:{}", ns, path);
        }
    }
    id.to_string()
}

/// Derives face behaviour from the block name and colour alpha, then applies
/// any override for the block.
pub fn infer_behavior(block_id: &str, color: i32, overrides: &BehaviorOverrides) -> BlockBehavior {
    let tokens = path_tokens(block_id);
    let has = |set: &[&str]| set.iter().any(|t| tokens.contains(t));
    let mut behavior = BlockBehavior {
        provides_solid_face: !(has(&TRANSLUCENT_PATH_TOKENS) || is_color_transparent(color)),
        cull_over_edge: !has(&NO_EDGE_CULL_PATH_TOKENS),
    };
    if let Some(o) = overrides.get(block_id) {
        if let Some(v) = o.provides_solid_face {
            behavior.provides_solid_face = v;
        }
        if let Some(v) = o.cull_over_edge {
            behavior.cull_over_edge = v;
        }
    }
    behavior
}

#[inline]
pub fn is_color_transparent(color: i32) -> bool {
    ((color as u32) >> 24) & 255 < 255
}

fn path_tokens(block_id: &str) -> Vec<&str> {
    let path = block_id.split(':').nth(1).unwrap_or(block_id);
    path.split(['_', '.', '/', '-']).collect()
}
