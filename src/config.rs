use std::error::Error;
use std::fs;
use std::path::Path;

use ltmesh_cull::profile;
use ltmesh_cull::{CullOptions, FaceBehaviorProfile, GeometryMode, ProfileOverrides, RuntimeInfo};
use ltmesh_tiles::BehaviorOverrides;
use serde::{Deserialize, Deserializer, Serialize};

/// Everything that steers a conversion.
///
/// ```toml
/// geometry_mode = "server"
/// optimize = true
///
/// [runtime]
/// minecraft_version = "1.21.1"
/// little_tiles_version = "1.6.0"
///
/// [behavior_overrides.blocks."minecraft:tinted_glass"]
/// provides_solid_face = true
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub evaluate_internal_occlusion: bool,
    #[serde(deserialize_with = "lenient_geometry_mode")]
    pub geometry_mode: GeometryMode,
    pub optimize: bool,
    /// Explicit profile id; wins over `runtime` when non-blank.
    pub runtime_profile: Option<String>,
    pub runtime: Option<RuntimeInfo>,
    /// Applied over the resolved profile, then `face_behavior_profile` on top.
    pub runtime_behavior_overrides: ProfileOverrides,
    pub face_behavior_profile: ProfileOverrides,
    pub behavior_overrides: BehaviorOverrides,
    /// Builds transformable-box caches on the rayon pool before culling.
    pub warm_transform_caches: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            evaluate_internal_occlusion: true,
            geometry_mode: GeometryMode::Client,
            optimize: false,
            runtime_profile: None,
            runtime: None,
            runtime_behavior_overrides: ProfileOverrides::default(),
            face_behavior_profile: ProfileOverrides::default(),
            behavior_overrides: BehaviorOverrides::default(),
            warm_transform_caches: false,
        }
    }
}

impl ConvertOptions {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let opts: ConvertOptions = toml::from_str(toml_str)?;
        Ok(opts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Resolved face behaviour profile with both override layers applied.
    pub fn profile(&self) -> FaceBehaviorProfile {
        profile::resolve(self.runtime_profile.as_deref(), self.runtime.as_ref())
            .with_overrides(&self.runtime_behavior_overrides)
            .with_overrides(&self.face_behavior_profile)
    }

    pub fn cull_options(&self) -> CullOptions {
        CullOptions {
            evaluate_internal_occlusion: self.evaluate_internal_occlusion,
            geometry_mode: self.geometry_mode,
            profile: self.profile(),
        }
    }
}

fn lenient_geometry_mode<'de, D>(d: D) -> Result<GeometryMode, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    Ok(GeometryMode::parse(&s))
}
