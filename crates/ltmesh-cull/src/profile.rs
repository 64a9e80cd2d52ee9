//! Runtime face behaviour profiles.
//!
//! A profile pins down how the target game/mod version treats faces on the
//! block boundary and whether it cuts faces against non-solid neighbours. The
//! built-in table is matched against a runtime description by version prefix.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_ID: &str = "default";
pub const CURRENT_PROFILE_ID: &str = "mc1.21.1-lt1.6.x";

/// What an outside face assumes lies across the block boundary.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutsideNeighborPolicy {
    /// Nothing: outside faces are never culled.
    #[default]
    Air,
    /// Tiles of the neighbouring cell in the same structure.
    Tiles,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBehaviorProfile {
    pub profile_id: String,
    pub evaluation_mode: String,
    pub supports_cutting: bool,
    pub outside_neighbor_policy: OutsideNeighborPolicy,
    pub occlude_outside_faces_with_tiles: bool,
}

impl Default for FaceBehaviorProfile {
    fn default() -> Self {
        FaceStates::LITTLE_SERVER_FACE.to_profile(DEFAULT_PROFILE_ID)
    }
}

impl FaceBehaviorProfile {
    /// Whether outside faces are searched for occluding neighbour tiles.
    pub fn occludes_outside_faces(&self) -> bool {
        self.outside_neighbor_policy != OutsideNeighborPolicy::Air && self.occlude_outside_faces_with_tiles
    }

    /// Replaces every field the override sets.
    pub fn with_overrides(mut self, o: &ProfileOverrides) -> Self {
        if let Some(v) = &o.evaluation_mode {
            self.evaluation_mode = v.clone();
        }
        if let Some(v) = o.supports_cutting {
            self.supports_cutting = v;
        }
        if let Some(v) = o.outside_neighbor_policy {
            self.outside_neighbor_policy = v;
        }
        if let Some(v) = o.occlude_outside_faces_with_tiles {
            self.occlude_outside_faces_with_tiles = v;
        }
        self
    }
}

/// Partial profile layered over a resolved one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub evaluation_mode: Option<String>,
    pub supports_cutting: Option<bool>,
    pub outside_neighbor_policy: Option<OutsideNeighborPolicy>,
    pub occlude_outside_faces_with_tiles: Option<bool>,
}

/// Versions of the runtime the output is meant to match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeInfo {
    pub minecraft_version: Option<String>,
    pub little_tiles_version: Option<String>,
}

impl RuntimeInfo {
    pub fn new(minecraft_version: impl Into<String>, little_tiles_version: impl Into<String>) -> Self {
        Self {
            minecraft_version: Some(minecraft_version.into()),
            little_tiles_version: Some(little_tiles_version.into()),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct FaceStates {
    evaluation_mode: &'static str,
    supports_cutting: bool,
    outside_neighbor_policy: OutsideNeighborPolicy,
    occlude_outside_faces_with_tiles: bool,
}

impl FaceStates {
    const LITTLE_SERVER_FACE: FaceStates = FaceStates {
        evaluation_mode: "little_server_face",
        supports_cutting: false,
        outside_neighbor_policy: OutsideNeighborPolicy::Air,
        occlude_outside_faces_with_tiles: false,
    };

    fn to_profile(self, id: &str) -> FaceBehaviorProfile {
        FaceBehaviorProfile {
            profile_id: id.to_string(),
            evaluation_mode: self.evaluation_mode.to_string(),
            supports_cutting: self.supports_cutting,
            outside_neighbor_policy: self.outside_neighbor_policy,
            occlude_outside_faces_with_tiles: self.occlude_outside_faces_with_tiles,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct RuntimeMatcher {
    minecraft_version_prefix: Option<&'static str>,
    little_tiles_version_prefix: Option<&'static str>,
}

impl RuntimeMatcher {
    fn matches(&self, runtime: &RuntimeInfo) -> bool {
        prefix_matches(self.minecraft_version_prefix, runtime.minecraft_version.as_deref())
            && prefix_matches(self.little_tiles_version_prefix, runtime.little_tiles_version.as_deref())
    }
}

fn prefix_matches(prefix: Option<&str>, value: Option<&str>) -> bool {
    match prefix {
        Some(p) if !p.is_empty() => value.unwrap_or("").starts_with(p),
        _ => true,
    }
}

struct BuiltinProfile {
    id: &'static str,
    matcher: RuntimeMatcher,
    face_states: FaceStates,
}

static BUILTIN_PROFILES: [BuiltinProfile; 2] = [
    BuiltinProfile {
        id: DEFAULT_PROFILE_ID,
        matcher: RuntimeMatcher {
            minecraft_version_prefix: None,
            little_tiles_version_prefix: None,
        },
        face_states: FaceStates::LITTLE_SERVER_FACE,
    },
    BuiltinProfile {
        id: CURRENT_PROFILE_ID,
        matcher: RuntimeMatcher {
            minecraft_version_prefix: Some("1.21."),
            little_tiles_version_prefix: Some("1.6."),
        },
        face_states: FaceStates::LITTLE_SERVER_FACE,
    },
];

/// Ids of the built-in profiles.
pub fn profile_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_PROFILES.iter().map(|p| p.id)
}

/// Picks a profile id: an explicit non-blank id wins, then the first
/// non-default profile matching `runtime`, else `default`.
pub fn resolve_profile_id(explicit: Option<&str>, runtime: Option<&RuntimeInfo>) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return id.to_string();
    }
    let Some(runtime) = runtime else {
        return DEFAULT_PROFILE_ID.to_string();
    };
    BUILTIN_PROFILES
        .iter()
        .filter(|p| p.id != DEFAULT_PROFILE_ID)
        .find(|p| p.matcher.matches(runtime))
        .map_or(DEFAULT_PROFILE_ID, |p| p.id)
        .to_string()
}

/// Resolves the profile for a conversion. Unknown ids keep their name but
/// behave like `default`.
pub fn resolve(explicit: Option<&str>, runtime: Option<&RuntimeInfo>) -> FaceBehaviorProfile {
    let id = resolve_profile_id(explicit, runtime);
    let face_states = BUILTIN_PROFILES
        .iter()
        .find(|p| p.id == id)
        .map_or(FaceStates::LITTLE_SERVER_FACE, |p| p.face_states);
    let profile = face_states.to_profile(&id);
    log::debug!("face behavior profile={} policy={:?}", profile.profile_id, profile.outside_neighbor_policy);
    profile
}
