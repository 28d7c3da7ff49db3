//! Externally supplied script sources.
//!
//! Passed through untouched and attached under the container named by
//! their location.

use serde::{Deserialize, Serialize};

/// Container used when a location is not recognised.
pub const DEFAULT_LOCATION: &str = "ServerScriptService";

/// Script flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// Server script.
    #[default]
    Script,
    /// Client script.
    LocalScript,
    /// Shared module.
    ModuleScript,
}

impl ScriptKind {
    /// Item class for this kind.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Script => "Script",
            Self::LocalScript => "LocalScript",
            Self::ModuleScript => "ModuleScript",
        }
    }
}

/// One named script source with a placement hint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSource {
    /// Item name.
    pub name: String,
    /// Script flavour.
    #[serde(default)]
    pub kind: ScriptKind,
    /// Container name, e.g. `ReplicatedStorage`.
    #[serde(default = "default_location")]
    pub location: String,
    /// Source text.
    pub source: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_owned()
}

impl ScriptSource {
    /// Creates a script source.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ScriptKind, location: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            location: location.into(),
            source: source.into(),
        }
    }
}
