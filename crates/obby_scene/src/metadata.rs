//! Summary record written next to the scene file.

use obby_core::World;
use serde::{Deserialize, Serialize};

/// Counts and themes of a serialized world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Game title.
    pub game_name: String,
    /// Number of geometry primitives.
    pub part_count: usize,
    /// Number of stages.
    pub stage_count: usize,
    /// Number of sections.
    pub section_count: usize,
    /// Theme ids in section order, without repeats.
    pub themes_used: Vec<String>,
}

impl SceneMetadata {
    /// Summarizes a world.
    #[must_use]
    pub fn from_world(game_name: &str, world: &World) -> Self {
        Self {
            game_name: game_name.to_owned(),
            part_count: world.primitives.len(),
            stage_count: world.total_stages(),
            section_count: world.sections.len(),
            themes_used: world.themes_used().iter().map(|t| t.as_str().to_owned()).collect(),
        }
    }

    /// Pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
