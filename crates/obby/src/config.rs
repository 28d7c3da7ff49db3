//! # Pipeline Configuration
//!
//! One TOML file, every table optional:
//!
//! ```toml
//! [generation]
//! seed = 42
//! stages = 30
//! themes = ["lobby", "lava_volcano"]
//!
//! [validation]
//! base_safe_gap = 8.0
//!
//! [output]
//! scene_path = "obby.rbxlx"
//! strict = true
//!
//! [[overrides]]
//! index = 1
//! platform_color = [1.0, 0.2, 0.0]
//!
//! [[scripts]]
//! name = "StageHandler"
//! kind = "script"
//! location = "ServerScriptService"
//! source = "print('ready')"
//! ```

use std::path::{Path, PathBuf};

use obby_core::ThemeId;
use obby_physics::ValidatorConfig;
use obby_procedural::{
    ConfigResult, DifficultyProfile, EnvelopeBounds, GeneratorConfig, ThemeOverride, WorldSeed,
};
use obby_scene::ScriptSource;
use serde::{Deserialize, Serialize};

/// `[generation]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    /// World seed.
    pub seed: u64,
    /// Requested stage total. Zero or negative gives the per-section minimum.
    pub stages: i64,
    /// One section per theme, in order.
    pub themes: Vec<ThemeId>,
    /// Game title.
    pub game_name: String,
    /// Per-section stage ceiling.
    pub max_stages_per_section: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            seed: generator.seed.value(),
            stages: 30,
            themes: ThemeId::DEFAULT_SEQUENCE.to_vec(),
            game_name: generator.game_name,
            max_stages_per_section: generator.max_stages_per_section,
        }
    }
}

/// `[output]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Scene file.
    pub scene_path: PathBuf,
    /// Metadata JSON; next to the scene when absent.
    pub metadata_path: Option<PathBuf>,
    /// Validation report JSON; next to the scene when absent.
    pub report_path: Option<PathBuf>,
    /// Fail the run on any validation issue.
    pub strict: bool,
    /// Stop after writing the report.
    pub validate_only: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            scene_path: PathBuf::from("obby.rbxlx"),
            metadata_path: None,
            report_path: None,
            strict: false,
            validate_only: false,
        }
    }
}

impl OutputSettings {
    /// Resolved metadata path.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata_path
            .clone()
            .unwrap_or_else(|| self.scene_path.with_extension("metadata.json"))
    }

    /// Resolved report path.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.scene_path.with_extension("report.json"))
    }
}

/// Whole configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObbyConfig {
    /// Generator settings.
    pub generation: GenerationSettings,
    /// Validator thresholds.
    pub validation: ValidatorConfig,
    /// Output files.
    pub output: OutputSettings,
    /// Per-section theme patches.
    pub overrides: Vec<ThemeOverride>,
    /// Replacement difficulty table; empty keeps the built-in one.
    pub difficulty: Vec<EnvelopeBounds>,
    /// Script sources attached to the scene.
    pub scripts: Vec<ScriptSource>,
}

impl ObbyConfig {
    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`](obby_procedural::ConfigError::Parse)
    /// for malformed TOML, unknown keys or unknown theme names.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`](obby_procedural::ConfigError::Io) if the
    /// file cannot be read, otherwise as [`ObbyConfig::from_toml_str`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Generator settings for this run.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: WorldSeed::new(self.generation.seed),
            game_name: self.generation.game_name.clone(),
            max_stages_per_section: self.generation.max_stages_per_section,
        }
    }

    /// Difficulty profile, checked and made monotone.
    #[must_use]
    pub fn difficulty_profile(&self) -> DifficultyProfile {
        DifficultyProfile::new(&self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ObbyConfig::from_toml_str("").unwrap(), ObbyConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = ObbyConfig::from_toml_str(
            r#"
            [generation]
            seed = 9
            themes = ["lobby", "ice_crystal"]

            [validation]
            base_safe_gap = 7.5

            [[overrides]]
            index = 1
            name = "Frozen"
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.seed, 9);
        assert_eq!(config.generation.stages, 30);
        assert_eq!(config.generation.themes, [ThemeId::Lobby, ThemeId::IceCrystal]);
        assert!((config.validation.base_safe_gap - 7.5).abs() < f64::EPSILON);
        assert_eq!(config.validation.walls_required, 4);
        assert_eq!(config.overrides[0].name.as_deref(), Some("Frozen"));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let err = ObbyConfig::from_toml_str("[generation]\nthemes = [\"swamp\"]\n");
        assert!(matches!(err, Err(obby_procedural::ConfigError::Parse(_))));
    }

    #[test]
    fn test_output_paths_follow_scene() {
        let output = OutputSettings {
            scene_path: PathBuf::from("out/world.rbxlx"),
            ..OutputSettings::default()
        };
        assert_eq!(output.metadata_path(), PathBuf::from("out/world.metadata.json"));
        assert_eq!(output.report_path(), PathBuf::from("out/world.report.json"));
    }
}
