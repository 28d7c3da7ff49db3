//! # Pipeline
//!
//! generate -> validate -> report -> serialize -> write.
//!
//! Output files are rendered fully in memory and then moved into place, so
//! a failed run never leaves a half-written scene behind.

use std::io::Write;
use std::path::Path;

use obby_core::World;
use obby_physics::{PhysicsValidator, ValidationReport};
use obby_procedural::WorldGenerator;
use obby_scene::{to_xml_bytes, SceneMetadata, SceneSerializer};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::ObbyConfig;
use crate::error::{ObbyError, ObbyResult};

/// What a completed run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Validator findings.
    pub report: ValidationReport,
    /// Counts written next to the scene.
    pub metadata: SceneMetadata,
    /// False when the run stopped after validation.
    pub scene_written: bool,
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// # Errors
///
/// Returns [`ObbyError::Io`] if the file cannot be created or moved into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ObbyResult<()> {
    let io_err = |source: std::io::Error| ObbyError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// One configured generation run.
#[derive(Debug)]
pub struct Pipeline {
    config: ObbyConfig,
    generator: WorldGenerator,
    validator: PhysicsValidator,
    serializer: SceneSerializer,
}

impl Pipeline {
    /// Prepares a run.
    #[must_use]
    pub fn new(config: ObbyConfig) -> Self {
        let generator = WorldGenerator::new(config.generator_config()).with_profile(config.difficulty_profile());
        let validator = PhysicsValidator::new(config.validation.clone());
        let serializer = SceneSerializer::new(config.generation.game_name.clone());
        Self {
            config,
            generator,
            validator,
            serializer,
        }
    }

    /// Run configuration.
    #[must_use]
    pub fn config(&self) -> &ObbyConfig {
        &self.config
    }

    /// Builds the world.
    #[must_use]
    pub fn generate(&self) -> World {
        let generation = &self.config.generation;
        self.generator
            .generate(generation.stages, &generation.themes, &self.config.overrides)
    }

    /// Checks the world against the movement model.
    #[must_use]
    pub fn validate(&self, world: &World) -> ValidationReport {
        self.validator
            .validate(&world.primitives, &world.stages, &world.sections)
    }

    /// Renders the scene file in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ObbyError::Scene`] if the world breaks the geometry contract.
    pub fn render(&self, world: &World) -> ObbyResult<Vec<u8>> {
        let doc = self.serializer.serialize_world(world, &self.config.scripts)?;
        Ok(to_xml_bytes(&doc)?)
    }

    /// Runs every stage and writes the output files.
    ///
    /// The report is always written. In strict mode a report with issues
    /// stops the run before the scene is rendered.
    ///
    /// # Errors
    ///
    /// Returns [`ObbyError::ValidationFailed`] in strict mode, otherwise any
    /// serialization or I/O error.
    pub fn execute(&self) -> ObbyResult<RunSummary> {
        let output = &self.config.output;
        let world = self.generate();
        let report = self.validate(&world);
        if !report.valid {
            warn!(issues = report.issues.len(), "world has feasibility issues");
        }

        let report_path = output.report_path();
        write_atomic(&report_path, serde_json::to_string_pretty(&report)?.as_bytes())?;
        info!(path = %report_path.display(), "validation report written");

        if output.strict && !report.valid {
            return Err(ObbyError::ValidationFailed {
                issues: report.issues.len(),
            });
        }

        let metadata = SceneMetadata::from_world(&self.config.generation.game_name, &world);
        if output.validate_only {
            return Ok(RunSummary {
                report,
                metadata,
                scene_written: false,
            });
        }

        let scene = self.render(&world)?;
        write_atomic(&output.scene_path, &scene)?;
        let metadata_path = output.metadata_path();
        write_atomic(&metadata_path, metadata.to_json()?.as_bytes())?;
        info!(
            scene = %output.scene_path.display(),
            metadata = %metadata_path.display(),
            bytes = scene.len(),
            parts = metadata.part_count,
            "scene written"
        );

        Ok(RunSummary {
            report,
            metadata,
            scene_written: true,
        })
    }
}
