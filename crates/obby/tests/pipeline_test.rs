//! # Pipeline Integration Test
//!
//! Runs the full pipeline into a temporary directory and checks the files
//! it leaves behind.

use obby::core::ThemeId;
use obby::physics::ValidationReport;
use obby::scene::SceneMetadata;
use obby::{ObbyConfig, ObbyError, Pipeline};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> ObbyConfig {
    let mut config = ObbyConfig::default();
    config.output.scene_path = dir.path().join("obby.rbxlx");
    config
}

/// Test: a default run writes the scene, metadata and report.
#[test]
fn test_default_run_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let summary = Pipeline::new(config.clone()).execute().unwrap();

    assert!(summary.scene_written);
    assert!(summary.report.valid, "{}", summary.report.summary());

    let scene = std::fs::read_to_string(&config.output.scene_path).unwrap();
    assert!(scene.starts_with("<?xml"));
    assert!(scene.contains("<roblox"));

    let metadata: SceneMetadata =
        serde_json::from_str(&std::fs::read_to_string(config.output.metadata_path()).unwrap()).unwrap();
    assert_eq!(metadata.section_count, 8);
    assert_eq!(metadata.stage_count, 30);
    assert_eq!(metadata, summary.metadata);

    let report: ValidationReport =
        serde_json::from_str(&std::fs::read_to_string(config.output.report_path()).unwrap()).unwrap();
    assert!(report.valid);
}

/// Test: validate-only leaves no scene file.
#[test]
fn test_validate_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.output.validate_only = true;
    let summary = Pipeline::new(config.clone()).execute().unwrap();

    assert!(!summary.scene_written);
    assert!(config.output.report_path().exists());
    assert!(!config.output.scene_path.exists());
    assert!(!config.output.metadata_path().exists());
}

/// Test: strict mode fails on an impossible validator threshold but still writes the report.
#[test]
fn test_strict_mode_fails_on_issues() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.output.strict = true;
    // No section can pass with a one-stud jump limit.
    config.validation.base_safe_gap = 1.0;

    match Pipeline::new(config.clone()).execute() {
        Err(ObbyError::ValidationFailed { issues }) => assert!(issues > 0),
        other => panic!("expected strict failure, got {other:?}"),
    }
    assert!(config.output.report_path().exists());
    assert!(!config.output.scene_path.exists());
}

/// Test: a TOML file drives the whole run, scripts included.
#[test]
fn test_config_file_run() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("custom.rbxlx");
    let text = format!(
        r#"
        [generation]
        seed = 77
        stages = 9
        themes = ["lobby", "neon_cyber", "space_galaxy"]
        game_name = "Neon Climb"

        [output]
        scene_path = "{}"

        [[overrides]]
        index = 1
        platform_color = [2.0, 0.5, 0.5]

        [[scripts]]
        name = "StageHandler"
        kind = "script"
        location = "ServerScriptService"
        source = "print('ready')"
        "#,
        scene_path.display().to_string().replace('\\', "/")
    );
    let path = dir.path().join("obby.toml");
    std::fs::write(&path, text).unwrap();

    let config = ObbyConfig::load(&path).unwrap();
    assert_eq!(config.generation.themes[1], ThemeId::NeonCyber);
    let summary = Pipeline::new(config).execute().unwrap();

    assert_eq!(summary.metadata.game_name, "Neon Climb");
    assert_eq!(summary.metadata.stage_count, 9);
    let scene = std::fs::read_to_string(&scene_path).unwrap();
    assert!(scene.contains(r#"<Item class="Script""#));
    assert!(scene.contains("Neon Climb"));
}

/// Test: same configuration, same bytes.
#[test]
fn test_runs_are_reproducible() {
    let config = ObbyConfig::default();
    let pipeline = Pipeline::new(config);
    let first = pipeline.render(&pipeline.generate()).unwrap();
    let second = pipeline.render(&pipeline.generate()).unwrap();
    assert_eq!(first, second);
}
