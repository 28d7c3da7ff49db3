//! # Feasibility Integration Test
//!
//! Proves the validator flags broken geometry and accepts every world the
//! generator produces.

use obby_core::{Primitive, Section, SemanticFlags, ThemeId, Vec3};
use obby_physics::{IssueKind, PhysicsValidator, SuggestedFix, ValidationReport, ValidatorConfig};
use obby_procedural::{GeneratorConfig, WorldGenerator, WorldSeed};

fn platform(name: &str, z: f64) -> Primitive {
    Primitive::block(name, Vec3::new(0.0, 5.0, z), Vec3::new(4.0, 1.0, 4.0))
}

/// Test: platforms 9 studs apart on level ground give one impossible gap.
#[test]
fn test_nine_stud_gap() {
    // Centers 13 apart, 4-stud platforms: 9 studs edge to edge.
    let parts = vec![platform("A", 0.0), platform("B", 13.0)];
    let validator = PhysicsValidator::new(ValidatorConfig {
        base_safe_gap: 8.0,
        ..ValidatorConfig::default()
    });
    let report = validator.validate(&parts, &[], &[]);

    assert!(!report.valid);
    assert_eq!(report.count(IssueKind::ImpossibleGap), 1);
    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert!((issue.measured - 9.0).abs() < 1e-9);
    assert!((issue.allowed - 8.0).abs() < 1e-9);
    match issue.fix {
        SuggestedFix::ReduceGap { target_gap } => assert!((target_gap - 6.8).abs() < 1e-9),
        ref other => panic!("unexpected fix {other:?}"),
    }
    assert_eq!(report.stats.gap_violations, 1);
}

/// Test: a section without boundary walls is reported.
#[test]
fn test_missing_walls() {
    let section = Section {
        index: 2,
        theme: ThemeId::LavaVolcano,
        theme_name: "Lava Volcano".to_owned(),
        origin: Vec3::new(0.0, 0.0, 4000.0),
        first_stage: 5,
        last_stage: 6,
        entry: Vec3::new(0.0, 5.0, 4010.0),
        exit: Vec3::new(0.0, 5.0, 4100.0),
        teleport_target: Some(Vec3::new(0.0, 8.0, 6010.0)),
        walls: Vec::new(),
        sky_hint: "volcanic".to_owned(),
    };
    let parts = vec![
        platform("A", 4020.0).owned_by(2, Some(5)),
        platform("B", 4028.0).owned_by(2, Some(6)),
        Primitive::block("Floor", Vec3::new(0.0, -1.0, 4050.0), Vec3::new(120.0, 2.0, 200.0))
            .flagged(SemanticFlags::FLOOR | SemanticFlags::HAZARD)
            .owned_by(2, None),
    ];
    let report = PhysicsValidator::default().validate(&parts, &[], &[section]);

    assert_eq!(report.count(IssueKind::MissingWalls), 1);
    let issue = report.issues_of(IssueKind::MissingWalls).next().unwrap();
    match issue.fix {
        SuggestedFix::AddWalls { walls_found, walls_needed } => {
            assert!(walls_found < 4);
            assert_eq!(walls_needed, 4);
        }
        ref other => panic!("unexpected fix {other:?}"),
    }
    assert_eq!(report.stats.enclosure_violations, 1);
}

/// Test: generated worlds pass for many seeds, sizes and theme sequences.
#[test]
fn test_generated_worlds_valid() {
    let validator = PhysicsValidator::default();
    let sequences: [&[ThemeId]; 3] = [
        &ThemeId::DEFAULT_SEQUENCE,
        &[ThemeId::Lobby, ThemeId::NeonCyber],
        &[ThemeId::Lobby, ThemeId::RainbowSky, ThemeId::RainbowSky, ThemeId::SpaceGalaxy],
    ];
    for seed in [1_u64, 42, 777, 2024, u64::MAX] {
        for themes in sequences {
            for count in [-3, 0, 10, 30, 100] {
                let world = WorldGenerator::new(GeneratorConfig {
                    seed: WorldSeed::new(seed),
                    ..GeneratorConfig::default()
                })
                .generate(count, themes, &[]);
                let report = validator.validate(&world.primitives, &world.stages, &world.sections);
                assert!(
                    report.is_valid(),
                    "seed {seed}, {} themes, {count} stages: {:#?}",
                    themes.len(),
                    report.issues
                );
                assert_eq!(report.stats.stages_checked, world.total_stages());
            }
        }
    }
}

/// Test: the report round-trips through JSON for collaborators.
#[test]
fn test_report_serializes() {
    let parts = vec![platform("A", 0.0), platform("B", 20.0)];
    let report = PhysicsValidator::default().validate(&parts, &[], &[]);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"impossible-gap\""));
    assert!(json.contains("\"reduce_gap\""));
    let back: ValidationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
