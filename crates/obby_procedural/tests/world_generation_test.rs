//! # World Generation Integration Test
//!
//! Proves generated worlds are complete, enclosed and reachable for every
//! supported stage count and theme sequence.

use obby_core::movement::{allowed_gap, edge_gap, vertical_delta, MAX_JUMP_HEIGHT, SAFE_GAP_SPRINT};
use obby_core::{traversal_order, SemanticFlags, ThemeId, World};
use obby_procedural::{
    DifficultyProfile, EnvelopeBounds, GeneratorConfig, ThemeOverride, WorldGenerator, WorldSeed, SECTION_SPACING,
};

fn generator(seed: u64) -> WorldGenerator {
    WorldGenerator::new(GeneratorConfig {
        seed: WorldSeed::new(seed),
        ..GeneratorConfig::default()
    })
}

fn assert_reachable(world: &World) {
    for section in &world.sections {
        let parts: Vec<_> = world
            .primitives
            .iter()
            .enumerate()
            .filter(|(_, p)| p.section == Some(section.index))
            .collect();
        let order = traversal_order(parts.iter().copied());
        for pair in order.windows(2) {
            let (a, b) = (&world.primitives[pair[0]], &world.primitives[pair[1]]);
            let dy = vertical_delta(a, b);
            assert!(
                edge_gap(a, b) <= allowed_gap(SAFE_GAP_SPRINT, dy),
                "section {}: {} -> {} gap {:.2}",
                section.index,
                a.name,
                b.name,
                edge_gap(a, b)
            );
            assert!(dy <= MAX_JUMP_HEIGHT, "section {}: {} -> {} rise {dy:.2}", section.index, a.name, b.name);
        }
    }
}

/// Test: 30 stages over the default eight themes.
#[test]
fn test_thirty_stages_eight_sections() {
    let world = generator(42).generate(30, &ThemeId::DEFAULT_SEQUENCE, &[]);

    assert_eq!(world.sections.len(), 8);
    assert_eq!(world.total_stages(), 30);

    for section in &world.sections {
        let floors: Vec<_> = world
            .section_parts(section.index)
            .filter(|p| p.has(SemanticFlags::FLOOR))
            .collect();
        if section.is_tutorial() {
            assert!(floors.iter().all(|p| !p.has(SemanticFlags::HAZARD)), "tutorial floor must be walkable");
        } else {
            assert!(floors.len() >= 2, "section {} needs floor and net", section.index);
            assert!(floors.iter().all(|p| p.has(SemanticFlags::HAZARD)));
            let lowest = floors.iter().map(|p| p.position.y).fold(f64::INFINITY, f64::min);
            assert!(lowest <= -40.0, "safety net must sit deep below");
        }
        assert_eq!(section.walls.len(), 4);
    }
    assert_reachable(&world);
}

/// Test: zero and negative counts clamp to two stages per section.
#[test]
fn test_non_positive_stage_counts() {
    for requested in [0, -5, i64::MIN] {
        let world = generator(7).generate(requested, &ThemeId::DEFAULT_SEQUENCE, &[]);
        assert_eq!(world.sections.len(), 8);
        assert_eq!(world.total_stages(), 16);
        assert!(world.sections.iter().all(|s| s.stage_count() == 2));
    }
}

/// Test: many seeds and sizes stay reachable.
#[test]
fn test_reachable_across_seeds() {
    for seed in 0..12_u64 {
        for (count, themes) in [
            (6, &ThemeId::DEFAULT_SEQUENCE[..3]),
            (40, &ThemeId::DEFAULT_SEQUENCE[..]),
            (64, &ThemeId::DEFAULT_SEQUENCE[..]),
        ] {
            let world = generator(seed).generate(count, themes, &[]);
            assert_reachable(&world);
        }
    }
}

/// Test: identical inputs give identical worlds.
#[test]
fn test_deterministic() {
    let a = generator(99).generate(25, &ThemeId::DEFAULT_SEQUENCE, &[]);
    let b = generator(99).generate(25, &ThemeId::DEFAULT_SEQUENCE, &[]);
    let c = generator(100).generate(25, &ThemeId::DEFAULT_SEQUENCE, &[]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

/// Test: sections never overlap along the traversal axis.
#[test]
fn test_sections_isolated() {
    let world = WorldGenerator::new(GeneratorConfig {
        max_stages_per_section: 12,
        ..GeneratorConfig::default()
    })
    .generate(96, &ThemeId::DEFAULT_SEQUENCE, &[]);
    let span = |index: usize| {
        world
            .section_parts(index)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.min_z()), hi.max(p.max_z())))
    };
    for section in &world.sections {
        let (lo, hi) = span(section.index);
        assert!(lo > section.origin.z - SECTION_SPACING * 0.5, "section {} starts too early", section.index);
        assert!(hi < section.origin.z + SECTION_SPACING, "section {} runs too long", section.index);
    }
    for pair in world.sections.windows(2) {
        assert!(span(pair[0].index).1 < span(pair[1].index).0);
    }
}

/// Test: teleports chain every section to the next one.
#[test]
fn test_teleport_chain() {
    let world = generator(3).generate(20, &ThemeId::DEFAULT_SEQUENCE, &[]);
    for pair in world.sections.windows(2) {
        let target = pair[0].teleport_target.expect("non-terminal section");
        assert!((target.z - pair[1].entry.z).abs() < f64::EPSILON);
        assert!(target.y > pair[1].entry.y);
    }
    let last = world.sections.last().unwrap();
    assert!(last.is_terminal());
    assert_eq!(world.primitives.iter().filter(|p| p.has(SemanticFlags::VICTORY)).count(), 1);
}

/// Test: overrides patch only the named section.
#[test]
fn test_override_applies_to_one_section() {
    let patch = ThemeOverride {
        index: 2,
        name: Some("Volcano Rush".to_owned()),
        wall_color: Some([0.0, 0.0, 1.0]),
        ..ThemeOverride::default()
    };
    let world = generator(5).generate(16, &ThemeId::DEFAULT_SEQUENCE, &[patch]);
    assert_eq!(world.sections[2].theme_name, "Volcano Rush");
    assert_ne!(world.sections[3].theme_name, "Volcano Rush");
    for &w in &world.sections[2].walls {
        let c = world.primitives[w].color;
        assert!((c.b - 1.0).abs() < f64::EPSILON && c.r.abs() < f64::EPSILON);
    }
}

/// Test: a hostile difficulty table is sanitized and still reachable.
#[test]
fn test_custom_profile_sanitized() {
    let profile = DifficultyProfile::new(&[
        EnvelopeBounds::new((20.0, 3.0), (0.5, 30.0), 9.0),
        EnvelopeBounds::new((12.0, 40.0), (1.0, 2.0), 6.0).with_chances(1.0, 1.0, 1.0, 1.0),
    ]);
    let world = generator(11).with_profile(profile).generate(24, &ThemeId::DEFAULT_SEQUENCE, &[]);
    assert_eq!(world.total_stages(), 24);
    assert_reachable(&world);
}
