//! # World Generator
//!
//! Splits the requested stage count across the theme sequence, builds
//! each section on its own RNG stream (in parallel) and stitches the
//! results into one [`World`].

use crate::difficulty::DifficultyProfile;
use crate::section::{build_section, entry_position, SectionPlan};
use crate::seed::WorldSeed;
use crate::theme::{ThemeOverride, ThemeRegistry};
use obby_core::{ThemeId, World};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Fewest stages a section may hold.
pub const MIN_STAGES_PER_SECTION: u32 = 2;

/// Default per-section ceiling.
pub const DEFAULT_MAX_STAGES_PER_SECTION: u32 = 8;

/// Largest accepted per-section ceiling.
pub const STAGE_CEILING_LIMIT: u32 = 12;

/// Generator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World seed.
    pub seed: WorldSeed,
    /// Shown on the welcome sign.
    pub game_name: String,
    /// Per-section stage ceiling, clamped to `[2, 12]`.
    pub max_stages_per_section: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            game_name: "Epic Obby".to_owned(),
            max_stages_per_section: DEFAULT_MAX_STAGES_PER_SECTION,
        }
    }
}

impl GeneratorConfig {
    /// Effective per-section ceiling.
    #[must_use]
    pub fn stage_ceiling(&self) -> u32 {
        self.max_stages_per_section
            .clamp(MIN_STAGES_PER_SECTION, STAGE_CEILING_LIMIT)
    }
}

/// Splits `requested` stages over `sections`.
///
/// Each share is clamped to `[2, max_per_section]`. Rounding is reconciled
/// on the last sections first until the total equals `requested`, or the
/// nearest total the clamp allows. Zero or negative requests give every
/// section the minimum.
#[must_use]
pub fn distribute_stages(requested: i64, sections: usize, max_per_section: u32) -> Vec<u32> {
    if sections == 0 {
        return Vec::new();
    }
    let ceiling = max_per_section.clamp(MIN_STAGES_PER_SECTION, STAGE_CEILING_LIMIT);
    let (lo, hi) = (i64::from(MIN_STAGES_PER_SECTION), i64::from(ceiling));
    let n = sections as i64;
    let target = requested.clamp(lo * n, hi * n);

    let wanted = requested.max(0);
    let base = (wanted / n).clamp(lo, hi);
    let mut leftover = wanted - base * n;
    let mut counts: Vec<u32> = (0..sections)
        .map(|_| {
            let extra = i64::from(leftover > 0);
            leftover -= extra;
            (base + extra).clamp(lo, hi) as u32
        })
        .collect();

    let mut total: i64 = counts.iter().map(|&c| i64::from(c)).sum();
    while total < target {
        match counts.iter().rposition(|&c| c < ceiling) {
            Some(i) => counts[i] += 1,
            None => break,
        }
        total += 1;
    }
    while total > target {
        match counts.iter().rposition(|&c| c > MIN_STAGES_PER_SECTION) {
            Some(i) => counts[i] -= 1,
            None => break,
        }
        total -= 1;
    }
    counts
}

/// Deterministic obstacle-course world generator.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    config: GeneratorConfig,
    profile: DifficultyProfile,
    registry: &'static ThemeRegistry,
}

impl WorldGenerator {
    /// Creates a generator with the standard difficulty profile.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            profile: DifficultyProfile::standard(),
            registry: ThemeRegistry::builtin(),
        }
    }

    /// Replaces the difficulty profile.
    #[must_use]
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Generator settings.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Difficulty profile in use.
    #[must_use]
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Generates a world: one section per entry of `themes`.
    ///
    /// Never fails. An empty theme sequence yields an empty world.
    #[must_use]
    pub fn generate(&self, stage_count: i64, themes: &[ThemeId], overrides: &[ThemeOverride]) -> World {
        if themes.is_empty() {
            warn!("empty theme sequence, nothing to generate");
            return World::default();
        }

        let counts = distribute_stages(stage_count, themes.len(), self.config.stage_ceiling());
        let resolved = self.registry.resolve(themes, overrides);
        let seed = self.config.seed;
        let last = themes.len() - 1;

        let mut first_stage = 1;
        let plans: Vec<SectionPlan<'_>> = themes
            .iter()
            .zip(&counts)
            .enumerate()
            .map(|(index, (&theme_id, &stages))| {
                let plan = SectionPlan {
                    index,
                    theme_id,
                    theme: &resolved[index],
                    envelope: self.profile.envelope_for(index),
                    first_stage,
                    stage_count: stages,
                    next_entry: (index < last).then(|| entry_position(index + 1)),
                    game_name: &self.config.game_name,
                    seed,
                };
                first_stage += stages;
                plan
            })
            .collect();

        let built: Vec<_> = plans.par_iter().map(build_section).collect();

        let mut world = World::default();
        let mut relays = 0;
        for mut section in built {
            let offset = world.primitives.len();
            for wall in &mut section.section.walls {
                *wall += offset;
            }
            relays += section.repair.relays;
            world.primitives.append(&mut section.parts);
            world.stages.append(&mut section.stages);
            world.sections.push(section.section);
        }

        info!(
            seed = seed.value(),
            sections = world.sections.len(),
            stages = world.stages.len(),
            parts = world.primitives.len(),
            relays,
            "world generated"
        );
        world
    }
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_exact() {
        let counts = distribute_stages(30, 8, 8);
        assert_eq!(counts.iter().sum::<u32>(), 30);
        assert!(counts.iter().all(|&c| (2..=8).contains(&c)));
    }

    #[test]
    fn test_distribution_clamped() {
        assert_eq!(distribute_stages(0, 8, 8), vec![2; 8]);
        assert_eq!(distribute_stages(-5, 3, 8), vec![2; 3]);
        assert_eq!(distribute_stages(1000, 4, 8), vec![8; 4]);
        assert_eq!(distribute_stages(5, 3, 8), vec![2, 2, 2]);
    }

    #[test]
    fn test_distribution_reconciles_last_sections() {
        // 9 over 4: base 2, one leftover on the first section.
        assert_eq!(distribute_stages(9, 4, 8), vec![3, 2, 2, 2]);
        assert_eq!(distribute_stages(17, 2, 8), vec![8, 8]);
        assert_eq!(distribute_stages(13, 2, 6), vec![6, 6]);
    }

    #[test]
    fn test_ceiling_clamped() {
        assert_eq!(distribute_stages(100, 2, 40), vec![12, 12]);
        assert_eq!(distribute_stages(6, 3, 0), vec![2, 2, 2]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(distribute_stages(10, 0, 8).is_empty());
        assert_eq!(WorldGenerator::default().generate(10, &[], &[]), World::default());
    }

    #[test]
    fn test_stage_numbers_contiguous() {
        let world = WorldGenerator::default().generate(12, &[ThemeId::Lobby, ThemeId::CandyLand, ThemeId::IceCrystal], &[]);
        let numbers: Vec<u32> = world.stages.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
        for section in &world.sections {
            for &w in &section.walls {
                assert_eq!(world.primitives[w].section, Some(section.index));
            }
        }
    }
}
