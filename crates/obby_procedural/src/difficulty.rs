//! # Difficulty Profile
//!
//! Maps a section index to a [`DifficultyEnvelope`]. All invariants are
//! enforced when the profile is built, so generation never has to check
//! them again:
//!
//! - `MIN_GAP <= gap_min <= gap_max <= ABSOLUTE_MAX_GAP`
//! - `MIN_PLATFORM_WIDTH <= platform_min <= platform_max <= MAX_PLATFORM_SIZE`
//! - every probability in `[0, 1]`
//! - difficulty never decreases from one section to the next

use crate::error::ConfigResult;
use obby_core::movement::{ABSOLUTE_MAX_GAP, MIN_PLATFORM_WIDTH};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Smallest gap an envelope may ask for.
pub const MIN_GAP: f64 = 1.0;

/// Amount `gap_min` is pulled below `gap_max` when a caller inverts them.
pub const GAP_MARGIN: f64 = 0.5;

/// Largest platform side the generator places.
pub const MAX_PLATFORM_SIZE: f64 = 12.0;

/// Largest per-stage vertical drift.
pub const MAX_STAGE_RISE: f64 = 3.5;

/// Raw, unchecked envelope values as supplied by a caller or config file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeBounds {
    /// Smallest jump gap.
    pub gap_min: f64,
    /// Largest jump gap.
    pub gap_max: f64,
    /// Smallest platform side.
    pub platform_min: f64,
    /// Largest platform side.
    pub platform_max: f64,
    /// Largest upward drift between stages.
    pub rise_max: f64,
    /// Chance a plain platform moves.
    #[serde(default)]
    pub moving_chance: f64,
    /// Chance the spinner is forced when unlocked.
    #[serde(default)]
    pub spinning_chance: f64,
    /// Chance the hazard gauntlet is forced when unlocked.
    #[serde(default)]
    pub hazard_chance: f64,
    /// Chance a plain platform vanishes on touch.
    #[serde(default)]
    pub disappearing_chance: f64,
}

impl EnvelopeBounds {
    /// Creates bounds with all probabilities zero.
    #[must_use]
    pub const fn new(gap: (f64, f64), platform: (f64, f64), rise_max: f64) -> Self {
        Self {
            gap_min: gap.0,
            gap_max: gap.1,
            platform_min: platform.0,
            platform_max: platform.1,
            rise_max,
            moving_chance: 0.0,
            spinning_chance: 0.0,
            hazard_chance: 0.0,
            disappearing_chance: 0.0,
        }
    }

    /// Sets the four obstacle probabilities.
    #[must_use]
    pub const fn with_chances(mut self, moving: f64, spinning: f64, hazard: f64, disappearing: f64) -> Self {
        self.moving_chance = moving;
        self.spinning_chance = spinning;
        self.hazard_chance = hazard;
        self.disappearing_chance = disappearing;
        self
    }
}

/// Checked envelope for one section. Read fields through `Deref`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyEnvelope(EnvelopeBounds);

impl Deref for DifficultyEnvelope {
    type Target = EnvelopeBounds;

    fn deref(&self) -> &EnvelopeBounds {
        &self.0
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn chance(value: f64) -> f64 {
    finite_or(value, 0.0).clamp(0.0, 1.0)
}

impl DifficultyEnvelope {
    /// Checks and corrects raw bounds.
    #[must_use]
    pub fn new(raw: EnvelopeBounds) -> Self {
        let gap_max = finite_or(raw.gap_max, ABSOLUTE_MAX_GAP).clamp(MIN_GAP, ABSOLUTE_MAX_GAP);
        let mut gap_min = finite_or(raw.gap_min, MIN_GAP).max(MIN_GAP);
        if gap_min > gap_max {
            gap_min = (gap_max - GAP_MARGIN).max(MIN_GAP);
        }

        let platform_min =
            finite_or(raw.platform_min, MIN_PLATFORM_WIDTH).clamp(MIN_PLATFORM_WIDTH, MAX_PLATFORM_SIZE);
        let platform_max = finite_or(raw.platform_max, platform_min).clamp(platform_min, MAX_PLATFORM_SIZE);

        Self(EnvelopeBounds {
            gap_min,
            gap_max,
            platform_min,
            platform_max,
            rise_max: finite_or(raw.rise_max, 0.0).clamp(0.0, MAX_STAGE_RISE),
            moving_chance: chance(raw.moving_chance),
            spinning_chance: chance(raw.spinning_chance),
            hazard_chance: chance(raw.hazard_chance),
            disappearing_chance: chance(raw.disappearing_chance),
        })
    }

    /// Raises this envelope so it is at least as hard as `prev`.
    fn at_least(self, prev: &Self) -> Self {
        let (a, p) = (self.0, prev.0);
        Self(EnvelopeBounds {
            gap_min: a.gap_min.max(p.gap_min),
            gap_max: a.gap_max.max(p.gap_max),
            platform_min: a.platform_min.min(p.platform_min),
            platform_max: a.platform_max.min(p.platform_max),
            rise_max: a.rise_max.max(p.rise_max),
            moving_chance: a.moving_chance.max(p.moving_chance),
            spinning_chance: a.spinning_chance.max(p.spinning_chance),
            hazard_chance: a.hazard_chance.max(p.hazard_chance),
            disappearing_chance: a.disappearing_chance.max(p.disappearing_chance),
        })
    }
}

/// Built-in envelope table, easiest first.
pub const STANDARD_TABLE: [EnvelopeBounds; 8] = [
    EnvelopeBounds::new((3.0, 4.0), (9.0, 11.0), 0.5),
    EnvelopeBounds::new((4.0, 5.5), (7.0, 9.0), 1.0),
    EnvelopeBounds::new((5.0, 7.0), (6.0, 7.0), 2.0).with_chances(0.05, 0.0, 0.10, 0.0),
    EnvelopeBounds::new((5.0, 7.0), (5.0, 7.0), 2.5).with_chances(0.10, 0.05, 0.15, 0.05),
    EnvelopeBounds::new((6.0, 7.5), (5.0, 6.0), 3.0).with_chances(0.30, 0.10, 0.20, 0.10),
    EnvelopeBounds::new((6.0, 7.5), (4.0, 6.0), 3.0).with_chances(0.40, 0.15, 0.25, 0.15),
    EnvelopeBounds::new((6.5, 8.0), (4.0, 5.0), 3.0).with_chances(0.50, 0.20, 0.30, 0.20),
    EnvelopeBounds::new((6.5, 8.0), (3.0, 5.0), 3.0).with_chances(0.55, 0.25, 0.30, 0.25),
];

/// Per-section difficulty, monotone and capped.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyProfile {
    envelopes: Vec<DifficultyEnvelope>,
}

#[derive(Deserialize)]
struct ProfileFile {
    #[serde(default)]
    envelope: Vec<EnvelopeBounds>,
}

impl DifficultyProfile {
    /// Builds a profile from raw bounds. An empty table yields the standard one.
    #[must_use]
    pub fn new(table: &[EnvelopeBounds]) -> Self {
        let table = if table.is_empty() { &STANDARD_TABLE[..] } else { table };
        let mut envelopes: Vec<DifficultyEnvelope> = Vec::with_capacity(table.len());
        for raw in table {
            let env = DifficultyEnvelope::new(*raw);
            let env = match envelopes.last() {
                Some(prev) => env.at_least(prev),
                None => env,
            };
            envelopes.push(env);
        }
        Self { envelopes }
    }

    /// The built-in eight-step profile.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(&STANDARD_TABLE)
    }

    /// Parses `[[envelope]]` tables from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`](crate::ConfigError::Parse) if the text
    /// is not a valid profile.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let file: ProfileFile = toml::from_str(text)?;
        Ok(Self::new(&file.envelope))
    }

    /// Envelope for a section. Indices past the table reuse the hardest entry.
    #[must_use]
    pub fn envelope_for(&self, section_index: usize) -> &DifficultyEnvelope {
        let last = self.envelopes.len() - 1;
        &self.envelopes[section_index.min(last)]
    }

    /// Highest distinct section index.
    #[must_use]
    pub fn max_section_index(&self) -> usize {
        self.envelopes.len() - 1
    }

    /// All envelopes, easiest first.
    #[must_use]
    pub fn envelopes(&self) -> &[DifficultyEnvelope] {
        &self.envelopes
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::standard()
    }
}
