//! # Feasibility Findings
//!
//! Findings are data, never errors. Each carries enough context for an
//! orchestration layer to decide whether to regenerate.

use obby_core::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Horizontal gap wider than the movement model allows.
    ImpossibleGap,
    /// Rise higher than a jump clears.
    ImpossibleHeight,
    /// Fewer boundary walls than required.
    MissingWalls,
    /// No hazard below the playable platforms.
    MissingHazardFloor,
    /// The floor is reachable and walkable around the course.
    GroundShortcut,
}

impl IssueKind {
    /// Stable kebab-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ImpossibleGap => "impossible-gap",
            Self::ImpossibleHeight => "impossible-height",
            Self::MissingWalls => "missing-walls",
            Self::MissingHazardFloor => "missing-hazard-floor",
            Self::GroundShortcut => "ground-shortcut",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remediation attached to a finding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SuggestedFix {
    /// Move the platforms closer.
    ReduceGap {
        /// Gap to aim for.
        target_gap: f64,
    },
    /// Lower the far platform.
    LowerPlatform {
        /// Studs to lower by.
        by: f64,
    },
    /// Add boundary walls.
    AddWalls {
        /// Walls present.
        walls_found: usize,
        /// Walls required.
        walls_needed: usize,
    },
    /// Add a hazard surface under the course.
    AddHazardFloor {
        /// Hazard top must sit at or below this height.
        below: f64,
    },
    /// Seal the floor with a hazard or lift the course.
    HazardFloorOrRaise {
        /// Clearance the lowest platform needs.
        min_clearance: f64,
    },
}

/// One itemized finding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Category.
    pub kind: IssueKind,
    /// Section the finding belongs to, if known.
    pub section: Option<usize>,
    /// Stage of the far part, if known.
    pub stage: Option<u32>,
    /// Near part of a jump.
    pub from: Option<String>,
    /// Far part of a jump.
    pub to: Option<String>,
    /// Where the problem is.
    pub position: Option<Vec3>,
    /// Measured value (gap, rise, wall count or clearance).
    pub measured: f64,
    /// Limit the measured value broke.
    pub allowed: f64,
    /// Suggested remediation.
    pub fix: SuggestedFix,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(section) = self.section {
            write!(f, " section {section}")?;
        }
        if let Some(stage) = self.stage {
            write!(f, " stage {stage}")?;
        }
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            write!(f, " {from} -> {to}")?;
        }
        write!(f, ": measured {:.2}, allowed {:.2}", self.measured, self.allowed)
    }
}
