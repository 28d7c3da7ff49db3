//! Validation report.

use crate::issue::{IssueKind, ValidationIssue};
use serde::{Deserialize, Serialize};

/// Aggregate counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Stages in the input.
    pub stages_checked: usize,
    /// Sections in the input.
    pub sections_checked: usize,
    /// Consecutive platform pairs inspected.
    pub jumps_checked: usize,
    /// Impossible gaps.
    pub gap_violations: usize,
    /// Impossible rises.
    pub height_violations: usize,
    /// Sections missing walls.
    pub enclosure_violations: usize,
    /// Sections missing a hazard floor.
    pub hazard_floor_violations: usize,
    /// Sections with a ground shortcut.
    pub shortcut_violations: usize,
}

impl ValidationStats {
    fn record(&mut self, kind: IssueKind) {
        match kind {
            IssueKind::ImpossibleGap => self.gap_violations += 1,
            IssueKind::ImpossibleHeight => self.height_violations += 1,
            IssueKind::MissingWalls => self.enclosure_violations += 1,
            IssueKind::MissingHazardFloor => self.hazard_floor_violations += 1,
            IssueKind::GroundShortcut => self.shortcut_violations += 1,
        }
    }
}

/// Result of one validation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True exactly when `issues` is empty.
    pub valid: bool,
    /// Itemized findings, ordered by section then by traversal.
    pub issues: Vec<ValidationIssue>,
    /// Aggregate counts.
    pub stats: ValidationStats,
}

impl ValidationReport {
    /// Builds a report, deriving counts and validity from the issues.
    #[must_use]
    pub fn new(issues: Vec<ValidationIssue>, mut stats: ValidationStats) -> Self {
        for issue in &issues {
            stats.record(issue.kind);
        }
        Self {
            valid: issues.is_empty(),
            issues,
            stats,
        }
    }

    /// Returns true if no issue was recorded.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Number of issues of one kind.
    #[must_use]
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues_of(kind).count()
    }

    /// One-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let s = &self.stats;
        format!(
            "{}: {} stages, {} sections, {} jumps; gaps {}, heights {}, walls {}, hazard floors {}, shortcuts {}",
            if self.valid { "VALID" } else { "INVALID" },
            s.stages_checked,
            s.sections_checked,
            s.jumps_checked,
            s.gap_violations,
            s.height_violations,
            s.enclosure_violations,
            s.hazard_floor_violations,
            s.shortcut_violations,
        )
    }
}
