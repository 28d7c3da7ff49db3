//! # Feasibility Validator
//!
//! Pure check of a generated world against the movement model. No I/O,
//! no shared state; sections are checked in parallel and merged in order.
//!
//! ## Checks
//!
//! - **Jumps**: every consecutive jump-critical pair, in traversal order
//! - **Enclosure**: boundary wall count per section
//! - **Hazard floor**: a hazard under the course (tutorial exempt)
//! - **Ground shortcut**: an open floor close under the course (tutorial exempt)

use crate::config::ValidatorConfig;
use crate::issue::{IssueKind, SuggestedFix, ValidationIssue};
use crate::report::{ValidationReport, ValidationStats};
use obby_core::movement::{allowed_gap, edge_gap, vertical_delta};
use obby_core::{is_jump_critical, traversal_order, Primitive, Section, SemanticFlags, Stage};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Share of the allowed gap a fix should aim for.
const GAP_FIX_RATIO: f64 = 0.85;

/// Post-generation feasibility validator.
#[derive(Clone, Debug, Default)]
pub struct PhysicsValidator {
    config: ValidatorConfig,
}

/// Parts of one section, as indices into the input slice.
struct Group<'a> {
    section: Option<usize>,
    info: Option<&'a Section>,
    parts: Vec<usize>,
}

impl PhysicsValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a world.
    ///
    /// Parts are grouped by their section, falling back to the section of
    /// their stage. Parts owned by nothing are checked as one group for
    /// jumps only.
    #[must_use]
    pub fn validate(&self, primitives: &[Primitive], stages: &[Stage], sections: &[Section]) -> ValidationReport {
        let groups = group_by_section(primitives, stages, sections);

        let results: Vec<(usize, Vec<ValidationIssue>)> = groups
            .par_iter()
            .map(|group| {
                let (jumps, mut issues) = self.check_jumps(primitives, group);
                if let Some(section) = group.info {
                    issues.extend(self.check_enclosure(primitives, group, section));
                    if !section.is_tutorial() {
                        issues.extend(self.check_hazard_floor(primitives, group, section));
                        issues.extend(self.check_shortcut(primitives, group, section));
                    }
                }
                (jumps, issues)
            })
            .collect();

        let mut stats = ValidationStats {
            stages_checked: stages.len(),
            sections_checked: sections.len(),
            ..ValidationStats::default()
        };
        let mut issues = Vec::new();
        for (jumps, found) in results {
            stats.jumps_checked += jumps;
            issues.extend(found);
        }
        for issue in &issues {
            debug!(%issue, "feasibility issue");
        }

        let report = ValidationReport::new(issues, stats);
        info!(summary = %report.summary(), "validation finished");
        report
    }

    fn check_jumps(&self, primitives: &[Primitive], group: &Group<'_>) -> (usize, Vec<ValidationIssue>) {
        let order = traversal_order(group.parts.iter().map(|&i| (i, &primitives[i])));
        let mut issues = Vec::new();
        for pair in order.windows(2) {
            let (a, b) = (&primitives[pair[0]], &primitives[pair[1]]);
            let gap = edge_gap(a, b);
            let dy = vertical_delta(a, b);
            let allowed = allowed_gap(self.config.base_safe_gap, dy);
            let jump = |kind, measured, allowed, fix| ValidationIssue {
                kind,
                section: group.section,
                stage: b.stage,
                from: Some(a.name.clone()),
                to: Some(b.name.clone()),
                position: Some(b.position),
                measured,
                allowed,
                fix,
            };
            if gap > allowed {
                issues.push(jump(
                    IssueKind::ImpossibleGap,
                    gap,
                    allowed,
                    SuggestedFix::ReduceGap {
                        target_gap: allowed.max(0.0) * GAP_FIX_RATIO,
                    },
                ));
            }
            if dy > self.config.max_rise {
                issues.push(jump(
                    IssueKind::ImpossibleHeight,
                    dy,
                    self.config.max_rise,
                    SuggestedFix::LowerPlatform {
                        by: dy - self.config.max_rise,
                    },
                ));
            }
        }
        (order.len().saturating_sub(1), issues)
    }

    fn check_enclosure(&self, primitives: &[Primitive], group: &Group<'_>, section: &Section) -> Option<ValidationIssue> {
        let found = group.parts.iter().filter(|&&i| is_boundary_wall(&primitives[i])).count();
        let needed = self.config.walls_required;
        (found < needed).then(|| ValidationIssue {
            kind: IssueKind::MissingWalls,
            section: Some(section.index),
            stage: None,
            from: None,
            to: None,
            position: Some(section.origin),
            measured: found as f64,
            allowed: needed as f64,
            fix: SuggestedFix::AddWalls {
                walls_found: found,
                walls_needed: needed,
            },
        })
    }

    fn check_hazard_floor(&self, primitives: &[Primitive], group: &Group<'_>, section: &Section) -> Option<ValidationIssue> {
        let lowest = lowest_platform(primitives, group).unwrap_or(f64::INFINITY);
        let sealed = group
            .parts
            .iter()
            .map(|&i| &primitives[i])
            .any(|p| p.has(SemanticFlags::HAZARD) && p.top() <= lowest);
        (!sealed).then(|| ValidationIssue {
            kind: IssueKind::MissingHazardFloor,
            section: Some(section.index),
            stage: None,
            from: None,
            to: None,
            position: Some(section.origin),
            measured: 0.0,
            allowed: 1.0,
            fix: SuggestedFix::AddHazardFloor {
                below: if lowest.is_finite() { lowest } else { 0.0 },
            },
        })
    }

    fn check_shortcut(&self, primitives: &[Primitive], group: &Group<'_>, section: &Section) -> Option<ValidationIssue> {
        let parts = || group.parts.iter().map(|&i| &primitives[i]);
        let floor_top = parts()
            .filter(|p| p.has(SemanticFlags::FLOOR))
            .map(Primitive::top)
            .fold(f64::NEG_INFINITY, f64::max);
        let lowest = lowest_platform(primitives, group)?;
        if !floor_top.is_finite() {
            return None;
        }
        let clearance = lowest - floor_top;
        if clearance >= self.config.shortcut_clearance {
            return None;
        }
        let reach = self.config.hazard_proximity;
        let sealed = parts().any(|p| p.has(SemanticFlags::HAZARD) && (p.top() - floor_top).abs() <= reach);
        (!sealed).then(|| ValidationIssue {
            kind: IssueKind::GroundShortcut,
            section: Some(section.index),
            stage: None,
            from: None,
            to: None,
            position: Some(section.origin),
            measured: clearance,
            allowed: self.config.shortcut_clearance,
            fix: SuggestedFix::HazardFloorOrRaise {
                min_clearance: self.config.shortcut_clearance,
            },
        })
    }
}

fn is_boundary_wall(part: &Primitive) -> bool {
    part.has(SemanticFlags::BOUNDARY_WALL)
        || (part.flags.is_empty() && part.name.to_ascii_lowercase().contains("wall"))
}

fn lowest_platform(primitives: &[Primitive], group: &Group<'_>) -> Option<f64> {
    group
        .parts
        .iter()
        .map(|&i| &primitives[i])
        .filter(|p| is_jump_critical(p))
        .map(Primitive::bottom)
        .min_by(f64::total_cmp)
}

fn group_by_section<'a>(primitives: &[Primitive], stages: &[Stage], sections: &'a [Section]) -> Vec<Group<'a>> {
    let stage_section: HashMap<u32, usize> = stages.iter().map(|s| (s.number, s.section)).collect();
    let mut by_section: BTreeMap<Option<usize>, Vec<usize>> = BTreeMap::new();
    for section in sections {
        by_section.entry(Some(section.index)).or_default();
    }
    for (i, part) in primitives.iter().enumerate() {
        let owner = part
            .section
            .or_else(|| part.stage.and_then(|n| stage_section.get(&n).copied()));
        by_section.entry(owner).or_default().push(i);
    }
    by_section
        .into_iter()
        .map(|(section, parts)| Group {
            section,
            info: section.and_then(|idx| sections.iter().find(|s| s.index == idx)),
            parts,
        })
        .collect()
}
