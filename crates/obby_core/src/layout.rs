//! # World Layout
//!
//! Sections, stages and the generation output triple.

use crate::ids::{ArchetypeId, ThemeId};
use crate::math::Vec3;
use crate::primitive::Primitive;
use serde::{Deserialize, Serialize};

/// One themed, enclosed region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// 0-based traversal order.
    pub index: usize,
    /// Theme identifier.
    pub theme: ThemeId,
    /// Display name, possibly overridden.
    pub theme_name: String,
    /// Spatial origin.
    pub origin: Vec3,
    /// First owned stage, 1-based.
    pub first_stage: u32,
    /// Last owned stage, inclusive.
    pub last_stage: u32,
    /// Where a player arrives.
    pub entry: Vec3,
    /// Exit marker position.
    pub exit: Vec3,
    /// Teleport destination of the exit, `None` for the terminal section.
    pub teleport_target: Option<Vec3>,
    /// Indices of the enclosure walls in the world's primitive list.
    pub walls: Vec<usize>,
    /// Lighting hint for the sky.
    pub sky_hint: String,
}

impl Section {
    /// Returns true for the last section, whose exit is the victory pad.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.teleport_target.is_none()
    }

    /// Returns true for the spawn section.
    #[inline]
    #[must_use]
    pub const fn is_tutorial(&self) -> bool {
        self.index == 0
    }

    /// Number of owned stages.
    #[inline]
    #[must_use]
    pub const fn stage_count(&self) -> u32 {
        self.last_stage + 1 - self.first_stage
    }
}

/// One obstacle instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Global number, 1-based and unique.
    pub number: u32,
    /// Owning section.
    pub section: usize,
    /// Obstacle archetype.
    pub archetype: ArchetypeId,
    /// Anchor position the archetype was built at.
    pub anchor: Vec3,
}

/// Output of one generation call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Every placed object.
    pub primitives: Vec<Primitive>,
    /// Stages in global order.
    pub stages: Vec<Stage>,
    /// Sections in traversal order.
    pub sections: Vec<Section>,
}

impl World {
    /// Number of stages.
    #[inline]
    #[must_use]
    pub fn total_stages(&self) -> usize {
        self.stages.len()
    }

    /// Distinct themes in first-use order.
    #[must_use]
    pub fn themes_used(&self) -> Vec<ThemeId> {
        let mut used = Vec::new();
        for section in &self.sections {
            if !used.contains(&section.theme) {
                used.push(section.theme);
            }
        }
        used
    }

    /// Primitives owned by one section.
    pub fn section_parts(&self, section: usize) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(move |p| p.section == Some(section))
    }
}
