//! # Geometry Primitives
//!
//! One placed object in the world plus the semantic flags that drive
//! validation and serialization.

use crate::material::{Axis, Material, PrimitiveKind};
use crate::math::{Color3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest size component a primitive may have.
pub const MIN_PART_SIZE: f64 = 0.05;

/// Closed set of semantic roles a primitive can carry.
///
/// Stored as a bitset; serialized as a list of role names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct SemanticFlags(u32);

impl SemanticFlags {
    /// No roles.
    pub const NONE: Self = Self(0);
    /// Touching it ends the run.
    pub const HAZARD: Self = Self(1 << 0);
    /// Respawn point.
    pub const CHECKPOINT: Self = Self(1 << 1);
    /// Relocates the player to `teleport_to`.
    pub const TELEPORT_SOURCE: Self = Self(1 << 2);
    /// Arrival point of a teleport.
    pub const TELEPORT_TARGET: Self = Self(1 << 3);
    /// First pad of a section.
    pub const SECTION_ENTRY: Self = Self(1 << 4);
    /// One of a section's enclosure walls.
    pub const BOUNDARY_WALL: Self = Self(1 << 5);
    /// Ground plane of a section.
    pub const FLOOR: Self = Self(1 << 6);
    /// Scenery, never part of the path.
    pub const DECORATIVE: Self = Self(1 << 7);
    /// Carries a motion descriptor.
    pub const MOVING: Self = Self(1 << 8);
    /// Carries a spin descriptor.
    pub const SPINNING: Self = Self(1 << 9);
    /// Vanishes shortly after being touched.
    pub const DISAPPEARING: Self = Self(1 << 10);
    /// Final pad of the world.
    pub const VICTORY: Self = Self(1 << 11);
    /// Player spawn marker.
    pub const SPAWN: Self = Self(1 << 12);
    /// Sign naming a stage.
    pub const STAGE_MARKER: Self = Self(1 << 13);
    /// Any other text-bearing sign.
    pub const SIGN: Self = Self(1 << 14);
    /// Load-bearing geometry that is not stood on (pillar bodies, climb walls).
    pub const STRUCTURE: Self = Self(1 << 15);
    /// Platform inserted to shorten a traversal segment.
    pub const BRIDGE: Self = Self(1 << 16);

    /// Every role with its name, in bit order.
    pub const NAMED: [(Self, &'static str); 17] = [
        (Self::HAZARD, "hazard"),
        (Self::CHECKPOINT, "checkpoint"),
        (Self::TELEPORT_SOURCE, "teleport_source"),
        (Self::TELEPORT_TARGET, "teleport_target"),
        (Self::SECTION_ENTRY, "section_entry"),
        (Self::BOUNDARY_WALL, "boundary_wall"),
        (Self::FLOOR, "floor"),
        (Self::DECORATIVE, "decorative"),
        (Self::MOVING, "moving"),
        (Self::SPINNING, "spinning"),
        (Self::DISAPPEARING, "disappearing"),
        (Self::VICTORY, "victory"),
        (Self::SPAWN, "spawn"),
        (Self::STAGE_MARKER, "stage_marker"),
        (Self::SIGN, "sign"),
        (Self::STRUCTURE, "structure"),
        (Self::BRIDGE, "bridge"),
    ];

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if no role is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every role in `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any role in `other` is set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Adds roles in place.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the roles that are set, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }

    /// A ground-plane piece is a floor or a wall, never both.
    #[must_use]
    pub const fn is_ground_consistent(self) -> bool {
        !(self.contains(Self::FLOOR) && self.contains(Self::BOUNDARY_WALL))
    }
}

impl std::ops::BitOr for SemanticFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<SemanticFlags> for Vec<String> {
    fn from(flags: SemanticFlags) -> Self {
        flags.names().map(str::to_owned).collect()
    }
}

impl TryFrom<Vec<String>> for SemanticFlags {
    type Error = String;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut flags = Self::NONE;
        for name in &names {
            let (flag, _) = Self::NAMED
                .iter()
                .find(|(_, n)| *n == name.as_str())
                .ok_or_else(|| format!("unknown semantic flag `{name}`"))?;
            flags.insert(*flag);
        }
        Ok(flags)
    }
}

impl fmt::Display for SemanticFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Back-and-forth translation along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Direction of travel.
    pub axis: Axis,
    /// Peak displacement in studs.
    pub distance: f64,
    /// Cycle speed.
    pub speed: f64,
}

/// Continuous rotation about an axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    /// Angular speed.
    pub speed: f64,
    /// Rotation axis.
    pub axis: Axis,
}

/// Readable text shown on a primitive's face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Display text. May contain newlines.
    pub text: String,
    /// Text color.
    pub color: Color3,
    /// Shown on both the front and back faces.
    pub double_sided: bool,
}

/// One placed object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Item name.
    pub name: String,
    /// Shape.
    pub kind: PrimitiveKind,
    /// Center position.
    pub position: Vec3,
    /// Full extents, all components positive.
    pub size: Vec3,
    /// Surface color.
    pub color: Color3,
    /// Surface material.
    pub material: Material,
    /// Transparency in `[0, 1]`.
    pub transparency: f64,
    /// Fixed in place.
    pub anchored: bool,
    /// Takes part in collisions.
    pub collidable: bool,
    /// Optional translation.
    pub motion: Option<Motion>,
    /// Optional rotation.
    pub spin: Option<Spin>,
    /// Semantic roles.
    pub flags: SemanticFlags,
    /// Owning section.
    pub section: Option<usize>,
    /// Owning stage, 1-based.
    pub stage: Option<u32>,
    /// Destination for teleport sources.
    pub teleport_to: Option<Vec3>,
    /// Optional label.
    pub caption: Option<Caption>,
}

impl Primitive {
    /// Creates an anchored, collidable box.
    ///
    /// Size components are raised to [`MIN_PART_SIZE`].
    #[must_use]
    pub fn block(name: impl Into<String>, position: Vec3, size: Vec3) -> Self {
        let fix = |v: f64| v.max(MIN_PART_SIZE);
        Self {
            name: name.into(),
            kind: PrimitiveKind::Box,
            position,
            size: Vec3::new(fix(size.x), fix(size.y), fix(size.z)),
            color: Color3::WHITE,
            material: Material::SmoothPlastic,
            transparency: 0.0,
            anchored: true,
            collidable: true,
            motion: None,
            spin: None,
            flags: SemanticFlags::NONE,
            section: None,
            stage: None,
            teleport_to: None,
            caption: None,
        }
    }

    /// Sets the shape.
    #[must_use]
    pub fn shaped(mut self, kind: PrimitiveKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets color, clamped to the valid range.
    #[must_use]
    pub fn colored(mut self, color: Color3) -> Self {
        self.color = color.clamped();
        self
    }

    /// Sets the material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Sets transparency, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = if transparency.is_finite() {
            transparency.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Disables collisions.
    #[must_use]
    pub fn intangible(mut self) -> Self {
        self.collidable = false;
        self
    }

    /// Adds semantic roles.
    #[must_use]
    pub fn flagged(mut self, flags: SemanticFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Attaches a motion descriptor and marks the part as moving.
    #[must_use]
    pub fn moving(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self.flags.insert(SemanticFlags::MOVING);
        self
    }

    /// Attaches a spin descriptor and marks the part as spinning.
    #[must_use]
    pub fn spinning(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self.flags.insert(SemanticFlags::SPINNING);
        self
    }

    /// Makes the part a teleport source.
    #[must_use]
    pub fn teleporting_to(mut self, target: Vec3) -> Self {
        self.teleport_to = Some(target);
        self.flags.insert(SemanticFlags::TELEPORT_SOURCE);
        self
    }

    /// Attaches a label.
    #[must_use]
    pub fn captioned(mut self, text: impl Into<String>, color: Color3, double_sided: bool) -> Self {
        self.caption = Some(Caption {
            text: text.into(),
            color,
            double_sided,
        });
        self
    }

    /// Assigns section and stage ownership.
    #[must_use]
    pub fn owned_by(mut self, section: usize, stage: Option<u32>) -> Self {
        self.section = Some(section);
        self.stage = stage;
        self
    }

    /// Returns true if the part carries any of the given roles.
    #[inline]
    #[must_use]
    pub const fn has(&self, flags: SemanticFlags) -> bool {
        self.flags.intersects(flags)
    }

    /// Y of the top face.
    #[inline]
    #[must_use]
    pub fn top(&self) -> f64 {
        self.position.y + self.size.y * 0.5
    }

    /// Y of the bottom face.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y - self.size.y * 0.5
    }

    /// Leading edge along the traversal axis.
    #[inline]
    #[must_use]
    pub fn min_z(&self) -> f64 {
        self.position.z - self.size.z * 0.5
    }

    /// Trailing edge along the traversal axis.
    #[inline]
    #[must_use]
    pub fn max_z(&self) -> f64 {
        self.position.z + self.size.z * 0.5
    }

    /// Point standing on the center of the top face.
    #[inline]
    #[must_use]
    pub fn surface_point(&self) -> Vec3 {
        Vec3::new(self.position.x, self.top(), self.position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size_corrected() {
        let p = Primitive::block("p", Vec3::ZERO, Vec3::new(0.0, -3.0, f64::NAN));
        assert!(p.size.x > 0.0 && p.size.y > 0.0 && p.size.z > 0.0);
    }

    #[test]
    fn test_flags_contains() {
        let f = SemanticFlags::HAZARD | SemanticFlags::FLOOR;
        assert!(f.contains(SemanticFlags::HAZARD));
        assert!(f.intersects(SemanticFlags::FLOOR | SemanticFlags::SPAWN));
        assert!(!f.contains(SemanticFlags::FLOOR | SemanticFlags::SPAWN));
        assert!(f.is_ground_consistent());
        assert!(!(SemanticFlags::FLOOR | SemanticFlags::BOUNDARY_WALL).is_ground_consistent());
    }

    #[test]
    fn test_flags_serde_names() {
        let f = SemanticFlags::CHECKPOINT | SemanticFlags::BRIDGE;
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r#"["checkpoint","bridge"]"#);
        let back: SemanticFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert!(serde_json::from_str::<SemanticFlags>(r#"["lava"]"#).is_err());
    }

    #[test]
    fn test_moving_sets_flag() {
        let p = Primitive::block("m", Vec3::ZERO, Vec3::new(4.0, 1.0, 4.0)).moving(Motion {
            axis: Axis::X,
            distance: 6.0,
            speed: 3.0,
        });
        assert!(p.has(SemanticFlags::MOVING));
        assert_eq!(p.top(), 0.5);
        assert_eq!(p.max_z(), 2.0);
    }
}
