//! Surface materials, primitive shapes and motion axes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surface material of a primitive.
///
/// The numeric codes are the scene format's material enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Material {
    Plastic,
    SmoothPlastic,
    Neon,
    Wood,
    WoodPlanks,
    Marble,
    Slate,
    Concrete,
    Granite,
    Brick,
    Pebble,
    Cobblestone,
    CorrodedMetal,
    DiamondPlate,
    Foil,
    Metal,
    Grass,
    Sand,
    Fabric,
    Ice,
    Glass,
    ForceField,
}

impl Material {
    /// All materials, in code order.
    pub const ALL: [Self; 22] = [
        Self::Plastic,
        Self::SmoothPlastic,
        Self::Neon,
        Self::Wood,
        Self::WoodPlanks,
        Self::Marble,
        Self::Slate,
        Self::Concrete,
        Self::Granite,
        Self::Brick,
        Self::Pebble,
        Self::Cobblestone,
        Self::CorrodedMetal,
        Self::DiamondPlate,
        Self::Foil,
        Self::Metal,
        Self::Grass,
        Self::Sand,
        Self::Fabric,
        Self::Ice,
        Self::Glass,
        Self::ForceField,
    ];

    /// Numeric token written to the scene file.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Plastic => 256,
            Self::SmoothPlastic => 272,
            Self::Neon => 288,
            Self::Wood => 512,
            Self::WoodPlanks => 528,
            Self::Marble => 784,
            Self::Slate => 800,
            Self::Concrete => 816,
            Self::Granite => 832,
            Self::Brick => 848,
            Self::Pebble => 864,
            Self::Cobblestone => 880,
            Self::CorrodedMetal => 1040,
            Self::DiamondPlate => 1056,
            Self::Foil => 1072,
            Self::Metal => 1088,
            Self::Grass => 1280,
            Self::Sand => 1296,
            Self::Fabric => 1312,
            Self::Ice => 1536,
            Self::Glass => 1568,
            Self::ForceField => 1584,
        }
    }

    /// Looks a material up by its scene-format name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Scene-format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::SmoothPlastic => "SmoothPlastic",
            Self::Neon => "Neon",
            Self::Wood => "Wood",
            Self::WoodPlanks => "WoodPlanks",
            Self::Marble => "Marble",
            Self::Slate => "Slate",
            Self::Concrete => "Concrete",
            Self::Granite => "Granite",
            Self::Brick => "Brick",
            Self::Pebble => "Pebble",
            Self::Cobblestone => "Cobblestone",
            Self::CorrodedMetal => "CorrodedMetal",
            Self::DiamondPlate => "DiamondPlate",
            Self::Foil => "Foil",
            Self::Metal => "Metal",
            Self::Grass => "Grass",
            Self::Sand => "Sand",
            Self::Fabric => "Fabric",
            Self::Ice => "Ice",
            Self::Glass => "Glass",
            Self::ForceField => "ForceField",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometric shape of a primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Axis-aligned box.
    #[default]
    Box,
    /// Sphere.
    Sphere,
    /// Cylinder along the X axis.
    Cylinder,
}

impl PrimitiveKind {
    /// Shape token written to the scene file.
    #[must_use]
    pub const fn shape_token(self) -> u32 {
        match self {
            Self::Sphere => 0,
            Self::Box => 1,
            Self::Cylinder => 2,
        }
    }
}

/// Motion or spin axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Lateral.
    X,
    /// Vertical.
    Y,
    /// Traversal.
    Z,
}

impl Axis {
    /// Lowercase axis label used in attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}
