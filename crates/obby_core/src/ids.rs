//! Theme and archetype identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown identifier in external input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{name}`")]
pub struct UnknownId {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected name.
    pub name: String,
}

/// Built-in visual theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ThemeId {
    Lobby,
    LavaVolcano,
    IceCrystal,
    NeonCyber,
    CandyLand,
    SpaceGalaxy,
    JungleTemple,
    RainbowSky,
}

impl ThemeId {
    /// Every built-in theme.
    pub const ALL: [Self; 8] = [
        Self::Lobby,
        Self::LavaVolcano,
        Self::IceCrystal,
        Self::NeonCyber,
        Self::CandyLand,
        Self::SpaceGalaxy,
        Self::JungleTemple,
        Self::RainbowSky,
    ];

    /// Sequence used when the caller supplies none: easy and bright first.
    pub const DEFAULT_SEQUENCE: [Self; 8] = [
        Self::Lobby,
        Self::CandyLand,
        Self::JungleTemple,
        Self::LavaVolcano,
        Self::IceCrystal,
        Self::NeonCyber,
        Self::SpaceGalaxy,
        Self::RainbowSky,
    ];

    /// Snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::LavaVolcano => "lava_volcano",
            Self::IceCrystal => "ice_crystal",
            Self::NeonCyber => "neon_cyber",
            Self::CandyLand => "candy_land",
            Self::SpaceGalaxy => "space_galaxy",
            Self::JungleTemple => "jungle_temple",
            Self::RainbowSky => "rainbow_sky",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or(UnknownId {
                kind: "theme",
                name: s.to_owned(),
            })
    }
}

/// Obstacle archetype chosen for a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeId {
    /// Single static platform.
    Platform,
    /// Platform sliding along one axis.
    MovingPlatform,
    /// Platform bobbing up and down.
    VerticalOscillator,
    /// Platform with a rotating hazard bar above it.
    Spinner,
    /// Wide floor crossed by swinging hazards.
    Pendulum,
    /// Long narrow beam.
    ThinBeam,
    /// Rising steps.
    Staircase,
    /// Platforms alternating left and right.
    Zigzag,
    /// Hazard floor with a path of safe pads.
    HazardGauntlet,
    /// Tall pillars with small tops.
    PillarHop,
    /// Pads that vanish after touch.
    DisappearingPath,
    /// Ledges climbing between two walls.
    WallClimb,
}

impl ArchetypeId {
    /// Every archetype.
    pub const ALL: [Self; 12] = [
        Self::Platform,
        Self::MovingPlatform,
        Self::VerticalOscillator,
        Self::Spinner,
        Self::Pendulum,
        Self::ThinBeam,
        Self::Staircase,
        Self::Zigzag,
        Self::HazardGauntlet,
        Self::PillarHop,
        Self::DisappearingPath,
        Self::WallClimb,
    ];

    /// Snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::MovingPlatform => "moving_platform",
            Self::VerticalOscillator => "vertical_oscillator",
            Self::Spinner => "spinner",
            Self::Pendulum => "pendulum",
            Self::ThinBeam => "thin_beam",
            Self::Staircase => "staircase",
            Self::Zigzag => "zigzag",
            Self::HazardGauntlet => "hazard_gauntlet",
            Self::PillarHop => "pillar_hop",
            Self::DisappearingPath => "disappearing_path",
            Self::WallClimb => "wall_climb",
        }
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
