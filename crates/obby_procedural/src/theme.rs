//! # Theme Registry
//!
//! Named visual profiles keyed by [`ThemeId`]. The built-in registry is
//! created once and never mutated; per-section overrides produce
//! copy-on-write themes for a single generation run.

use obby_core::{Color3, Material, ThemeId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::debug;

/// A visual profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Display name.
    pub name: String,
    /// Ground color.
    pub floor_color: Color3,
    /// Ground material.
    pub floor_material: Material,
    /// Platform palette.
    pub platform_colors: Vec<Color3>,
    /// Platform material.
    pub platform_material: Material,
    /// Accent palette for movers and highlights.
    pub accent_colors: Vec<Color3>,
    /// Accent material.
    pub accent_material: Material,
    /// Wall palette.
    pub wall_colors: Vec<Color3>,
    /// Wall material.
    pub wall_material: Material,
    /// Lighting hint.
    pub sky_hint: String,
    /// Hazard color, `None` if the theme has no hazards of its own.
    pub hazard_color: Option<Color3>,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Color3]) -> Color3 {
    if palette.is_empty() {
        Color3::WHITE
    } else {
        palette[rng.gen_range(0..palette.len())]
    }
}

impl Theme {
    /// Random platform color.
    pub fn platform_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color3 {
        pick(rng, &self.platform_colors)
    }

    /// Random accent color.
    pub fn accent_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color3 {
        pick(rng, &self.accent_colors)
    }

    /// Random wall color.
    pub fn wall_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color3 {
        pick(rng, &self.wall_colors)
    }

    /// Hazard color, red when the theme has none.
    #[must_use]
    pub fn hazard_or_default(&self) -> Color3 {
        self.hazard_color.unwrap_or(Color3::HAZARD_RED)
    }

    /// Applies an override, clamping colors into range.
    pub fn apply(&mut self, patch: &ThemeOverride) {
        let color = |c: [f64; 3]| Color3::from(c).clamped();
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(c) = patch.platform_color {
            self.platform_colors = vec![color(c)];
        }
        if let Some(m) = patch.platform_material {
            self.platform_material = m;
        }
        if let Some(c) = patch.accent_color {
            self.accent_colors = vec![color(c)];
        }
        if let Some(c) = patch.wall_color {
            self.wall_colors = vec![color(c)];
        }
        if let Some(m) = patch.wall_material {
            self.wall_material = m;
        }
        if let Some(c) = patch.floor_color {
            self.floor_color = color(c);
        }
        if let Some(m) = patch.floor_material {
            self.floor_material = m;
        }
        if let Some(c) = patch.kill_brick_color {
            self.hazard_color = Some(color(c));
        }
    }
}

/// External per-section patch of a theme.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOverride {
    /// Section index the patch applies to.
    pub index: usize,
    /// Replacement display name.
    pub name: Option<String>,
    /// Single platform color.
    pub platform_color: Option<[f64; 3]>,
    /// Platform material.
    pub platform_material: Option<Material>,
    /// Single accent color.
    pub accent_color: Option<[f64; 3]>,
    /// Single wall color.
    pub wall_color: Option<[f64; 3]>,
    /// Wall material.
    pub wall_material: Option<Material>,
    /// Floor color.
    pub floor_color: Option<[f64; 3]>,
    /// Floor material.
    pub floor_material: Option<Material>,
    /// Hazard color.
    pub kill_brick_color: Option<[f64; 3]>,
}

/// Read-only set of built-in themes.
#[derive(Debug)]
pub struct ThemeRegistry {
    /// Indexed by position in [`ThemeId::ALL`].
    themes: Vec<Theme>,
}

static BUILTIN: OnceLock<ThemeRegistry> = OnceLock::new();

impl ThemeRegistry {
    /// The shared built-in registry.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| Self {
            themes: ThemeId::ALL.into_iter().map(builtin_theme).collect(),
        })
    }

    /// Theme for an identifier.
    #[must_use]
    pub fn get(&self, id: ThemeId) -> &Theme {
        &self.themes[id as usize]
    }

    /// Resolves one theme per section, patching copies where overrides apply.
    ///
    /// Overrides naming a section past the end of the sequence are ignored.
    #[must_use]
    pub fn resolve<'a>(
        &'a self,
        sequence: &[ThemeId],
        overrides: &[ThemeOverride],
    ) -> Vec<Cow<'a, Theme>> {
        let mut resolved: Vec<Cow<'a, Theme>> =
            sequence.iter().map(|id| Cow::Borrowed(self.get(*id))).collect();
        for patch in overrides {
            match resolved.get_mut(patch.index) {
                Some(theme) => theme.to_mut().apply(patch),
                None => debug!(index = patch.index, "theme override past last section ignored"),
            }
        }
        resolved
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_theme(id: ThemeId) -> Theme {
    let c = |r: f64, g: f64, b: f64| Color3::new(r, g, b);
    let theme = |name: &str,
                 floor: (Color3, Material),
                 platforms: Vec<Color3>,
                 platform_material: Material,
                 accents: Vec<Color3>,
                 walls: (Vec<Color3>, Material),
                 sky: &str,
                 hazard: Option<Color3>| Theme {
        name: name.to_owned(),
        floor_color: floor.0,
        floor_material: floor.1,
        platform_colors: platforms,
        platform_material,
        accent_colors: accents,
        accent_material: Material::Neon,
        wall_colors: walls.0,
        wall_material: walls.1,
        sky_hint: sky.to_owned(),
        hazard_color: hazard,
    };

    match id {
        ThemeId::Lobby => theme(
            "Spawn Lobby",
            (c(0.3, 0.7, 0.3), Material::Grass),
            vec![c(1.0, 0.85, 0.0), c(0.3, 0.9, 0.3), c(0.4, 0.8, 1.0)],
            Material::SmoothPlastic,
            vec![c(1.0, 1.0, 0.0), c(0.0, 1.0, 0.5)],
            (vec![c(0.9, 0.9, 0.95)], Material::SmoothPlastic),
            "bright day",
            None,
        ),
        ThemeId::LavaVolcano => theme(
            "Volcanic Inferno",
            (c(0.15, 0.08, 0.02), Material::Slate),
            vec![c(0.4, 0.2, 0.1), c(0.6, 0.3, 0.1), c(0.3, 0.15, 0.05)],
            Material::Slate,
            vec![c(1.0, 0.3, 0.0), c(1.0, 0.1, 0.0), c(1.0, 0.6, 0.0)],
            (vec![c(0.2, 0.1, 0.05), c(0.35, 0.15, 0.05)], Material::Granite),
            "red sky",
            Some(c(1.0, 0.15, 0.0)),
        ),
        ThemeId::IceCrystal => theme(
            "Frozen Peaks",
            (c(0.7, 0.85, 1.0), Material::Ice),
            vec![c(0.6, 0.8, 1.0), c(0.4, 0.7, 0.95), c(0.8, 0.9, 1.0)],
            Material::Ice,
            vec![c(0.0, 0.8, 1.0), c(0.5, 0.5, 1.0), c(0.0, 1.0, 1.0)],
            (vec![c(0.85, 0.92, 1.0), c(0.7, 0.85, 0.95)], Material::Glass),
            "snowy",
            Some(c(0.0, 0.2, 0.6)),
        ),
        ThemeId::NeonCyber => theme(
            "Neon Cyber City",
            (c(0.05, 0.05, 0.1), Material::SmoothPlastic),
            vec![c(0.1, 0.1, 0.2), c(0.05, 0.05, 0.15), c(0.15, 0.1, 0.2)],
            Material::SmoothPlastic,
            vec![c(1.0, 0.0, 1.0), c(0.0, 1.0, 1.0), c(1.0, 0.0, 0.5), c(0.5, 0.0, 1.0)],
            (vec![c(0.08, 0.08, 0.15)], Material::Metal),
            "dark neon",
            Some(c(1.0, 0.0, 0.3)),
        ),
        ThemeId::CandyLand => theme(
            "Candy Kingdom",
            (c(1.0, 0.7, 0.8), Material::SmoothPlastic),
            vec![c(1.0, 0.4, 0.6), c(0.6, 0.3, 1.0), c(0.3, 0.9, 0.6), c(1.0, 0.9, 0.3)],
            Material::SmoothPlastic,
            vec![c(1.0, 0.3, 0.5), c(0.4, 1.0, 0.8), c(1.0, 1.0, 0.3)],
            (vec![c(1.0, 0.8, 0.85), c(0.8, 0.6, 1.0)], Material::SmoothPlastic),
            "pink sunset",
            Some(c(0.6, 0.0, 0.3)),
        ),
        ThemeId::SpaceGalaxy => theme(
            "Galactic Odyssey",
            (c(0.02, 0.02, 0.08), Material::SmoothPlastic),
            vec![c(0.2, 0.1, 0.4), c(0.1, 0.2, 0.5), c(0.3, 0.1, 0.3)],
            Material::Metal,
            vec![c(0.5, 0.0, 1.0), c(0.0, 0.5, 1.0), c(1.0, 0.0, 0.8), c(0.0, 1.0, 0.5)],
            (vec![c(0.05, 0.05, 0.15)], Material::DiamondPlate),
            "dark space",
            Some(c(0.3, 0.0, 0.6)),
        ),
        ThemeId::JungleTemple => theme(
            "Ancient Jungle Temple",
            (c(0.15, 0.35, 0.1), Material::Grass),
            vec![c(0.4, 0.35, 0.2), c(0.5, 0.4, 0.25), c(0.3, 0.25, 0.15)],
            Material::Cobblestone,
            vec![c(0.0, 1.0, 0.3), c(0.8, 0.8, 0.0), c(0.0, 0.8, 0.4)],
            (vec![c(0.35, 0.3, 0.2), c(0.25, 0.4, 0.15)], Material::Brick),
            "misty jungle",
            Some(c(0.1, 0.5, 0.0)),
        ),
        ThemeId::RainbowSky => theme(
            "Rainbow Skylands",
            (c(0.4, 0.7, 1.0), Material::SmoothPlastic),
            vec![
                c(1.0, 0.2, 0.2),
                c(1.0, 0.6, 0.0),
                c(1.0, 1.0, 0.0),
                c(0.0, 0.8, 0.0),
                c(0.0, 0.5, 1.0),
                c(0.5, 0.0, 1.0),
            ],
            Material::SmoothPlastic,
            vec![c(1.0, 1.0, 1.0), c(1.0, 0.8, 0.0)],
            (vec![c(0.9, 0.9, 1.0)], Material::SmoothPlastic),
            "bright clouds",
            None,
        ),
    }
}
