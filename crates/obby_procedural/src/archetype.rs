//! # Obstacle Archetype Library
//!
//! Each archetype is a pure function of `(rng state, envelope, theme)`
//! that returns the primitives of one stage, anchored at a cursor
//! position. Parts are laid out in increasing Z so the traversal order of
//! an obstacle matches the order it was built in.
//!
//! Archetypes are only "creative"; hard reachability limits are enforced
//! afterwards by the repair pass.

use crate::difficulty::DifficultyEnvelope;
use crate::theme::Theme;
use obby_core::{
    ArchetypeId, Axis, Color3, Material, Motion, Primitive, PrimitiveKind, SemanticFlags, Spin,
    Vec3,
};
use rand::Rng;

/// Narrowest walkway, equal to the character hitbox.
pub const BEAM_MIN_WIDTH: f64 = 2.0;

/// Hazard gauntlet floor width.
const GAUNTLET_WIDTH: f64 = 14.0;

/// Inner distance between wall-climb walls.
const CLIMB_WALL_SPACING: f64 = 12.0;

/// Height gained per wall-climb ledge.
const CLIMB_LEDGE_RISE: f64 = 5.0;

/// Inputs shared by every archetype.
#[derive(Clone, Copy, Debug)]
pub struct ObstacleContext<'a> {
    /// Cursor position the obstacle starts at.
    pub anchor: Vec3,
    /// Section difficulty.
    pub envelope: &'a DifficultyEnvelope,
    /// Section theme.
    pub theme: &'a Theme,
    /// Global stage number, used for part names.
    pub stage: u32,
}

impl ObstacleContext<'_> {
    fn name(&self, label: &str) -> String {
        format!("Stage{}_{}", self.stage, label)
    }

    fn platform<R: Rng + ?Sized>(&self, rng: &mut R, label: &str, position: Vec3, size: Vec3) -> Primitive {
        Primitive::block(self.name(label), position, size)
            .colored(self.theme.platform_color(rng))
            .with_material(self.theme.platform_material)
    }

    fn accent<R: Rng + ?Sized>(&self, rng: &mut R, label: &str, position: Vec3, size: Vec3) -> Primitive {
        Primitive::block(self.name(label), position, size)
            .colored(self.theme.accent_color(rng))
            .with_material(self.theme.accent_material)
    }

    fn hazard(&self, label: &str, position: Vec3, size: Vec3) -> Primitive {
        Primitive::block(self.name(label), position, size)
            .colored(self.theme.hazard_or_default())
            .with_material(Material::Neon)
            .flagged(SemanticFlags::HAZARD)
    }
}

/// Built obstacle.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Archetype actually built (may differ from the one requested).
    pub archetype: ArchetypeId,
    /// Produced primitives, in traversal order.
    pub parts: Vec<Primitive>,
}

/// Uniform draw in `[lo, hi]`; returns `lo` for an empty range.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Rounds to 0.1 studs.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn side<R: Rng + ?Sized>(rng: &mut R, env: &DifficultyEnvelope) -> f64 {
    uniform(rng, env.platform_min, env.platform_max)
        .round()
        .clamp(env.platform_min, env.platform_max)
}

const TIER_1: &[ArchetypeId] = &[ArchetypeId::Platform, ArchetypeId::ThinBeam, ArchetypeId::Staircase];
const TIER_2: &[ArchetypeId] = &[
    ArchetypeId::Platform,
    ArchetypeId::ThinBeam,
    ArchetypeId::Staircase,
    ArchetypeId::Zigzag,
];
const TIER_3: &[ArchetypeId] = &[
    ArchetypeId::Platform,
    ArchetypeId::ThinBeam,
    ArchetypeId::Staircase,
    ArchetypeId::Zigzag,
    ArchetypeId::HazardGauntlet,
];
const TIER_4: &[ArchetypeId] = &[
    ArchetypeId::Zigzag,
    ArchetypeId::HazardGauntlet,
    ArchetypeId::PillarHop,
    ArchetypeId::MovingPlatform,
    ArchetypeId::ThinBeam,
];
const TIER_5: &[ArchetypeId] = &[
    ArchetypeId::Zigzag,
    ArchetypeId::HazardGauntlet,
    ArchetypeId::PillarHop,
    ArchetypeId::MovingPlatform,
    ArchetypeId::ThinBeam,
    ArchetypeId::VerticalOscillator,
    ArchetypeId::Spinner,
    ArchetypeId::DisappearingPath,
];
const TIER_6: &[ArchetypeId] = &[
    ArchetypeId::Zigzag,
    ArchetypeId::HazardGauntlet,
    ArchetypeId::PillarHop,
    ArchetypeId::MovingPlatform,
    ArchetypeId::ThinBeam,
    ArchetypeId::VerticalOscillator,
    ArchetypeId::Spinner,
    ArchetypeId::DisappearingPath,
    ArchetypeId::Pendulum,
    ArchetypeId::WallClimb,
];

/// Archetypes unlocked at a section index.
#[must_use]
pub fn tier(section_index: usize) -> &'static [ArchetypeId] {
    match section_index {
        0 => TIER_1,
        1 => TIER_2,
        2 | 3 => TIER_3,
        4 => TIER_4,
        5 => TIER_5,
        _ => TIER_6,
    }
}

/// Picks the archetype for one stage.
///
/// The hazard and spinning chances force those archetypes when unlocked;
/// otherwise the pick is uniform over the tier.
pub fn choose_archetype<R: Rng + ?Sized>(
    rng: &mut R,
    section_index: usize,
    env: &DifficultyEnvelope,
) -> ArchetypeId {
    let unlocked = tier(section_index);
    if unlocked.contains(&ArchetypeId::HazardGauntlet) && rng.gen_bool(env.hazard_chance) {
        return ArchetypeId::HazardGauntlet;
    }
    if unlocked.contains(&ArchetypeId::Spinner) && rng.gen_bool(env.spinning_chance) {
        return ArchetypeId::Spinner;
    }
    unlocked[rng.gen_range(0..unlocked.len())]
}

/// Fixed cursor advance for multi-platform archetypes, `None` when the
/// advance follows the drawn gap instead.
#[must_use]
pub const fn advance_range(id: ArchetypeId) -> Option<(f64, f64)> {
    match id {
        ArchetypeId::ThinBeam
        | ArchetypeId::HazardGauntlet
        | ArchetypeId::Zigzag
        | ArchetypeId::WallClimb
        | ArchetypeId::Pendulum => Some((30.0, 45.0)),
        ArchetypeId::Staircase | ArchetypeId::PillarHop | ArchetypeId::DisappearingPath => {
            Some((20.0, 35.0))
        }
        _ => None,
    }
}

/// Builds one obstacle.
pub fn build_obstacle<R: Rng + ?Sized>(
    id: ArchetypeId,
    ctx: &ObstacleContext<'_>,
    rng: &mut R,
) -> Obstacle {
    let parts = match id {
        ArchetypeId::Platform => platform(ctx, rng),
        ArchetypeId::MovingPlatform => moving_platform(ctx, rng),
        ArchetypeId::VerticalOscillator => vertical_oscillator(ctx, rng),
        ArchetypeId::Spinner => spinner(ctx, rng),
        ArchetypeId::Pendulum => pendulum(ctx, rng),
        ArchetypeId::ThinBeam => thin_beam(ctx, rng),
        ArchetypeId::Staircase => staircase(ctx, rng),
        ArchetypeId::Zigzag => zigzag(ctx, rng),
        ArchetypeId::HazardGauntlet => {
            if ctx.theme.hazard_color.is_none() {
                return Obstacle {
                    archetype: ArchetypeId::Platform,
                    parts: platform(ctx, rng),
                };
            }
            hazard_gauntlet(ctx, rng)
        }
        ArchetypeId::PillarHop => pillar_hop(ctx, rng),
        ArchetypeId::DisappearingPath => disappearing_path(ctx, rng),
        ArchetypeId::WallClimb => wall_climb(ctx, rng),
    };
    Obstacle { archetype: id, parts }
}

fn platform<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let env = ctx.envelope;
    let size = Vec3::new(side(rng, env), 1.0, side(rng, env));
    let mut part = ctx.platform(rng, "Platform", ctx.anchor, size);
    if rng.gen_bool(env.moving_chance) {
        let axis = if rng.gen_bool(0.5) { Axis::X } else { Axis::Z };
        part = part.moving(Motion {
            axis,
            distance: round1(uniform(rng, 4.0, 10.0)),
            speed: round1(uniform(rng, 3.0, 7.0)),
        });
    } else if rng.gen_bool(env.disappearing_chance) {
        part = part.flagged(SemanticFlags::DISAPPEARING);
    }
    vec![part]
}

fn moving_platform<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let env = ctx.envelope;
    let size = Vec3::new(side(rng, env).max(5.0), 1.0, side(rng, env).max(5.0));
    let axis = [Axis::X, Axis::Y, Axis::Z][rng.gen_range(0..3)];
    let (distance, speed) = if axis == Axis::Y {
        (uniform(rng, 3.0, 6.0), uniform(rng, 2.0, 4.0))
    } else {
        (uniform(rng, 5.0, 12.0), uniform(rng, 3.0, 7.0))
    };
    let part = ctx.accent(rng, "Mover", ctx.anchor, size).moving(Motion {
        axis,
        distance: round1(distance),
        speed: round1(speed),
    });
    vec![part]
}

fn vertical_oscillator<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let env = ctx.envelope;
    let size = Vec3::new(side(rng, env), 1.0, side(rng, env));
    let part = ctx.accent(rng, "Elevator", ctx.anchor, size).moving(Motion {
        axis: Axis::Y,
        distance: round1(uniform(rng, 4.0, 8.0)),
        speed: round1(uniform(rng, 2.0, 4.0)),
    });
    vec![part]
}

fn spinner<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let env = ctx.envelope;
    let width = side(rng, env).max(8.0);
    let depth = side(rng, env).max(8.0);
    let base = ctx.platform(rng, "SpinBase", ctx.anchor, Vec3::new(width, 1.0, depth));
    let bar = ctx
        .hazard("SpinBar", ctx.anchor.offset(0.0, 3.0, 0.0), Vec3::new(width + 4.0, 2.0, 2.0))
        .spinning(Spin {
            speed: round1(uniform(rng, 1.5, 4.0)),
            axis: Axis::Y,
        });
    vec![base, bar]
}

fn pendulum<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let width = (ctx.envelope.platform_max + 4.0).max(10.0);
    let depth = uniform(rng, 16.0, 24.0).round();
    let a = ctx.anchor;
    let floor = ctx.platform(rng, "SwingFloor", a.offset(0.0, 0.0, depth * 0.5), Vec3::new(width, 1.0, depth));
    let count: u32 = rng.gen_range(1..=3);
    let mut parts = vec![floor];
    for i in 0..count {
        let z = depth * f64::from(i + 1) / f64::from(count + 1);
        let swing = ctx
            .hazard(&format!("Swing{i}"), a.offset(0.0, 4.0, z), Vec3::new(8.0, 3.0, 2.0))
            .moving(Motion {
                axis: Axis::X,
                distance: round1(uniform(rng, 6.0, 12.0)),
                speed: round1(uniform(rng, 4.0, 8.0)),
            });
        parts.push(swing);
    }
    parts
}

fn thin_beam<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let length = uniform(rng, 12.0, 25.0).round();
    let width = (ctx.envelope.platform_min - 4.0).max(BEAM_MIN_WIDTH);
    let position = ctx.anchor.offset(0.0, 0.0, length * 0.5);
    vec![ctx.platform(rng, "Beam", position, Vec3::new(width, 1.0, length))]
}

fn staircase<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let steps: u32 = rng.gen_range(4..=8);
    let rise = round1(uniform(rng, 2.0, 3.5));
    let spacing = round1(uniform(rng, 5.0, 7.0));
    (0..steps)
        .map(|i| {
            let k = f64::from(i);
            let position = ctx.anchor.offset(0.0, k * rise, k * spacing);
            ctx.platform(rng, &format!("Step{i}"), position, Vec3::new(6.0, 1.0, 5.0))
        })
        .collect()
}

fn zigzag<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let env = ctx.envelope;
    let count: usize = rng.gen_range(4..=7);
    let s = side(rng, env);
    let half_offset = (s + uniform(rng, 0.5, 2.0)) * 0.5;
    let mut position = ctx.anchor;
    let mut parts = Vec::with_capacity(count);
    for i in 0..count {
        if i > 0 {
            let edge = round1(uniform(rng, env.gap_min, env.gap_max) * 0.6);
            position.z += s + edge;
            position.y += round1(uniform(rng, 0.0, env.rise_max * 0.5));
        }
        let side_sign = if i % 2 == 0 { -1.0 } else { 1.0 };
        let at = Vec3::new(ctx.anchor.x + side_sign * half_offset, position.y, position.z);
        let mut part = ctx.platform(rng, &format!("Zig{i}"), at, Vec3::new(s, 1.0, s));
        if rng.gen_bool(env.moving_chance * 0.5) {
            part = part.moving(Motion {
                axis: Axis::X,
                distance: round1(uniform(rng, 2.0, 4.0)),
                speed: round1(uniform(rng, 2.0, 4.0)),
            });
        }
        parts.push(part);
    }
    parts
}

fn hazard_gauntlet<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let a = ctx.anchor;
    let jitter = GAUNTLET_WIDTH / 3.0;
    let mut z = a.z + 2.0;
    let mut pads = Vec::with_capacity(4);
    for i in 0..4 {
        if i > 0 {
            z += round1(uniform(rng, 4.0, 6.0));
        }
        let x = a.x + round1(uniform(rng, -jitter, jitter));
        pads.push(ctx.platform(rng, &format!("SafePad{i}"), Vec3::new(x, a.y + 0.5, z), Vec3::new(3.0, 1.0, 4.0)));
    }
    let length = z - a.z + 4.0;
    let floor = ctx.hazard(
        "KillFloor",
        Vec3::new(a.x, a.y - 0.5, a.z + length * 0.5 - 1.0),
        Vec3::new(GAUNTLET_WIDTH, 0.5, length),
    );
    let mut parts = vec![floor];
    parts.extend(pads);
    parts
}

fn pillar_hop<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let count: usize = rng.gen_range(3..=6);
    let mut top = ctx.anchor;
    let mut parts = Vec::with_capacity(count * 2);
    for i in 0..count {
        if i > 0 {
            top.z += 6.0 + round1(uniform(rng, 1.0, 3.0));
            top.y += round1(uniform(rng, 0.5, (ctx.envelope.rise_max * 0.5).max(0.5)));
        }
        let at = Vec3::new(ctx.anchor.x + round1(uniform(rng, -4.0, 4.0)), top.y, top.z);
        let height = round1(uniform(rng, 8.0, 20.0));
        let body = Primitive::block(
            ctx.name(&format!("PillarBody{i}")),
            at.offset(0.0, -0.5 - height * 0.5, 0.0),
            Vec3::new(4.0, height, 4.0),
        )
        .colored(ctx.theme.wall_color(rng))
        .with_material(ctx.theme.wall_material)
        .flagged(SemanticFlags::STRUCTURE);
        parts.push(body);
        parts.push(ctx.platform(rng, &format!("PillarTop{i}"), at, Vec3::new(6.0, 1.0, 6.0)));
    }
    parts
}

fn disappearing_path<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let count: u32 = rng.gen_range(5..=8);
    (0..count)
        .map(|i| {
            let at = Vec3::new(
                ctx.anchor.x + round1(uniform(rng, -3.0, 3.0)),
                ctx.anchor.y,
                ctx.anchor.z + f64::from(i) * 6.0,
            );
            ctx.accent(rng, &format!("Fade{i}"), at, Vec3::new(5.0, 1.0, 4.0))
                .with_transparency(0.1)
                .flagged(SemanticFlags::DISAPPEARING)
        })
        .collect()
}

fn wall_climb<R: Rng + ?Sized>(ctx: &ObstacleContext<'_>, rng: &mut R) -> Vec<Primitive> {
    let levels: u32 = rng.gen_range(4..=7);
    let a = ctx.anchor;
    let height = f64::from(levels) * CLIMB_LEDGE_RISE + 6.0;
    let half = CLIMB_WALL_SPACING * 0.5;
    let mut parts = Vec::with_capacity(levels as usize + 2);
    for (label, x) in [("ClimbLeft", a.x - half), ("ClimbRight", a.x + half)] {
        parts.push(
            Primitive::block(
                ctx.name(label),
                Vec3::new(x, a.y + height * 0.5 - 1.0, a.z + 5.0),
                Vec3::new(2.0, height, 12.0),
            )
            .colored(ctx.theme.wall_color(rng))
            .with_material(ctx.theme.wall_material)
            .flagged(SemanticFlags::STRUCTURE),
        );
    }
    for i in 0..levels {
        let x = if i % 2 == 0 { a.x - 3.0 } else { a.x + 3.0 };
        let at = Vec3::new(x, a.y + 1.0 + f64::from(i) * CLIMB_LEDGE_RISE, a.z + 5.0);
        parts.push(ctx.platform(rng, &format!("Ledge{i}"), at, Vec3::new(4.0, 1.0, 5.0)));
    }
    parts
}

/// Decorative sphere, used by section dressing.
#[must_use]
pub fn orb(name: impl Into<String>, position: Vec3, diameter: f64, color: Color3) -> Primitive {
    Primitive::block(name, position, Vec3::new(diameter, diameter, diameter))
        .shaped(PrimitiveKind::Sphere)
        .colored(color)
        .with_material(Material::Neon)
        .intangible()
        .flagged(SemanticFlags::DECORATIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyProfile;
    use crate::theme::ThemeRegistry;
    use obby_core::{is_jump_critical, ThemeId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn build(id: ArchetypeId, section: usize, theme: ThemeId, seed: u64) -> Obstacle {
        let profile = DifficultyProfile::standard();
        let ctx = ObstacleContext {
            anchor: Vec3::new(0.0, 5.0, 100.0),
            envelope: profile.envelope_for(section),
            theme: ThemeRegistry::builtin().get(theme),
            stage: 7,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        build_obstacle(id, &ctx, &mut rng)
    }

    #[test]
    fn test_every_archetype_has_a_path() {
        for id in ArchetypeId::ALL {
            for seed in 0..20 {
                let obstacle = build(id, 7, ThemeId::LavaVolcano, seed);
                assert!(
                    obstacle.parts.iter().any(is_jump_critical),
                    "{id} produced no standable part"
                );
                assert!(obstacle.parts.iter().all(|p| p.name.starts_with("Stage7_")));
            }
        }
    }

    #[test]
    fn test_path_is_built_in_z_order() {
        for id in ArchetypeId::ALL {
            for seed in 0..20 {
                let obstacle = build(id, 6, ThemeId::NeonCyber, seed);
                let zs: Vec<f64> = obstacle
                    .parts
                    .iter()
                    .filter(|p| is_jump_critical(p))
                    .map(|p| p.position.z)
                    .collect();
                assert!(zs.windows(2).all(|w| w[0] <= w[1]), "{id} path out of order");
            }
        }
    }

    #[test]
    fn test_gauntlet_falls_back_without_hazard_color() {
        let obstacle = build(ArchetypeId::HazardGauntlet, 3, ThemeId::RainbowSky, 1);
        assert_eq!(obstacle.archetype, ArchetypeId::Platform);
        let obstacle = build(ArchetypeId::HazardGauntlet, 3, ThemeId::LavaVolcano, 1);
        assert_eq!(obstacle.archetype, ArchetypeId::HazardGauntlet);
        assert!(obstacle.parts[0].has(SemanticFlags::HAZARD));
    }

    #[test]
    fn test_spinner_bar_is_spinning_hazard() {
        let obstacle = build(ArchetypeId::Spinner, 5, ThemeId::SpaceGalaxy, 3);
        let bar = &obstacle.parts[1];
        assert!(bar.has(SemanticFlags::HAZARD));
        assert!(bar.spin.is_some());
        assert!(bar.flags.contains(SemanticFlags::SPINNING));
    }

    #[test]
    fn test_tiers_unlock_progressively() {
        assert!(!tier(0).contains(&ArchetypeId::HazardGauntlet));
        assert!(tier(2).contains(&ArchetypeId::HazardGauntlet));
        assert!(tier(5).contains(&ArchetypeId::Spinner));
        assert!(tier(6).contains(&ArchetypeId::WallClimb));
        assert_eq!(tier(6), tier(60));
    }

    #[test]
    fn test_choose_stays_in_tier() {
        let profile = DifficultyProfile::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for section in 0..8 {
            for _ in 0..50 {
                let id = choose_archetype(&mut rng, section, profile.envelope_for(section));
                assert!(tier(section).contains(&id));
            }
        }
    }

    #[test]
    fn test_uniform_empty_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(uniform(&mut rng, 5.0, 1.0), 5.0);
        assert_eq!(round1(3.14159), 3.1);
    }
}
