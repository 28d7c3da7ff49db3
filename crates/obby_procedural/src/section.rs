//! # Section Builder
//!
//! Builds one themed, enclosed section: entry pad, a cursor-driven run of
//! obstacles joined by auto-bridges, checkpoints and stage signs, an exit
//! (teleport or victory) and the floor, walls and decorations sized to
//! the finished course.
//!
//! Sections never share state. Each one draws from its own RNG stream so
//! the world generator may build them in any order.

use crate::archetype::{advance_range, build_obstacle, choose_archetype, orb, round1, uniform, ObstacleContext};
use crate::difficulty::DifficultyEnvelope;
use crate::repair::{enforce_reachability, RepairOutcome};
use crate::seed::WorldSeed;
use crate::theme::Theme;
use obby_core::movement::{edge_gap, SAFE_GAP_WALK};
use obby_core::{
    is_jump_critical, Color3, Material, Primitive, PrimitiveKind, Section, SemanticFlags, Stage, ThemeId, Vec3,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Distance between section origins along the traversal axis.
pub const SECTION_SPACING: f64 = 2000.0;

/// Height of the entry pad and the lowest course cursor.
pub const BASE_HEIGHT: f64 = 5.0;

/// Entry pad offset from the section origin.
pub const ENTRY_OFFSET: f64 = 10.0;

/// Checkpoint every n-th stage of a section, starting with the first.
pub const CHECKPOINT_INTERVAL: u32 = 3;

/// Lateral bound of the course cursor.
pub const LANE_HALF_WIDTH: f64 = 30.0;

/// Largest upward step between two bridge platforms.
pub const BRIDGE_MAX_STEP: f64 = 2.0;

const ENTRY_PAD: Vec3 = Vec3::new(12.0, 0.5, 12.0);
const COURSE_LEAD: f64 = 15.0;
const LATERAL_DRIFT: f64 = 4.0;
const REAR_CLEARANCE: f64 = 6.0;
const EXIT_CLEARANCE: f64 = 10.0;
const MIN_FLOOR_WIDTH: f64 = 120.0;
const MIN_FLOOR_DEPTH: f64 = 200.0;
const FLOOR_MARGIN: f64 = 12.0;
const MIN_WALL_HEIGHT: f64 = 50.0;
const WALL_HEADROOM: f64 = 20.0;
const WALL_BASE: f64 = -10.0;
const SAFETY_NET_DEPTH: f64 = 50.0;
const SAFETY_NET_MARGIN: f64 = 30.0;
const CHECKPOINT_SIDE: f64 = 8.0;

/// Entry pad center of a section.
#[must_use]
pub fn entry_position(index: usize) -> Vec3 {
    Vec3::new(0.0, BASE_HEIGHT, section_origin(index).z + ENTRY_OFFSET)
}

/// Origin of a section.
#[must_use]
pub fn section_origin(index: usize) -> Vec3 {
    Vec3::new(0.0, 0.0, index as f64 * SECTION_SPACING)
}

/// Everything needed to build one section.
#[derive(Clone, Copy, Debug)]
pub struct SectionPlan<'a> {
    /// 0-based section index.
    pub index: usize,
    /// Theme identifier.
    pub theme_id: ThemeId,
    /// Resolved theme, overrides applied.
    pub theme: &'a Theme,
    /// Difficulty for this section.
    pub envelope: &'a DifficultyEnvelope,
    /// Global number of the first stage.
    pub first_stage: u32,
    /// Stages to place.
    pub stage_count: u32,
    /// Entry pad of the next section, `None` for the last one.
    pub next_entry: Option<Vec3>,
    /// Shown on the welcome sign.
    pub game_name: &'a str,
    /// World seed; the section stream is derived from it.
    pub seed: WorldSeed,
}

/// A finished section with section-local wall indices.
#[derive(Clone, Debug)]
pub struct BuiltSection {
    /// Section record.
    pub section: Section,
    /// Owned primitives.
    pub parts: Vec<Primitive>,
    /// Owned stages in order.
    pub stages: Vec<Stage>,
    /// Relays added by the repair pass.
    pub repair: RepairOutcome,
}

/// Builds one section.
#[must_use]
pub fn build_section(plan: &SectionPlan<'_>) -> BuiltSection {
    SectionBuilder::new(plan).build()
}

struct SectionBuilder<'p, 'a> {
    plan: &'p SectionPlan<'a>,
    rng: ChaCha8Rng,
    parts: Vec<Primitive>,
    stages: Vec<Stage>,
}

struct Extents {
    half_width: f64,
    min_z: f64,
    max_z: f64,
    max_top: f64,
}

impl Extents {
    fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    fn center_z(&self) -> f64 {
        (self.min_z + self.max_z) * 0.5
    }
}

impl<'p, 'a> SectionBuilder<'p, 'a> {
    fn new(plan: &'p SectionPlan<'a>) -> Self {
        Self {
            plan,
            rng: plan.seed.section_rng(plan.index),
            parts: Vec::new(),
            stages: Vec::new(),
        }
    }

    fn index(&self) -> usize {
        self.plan.index
    }

    fn is_tutorial(&self) -> bool {
        self.plan.index == 0
    }

    fn push(&mut self, part: Primitive, stage: Option<u32>) {
        self.parts.push(part.owned_by(self.plan.index, stage));
    }

    fn decor(&mut self, part: Primitive) {
        self.push(part.intangible().flagged(SemanticFlags::DECORATIVE), None);
    }

    fn build(mut self) -> BuiltSection {
        let plan = self.plan;
        let first_stage = plan.first_stage.max(1);
        let last_stage = first_stage + plan.stage_count - 1;
        let entry = entry_position(plan.index);

        let entry_pad = self.place_entry(entry);
        if self.is_tutorial() {
            self.place_lobby(entry);
        }

        let mut previous = entry_pad;
        let mut cursor = entry.offset(0.0, 0.0, COURSE_LEAD);
        for local in 0..plan.stage_count {
            let number = first_stage + local;
            let (exit_part, next_cursor) = self.place_stage(local, number, cursor, &previous);
            previous = exit_part;
            cursor = next_cursor;
        }

        let exit = self.place_exit(&previous, last_stage);
        let repair = enforce_reachability(&mut self.parts, plan.index);
        let walls = self.place_scaffolding();

        debug!(
            section = plan.index,
            stages = plan.stage_count,
            parts = self.parts.len(),
            relays = repair.relays,
            "section built"
        );

        BuiltSection {
            section: Section {
                index: plan.index,
                theme: plan.theme_id,
                theme_name: plan.theme.name.clone(),
                origin: section_origin(plan.index),
                first_stage,
                last_stage,
                entry,
                exit,
                teleport_target: plan.next_entry.map(|e| e.offset(0.0, 3.0, 0.0)),
                walls,
                sky_hint: plan.theme.sky_hint.clone(),
            },
            parts: self.parts,
            stages: self.stages,
            repair,
        }
    }

    fn place_entry(&mut self, entry: Vec3) -> Primitive {
        let index = self.index();
        let accent = self.plan.theme.accent_color(&mut self.rng);
        let mut pad = Primitive::block(format!("Section{index}_Entry"), entry, ENTRY_PAD)
            .colored(accent)
            .with_material(Material::Neon)
            .flagged(SemanticFlags::SECTION_ENTRY)
            .owned_by(index, None)
            .captioned(format!("Section {}\nGood Luck!", index + 1), Color3::WHITE, false);
        if index > 0 {
            pad = pad.flagged(SemanticFlags::TELEPORT_TARGET);
        }
        self.parts.push(pad.clone());
        self.decor(
            Primitive::block(format!("Section{index}_EntryRing"), entry.offset(0.0, -0.3, 0.0), Vec3::new(14.0, 0.1, 14.0))
                .colored(accent.scaled(0.6))
                .with_material(Material::Neon)
                .with_transparency(0.4),
        );
        pad
    }

    fn place_lobby(&mut self, entry: Vec3) {
        let accent = self.plan.theme.accent_color(&mut self.rng);
        let spawn = Primitive::block("SpawnLocation", entry.offset(0.0, 0.25, -16.0), Vec3::new(12.0, 1.0, 12.0))
            .colored(accent)
            .with_material(Material::SmoothPlastic)
            .flagged(SemanticFlags::SPAWN);
        self.push(spawn, None);

        let sign_pos = Vec3::new(0.0, entry.y + 12.0, entry.z - 26.0);
        let sign = Primitive::block("WelcomeSign", sign_pos, Vec3::new(30.0, 8.0, 1.0))
            .colored(Color3::new(0.1, 0.1, 0.15))
            .with_material(Material::SmoothPlastic)
            .flagged(SemanticFlags::SIGN)
            .captioned(format!("Welcome to {}!", self.plan.game_name), Color3::WHITE, false);
        self.push(sign, None);
        self.decor(
            Primitive::block("WelcomeGlow", sign_pos.offset(0.0, 0.0, -0.8), Vec3::new(31.0, 9.0, 0.5))
                .colored(accent)
                .with_material(Material::Neon)
                .with_transparency(0.3),
        );

        let wall = self.plan.theme.wall_color(&mut self.rng);
        for (i, (dx, dz)) in [(-20.0, -20.0), (20.0, -20.0), (-20.0, 4.0), (20.0, 4.0)].into_iter().enumerate() {
            self.decor(
                Primitive::block(format!("LobbyPillar{i}"), Vec3::new(dx, 7.5, entry.z + dz), Vec3::new(3.0, 15.0, 3.0))
                    .colored(wall)
                    .with_material(self.plan.theme.wall_material),
            );
        }
    }

    /// Places one stage and returns its exit part and the next cursor.
    fn place_stage(&mut self, local: u32, number: u32, mut cursor: Vec3, previous: &Primitive) -> (Primitive, Vec3) {
        let plan = self.plan;
        let envelope = plan.envelope;
        let h_gap = round1(uniform(&mut self.rng, envelope.gap_min, envelope.gap_max));
        let v_off = round1(uniform(&mut self.rng, -0.5, envelope.rise_max));
        if local > 0 {
            let drift = round1(uniform(&mut self.rng, -LATERAL_DRIFT, LATERAL_DRIFT));
            cursor.x = (cursor.x + drift).clamp(-LANE_HALF_WIDTH, LANE_HALF_WIDTH);
            cursor.y = (cursor.y + v_off).max(BASE_HEIGHT);
        }

        let requested = choose_archetype(&mut self.rng, plan.index, envelope);
        let ctx = ObstacleContext {
            anchor: cursor,
            envelope,
            theme: plan.theme,
            stage: number,
        };
        let obstacle = build_obstacle(requested, &ctx, &mut self.rng);
        let parts: Vec<Primitive> = obstacle
            .parts
            .into_iter()
            .map(|p| p.owned_by(plan.index, Some(number)))
            .collect();

        let entry_part = parts
            .iter()
            .filter(|p| is_jump_critical(p))
            .min_by(|a, b| a.min_z().total_cmp(&b.min_z()))
            .cloned();
        let exit_part = parts
            .iter()
            .filter(|p| is_jump_critical(p))
            .max_by(|a, b| a.max_z().total_cmp(&b.max_z()))
            .cloned()
            .unwrap_or_else(|| previous.clone());
        let trailing = parts.iter().map(Primitive::max_z).fold(cursor.z, f64::max);

        if let Some(first) = &entry_part {
            self.bridge(previous, first, number);
        }
        self.parts.extend(parts);
        self.place_stage_sign(number, cursor);
        if local % CHECKPOINT_INTERVAL == 0 {
            self.place_checkpoint(number, &exit_part);
        }
        self.stages.push(Stage {
            number,
            section: plan.index,
            archetype: obstacle.archetype,
            anchor: cursor,
        });

        let advance = match advance_range(obstacle.archetype) {
            Some((lo, hi)) => uniform(&mut self.rng, lo, hi),
            None => h_gap + uniform(&mut self.rng, 8.0, 15.0),
        };
        cursor.z = (cursor.z + advance).max(trailing + h_gap + REAR_CLEARANCE);
        (exit_part, cursor)
    }

    /// Fills the gap between two jump-critical parts with walkable steps.
    ///
    /// No-op when `to` starts before `from` ends or the hop is already a
    /// walking-pace jump.
    fn bridge(&mut self, from: &Primitive, to: &Primitive, stage: u32) {
        let raw = to.min_z() - from.max_z();
        let dy = to.position.y - from.position.y;
        if raw <= 0.0 || (edge_gap(from, to) <= SAFE_GAP_WALK && dy <= BRIDGE_MAX_STEP) {
            return;
        }

        let mut count = ((raw / SAFE_GAP_WALK).ceil() as usize).saturating_sub(1).max(1);
        if dy > 0.0 {
            count = count.max(((dy / BRIDGE_MAX_STEP).ceil() as usize).saturating_sub(1));
        }
        let slots = (count + 1) as f64;
        let spacing = raw / slots;
        let step_y = (dy / slots).clamp(-BRIDGE_MAX_STEP, BRIDGE_MAX_STEP);
        let envelope = self.plan.envelope;

        for k in 1..=count {
            let t = k as f64 / slots;
            let jitter = round1(uniform(&mut self.rng, -0.5, 0.5));
            let position = Vec3::new(
                from.position.x + (to.position.x - from.position.x) * t + jitter,
                from.position.y + step_y * k as f64,
                from.max_z() + spacing * k as f64,
            );
            let side = uniform(&mut self.rng, envelope.platform_min.max(4.0), envelope.platform_max.max(4.0)).round();
            let color = self.plan.theme.platform_color(&mut self.rng);
            let part = Primitive::block(format!("Stage{stage}_Bridge{k}"), position, Vec3::new(side, 1.0, side))
                .colored(color)
                .with_material(self.plan.theme.platform_material)
                .flagged(SemanticFlags::BRIDGE);
            self.push(part, Some(stage));
        }
    }

    fn place_stage_sign(&mut self, number: u32, anchor: Vec3) {
        let position = anchor.offset(-9.0, 4.0, -2.0);
        let color = self.plan.theme.platform_color(&mut self.rng);
        let accent = self.plan.theme.accent_color(&mut self.rng);
        let sign = Primitive::block(format!("Stage{number}_Sign"), position, Vec3::new(0.5, 4.0, 6.0))
            .colored(color)
            .with_material(Material::SmoothPlastic)
            .intangible()
            .flagged(SemanticFlags::STAGE_MARKER)
            .captioned(format!("Stage {number}\n{}", self.plan.theme.name), Color3::WHITE, true);
        self.push(sign, Some(number));
        let glow = Primitive::block(format!("Stage{number}_SignGlow"), position.offset(-0.3, 0.0, 0.0), Vec3::new(0.2, 4.4, 6.4))
            .colored(accent)
            .with_material(Material::Neon)
            .with_transparency(0.3)
            .intangible()
            .flagged(SemanticFlags::DECORATIVE);
        self.push(glow, Some(number));
    }

    fn place_checkpoint(&mut self, number: u32, on: &Primitive) {
        let top = on.top();
        let (w, d) = (on.size.x.min(CHECKPOINT_SIDE), on.size.z.min(CHECKPOINT_SIDE));
        let pad = Primitive::block(
            format!("Stage{number}_Checkpoint"),
            Vec3::new(on.position.x, top + 0.25, on.position.z),
            Vec3::new(w, 0.5, d),
        )
        .colored(Color3::CHECKPOINT_GREEN)
        .with_material(Material::Neon)
        .flagged(SemanticFlags::CHECKPOINT);
        self.push(pad, Some(number));

        let pole = Vec3::new(on.position.x + w * 0.5 - 0.5, top + 3.0, on.position.z);
        for part in [
            Primitive::block(format!("Stage{number}_FlagPole"), pole, Vec3::new(0.4, 6.0, 0.4))
                .colored(Color3::WHITE)
                .with_material(Material::Metal),
            Primitive::block(format!("Stage{number}_Flag"), pole.offset(0.0, 2.25, 1.25), Vec3::new(0.2, 1.5, 2.5))
                .colored(Color3::CHECKPOINT_GREEN)
                .with_material(Material::Neon),
        ] {
            self.push(part.intangible().flagged(SemanticFlags::DECORATIVE), Some(number));
        }
    }

    /// Places the exit (teleport or victory) and returns its position.
    fn place_exit(&mut self, previous: &Primitive, last_stage: u32) -> Vec3 {
        let index = self.index();
        let course_end = self.parts.iter().map(Primitive::max_z).fold(previous.max_z(), f64::max);
        let Some(next_entry) = self.plan.next_entry else {
            return self.place_victory(previous, course_end, last_stage);
        };

        let position = Vec3::new(previous.position.x, previous.position.y, course_end + EXIT_CLEARANCE + ENTRY_PAD.z * 0.5);
        let pad = Primitive::block(format!("Section{index}_Exit"), position, ENTRY_PAD)
            .colored(Color3::TELEPORT_BLUE)
            .with_material(Material::Neon)
            .teleporting_to(next_entry.offset(0.0, 3.0, 0.0));
        self.bridge(previous, &pad, last_stage);
        self.push(pad, Some(last_stage));

        self.decor(
            Primitive::block(format!("Section{index}_ExitRing"), position.offset(0.0, -0.3, 0.0), Vec3::new(14.0, 0.1, 14.0))
                .colored(Color3::TELEPORT_BLUE.scaled(0.7))
                .with_material(Material::Neon)
                .with_transparency(0.4),
        );
        let sign = Primitive::block(format!("Section{index}_ExitSign"), position.offset(0.0, 5.0, 7.0), Vec3::new(10.0, 3.0, 0.5))
            .colored(Color3::new(0.1, 0.1, 0.15))
            .with_material(Material::SmoothPlastic)
            .intangible()
            .flagged(SemanticFlags::SIGN)
            .captioned(format!("Next: Section {}", index + 2), Color3::WHITE, true);
        self.push(sign, None);
        position
    }

    fn place_victory(&mut self, previous: &Primitive, course_end: f64, last_stage: u32) -> Vec3 {
        let position = Vec3::new(previous.position.x, previous.position.y, course_end + EXIT_CLEARANCE + 10.0);
        let pad = Primitive::block("VictoryPad", position, Vec3::new(20.0, 1.0, 20.0))
            .colored(Color3::GOLD)
            .with_material(Material::Neon)
            .flagged(SemanticFlags::VICTORY);
        self.bridge(previous, &pad, last_stage);
        self.push(pad, Some(last_stage));

        let top = position.y + 0.5;
        for (i, (dx, dz)) in [(-9.0, -9.0), (9.0, -9.0), (-9.0, 9.0), (9.0, 9.0)].into_iter().enumerate() {
            self.decor(
                Primitive::block(format!("VictoryPillar{i}"), position.offset(dx, 6.5, dz), Vec3::new(2.0, 12.0, 2.0))
                    .colored(Color3::GOLD)
                    .with_material(Material::Metal),
            );
        }
        self.decor(
            Primitive::block("VictoryArch", Vec3::new(position.x, top + 13.0, position.z + 9.0), Vec3::new(22.0, 2.0, 2.0))
                .colored(Color3::GOLD)
                .with_material(Material::Neon),
        );
        self.decor(
            Primitive::block("Trophy", Vec3::new(position.x, top + 4.0, position.z), Vec3::new(4.0, 4.0, 4.0))
                .shaped(PrimitiveKind::Sphere)
                .colored(Color3::GOLD)
                .with_material(Material::Neon),
        );
        for i in 0..12_u32 {
            let angle = f64::from(i) * std::f64::consts::TAU / 12.0;
            let color = self.plan.theme.accent_color(&mut self.rng);
            let at = Vec3::new(position.x + 14.0 * angle.cos(), top + 6.0, position.z + 14.0 * angle.sin());
            self.push(orb(format!("VictoryOrb{i}"), at, 1.5, color), None);
        }
        let sign = Primitive::block("VictorySign", Vec3::new(position.x, top + 9.0, position.z + 10.0), Vec3::new(12.0, 4.0, 0.5))
            .colored(Color3::new(0.1, 0.1, 0.15))
            .with_material(Material::SmoothPlastic)
            .intangible()
            .flagged(SemanticFlags::SIGN)
            .captioned("VICTORY!", Color3::GOLD, true);
        self.push(sign, None);
        position
    }

    fn extents(&self) -> Extents {
        let mut half_width = MIN_FLOOR_WIDTH * 0.5;
        let (mut min_z, mut max_z, mut max_top) = (f64::INFINITY, f64::NEG_INFINITY, BASE_HEIGHT);
        for part in &self.parts {
            half_width = half_width.max(part.position.x.abs() + part.size.x * 0.5 + FLOOR_MARGIN);
            min_z = min_z.min(part.min_z());
            max_z = max_z.max(part.max_z());
            max_top = max_top.max(part.top());
        }
        let min_z = min_z - FLOOR_MARGIN;
        let max_z = (max_z + FLOOR_MARGIN).max(min_z + MIN_FLOOR_DEPTH);
        Extents {
            half_width,
            min_z,
            max_z,
            max_top,
        }
    }

    /// Floor, safety net, walls and decor. Returns section-local wall indices.
    fn place_scaffolding(&mut self) -> Vec<usize> {
        let ext = self.extents();
        let theme = self.plan.theme;
        let index = self.index();
        let width = ext.half_width * 2.0;
        let (depth, cz) = (ext.depth(), ext.center_z());

        let floor = Primitive::block(format!("Section{index}_Floor"), Vec3::new(0.0, -1.0, cz), Vec3::new(width, 2.0, depth));
        if self.is_tutorial() {
            self.push(
                floor
                    .colored(theme.floor_color)
                    .with_material(theme.floor_material)
                    .flagged(SemanticFlags::FLOOR),
                None,
            );
        } else {
            let hazard = theme.hazard_or_default();
            self.push(
                floor
                    .colored(hazard)
                    .with_material(Material::Neon)
                    .with_transparency(0.15)
                    .flagged(SemanticFlags::FLOOR | SemanticFlags::HAZARD),
                None,
            );
            let net = Primitive::block(
                format!("Section{index}_SafetyNet"),
                Vec3::new(0.0, -SAFETY_NET_DEPTH, cz),
                Vec3::new(width + 2.0 * SAFETY_NET_MARGIN, 2.0, depth + 2.0 * SAFETY_NET_MARGIN),
            )
            .colored(hazard)
            .with_material(Material::Neon)
            .with_transparency(0.5)
            .flagged(SemanticFlags::FLOOR | SemanticFlags::HAZARD);
            self.push(net, None);
        }

        let height = (ext.max_top + WALL_HEADROOM - WALL_BASE).max(MIN_WALL_HEIGHT);
        let cy = WALL_BASE + height * 0.5;
        let transparency = if theme.wall_material == Material::Glass { 0.6 } else { 0.3 };
        let walls = [
            ("WallLeft", Vec3::new(-ext.half_width - 1.0, cy, cz), Vec3::new(2.0, height, depth)),
            ("WallRight", Vec3::new(ext.half_width + 1.0, cy, cz), Vec3::new(2.0, height, depth)),
            ("WallBack", Vec3::new(0.0, cy, ext.min_z - 1.0), Vec3::new(width + 4.0, height, 2.0)),
            ("WallFront", Vec3::new(0.0, cy, ext.max_z + 1.0), Vec3::new(width + 4.0, height, 2.0)),
        ];
        let mut indices = Vec::with_capacity(walls.len());
        for (label, position, size) in walls {
            let color = theme.wall_color(&mut self.rng);
            indices.push(self.parts.len());
            self.push(
                Primitive::block(format!("Section{index}_{label}"), position, size)
                    .colored(color)
                    .with_material(theme.wall_material)
                    .with_transparency(transparency)
                    .flagged(SemanticFlags::BOUNDARY_WALL),
                None,
            );
        }

        self.place_decor(&ext);
        indices
    }

    fn place_decor(&mut self, ext: &Extents) {
        let theme = self.plan.theme;
        let index = self.index();
        let z_lo = ext.min_z + 10.0;
        let z_hi = ext.max_z - 10.0;

        let slabs: u32 = self.rng.gen_range(3..=6);
        for i in 0..slabs {
            let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            let lo = LANE_HALF_WIDTH + 12.0;
            let x = sign * uniform(&mut self.rng, lo, (ext.half_width - 4.0).max(lo));
            let size = Vec3::new(2.0, uniform(&mut self.rng, 8.0, 20.0), uniform(&mut self.rng, 8.0, 16.0));
            let z = uniform(&mut self.rng, z_lo, z_hi);
            let color = theme.wall_color(&mut self.rng);
            self.decor(
                Primitive::block(format!("Section{index}_DecoWall{i}"), Vec3::new(x, size.y * 0.5, z), size)
                    .colored(color)
                    .with_material(theme.wall_material),
            );
        }

        let floats: u32 = self.rng.gen_range(4..=10);
        for i in 0..floats {
            let x = uniform(&mut self.rng, -ext.half_width + 5.0, ext.half_width - 5.0);
            let y = uniform(&mut self.rng, 15.0, 35.0);
            let z = uniform(&mut self.rng, z_lo, z_hi);
            let diameter = uniform(&mut self.rng, 2.0, 5.0);
            let color = theme.accent_color(&mut self.rng);
            self.push(orb(format!("Section{index}_Float{i}"), Vec3::new(x, y, z), diameter, color), None);
        }

        let entry = entry_position(index);
        let color = theme.accent_color(&mut self.rng);
        for (label, position, size) in [
            ("ArchLeft", entry.offset(-8.0, 5.0, 0.0), Vec3::new(1.5, 10.0, 1.5)),
            ("ArchRight", entry.offset(8.0, 5.0, 0.0), Vec3::new(1.5, 10.0, 1.5)),
            ("ArchTop", entry.offset(0.0, 10.75, 0.0), Vec3::new(17.5, 1.5, 1.5)),
        ] {
            self.decor(
                Primitive::block(format!("Section{index}_{label}"), position, size)
                    .colored(color)
                    .with_material(Material::Neon),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyProfile;
    use crate::theme::ThemeRegistry;
    use obby_core::movement::{allowed_gap, vertical_delta, SAFE_GAP_SPRINT};
    use obby_core::traversal_order;

    fn build(index: usize, theme_id: ThemeId, stages: u32, last: bool) -> BuiltSection {
        let profile = DifficultyProfile::standard();
        let theme = ThemeRegistry::builtin().get(theme_id);
        let plan = SectionPlan {
            index,
            theme_id,
            theme,
            envelope: profile.envelope_for(index),
            first_stage: 1 + 8 * index as u32,
            stage_count: stages,
            next_entry: (!last).then(|| entry_position(index + 1)),
            game_name: "Test Obby",
            seed: WorldSeed::new(42),
        };
        build_section(&plan)
    }

    fn count(built: &BuiltSection, flag: SemanticFlags) -> usize {
        built.parts.iter().filter(|p| p.has(flag)).count()
    }

    #[test]
    fn test_tutorial_has_lobby() {
        let built = build(0, ThemeId::Lobby, 4, false);
        assert_eq!(count(&built, SemanticFlags::SPAWN), 1);
        assert!(built.parts.iter().any(|p| p.has(SemanticFlags::SIGN) && p.caption.as_ref().is_some_and(|c| c.text.contains("Test Obby"))));
        let floors: Vec<_> = built.parts.iter().filter(|p| p.has(SemanticFlags::FLOOR)).collect();
        assert_eq!(floors.len(), 1);
        assert!(!floors[0].has(SemanticFlags::HAZARD));
    }

    #[test]
    fn test_every_entry_pad_is_captioned() {
        for (index, theme_id) in [(0, ThemeId::Lobby), (2, ThemeId::JungleTemple)] {
            let built = build(index, theme_id, 4, false);
            let entry = built.parts.iter().find(|p| p.has(SemanticFlags::SECTION_ENTRY)).unwrap();
            let caption = entry.caption.as_ref().unwrap();
            assert_eq!(caption.text, format!("Section {}\nGood Luck!", index + 1));
            assert_eq!(entry.has(SemanticFlags::TELEPORT_TARGET), index > 0);
        }
    }

    #[test]
    fn test_hazard_floor_and_net() {
        let built = build(3, ThemeId::LavaVolcano, 5, false);
        let floors: Vec<_> = built.parts.iter().filter(|p| p.has(SemanticFlags::FLOOR)).collect();
        assert_eq!(floors.len(), 2);
        assert!(floors.iter().all(|p| p.has(SemanticFlags::HAZARD)));
        assert!(floors.iter().any(|p| p.position.y <= -SAFETY_NET_DEPTH));
    }

    #[test]
    fn test_four_walls_indexed() {
        let built = build(2, ThemeId::JungleTemple, 4, false);
        assert_eq!(built.section.walls.len(), 4);
        for &i in &built.section.walls {
            assert!(built.parts[i].has(SemanticFlags::BOUNDARY_WALL));
            assert!(built.parts[i].size.y >= MIN_WALL_HEIGHT);
        }
    }

    #[test]
    fn test_stages_numbered_and_checkpointed() {
        let built = build(1, ThemeId::CandyLand, 7, false);
        let numbers: Vec<u32> = built.stages.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (9..16).collect::<Vec<_>>());
        // Stages 1, 4 and 7 of the section.
        assert_eq!(count(&built, SemanticFlags::CHECKPOINT), 3);
        assert_eq!(count(&built, SemanticFlags::STAGE_MARKER), 7);
    }

    #[test]
    fn test_teleport_exit_targets_next_entry() {
        let built = build(1, ThemeId::CandyLand, 3, false);
        let exit = built.parts.iter().find(|p| p.has(SemanticFlags::TELEPORT_SOURCE)).unwrap();
        assert_eq!(exit.teleport_to, Some(entry_position(2).offset(0.0, 3.0, 0.0)));
        assert_eq!(built.section.teleport_target, exit.teleport_to);
        assert!(!built.section.is_terminal());
    }

    #[test]
    fn test_last_section_has_victory() {
        let built = build(7, ThemeId::RainbowSky, 4, true);
        assert_eq!(count(&built, SemanticFlags::VICTORY), 1);
        assert_eq!(count(&built, SemanticFlags::TELEPORT_SOURCE), 0);
        assert!(built.section.is_terminal());
    }

    #[test]
    fn test_path_reachable_after_build() {
        for (index, theme) in [(0, ThemeId::Lobby), (4, ThemeId::IceCrystal), (7, ThemeId::RainbowSky)] {
            let built = build(index, theme, 8, index == 7);
            let order = traversal_order(built.parts.iter().enumerate());
            for w in order.windows(2) {
                let (a, b) = (&built.parts[w[0]], &built.parts[w[1]]);
                let dy = vertical_delta(a, b);
                assert!(edge_gap(a, b) <= allowed_gap(SAFE_GAP_SPRINT, dy), "{} -> {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_footprint_within_spacing() {
        let built = build(6, ThemeId::SpaceGalaxy, 12, false);
        let origin = section_origin(6).z;
        for p in &built.parts {
            assert!(p.min_z() > origin - SECTION_SPACING * 0.5, "{}", p.name);
            assert!(p.max_z() < origin + SECTION_SPACING, "{}", p.name);
        }
    }

    #[test]
    fn test_bridge_fills_long_gap() {
        let profile = DifficultyProfile::standard();
        let theme = ThemeRegistry::builtin().get(ThemeId::Lobby);
        let plan = SectionPlan {
            index: 0,
            theme_id: ThemeId::Lobby,
            theme,
            envelope: profile.envelope_for(0),
            first_stage: 1,
            stage_count: 0,
            next_entry: None,
            game_name: "x",
            seed: WorldSeed::new(1),
        };
        let mut builder = SectionBuilder::new(&plan);
        let from = Primitive::block("a", Vec3::new(0.0, 5.0, 0.0), Vec3::new(6.0, 1.0, 6.0));
        let to = Primitive::block("b", Vec3::new(4.0, 9.0, 40.0), Vec3::new(6.0, 1.0, 6.0));
        builder.bridge(&from, &to, 1);
        assert!(builder.parts.len() >= 6);
        let mut chain = vec![from.clone()];
        chain.extend(builder.parts.iter().cloned());
        chain.push(to);
        for w in chain.windows(2) {
            assert!(w[1].position.y - w[0].position.y <= BRIDGE_MAX_STEP + 1e-9);
            assert!(edge_gap(&w[0], &w[1]) <= SAFE_GAP_WALK);
        }
    }
}
