//! # Scene Serializer
//!
//! Turns the generator's output triple into a [`SceneDocument`].
//!
//! Every run starts from a fresh referent counter, so the same input
//! always produces the same document. Geometry is checked before anything
//! is built; a bad primitive aborts the whole document.

use obby_core::{Caption, Color3, Primitive, Section, SemanticFlags, Stage, Vec3, World};
use tracing::{debug, info};

use crate::codec::{attributes_base64, tags_base64, AttributeMap, AttributeValue};
use crate::document::{NodeId, SceneDocument};
use crate::error::{SceneError, SceneResult};
use crate::property::{PropertyValue, UDim2};
use crate::script::{ScriptKind, ScriptSource};
use crate::semantics::{encode_semantics, SemanticContext};

/// Events created under `ReplicatedStorage/Remotes`.
pub const REMOTE_EVENTS: [&str; 9] = [
    "StageUpdated",
    "PlayerDied",
    "SectionChanged",
    "TeleportEffect",
    "CheckpointReached",
    "VictoryReached",
    "UpdateStats",
    "PurchaseItem",
    "NotifyPlayer",
];

/// Functions created under `ReplicatedStorage/RemoteFunctions`.
pub const REMOTE_FUNCTIONS: [&str; 3] = ["GetPlayerData", "GetShopItems", "GetLeaderboard"];

/// Containers a script may be placed in.
pub const SCRIPT_LOCATIONS: [&str; 6] = [
    "ServerScriptService",
    "ReplicatedStorage",
    "StarterPlayerScripts",
    "StarterCharacterScripts",
    "StarterGui",
    "Workspace",
];

const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 20.0, 30.0);
const CAMERA_FIELD_OF_VIEW: f32 = 70.0;
const LABEL_CANVAS: (f64, f64) = (400.0, 200.0);
const LABEL_FONT: u32 = 12;
const LABEL_TEXT_SIZE: i32 = 48;
const LABEL_BACKGROUND_TRANSPARENCY: f32 = 0.3;
const WALK_SPEED: f32 = 16.0;
const JUMP_POWER: f32 = 50.0;
const GRADING_SATURATION: f32 = 0.25;
const SUN_RAYS_INTENSITY: f32 = 0.15;

/// Surface a label is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    /// +X.
    Right,
    /// +Y.
    Top,
    /// +Z.
    Back,
    /// -X.
    Left,
    /// -Y.
    Bottom,
    /// -Z.
    Front,
}

impl Face {
    /// Enumeration code.
    #[must_use]
    pub const fn token(self) -> u32 {
        match self {
            Self::Right => 0,
            Self::Top => 1,
            Self::Back => 2,
            Self::Left => 3,
            Self::Bottom => 4,
            Self::Front => 5,
        }
    }
}

/// Validates one primitive against the geometry contract.
///
/// # Errors
///
/// Returns [`SceneError::InvalidGeometry`] naming the primitive and field.
pub fn check_geometry(p: &Primitive) -> SceneResult<()> {
    if !p.position.is_finite() {
        return Err(SceneError::geometry(&p.name, "position", format!("{:?} is not finite", p.position)));
    }
    let size = p.size;
    if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(SceneError::geometry(&p.name, "size", format!("{size:?} must be finite and positive")));
    }
    if !p.color.is_valid() {
        return Err(SceneError::geometry(&p.name, "color", format!("{:?} is outside [0, 1]", p.color)));
    }
    if !(0.0..=1.0).contains(&p.transparency) {
        return Err(SceneError::geometry(&p.name, "transparency", format!("{} is outside [0, 1]", p.transparency)));
    }
    if let Some(target) = p.teleport_to {
        if !target.is_finite() {
            return Err(SceneError::geometry(&p.name, "teleport_to", format!("{target:?} is not finite")));
        }
    }
    if let Some(motion) = p.motion {
        if !motion.distance.is_finite() || !motion.speed.is_finite() {
            return Err(SceneError::geometry(&p.name, "motion", "distance and speed must be finite"));
        }
    }
    if let Some(spin) = p.spin {
        if !spin.speed.is_finite() {
            return Err(SceneError::geometry(&p.name, "spin", "speed must be finite"));
        }
    }
    if let Some(caption) = &p.caption {
        if !caption.color.is_valid() {
            return Err(SceneError::geometry(&p.name, "caption", format!("{:?} is outside [0, 1]", caption.color)));
        }
    }
    Ok(())
}

fn check_section(section: &Section) -> SceneResult<()> {
    let item = format!("section {}", section.index);
    if !section.entry.is_finite() {
        return Err(SceneError::geometry(&item, "entry", format!("{:?} is not finite", section.entry)));
    }
    if let Some(target) = section.teleport_target {
        if !target.is_finite() {
            return Err(SceneError::geometry(&item, "teleport_target", format!("{target:?} is not finite")));
        }
    }
    Ok(())
}

fn vector3_attribute(v: Vec3) -> AttributeValue {
    AttributeValue::Vector3([v.x as f32, v.y as f32, v.z as f32])
}

/// Folder name for a section.
#[must_use]
pub fn section_folder_name(section: &Section) -> String {
    format!("Section{}_{}", section.index, section.theme.as_str())
}

/// Writes scene documents for a game.
#[derive(Clone, Debug)]
pub struct SceneSerializer {
    game_name: String,
}

impl Default for SceneSerializer {
    fn default() -> Self {
        Self::new("Epic Obby")
    }
}

struct Containers {
    workspace: NodeId,
    server_scripts: NodeId,
    replicated: NodeId,
    player_scripts: NodeId,
    character_scripts: NodeId,
    gui: NodeId,
}

impl Containers {
    fn lookup(&self, location: &str) -> Option<NodeId> {
        match location {
            "ServerScriptService" => Some(self.server_scripts),
            "ReplicatedStorage" => Some(self.replicated),
            "StarterPlayerScripts" => Some(self.player_scripts),
            "StarterCharacterScripts" => Some(self.character_scripts),
            "StarterGui" => Some(self.gui),
            "Workspace" => Some(self.workspace),
            _ => None,
        }
    }
}

impl SceneSerializer {
    /// Creates a serializer for a titled game.
    #[must_use]
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
        }
    }

    /// Game title.
    #[must_use]
    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    /// Serializes a generated world.
    ///
    /// # Errors
    ///
    /// See [`SceneSerializer::serialize`].
    pub fn serialize_world(&self, world: &World, scripts: &[ScriptSource]) -> SceneResult<SceneDocument> {
        self.serialize(&world.primitives, &world.sections, &world.stages, scripts)
    }

    /// Builds the full document.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidGeometry`] for the first primitive or
    /// section that breaks the geometry contract.
    pub fn serialize(
        &self,
        primitives: &[Primitive],
        sections: &[Section],
        stages: &[Stage],
        scripts: &[ScriptSource],
    ) -> SceneResult<SceneDocument> {
        for p in primitives {
            check_geometry(p)?;
        }
        for s in sections {
            check_section(s)?;
        }

        let mut doc = SceneDocument::new();
        let workspace = doc.add_root("Workspace", "Workspace");
        doc.set(workspace, "FilteringEnabled", PropertyValue::Bool(true));
        let camera = doc.add_child(workspace, "Camera", "Camera");
        doc.set(camera, "CFrame", PropertyValue::cframe_at(CAMERA_POSITION));
        doc.set(camera, "FieldOfView", PropertyValue::Float(CAMERA_FIELD_OF_VIEW));
        let camera_ref = doc.node(camera).referent.clone();
        doc.set(workspace, "CurrentCamera", PropertyValue::Ref(Some(camera_ref)));

        let mut folders = Vec::with_capacity(sections.len());
        for section in sections {
            folders.push((section.index, self.add_section_folder(&mut doc, workspace, section, stages)));
        }

        for p in primitives {
            let parent = p
                .section
                .and_then(|i| folders.iter().find(|(index, _)| *index == i))
                .map_or(workspace, |(_, id)| *id);
            Self::add_part(&mut doc, parent, p, sections);
        }

        Self::add_lighting(&mut doc);
        let server_scripts = doc.add_root("ServerScriptService", "ServerScriptService");
        let replicated = doc.add_root("ReplicatedStorage", "ReplicatedStorage");
        Self::add_remotes(&mut doc, replicated);
        let player = doc.add_root("StarterPlayer", "StarterPlayer");
        doc.set(player, "CharacterWalkSpeed", PropertyValue::Float(WALK_SPEED));
        doc.set(player, "CharacterJumpPower", PropertyValue::Float(JUMP_POWER));
        let player_scripts = doc.add_child(player, "StarterPlayerScripts", "StarterPlayerScripts");
        let character_scripts = doc.add_child(player, "StarterCharacterScripts", "StarterCharacterScripts");
        let gui = doc.add_root("StarterGui", "StarterGui");
        doc.set(gui, "ResetOnSpawn", PropertyValue::Bool(false));
        doc.add_root("SoundService", "SoundService");
        doc.add_root("Teams", "Teams");

        let containers = Containers {
            workspace,
            server_scripts,
            replicated,
            player_scripts,
            character_scripts,
            gui,
        };
        for script in scripts {
            let parent = containers.lookup(&script.location).unwrap_or_else(|| {
                debug!(script = %script.name, location = %script.location, "unknown script location, using the server container");
                containers.server_scripts
            });
            Self::add_script(&mut doc, parent, script);
        }

        info!(
            game = %self.game_name,
            items = doc.len(),
            parts = primitives.len(),
            sections = sections.len(),
            scripts = scripts.len(),
            "scene document built"
        );
        Ok(doc)
    }

    fn add_section_folder(&self, doc: &mut SceneDocument, workspace: NodeId, section: &Section, stages: &[Stage]) -> NodeId {
        let folder = doc.add_child(workspace, "Folder", &section_folder_name(section));
        let stage_total = stages.iter().filter(|s| s.section == section.index).count();

        let mut attributes = AttributeMap::new();
        attributes.insert("SectionIndex", section.index as i32);
        attributes.insert("ThemeName", section.theme_name.as_str());
        attributes.insert("FirstStage", section.first_stage as i32);
        attributes.insert("LastStage", section.last_stage as i32);
        attributes.insert("StageCount", stage_total as i32);
        attributes.insert("SkyHint", section.sky_hint.as_str());
        attributes.insert("EntryPosition", vector3_attribute(section.entry));
        if !section.is_terminal() {
            if let Some(target) = section.teleport_target {
                attributes.insert("TeleportTo", vector3_attribute(target));
            }
        }
        if section.is_tutorial() {
            attributes.insert("GameName", self.game_name.as_str());
        }
        doc.set(folder, "AttributesSerialize", PropertyValue::BinaryString(attributes_base64(&attributes)));
        folder
    }

    fn add_part(doc: &mut SceneDocument, parent: NodeId, p: &Primitive, sections: &[Section]) {
        let spawn = p.has(SemanticFlags::SPAWN);
        let id = doc.add_child(parent, if spawn { "SpawnLocation" } else { "Part" }, &p.name);

        doc.set(id, "Anchored", PropertyValue::Bool(p.anchored));
        doc.set(id, "BottomSurface", PropertyValue::Token(0));
        doc.set(id, "TopSurface", PropertyValue::Token(0));
        doc.set(id, "CFrame", PropertyValue::cframe_at(p.position));
        doc.set(id, "CanCollide", PropertyValue::Bool(p.collidable));
        doc.set(id, "Color3uint8", PropertyValue::packed_color(p.color));
        doc.set(id, "Locked", PropertyValue::Bool(false));
        doc.set(id, "Material", PropertyValue::Token(p.material.code()));
        doc.set(id, "Transparency", PropertyValue::Float(p.transparency as f32));
        doc.set(id, "shape", PropertyValue::Token(p.kind.shape_token()));
        doc.set(id, "size", PropertyValue::Vector3(p.size));
        if spawn {
            doc.set(id, "AllowTeamChangeOnTouch", PropertyValue::Bool(false));
            doc.set(id, "Duration", PropertyValue::Int(0));
            doc.set(id, "Neutral", PropertyValue::Bool(true));
        }

        let (attributes, tags) = encode_semantics(&SemanticContext { primitive: p, sections });
        if !attributes.is_empty() {
            doc.set(id, "AttributesSerialize", PropertyValue::BinaryString(attributes_base64(&attributes)));
        }
        if !tags.is_empty() {
            doc.set(id, "Tags", PropertyValue::BinaryString(tags_base64(&tags)));
        }

        if let Some(caption) = &p.caption {
            Self::add_label(doc, id, caption, Face::Front);
            if caption.double_sided {
                Self::add_label(doc, id, caption, Face::Back);
            }
        }
    }

    fn add_label(doc: &mut SceneDocument, part: NodeId, caption: &Caption, face: Face) {
        let name = if face == Face::Front { "SurfaceGui" } else { "SurfaceGuiBack" };
        let gui = doc.add_child(part, "SurfaceGui", name);
        doc.set(gui, "Face", PropertyValue::Token(face.token()));
        doc.set(gui, "Active", PropertyValue::Bool(false));
        doc.set(gui, "CanvasSize", PropertyValue::Vector2(LABEL_CANVAS.0, LABEL_CANVAS.1));
        doc.set(gui, "ClipsDescendants", PropertyValue::Bool(true));

        let label = doc.add_child(gui, "TextLabel", "Label");
        doc.set(label, "Size", PropertyValue::UDim2(UDim2::from_scale(1.0, 1.0)));
        doc.set(label, "Position", PropertyValue::UDim2(UDim2::default()));
        doc.set(label, "Text", PropertyValue::String(caption.text.clone()));
        doc.set(label, "TextColor3", PropertyValue::Color3(caption.color));
        doc.set(label, "BackgroundColor3", PropertyValue::Color3(Color3::BLACK));
        doc.set(label, "BackgroundTransparency", PropertyValue::Float(LABEL_BACKGROUND_TRANSPARENCY));
        doc.set(label, "TextScaled", PropertyValue::Bool(true));
        doc.set(label, "Font", PropertyValue::Token(LABEL_FONT));
        doc.set(label, "TextSize", PropertyValue::Int(LABEL_TEXT_SIZE));
    }

    fn add_lighting(doc: &mut SceneDocument) {
        let lighting = doc.add_root("Lighting", "Lighting");
        doc.set(lighting, "Brightness", PropertyValue::Float(2.0));
        doc.set(lighting, "Ambient", PropertyValue::Color3(Color3::new(0.5, 0.5, 0.5)));
        doc.set(lighting, "OutdoorAmbient", PropertyValue::Color3(Color3::new(0.5, 0.5, 0.5)));
        doc.set(lighting, "TimeOfDay", PropertyValue::String("14:00:00".to_owned()));

        let atmosphere = doc.add_child(lighting, "Atmosphere", "Atmosphere");
        doc.set(atmosphere, "Density", PropertyValue::Float(0.3));
        let bloom = doc.add_child(lighting, "BloomEffect", "Bloom");
        doc.set(bloom, "Intensity", PropertyValue::Float(0.5));
        let grading = doc.add_child(lighting, "ColorCorrectionEffect", "ColorCorrection");
        doc.set(grading, "Saturation", PropertyValue::Float(GRADING_SATURATION));
        let rays = doc.add_child(lighting, "SunRaysEffect", "SunRays");
        doc.set(rays, "Intensity", PropertyValue::Float(SUN_RAYS_INTENSITY));
    }

    fn add_remotes(doc: &mut SceneDocument, replicated: NodeId) {
        let remotes = doc.add_child(replicated, "Folder", "Remotes");
        for name in REMOTE_EVENTS {
            doc.add_child(remotes, "RemoteEvent", name);
        }
        let functions = doc.add_child(replicated, "Folder", "RemoteFunctions");
        for name in REMOTE_FUNCTIONS {
            doc.add_child(functions, "RemoteFunction", name);
        }
    }

    fn add_script(doc: &mut SceneDocument, parent: NodeId, script: &ScriptSource) {
        let id = doc.add_child(parent, script.kind.class_name(), &script.name);
        doc.set(id, "Source", PropertyValue::ProtectedString(script.source.clone()));
        if script.kind == ScriptKind::Script {
            doc.set(id, "RunContext", PropertyValue::Token(0));
        }
    }
}
