//! # Semantic Table
//!
//! Fixed mapping from a primitive's semantic flags to attribute keys and
//! tag labels. Flags without a row contribute nothing.

use obby_core::{Primitive, Section, SemanticFlags};

use crate::codec::{AttributeMap, AttributeValue, TagSet};

/// Fallback motion axis when a moving part has no motion record.
pub const DEFAULT_MOVE_AXIS: &str = "x";
/// Fallback motion distance.
pub const DEFAULT_MOVE_DISTANCE: f64 = 10.0;
/// Fallback motion speed.
pub const DEFAULT_MOVE_SPEED: f64 = 4.0;
/// Fallback spin speed.
pub const DEFAULT_SPIN_SPEED: f64 = 2.0;
/// Fallback spin axis.
pub const DEFAULT_SPIN_AXIS: &str = "y";

/// Lookup context for one primitive.
pub struct SemanticContext<'a> {
    /// The primitive being encoded.
    pub primitive: &'a Primitive,
    /// Sections of the world, for theme names.
    pub sections: &'a [Section],
}

impl SemanticContext<'_> {
    fn theme_name(&self) -> Option<&str> {
        let index = self.primitive.section?;
        self.sections
            .iter()
            .find(|s| s.index == index)
            .map(|s| s.theme_name.as_str())
    }

    fn stage(&self) -> Option<i32> {
        self.primitive.stage.map(|s| s as i32)
    }
}

type AttributeFn = fn(&SemanticContext<'_>, &mut AttributeMap);

/// One row of the table.
pub struct SemanticRule {
    /// Flag this row applies to.
    pub flag: SemanticFlags,
    /// Tag label added, if any.
    pub tag: Option<&'static str>,
    /// Attribute writer, if any.
    pub attributes: Option<AttributeFn>,
}

fn moving(ctx: &SemanticContext<'_>, map: &mut AttributeMap) {
    let (axis, distance, speed) = ctx.primitive.motion.map_or(
        (DEFAULT_MOVE_AXIS, DEFAULT_MOVE_DISTANCE, DEFAULT_MOVE_SPEED),
        |m| (m.axis.as_str(), m.distance, m.speed),
    );
    map.insert("MoveAxis", axis);
    map.insert("MoveDistance", distance);
    map.insert("MoveSpeed", speed);
}

fn spinning(ctx: &SemanticContext<'_>, map: &mut AttributeMap) {
    let (speed, axis) = ctx
        .primitive
        .spin
        .map_or((DEFAULT_SPIN_SPEED, DEFAULT_SPIN_AXIS), |s| (s.speed, s.axis.as_str()));
    map.insert("SpinSpeed", speed);
    map.insert("SpinAxis", axis);
}

fn teleport(ctx: &SemanticContext<'_>, map: &mut AttributeMap) {
    if let Some(target) = ctx.primitive.teleport_to {
        map.insert(
            "TeleportTo",
            AttributeValue::Vector3([target.x as f32, target.y as f32, target.z as f32]),
        );
    }
}

fn checkpoint(ctx: &SemanticContext<'_>, map: &mut AttributeMap) {
    if let Some(stage) = ctx.stage() {
        map.insert("Stage", stage);
    }
}

fn stage_marker(ctx: &SemanticContext<'_>, map: &mut AttributeMap) {
    if let Some(stage) = ctx.stage() {
        map.insert("Stage", stage);
    }
    if let Some(theme) = ctx.theme_name() {
        map.insert("ThemeName", theme);
    }
}

fn hazard(_: &SemanticContext<'_>, map: &mut AttributeMap) {
    map.insert("IsKillBrick", true);
}

fn disappearing(_: &SemanticContext<'_>, map: &mut AttributeMap) {
    map.insert("IsDisappearing", true);
}

/// The table, applied in row order.
pub const SEMANTIC_TABLE: [SemanticRule; 9] = [
    SemanticRule {
        flag: SemanticFlags::MOVING,
        tag: Some("MovingPlatform"),
        attributes: Some(moving),
    },
    SemanticRule {
        flag: SemanticFlags::SPINNING,
        tag: Some("SpinningObstacle"),
        attributes: Some(spinning),
    },
    SemanticRule {
        flag: SemanticFlags::TELEPORT_SOURCE,
        tag: Some("TeleportPad"),
        attributes: Some(teleport),
    },
    SemanticRule {
        flag: SemanticFlags::CHECKPOINT,
        tag: Some("Checkpoint"),
        attributes: Some(checkpoint),
    },
    SemanticRule {
        flag: SemanticFlags::STAGE_MARKER,
        tag: None,
        attributes: Some(stage_marker),
    },
    SemanticRule {
        flag: SemanticFlags::HAZARD,
        tag: Some("KillBrick"),
        attributes: Some(hazard),
    },
    SemanticRule {
        flag: SemanticFlags::DISAPPEARING,
        tag: Some("DisappearingPlatform"),
        attributes: Some(disappearing),
    },
    SemanticRule {
        flag: SemanticFlags::SECTION_ENTRY,
        tag: Some("SectionEntry"),
        attributes: None,
    },
    SemanticRule {
        flag: SemanticFlags::VICTORY,
        tag: Some("VictoryPad"),
        attributes: None,
    },
];

/// Attributes and tags for a primitive.
#[must_use]
pub fn encode_semantics(ctx: &SemanticContext<'_>) -> (AttributeMap, TagSet) {
    let mut attributes = AttributeMap::new();
    let mut tags = TagSet::new();
    for rule in SEMANTIC_TABLE.iter().filter(|r| ctx.primitive.flags.contains(r.flag)) {
        if let Some(write) = rule.attributes {
            write(ctx, &mut attributes);
        }
        if let Some(tag) = rule.tag {
            tags.insert(tag);
        }
    }
    (attributes, tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obby_core::{Axis, Motion, Vec3};

    fn encode(p: &Primitive) -> (AttributeMap, TagSet) {
        encode_semantics(&SemanticContext {
            primitive: p,
            sections: &[],
        })
    }

    fn part() -> Primitive {
        Primitive::block("P", Vec3::new(0.0, 5.0, 0.0), Vec3::new(4.0, 1.0, 4.0))
    }

    #[test]
    fn test_table_covers_fixed_flags() {
        let covered = SEMANTIC_TABLE.iter().fold(SemanticFlags::NONE, |acc, r| acc.union(r.flag));
        let expected = [
            SemanticFlags::MOVING,
            SemanticFlags::SPINNING,
            SemanticFlags::TELEPORT_SOURCE,
            SemanticFlags::CHECKPOINT,
            SemanticFlags::STAGE_MARKER,
            SemanticFlags::HAZARD,
            SemanticFlags::DISAPPEARING,
            SemanticFlags::SECTION_ENTRY,
            SemanticFlags::VICTORY,
        ]
        .into_iter()
        .fold(SemanticFlags::NONE, SemanticFlags::union);
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_unmapped_flags_contribute_nothing() {
        let p = part().flagged(SemanticFlags::BOUNDARY_WALL.union(SemanticFlags::DECORATIVE));
        let (attributes, tags) = encode(&p);
        assert!(attributes.is_empty());
        assert!(tags.is_empty());
    }

    #[test]
    fn test_moving_hazard() {
        let p = part()
            .flagged(SemanticFlags::MOVING.union(SemanticFlags::HAZARD))
            .moving(Motion {
                axis: Axis::Z,
                distance: 6.0,
                speed: 3.0,
            });
        let (attributes, tags) = encode(&p);
        assert_eq!(attributes.get("MoveAxis"), Some(&AttributeValue::String("z".into())));
        assert_eq!(attributes.get("MoveDistance"), Some(&AttributeValue::Float64(6.0)));
        assert_eq!(attributes.get("IsKillBrick"), Some(&AttributeValue::Bool(true)));
        assert_eq!(tags.iter().collect::<Vec<_>>(), ["MovingPlatform", "KillBrick"]);
    }

    #[test]
    fn test_checkpoint_stage_is_int() {
        let mut p = part().flagged(SemanticFlags::CHECKPOINT);
        p.stage = Some(3);
        let (attributes, _) = encode(&p);
        assert_eq!(attributes.get("Stage"), Some(&AttributeValue::Int32(3)));
    }
}
