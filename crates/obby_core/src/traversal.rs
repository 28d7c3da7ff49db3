//! # Traversal Order
//!
//! Which parts a player must jump between, and in what order. The
//! generator's repair pass and the validator both use this so they can
//! never disagree about the path.

use crate::primitive::{Primitive, SemanticFlags};

/// Roles that take a part off the jump path.
pub const OFF_PATH: SemanticFlags = SemanticFlags::HAZARD
    .union(SemanticFlags::BOUNDARY_WALL)
    .union(SemanticFlags::FLOOR)
    .union(SemanticFlags::TELEPORT_SOURCE)
    .union(SemanticFlags::TELEPORT_TARGET)
    .union(SemanticFlags::SECTION_ENTRY)
    .union(SemanticFlags::CHECKPOINT)
    .union(SemanticFlags::STAGE_MARKER)
    .union(SemanticFlags::SIGN)
    .union(SemanticFlags::DECORATIVE)
    .union(SemanticFlags::SPAWN)
    .union(SemanticFlags::STRUCTURE);

/// Name fragments that mark scenery on parts with no flags at all.
const UNFLAGGED_SCENERY: [&str; 5] = ["wall", "ring", "sign", "glow", "baseplate"];

/// Returns true if the part is a platform on the jump path.
///
/// Flags decide. Name matching only applies to parts that carry no
/// flags, e.g. geometry supplied by an older producer.
#[must_use]
pub fn is_jump_critical(part: &Primitive) -> bool {
    if !part.collidable || part.has(OFF_PATH) {
        return false;
    }
    if part.flags.is_empty() {
        let name = part.name.to_ascii_lowercase();
        return !UNFLAGGED_SCENERY.iter().any(|frag| name.contains(frag));
    }
    true
}

/// Orders jump-critical parts along the traversal axis.
///
/// Takes `(index, part)` pairs and returns the indices of the
/// jump-critical ones, sorted by Z with ties broken by index.
pub fn traversal_order<'a, I>(parts: I) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, &'a Primitive)>,
{
    let mut path: Vec<(usize, f64)> = parts
        .into_iter()
        .filter(|(_, p)| is_jump_critical(p))
        .map(|(i, p)| (i, p.position.z))
        .collect();
    path.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    path.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn part(name: &str, z: f64) -> Primitive {
        Primitive::block(name, Vec3::new(0.0, 5.0, z), Vec3::new(4.0, 1.0, 4.0))
    }

    #[test]
    fn test_flags_exclude() {
        assert!(is_jump_critical(&part("p", 0.0)));
        assert!(!is_jump_critical(&part("p", 0.0).flagged(SemanticFlags::HAZARD)));
        assert!(!is_jump_critical(&part("p", 0.0).flagged(SemanticFlags::CHECKPOINT)));
        assert!(!is_jump_critical(&part("p", 0.0).intangible()));
        assert!(is_jump_critical(&part("p", 0.0).flagged(SemanticFlags::BRIDGE)));
    }

    #[test]
    fn test_name_fallback_only_without_flags() {
        assert!(!is_jump_critical(&part("EntryRing", 0.0)));
        // A flagged part is never judged by its name.
        assert!(is_jump_critical(
            &part("ClimbWallLedge", 0.0).flagged(SemanticFlags::DISAPPEARING)
        ));
    }

    #[test]
    fn test_order_ties_keep_insertion() {
        let parts = [part("a", 10.0), part("b", 5.0), part("c", 10.0), part("d", 1.0)];
        let order = traversal_order(parts.iter().enumerate());
        assert_eq!(order, vec![3, 1, 0, 2]);
    }
}
