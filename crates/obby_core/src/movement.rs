//! # Player Movement Model
//!
//! Fixed traversal constants for the default character controller
//! (walk 16, jump power 50, gravity 196.2). The generator builds against
//! these and the validator checks against them.

use crate::primitive::Primitive;

/// Highest rise a single jump can clear, in studs.
pub const MAX_JUMP_HEIGHT: f64 = 7.2;

/// Character hitbox width.
pub const CHARACTER_WIDTH: f64 = 2.0;

/// Edge-to-edge gap a sprinting player clears reliably.
pub const SAFE_GAP_SPRINT: f64 = 8.0;

/// Edge-to-edge gap a walking player clears reliably.
///
/// The generator bridges any segment longer than this.
pub const SAFE_GAP_WALK: f64 = 5.0;

/// Hard ceiling on any envelope's gap range.
pub const ABSOLUTE_MAX_GAP: f64 = SAFE_GAP_SPRINT;

/// Narrowest platform the generator places. Wider than the hitbox.
pub const MIN_PLATFORM_WIDTH: f64 = 3.0;

/// Default walk speed, studs/s.
pub const WALK_SPEED: f64 = 16.0;

/// Sprint speed, studs/s.
pub const SPRINT_SPEED: f64 = 24.0;

/// Default jump power.
pub const JUMP_POWER: f64 = 50.0;

/// World gravity, studs/s².
pub const GRAVITY: f64 = 196.2;

/// Gap lost per stud of rise.
pub const RISE_PENALTY: f64 = 0.5;

/// Gap gained per stud of drop.
pub const DROP_BONUS: f64 = 0.3;

/// Longest edge-to-edge gap allowed for a signed vertical delta.
///
/// Rising costs distance, dropping gains some.
#[inline]
#[must_use]
pub fn allowed_gap(base_safe_gap: f64, dy: f64) -> f64 {
    if dy > 0.0 {
        base_safe_gap - RISE_PENALTY * dy
    } else if dy < 0.0 {
        base_safe_gap + DROP_BONUS * dy.abs()
    } else {
        base_safe_gap
    }
}

/// Horizontal edge-to-edge gap between two parts.
///
/// Lateral and traversal gaps are clamped at zero before combining.
#[inline]
#[must_use]
pub fn edge_gap(a: &Primitive, b: &Primitive) -> f64 {
    let dx = ((b.position.x - a.position.x).abs() - (a.size.x + b.size.x) * 0.5).max(0.0);
    let dz = ((b.position.z - a.position.z).abs() - (a.size.z + b.size.z) * 0.5).max(0.0);
    dx.hypot(dz)
}

/// Signed vertical delta from `a` to `b`, center to center.
#[inline]
#[must_use]
pub fn vertical_delta(a: &Primitive, b: &Primitive) -> f64 {
    b.position.y - a.position.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn pad(x: f64, y: f64, z: f64) -> Primitive {
        Primitive::block("pad", Vec3::new(x, y, z), Vec3::new(4.0, 1.0, 4.0))
    }

    #[test]
    fn test_allowed_gap_directions() {
        assert_eq!(allowed_gap(8.0, 0.0), 8.0);
        assert_eq!(allowed_gap(8.0, 4.0), 6.0);
        assert!((allowed_gap(8.0, -10.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_gap_straight() {
        let gap = edge_gap(&pad(0.0, 0.0, 0.0), &pad(0.0, 0.0, 13.0));
        assert!((gap - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_gap_overlap_is_zero() {
        assert_eq!(edge_gap(&pad(0.0, 0.0, 0.0), &pad(1.0, 3.0, 2.0)), 0.0);
    }

    #[test]
    fn test_edge_gap_diagonal() {
        // 3 lateral, 4 along the course.
        let gap = edge_gap(&pad(0.0, 0.0, 0.0), &pad(7.0, 0.0, 8.0));
        assert!((gap - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_platform_wider_than_character() {
        assert!(MIN_PLATFORM_WIDTH > CHARACTER_WIDTH);
        assert!(SAFE_GAP_WALK < SAFE_GAP_SPRINT);
    }
}
