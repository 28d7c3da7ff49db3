//! # Stud-Space Math
//!
//! Positions, sizes and colors. All spatial values are in studs.
//! The traversal axis is +Z, up is +Y.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 3-component vector in stud space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// Lateral axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// Traversal axis.
    pub z: f64,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every component is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the vector offset by the given amounts.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component-wise midpoint.
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(
            (self.x + other.x) * 0.5,
            (self.y + other.y) * 0.5,
            (self.z + other.z) * 0.5,
        )
    }

    /// Returns the vector as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// An RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color3 {
    /// Pure white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Hazard red, used when a theme defines no hazard color.
    pub const HAZARD_RED: Self = Self::new(1.0, 0.0, 0.0);
    /// Checkpoint green.
    pub const CHECKPOINT_GREEN: Self = Self::new(0.2, 1.0, 0.4);
    /// Teleport blue.
    pub const TELEPORT_BLUE: Self = Self::new(0.0, 0.6, 1.0);
    /// Trophy gold.
    pub const GOLD: Self = Self::new(1.0, 0.84, 0.0);

    /// Creates a new color.
    #[inline]
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Returns true if every channel is finite and within `[0, 1]`.
    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Clamps every channel into `[0, 1]`. Non-finite channels become 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        let fix = |c: f64| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
        Self::new(fix(self.r), fix(self.g), fix(self.b))
    }

    /// Scales brightness, clamped to the valid range.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor).clamped()
    }
}

impl From<[f64; 3]> for Color3 {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let a = Vec3::new(0.0, 2.0, 10.0);
        let b = Vec3::new(4.0, 6.0, 20.0);
        assert_eq!(a.midpoint(b), Vec3::new(2.0, 4.0, 15.0));
    }

    #[test]
    fn test_color_clamp() {
        let c = Color3::new(1.5, -0.2, f64::NAN).clamped();
        assert_eq!(c, Color3::new(1.0, 0.0, 0.0));
        assert!(c.is_valid());
        assert!(!Color3::new(0.5, 1.01, 0.0).is_valid());
    }

    #[test]
    fn test_vec_finite() {
        assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vec3::new(1.0, f64::INFINITY, 3.0).is_finite());
    }
}
