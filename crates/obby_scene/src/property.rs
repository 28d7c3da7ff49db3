//! # Property Kinds
//!
//! Every property carries an explicit wire kind; the XML tag is derived
//! from it, never from the value.

use obby_core::{Color3, Vec3};

/// Identity rotation, row-major.
pub const IDENTITY_ROTATION: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Component names of a transform record.
pub const CFRAME_KEYS: [&str; 12] = ["X", "Y", "Z", "R00", "R01", "R02", "R10", "R11", "R12", "R20", "R21", "R22"];

/// Component names of a size/position-fraction record.
pub const UDIM2_KEYS: [&str; 4] = ["XS", "XO", "YS", "YO"];

/// Packs a color as `0xFF` alpha followed by red, green and blue bytes.
///
/// Channels are quantized with `round(c * 255)` and clamped to a byte.
#[must_use]
pub fn pack_color3uint8(color: Color3) -> u32 {
    let byte = |c: f64| u32::from((c * 255.0).round().clamp(0.0, 255.0) as u8);
    0xFF00_0000 | (byte(color.r) << 16) | (byte(color.g) << 8) | byte(color.b)
}

/// Size and position as scale/offset pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UDim2 {
    /// X scale.
    pub x_scale: f64,
    /// X offset in pixels.
    pub x_offset: i32,
    /// Y scale.
    pub y_scale: f64,
    /// Y offset in pixels.
    pub y_offset: i32,
}

impl UDim2 {
    /// Pure scale, no offsets.
    #[must_use]
    pub const fn from_scale(x: f64, y: f64) -> Self {
        Self {
            x_scale: x,
            x_offset: 0,
            y_scale: y,
            y_offset: 0,
        }
    }
}

/// Typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Plain text.
    String(String),
    /// Script source.
    ProtectedString(String),
    /// Base64 payload.
    BinaryString(String),
    /// Boolean.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Enumeration backed by an integer code.
    Token(u32),
    /// Packed color, see [`pack_color3uint8`].
    Color3uint8(u32),
    /// Float color.
    Color3(Color3),
    /// 3-vector.
    Vector3(Vec3),
    /// 2-vector.
    Vector2(f64, f64),
    /// Position followed by a row-major 3x3 rotation.
    CFrame([f64; 12]),
    /// UI size or position.
    UDim2(UDim2),
    /// Referent of another item, `None` for null.
    Ref(Option<String>),
}

impl PropertyValue {
    /// Transform at `position` with identity rotation.
    #[must_use]
    pub fn cframe_at(position: Vec3) -> Self {
        let mut record = [0.0; 12];
        record[..3].copy_from_slice(&position.to_array());
        record[3..].copy_from_slice(&IDENTITY_ROTATION);
        Self::CFrame(record)
    }

    /// Packed color property.
    #[must_use]
    pub fn packed_color(color: Color3) -> Self {
        Self::Color3uint8(pack_color3uint8(color))
    }

    /// XML element name for this kind.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::ProtectedString(_) => "ProtectedString",
            Self::BinaryString(_) => "BinaryString",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Token(_) => "token",
            Self::Color3uint8(_) => "Color3uint8",
            Self::Color3(_) => "Color3",
            Self::Vector3(_) => "Vector3",
            Self::Vector2(..) => "Vector2",
            Self::CFrame(_) => "CoordinateFrame",
            Self::UDim2(_) => "UDim2",
            Self::Ref(_) => "Ref",
        }
    }
}

/// Named property.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Typed value.
    pub value: PropertyValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        assert_eq!(pack_color3uint8(Color3::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(pack_color3uint8(Color3::new(0.0, 0.0, 0.0)), 0xFF00_0000);
        assert_eq!(pack_color3uint8(Color3::new(1.0, 1.0, 1.0)), 0xFFFF_FFFF);
        // 0.5 * 255 = 127.5 rounds up.
        assert_eq!(pack_color3uint8(Color3::new(0.5, 0.2, 0.0)), 0xFF80_3300);
    }

    #[test]
    fn test_cframe_identity() {
        let PropertyValue::CFrame(record) = PropertyValue::cframe_at(Vec3::new(1.0, 2.0, 3.0)) else {
            panic!("expected a transform");
        };
        assert_eq!(&record[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&record[3..], &IDENTITY_ROTATION);
    }

    #[test]
    fn test_tags() {
        assert_eq!(PropertyValue::CFrame([0.0; 12]).tag(), "CoordinateFrame");
        assert_eq!(PropertyValue::Token(1).tag(), "token");
        assert_eq!(PropertyValue::Ref(None).tag(), "Ref");
    }
}
