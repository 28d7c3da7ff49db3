//! # Binary Sub-Encodings
//!
//! Two payloads embedded as base64 text inside the scene file.
//!
//! ## Attribute block
//!
//! ```text
//! u32 LE  entry count
//! entry:  u32 LE key length, UTF-8 key, u8 type tag, payload
//!
//! 0x02 String   u32 LE length + UTF-8
//! 0x03 Bool     u8 (0 or 1)
//! 0x04 Int32    i32 LE
//! 0x06 Float64  f64 LE
//! 0x11 Vector3  3 x f32 LE
//! ```
//!
//! An empty map is the four zero bytes of the count.
//!
//! ## Tag set
//!
//! UTF-8 labels joined by a single `0x00`, no leading or trailing
//! delimiter. An empty set is an empty byte string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// String attribute tag.
pub const TYPE_STRING: u8 = 0x02;
/// Bool attribute tag.
pub const TYPE_BOOL: u8 = 0x03;
/// Int32 attribute tag.
pub const TYPE_INT32: u8 = 0x04;
/// Float64 attribute tag.
pub const TYPE_FLOAT64: u8 = 0x06;
/// Vector3 attribute tag.
pub const TYPE_VECTOR3: u8 = 0x11;

/// Tag-set delimiter.
pub const TAG_DELIMITER: u8 = 0x00;

/// Errors raised while decoding a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Payload ended early.
    #[error("payload truncated at byte {offset}: {needed} more bytes needed")]
    Truncated {
        /// Read position.
        offset: usize,
        /// Bytes missing.
        needed: usize,
    },

    /// Unrecognized attribute type tag.
    #[error("unknown attribute type 0x{tag:02X} at byte {offset}")]
    UnknownType {
        /// The tag byte.
        tag: u8,
        /// Position of the tag byte.
        offset: usize,
    },

    /// A key, string or label is not UTF-8.
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Start of the bad string.
        offset: usize,
    },

    /// Text is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// UTF-8 text.
    String(String),
    /// Boolean, never written as an integer.
    Bool(bool),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Full-precision double.
    Float64(f64),
    /// Single-precision 3-vector.
    Vector3([f32; 3]),
}

impl AttributeValue {
    /// Wire type tag.
    #[must_use]
    pub const fn type_tag(&self) -> u8 {
        match self {
            Self::String(_) => TYPE_STRING,
            Self::Bool(_) => TYPE_BOOL,
            Self::Int32(_) => TYPE_INT32,
            Self::Float64(_) => TYPE_FLOAT64,
            Self::Vector3(_) => TYPE_VECTOR3,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

/// Insertion-ordered attribute map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeMap {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Sets a key, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Insertion-ordered, de-duplicated label set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet {
    labels: Vec<String>,
}

impl TagSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Adds a label unless already present.
    pub fn insert(&mut self, label: &str) {
        if !self.contains(label) {
            self.labels.push(label.to_owned());
        }
    }

    /// Returns true if the label is present.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the set has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// Little-endian attribute block writer.
#[derive(Debug, Default)]
pub struct AttributeWriter {
    buffer: Vec<u8>,
}

impl AttributeWriter {
    /// Creates a writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an f32 in little-endian format.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an f64 in little-endian format.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a u32-length-prefixed UTF-8 string.
    #[inline]
    pub fn write_str(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    /// Writes one typed value, tag first.
    pub fn write_value(&mut self, value: &AttributeValue) {
        self.write_u8(value.type_tag());
        match value {
            AttributeValue::String(s) => self.write_str(s),
            AttributeValue::Bool(b) => self.write_u8(u8::from(*b)),
            AttributeValue::Int32(i) => self.write_i32(*i),
            AttributeValue::Float64(f) => self.write_f64(*f),
            AttributeValue::Vector3(v) => {
                for c in v {
                    self.write_f32(*c);
                }
            }
        }
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Little-endian attribute block reader.
#[derive(Debug)]
pub struct AttributeReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> AttributeReader<'a> {
    /// Creates a reader over a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    fn take(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::Truncated {
                offset: self.position,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Reads a u32 in little-endian format.
    #[inline]
    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.take_array().map(u32::from_le_bytes)
    }

    /// Reads an i32 in little-endian format.
    #[inline]
    pub fn read_i32(&mut self) -> CodecResult<i32> {
        self.take_array().map(i32::from_le_bytes)
    }

    /// Reads an f32 in little-endian format.
    #[inline]
    pub fn read_f32(&mut self) -> CodecResult<f32> {
        self.take_array().map(f32::from_le_bytes)
    }

    /// Reads an f64 in little-endian format.
    #[inline]
    pub fn read_f64(&mut self) -> CodecResult<f64> {
        self.take_array().map(f64::from_le_bytes)
    }

    /// Reads a u32-length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> CodecResult<String> {
        let len = self.read_u32()? as usize;
        let offset = self.position;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    /// Reads one typed value, tag first.
    pub fn read_value(&mut self) -> CodecResult<AttributeValue> {
        let offset = self.position;
        match self.read_u8()? {
            TYPE_STRING => self.read_str().map(AttributeValue::String),
            TYPE_BOOL => Ok(AttributeValue::Bool(self.read_u8()? != 0)),
            TYPE_INT32 => self.read_i32().map(AttributeValue::Int32),
            TYPE_FLOAT64 => self.read_f64().map(AttributeValue::Float64),
            TYPE_VECTOR3 => Ok(AttributeValue::Vector3([self.read_f32()?, self.read_f32()?, self.read_f32()?])),
            tag => Err(CodecError::UnknownType { tag, offset }),
        }
    }
}

/// Encodes an attribute block.
#[must_use]
pub fn encode_attributes(map: &AttributeMap) -> Vec<u8> {
    let mut writer = AttributeWriter::with_capacity(4 + map.len() * 24);
    writer.write_u32(map.len() as u32);
    for (key, value) in map.iter() {
        writer.write_str(key);
        writer.write_value(value);
    }
    writer.into_bytes()
}

/// Decodes an attribute block.
///
/// # Errors
///
/// Returns a [`CodecError`] on truncation, an unknown type tag or bad UTF-8.
pub fn decode_attributes(bytes: &[u8]) -> CodecResult<AttributeMap> {
    let mut reader = AttributeReader::new(bytes);
    let count = reader.read_u32()?;
    let mut map = AttributeMap::new();
    for _ in 0..count {
        let key = reader.read_str()?;
        let value = reader.read_value()?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Encodes a tag set.
#[must_use]
pub fn encode_tags(tags: &TagSet) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, label) in tags.iter().enumerate() {
        if i > 0 {
            out.push(TAG_DELIMITER);
        }
        out.extend_from_slice(label.as_bytes());
    }
    out
}

/// Decodes a tag set.
///
/// # Errors
///
/// Returns [`CodecError::InvalidUtf8`] if a label is not UTF-8.
pub fn decode_tags(bytes: &[u8]) -> CodecResult<TagSet> {
    let mut set = TagSet::new();
    if bytes.is_empty() {
        return Ok(set);
    }
    let mut offset = 0;
    for chunk in bytes.split(|&b| b == TAG_DELIMITER) {
        let label = std::str::from_utf8(chunk).map_err(|_| CodecError::InvalidUtf8 { offset })?;
        set.insert(label);
        offset += chunk.len() + 1;
    }
    Ok(set)
}

/// Encodes an attribute block as base64.
#[must_use]
pub fn attributes_base64(map: &AttributeMap) -> String {
    STANDARD.encode(encode_attributes(map))
}

/// Encodes a tag set as base64.
#[must_use]
pub fn tags_base64(tags: &TagSet) -> String {
    STANDARD.encode(encode_tags(tags))
}

/// Decodes a base64 attribute block.
///
/// # Errors
///
/// Returns [`CodecError::Base64`] for bad text, otherwise as [`decode_attributes`].
pub fn attributes_from_base64(text: &str) -> CodecResult<AttributeMap> {
    let bytes = STANDARD.decode(text.trim()).map_err(|e| CodecError::Base64(e.to_string()))?;
    decode_attributes(&bytes)
}

/// Decodes a base64 tag set.
///
/// # Errors
///
/// Returns [`CodecError::Base64`] for bad text, otherwise as [`decode_tags`].
pub fn tags_from_base64(text: &str) -> CodecResult<TagSet> {
    let bytes = STANDARD.decode(text.trim()).map_err(|e| CodecError::Base64(e.to_string()))?;
    decode_tags(&bytes)
}
