//! # Serialization Errors

use thiserror::Error;

use crate::codec::CodecError;

/// Errors raised while building or writing a scene document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A primitive broke the geometry contract. Fatal for the whole document.
    #[error("invalid geometry on '{item}': {field} {detail}")]
    InvalidGeometry {
        /// Offending item name.
        item: String,
        /// Offending field.
        field: &'static str,
        /// What was wrong with it.
        detail: String,
    },

    /// A binary payload failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The XML writer failed.
    #[error("xml error: {0}")]
    Xml(String),
}

impl SceneError {
    pub(crate) fn geometry(item: &str, field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            item: item.to_owned(),
            field,
            detail: detail.into(),
        }
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
