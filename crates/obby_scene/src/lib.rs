//! # Obby Scene
//!
//! Place-file serializer for generated obstacle-course worlds.
//!
//! ## Design Principles
//!
//! 1. **Reproducible**: each document owns its referent counter, so the same
//!    world always renders to the same bytes
//! 2. **Explicit kinds**: every property carries its wire kind; nothing is
//!    inferred from a value
//! 3. **Strict input**: geometry that is not finite or out of range aborts the
//!    document; the serializer never clamps what it did not generate
//!
//! ## Binary sub-formats
//!
//! - Attribute block (`AttributesSerialize`): count-prefixed typed map
//! - Tag set (`Tags`): null-delimited labels
//!
//! Both are base64 text inside the document. Decoders live next to the
//! encoders in [`codec`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use obby_scene::{to_xml_bytes, SceneSerializer};
//!
//! let doc = SceneSerializer::new("Epic Obby").serialize_world(&world, &[])?;
//! std::fs::write("obby.rbxlx", to_xml_bytes(&doc)?)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod codec;
pub mod document;
pub mod error;
pub mod metadata;
pub mod property;
pub mod referent;
pub mod script;
pub mod semantics;
pub mod serializer;
pub mod xml;

pub use codec::{
    attributes_base64, attributes_from_base64, decode_attributes, decode_tags, encode_attributes, encode_tags,
    tags_base64, tags_from_base64, AttributeMap, AttributeValue, CodecError, CodecResult, TagSet,
};
pub use document::{NodeId, SceneDocument, SceneNode};
pub use error::{SceneError, SceneResult};
pub use metadata::SceneMetadata;
pub use property::{pack_color3uint8, Property, PropertyValue, UDim2};
pub use referent::ReferentCounter;
pub use script::{ScriptKind, ScriptSource};
pub use semantics::{encode_semantics, SemanticContext, SEMANTIC_TABLE};
pub use serializer::{check_geometry, Face, SceneSerializer};
pub use xml::{to_xml_bytes, write_document};
