//! # Obby Core
//!
//! Shared data model for obstacle-course worlds:
//! - Geometry primitives carrying an explicit set of semantic flags
//! - Section / stage records and the generation output triple
//! - The fixed player movement model
//!
//! ## Design Principles
//!
//! 1. **Plain data**: everything here is `serde`-friendly and exchanged
//!    with collaborators as-is
//! 2. **Flags, not names**: a part's role is a flag, never a naming convention
//! 3. **One movement model**: the generator and the validator measure
//!    gaps with the same functions
//!
//! ## Example
//!
//! ```rust,ignore
//! use obby_core::{Primitive, SemanticFlags, Vec3};
//!
//! let pad = Primitive::block("Checkpoint", Vec3::new(0.0, 5.0, 40.0), Vec3::new(8.0, 0.5, 8.0))
//!     .flagged(SemanticFlags::CHECKPOINT);
//! assert!(!obby_core::is_jump_critical(&pad));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ids;
pub mod layout;
pub mod material;
pub mod math;
pub mod movement;
pub mod primitive;
pub mod traversal;

pub use ids::{ArchetypeId, ThemeId, UnknownId};
pub use layout::{Section, Stage, World};
pub use material::{Axis, Material, PrimitiveKind};
pub use math::{Color3, Vec3};
pub use primitive::{Caption, Motion, Primitive, SemanticFlags, Spin, MIN_PART_SIZE};
pub use traversal::{is_jump_critical, traversal_order, OFF_PATH};
