//! # Obby Procedural Generation
//!
//! Deterministic obstacle-course generation for multi-section worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed, stage count and themes always produce the same world
//! 2. **Sectioned**: every section is built independently on its own RNG stream
//! 3. **Safe by construction**: creative randomness first, then an always-applied
//!    reachability pass so no jump exceeds the movement model
//!
//! ## Core Components
//!
//! - `ThemeRegistry`: built-in visual profiles plus per-section overrides
//! - `DifficultyProfile`: monotone, capped per-section envelopes
//! - `archetype`: obstacle library and tiering
//! - `section`: section builder with auto-bridging and scaffolding
//! - `WorldGenerator`: stage distribution and parallel section assembly
//!
//! ## Example
//!
//! ```rust,ignore
//! use obby_core::ThemeId;
//! use obby_procedural::{GeneratorConfig, WorldGenerator, WorldSeed};
//!
//! let generator = WorldGenerator::new(GeneratorConfig {
//!     seed: WorldSeed::new(12345),
//!     ..GeneratorConfig::default()
//! });
//! let world = generator.generate(30, &ThemeId::DEFAULT_SEQUENCE, &[]);
//! assert_eq!(world.sections.len(), 8);
//! assert_eq!(world.total_stages(), 30);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod archetype;
pub mod difficulty;
pub mod error;
pub mod repair;
pub mod section;
pub mod seed;
pub mod theme;
pub mod world;

pub use archetype::{build_obstacle, choose_archetype, tier, Obstacle, ObstacleContext};
pub use difficulty::{DifficultyEnvelope, DifficultyProfile, EnvelopeBounds, STANDARD_TABLE};
pub use error::{ConfigError, ConfigResult};
pub use repair::{enforce_reachability, RepairOutcome};
pub use section::{build_section, BuiltSection, SectionPlan, SECTION_SPACING};
pub use seed::WorldSeed;
pub use theme::{Theme, ThemeOverride, ThemeRegistry};
pub use world::{distribute_stages, GeneratorConfig, WorldGenerator};
