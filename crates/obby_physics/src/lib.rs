//! # Obby Physics
//!
//! Post-generation feasibility validator for obstacle-course worlds.
//!
//! ## Philosophy
//!
//! NEVER trust randomized output. The generator says "this course is
//! solvable". We verify:
//! 1. Can every jump be made under the movement model?
//! 2. Is every section sealed by boundary walls?
//! 3. Is falling always a failure, with no floor to walk around the course?
//!
//! Findings are returned as data in a [`ValidationReport`]; nothing here
//! returns an error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use obby_physics::{PhysicsValidator, ValidatorConfig};
//!
//! let validator = PhysicsValidator::new(ValidatorConfig::default());
//! let report = validator.validate(&world.primitives, &world.stages, &world.sections);
//! println!("{}", report.summary());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod issue;
pub mod report;
pub mod validator;

pub use config::ValidatorConfig;
pub use issue::{IssueKind, SuggestedFix, ValidationIssue};
pub use report::{ValidationReport, ValidationStats};
pub use validator::PhysicsValidator;
