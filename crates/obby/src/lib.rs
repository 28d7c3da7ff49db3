//! # Obby
//!
//! End-to-end pipeline for generated obstacle-course games.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ obby_procedural  │────>│  obby_physics    │     │   obby_scene     │
//! │                  │     │                  │     │                  │
//! │ • themes         │     │ • gap / rise     │     │ • item tree      │
//! │ • difficulty     │     │ • walls          │     │ • attributes     │
//! │ • sections       │     │ • hazard floors  │     │ • tags           │
//! └────────┬─────────┘     └──────────────────┘     └────────▲─────────┘
//!          │                                                 │
//!          └──────────────────── World ──────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: the `obby.toml` file
//! - `pipeline`: generate, validate, serialize, write
//! - `error`: run failures

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod pipeline;

pub use obby_core as core;
pub use obby_physics as physics;
pub use obby_procedural as procedural;
pub use obby_scene as scene;

pub use config::{GenerationSettings, ObbyConfig, OutputSettings};
pub use error::{ObbyError, ObbyResult};
pub use pipeline::{write_atomic, Pipeline, RunSummary};
