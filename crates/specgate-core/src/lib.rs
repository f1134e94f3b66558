//! SpecGate Core
//!
//! Structural gate for generated C code: a completion is accepted only if its
//! function and loop anchors match the skeleton it was generated from, and
//! only accepted completions receive specification text.
//!
//! # Core Concepts
//!
//! - [`SpecGate`]: extraction, validation and injection under one
//!   [`GateConfig`]
//! - [`GateError`]: every failure, split into rejections
//!   ([`GateError::is_rejection`]) and upstream defects
//!   ([`GateError::is_upstream_bug`])
//!
//! # Example
//!
//! ```rust,ignore
//! use specgate_core::{GateConfig, SpecArray, SpecGate};
//!
//! let gate = SpecGate::new(GateConfig::load("specgate.toml")?);
//! let specs = SpecArray::from_json(spec_json)?;
//! let annotated = gate.validate_and_inject(skeleton, completion, &specs)?;
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod gate;

pub use config::{GateConfig, PartialParsePolicy};
pub use error::{ConfigError, GateError, GateResult};
pub use gate::{
    extract_structure, inject_specs, validate_and_inject, validate_completion_matches_skeleton,
    SpecGate,
};

pub use specgate_inject::{InjectionReport, SpecArray, SpecLayout};
pub use specgate_structure::{ExtractError, Mismatch, Structure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
