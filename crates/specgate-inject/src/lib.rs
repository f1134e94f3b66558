//! SpecGate Inject
//!
//! Attaches specification text to the anchors of a validated completion.
//!
//! # Core Concepts
//!
//! - [`SpecArray`]: ordered spec slots (predicates, then per-function and
//!   per-loop specs in traversal order)
//! - [`InjectionPlanner`]: `Structure` + `SpecArray` → [`InjectionPoint`]s
//! - [`apply`]: single-pass splice of the points into the original buffer
//!
//! # Example
//!
//! ```rust,ignore
//! use specgate_inject::{apply, plan, SpecArray};
//! use specgate_structure::extract_structure;
//!
//! let structure = extract_structure(completion)?;
//! let specs = SpecArray::from_json(spec_json)?;
//! let annotated = apply(completion, &plan(&structure, &specs)?)?;
//! ```

#![warn(unreachable_pub)]

mod error;
mod plan;
mod report;
mod spec_array;
mod splice;

pub use error::{PlanError, SpecShapeError, SpliceError};
pub use plan::{plan, InjectionKind, InjectionPlanner, InjectionPoint};
pub use report::InjectionReport;
pub use spec_array::{SpecArray, SpecLayout};
pub use splice::{apply, inserted_ranges};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
