//! SpecGate Structure
//!
//! Recovers the structural anchors of a C source buffer (function definitions
//! and the loops inside them) and compares two such inventories.
//!
//! # Core Concepts
//!
//! - [`Structure`]: ordered function inventory, each with its ordered loops
//! - [`Anchor`]: anything with a start offset that specs can be attached to
//! - [`StructureExtractor`]: syntax tree → `Structure`
//! - [`StructuralValidator`]: skeleton `Structure` vs completion `Structure`
//! - [`SyntaxProvider`]: the parser seam ([`TreeSitterC`] by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use specgate_structure::{extract_structure, validate};
//!
//! let skeleton = extract_structure(skeleton_src)?;
//! let completion = extract_structure(completion_src)?;
//! validate(&skeleton, &completion)?;
//! ```

#![warn(unreachable_pub)]

mod compare;
mod error;
mod extract;
mod model;
mod normalize;
pub mod provider;

pub use compare::{validate, StructuralValidator};
pub use error::{ExtractError, Mismatch};
pub use extract::{extract_structure, StructureExtractor};
pub use model::{
    Anchor, AnchorKind, AnchorRef, FunctionInfo, FunctionSummary, LoopInfo, LoopKind, Structure,
    StructureSummary,
};
pub use normalize::normalize;
pub use provider::{SyntaxNode, SyntaxProvider, SyntaxTree, TreeSitterC};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
