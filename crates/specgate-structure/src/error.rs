//! Error types for structure extraction and comparison
//!
//! Extraction failures ([`ExtractError`]) mean the buffer could not be turned
//! into a [`Structure`](crate::Structure) at all. Comparison failures
//! ([`Mismatch`]) mean two well-formed structures disagree.

use std::ops::Range;

use crate::model::LoopKind;

/// Errors raised while turning a source buffer into a `Structure`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// Parser could not be configured for the grammar
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Source is unparsable beyond recovery
    #[error("source could not be parsed: {reason}")]
    Unparsable {
        /// Short description of why the parse was rejected
        reason: String,
    },

    /// A function definition appears inside another function's body
    #[error("nested function definition inside '{outer}' at byte {offset}")]
    NestedFunction {
        /// Name of the enclosing function
        outer: String,
        /// Start offset of the inner definition
        offset: usize,
    },

    /// Local error nodes were found and the caller asked for strict parsing
    #[error("partial parse: {} error region(s), first at byte {}", regions.len(), regions.first().map_or(0, |r| r.start))]
    PartialParse {
        /// Byte ranges covered by error or missing nodes
        regions: Vec<Range<usize>>,
    },

    /// Extracted structure broke one of its ordering/containment invariants
    #[error("structure invariant violated: {0}")]
    InvariantViolation(String),
}

impl ExtractError {
    /// Create an unparsable error with a reason
    pub fn unparsable(reason: impl Into<String>) -> Self {
        Self::Unparsable {
            reason: reason.into(),
        }
    }

    /// Whether this error is a parse failure of the source itself
    #[inline]
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::Unparsable { .. } | Self::NestedFunction { .. } | Self::PartialParse { .. }
        )
    }
}

/// First structural difference between an expected and an actual `Structure`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    /// Different number of function definitions
    #[error("function count mismatch: skeleton has {expected}, completion has {actual}")]
    FunctionCountMismatch {
        /// Functions in the skeleton
        expected: usize,
        /// Functions in the completion
        actual: usize,
    },

    /// Function at `index` has a different name
    #[error("function {index} name mismatch: '{expected_name}' vs '{actual_name}'")]
    FunctionNameMismatch {
        /// Position in document order
        index: usize,
        /// Name in the skeleton
        expected_name: String,
        /// Name in the completion
        actual_name: String,
    },

    /// Normalized signatures differ
    #[error("function '{function_name}' signature mismatch:\n  skeleton:   {expected}\n  completion: {actual}")]
    SignatureMismatch {
        /// Function being compared
        function_name: String,
        /// Normalized skeleton signature
        expected: String,
        /// Normalized completion signature
        actual: String,
    },

    /// Different number of loops inside a function
    #[error("function '{function_name}' loop count mismatch: skeleton has {expected}, completion has {actual}")]
    LoopCountMismatch {
        /// Function being compared
        function_name: String,
        /// Loops in the skeleton
        expected: usize,
        /// Loops in the completion
        actual: usize,
    },

    /// Loop at `loop_index` changed kind
    #[error("function '{function_name}' loop {loop_index} kind mismatch: {expected_kind} vs {actual_kind}")]
    LoopKindMismatch {
        /// Function being compared
        function_name: String,
        /// Loop position within the function
        loop_index: usize,
        /// Kind in the skeleton
        expected_kind: LoopKind,
        /// Kind in the completion
        actual_kind: LoopKind,
    },

    /// Normalized loop headers differ
    #[error("function '{function_name}' loop {loop_index} header mismatch:\n  skeleton:   {expected}\n  completion: {actual}")]
    LoopHeaderMismatch {
        /// Function being compared
        function_name: String,
        /// Loop position within the function
        loop_index: usize,
        /// Normalized skeleton header
        expected: String,
        /// Normalized completion header
        actual: String,
    },
}
