//! Error types for the gate
//!
//! Errors fall in two groups the caller treats differently:
//! - rejections: the completion is malformed or structurally different from
//!   its skeleton; drop the sample, never retry automatically
//! - upstream defects: the skeleton or the spec array is wrong; regenerating
//!   the completion cannot help

use std::path::PathBuf;

use specgate_inject::{PlanError, SpecShapeError, SpliceError};
use specgate_structure::{ExtractError, Mismatch};

/// Errors while loading a [`GateConfig`](crate::GateConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("invalid config: {0}")]
    Toml(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

/// Combined gate error
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Completion could not be extracted
    #[error("completion extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Skeleton could not be extracted
    #[error("skeleton extraction failed: {0}")]
    Skeleton(#[source] ExtractError),

    /// Completion structure differs from the skeleton
    #[error("structure mismatch: {0}")]
    Mismatch(#[from] Mismatch),

    /// Spec array does not fit the structure
    #[error("injection planning failed: {0}")]
    Plan(#[from] PlanError),

    /// Injection point could not be applied
    #[error("splice failed: {0}")]
    Splice(#[from] SpliceError),

    /// Spec array JSON has the wrong shape
    #[error("spec array error: {0}")]
    SpecShape(#[from] SpecShapeError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl GateError {
    /// The completion itself is at fault and should be rejected
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Extract(e) => e.is_parse_failure(),
            Self::Mismatch(_) => true,
            _ => false,
        }
    }

    /// The skeleton or spec array is at fault, not the completion
    #[inline]
    #[must_use]
    pub fn is_upstream_bug(&self) -> bool {
        matches!(self, Self::Skeleton(_) | Self::Plan(_) | Self::SpecShape(_))
    }
}

/// Result type alias for gate operations
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_is_rejection() {
        let err: GateError = Mismatch::FunctionCountMismatch {
            expected: 1,
            actual: 2,
        }
        .into();
        assert!(err.is_rejection());
        assert!(!err.is_upstream_bug());
        assert_eq!(
            err.to_string(),
            "structure mismatch: function count mismatch: skeleton has 1, completion has 2"
        );
    }

    #[test]
    fn length_mismatch_is_upstream_bug() {
        let err: GateError = PlanError::SpecArrayLengthMismatch {
            expected_count: 4,
            actual_count: 3,
        }
        .into();
        assert!(err.is_upstream_bug());
        assert!(!err.is_rejection());
    }

    #[test]
    fn skeleton_failure_is_not_a_rejection() {
        let err = GateError::Skeleton(ExtractError::unparsable("garbage"));
        assert!(!err.is_rejection());
        assert!(err.is_upstream_bug());
    }

    #[test]
    fn parser_init_failure_is_neither() {
        let err: GateError = ExtractError::ParserInit("abi".into()).into();
        assert!(!err.is_rejection());
        assert!(!err.is_upstream_bug());
    }
}
