//! Error types for spec ingestion, planning and splicing

/// Spec array does not fit the structure it is applied to
///
/// Signals that the skeleton and the spec array came from different
/// originals; regenerating the completion cannot fix it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Slot count differs from `predicates + functions + loops`
    #[error("spec array length mismatch: structure needs {expected_count} slot(s), got {actual_count}")]
    SpecArrayLengthMismatch {
        /// Slots required by the structure
        expected_count: usize,
        /// Slots supplied
        actual_count: usize,
    },
}

/// Injection point cannot be applied to the buffer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    /// Offset lies past the end of the buffer
    #[error("injection offset {offset} is past the end of a {len}-byte buffer")]
    OffsetOutOfBounds {
        /// Offending offset
        offset: usize,
        /// Buffer length
        len: usize,
    },

    /// Offset splits a multi-byte character
    #[error("injection offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Offending offset
        offset: usize,
    },
}

/// Upstream spec array JSON has the wrong shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecShapeError {
    /// Top-level value is not an array
    #[error("spec array must be a JSON array")]
    NotAnArray,

    /// Array has no predicate slot at all
    #[error("spec array cannot be empty: element 0 must hold the predicates (use [] for none)")]
    Empty,

    /// Predicate entry is not a string
    #[error("predicate {index} must be a string")]
    PredicateNotString {
        /// Index within the predicate list
        index: usize,
    },

    /// Function/loop slot is not a string
    #[error("spec slot {index} must be a string")]
    SlotNotString {
        /// Index within the top-level array
        index: usize,
    },

    /// Malformed JSON
    #[error("invalid spec array json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SpecShapeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_display() {
        let err = PlanError::SpecArrayLengthMismatch {
            expected_count: 4,
            actual_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "spec array length mismatch: structure needs 4 slot(s), got 3"
        );
    }

    #[test]
    fn json_error_conversion() {
        let err: SpecShapeError = serde_json::from_str::<serde_json::Value>("[")
            .unwrap_err()
            .into();
        assert!(matches!(err, SpecShapeError::Json(_)));
    }
}
