//! Structural comparison of a skeleton against a completion
//!
//! Two structures are equivalent when their function and loop inventories
//! agree in count, order, name, signature and loop header. Signatures and
//! headers compare by their lexical tokens, so whitespace and comments between
//! tokens are ignored while `&&` and `& &` stay different. Checks run in a
//! fixed order and the first failure is returned, so diagnostics are
//! reproducible.

use crate::error::Mismatch;
use crate::model::{FunctionInfo, LoopInfo, Structure};
use crate::normalize::normalize;

/// Structural equivalence checker
///
/// Never mutates either structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compare `actual` against `expected`
    ///
    /// # Check order
    /// 1. function count
    /// 2. per function, in document order: name, signature, loop count,
    ///    then per loop: kind, header
    ///
    /// # Errors
    /// Returns the first [`Mismatch`] found.
    pub fn validate(&self, expected: &Structure, actual: &Structure) -> Result<(), Mismatch> {
        let (want, got) = (expected.functions(), actual.functions());
        if want.len() != got.len() {
            return Err(Mismatch::FunctionCountMismatch {
                expected: want.len(),
                actual: got.len(),
            });
        }

        want.iter()
            .zip(got)
            .enumerate()
            .try_for_each(|(index, (e, a))| Self::validate_function(index, e, a))
    }

    fn validate_function(
        index: usize,
        expected: &FunctionInfo,
        actual: &FunctionInfo,
    ) -> Result<(), Mismatch> {
        // Position matters: the same names in a different order is a mismatch.
        if expected.name() != actual.name() {
            return Err(Mismatch::FunctionNameMismatch {
                index,
                expected_name: expected.name().to_string(),
                actual_name: actual.name().to_string(),
            });
        }

        if expected.signature_tokens() != actual.signature_tokens() {
            return Err(Mismatch::SignatureMismatch {
                function_name: expected.name().to_string(),
                expected: normalize(expected.signature_text()),
                actual: normalize(actual.signature_text()),
            });
        }

        let (want, got) = (expected.loops(), actual.loops());
        if want.len() != got.len() {
            return Err(Mismatch::LoopCountMismatch {
                function_name: expected.name().to_string(),
                expected: want.len(),
                actual: got.len(),
            });
        }

        want.iter()
            .zip(got)
            .enumerate()
            .try_for_each(|(loop_index, (e, a))| Self::validate_loop(expected.name(), loop_index, e, a))
    }

    fn validate_loop(
        function_name: &str,
        loop_index: usize,
        expected: &LoopInfo,
        actual: &LoopInfo,
    ) -> Result<(), Mismatch> {
        if expected.kind() != actual.kind() {
            return Err(Mismatch::LoopKindMismatch {
                function_name: function_name.to_string(),
                loop_index,
                expected_kind: expected.kind(),
                actual_kind: actual.kind(),
            });
        }

        if expected.header_tokens() != actual.header_tokens() {
            return Err(Mismatch::LoopHeaderMismatch {
                function_name: function_name.to_string(),
                loop_index,
                expected: normalize(expected.header_text()),
                actual: normalize(actual.header_text()),
            });
        }

        Ok(())
    }
}

/// Compare with a default [`StructuralValidator`]
///
/// # Errors
/// Returns the first [`Mismatch`] found.
#[inline]
pub fn validate(expected: &Structure, actual: &Structure) -> Result<(), Mismatch> {
    StructuralValidator::new().validate(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoopKind;
    use pretty_assertions::assert_eq;

    fn function(name: &str, signature: &str, start: usize, loops: Vec<LoopInfo>) -> FunctionInfo {
        FunctionInfo::new(name, signature, start..start + 100).with_loops(loops)
    }

    fn one_loop(kind: LoopKind, header: &str) -> Structure {
        Structure::new(vec![function(
            "sum",
            "int sum(int *a, int n)",
            0,
            vec![LoopInfo::new(kind, header, 30)],
        )])
    }

    #[test]
    fn identical_structures_match() {
        let s = one_loop(LoopKind::For, "for (int i = 0; i < n; i++)");
        assert_eq!(validate(&s, &s.clone()), Ok(()));
    }

    #[test]
    fn empty_structures_match() {
        assert_eq!(validate(&Structure::default(), &Structure::default()), Ok(()));
    }

    #[test]
    fn function_count_checked_first() {
        let skeleton = Structure::new(vec![function("a", "void a()", 0, vec![])]);
        let completion = Structure::new(vec![
            function("b", "void b()", 0, vec![]),
            function("c", "void c()", 200, vec![]),
        ]);
        assert_eq!(
            validate(&skeleton, &completion),
            Err(Mismatch::FunctionCountMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn swapped_functions_fail_at_first_index() {
        let skeleton = Structure::new(vec![
            function("alpha", "void alpha()", 0, vec![]),
            function("beta", "void beta()", 200, vec![]),
        ]);
        let completion = Structure::new(vec![
            function("beta", "void beta()", 0, vec![]),
            function("alpha", "void alpha()", 200, vec![]),
        ]);
        assert_eq!(
            validate(&skeleton, &completion),
            Err(Mismatch::FunctionNameMismatch {
                index: 0,
                expected_name: "alpha".into(),
                actual_name: "beta".into(),
            })
        );
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn signature_whitespace_is_tolerated() {
        let sig = tokens(&["int", "f", "(", "int", "x", ",", "int", "y", ")"]);
        let a = Structure::new(vec![
            function("f", "int f(int x,int y)", 0, vec![]).with_signature_tokens(sig.clone()),
        ]);
        let b = Structure::new(vec![
            function("f", "int  f(int x, int y)\n", 0, vec![]).with_signature_tokens(sig),
        ]);
        assert_eq!(validate(&a, &b), Ok(()));
    }

    #[test]
    fn header_tokens_decide_not_text() {
        let a = Structure::new(vec![function(
            "f",
            "void f(int x, int y)",
            0,
            vec![LoopInfo::new(LoopKind::While, "while (x && y)", 30)
                .with_header_tokens(tokens(&["while", "(", "x", "&&", "y", ")"]))],
        )]);
        let b = Structure::new(vec![function(
            "f",
            "void f(int x, int y)",
            0,
            vec![LoopInfo::new(LoopKind::While, "while (x & &y)", 30)
                .with_header_tokens(tokens(&["while", "(", "x", "&", "&", "y", ")"]))],
        )]);
        assert_eq!(
            validate(&a, &b),
            Err(Mismatch::LoopHeaderMismatch {
                function_name: "f".into(),
                loop_index: 0,
                expected: "while (x && y)".into(),
                actual: "while (x & &y)".into(),
            })
        );
    }

    #[test]
    fn return_type_change_is_signature_mismatch() {
        let a = Structure::new(vec![function("f", "int f(int x, int y)", 0, vec![])]);
        let b = Structure::new(vec![function("f", "long f(int x, int y)", 0, vec![])]);
        assert_eq!(
            validate(&a, &b),
            Err(Mismatch::SignatureMismatch {
                function_name: "f".into(),
                expected: "int f(int x, int y)".into(),
                actual: "long f(int x, int y)".into(),
            })
        );
    }

    #[test]
    fn loop_count_mismatch() {
        let a = one_loop(LoopKind::While, "while (i < n)");
        let b = Structure::new(vec![function("sum", "int sum(int *a, int n)", 0, vec![])]);
        assert_eq!(
            validate(&a, &b),
            Err(Mismatch::LoopCountMismatch {
                function_name: "sum".into(),
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn loop_kind_mismatch() {
        let a = one_loop(LoopKind::For, "for (; i < n;)");
        let b = one_loop(LoopKind::While, "while (i < n)");
        assert_eq!(
            validate(&a, &b),
            Err(Mismatch::LoopKindMismatch {
                function_name: "sum".into(),
                loop_index: 0,
                expected_kind: LoopKind::For,
                actual_kind: LoopKind::While,
            })
        );
    }

    #[test]
    fn loop_header_mismatch_reports_normalized_text() {
        let a = one_loop(LoopKind::While, "while (i <  n)");
        let b = one_loop(LoopKind::While, "while (i <= n)");
        assert_eq!(
            validate(&a, &b),
            Err(Mismatch::LoopHeaderMismatch {
                function_name: "sum".into(),
                loop_index: 0,
                expected: "while (i < n)".into(),
                actual: "while (i <= n)".into(),
            })
        );
    }

    #[test]
    fn offsets_do_not_matter() {
        let a = one_loop(LoopKind::For, "for (;;)");
        let b = Structure::new(vec![FunctionInfo::new("sum", "int sum(int *a, int n)", 500..900)
            .with_loops(vec![LoopInfo::new(LoopKind::For, "for (;;)", 700)])]);
        assert_eq!(validate(&a, &b), Ok(()));
    }
}
