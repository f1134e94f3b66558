//! The validate-then-inject gate

use rayon::prelude::*;
use specgate_inject::{apply, InjectionPlanner, InjectionReport, SpecArray};
use specgate_structure::{
    ExtractError, StructuralValidator, Structure, StructureExtractor, SyntaxProvider, TreeSitterC,
};

use crate::config::{GateConfig, PartialParsePolicy};
use crate::error::{GateError, GateResult};

/// Structural gate between a skeleton and its completions
///
/// Holds no per-call state; one instance can serve any number of calls,
/// including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct SpecGate<P = TreeSitterC> {
    config: GateConfig,
    extractor: StructureExtractor<P>,
}

impl SpecGate<TreeSitterC> {
    /// Create gate backed by tree-sitter-c
    #[inline]
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            extractor: StructureExtractor::new(),
        }
    }
}

impl<P: SyntaxProvider> SpecGate<P> {
    /// Create gate over a custom syntax provider
    #[inline]
    #[must_use]
    pub fn with_provider(config: GateConfig, provider: P) -> Self {
        Self {
            config,
            extractor: StructureExtractor::with_provider(provider),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Extract a structure, applying the partial-parse policy and invariant checks
    ///
    /// # Errors
    /// Any [`ExtractError`]; `PartialParse` only under
    /// [`PartialParsePolicy::Reject`].
    pub fn extract_structure(&self, source: &str) -> Result<Structure, ExtractError> {
        let structure = self.extractor.extract(source)?;

        if structure.partial_parse() && self.config.partial_parse == PartialParsePolicy::Reject {
            return Err(ExtractError::PartialParse {
                regions: structure.error_regions().to_vec(),
            });
        }
        if self.config.check_invariants {
            structure.check_invariants()?;
        }
        Ok(structure)
    }

    /// Accept `completion` only if its structure matches `skeleton`
    ///
    /// # Errors
    /// - [`GateError::Skeleton`] if the skeleton cannot be extracted
    /// - [`GateError::Extract`] if the completion cannot be extracted
    /// - [`GateError::Mismatch`] with the first structural difference
    pub fn validate_completion_matches_skeleton(
        &self,
        skeleton: &str,
        completion: &str,
    ) -> GateResult<()> {
        let expected = self.skeleton_structure(skeleton)?;
        self.check_completion(&expected, completion).map(|_| ())
    }

    /// Insert specs into `completion` at its anchors
    ///
    /// Does not compare against any skeleton; callers validate first.
    ///
    /// # Errors
    /// - [`GateError::Extract`] if the completion cannot be extracted
    /// - [`GateError::Plan`] if the spec array length does not fit
    pub fn inject_specs(&self, completion: &str, specs: &SpecArray) -> GateResult<String> {
        self.inject_specs_detailed(completion, specs)
            .map(|(annotated, _)| annotated)
    }

    /// [`inject_specs`](Self::inject_specs) plus a summary of what was injected
    ///
    /// # Errors
    /// See [`inject_specs`](Self::inject_specs).
    pub fn inject_specs_detailed(
        &self,
        completion: &str,
        specs: &SpecArray,
    ) -> GateResult<(String, InjectionReport)> {
        let structure = self.extract_structure(completion)?;
        self.inject_into(&structure, completion, specs)
    }

    /// Validate `completion` against `skeleton`, then inject `specs`
    ///
    /// The completion is parsed once; the structure that passed validation is
    /// the one the specs are planned against.
    ///
    /// # Errors
    /// Validation errors first, then injection errors.
    pub fn validate_and_inject(
        &self,
        skeleton: &str,
        completion: &str,
        specs: &SpecArray,
    ) -> GateResult<String> {
        let expected = self.skeleton_structure(skeleton)?;
        let actual = self.check_completion(&expected, completion)?;
        let (annotated, report) = self.inject_into(&actual, completion, specs)?;
        tracing::info!(
            "Injected {} function spec(s) and {} loop spec(s)",
            report.non_empty_function_specs,
            report.non_empty_loop_specs
        );
        Ok(annotated)
    }

    /// Validate many completions of one skeleton in parallel
    ///
    /// The skeleton is extracted once. Results keep the order of
    /// `completions`.
    ///
    /// # Errors
    /// [`GateError::Skeleton`] if the skeleton cannot be extracted; per
    /// completion failures are reported in the returned vector.
    pub fn validate_batch<S>(
        &self,
        skeleton: &str,
        completions: &[S],
    ) -> GateResult<Vec<GateResult<()>>>
    where
        S: AsRef<str> + Sync,
        P: Sync,
    {
        let expected = self.skeleton_structure(skeleton)?;
        let results: Vec<GateResult<()>> = completions
            .par_iter()
            .map(|completion| self.check_completion(&expected, completion.as_ref()).map(|_| ()))
            .collect();

        let accepted = results.iter().filter(|r| r.is_ok()).count();
        tracing::info!(
            "Batch validation: {}/{} completion(s) accepted",
            accepted,
            results.len()
        );
        Ok(results)
    }

    fn skeleton_structure(&self, skeleton: &str) -> GateResult<Structure> {
        self.extract_structure(skeleton).map_err(GateError::Skeleton)
    }

    fn check_completion(&self, expected: &Structure, completion: &str) -> GateResult<Structure> {
        let actual = match self.extract_structure(completion) {
            Ok(structure) => structure,
            Err(e) => {
                tracing::info!("Completion rejected: {}", e);
                return Err(e.into());
            }
        };

        match StructuralValidator::new().validate(expected, &actual) {
            Ok(()) => {
                tracing::debug!(
                    "Completion accepted ({} function(s), {} loop(s))",
                    actual.functions().len(),
                    actual.loop_count()
                );
                Ok(actual)
            }
            Err(mismatch) => {
                tracing::info!("Completion rejected: {}", mismatch);
                Err(mismatch.into())
            }
        }
    }

    fn inject_into(
        &self,
        structure: &Structure,
        completion: &str,
        specs: &SpecArray,
    ) -> GateResult<(String, InjectionReport)> {
        let specs = specs.with_layout(self.config.spec_layout);
        let points = InjectionPlanner::new().plan(structure, &specs)?;
        let annotated = apply(completion, &points)?;
        Ok((annotated, InjectionReport::from_plan(structure, &points)))
    }
}

/// Extract with the default gate configuration
///
/// # Errors
/// See [`SpecGate::extract_structure`].
pub fn extract_structure(source: &str) -> Result<Structure, ExtractError> {
    SpecGate::new(GateConfig::default()).extract_structure(source)
}

/// Validate with the default gate configuration
///
/// # Errors
/// See [`SpecGate::validate_completion_matches_skeleton`].
pub fn validate_completion_matches_skeleton(skeleton: &str, completion: &str) -> GateResult<()> {
    SpecGate::new(GateConfig::default()).validate_completion_matches_skeleton(skeleton, completion)
}

/// Inject with the default gate configuration
///
/// # Errors
/// See [`SpecGate::inject_specs`].
pub fn inject_specs(completion: &str, specs: &SpecArray) -> GateResult<String> {
    SpecGate::new(GateConfig::default()).inject_specs(completion, specs)
}

/// Validate then inject with the default gate configuration
///
/// # Errors
/// See [`SpecGate::validate_and_inject`].
pub fn validate_and_inject(skeleton: &str, completion: &str, specs: &SpecArray) -> GateResult<String> {
    SpecGate::new(GateConfig::default()).validate_and_inject(skeleton, completion, specs)
}
