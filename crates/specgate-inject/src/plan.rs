//! Injection planning
//!
//! Pairs each anchor of a [`Structure`] with the next spec slot, in traversal
//! order. The slot count contract is exact: too few or too many slots is a
//! [`PlanError::SpecArrayLengthMismatch`].

use serde::Serialize;
use specgate_structure::{Anchor, AnchorRef, Structure};

use crate::error::PlanError;
use crate::spec_array::SpecArray;

/// What an injection point annotates
///
/// The derived order (`Predicates < Function < Loop`) breaks offset ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionKind {
    /// File-level predicate block
    Predicates,
    /// Function contract
    Function,
    /// Loop annotation
    Loop,
}

/// One spec text to insert before the byte at `target_offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionPoint {
    /// What is being annotated
    pub kind: InjectionKind,
    /// Offset into the original buffer
    pub target_offset: usize,
    /// Text inserted verbatim
    pub spec_text: String,
    /// Human-readable target description
    pub label: String,
}

impl InjectionPoint {
    /// Create injection point
    #[inline]
    #[must_use]
    pub fn new(
        kind: InjectionKind,
        target_offset: usize,
        spec_text: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target_offset,
            spec_text: spec_text.into(),
            label: label.into(),
        }
    }

    /// Predicate block at the start of the file
    #[inline]
    #[must_use]
    pub fn predicates(spec_text: impl Into<String>) -> Self {
        Self::new(InjectionKind::Predicates, 0, spec_text, "predicates")
    }

    /// Sort key: offset, then kind priority
    #[inline]
    #[must_use]
    pub fn order_key(&self) -> (usize, InjectionKind) {
        (self.target_offset, self.kind)
    }
}

/// Builds injection points from a structure and a spec array
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectionPlanner;

impl InjectionPlanner {
    /// Create new planner instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Plan injection points in traversal order
    ///
    /// # Errors
    /// Returns [`PlanError::SpecArrayLengthMismatch`] unless `specs` holds
    /// exactly one slot per anchor (plus the predicate slot, if present).
    pub fn plan(&self, structure: &Structure, specs: &SpecArray) -> Result<Vec<InjectionPoint>, PlanError> {
        let expected_count = usize::from(specs.has_predicates()) + structure.anchor_count();
        let mismatch = PlanError::SpecArrayLengthMismatch {
            expected_count,
            actual_count: specs.len(),
        };
        if specs.len() != expected_count {
            return Err(mismatch);
        }

        let mut points = Vec::with_capacity(expected_count);
        if let Some(block) = specs.predicates() {
            points.push(InjectionPoint::predicates(block));
        }

        let mut cursor = specs.slots().iter();
        for anchor in structure.anchors() {
            let Some(text) = cursor.next() else {
                return Err(mismatch);
            };
            points.push(point_for(anchor, text));
        }
        if cursor.next().is_some() {
            return Err(mismatch);
        }

        tracing::debug!(
            "Planned {} injection point(s) for {} function(s)",
            points.len(),
            structure.functions().len()
        );
        Ok(points)
    }
}

fn point_for(anchor: AnchorRef<'_>, text: &str) -> InjectionPoint {
    match anchor {
        AnchorRef::Function(function) => InjectionPoint::new(
            InjectionKind::Function,
            function.start_offset(),
            text,
            format!("function '{}'", function.name()),
        ),
        AnchorRef::Loop {
            function,
            index,
            info,
        } => InjectionPoint::new(
            InjectionKind::Loop,
            info.start_offset(),
            text,
            format!("loop {index} in function '{}' ({})", function.name(), info.kind()),
        ),
    }
}

/// Plan with a default [`InjectionPlanner`]
///
/// # Errors
/// See [`InjectionPlanner::plan`].
#[inline]
pub fn plan(structure: &Structure, specs: &SpecArray) -> Result<Vec<InjectionPoint>, PlanError> {
    InjectionPlanner::new().plan(structure, specs)
}
