//! Ordered specification slots
//!
//! Slot 0, when present, is the predicate block for the whole file. The
//! remaining slots follow the structure's traversal order: for each function,
//! its own spec, then one spec per loop of that function.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpecShapeError;

/// How slot text is shaped before insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecLayout {
    /// Insert slot text exactly as supplied
    #[default]
    Verbatim,
    /// Trim each slot and end it with a newline; blank slots insert nothing
    ///
    /// The text lands right before the anchor's first token, after any
    /// indentation. An indented loop therefore keeps its indentation in front
    /// of the spec, and the loop keyword itself moves to column 0:
    ///
    /// ```text
    ///     /*@ loop invariant 0 <= i; */
    /// for (i = 0; i < n; i++)
    /// ```
    Trimmed,
}

/// Ordered specification texts for one source file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecArray {
    predicates: Option<String>,
    slots: Vec<String>,
}

impl SpecArray {
    /// Create spec array with an optional predicate block
    #[inline]
    #[must_use]
    pub fn new(predicates: Option<String>, slots: Vec<String>) -> Self {
        Self { predicates, slots }
    }

    /// Create spec array with no predicate slot
    #[inline]
    #[must_use]
    pub fn without_predicates(slots: Vec<String>) -> Self {
        Self::new(None, slots)
    }

    /// Parse the upstream JSON shape
    ///
    /// # Errors
    /// Returns [`SpecShapeError`] for malformed JSON or a wrong shape.
    pub fn from_json(json: &str) -> Result<Self, SpecShapeError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Build from the upstream JSON shape
    ///
    /// Element 0 is either a list of predicate strings (joined by a blank
    /// line; blank entries dropped; an empty list means no predicate slot),
    /// a single string, or `null`. Every later element is one slot string.
    ///
    /// # Errors
    /// Returns [`SpecShapeError`] when the value does not have that shape.
    pub fn from_value(value: Value) -> Result<Self, SpecShapeError> {
        let Value::Array(items) = value else {
            return Err(SpecShapeError::NotAnArray);
        };
        let mut items = items.into_iter();
        let head = items.next().ok_or(SpecShapeError::Empty)?;

        let predicates = match head {
            Value::Null => None,
            Value::String(block) => Some(block),
            Value::Array(list) => join_predicates(list)?,
            _ => return Err(SpecShapeError::PredicateNotString { index: 0 }),
        };

        let slots = items
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s),
                _ => Err(SpecShapeError::SlotNotString { index: i + 1 }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(predicates, slots))
    }

    /// Whether slot 0 is a predicate block
    #[inline]
    #[must_use]
    pub fn has_predicates(&self) -> bool {
        self.predicates.is_some()
    }

    /// Predicate block, if any
    #[inline]
    #[must_use]
    pub fn predicates(&self) -> Option<&str> {
        self.predicates.as_deref()
    }

    /// Function and loop slots in traversal order
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Total slot count, predicate slot included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.has_predicates()) + self.slots.len()
    }

    /// Whether there are no slots at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot by flat index (predicate slot first when present)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        match (&self.predicates, index) {
            (Some(p), 0) => Some(p.as_str()),
            (Some(_), i) => self.slots.get(i - 1).map(String::as_str),
            (None, i) => self.slots.get(i).map(String::as_str),
        }
    }

    /// Copy of this array with `layout` applied to every slot
    #[must_use]
    pub fn with_layout(&self, layout: SpecLayout) -> Self {
        match layout {
            SpecLayout::Verbatim => self.clone(),
            SpecLayout::Trimmed => Self {
                predicates: self.predicates.as_deref().map(|p| terminate(p, "\n\n")),
                slots: self.slots.iter().map(|s| terminate(s, "\n")).collect(),
            },
        }
    }
}

fn join_predicates(list: Vec<Value>) -> Result<Option<String>, SpecShapeError> {
    let mut blocks = Vec::with_capacity(list.len());
    for (index, item) in list.into_iter().enumerate() {
        let Value::String(text) = item else {
            return Err(SpecShapeError::PredicateNotString { index });
        };
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            blocks.push(trimmed.to_string());
        }
    }

    if blocks.is_empty() {
        Ok(None)
    } else {
        Ok(Some(format!("{}\n\n", blocks.join("\n\n"))))
    }
}

fn terminate(text: &str, terminator: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}{terminator}")
    }
}
