//! Whitespace normalization for diagnostics and listings
//!
//! Comparison never looks at this form; it uses the lexical tokens recorded
//! by the extractor (see [`FunctionInfo::signature_tokens`]).
//!
//! [`FunctionInfo::signature_tokens`]: crate::FunctionInfo::signature_tokens

/// Collapse every run of whitespace to one space and trim both ends
///
/// This is the readable form used in diagnostics and summaries.
///
/// # Example
/// ```
/// use specgate_structure::normalize;
///
/// assert_eq!(normalize("  int  f(int x,\n\tint y) "), "int f(int x, int y)");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
