//! Syntax tree provider seam
//!
//! The extractor never talks to a concrete parser directly. It consumes an
//! owned [`SyntaxTree`] snapshot produced by a [`SyntaxProvider`], which keeps
//! the extraction logic independent of the parser's lifetimes and lets tests
//! drive it with hand-built trees.
//!
//! [`TreeSitterC`] is the default provider, backed by `tree-sitter-c`.

use std::ops::Range;

use crate::error::ExtractError;

/// Parses a source buffer into a [`SyntaxTree`]
pub trait SyntaxProvider {
    /// Parse `source`, tolerating local syntax errors
    ///
    /// # Errors
    /// Returns [`ExtractError`] only when no tree can be produced at all.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ExtractError>;
}

/// Owned snapshot of a single syntax node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar kind (`function_definition`, `for_statement`, `)` ...)
    pub kind: String,
    /// Field name under which this node hangs off its parent
    pub field: Option<String>,
    /// Inclusive start byte
    pub start_byte: usize,
    /// Exclusive end byte
    pub end_byte: usize,
    /// 1-based line of the first byte
    pub start_line: usize,
    /// Error-recovery node
    pub is_error: bool,
    /// Token inserted by the parser to recover from a missing one
    pub is_missing: bool,
    /// Children in source order
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a leaf node
    #[must_use]
    pub fn new(kind: impl Into<String>, span: Range<usize>) -> Self {
        let kind = kind.into();
        Self {
            is_error: kind == "ERROR",
            kind,
            field: None,
            start_byte: span.start,
            end_byte: span.end,
            start_line: 1,
            is_missing: false,
            children: Vec::new(),
        }
    }

    /// Attach this node to its parent under `field`
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the 1-based start line
    #[inline]
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.start_line = line;
        self
    }

    /// Append children
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Byte range covered by this node
    #[inline]
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    /// First child attached under `field`
    #[inline]
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|c| c.field.as_deref() == Some(field))
    }

    /// Slice of `source` covered by this node (empty if out of range)
    #[inline]
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.byte_range()).unwrap_or_default()
    }

    /// Whether this node is an error node or a parser-inserted token
    #[inline]
    #[must_use]
    pub fn is_recovery(&self) -> bool {
        self.is_error || self.is_missing
    }

    fn collect_error_regions(&self, out: &mut Vec<Range<usize>>) {
        if self.is_recovery() {
            out.push(self.byte_range());
            return;
        }
        for child in &self.children {
            child.collect_error_regions(out);
        }
    }
}

/// Parsed source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: SyntaxNode,
    /// Range from the first to one past the last non-whitespace byte
    content: Range<usize>,
}

impl SyntaxTree {
    /// Wrap a root node parsed from `source`
    #[must_use]
    pub fn new(root: SyntaxNode, source: &str) -> Self {
        let start = source.len() - source.trim_start().len();
        let end = source.trim_end().len().max(start);
        Self {
            root,
            content: start..end,
        }
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Byte ranges of every error or missing node (outermost only)
    #[must_use]
    pub fn error_regions(&self) -> Vec<Range<usize>> {
        let mut regions = Vec::new();
        self.root.collect_error_regions(&mut regions);
        regions
    }

    /// Whether the whole buffer failed to parse
    ///
    /// True when the root is itself an error node, or when every top-level
    /// child is an error node and together they cover all non-whitespace input.
    #[must_use]
    pub fn is_unrecoverable(&self) -> bool {
        if self.root.is_error {
            return true;
        }
        if self.content.is_empty() || self.root.children.is_empty() {
            return false;
        }
        if !self.root.children.iter().all(SyntaxNode::is_recovery) {
            return false;
        }
        let first = self.root.children.iter().map(|c| c.start_byte).min();
        let last = self.root.children.iter().map(|c| c.end_byte).max();
        matches!((first, last), (Some(s), Some(e)) if s <= self.content.start && e >= self.content.end)
    }
}

/// Default provider: tree-sitter with the C grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterC;

impl TreeSitterC {
    /// Create provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxProvider for TreeSitterC {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ExtractError> {
        // One parser per call; parsers are never shared between invocations.
        let language: tree_sitter::Language = tree_sitter_c::LANGUAGE.into();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| ExtractError::ParserInit(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::unparsable("parser produced no tree"))?;

        Ok(SyntaxTree::new(snapshot(tree.root_node(), None), source))
    }
}

/// Copy a tree-sitter node and its descendants into an owned [`SyntaxNode`]
fn snapshot(node: tree_sitter::Node<'_>, field: Option<&str>) -> SyntaxNode {
    let mut children = Vec::with_capacity(node.child_count());
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            children.push(snapshot(cursor.node(), cursor.field_name()));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    SyntaxNode {
        kind: node.kind().to_string(),
        field: field.map(str::to_string),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_line: node.start_position().row + 1,
        is_error: node.is_error(),
        is_missing: node.is_missing(),
        children,
    }
}
