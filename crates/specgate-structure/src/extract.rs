//! Structure extraction
//!
//! Walks a syntax tree and produces the ordered function/loop inventory.
//!
//! # Rules
//! - Every `function_definition` outside another function's body is a
//!   function anchor, wherever it sits (top level, `#ifdef` blocks, ...).
//! - Inside a function body, every `for`, `while` and `do ... while` at any
//!   depth is a loop anchor. Other repetition (recursion, `goto` back edges)
//!   is not an anchor and is ignored.
//! - A function definition inside a function body fails extraction with
//!   [`ExtractError::NestedFunction`].

use crate::error::ExtractError;
use crate::model::{FunctionInfo, LoopInfo, LoopKind, Structure};
use crate::provider::{SyntaxNode, SyntaxProvider, TreeSitterC};

const FUNCTION_DEFINITION: &str = "function_definition";
const COMMENT: &str = "comment";

/// Extracts a [`Structure`] from source text
///
/// Stateless: every call parses afresh and shares nothing with other calls.
#[derive(Debug, Clone, Default)]
pub struct StructureExtractor<P = TreeSitterC> {
    provider: P,
}

impl StructureExtractor<TreeSitterC> {
    /// Create extractor backed by tree-sitter-c
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: TreeSitterC::new(),
        }
    }
}

impl<P: SyntaxProvider> StructureExtractor<P> {
    /// Create extractor over a custom provider
    #[inline]
    #[must_use]
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Extract the function/loop inventory of `source`
    ///
    /// Local error nodes are tolerated and recorded on the returned structure
    /// (see [`Structure::partial_parse`]).
    ///
    /// # Errors
    /// - [`ExtractError::Unparsable`] if the whole buffer failed to parse
    /// - [`ExtractError::NestedFunction`] for a definition inside a body
    /// - [`ExtractError::ParserInit`] if the provider could not start
    pub fn extract(&self, source: &str) -> Result<Structure, ExtractError> {
        let tree = self.provider.parse(source)?;
        if tree.is_unrecoverable() {
            return Err(ExtractError::unparsable(
                "error recovery covers the entire input",
            ));
        }

        let mut definitions = Vec::new();
        collect_definitions(tree.root(), &mut definitions);

        let functions = definitions
            .into_iter()
            .map(|def| function_info(def, source))
            .collect::<Result<Vec<_>, _>>()?;

        let regions = tree.error_regions();
        if !regions.is_empty() {
            tracing::warn!(
                "Tolerating {} local parse error region(s), first at byte {}",
                regions.len(),
                regions[0].start
            );
        }

        let structure = Structure::new(functions).with_error_regions(regions);
        tracing::debug!(
            "Extracted {} function(s) and {} loop(s)",
            structure.functions().len(),
            structure.loop_count()
        );
        Ok(structure)
    }
}

/// Extract with the default tree-sitter-c provider
///
/// # Errors
/// See [`StructureExtractor::extract`].
pub fn extract_structure(source: &str) -> Result<Structure, ExtractError> {
    StructureExtractor::new().extract(source)
}

/// Collect outermost function definitions in preorder
fn collect_definitions<'t>(node: &'t SyntaxNode, out: &mut Vec<&'t SyntaxNode>) {
    if node.kind == FUNCTION_DEFINITION {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect_definitions(child, out);
    }
}

fn function_info(def: &SyntaxNode, source: &str) -> Result<FunctionInfo, ExtractError> {
    let name = def
        .child_by_field("declarator")
        .and_then(|d| declared_name(d, source))
        .unwrap_or_else(|| "unknown".to_string());

    // Specifiers, return type and declarator; comments before the body are dropped.
    let parts: Vec<&SyntaxNode> = def
        .children
        .iter()
        .filter(|c| c.field.as_deref() != Some("body") && c.kind != COMMENT)
        .collect();
    let signature = parts
        .iter()
        .map(|c| c.text(source))
        .collect::<Vec<_>>()
        .join(" ");

    let mut loops = Vec::new();
    if let Some(body) = def.child_by_field("body") {
        collect_loops(body, source, &name, &mut loops)?;
    }

    Ok(FunctionInfo::new(name, signature, def.byte_range())
        .with_signature_tokens(tokens_of(&parts, source))
        .with_line(def.start_line)
        .with_loops(loops))
}

/// Follow the declarator chain (`pointer_declarator`, `function_declarator`,
/// parenthesized forms) down to the declared identifier
fn declared_name(node: &SyntaxNode, source: &str) -> Option<String> {
    match node.kind.as_str() {
        "identifier" | "field_identifier" => Some(node.text(source).to_string()),
        _ => node
            .child_by_field("declarator")
            .and_then(|d| declared_name(d, source))
            .or_else(|| {
                node.children
                    .iter()
                    .filter(|c| c.kind == "identifier" || c.kind.ends_with("declarator"))
                    .find_map(|c| declared_name(c, source))
            }),
    }
}

fn collect_loops(
    node: &SyntaxNode,
    source: &str,
    function_name: &str,
    out: &mut Vec<LoopInfo>,
) -> Result<(), ExtractError> {
    for child in &node.children {
        if child.kind == FUNCTION_DEFINITION {
            return Err(ExtractError::NestedFunction {
                outer: function_name.to_string(),
                offset: child.start_byte,
            });
        }
        if let Some(kind) = LoopKind::from_node_kind(&child.kind) {
            out.push(loop_info(child, kind, source));
        }
        collect_loops(child, source, function_name, out)?;
    }
    Ok(())
}

fn loop_info(node: &SyntaxNode, kind: LoopKind, source: &str) -> LoopInfo {
    let header = match kind {
        LoopKind::For => slice(source, node.start_byte, for_header_end(node)).to_string(),
        LoopKind::While => {
            let end = node
                .child_by_field("condition")
                .map_or_else(|| body_start(node), |c| c.end_byte);
            slice(source, node.start_byte, end).to_string()
        }
        LoopKind::DoWhile => do_while_header(node, source),
    };

    LoopInfo::new(kind, header, node.start_byte)
        .with_header_tokens(tokens_of(&header_parts(node, kind), source))
        .with_line(node.start_line)
}

/// Children making up a loop header: everything but the body, and for
/// `do ... while` also the closing `;`
fn header_parts(node: &SyntaxNode, kind: LoopKind) -> Vec<&SyntaxNode> {
    let limit = match kind {
        LoopKind::For => for_header_end(node),
        LoopKind::While | LoopKind::DoWhile => node.end_byte,
    };
    node.children
        .iter()
        .filter(|c| c.field.as_deref() != Some("body") && c.end_byte <= limit)
        .filter(|c| !(kind == LoopKind::DoWhile && c.kind == ";"))
        .collect()
}

/// Leaf token texts of `nodes` in document order, comments skipped
fn tokens_of(nodes: &[&SyntaxNode], source: &str) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        collect_tokens(node, source, &mut out);
    }
    out
}

fn collect_tokens(node: &SyntaxNode, source: &str, out: &mut Vec<String>) {
    if node.kind == COMMENT {
        return;
    }
    if node.children.is_empty() {
        let text = node.text(source);
        if !text.is_empty() {
            out.push(text.to_string());
        }
        return;
    }
    for child in &node.children {
        collect_tokens(child, source, out);
    }
}

/// End of the `)` that closes a `for` clause
fn for_header_end(node: &SyntaxNode) -> usize {
    let limit = body_start(node);
    node.children
        .iter()
        .rev()
        .find(|c| c.kind == ")" && c.end_byte <= limit)
        .map_or(limit, |c| c.end_byte)
}

/// `do` keyword, one space, then `while (cond)`; the body is left out
fn do_while_header(node: &SyntaxNode, source: &str) -> String {
    let keyword = node
        .children
        .iter()
        .find(|c| c.kind == "do")
        .map_or("do", |c| c.text(source));

    let tail = node
        .children
        .iter()
        .find(|c| c.kind == "while")
        .map(|w| {
            let end = node
                .child_by_field("condition")
                .map_or(w.end_byte, |c| c.end_byte);
            slice(source, w.start_byte, end)
        })
        .unwrap_or_default();

    if tail.is_empty() {
        keyword.to_string()
    } else {
        format!("{keyword} {tail}")
    }
}

#[inline]
fn body_start(node: &SyntaxNode) -> usize {
    node.child_by_field("body")
        .map_or(node.end_byte, |b| b.start_byte)
}

#[inline]
fn slice(source: &str, start: usize, end: usize) -> &str {
    source.get(start..end.max(start)).unwrap_or_default()
}
