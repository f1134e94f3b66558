//! Structural anchor model
//!
//! A [`Structure`] is the ordered inventory of function definitions in one
//! source buffer, each carrying the ordered inventory of loops in its body.
//!
//! # Ordering
//!
//! Functions are totally ordered by ascending `start_offset`, and so are the
//! loops of each function. The constructors enforce this order, so it holds
//! for every `Structure` regardless of how it was built. Because an outer
//! loop's header is lexically before anything in its body, ordering by start
//! offset also interleaves nested loops correctly: outer, inner, next sibling.

use std::fmt::{self, Display, Formatter};
use std::ops::Range;

use serde::Serialize;

use crate::error::ExtractError;
use crate::normalize::normalize;

/// Loop construct tracked as an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopKind {
    /// `for (init; cond; step)`
    For,
    /// `while (cond)`
    While,
    /// `do { ... } while (cond);`
    DoWhile,
}

impl LoopKind {
    /// Map a C grammar node kind to a loop kind
    #[inline]
    #[must_use]
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "for_statement" => Some(Self::For),
            "while_statement" => Some(Self::While),
            "do_statement" => Some(Self::DoWhile),
            _ => None,
        }
    }

    /// Lower-case name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::While => "while",
            Self::DoWhile => "do-while",
        }
    }
}

impl Display for LoopKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What kind of anchor a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Function definition
    Function,
    /// Loop of the given kind
    Loop(LoopKind),
}

/// Anything whose start offset is a valid injection target
pub trait Anchor {
    /// Byte offset of the anchor's first token
    fn start_offset(&self) -> usize;

    /// Anchor classification
    fn anchor_kind(&self) -> AnchorKind;
}

/// A loop inside a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopInfo {
    kind: LoopKind,
    header_text: String,
    header_tokens: Vec<String>,
    start_offset: usize,
    line: usize,
}

impl LoopInfo {
    /// Create loop info
    ///
    /// Header tokens default to the whitespace-separated words of
    /// `header_text`; the extractor replaces them with lexical tokens.
    #[must_use]
    pub fn new(kind: LoopKind, header_text: impl Into<String>, start_offset: usize) -> Self {
        let header_text = header_text.into();
        Self {
            kind,
            header_tokens: words(&header_text),
            header_text,
            start_offset,
            line: 1,
        }
    }

    /// Set the header's lexical tokens, comments excluded
    #[inline]
    #[must_use]
    pub fn with_header_tokens(mut self, tokens: Vec<String>) -> Self {
        self.header_tokens = tokens;
        self
    }

    /// Set the 1-based line of the loop keyword
    #[inline]
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Loop kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> LoopKind {
        self.kind
    }

    /// Literal header text, whitespace not normalized
    #[inline]
    #[must_use]
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Header tokens; two headers match when these are equal
    #[inline]
    #[must_use]
    pub fn header_tokens(&self) -> &[String] {
        &self.header_tokens
    }

    /// 1-based line
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Anchor for LoopInfo {
    #[inline]
    fn start_offset(&self) -> usize {
        self.start_offset
    }

    #[inline]
    fn anchor_kind(&self) -> AnchorKind {
        AnchorKind::Loop(self.kind)
    }
}

/// A function definition and the loops in its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    name: String,
    signature_text: String,
    signature_tokens: Vec<String>,
    span: Range<usize>,
    line: usize,
    loops: Vec<LoopInfo>,
}

impl FunctionInfo {
    /// Create function info covering `span` (whole definition, body included)
    ///
    /// Signature tokens default to the whitespace-separated words of
    /// `signature_text`.
    #[must_use]
    pub fn new(name: impl Into<String>, signature_text: impl Into<String>, span: Range<usize>) -> Self {
        let signature_text = signature_text.into();
        Self {
            name: name.into(),
            signature_tokens: words(&signature_text),
            signature_text,
            span,
            line: 1,
            loops: Vec::new(),
        }
    }

    /// Set the 1-based line of the definition's first token
    #[inline]
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the signature's lexical tokens, comments excluded
    #[inline]
    #[must_use]
    pub fn with_signature_tokens(mut self, tokens: Vec<String>) -> Self {
        self.signature_tokens = tokens;
        self
    }

    /// Attach loops; they are stored ordered by start offset
    #[must_use]
    pub fn with_loops(mut self, loops: impl IntoIterator<Item = LoopInfo>) -> Self {
        self.loops.extend(loops);
        self.loops.sort_by_key(LoopInfo::start_offset);
        self
    }

    /// Function name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return type, name and parameter list as literal text
    #[inline]
    #[must_use]
    pub fn signature_text(&self) -> &str {
        &self.signature_text
    }

    /// Signature tokens; two signatures match when these are equal
    #[inline]
    #[must_use]
    pub fn signature_tokens(&self) -> &[String] {
        &self.signature_tokens
    }

    /// Exclusive end of the whole definition
    #[inline]
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.span.end
    }

    /// 1-based line
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Loops in ascending start offset
    #[inline]
    #[must_use]
    pub fn loops(&self) -> &[LoopInfo] {
        &self.loops
    }

    /// Whether `offset` lies strictly inside this definition
    #[inline]
    #[must_use]
    pub fn strictly_contains(&self, offset: usize) -> bool {
        self.span.start < offset && offset < self.span.end
    }
}

impl Anchor for FunctionInfo {
    #[inline]
    fn start_offset(&self) -> usize {
        self.span.start
    }

    #[inline]
    fn anchor_kind(&self) -> AnchorKind {
        AnchorKind::Function
    }
}

/// Borrowed anchor, tagged by what it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRef<'a> {
    /// A function definition
    Function(&'a FunctionInfo),
    /// A loop, with the function that owns it
    Loop {
        /// Owning function
        function: &'a FunctionInfo,
        /// Position within the function's loops
        index: usize,
        /// The loop itself
        info: &'a LoopInfo,
    },
}

impl Anchor for AnchorRef<'_> {
    fn start_offset(&self) -> usize {
        match self {
            Self::Function(f) => f.start_offset(),
            Self::Loop { info, .. } => info.start_offset(),
        }
    }

    fn anchor_kind(&self) -> AnchorKind {
        match self {
            Self::Function(f) => f.anchor_kind(),
            Self::Loop { info, .. } => info.anchor_kind(),
        }
    }
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Ordered function inventory of one source buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Structure {
    functions: Vec<FunctionInfo>,
    error_regions: Vec<Range<usize>>,
}

impl Structure {
    /// Create structure; functions are stored ordered by start offset
    #[must_use]
    pub fn new(mut functions: Vec<FunctionInfo>) -> Self {
        functions.sort_by_key(FunctionInfo::start_offset);
        Self {
            functions,
            error_regions: Vec::new(),
        }
    }

    /// Record local parse-error regions of the source buffer
    #[inline]
    #[must_use]
    pub fn with_error_regions(mut self, regions: Vec<Range<usize>>) -> Self {
        self.error_regions = regions;
        self
    }

    /// Functions in ascending start offset
    #[inline]
    #[must_use]
    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    /// Total loop count across all functions
    #[inline]
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.functions.iter().map(|f| f.loops.len()).sum()
    }

    /// Number of anchors (functions plus loops)
    #[inline]
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.functions.len() + self.loop_count()
    }

    /// Whether the source contained local error nodes
    ///
    /// Only input that is error recovery from end to end fails extraction.
    /// Text that is not C but still yields some recognisable construct, such
    /// as `int int int int` or plain prose, comes back as an empty structure
    /// with this flag set. Callers treating "no functions and a partial
    /// parse" as garbage should check both.
    #[inline]
    #[must_use]
    pub fn partial_parse(&self) -> bool {
        !self.error_regions.is_empty()
    }

    /// Byte ranges of local parse errors
    #[inline]
    #[must_use]
    pub fn error_regions(&self) -> &[Range<usize>] {
        &self.error_regions
    }

    /// Every anchor in traversal order: each function, then its loops
    pub fn anchors(&self) -> impl Iterator<Item = AnchorRef<'_>> + '_ {
        self.functions.iter().flat_map(|function| {
            std::iter::once(AnchorRef::Function(function)).chain(
                function
                    .loops
                    .iter()
                    .enumerate()
                    .map(move |(index, info)| AnchorRef::Loop {
                        function,
                        index,
                        info,
                    }),
            )
        })
    }

    /// Check ordering, containment and non-overlap
    ///
    /// # Errors
    /// Returns [`ExtractError::InvariantViolation`] describing the first
    /// violation found.
    pub fn check_invariants(&self) -> Result<(), ExtractError> {
        let mut previous_end = 0;
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 && function.start_offset() < previous_end {
                return Err(ExtractError::InvariantViolation(format!(
                    "function '{}' at byte {} overlaps the previous definition",
                    function.name,
                    function.start_offset()
                )));
            }
            previous_end = function.end_offset();

            let mut previous_loop = None;
            for (j, info) in function.loops.iter().enumerate() {
                if !function.strictly_contains(info.start_offset) {
                    return Err(ExtractError::InvariantViolation(format!(
                        "loop {j} of '{}' at byte {} lies outside the function",
                        function.name, info.start_offset
                    )));
                }
                if previous_loop.is_some_and(|p| p >= info.start_offset) {
                    return Err(ExtractError::InvariantViolation(format!(
                        "loop {j} of '{}' is not after loop {}",
                        function.name,
                        j - 1
                    )));
                }
                previous_loop = Some(info.start_offset);
            }
        }
        Ok(())
    }

    /// Serializable digest of the structure
    #[must_use]
    pub fn summary(&self) -> StructureSummary {
        StructureSummary {
            function_count: self.functions.len(),
            partial_parse: self.partial_parse(),
            functions: self
                .functions
                .iter()
                .map(|f| FunctionSummary {
                    name: f.name.clone(),
                    signature: normalize(&f.signature_text),
                    line: f.line,
                    loop_count: f.loops.len(),
                    loop_kinds: f.loops.iter().map(LoopInfo::kind).collect(),
                    loop_headers: f.loops.iter().map(|l| normalize(&l.header_text)).collect(),
                })
                .collect(),
        }
    }
}

impl Display for Structure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.functions.is_empty() {
            writeln!(f, "(no functions)")?;
        }
        for (i, function) in self.functions.iter().enumerate() {
            writeln!(f, "Function {i}: {}", function.name)?;
            writeln!(f, "  Signature: {}", normalize(&function.signature_text))?;
            writeln!(f, "  Line: {}", function.line)?;
            writeln!(f, "  Loops: {}", function.loops.len())?;
            for (j, info) in function.loops.iter().enumerate() {
                writeln!(f, "    Loop {j}: {}", info.kind)?;
                writeln!(f, "      Header: {}", normalize(&info.header_text))?;
                writeln!(f, "      Line: {}", info.line)?;
            }
        }
        if self.partial_parse() {
            writeln!(f, "({} local parse error region(s))", self.error_regions.len())?;
        }
        Ok(())
    }
}

/// Serializable view of a [`Structure`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureSummary {
    /// Number of functions
    pub function_count: usize,
    /// Whether local parse errors were tolerated
    pub partial_parse: bool,
    /// Per-function digest
    pub functions: Vec<FunctionSummary>,
}

/// Serializable view of a [`FunctionInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSummary {
    /// Function name
    pub name: String,
    /// Normalized signature
    pub signature: String,
    /// 1-based line
    pub line: usize,
    /// Number of loops
    pub loop_count: usize,
    /// Loop kinds in order
    pub loop_kinds: Vec<LoopKind>,
    /// Normalized loop headers in order
    pub loop_headers: Vec<String>,
}
