//! Testing utilities for SpecGate workspace
//!
//! Shared C fixtures and small program generators.

#![allow(missing_docs)]

/// Skeleton with two functions, the second holding one `while` loop
pub const SKELETON: &str = "\
int clamp(int v, int min, int max) {
    // TODO: implementation
}

int min_index(int* t, int n) {
    while(i < n-1) {
        // TODO: implementation
    }
    // TODO: implementation
}
";

/// Completion of [`SKELETON`] that keeps its structure
pub const GOOD_COMPLETION: &str = "\
int clamp(int v, int min, int max) {
    int low = v > min ? v : min;
    return low < max ? low : max;
}

int min_index(int* t, int n) {
    int minInd = 0, i = 0;
    while(i < n-1) {
        if (t[++i] < t[minInd])
            minInd = i;
    }
    return minInd;
}
";

/// Completion of [`SKELETON`] that adds a loop to `clamp`
pub const BAD_COMPLETION: &str = "\
int clamp(int v, int min, int max) {
    for (int i = 0; i < 10; i++) {
        v = v + 1;
    }
    return v;
}

int min_index(int* t, int n) {
    return 0;
}
";

/// Spec array for [`SKELETON`] in the upstream JSON shape
pub const SKELETON_SPECS_JSON: &str = r#"[
    ["/*@ predicate in_range(int v, int lo, int hi) = lo <= v <= hi; */"],
    "/*@ requires min <= max;\n    ensures in_range(\\result, min, max);\n */\n",
    "/*@ requires n > 0;\n    ensures 0 <= \\result < n;\n */\n",
    "/*@ loop invariant 0 <= i < n;\n    loop variant n-1-i;\n */\n"
]"#;

/// Loop shape used by the program generators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureLoop {
    For,
    While,
    DoWhile,
}

impl FixtureLoop {
    fn header(self) -> &'static str {
        match self {
            FixtureLoop::For => "for (int i = 0; i < n; i++)",
            FixtureLoop::While => "while (n > 0)",
            FixtureLoop::DoWhile => "do",
        }
    }

    fn render(self, indent: &str, body: &str) -> String {
        match self {
            FixtureLoop::DoWhile => {
                format!("{indent}do {{\n{indent}{indent}{body}\n{indent}}} while (n < 10);\n")
            }
            other => format!(
                "{indent}{} {{\n{indent}{indent}{body}\n{indent}}}\n",
                other.header()
            ),
        }
    }
}

/// One generated function: name plus its loops in order
pub type FixtureFunction = (String, Vec<FixtureLoop>);

/// Render a complete program: every function returns `n`, each loop has a body
#[must_use]
pub fn c_program(functions: &[FixtureFunction], indent: &str) -> String {
    render(functions, indent, "n = n + 1;", &format!("{indent}return n;\n"))
}

/// Render the skeleton of [`c_program`]: same anchors, bodies erased
#[must_use]
pub fn c_skeleton(functions: &[FixtureFunction], indent: &str) -> String {
    render(functions, indent, "// TODO", &format!("{indent}// TODO\n"))
}

fn render(functions: &[FixtureFunction], indent: &str, loop_body: &str, tail: &str) -> String {
    let mut out = String::new();
    for (name, loops) in functions {
        out.push_str(&format!("int {name}(int n) {{\n"));
        for l in loops {
            out.push_str(&l.render(indent, loop_body));
        }
        out.push_str(tail);
        out.push_str("}\n\n");
    }
    out
}
