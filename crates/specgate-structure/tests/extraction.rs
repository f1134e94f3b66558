use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specgate_structure::{
    extract_structure, validate, Anchor, ExtractError, FunctionInfo, LoopInfo, LoopKind, Mismatch,
};
use specgate_test_utils::{
    c_program, c_skeleton, FixtureFunction, FixtureLoop, BAD_COMPLETION, GOOD_COMPLETION, SKELETON,
};

fn fixture_loop() -> impl Strategy<Value = FixtureLoop> {
    prop_oneof![
        Just(FixtureLoop::For),
        Just(FixtureLoop::While),
        Just(FixtureLoop::DoWhile),
    ]
}

fn fixture_functions() -> impl Strategy<Value = Vec<FixtureFunction>> {
    proptest::collection::vec(proptest::collection::vec(fixture_loop(), 0..4), 0..5).prop_map(
        |loops| {
            loops
                .into_iter()
                .enumerate()
                .map(|(i, l)| (format!("fn_{i}"), l))
                .collect()
        },
    )
}

fn expected_kind(l: FixtureLoop) -> LoopKind {
    match l {
        FixtureLoop::For => LoopKind::For,
        FixtureLoop::While => LoopKind::While,
        FixtureLoop::DoWhile => LoopKind::DoWhile,
    }
}

proptest! {
    #[test]
    fn prop_extraction_is_idempotent(functions in fixture_functions(), wide in any::<bool>()) {
        let source = c_program(&functions, if wide { "        " } else { "  " });
        let first = extract_structure(&source).unwrap();
        let second = extract_structure(&source).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_extraction_recovers_generated_anchors(functions in fixture_functions()) {
        let source = c_program(&functions, "    ");
        let structure = extract_structure(&source).unwrap();

        prop_assert_eq!(structure.functions().len(), functions.len());
        for (info, (name, loops)) in structure.functions().iter().zip(&functions) {
            prop_assert_eq!(info.name(), name.as_str());
            let kinds: Vec<LoopKind> = info.loops().iter().map(LoopInfo::kind).collect();
            let want: Vec<LoopKind> = loops.iter().copied().map(expected_kind).collect();
            prop_assert_eq!(kinds, want);
        }
        prop_assert!(structure.check_invariants().is_ok());
    }

    #[test]
    fn prop_skeleton_matches_its_completion(functions in fixture_functions()) {
        let skeleton = extract_structure(&c_skeleton(&functions, "    ")).unwrap();
        let completion = extract_structure(&c_program(&functions, "\t")).unwrap();
        prop_assert_eq!(validate(&skeleton, &completion), Ok(()));
    }
}

#[test]
fn good_completion_matches_skeleton() {
    let skeleton = extract_structure(SKELETON).unwrap();
    let completion = extract_structure(GOOD_COMPLETION).unwrap();
    assert_eq!(validate(&skeleton, &completion), Ok(()));
}

#[test]
fn bad_completion_is_rejected_on_loop_count() {
    let skeleton = extract_structure(SKELETON).unwrap();
    let completion = extract_structure(BAD_COMPLETION).unwrap();
    assert_eq!(
        validate(&skeleton, &completion),
        Err(Mismatch::LoopCountMismatch {
            function_name: "clamp".into(),
            expected: 0,
            actual: 1,
        })
    );
}

#[test]
fn for_rewritten_as_while_is_kind_mismatch() {
    let skeleton = "int sum(int *a, int n) {\n    for (int i = 0; i < n; i++) {\n    }\n}\n";
    let completion = "\
int sum(int *a, int n) {
    int s = 0, i = 0;
    while (i < n) {
        s += a[i];
        i++;
    }
    return s;
}
";
    let result = validate(
        &extract_structure(skeleton).unwrap(),
        &extract_structure(completion).unwrap(),
    );
    assert_eq!(
        result,
        Err(Mismatch::LoopKindMismatch {
            function_name: "sum".into(),
            loop_index: 0,
            expected_kind: LoopKind::For,
            actual_kind: LoopKind::While,
        })
    );
}

#[test]
fn added_function_is_count_mismatch() {
    let skeleton = "int one(void) {\n}\n";
    let completion = "int one(void) {\n    return helper();\n}\n\nint helper(void) {\n    return 1;\n}\n";
    let result = validate(
        &extract_structure(skeleton).unwrap(),
        &extract_structure(completion).unwrap(),
    );
    assert_eq!(
        result,
        Err(Mismatch::FunctionCountMismatch {
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn nested_loops_are_reported_outer_inner_sibling() {
    let source = "\
void grid(int w, int h) {
    for (int y = 0; y < h; y++) {
        for (int x = 0; x < w; x++) {
            h = h;
        }
    }
    while (w > 0) {
        w--;
    }
}
";
    let structure = extract_structure(source).unwrap();
    let f: &FunctionInfo = &structure.functions()[0];
    let starts: Vec<usize> = f.loops().iter().map(Anchor::start_offset).collect();

    assert_eq!(
        starts,
        vec![
            source.find("for (int y").unwrap(),
            source.find("for (int x").unwrap(),
            source.find("while").unwrap(),
        ]
    );
}

fn compare_sources(skeleton: &str, completion: &str) -> Result<(), Mismatch> {
    validate(
        &extract_structure(skeleton).unwrap(),
        &extract_structure(completion).unwrap(),
    )
}

#[test]
fn logical_and_is_not_bitwise_and_of_address() {
    let skeleton = "void f(int x, int y) {\n    while (x && y) {\n    }\n}\n";
    let completion = "void f(int x, int y) {\n    while (x & &y) {\n        x = 0;\n    }\n}\n";
    assert_eq!(
        compare_sources(skeleton, completion),
        Err(Mismatch::LoopHeaderMismatch {
            function_name: "f".into(),
            loop_index: 0,
            expected: "while (x && y)".into(),
            actual: "while (x & &y)".into(),
        })
    );
}

#[test]
fn double_negation_is_not_decrement() {
    let skeleton = "int f(int x) {\n    while (- -x) {\n    }\n    return x;\n}\n";
    let completion = "int f(int x) {\n    while (--x) {\n    }\n    return x;\n}\n";
    assert!(matches!(
        compare_sources(skeleton, completion),
        Err(Mismatch::LoopHeaderMismatch { loop_index: 0, .. })
    ));
}

#[test]
fn whitespace_between_tokens_is_ignored() {
    assert_eq!(
        compare_sources("int f(int x,int y) {}\n", "int f(int x, int y) {}\n"),
        Ok(())
    );
    assert_eq!(
        compare_sources(
            "void g(int n) {\n    for(int i=0;i<n;i++) {}\n}\n",
            "void g(int n) {\n    for (int i = 0; i < n; i++) {\n        n--;\n    }\n}\n",
        ),
        Ok(())
    );
}

#[test]
fn comment_between_declarator_and_body_is_ignored() {
    assert_eq!(
        compare_sources(
            "int f(int x) /* erased */\n{\n}\n",
            "int f(int x)\n{\n    return x;\n}\n",
        ),
        Ok(())
    );
}

#[test]
fn garbage_input_is_unparsable() {
    let err = extract_structure("@@@ @@@ @@@\n").unwrap_err();
    assert!(matches!(err, ExtractError::Unparsable { .. }));
    assert!(err.is_parse_failure());
}

#[test]
fn non_c_text_can_yield_an_empty_partial_structure() {
    for source in ["this is not C at all", "int int int int"] {
        let structure = extract_structure(source).unwrap();
        assert!(structure.functions().is_empty());
        assert!(structure.partial_parse());
    }
}
