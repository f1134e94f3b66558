//! Single-pass splicing of spec text into an immutable buffer
//!
//! Every offset refers to the original buffer. Points are applied in one
//! left-to-right pass, so earlier insertions never shift later offsets and no
//! existing byte is ever rewritten.

use std::ops::Range;

use crate::error::SpliceError;
use crate::plan::InjectionPoint;

/// Insert every point's text before its target byte
///
/// Points may arrive in any order; they are applied by ascending offset, ties
/// broken by kind (`Predicates < Function < Loop`), then by input order.
///
/// # Errors
/// Returns [`SpliceError`] if an offset is past the end of `source` or inside
/// a multi-byte character.
pub fn apply(source: &str, points: &[InjectionPoint]) -> Result<String, SpliceError> {
    let ordered = ordered(points);
    for point in &ordered {
        check_offset(source, point.target_offset)?;
    }

    let extra: usize = ordered.iter().map(|p| p.spec_text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for point in ordered {
        out.push_str(&source[cursor..point.target_offset]);
        out.push_str(&point.spec_text);
        cursor = point.target_offset;
    }
    out.push_str(&source[cursor..]);

    Ok(out)
}

/// Byte ranges that [`apply`] fills with spec text, in output coordinates
///
/// Removing these ranges from the spliced output restores the source.
#[must_use]
pub fn inserted_ranges(points: &[InjectionPoint]) -> Vec<Range<usize>> {
    let mut shift = 0;
    ordered(points)
        .into_iter()
        .map(|point| {
            let start = point.target_offset + shift;
            shift += point.spec_text.len();
            start..start + point.spec_text.len()
        })
        .collect()
}

fn ordered(points: &[InjectionPoint]) -> Vec<&InjectionPoint> {
    let mut ordered: Vec<&InjectionPoint> = points.iter().collect();
    ordered.sort_by_key(|p| p.order_key());
    ordered
}

fn check_offset(source: &str, offset: usize) -> Result<(), SpliceError> {
    if offset > source.len() {
        return Err(SpliceError::OffsetOutOfBounds {
            offset,
            len: source.len(),
        });
    }
    if !source.is_char_boundary(offset) {
        return Err(SpliceError::NotCharBoundary { offset });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::InjectionKind;
    use proptest::prelude::*;

    fn point(kind: InjectionKind, offset: usize, text: &str) -> InjectionPoint {
        InjectionPoint::new(kind, offset, text, "test")
    }

    fn strip(spliced: &str, points: &[InjectionPoint]) -> String {
        let mut out = String::new();
        let mut cursor = 0;
        for range in inserted_ranges(points) {
            out.push_str(&spliced[cursor..range.start]);
            cursor = range.end;
        }
        out.push_str(&spliced[cursor..]);
        out
    }

    #[test]
    fn inserts_before_target_bytes() {
        let source = "int f() {\n  for (;;) {}\n}\n";
        let loop_at = source.find("for").unwrap();
        let points = vec![
            point(InjectionKind::Loop, loop_at, "/*@ loop invariant \\true; */\n  "),
            point(InjectionKind::Function, 0, "/*@ ensures \\true; */\n"),
        ];

        let out = apply(source, &points).unwrap();
        assert_eq!(
            out,
            "/*@ ensures \\true; */\nint f() {\n  /*@ loop invariant \\true; */\n  for (;;) {}\n}\n"
        );
    }

    #[test]
    fn ties_follow_kind_priority() {
        let points = vec![
            point(InjectionKind::Function, 0, "F"),
            point(InjectionKind::Predicates, 0, "P"),
        ];
        assert_eq!(apply("x", &points).unwrap(), "PFx");
    }

    #[test]
    fn offset_at_end_is_allowed() {
        let points = vec![point(InjectionKind::Loop, 3, "!")];
        assert_eq!(apply("abc", &points).unwrap(), "abc!");
    }

    #[test]
    fn out_of_bounds_offset() {
        let points = vec![point(InjectionKind::Loop, 4, "!")];
        assert_eq!(
            apply("abc", &points),
            Err(SpliceError::OffsetOutOfBounds { offset: 4, len: 3 })
        );
    }

    #[test]
    fn offset_inside_character() {
        let points = vec![point(InjectionKind::Loop, 1, "!")];
        assert_eq!(
            apply("é", &points),
            Err(SpliceError::NotCharBoundary { offset: 1 })
        );
    }

    #[test]
    fn no_points_is_identity() {
        assert_eq!(apply("int x;", &[]).unwrap(), "int x;");
    }

    proptest! {
        #[test]
        fn prop_stripping_insertions_restores_source(
            source in "[a-z \n{}();]{0,64}",
            raw in proptest::collection::vec((0usize..65, "[A-Z@/*\n]{0,8}"), 0..6),
        ) {
            let points: Vec<InjectionPoint> = raw
                .into_iter()
                .map(|(offset, text)| point(InjectionKind::Loop, offset.min(source.len()), &text))
                .collect();

            let spliced = apply(&source, &points).unwrap();
            prop_assert_eq!(spliced.len(), source.len() + points.iter().map(|p| p.spec_text.len()).sum::<usize>());
            prop_assert_eq!(strip(&spliced, &points), source);
        }
    }
}
