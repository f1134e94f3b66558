//! Injection summary

use serde::Serialize;
use specgate_structure::Structure;

use crate::plan::{InjectionKind, InjectionPoint};

/// Counts of what a plan injects
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InjectionReport {
    /// Predicate block points (0 or 1)
    pub predicate_points: usize,
    /// Function points
    pub function_points: usize,
    /// Loop points
    pub loop_points: usize,
    /// Function points whose text is not blank
    pub non_empty_function_specs: usize,
    /// Loop points whose text is not blank
    pub non_empty_loop_specs: usize,
    /// Function names in document order
    pub functions_found: Vec<String>,
}

impl InjectionReport {
    /// Summarise `points` planned against `structure`
    #[must_use]
    pub fn from_plan(structure: &Structure, points: &[InjectionPoint]) -> Self {
        let mut report = Self {
            functions_found: structure
                .functions()
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            ..Self::default()
        };

        for point in points {
            let non_empty = !point.spec_text.trim().is_empty();
            match point.kind {
                InjectionKind::Predicates => report.predicate_points += 1,
                InjectionKind::Function => {
                    report.function_points += 1;
                    report.non_empty_function_specs += usize::from(non_empty);
                }
                InjectionKind::Loop => {
                    report.loop_points += 1;
                    report.non_empty_loop_specs += usize::from(non_empty);
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specgate_structure::FunctionInfo;

    #[test]
    fn counts_by_kind() {
        let structure = Structure::new(vec![
            FunctionInfo::new("square", "int square(int x)", 0..50),
            FunctionInfo::new("factorial", "int factorial(int n)", 60..120),
        ]);
        let points = vec![
            InjectionPoint::predicates("/*@ predicate p; */\n"),
            InjectionPoint::new(InjectionKind::Function, 0, "/*@ ensures \\true; */\n", "f"),
            InjectionPoint::new(InjectionKind::Loop, 20, "  ", "l"),
            InjectionPoint::new(InjectionKind::Function, 60, "", "g"),
        ];

        let report = InjectionReport::from_plan(&structure, &points);
        assert_eq!(report.predicate_points, 1);
        assert_eq!(report.function_points, 2);
        assert_eq!(report.non_empty_function_specs, 1);
        assert_eq!(report.loop_points, 1);
        assert_eq!(report.non_empty_loop_specs, 0);
        assert_eq!(report.functions_found, ["square", "factorial"]);
    }
}
