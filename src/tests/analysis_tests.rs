//! End-to-end analysis scenarios over a registry and a window

use std::collections::BTreeMap;

use crate::analysis::{SampleSet, bisect, max_iterations};
use crate::{
    AnalysisError, AnalysisResult, Analyzer, CancellationToken, Domain, ExtremumKind, Formula,
    FunctionEntry, FunctionRegistry,
};

fn analyze_one(formula: &str) -> AnalysisResult {
    let mut registry = FunctionRegistry::new();
    registry.add(FunctionEntry::new("f", formula, "black"));
    let domain = Domain::new(-10.0, -10.0, 10.0, 10.0).unwrap();
    let mut results = Analyzer::new().analyze(&registry, &domain).unwrap();
    results.remove("f").expect("function should be analysed")
}

#[test]
fn test_identity() {
    let r = analyze_one("x");
    let roots = r.roots.unwrap();
    assert_eq!(roots.len(), 1);
    assert!(roots[0].abs() < 1e-4);
    assert_eq!(r.derivative.as_deref(), Ok("1"));
    assert!(r.area_under_curve.unwrap().abs() < 1e-2);
    assert_eq!(r.extrema, Ok(vec![]));
    assert!(r.mean.abs() < 1e-6);
    assert_eq!(r.min, -10.0);
    assert_eq!(r.max, 10.0);
    assert_eq!(r.inflection_points, Ok(vec![]));
    assert_eq!(r.arc_length, Ok(28.2843));
}

#[test]
fn test_parabola() {
    let r = analyze_one("x**2");

    let extrema = r.extrema.unwrap();
    assert_eq!(extrema.len(), 1);
    assert_eq!(extrema[0].kind, ExtremumKind::Minimum);
    assert_eq!(extrema[0].x, 0.0);
    assert!(extrema[0].y.abs() < 1e-3);

    assert!(r.roots.unwrap().iter().all(|x| x.abs() < 1e-3));
    assert_eq!(r.derivative.as_deref(), Ok("2*x"));
    assert!((r.area_under_curve.unwrap() - 666.67).abs() < 0.5);

    let arc = r.arc_length.unwrap();
    assert!(arc.is_finite() && arc > 20.0);
    assert_eq!(r.inflection_points, Ok(vec![]));
}

#[test]
fn test_reciprocal_pole() {
    let r = analyze_one("1/x");
    assert!(r.min.is_finite() && r.max.is_finite() && r.mean.is_finite());
    assert_eq!(r.derivative.as_deref(), Ok("-1/x**2"));
    assert_eq!(r.roots, Ok(vec![]));
    assert_eq!(r.inflection_points, Ok(vec![]));
}

#[test]
fn test_every_field_is_independent() {
    // sqrt is undefined on half the window; all fields are still produced
    let r = analyze_one("sqrt(x) - 1");
    assert_eq!(r.roots, Ok(vec![1.0]));
    assert_eq!(r.derivative.as_deref(), Ok("1/(2*sqrt(x))"));
    assert!(r.area_under_curve.is_ok());
    assert!(r.arc_length.is_ok());
    assert!(r.min > -1.0 && r.max < 2.2);
}

#[test]
fn test_mixed_registry() {
    let registry: FunctionRegistry = [
        FunctionEntry::new("sine", "sin(x)", "red"),
        FunctionEntry::new("bad", "2x", "green"),
        FunctionEntry::new("empty", "", "blue"),
        FunctionEntry::new("undefined", "log(-1 - x**2)", "gray"),
        FunctionEntry::new("cubic", "x^3 - x", "black"),
    ]
    .into_iter()
    .collect();
    let domain = Domain::new(-4.0, -2.0, 4.0, 2.0).unwrap();
    let results = Analyzer::new().resolution(4_000).analyze(&registry, &domain).unwrap();

    let names: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["cubic", "sine"]);
    assert_eq!(results["sine"].roots, Ok(vec![-3.1416, 0.0, 3.1416]));
    assert_eq!(results["cubic"].roots, Ok(vec![-1.0, 0.0, 1.0]));
    assert_eq!(results["cubic"].derivative.as_deref(), Ok("3*x**2 - 1"));
}

#[test]
fn test_idempotent() {
    let registry: FunctionRegistry = [
        FunctionEntry::new("a", "x*sin(x)", "red"),
        FunctionEntry::new("b", "exp(-x**2)", "blue"),
        FunctionEntry::new("c", "tan(x)", "green"),
    ]
    .into_iter()
    .collect();
    let domain = Domain::new(-3.0, -3.0, 3.0, 3.0).unwrap();
    let analyzer = Analyzer::new().resolution(3_000);

    let first: BTreeMap<String, AnalysisResult> = analyzer.analyze(&registry, &domain).unwrap();
    let second = analyzer.analyze(&registry, &domain).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_registry_untouched() {
    let mut registry = FunctionRegistry::new();
    registry.add(FunctionEntry::new("f", "x", "red"));
    let before = registry.clone();
    let domain = Domain::new(-1.0, -1.0, 1.0, 1.0).unwrap();
    Analyzer::new().resolution(100).analyze(&registry, &domain).unwrap();
    assert_eq!(registry, before);
}

#[test]
fn test_cancellation_token_shared() {
    let token = CancellationToken::new();
    let analyzer = Analyzer::new().resolution(100).cancellation(token.clone());
    let mut registry = FunctionRegistry::new();
    registry.add(FunctionEntry::new("f", "x", "red"));
    let domain = Domain::new(-1.0, -1.0, 1.0, 1.0).unwrap();

    assert!(analyzer.analyze(&registry, &domain).is_ok());
    token.cancel();
    assert_eq!(analyzer.analyze(&registry, &domain), Err(AnalysisError::Cancelled));
}

#[test]
fn test_invalid_domain() {
    assert!(matches!(
        Domain::new(5.0, 0.0, -5.0, 1.0),
        Err(AnalysisError::InvalidDomain { .. })
    ));
}

#[test]
fn test_bisection_bound_on_sampled_brackets() {
    let f = Formula::parse("x**3 - 7*x + 1").unwrap();
    let set = SampleSet::new(&f, -4.0, 4.0, 100);
    let mut brackets = 0;
    for pair in set.samples().windows(2) {
        let ((x1, Some(y1)), (x2, Some(y2))) = (pair[0], pair[1]) else {
            continue;
        };
        if y1 * y2 > 0.0 {
            continue;
        }
        brackets += 1;
        let b = bisect(|x| f.eval(x), x1, y1, x2, 1e-6).unwrap();
        assert!(b.iterations <= max_iterations(x2 - x1, 1e-6));
        assert!(f.eval(b.midpoint).unwrap().abs() < 1e-4);
    }
    assert_eq!(brackets, 3);
}
