//! Property-Based and Fuzz Testing
//!
//! Uses quickcheck for property-based testing of:
//! - Parser robustness (fuzz testing)
//! - Evaluator never producing non-finite values
//! - Derivative text surviving a print/parse round trip

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::analysis::{bisect, max_iterations};
use crate::{Formula, differentiate, parse};

// ============================================================
// PART 1: FORMULA GENERATORS FOR PROPERTY TESTS
// ============================================================

/// Generate random valid formula strings for fuzz testing
fn random_formula(g: &mut Gen) -> String {
    let depth = g.size().min(4); // Limit depth to keep derivatives small
    gen_formula_recursive(g, depth)
}

fn gen_formula_recursive(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        let choice: u8 = u8::arbitrary(g) % 5;
        match choice {
            0 => format!("{}", u8::arbitrary(g) % 9 + 1),
            1 => format!("{}.5", u8::arbitrary(g) % 4),
            2 => "pi".to_string(),
            3 => "e".to_string(),
            _ => "x".to_string(),
        }
    } else {
        let choice: u8 = u8::arbitrary(g) % 10;
        match choice {
            0..=3 => {
                let ops = ["+", "-", "*", "/", "**", "^"];
                let op = ops[usize::arbitrary(g) % ops.len()];
                let left = gen_formula_recursive(g, depth - 1);
                let right = gen_formula_recursive(g, depth - 1);
                format!("({} {} {})", left, op, right)
            }
            4..=6 => {
                let fns = ["sin", "cos", "tan", "log", "exp", "sqrt", "abs"];
                let f = fns[usize::arbitrary(g) % fns.len()];
                let arg = gen_formula_recursive(g, depth - 1);
                format!("{}({})", f, arg)
            }
            7 => {
                let arg = gen_formula_recursive(g, depth - 1);
                format!("-({})", arg)
            }
            _ => gen_formula_recursive(g, depth - 1),
        }
    }
}

/// Arbitrary text drawn from the characters the lexer knows about
fn random_token_soup(g: &mut Gen) -> String {
    let alphabet: Vec<char> = "x()+-*/^.e0123456789 sincoltagexpqrbp".chars().collect();
    let len = usize::arbitrary(g) % 24;
    (0..len)
        .map(|_| alphabet[usize::arbitrary(g) % alphabet.len()])
        .collect()
}

#[derive(Clone, Debug)]
struct GeneratedFormula(String);

impl Arbitrary for GeneratedFormula {
    fn arbitrary(g: &mut Gen) -> Self {
        GeneratedFormula(random_formula(g))
    }
}

#[derive(Clone, Debug)]
struct TokenSoup(String);

impl Arbitrary for TokenSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        TokenSoup(random_token_soup(g))
    }
}

// ============================================================
// PART 2: PARSER FUZZ TESTS
// ============================================================

#[cfg(test)]
mod parser_fuzz_tests {
    use super::*;

    /// Property: Parser should never panic on arbitrary input
    #[test]
    fn test_parser_never_panics_on_random_input() {
        fn prop_parser_no_panic(input: String) -> TestResult {
            let _ = parse(&input);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(2000)
            .quickcheck(prop_parser_no_panic as fn(String) -> TestResult);
    }

    /// Property: Near-miss input exercises the lexer and parser without panics
    #[test]
    fn test_parser_never_panics_on_token_soup() {
        fn prop_soup_no_panic(input: TokenSoup) -> TestResult {
            if let Ok(f) = Formula::parse(&input.0) {
                let _ = f.eval(0.5);
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .quickcheck(prop_soup_no_panic as fn(TokenSoup) -> TestResult);
    }

    /// Property: Every generated formula is accepted
    #[test]
    fn test_generated_formulas_parse() {
        fn prop_generated_parses(input: GeneratedFormula) -> bool {
            parse(&input.0).is_ok()
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_generated_parses as fn(GeneratedFormula) -> bool);
    }

    /// Fuzz test with specifically crafted edge cases
    #[test]
    fn test_parser_edge_cases() {
        let edge_cases = [
            "",
            "   ",
            "()",
            "((()))",
            "+++",
            "---x",
            "1+",
            "*1",
            "sin()",
            "sin(x,x)",
            "1..2",
            "1e999999",
            "1e-999999",
            "x**x**x",
            "((((x))))",
            "sin(cos(tan(exp(log(x)))))",
            "1/0",
            "0/0",
            "(-0)",
            "x y",
            "2x",
            "sinx",
            "__import__('os').system('ls')",
            "lambda: 1",
            "x; x",
            "π",
            "∞",
        ];

        for case in &edge_cases {
            // Should not panic - may succeed or fail with error
            if let Ok(f) = Formula::parse(case) {
                let _ = f.eval(1.0);
            }
        }
    }

    /// Deep nesting is rejected with an error rather than overflowing the stack
    #[test]
    fn test_parser_deep_nesting() {
        let mut formula = "x".to_string();
        for _ in 0..50 {
            formula = format!("({}+1)", formula);
        }
        assert!(parse(&formula).is_ok());

        let hostile = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse(&hostile).is_err());
        assert!(parse(&"-".repeat(10_000)).is_err());
    }
}

// ============================================================
// PART 3: EVALUATION AND DIFFERENTIATION PROPERTIES
// ============================================================

#[cfg(test)]
mod numeric_property_tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
    }

    /// Property: a successful evaluation is always finite
    #[test]
    fn test_evaluation_is_finite() {
        fn prop_finite(input: GeneratedFormula, x: f64) -> TestResult {
            if !x.is_finite() {
                return TestResult::discard();
            }
            let Ok(f) = Formula::parse(&input.0) else {
                return TestResult::failed();
            };
            let compiled_ok = f.eval(x).map_or(true, f64::is_finite);
            let tree_ok = f.expr().eval_at(x).map_or(true, f64::is_finite);
            TestResult::from_bool(compiled_ok && tree_ok)
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_finite as fn(GeneratedFormula, f64) -> TestResult);
    }

    /// Property: the printed derivative parses back to the same function
    #[test]
    fn test_derivative_round_trip() {
        fn prop_round_trip(input: GeneratedFormula) -> TestResult {
            let Ok(text) = differentiate(&input.0) else {
                return TestResult::failed();
            };
            let Ok(reparsed) = Formula::parse(&text) else {
                return TestResult::failed();
            };
            let derivative = parse(&input.0).map(|e| e.derivative());
            let Ok(derivative) = derivative else {
                return TestResult::failed();
            };

            for x in [-2.2, -0.7, 0.3, 1.7, 4.1] {
                if let (Ok(a), Ok(b)) = (derivative.eval_at(x), reparsed.eval(x)) {
                    if !approx_eq(a, b) {
                        return TestResult::failed();
                    }
                }
            }
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_round_trip as fn(GeneratedFormula) -> TestResult);
    }

    /// Property: bisection stays within its iteration cap
    #[test]
    fn test_bisection_iteration_cap() {
        fn prop_cap(root: f64, width: f64) -> TestResult {
            if !root.is_finite() || !width.is_finite() || root.abs() > 1e6 {
                return TestResult::discard();
            }
            let width = width.abs().clamp(1e-3, 1e3);
            let (x1, x2) = (root - width / 3.0, root + 2.0 * width / 3.0);
            let f = |x: f64| Ok(x - root);
            match bisect(f, x1, x1 - root, x2, 1e-6) {
                Ok(b) => TestResult::from_bool(
                    b.iterations <= max_iterations(x2 - x1, 1e-6)
                        && (b.midpoint - root).abs() <= 1e-6,
                ),
                Err(_) => TestResult::failed(),
            }
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_cap as fn(f64, f64) -> TestResult);
    }
}
