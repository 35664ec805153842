// Differentiation engine - applies calculus rules
//
// Every rule builds its result through the canonicalizing constructors in
// `simplification`, so `0 + u`, `1 * u` and like terms never pile up in the
// intermediate trees and the printed derivative is already in final form.

use crate::functions::Function;
use crate::{Expr, ExprKind, Formula, ParseError, parse};

impl Expr {
    /// Derivative with respect to `x`, in canonical form
    ///
    /// The input is canonicalized first, so a parsed formula and its
    /// simplified form have the same derivative.
    pub fn derivative(&self) -> Expr {
        self.simplified().derive()
    }

    /// Apply the differentiation rules to this tree as it stands
    pub(crate) fn derive(&self) -> Expr {
        match &self.kind {
            // Base cases
            ExprKind::Number(_) | ExprKind::Constant(_) => Expr::number(0.0),
            ExprKind::Variable => Expr::number(1.0),

            // Chain rule: f(u)' = f'(u) * u'
            ExprKind::Call { func, arg } => {
                let outer = (func.definition().derivative)(arg);
                Expr::product(vec![outer, arg.derive()])
            }

            ExprKind::Sum(terms) => Expr::sum(terms.iter().map(|t| t.derive()).collect()),

            // Product rule: (abc)' = a'bc + ab'c + abc'
            ExprKind::Product(factors) => {
                let terms = (0..factors.len())
                    .map(|i| {
                        let mut term: Vec<Expr> = Vec::with_capacity(factors.len());
                        for (j, factor) in factors.iter().enumerate() {
                            if i == j {
                                term.push(factor.derive());
                            } else {
                                term.push((**factor).clone());
                            }
                        }
                        Expr::product(term)
                    })
                    .collect();
                Expr::sum(terms)
            }

            // Quotient rule: (u/v)' = (u'v - uv') / v^2
            ExprKind::Div(u, v) => {
                let numerator = Expr::sum(vec![
                    Expr::product(vec![u.derive(), (**v).clone()]),
                    Expr::negate(Expr::product(vec![(**u).clone(), v.derive()])),
                ]);
                Expr::quotient(numerator, Expr::power((**v).clone(), Expr::number(2.0)))
            }

            ExprKind::Pow(u, v) => {
                let u = &**u;
                let v = &**v;
                if !v.contains_variable() {
                    // Power rule: (u^n)' = n * u^(n-1) * u'
                    let reduced = Expr::sum(vec![v.clone(), Expr::number(-1.0)]);
                    Expr::product(vec![
                        v.clone(),
                        Expr::power(u.clone(), reduced),
                        u.derive(),
                    ])
                } else if !u.contains_variable() {
                    // Exponential rule: (a^v)' = a^v * ln(a) * v'
                    Expr::product(vec![
                        self.clone(),
                        Expr::call(Function::Log, u.clone()),
                        v.derive(),
                    ])
                } else {
                    // General case: (u^v)' = u^v * (v' * ln(u) + v * u'/u)
                    Expr::product(vec![
                        self.clone(),
                        Expr::sum(vec![
                            Expr::product(vec![v.derive(), Expr::call(Function::Log, u.clone())]),
                            Expr::product(vec![v.clone(), u.derive(), Expr::power(u.clone(), Expr::number(-1.0))]),
                        ]),
                    ])
                }
            }
        }
    }
}

/// First and second derivative of a formula
#[derive(Debug, Clone, PartialEq)]
pub struct Derivatives {
    first: Expr,
    second: Expr,
}

impl Derivatives {
    pub fn of(formula: &Formula) -> Self {
        Derivatives::of_expr(formula.expr())
    }

    pub fn of_expr(expr: &Expr) -> Self {
        let first = expr.derivative();
        let second = first.derive();
        Derivatives { first, second }
    }

    pub fn first(&self) -> &Expr {
        &self.first
    }

    pub fn second(&self) -> &Expr {
        &self.second
    }
}

/// Differentiate formula text, returning the derivative as text
///
/// # Example
/// ```
/// use graph_anafis::differentiate;
///
/// assert_eq!(differentiate("x**2").unwrap(), "2*x");
/// assert_eq!(differentiate("1/x").unwrap(), "-1/x**2");
/// ```
///
/// # Errors
/// Returns a `ParseError` if `formula` does not parse.
pub fn differentiate(formula: &str) -> Result<String, ParseError> {
    Ok(parse(formula)?.derivative().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(input: &str) -> String {
        differentiate(input).unwrap()
    }

    #[test]
    fn test_basic_rules() {
        assert_eq!(d("5"), "0");
        assert_eq!(d("pi"), "0");
        assert_eq!(d("x"), "1");
        assert_eq!(d("x**2"), "2*x");
        assert_eq!(d("x^3"), "3*x**2");
        assert_eq!(d("1/x"), "-1/x**2");
        assert_eq!(d("3*x + 1"), "3");
        assert_eq!(d("x - x"), "0");
    }

    #[test]
    fn test_chain_rule() {
        assert_eq!(d("sin(x**2)"), "2*x*cos(x**2)");
        assert_eq!(d("exp(2*x)"), "2*exp(2*x)");
        assert_eq!(d("log(x)"), "1/x");
        assert_eq!(d("sqrt(x)"), "1/(2*sqrt(x))");
        assert_eq!(d("cos(x)"), "-sin(x)");
    }

    #[test]
    fn test_product_rule() {
        assert_eq!(d("x*sin(x)"), "x*cos(x) + sin(x)");
    }

    #[test]
    fn test_exponential_base() {
        assert_eq!(d("e**x"), "e**x");
        assert_eq!(d("2**x"), "2**x*log(2)");
    }

    #[test]
    fn test_general_power() {
        // (x^x)' = x^x * (log(x) + 1)
        let expr = parse("x**x").unwrap().derivative();
        let at = 2.0_f64;
        let expected = at.powf(at) * (at.ln() + 1.0);
        assert!((expr.eval_at(at).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_raw_quotient_rule() {
        // Div is only present in uncanonicalized trees
        let raw = Expr::div_expr(Expr::variable(), Expr::add_expr(Expr::variable(), Expr::number(1.0)));
        let derived = raw.derive();
        // d/dx x/(x+1) = 1/(x+1)^2
        assert!((derived.eval_at(1.0).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_second_derivative() {
        let f = Formula::parse("x**3").unwrap();
        let ders = Derivatives::of(&f);
        assert_eq!(ders.first().to_string(), "3*x**2");
        assert_eq!(ders.second().to_string(), "6*x");

        let quadratic = Derivatives::of(&Formula::parse("x**2").unwrap());
        assert_eq!(quadratic.second(), &Expr::number(2.0));
    }

    #[test]
    fn test_derivative_text_reparses() {
        for input in ["x*sin(x)", "1/x", "sqrt(x)", "tan(x)", "x**x", "exp(-x**2)", "abs(x)"] {
            let text = d(input);
            let reparsed = Formula::parse(&text)
                .unwrap_or_else(|e| panic!("{} -> {}: {}", input, text, e));
            let direct = parse(input).unwrap().derivative();
            let x = 1.3;
            let a = reparsed.eval(x).unwrap();
            let b = direct.eval_at(x).unwrap();
            assert!((a - b).abs() < 1e-9 * (1.0 + b.abs()), "{}: {} vs {}", input, a, b);
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(differentiate("y**2").is_err());
    }
}
