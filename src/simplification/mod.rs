//! Canonicalizing constructors for symbolic results
//!
//! Derivatives are assembled through these constructors instead of the raw
//! ones in `ast`, so every intermediate result is already in canonical form:
//! - sums and products are flat, numeric parts folded into one constant
//! - like terms (`2*x + 3*x`) and like bases (`x * x**2`) are combined
//! - `u**1 -> u`, `u**0 -> 1`, `(u**a)**n -> u**(a*n)` for integer `n`
//! - a numeric coefficient is distributed over a sum (`2*(x + 1) -> 2*x + 2`)
//! - division is a product with a negative power
//!
//! The rewrites are the algebraic identities a computer algebra system applies
//! automatically. Like it, `x/x` collapses to `1` even though the original
//! formula is undefined at `x = 0`; symbolic results describe the function
//! away from such isolated points.

mod ordering;

use std::sync::Arc;

use crate::ast::Constant;
use crate::functions::Function;
use crate::{Expr, ExprKind};

pub(crate) use ordering::{factor_cmp, term_cmp};

/// Largest exponent magnitude folded numerically; beyond it `2**5000` stays symbolic
const MAX_FOLD_EXPONENT: f64 = 64.0;

fn is_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

fn unwrap_arc(e: Arc<Expr>) -> Expr {
    Arc::try_unwrap(e).unwrap_or_else(|shared| (*shared).clone())
}

/// Split a term into its numeric coefficient and the remaining factor
fn split_coefficient(term: Expr) -> (f64, Expr) {
    match term.kind {
        ExprKind::Number(n) => (n, Expr::number(1.0)),
        ExprKind::Product(factors) => {
            if let Some(k) = factors.first().and_then(|f| f.as_number()) {
                let rest: Vec<Expr> = factors.into_iter().skip(1).map(unwrap_arc).collect();
                let rest = if rest.len() == 1 {
                    rest.into_iter().next().unwrap_or_else(|| Expr::number(1.0))
                } else {
                    Expr::new(ExprKind::Product(rest.into_iter().map(Arc::new).collect()))
                };
                (k, rest)
            } else {
                (1.0, Expr::new(ExprKind::Product(factors)))
            }
        }
        kind => (1.0, Expr::new(kind)),
    }
}

/// Split a factor into base and exponent (`x` is `x**1`)
fn split_power(factor: Expr) -> (Expr, Expr) {
    match factor.kind {
        ExprKind::Pow(base, exp) => (unwrap_arc(base), unwrap_arc(exp)),
        kind => (Expr::new(kind), Expr::number(1.0)),
    }
}

fn push_term(flat: &mut Vec<Expr>, term: Expr) {
    match term.kind {
        ExprKind::Sum(inner) => {
            for t in inner {
                push_term(flat, unwrap_arc(t));
            }
        }
        kind => flat.push(Expr::new(kind)),
    }
}

fn push_factor(flat: &mut Vec<Expr>, factor: Expr) {
    match factor.kind {
        ExprKind::Product(inner) => {
            for f in inner {
                push_factor(flat, unwrap_arc(f));
            }
        }
        ExprKind::Div(num, den) => {
            push_factor(flat, unwrap_arc(num));
            push_factor(flat, Expr::power(unwrap_arc(den), Expr::number(-1.0)));
        }
        kind => flat.push(Expr::new(kind)),
    }
}

impl Expr {
    /// Canonical sum of `terms`
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut flat: Vec<Expr> = Vec::with_capacity(terms.len());
        for term in terms {
            push_term(&mut flat, term);
        }

        let mut constant = 0.0;
        // (rest, coefficient), first-occurrence order before sorting
        let mut collected: Vec<(Expr, f64)> = Vec::new();
        for term in flat {
            if let Some(n) = term.as_number() {
                constant += n;
                continue;
            }
            let (coeff, rest) = split_coefficient(term);
            if let Some(slot) = collected.iter_mut().find(|(r, _)| *r == rest) {
                slot.1 += coeff;
            } else {
                collected.push((rest, coeff));
            }
        }

        let mut result: Vec<Expr> = collected
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .map(|(rest, coeff)| {
                if coeff == 1.0 {
                    rest
                } else {
                    Expr::product(vec![Expr::number(coeff), rest])
                }
            })
            .collect();
        result.sort_by(term_cmp);

        if constant != 0.0 {
            result.push(Expr::number(constant));
        }

        match result.len() {
            0 => Expr::number(0.0),
            1 => result.into_iter().next().unwrap_or_else(|| Expr::number(0.0)),
            _ => Expr::new(ExprKind::Sum(result.into_iter().map(Arc::new).collect())),
        }
    }

    /// Canonical product of `factors`
    pub fn product(factors: Vec<Expr>) -> Expr {
        let mut flat: Vec<Expr> = Vec::with_capacity(factors.len());
        for factor in factors {
            push_factor(&mut flat, factor);
        }

        let mut coefficient = 1.0;
        let mut bases: Vec<(Expr, Vec<Expr>)> = Vec::new();
        for factor in flat {
            if let Some(n) = factor.as_number() {
                coefficient *= n;
                continue;
            }
            let (base, exp) = split_power(factor);
            if let Some(slot) = bases.iter_mut().find(|(b, _)| *b == base) {
                slot.1.push(exp);
            } else {
                bases.push((base, vec![exp]));
            }
        }

        if coefficient == 0.0 {
            return Expr::number(0.0);
        }

        let mut result: Vec<Expr> = Vec::with_capacity(bases.len());
        for (base, exps) in bases {
            let exp = if exps.len() == 1 {
                exps.into_iter().next().unwrap_or_else(|| Expr::number(1.0))
            } else {
                Expr::sum(exps)
            };
            let combined = Expr::power(base, exp);
            match combined.kind {
                ExprKind::Number(n) => coefficient *= n,
                // A power that distributed over a product may return one
                ExprKind::Product(inner) => {
                    for f in inner.into_iter().map(unwrap_arc) {
                        match f.as_number() {
                            Some(n) => coefficient *= n,
                            None => result.push(f),
                        }
                    }
                }
                kind => result.push(Expr::new(kind)),
            }
        }

        if coefficient == 0.0 {
            return Expr::number(0.0);
        }

        // k * (a + b) -> k*a + k*b
        if coefficient != 1.0
            && result.len() == 1
            && let ExprKind::Sum(terms) = &result[0].kind
        {
            let distributed = terms
                .iter()
                .map(|t| Expr::product(vec![Expr::number(coefficient), (**t).clone()]))
                .collect();
            return Expr::sum(distributed);
        }

        result.sort_by(factor_cmp);
        if coefficient != 1.0 {
            result.insert(0, Expr::number(coefficient));
        }

        match result.len() {
            0 => Expr::number(coefficient),
            1 => result.into_iter().next().unwrap_or_else(|| Expr::number(1.0)),
            _ => Expr::new(ExprKind::Product(result.into_iter().map(Arc::new).collect())),
        }
    }

    /// Canonical `base ** exponent`
    pub fn power(base: Expr, exponent: Expr) -> Expr {
        if let Some(e) = exponent.as_number() {
            if e == 0.0 {
                return Expr::number(1.0);
            }
            if e == 1.0 {
                return base;
            }
        }

        if base.is_number(1.0) {
            return Expr::number(1.0);
        }

        if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number()) {
            if is_integer(e) && e.abs() <= MAX_FOLD_EXPONENT && !(b == 0.0 && e < 0.0) {
                let folded = b.powf(e);
                if folded.is_finite() {
                    return Expr::number(folded);
                }
            }
            if b == 0.0 && e > 0.0 {
                return Expr::number(0.0);
            }
        }

        if let Some(n) = exponent.as_number().filter(|n| is_integer(*n)) {
            match base.kind {
                // (u**a)**n -> u**(a*n)
                ExprKind::Pow(inner, exp) => {
                    let new_exp = Expr::product(vec![unwrap_arc(exp), Expr::number(n)]);
                    return Expr::power(unwrap_arc(inner), new_exp);
                }
                // (a*b)**n -> a**n * b**n
                ExprKind::Product(factors) => {
                    let powered = factors
                        .into_iter()
                        .map(|f| Expr::power(unwrap_arc(f), Expr::number(n)))
                        .collect();
                    return Expr::product(powered);
                }
                kind => return Expr::pow_expr(Expr::new(kind), exponent),
            }
        }

        Expr::pow_expr(base, exponent)
    }

    /// Canonical `numerator / denominator`
    pub fn quotient(numerator: Expr, denominator: Expr) -> Expr {
        Expr::product(vec![
            numerator,
            Expr::power(denominator, Expr::number(-1.0)),
        ])
    }

    /// Canonical `-inner`
    pub fn negate(inner: Expr) -> Expr {
        Expr::product(vec![Expr::number(-1.0), inner])
    }

    /// Canonical function call; exact special values are folded
    pub fn call(func: Function, arg: Expr) -> Expr {
        let exact = match (func, &arg.kind) {
            (Function::Sin | Function::Tan | Function::Sqrt, ExprKind::Number(n)) if *n == 0.0 => {
                Some(0.0)
            }
            (Function::Cos | Function::Exp, ExprKind::Number(n)) if *n == 0.0 => Some(1.0),
            (Function::Log | Function::Sqrt, ExprKind::Number(n)) if *n == 1.0 => {
                Some(if func == Function::Log { 0.0 } else { 1.0 })
            }
            (Function::Abs, ExprKind::Number(n)) => Some(n.abs()),
            (Function::Log, ExprKind::Constant(Constant::E)) => Some(1.0),
            _ => None,
        };
        if let Some(value) = exact {
            return Expr::number(value);
        }

        match (func, arg.kind) {
            // log(exp(u)) -> u
            (
                Function::Log,
                ExprKind::Call {
                    func: Function::Exp,
                    arg: inner,
                },
            ) => unwrap_arc(inner),
            (func, kind) => Expr::func(func, Expr::new(kind)),
        }
    }

    /// Rebuild this (possibly parsed) tree through the canonical constructors
    pub fn simplified(&self) -> Expr {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Variable | ExprKind::Constant(_) => self.clone(),
            ExprKind::Call { func, arg } => Expr::call(*func, arg.simplified()),
            ExprKind::Sum(terms) => Expr::sum(terms.iter().map(|t| t.simplified()).collect()),
            ExprKind::Product(factors) => {
                Expr::product(factors.iter().map(|f| f.simplified()).collect())
            }
            ExprKind::Div(num, den) => Expr::quotient(num.simplified(), den.simplified()),
            ExprKind::Pow(base, exp) => Expr::power(base.simplified(), exp.simplified()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::variable()
    }

    #[test]
    fn test_sum_folds_and_orders() {
        let e = Expr::sum(vec![
            Expr::number(1.0),
            x(),
            Expr::power(x(), Expr::number(2.0)),
            Expr::number(2.0),
        ]);
        assert_eq!(e.to_string(), "x**2 + x + 3");
    }

    #[test]
    fn test_sum_combines_like_terms() {
        let e = Expr::sum(vec![
            Expr::product(vec![Expr::number(2.0), x()]),
            Expr::product(vec![Expr::number(3.0), x()]),
        ]);
        assert_eq!(e.to_string(), "5*x");

        let cancel = Expr::sum(vec![x(), Expr::negate(x())]);
        assert_eq!(cancel, Expr::number(0.0));
    }

    #[test]
    fn test_product_combines_bases() {
        let e = Expr::product(vec![x(), x(), Expr::power(x(), Expr::number(-1.0))]);
        assert_eq!(e, x());
        let sq = Expr::product(vec![x(), x()]);
        assert_eq!(sq.to_string(), "x**2");
    }

    #[test]
    fn test_product_zero_and_one() {
        assert_eq!(Expr::product(vec![Expr::number(0.0), x()]), Expr::number(0.0));
        assert_eq!(Expr::product(vec![Expr::number(1.0), x()]), x());
        assert_eq!(Expr::product(vec![]), Expr::number(1.0));
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let e = Expr::product(vec![
            Expr::number(2.0),
            Expr::sum(vec![x(), Expr::number(1.0)]),
        ]);
        assert_eq!(e.to_string(), "2*x + 2");
    }

    #[test]
    fn test_power_rules() {
        assert_eq!(Expr::power(x(), Expr::number(1.0)), x());
        assert_eq!(Expr::power(x(), Expr::number(0.0)), Expr::number(1.0));
        assert_eq!(
            Expr::power(Expr::number(2.0), Expr::number(3.0)),
            Expr::number(8.0)
        );
        let nested = Expr::power(Expr::power(x(), Expr::number(2.0)), Expr::number(-1.0));
        assert_eq!(nested.to_string(), "1/x**2");
        // 0**-1 must not fold into infinity
        let bad = Expr::power(Expr::number(0.0), Expr::number(-1.0));
        assert!(matches!(bad.kind, ExprKind::Pow(_, _)));
    }

    #[test]
    fn test_call_special_values() {
        assert_eq!(Expr::call(Function::Sin, Expr::number(0.0)), Expr::number(0.0));
        assert_eq!(Expr::call(Function::Exp, Expr::number(0.0)), Expr::number(1.0));
        assert_eq!(Expr::call(Function::Log, Expr::number(1.0)), Expr::number(0.0));
        assert_eq!(
            Expr::call(Function::Log, Expr::constant(Constant::E)),
            Expr::number(1.0)
        );
        assert_eq!(
            Expr::call(Function::Log, Expr::call(Function::Exp, x())),
            x()
        );
        assert_eq!(Expr::call(Function::Sqrt, Expr::number(1.0)), Expr::number(1.0));
    }

    #[test]
    fn test_simplified_division() {
        let parsed = Expr::div_expr(Expr::number(1.0), x());
        assert_eq!(parsed.simplified().to_string(), "1/x");
    }
}
