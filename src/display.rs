//! Display formatting for expressions.
//!
//! Output uses the same notation the parser accepts, so any printed expression
//! can be parsed back:
//! - `x**2 + 2*x + 1`
//! - `-sin(x)`, `1/(2*sqrt(x))`, `x/abs(x)`
//!
//! Sums print a negative coefficient as subtraction, products collect
//! negative powers into a denominator and integral floats print without a
//! fractional part.

use std::fmt;
use std::sync::Arc;

use crate::{Expr, ExprKind};

fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    // `+ 0.0` turns -0 into 0
    write!(f, "{}", n + 0.0)
}

fn negative_number(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::Number(n) if n < 0.0)
}

/// Exponent of a `base**(-k)` node, if it is a numeric negative power
fn negative_exponent(e: &Expr) -> Option<(&Arc<Expr>, f64)> {
    match &e.kind {
        ExprKind::Pow(base, exp) => match exp.kind {
            ExprKind::Number(n) if n < 0.0 => Some((base, -n)),
            _ => None,
        },
        _ => None,
    }
}

/// Positive counterpart of a term that should print as subtraction
fn extract_negative(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Number(n) if *n < 0.0 => Some(Expr::number(-n)),
        ExprKind::Product(factors) => {
            let n = factors.first()?.as_number().filter(|n| *n < 0.0)?;
            let mut rest: Vec<Arc<Expr>> = Vec::with_capacity(factors.len());
            if n != -1.0 {
                rest.push(Arc::new(Expr::number(-n)));
            }
            rest.extend(factors[1..].iter().cloned());
            if rest.len() == 1 {
                Some((*rest[0]).clone())
            } else {
                Some(Expr::new(ExprKind::Product(rest)))
            }
        }
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum Context {
    /// Term of a sum
    Term,
    /// Factor in a numerator
    Factor,
    PowBase,
    PowExponent,
}

fn needs_parens(expr: &Expr, ctx: Context) -> bool {
    match ctx {
        Context::Term => matches!(expr.kind, ExprKind::Sum(_)),
        // Also covers the right operand of `/`
        Context::Factor => {
            matches!(
                expr.kind,
                ExprKind::Sum(_) | ExprKind::Product(_) | ExprKind::Div(_, _)
            ) || negative_number(expr)
                || negative_exponent(expr).is_some()
        }
        Context::PowBase => {
            matches!(
                expr.kind,
                ExprKind::Sum(_) | ExprKind::Product(_) | ExprKind::Div(_, _) | ExprKind::Pow(_, _)
            ) || negative_number(expr)
        }
        Context::PowExponent => match expr.kind {
            ExprKind::Variable | ExprKind::Constant(_) | ExprKind::Call { .. } => false,
            ExprKind::Number(n) => n < 0.0,
            _ => true,
        },
    }
}

fn format_wrapped(f: &mut fmt::Formatter<'_>, expr: &Expr, ctx: Context) -> fmt::Result {
    if needs_parens(expr, ctx) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// `base**k` for the denominator of a negative power
fn format_positive_power(f: &mut fmt::Formatter<'_>, base: &Expr, k: f64) -> fmt::Result {
    format_wrapped(f, base, Context::PowBase)?;
    write!(f, "**")?;
    format_number(f, k)
}

fn format_sum(f: &mut fmt::Formatter<'_>, terms: &[Arc<Expr>]) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            format_wrapped(f, term, Context::Term)?;
        } else if let Some(positive) = extract_negative(term) {
            write!(f, " - ")?;
            format_wrapped(f, &positive, Context::Term)?;
        } else {
            write!(f, " + ")?;
            format_wrapped(f, term, Context::Term)?;
        }
    }
    Ok(())
}

/// Factor destined for the denominator of a printed product
enum DenominatorFactor<'a> {
    Integer(f64),
    Base(&'a Expr),
    Power(&'a Expr, f64),
}

impl DenominatorFactor<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenominatorFactor::Integer(n) => format_number(f, *n),
            DenominatorFactor::Base(e) => format_wrapped(f, e, Context::Factor),
            DenominatorFactor::Power(base, k) => format_positive_power(f, base, *k),
        }
    }
}

fn format_product(f: &mut fmt::Formatter<'_>, factors: &[Arc<Expr>]) -> fmt::Result {
    if factors.is_empty() {
        return write!(f, "1");
    }

    let (mut coefficient, rest) = match factors[0].as_number() {
        Some(n) => (n, &factors[1..]),
        None => (1.0, factors),
    };

    if coefficient < 0.0 {
        write!(f, "-")?;
        coefficient = -coefficient;
    }

    let mut numerator: Vec<&Expr> = Vec::new();
    let mut denominator: Vec<DenominatorFactor> = Vec::new();

    if coefficient != 1.0 && coefficient > 0.0 && coefficient < 1.0 {
        // 0.5*x prints as x/2 when the reciprocal is exactly an integer
        let reciprocal = (1.0 / coefficient).round();
        if reciprocal.is_finite() && 1.0 / reciprocal == coefficient {
            denominator.push(DenominatorFactor::Integer(reciprocal));
            coefficient = 1.0;
        }
    }

    for factor in rest {
        match negative_exponent(factor) {
            Some((base, k)) if k == 1.0 => denominator.push(DenominatorFactor::Base(base)),
            Some((base, k)) => denominator.push(DenominatorFactor::Power(base, k)),
            None => numerator.push(factor),
        }
    }

    let mut wrote = false;
    if coefficient != 1.0 {
        format_number(f, coefficient)?;
        wrote = true;
    }
    for factor in &numerator {
        if wrote {
            write!(f, "*")?;
        }
        format_wrapped(f, factor, Context::Factor)?;
        wrote = true;
    }
    if !wrote {
        write!(f, "1")?;
    }

    match denominator.as_slice() {
        [] => Ok(()),
        [single] => {
            write!(f, "/")?;
            single.write(f)
        }
        many => {
            write!(f, "/(")?;
            for (i, factor) in many.iter().enumerate() {
                if i > 0 {
                    write!(f, "*")?;
                }
                factor.write(f)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => format_number(f, *n),
            ExprKind::Variable => write!(f, "x"),
            ExprKind::Constant(c) => write!(f, "{}", c.name()),
            ExprKind::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
            ExprKind::Sum(terms) => format_sum(f, terms),
            ExprKind::Product(factors) => format_product(f, factors),
            ExprKind::Div(num, den) => {
                format_wrapped(f, num, Context::Term)?;
                write!(f, "/")?;
                format_wrapped(f, den, Context::Factor)
            }
            ExprKind::Pow(base, exp) => {
                if let Some((base, k)) = negative_exponent(self) {
                    write!(f, "1/")?;
                    return if k == 1.0 {
                        format_wrapped(f, base, Context::Factor)
                    } else {
                        format_positive_power(f, base, k)
                    };
                }
                format_wrapped(f, base, Context::PowBase)?;
                write!(f, "**")?;
                format_wrapped(f, exp, Context::PowExponent)
            }
        }
    }
}
