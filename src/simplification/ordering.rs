//! Canonical ordering for expressions.
//!
//! Sum terms go by descending degree in `x` (`x**2 + x + 1`), product factors
//! by kind: numbers, constants, the variable and its powers, then function
//! calls and exponentials, then grouped sums. Ties fall back to the printed
//! form so the order is total and deterministic.

use std::cmp::Ordering;

use crate::{Expr, ExprKind};

fn factor_rank(e: &Expr) -> u8 {
    match &e.kind {
        ExprKind::Number(_) => 0,
        ExprKind::Constant(_) => 1,
        ExprKind::Variable => 2,
        ExprKind::Pow(base, exp) => {
            let base_rank = factor_rank(base);
            if exp.contains_variable() {
                base_rank.max(3)
            } else {
                base_rank
            }
        }
        ExprKind::Call { .. } => 3,
        ExprKind::Sum(_) => 4,
        ExprKind::Product(_) | ExprKind::Div(_, _) => 5,
    }
}

/// Order of factors inside a canonical product
pub(crate) fn factor_cmp(a: &Expr, b: &Expr) -> Ordering {
    factor_rank(a)
        .cmp(&factor_rank(b))
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

/// Order of terms inside a canonical sum (numeric constants are appended separately)
pub(crate) fn term_cmp(a: &Expr, b: &Expr) -> Ordering {
    b.degree()
        .partial_cmp(&a.degree())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.to_string().cmp(&b.to_string()))
}
