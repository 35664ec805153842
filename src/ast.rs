//! Abstract Syntax Tree for single-variable formulas
//!
//! The tree is shared by the numeric evaluator and the symbolic engine.
//! Sums and products are n-ary; subtraction is `a + (-1)*b` and negation is
//! `(-1)*a`. Division stays binary in parsed trees so that evaluation keeps the
//! exact semantics of the input; the simplifying constructors in
//! `simplification` rewrite it as a product with a negative power.

use std::ops::Deref;
use std::sync::Arc;

use crate::functions::Function;

/// Named constants the grammar understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// The free variable `x`
    Variable,

    /// `pi` or `e`
    Constant(Constant),

    /// Call of a whitelisted unary function
    Call { func: Function, arg: Arc<Expr> },

    /// N-ary sum: a + b + c + ...
    Sum(Vec<Arc<Expr>>),

    /// N-ary product: a * b * c * ...
    Product(Vec<Arc<Expr>>),

    /// Division (binary - not associative)
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation (binary - right associative in the grammar)
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    // Accessor methods

    /// Return the value if this expression is a plain number
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn is_number(&self, value: f64) -> bool {
        self.as_number() == Some(value)
    }

    // Structure-preserving constructors used by the parser.
    // They never fold or reorder, so evaluation follows the input exactly.

    /// Create a number expression
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// The variable `x`
    pub fn variable() -> Self {
        Expr::new(ExprKind::Variable)
    }

    pub fn constant(c: Constant) -> Self {
        Expr::new(ExprKind::Constant(c))
    }

    /// Create a function call without simplification
    pub fn func(func: Function, arg: Expr) -> Self {
        Expr::new(ExprKind::Call {
            func,
            arg: Arc::new(arg),
        })
    }

    /// `left + right`, appending to `left` when it already is a sum
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        match left.kind {
            ExprKind::Sum(mut terms) => {
                terms.push(Arc::new(right));
                Expr::new(ExprKind::Sum(terms))
            }
            kind => Expr::new(ExprKind::Sum(vec![
                Arc::new(Expr::new(kind)),
                Arc::new(right),
            ])),
        }
    }

    /// `left - right` as `left + (-1)*right`
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::add_expr(left, Expr::neg_expr(right))
    }

    /// `left * right`, appending to `left` when it already is a product
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        match left.kind {
            ExprKind::Product(mut factors) => {
                factors.push(Arc::new(right));
                Expr::new(ExprKind::Product(factors))
            }
            kind => Expr::new(ExprKind::Product(vec![
                Arc::new(Expr::new(kind)),
                Arc::new(right),
            ])),
        }
    }

    /// `-inner` as `(-1)*inner`
    pub fn neg_expr(inner: Expr) -> Self {
        Expr::new(ExprKind::Product(vec![
            Arc::new(Expr::number(-1.0)),
            Arc::new(inner),
        ]))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    pub fn pow_expr(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Variable | ExprKind::Constant(_) => 1,
            ExprKind::Call { arg, .. } => 1 + arg.node_count(),
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                1 + items.iter().map(|e| e.node_count()).sum::<usize>()
            }
            ExprKind::Div(l, r) | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Variable | ExprKind::Constant(_) => 1,
            ExprKind::Call { arg, .. } => 1 + arg.max_depth(),
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                1 + items.iter().map(|e| e.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Div(l, r) | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check whether `x` occurs anywhere in the expression
    pub fn contains_variable(&self) -> bool {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => false,
            ExprKind::Variable => true,
            ExprKind::Call { arg, .. } => arg.contains_variable(),
            ExprKind::Sum(items) | ExprKind::Product(items) => {
                items.iter().any(|e| e.contains_variable())
            }
            ExprKind::Div(l, r) | ExprKind::Pow(l, r) => {
                l.contains_variable() || r.contains_variable()
            }
        }
    }

    /// Polynomial degree in `x` used for ordering sum terms.
    ///
    /// Only `x`, numeric powers of `x` and products of those contribute;
    /// everything else counts as degree zero.
    pub(crate) fn degree(&self) -> f64 {
        match &self.kind {
            ExprKind::Variable => 1.0,
            ExprKind::Pow(base, exp) if matches!(base.kind, ExprKind::Variable) => {
                exp.as_number().unwrap_or(0.0)
            }
            ExprKind::Product(factors) => factors.iter().map(|f| f.degree()).sum(),
            _ => 0.0,
        }
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}
