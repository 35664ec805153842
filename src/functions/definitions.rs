//! Evaluation and differentiation rules for the whitelisted functions
//!
//! Derivative rules return d/du f(u); the differentiation engine multiplies by
//! u' (chain rule). All results are built with the simplifying constructors so
//! derivatives come out in canonical form.

use std::sync::{Arc, OnceLock};

use super::Function;
use crate::{EvalError, Expr};

/// Definition of a whitelisted function: its evaluation and differentiation logic
pub(crate) struct FunctionDefinition {
    /// Spelling in formulas (e.g., "sin")
    pub name: &'static str,

    /// Numerical evaluation with real-domain checks
    pub eval: fn(f64) -> Result<f64, EvalError>,

    /// Symbolic derivative with respect to the argument
    pub derivative: fn(&Arc<Expr>) -> Expr,
}

static DEFINITIONS: OnceLock<Vec<FunctionDefinition>> = OnceLock::new();

pub(crate) fn definition(func: Function) -> &'static FunctionDefinition {
    // Table order matches `Function::ALL`, so the discriminant is the index
    &DEFINITIONS.get_or_init(all_definitions)[func as usize]
}

fn finite_arg(function: &'static str, arg: f64) -> Result<f64, EvalError> {
    if arg.is_finite() {
        Ok(arg)
    } else {
        Err(EvalError::Domain { function, arg })
    }
}

fn finite_result(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

fn call(func: Function, u: &Arc<Expr>) -> Expr {
    Expr::call(func, (**u).clone())
}

fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition {
            name: "sin",
            eval: |x| finite_arg("sin", x).map(f64::sin),
            // d/du sin(u) = cos(u)
            derivative: |u| call(Function::Cos, u),
        },
        FunctionDefinition {
            name: "cos",
            eval: |x| finite_arg("cos", x).map(f64::cos),
            // d/du cos(u) = -sin(u)
            derivative: |u| Expr::negate(call(Function::Sin, u)),
        },
        FunctionDefinition {
            name: "tan",
            eval: |x| finite_arg("tan", x).map(f64::tan).and_then(finite_result),
            // d/du tan(u) = tan(u)^2 + 1
            derivative: |u| {
                Expr::sum(vec![
                    Expr::power(call(Function::Tan, u), Expr::number(2.0)),
                    Expr::number(1.0),
                ])
            },
        },
        FunctionDefinition {
            name: "log",
            eval: |x| {
                if x > 0.0 && x.is_finite() {
                    Ok(x.ln())
                } else {
                    Err(EvalError::Domain {
                        function: "log",
                        arg: x,
                    })
                }
            },
            // d/du log(u) = 1/u
            derivative: |u| Expr::power((**u).clone(), Expr::number(-1.0)),
        },
        FunctionDefinition {
            name: "exp",
            eval: |x| finite_result(x.exp()),
            // d/du exp(u) = exp(u)
            derivative: |u| call(Function::Exp, u),
        },
        FunctionDefinition {
            name: "sqrt",
            eval: |x| {
                if x >= 0.0 {
                    finite_result(x.sqrt())
                } else {
                    Err(EvalError::Domain {
                        function: "sqrt",
                        arg: x,
                    })
                }
            },
            // d/du sqrt(u) = 1/(2*sqrt(u))
            derivative: |u| {
                Expr::power(
                    Expr::product(vec![Expr::number(2.0), call(Function::Sqrt, u)]),
                    Expr::number(-1.0),
                )
            },
        },
        FunctionDefinition {
            name: "abs",
            eval: |x| finite_arg("abs", x).map(f64::abs),
            // d/du |u| = u/|u|, undefined at 0 like the function's slope
            derivative: |u| {
                Expr::product(vec![
                    (**u).clone(),
                    Expr::power(call(Function::Abs, u), Expr::number(-1.0)),
                ])
            },
        },
    ]
}
