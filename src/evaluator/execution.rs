//! Scalar evaluation: the stack machine and the tree-walking substitution.
//!
//! Both paths share the checked arithmetic below, so a formula and its parsed
//! tree agree on where the function is undefined.

use super::instruction::Instruction;
use crate::{EvalError, Expr, ExprKind};

#[inline]
fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

#[inline]
pub(crate) fn checked_add(a: f64, b: f64) -> Result<f64, EvalError> {
    finite(a + b)
}

#[inline]
pub(crate) fn checked_mul(a: f64, b: f64) -> Result<f64, EvalError> {
    finite(a * b)
}

#[inline]
pub(crate) fn checked_div(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    finite(a / b)
}

/// Real power: `0**negative` and a negative base with a fractional exponent
/// have no real value
pub(crate) fn checked_pow(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalError::InvalidPower { base, exponent });
    }
    finite(base.powf(exponent))
}

#[inline]
fn pop(stack: &mut Vec<f64>) -> f64 {
    // The compiler balances every program; an underflow surfaces as NaN
    stack.pop().unwrap_or(f64::NAN)
}

/// Run a compiled program at `x`
pub(crate) fn execute(
    instructions: &[Instruction],
    x: f64,
    stack: &mut Vec<f64>,
) -> Result<f64, EvalError> {
    stack.clear();

    for instr in instructions {
        match *instr {
            Instruction::LoadConst(c) => stack.push(c),
            Instruction::LoadX => stack.push(x),
            Instruction::Add => {
                let b = pop(stack);
                let a = pop(stack);
                stack.push(checked_add(a, b)?);
            }
            Instruction::Mul => {
                let b = pop(stack);
                let a = pop(stack);
                stack.push(checked_mul(a, b)?);
            }
            Instruction::Div => {
                let b = pop(stack);
                let a = pop(stack);
                stack.push(checked_div(a, b)?);
            }
            Instruction::Pow => {
                let exp = pop(stack);
                let base = pop(stack);
                stack.push(checked_pow(base, exp)?);
            }
            Instruction::Neg => {
                let a = pop(stack);
                stack.push(-a);
            }
            Instruction::Call(func) => {
                let a = pop(stack);
                stack.push(func.apply(a)?);
            }
        }
    }

    finite(pop(stack))
}

impl Expr {
    /// Evaluate the tree directly with `x` substituted
    ///
    /// Used for symbolic results (derivatives), which are never compiled.
    pub fn eval_at(&self, x: f64) -> Result<f64, EvalError> {
        match &self.kind {
            ExprKind::Number(n) => finite(*n),
            ExprKind::Variable => finite(x),
            ExprKind::Constant(c) => Ok(c.value()),
            ExprKind::Call { func, arg } => func.apply(arg.eval_at(x)?),
            ExprKind::Sum(terms) => terms
                .iter()
                .try_fold(0.0, |acc, t| checked_add(acc, t.eval_at(x)?)),
            ExprKind::Product(factors) => factors
                .iter()
                .try_fold(1.0, |acc, f| checked_mul(acc, f.eval_at(x)?)),
            ExprKind::Div(num, den) => checked_div(num.eval_at(x)?, den.eval_at(x)?),
            ExprKind::Pow(base, exp) => checked_pow(base.eval_at(x)?, exp.eval_at(x)?),
        }
    }
}
