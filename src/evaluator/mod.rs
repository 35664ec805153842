//! Safe formula evaluation.
//!
//! A formula is parsed once into an [`Expr`] and compiled into flat bytecode
//! for a small stack machine. Nothing in the input is ever executed as code:
//! the grammar only knows `x`, `pi`, `e`, the built-in functions and
//! arithmetic.
//!
//! ```text
//! ┌──────────┐    ┌─────────┐    ┌────────────┐    ┌─────────────────┐
//! │   text   │ -> │  parse  │ -> │  Compiler  │ -> │ CompiledFormula │
//! └──────────┘    └─────────┘    └────────────┘    └─────────────────┘
//! ```
//!
//! Every operation is checked: division by zero, `log`/`sqrt` outside their
//! real domain, `0**negative`, a negative base with a fractional exponent and
//! any non-finite intermediate value produce an [`EvalError`] instead of NaN.
//!
//! # Example
//!
//! ```
//! use graph_anafis::{evaluate, Formula};
//!
//! let f = Formula::parse("sin(x) * cos(x) + x^2").unwrap();
//! let y = f.eval(0.5).unwrap();
//! assert!((y - (0.5_f64.sin() * 0.5_f64.cos() + 0.25)).abs() < 1e-12);
//!
//! assert_eq!(evaluate("1/x", 0.0), None);
//! ```

mod compiler;
mod execution;
mod instruction;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::parser::{ParseOptions, parse_with};
use crate::{EvalError, Expr, ParseError};
use compiler::Compiler;
use instruction::Instruction;

/// Compiled stack-machine program - thread-safe, reusable
#[derive(Clone, Debug)]
pub struct CompiledFormula {
    /// Bytecode instructions (immutable after compilation)
    instructions: Arc<[Instruction]>,
    /// Required stack depth for evaluation
    stack_size: usize,
}

impl CompiledFormula {
    pub fn compile(expr: &Expr) -> Self {
        let mut compiler = Compiler::new();
        compiler.compile_expr(expr);
        let (instructions, stack_size) = compiler.finish();
        CompiledFormula {
            instructions: instructions.into(),
            stack_size,
        }
    }

    /// Evaluate at `x`
    #[inline]
    pub fn evaluate(&self, x: f64) -> Result<f64, EvalError> {
        let mut stack: Vec<f64> = Vec::with_capacity(self.stack_size);
        self.evaluate_with_stack(x, &mut stack)
    }

    /// Evaluate using an existing stack buffer (avoids allocation)
    #[inline]
    pub fn evaluate_with_stack(&self, x: f64, stack: &mut Vec<f64>) -> Result<f64, EvalError> {
        execution::execute(&self.instructions, x, stack)
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Get number of bytecode instructions (for debugging/profiling)
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}

/// A parsed, compiled formula in `x`
#[derive(Clone, Debug)]
pub struct Formula {
    source: String,
    expr: Expr,
    compiled: CompiledFormula,
}

impl Formula {
    /// Parse and compile `text`
    ///
    /// # Errors
    /// Returns the `ParseError` of [`parse`].
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with(text, ParseOptions::default())
    }

    /// Like [`Formula::parse`] with explicit parser limits
    pub fn parse_with(text: &str, options: ParseOptions) -> Result<Self, ParseError> {
        let expr = parse_with(text, options)?;
        Ok(Formula::from_expr(text.to_string(), expr))
    }

    pub(crate) fn from_expr(source: String, expr: Expr) -> Self {
        let compiled = CompiledFormula::compile(&expr);
        Formula {
            source,
            expr,
            compiled,
        }
    }

    /// Evaluate at `x`
    ///
    /// # Errors
    /// Returns an `EvalError` where the formula has no real, finite value.
    #[inline]
    pub fn eval(&self, x: f64) -> Result<f64, EvalError> {
        self.compiled.evaluate(x)
    }

    /// Evaluate reusing a caller-owned stack
    #[inline]
    pub fn eval_with_stack(&self, x: f64, stack: &mut Vec<f64>) -> Result<f64, EvalError> {
        self.compiled.evaluate_with_stack(x, stack)
    }

    /// The text this formula was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn compiled(&self) -> &CompiledFormula {
        &self.compiled
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Evaluate `formula` at `x`, returning `None` for malformed formulas and
/// undefined points alike
pub fn evaluate(formula: &str, x: f64) -> Option<f64> {
    Formula::parse(formula).ok()?.eval(x).ok()
}
