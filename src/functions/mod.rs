//! Whitelisted mathematical functions
//!
//! The grammar knows exactly seven unary functions. Each one carries its
//! domain-checked numeric evaluation and its symbolic derivative rule in
//! [`definitions`]; nothing outside this table can be called from a formula.

use std::fmt;

use crate::EvalError;

pub(crate) mod definitions;

pub(crate) use definitions::FunctionDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    /// Natural logarithm
    Log,
    Exp,
    Sqrt,
    Abs,
}

impl Function {
    /// All functions the grammar accepts, in table order
    pub const ALL: [Function; 7] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Log,
        Function::Exp,
        Function::Sqrt,
        Function::Abs,
    ];

    /// Look up a function by its formula spelling
    pub fn from_name(name: &str) -> Option<Self> {
        Function::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Evaluate at `arg`, reporting points outside the real domain as errors
    pub fn apply(self, arg: f64) -> Result<f64, EvalError> {
        (self.definition().eval)(arg)
    }

    pub(crate) fn definition(self) -> &'static FunctionDefinition {
        definitions::definition(self)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
