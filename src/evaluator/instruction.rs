//! Bytecode instruction definitions

use crate::functions::Function;

/// Bytecode instruction for stack-based evaluation
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Instruction {
    /// Push a constant value onto the stack
    LoadConst(f64),
    /// Push the value of `x`
    LoadX,

    // Arithmetic operations (pop operands, push result)
    Add,
    Mul,
    Div,
    Neg,
    Pow,

    /// Apply a whitelisted function to the top of the stack
    Call(Function),
}
