//! Expression-to-bytecode compilation

use super::instruction::Instruction;
use crate::{Expr, ExprKind};

/// Internal compiler state
pub(crate) struct Compiler {
    instructions: Vec<Instruction>,
    current_stack: usize,
    max_stack: usize,
}

impl Compiler {
    pub(crate) fn new() -> Self {
        Self {
            instructions: Vec::with_capacity(64),
            current_stack: 0,
            max_stack: 0,
        }
    }

    /// Finish compilation, returning the program and its required stack depth
    pub(crate) fn finish(self) -> (Vec<Instruction>, usize) {
        (self.instructions, self.max_stack)
    }

    fn push(&mut self) {
        self.current_stack += 1;
        self.max_stack = self.max_stack.max(self.current_stack);
    }

    fn pop(&mut self) {
        self.current_stack = self.current_stack.saturating_sub(1);
    }

    fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    fn load(&mut self, instr: Instruction) {
        self.emit(instr);
        self.push();
    }

    /// Emit `op` between consecutive operands, left to right
    fn compile_chain(&mut self, items: &[std::sync::Arc<Expr>], op: Instruction, empty: f64) {
        match items.split_first() {
            None => self.load(Instruction::LoadConst(empty)),
            Some((first, rest)) => {
                self.compile_expr(first);
                for item in rest {
                    self.compile_expr(item);
                    self.emit(op);
                    self.pop(); // Two operands -> one result
                }
            }
        }
    }

    pub(crate) fn compile_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Number(n) => self.load(Instruction::LoadConst(*n)),
            ExprKind::Variable => self.load(Instruction::LoadX),
            ExprKind::Constant(c) => self.load(Instruction::LoadConst(c.value())),

            ExprKind::Sum(terms) => self.compile_chain(terms, Instruction::Add, 0.0),

            ExprKind::Product(factors) => {
                // Negation pattern: Product([-1, x]) = -x
                if let [first, inner] = factors.as_slice()
                    && first.is_number(-1.0)
                {
                    self.compile_expr(inner);
                    self.emit(Instruction::Neg);
                    return;
                }
                self.compile_chain(factors, Instruction::Mul, 1.0);
            }

            ExprKind::Div(num, den) => {
                self.compile_expr(num);
                self.compile_expr(den);
                self.emit(Instruction::Div);
                self.pop();
            }

            ExprKind::Pow(base, exp) => {
                self.compile_expr(base);
                self.compile_expr(exp);
                self.emit(Instruction::Pow);
                self.pop();
            }

            ExprKind::Call { func, arg } => {
                self.compile_expr(arg);
                self.emit(Instruction::Call(*func));
            }
        }
    }
}
