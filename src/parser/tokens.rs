use crate::Span;
use crate::ast::Constant;
use crate::functions::Function;

/// Binary operators with their binding power
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Precedence for infix use; unary signs bind at 25, between `*` and `**`
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
        }
    }

    pub(crate) fn is_right_associative(self) -> bool {
        matches!(self, Operator::Pow)
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Variable,
    Constant(Constant),
    Function(Function),
    Operator(Operator),
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Spelling used in error messages
    pub(crate) fn to_user_string(&self) -> String {
        match &self.kind {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Variable => "x".to_string(),
            TokenKind::Constant(c) => c.name().to_string(),
            TokenKind::Function(func) => func.name().to_string(),
            TokenKind::Operator(op) => op.symbol().to_string(),
            TokenKind::LeftParen => "(".to_string(),
            TokenKind::RightParen => ")".to_string(),
        }
    }
}
