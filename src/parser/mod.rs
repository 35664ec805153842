//! Parser module - converts strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::{Expr, ParseError};

/// Default cap on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parentheses, function calls, unary signs and
    /// operator operands before the input is rejected
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse a formula string into an expression AST
///
/// The grammar is deliberately small: numbers, `x`, `pi`, `e`, the functions
/// `sin cos tan log exp sqrt abs`, the operators `+ - * / **` (`^` is an alias
/// for `**`) and parentheses. Every other identifier is an error, and there is
/// no implicit multiplication.
///
/// # Example
/// ```
/// use graph_anafis::parse;
///
/// let expr = parse("x**2 + sin(x)").unwrap();
/// assert_eq!(expr.node_count(), 6);
/// ```
///
/// # Errors
/// Returns `ParseError` if:
/// - The input is empty
/// - The input contains an unknown identifier or invalid syntax
/// - Parentheses are unbalanced
/// - Nesting exceeds [`DEFAULT_MAX_DEPTH`]
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with(input, ParseOptions::default())
}

/// Like [`parse`] with explicit limits
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Expr, ParseError> {
    // Pipeline: validate -> lex -> parse
    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    let tokens = lexer::lex(input)?;
    pratt::parse_expression(&tokens, options.max_depth)
}
