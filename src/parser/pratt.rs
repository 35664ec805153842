use crate::parser::tokens::{Operator, Token, TokenKind};
use crate::{Expr, ParseError};

/// Binding power of unary `+`/`-`: between Mul (20) and Pow (30), so `-x**2` is `-(x**2)`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Token], max_depth: usize) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let expr = parser.parse_expr(0)?;

    // Everything must be consumed; `2 x` or `x)` are errors, not implicit products
    match parser.current() {
        None => Ok(expr),
        Some(token) => Err(ParseError::unexpected(
            "end of input",
            token.to_user_string(),
            Some(token.span),
        )),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Parse a nested sub-expression, enforcing the depth limit
    fn parse_nested(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }
        self.depth += 1;
        let result = self.parse_expr(min_precedence);
        self.depth -= 1;
        result
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(token) = self.current() {
            let op = match token.kind {
                TokenKind::Operator(op) => op,
                _ => break,
            };

            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, op)?;
        }

        Ok(left)
    }

    fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        match self.current() {
            Some(Token {
                kind: TokenKind::RightParen,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(ParseError::unexpected(
                ")",
                token.to_user_string(),
                Some(token.span),
            )),
            None => Err(ParseError::UnexpectedEndOfInput),
        }
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().ok_or(ParseError::UnexpectedEndOfInput)?;

        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            TokenKind::Variable => {
                self.advance();
                Ok(Expr::variable())
            }

            TokenKind::Constant(c) => {
                self.advance();
                Ok(Expr::constant(*c))
            }

            TokenKind::Function(func) => {
                self.advance();

                // Function must be followed by (
                match self.current() {
                    Some(Token {
                        kind: TokenKind::LeftParen,
                        ..
                    }) => self.advance(),
                    Some(next) => {
                        return Err(ParseError::unexpected(
                            "(",
                            next.to_user_string(),
                            Some(next.span),
                        ));
                    }
                    None => return Err(ParseError::UnexpectedEndOfInput),
                }

                let arg = self.parse_nested(0)?;
                self.expect_right_paren()?;
                Ok(Expr::func(*func, arg))
            }

            TokenKind::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_nested(UNARY_PRECEDENCE)?;
                Ok(Expr::neg_expr(expr))
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            TokenKind::Operator(Operator::Add) => {
                self.advance();
                self.parse_nested(UNARY_PRECEDENCE)
            }

            TokenKind::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_nested(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            TokenKind::Operator(_) | TokenKind::RightParen => Err(ParseError::invalid_token_at(
                token.to_user_string(),
                token.span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, op: Operator) -> Result<Expr, ParseError> {
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if op.is_right_associative() {
            op.precedence()
        } else {
            op.precedence() + 1
        };

        // `2**-1` is valid: the right operand may start with a unary sign
        let right = self.parse_nested(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add_expr(left, right),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::mul_expr(left, right),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow_expr(left, right),
        })
    }
}
