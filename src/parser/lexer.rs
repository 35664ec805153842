//! Tokenizer for the formula grammar
//!
//! Identifiers are resolved against the whitelist here, so anything that is not
//! `x`, a constant or a built-in function is rejected before parsing starts.

use crate::ast::Constant;
use crate::functions::Function;
use crate::parser::tokens::{Operator, Token, TokenKind};
use crate::{ParseError, Span};

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();
    // Most tokens are a single character; rough capacity guess
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) {
            pos = scan_number(bytes, pos);
            let text = &input[start..pos];
            let value: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
                value: text.to_string(),
                span: Some(Span::new(start, pos)),
            })?;
            tokens.push(Token::new(TokenKind::Number(value), Span::new(start, pos)));
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            let name = &input[start..pos];
            let span = Span::new(start, pos);
            tokens.push(Token::new(resolve_identifier(name, span)?, span));
            continue;
        }

        let kind = match c {
            b'+' => TokenKind::Operator(Operator::Add),
            b'-' => TokenKind::Operator(Operator::Sub),
            b'/' => TokenKind::Operator(Operator::Div),
            b'^' => TokenKind::Operator(Operator::Pow),
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 1;
                TokenKind::Operator(Operator::Pow)
            }
            b'*' => TokenKind::Operator(Operator::Mul),
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ParseError::invalid_token_at(
                    ch.to_string(),
                    Span::new(start, start + ch.len_utf8()),
                ));
            }
        };
        pos += 1;
        tokens.push(Token::new(kind, Span::new(start, pos)));
    }

    Ok(tokens)
}

/// Advance past `digits [. digits] [(e|E) [+|-] digits]`
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        // `2e` without digits leaves the `e` for the identifier scanner
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

fn resolve_identifier(name: &str, span: Span) -> Result<TokenKind, ParseError> {
    if name == "x" {
        return Ok(TokenKind::Variable);
    }
    if let Some(c) = Constant::from_name(name) {
        return Ok(TokenKind::Constant(c));
    }
    if let Some(func) = Function::from_name(name) {
        return Ok(TokenKind::Function(func));
    }
    Err(ParseError::UnknownIdentifier {
        name: name.to_string(),
        span: Some(span),
    })
}
