//! Recursive-descent parser for arithmetic expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := atom ('**' unary)?
//! atom    := NUMBER | '(' sum ')'
//! ```
//!
//! `**` is right associative and binds tighter than a unary sign on its
//! left (`-2**2 == -4`), while its right operand may carry one
//! (`2**-1 == 0.5`).

use crate::calc::ast::{BinaryOp, Expr, UnaryOp};
use crate::calc::lexer::Token;
use crate::error::CalcError;

/// Maximum nesting of parentheses, signs and exponents.
pub const MAX_DEPTH: usize = 100;

pub fn parse(tokens: &[Token]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::invalid("empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.sum()?;

    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token)),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn sum(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.product()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn product(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::invalid("expression is nested too deeply"));
        }

        let result = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.unary().map(|e| Expr::unary(UnaryOp::Neg, e))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary().map(|e| Expr::unary(UnaryOp::Pos, e))
            }
            _ => self.power(),
        };

        self.depth -= 1;
        result
    }

    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.atom()?;
        if matches!(self.peek(), Some(Token::DoubleStar)) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, CalcError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n.clone())),
            Some(Token::LParen) => {
                let inner = self.sum()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(unexpected(token)),
                    None => Err(CalcError::invalid("unclosed parenthesis")),
                }
            }
            Some(token) => Err(unexpected(token)),
            None => Err(CalcError::invalid("unexpected end of expression")),
        }
    }
}

fn unexpected(token: &Token) -> CalcError {
    let what = match token {
        Token::Number(n) => return CalcError::invalid(format!("unexpected number {}", n)),
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Star => "*",
        Token::DoubleStar => "**",
        Token::Slash => "/",
        Token::DoubleSlash => "//",
        Token::Percent => "%",
        Token::LParen => "(",
        Token::RParen => ")",
    };
    CalcError::invalid(format!("unexpected '{}'", what))
}
