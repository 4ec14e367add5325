//! Restricted arithmetic evaluator.
//!
//! Input is tokenized, parsed into a closed expression tree and walked with
//! a single `match`. Only numeric literals, `+ - * / // % **`, unary `+ -`
//! and parentheses are accepted; everything else fails with
//! `CalcError::InvalidExpression`. Division by zero is reported as
//! `CalcError::DivisionByZero`.

pub mod ast;
pub mod lexer;
pub mod number;
pub mod parser;

use tracing::trace;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use number::Number;

use crate::error::CalcError;

/// Parse and evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<Number, CalcError> {
    trace!(expression, "evaluating");
    let expr = parse(expression)?;
    eval(&expr)
}

/// Parse an expression without evaluating it.
pub fn parse(expression: &str) -> Result<Expr, CalcError> {
    let tokens = lexer::tokenize(expression)?;
    parser::parse(&tokens)
}

/// Evaluate an already parsed tree.
pub fn eval(expr: &Expr) -> Result<Number, CalcError> {
    match expr {
        Expr::Number(n) => Ok(n.clone()),
        Expr::Binary { op, left, right } => {
            let left = eval(left)?;
            let right = eval(right)?;
            op.apply(left, right)
        }
        Expr::Unary { op, operand } => Ok(op.apply(eval(operand)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_simple() {
        assert_eq!(evaluate("2+2"), Ok(Number::from(4)));
        assert_eq!(evaluate(" 2 + 3 * 4 "), Ok(Number::from(14)));
        assert_eq!(evaluate("7/2"), Ok(Number::Float(3.5)));
    }

    #[test]
    fn test_eval_tree() {
        let tree = Expr::binary(
            BinaryOp::Mul,
            Expr::unary(UnaryOp::Neg, Expr::Number(Number::from(3))),
            Expr::Number(Number::Float(1.5)),
        );
        assert_eq!(eval(&tree), Ok(Number::Float(-4.5)));
    }

    #[test]
    fn test_error_inside_subtree_fails_whole_expression() {
        assert_eq!(evaluate("1 + (2 / 0) * 3"), Err(CalcError::DivisionByZero));
    }
}
