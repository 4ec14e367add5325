//! Tokenizer for arithmetic expressions.
//!
//! Only numeric literals, the arithmetic operators and parentheses produce
//! tokens. Anything else (names, strings, brackets, comparison or bitwise
//! operators) is rejected here with a reason naming the construct.

use num_bigint::BigInt;

use crate::calc::number::{self, Number, MAX_INT_BITS};
use crate::error::CalcError;

/// Upper bound on tokens per expression. Keeps the tree, and therefore the
/// evaluator's recursion, shallow.
pub const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Number),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        let token = match c {
            ' ' | '\t' | '\x0c' => {
                i += 1;
                continue;
            }
            '0'..='9' => {
                let (number, len) = lex_number(&chars[i..])?;
                i += len;
                tokens.push(Token::Number(number));
                check_len(&tokens)?;
                continue;
            }
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let (number, len) = lex_number(&chars[i..])?;
                i += len;
                tokens.push(Token::Number(number));
                check_len(&tokens)?;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if next == Some('*') => {
                i += 1;
                Token::DoubleStar
            }
            '*' => Token::Star,
            '/' if next == Some('/') => {
                i += 1;
                Token::DoubleSlash
            }
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => return Err(reject(&chars[i..])),
        };

        i += 1;
        tokens.push(token);
        check_len(&tokens)?;
    }

    Ok(tokens)
}

fn check_len(tokens: &[Token]) -> Result<(), CalcError> {
    if tokens.len() > MAX_TOKENS {
        return Err(CalcError::invalid(format!(
            "expression longer than {} tokens",
            MAX_TOKENS
        )));
    }
    Ok(())
}

/// Lex one numeric literal at the start of `chars`, returning the value and
/// the number of characters consumed.
fn lex_number(chars: &[char]) -> Result<(Number, usize), CalcError> {
    let mut i = 0;
    let mut text = String::new();
    let mut is_float = false;

    i += take_digits(&chars[i..], &mut text)?;

    if chars.get(i) == Some(&'.') {
        is_float = true;
        text.push('.');
        i += 1;
        i += take_digits(&chars[i..], &mut text)?;
    }

    if matches!(chars.get(i), Some('e') | Some('E')) {
        let mut j = i + 1;
        let mut exp = String::from("e");
        if let Some(sign @ ('+' | '-')) = chars.get(j) {
            exp.push(*sign);
            j += 1;
        }
        let digits = take_digits(&chars[j..], &mut exp)?;
        if digits == 0 {
            return Err(CalcError::invalid("invalid numeric literal"));
        }
        is_float = true;
        text.push_str(&exp);
        i = j + digits;
    }

    // `2j`, `3abc`, `1_`
    if chars
        .get(i)
        .is_some_and(|c| c.is_alphanumeric() || *c == '_')
    {
        return Err(CalcError::invalid("invalid numeric literal"));
    }

    let number = if is_float {
        let value: f64 = text
            .parse()
            .map_err(|_| CalcError::invalid(format!("invalid numeric literal '{}'", text)))?;
        Number::Float(value)
    } else {
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(CalcError::invalid(
                "leading zeros in integer literals are not permitted",
            ));
        }
        // cheap length bound before parsing; `int` enforces the exact width
        if text.len() > MAX_INT_BITS as usize / 3 {
            return Err(CalcError::invalid("integer literal too large"));
        }
        let value: BigInt = text
            .parse()
            .map_err(|_| CalcError::invalid(format!("invalid numeric literal '{}'", text)))?;
        number::int(value)?
    };

    Ok((number, i))
}

/// Consume ASCII digits, allowing single underscores between digits.
/// Returns the number of characters consumed.
fn take_digits(chars: &[char], out: &mut String) -> Result<usize, CalcError> {
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        if c.is_ascii_digit() {
            out.push(c);
            i += 1;
        } else if c == '_' {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if !(prev_digit && next_digit) {
                return Err(CalcError::invalid("invalid numeric literal"));
            }
            i += 1;
        } else {
            break;
        }
    }
    Ok(i)
}

/// Describe the construct starting at `chars[0]`.
fn reject(chars: &[char]) -> CalcError {
    let c = chars[0];
    let reason = match c {
        c if c.is_alphabetic() || c == '_' => {
            let name: String = chars
                .iter()
                .take_while(|c| c.is_alphanumeric() || **c == '_')
                .collect();
            format!("names are not allowed ('{}')", name)
        }
        '\'' | '"' => "string literals are not allowed".to_string(),
        '[' | ']' | '{' | '}' => "collections are not allowed".to_string(),
        ',' => "tuples are not allowed".to_string(),
        '.' => "attribute access is not allowed".to_string(),
        '<' | '>' | '=' | '!' => "comparisons are not allowed".to_string(),
        '^' | '&' | '|' | '~' => format!("operator '{}' is not allowed", c),
        '@' => "operator '@' is not allowed".to_string(),
        '\n' | '\r' => "expression must be a single line".to_string(),
        other => format!("unexpected character '{}'", other),
    };
    CalcError::InvalidExpression(reason)
}
