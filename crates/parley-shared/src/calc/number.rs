//! Numeric values produced by the evaluator.
//!
//! Integers are arbitrary precision and stay exact through `+ - * // % **`.
//! True division always yields a float. Non-finite float results and
//! integers wider than [`MAX_INT_BITS`] are rejected.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::CalcError;

/// Widest integer the evaluator will produce (about 19,700 decimal digits).
pub const MAX_INT_BITS: u64 = 65_536;

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(BigInt::from(value))
    }
}

impl Number {
    /// Float view of the value. Integers beyond the `f64` range fail.
    pub fn as_f64(&self) -> Result<f64, CalcError> {
        match self {
            Number::Int(i) => int_to_f64(i),
            Number::Float(f) => Ok(*f),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(i) => i.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Int(i) => Number::Int(-i),
            Number::Float(f) => Number::Float(-f),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int(a + b),
            (a, b) => finite(a.as_f64()? + b.as_f64()?),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int(a - b),
            (a, b) => finite(a.as_f64()? - b.as_f64()?),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int(a * b),
            (a, b) => finite(a.as_f64()? * b.as_f64()?),
        }
    }

    pub fn div(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int_true_div(&a, &b),
            (a, b) => finite(a.as_f64()? / b.as_f64()?),
        }
    }

    /// Floor division, rounding toward negative infinity.
    pub fn floor_div(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int(a.div_floor(&b)),
            (a, b) => finite(float_floor_div(a.as_f64()?, b.as_f64()?)),
        }
    }

    /// Remainder with the sign of the divisor.
    pub fn modulo(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => int(a.mod_floor(&b)),
            (a, b) => finite(float_mod(a.as_f64()?, b.as_f64()?)),
        }
    }

    pub fn pow(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if !exp.is_negative() => int_pow(base, &exp),
            (base, exp) => {
                let (base, exp) = (base.as_f64()?, exp.as_f64()?);
                if base == 0.0 && exp < 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                if base < 0.0 && exp.fract() != 0.0 {
                    return Err(CalcError::invalid(
                        "negative number cannot be raised to a fractional power",
                    ));
                }
                finite(base.powf(exp))
            }
        }
    }
}

/// Wrap an integer result, rejecting values wider than [`MAX_INT_BITS`].
pub(crate) fn int(value: BigInt) -> Result<Number, CalcError> {
    if value.bits() > MAX_INT_BITS {
        return Err(too_large());
    }
    Ok(Number::Int(value))
}

fn too_large() -> CalcError {
    CalcError::invalid("integer result too large")
}

fn finite(value: f64) -> Result<Number, CalcError> {
    if value.is_finite() {
        Ok(Number::Float(value))
    } else {
        Err(CalcError::invalid("numeric result out of range"))
    }
}

fn int_to_f64(value: &BigInt) -> Result<f64, CalcError> {
    value
        .to_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| CalcError::invalid("integer too large to convert to float"))
}

fn int_pow(base: BigInt, exp: &BigInt) -> Result<Number, CalcError> {
    let bits = base.bits();
    // 0, 1 and -1 stay small for any exponent
    if bits <= 1 {
        let value = if exp.is_zero() {
            BigInt::from(1)
        } else if base.is_negative() && exp.is_even() {
            BigInt::from(1)
        } else {
            base
        };
        return Ok(Number::Int(value));
    }
    match exp.to_u64() {
        Some(e) if (bits - 1).saturating_mul(e) < MAX_INT_BITS => {
            let e = u32::try_from(e).map_err(|_| too_large())?;
            int(base.pow(e))
        }
        _ => Err(too_large()),
    }
}

/// Integer true division. Operands that convert to `f64` exactly are divided
/// directly; wider ones are reduced to a 64-bit quotient and scaled.
fn int_true_div(a: &BigInt, b: &BigInt) -> Result<Number, CalcError> {
    if a.bits() <= 53 && b.bits() <= 53 {
        return finite(int_to_f64(a)? / int_to_f64(b)?);
    }

    let shift = a.bits() as i64 - b.bits() as i64 - 64;
    let (n, d) = (a.magnitude(), b.magnitude());
    let quotient = if shift >= 0 {
        n / (d << shift as usize)
    } else {
        (n << shift.unsigned_abs() as usize) / d
    };
    let mut value = scale(quotient.to_f64().unwrap_or(f64::INFINITY), shift);
    if a.is_negative() != b.is_negative() {
        value = -value;
    }
    finite(value)
}

/// `value * 2^exp`, split in two steps so the intermediate power stays in range.
fn scale(value: f64, exp: i64) -> f64 {
    let exp = exp.clamp(-4 * MAX_INT_BITS as i64, 4 * MAX_INT_BITS as i64) as i32;
    let half = exp / 2;
    value * 2f64.powi(half) * 2f64.powi(exp - half)
}

/// Floor of `a / b` computed from the exact remainder, so an inexact
/// quotient such as `1 / 0.1` does not round up past the true floor.
fn float_floor_div(a: f64, b: f64) -> f64 {
    let m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 && ((b < 0.0) != (m < 0.0)) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }
    let mut floor = div.floor();
    if div - floor > 0.5 {
        floor += 1.0;
    }
    floor
}

fn float_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r == 0.0 {
        0.0_f64.copysign(b)
    } else if (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) => format_float(*v, f),
        }
    }
}

/// Shortest round-trip form; integral values keep a `.0`, very large or
/// very small magnitudes switch to `1e+16` / `1.5e-05` notation.
fn format_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let abs = v.abs();
    if abs >= 1e16 || (abs != 0.0 && abs < 1e-4) {
        let repr = format!("{:e}", v);
        let (mantissa, exp) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return write!(f, "{}e{}{:02}", mantissa, sign, exp.abs());
    }
    if v.fract() == 0.0 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: i64) -> Number {
        Number::from(i)
    }

    fn big(digits: &str) -> Number {
        Number::Int(digits.parse().unwrap())
    }

    #[test]
    fn test_int_arithmetic_stays_integral() {
        assert_eq!(n(2).add(n(2)), Ok(n(4)));
        assert_eq!(n(7).mul(n(6)), Ok(n(42)));
        assert_eq!(n(2).pow(n(10)), Ok(n(1024)));
        assert_eq!(n(0).pow(n(0)), Ok(n(1)));
        assert_eq!(n(-1).pow(n(1_000_001)), Ok(n(-1)));
        assert_eq!(n(-1).pow(n(1_000_000)), Ok(n(1)));
    }

    #[test]
    fn test_true_division_is_float() {
        assert_eq!(n(10).div(n(2)), Ok(Number::Float(5.0)));
        assert_eq!(n(7).div(n(2)), Ok(Number::Float(3.5)));
        assert_eq!(n(-1).div(n(3)), Ok(Number::Float(-1.0 / 3.0)));
    }

    #[test]
    fn test_wide_integer_division() {
        let a = n(10).pow(n(400)).unwrap();
        let b = n(10).pow(n(399)).unwrap();
        assert_eq!(a.clone().div(b), Ok(Number::Float(10.0)));
        assert!(matches!(a.div(n(3)), Err(CalcError::InvalidExpression(_))));
        let c = n(2).pow(n(80)).unwrap();
        assert_eq!(c.div(n(-4)), Ok(Number::Float(-(2f64.powi(78)))));
    }

    #[test]
    fn test_floor_division_rounds_down() {
        assert_eq!(n(7).floor_div(n(2)), Ok(n(3)));
        assert_eq!(n(-7).floor_div(n(2)), Ok(n(-4)));
        assert_eq!(n(7).floor_div(n(-2)), Ok(n(-4)));
        assert_eq!(
            Number::Float(7.5).floor_div(n(2)),
            Ok(Number::Float(3.0))
        );
    }

    #[test]
    fn test_float_floor_division_uses_exact_remainder() {
        assert_eq!(n(1).floor_div(Number::Float(0.1)), Ok(Number::Float(9.0)));
        assert_eq!(n(-1).floor_div(Number::Float(0.1)), Ok(Number::Float(-10.0)));
        assert_eq!(
            Number::Float(-0.5).floor_div(n(2)),
            Ok(Number::Float(-1.0))
        );
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(n(7).modulo(n(3)), Ok(n(1)));
        assert_eq!(n(-7).modulo(n(3)), Ok(n(2)));
        assert_eq!(n(7).modulo(n(-3)), Ok(n(-2)));
        assert_eq!(Number::Float(-1.5).modulo(n(1)), Ok(Number::Float(0.5)));
    }

    #[test]
    fn test_zero_float_remainder_takes_divisor_sign() {
        let r = Number::Float(-4.0).modulo(n(2)).unwrap();
        assert_eq!(r.to_string(), "0.0");
        let r = Number::Float(4.0).modulo(n(-2)).unwrap();
        assert_eq!(r.to_string(), "-0.0");
    }

    #[test]
    fn test_division_by_zero() {
        let ops: [fn(Number, Number) -> Result<Number, CalcError>; 3] =
            [Number::div, Number::floor_div, Number::modulo];
        for op in ops {
            assert_eq!(op(n(1), n(0)), Err(CalcError::DivisionByZero));
            assert_eq!(
                op(Number::Float(1.0), Number::Float(0.0)),
                Err(CalcError::DivisionByZero)
            );
        }
        assert_eq!(n(0).pow(n(-1)), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_integers_are_exact() {
        assert_eq!(n(i64::MAX).add(n(1)), Ok(big("9223372036854775808")));
        assert_eq!(n(i64::MIN).neg(), big("9223372036854775808"));
        assert_eq!(n(2).pow(n(64)), Ok(big("18446744073709551616")));
        assert_eq!(
            n(99_999_999_999).mul(n(99_999_999_999)),
            Ok(big("9999999999800000000001"))
        );
        let googol_cubed = n(10).pow(n(300)).unwrap().to_string();
        assert_eq!(googol_cubed.len(), 301);
    }

    #[test]
    fn test_oversized_integer_rejected() {
        let err = n(2).pow(n(MAX_INT_BITS as i64)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression(_)));
        let err = n(3).pow(n(i64::MAX)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression(_)));
    }

    #[test]
    fn test_infinite_result_rejected() {
        let err = Number::Float(10.0).pow(n(400)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression(_)));
        let wide = n(10).pow(n(400)).unwrap();
        let err = wide.mul(Number::Float(1.0)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression(_)));
    }

    #[test]
    fn test_negative_fractional_power_rejected() {
        let err = n(-8).pow(Number::Float(0.5)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidExpression(_)));
        assert_eq!(n(-2).pow(Number::Float(2.0)), Ok(Number::Float(4.0)));
        assert_eq!(n(2).pow(n(-1)), Ok(Number::Float(0.5)));
    }

    #[test]
    fn test_display() {
        assert_eq!(n(4).to_string(), "4");
        assert_eq!(n(-3).to_string(), "-3");
        assert_eq!(Number::Float(5.0).to_string(), "5.0");
        assert_eq!(Number::Float(3.5).to_string(), "3.5");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Number::Float(1e16).to_string(), "1e+16");
        assert_eq!(Number::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(-0.0).to_string(), "-0.0");
    }
}
