//! Numeric value shared by the menu calculator, the evaluator and statistics
//!
//! Integers stay integers until an operation needs a fraction, which keeps
//! `2 + 3 * 4` printing as `14` while a mean of whole numbers prints `3.0`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Wraps a float result, rejecting NaN and infinities.
    pub fn float(value: f64) -> Result<Self, CalcError> {
        if value.is_finite() {
            Ok(Number::Float(value))
        } else if value.is_nan() {
            Err(CalcError::Domain("result is not a number".to_string()))
        } else {
            Err(CalcError::Overflow)
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a.checked_add(b).map(Number::Int).ok_or(CalcError::Overflow),
            (a, b) => Number::float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn sub(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a.checked_sub(b).map(Number::Int).ok_or(CalcError::Overflow),
            (a, b) => Number::float(a.as_f64() - b.as_f64()),
        }
    }

    pub fn mul(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a.checked_mul(b).map(Number::Int).ok_or(CalcError::Overflow),
            (a, b) => Number::float(a.as_f64() * b.as_f64()),
        }
    }

    /// True division: the result is always a float.
    pub fn div(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        Number::float(self.as_f64() / rhs.as_f64())
    }

    /// Modulo taking the sign of the divisor.
    pub fn rem(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                let r = a.checked_rem(b).ok_or(CalcError::Overflow)?;
                if r != 0 && (r < 0) != (b < 0) {
                    Ok(Number::Int(r + b))
                } else {
                    Ok(Number::Int(r))
                }
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) {
                    Number::float(r + b)
                } else {
                    Number::float(r)
                }
            }
        }
    }

    pub fn pow(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                let exp = u32::try_from(exp).map_err(|_| CalcError::Overflow)?;
                base.checked_pow(exp).map(Number::Int).ok_or(CalcError::Overflow)
            }
            (a, b) => {
                if a.is_zero() && b.as_f64() < 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Number::float(a.as_f64().powf(b.as_f64()))
            }
        }
    }

    pub fn neg(self) -> Result<Number, CalcError> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(CalcError::Overflow),
            Number::Float(f) => Ok(Number::Float(-f)),
        }
    }
}

impl FromStr for Number {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(Number::Int(i));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Number::Float(f)),
            _ => Err(CalcError::InvalidNumber(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}
