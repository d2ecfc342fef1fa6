//! Numeric values carried by trace samples.
//!
//! Signals observed from a simulation are integers of arbitrary bit-width,
//! stored as [`BigInt`]. Real values appear when a trace is divided, raised to
//! a negative power, or combined with a float scalar. Integers and reals
//! compare numerically, so `Int(1) == Real(1.0)`.

use std::cmp::Ordering;
use std::fmt;

use num::{BigInt, FromPrimitive, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// A sample value: an arbitrary-width integer or a real number.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// Integer value of arbitrary width.
    Int(BigInt),
    /// Real (floating-point) value.
    Real(f64),
}

impl Value {
    /// The integer zero.
    pub fn zero() -> Self {
        Value::Int(BigInt::zero())
    }

    /// Returns `true` for integer or real zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => i.is_zero(),
            Value::Real(r) => *r == 0.0,
        }
    }

    /// Returns `true` if the value reads as logically true (non-zero).
    pub fn is_truthy(&self) -> bool {
        !self.is_zero()
    }

    /// Returns `true` if this is a real value.
    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    /// Returns the integer payload, if any.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            Value::Real(_) => None,
        }
    }

    /// Converts to `f64`, saturating to infinity for integers too large to represent.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Int(i) => i.to_f64().unwrap_or(if i.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            Value::Real(r) => *r,
        }
    }

    /// Converts to `u64` if the value is a non-negative integer that fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.as_int().and_then(ToPrimitive::to_u64)
    }

    /// Converts to `i64` if the value is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(BigInt::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(BigInt::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(BigInt::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(BigInt::from(u8::from(v)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

/// Exact ordering of an integer against a real.
fn cmp_int_real(i: &BigInt, r: f64) -> Option<Ordering> {
    if r.is_nan() {
        return None;
    }
    if r.is_infinite() {
        return Some(if r > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        });
    }
    let floor = BigInt::from_f64(r.floor())?;
    Some(match i.cmp(&floor) {
        Ordering::Equal if r.fract() != 0.0 => Ordering::Less,
        ord => ord,
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Real(b)) => cmp_int_real(a, *b),
            (Value::Real(a), Value::Int(b)) => cmp_int_real(b, *a).map(Ordering::reverse),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
        }
    }
}
