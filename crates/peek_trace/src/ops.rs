//! Operator table for the trace algebra.
//!
//! Every operator goes through [`combine`] (binary) or [`apply_unary`]: the
//! union-of-change-times merge is written once here and each operator only
//! contributes its value-level function ([`BinaryOp::eval`], [`UnaryOp::eval`]).
//!
//! | Class      | Operators |
//! |------------|-----------|
//! | arithmetic | `+ - * / // % **` |
//! | shift      | `<< >>` |
//! | bitwise    | `& \| ^` |
//! | comparison | `== != < > <= >=` |
//! | unary      | `~ - ! abs` |

use std::fmt;

use num::{BigInt, Integer, One, Signed, ToPrimitive, Zero};

use crate::error::TraceError;
use crate::sample::Tick;
use crate::trace::{HasTrace, Trace};
use crate::value::Value;

/// Largest integer result, in bits, that `<<` and `**` will build.
pub const MAX_RESULT_BITS: u64 = 1 << 20;

/// Binary operators of the trace algebra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (true division, real-valued)
    Div,
    /// `//` (floor division)
    FloorDiv,
    /// `%` (floor modulo, sign of the divisor)
    Mod,
    /// `**`
    Pow,
    /// `<<`
    Shl,
    /// `>>` (arithmetic)
    Shr,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

/// Unary operators of the trace algebra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `~` (bitwise invert, `-x - 1`)
    Invert,
    /// `-`
    Neg,
    /// `!` (logical not, 0/1)
    Not,
    /// `abs`
    Abs,
}

/// One side of a binary operator: a trace or a numeric scalar.
#[derive(Clone, Debug)]
pub enum Operand<'a> {
    /// A borrowed trace.
    Trace(&'a Trace),
    /// A constant.
    Scalar(Value),
}

impl<'a, T: HasTrace + ?Sized> From<&'a T> for Operand<'a> {
    fn from(t: &'a T) -> Self {
        Operand::Trace(t.trace())
    }
}

impl From<Value> for Operand<'_> {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

impl From<BigInt> for Operand<'_> {
    fn from(v: BigInt) -> Self {
        Operand::Scalar(Value::Int(v))
    }
}

impl From<i64> for Operand<'_> {
    fn from(v: i64) -> Self {
        Operand::Scalar(v.into())
    }
}

impl From<i32> for Operand<'_> {
    fn from(v: i32) -> Self {
        Operand::Scalar(v.into())
    }
}

impl From<u64> for Operand<'_> {
    fn from(v: u64) -> Self {
        Operand::Scalar(v.into())
    }
}

impl From<f64> for Operand<'_> {
    fn from(v: f64) -> Self {
        Operand::Scalar(v.into())
    }
}

impl From<bool> for Operand<'_> {
    fn from(v: bool) -> Self {
        Operand::Scalar(v.into())
    }
}

impl BinaryOp {
    /// The operator's symbol as written in expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
        }
    }

    /// Returns `true` for operators whose result is 0/1.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge
        )
    }

    fn is_division(self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod)
    }

    /// Evaluates the operator on two values.
    pub fn eval(self, lhs: &Value, rhs: &Value) -> Result<Value, TraceError> {
        let op = self.symbol();
        if self.is_division() && rhs.is_zero() {
            return Err(TraceError::DivisionByZero);
        }
        let (a, b) = match (self, lhs, rhs) {
            (BinaryOp::Eq, ..) => return Ok((lhs == rhs).into()),
            (BinaryOp::Ne, ..) => return Ok((lhs != rhs).into()),
            (BinaryOp::Lt, ..) => return Ok((lhs < rhs).into()),
            (BinaryOp::Gt, ..) => return Ok((lhs > rhs).into()),
            (BinaryOp::Le, ..) => return Ok((lhs <= rhs).into()),
            (BinaryOp::Ge, ..) => return Ok((lhs >= rhs).into()),
            (BinaryOp::Div, ..) => return Ok(Value::Real(lhs.to_f64() / rhs.to_f64())),
            (_, Value::Int(a), Value::Int(b)) => (a, b),
            _ => return real_op(self, lhs.to_f64(), rhs.to_f64()),
        };
        Ok(match self {
            BinaryOp::Add => Value::Int(a + b),
            BinaryOp::Sub => Value::Int(a - b),
            BinaryOp::Mul => Value::Int(a * b),
            BinaryOp::FloorDiv => Value::Int(a.div_floor(b)),
            BinaryOp::Mod => Value::Int(a.mod_floor(b)),
            BinaryOp::Pow => {
                if b.is_negative() {
                    Value::Real(lhs.to_f64().powf(rhs.to_f64()))
                } else {
                    Value::Int(int_pow(a, b)?)
                }
            }
            BinaryOp::Shl => {
                let count = shift_count(op, b)?;
                if a.is_zero() {
                    Value::Int(BigInt::zero())
                } else if count.saturating_add(a.bits()) > MAX_RESULT_BITS {
                    return Err(TraceError::InvalidOperand {
                        op,
                        reason: format!("result of {a} << {b} exceeds {MAX_RESULT_BITS} bits"),
                    });
                } else {
                    Value::Int(a << count)
                }
            }
            BinaryOp::Shr => {
                let count = shift_count(op, b)?;
                if count >= a.bits() {
                    // everything shifted out; floor keeps the sign
                    Value::Int(if a.is_negative() { -BigInt::one() } else { BigInt::zero() })
                } else {
                    Value::Int(a >> count)
                }
            }
            BinaryOp::BitAnd => Value::Int(a & b),
            BinaryOp::BitOr => Value::Int(a | b),
            BinaryOp::BitXor => Value::Int(a ^ b),
            _ => return real_op(self, lhs.to_f64(), rhs.to_f64()),
        })
    }
}

/// Non-negative shift count, saturated to `u64::MAX`.
fn shift_count(op: &'static str, count: &BigInt) -> Result<u64, TraceError> {
    if count.is_negative() {
        return Err(TraceError::InvalidOperand {
            op,
            reason: "negative shift count".into(),
        });
    }
    Ok(count.to_u64().unwrap_or(u64::MAX))
}

/// `base ** exp` for a non-negative `exp`, bounded by [`MAX_RESULT_BITS`].
fn int_pow(base: &BigInt, exp: &BigInt) -> Result<BigInt, TraceError> {
    if exp.is_zero() {
        return Ok(BigInt::one());
    }
    if base.is_zero() || base.is_one() {
        return Ok(base.clone());
    }
    if base.abs().is_one() {
        return Ok(if exp.is_odd() { -BigInt::one() } else { BigInt::one() });
    }
    exp.to_u32()
        .filter(|&e| u64::from(e).saturating_mul(base.bits()) <= MAX_RESULT_BITS)
        .map(|e| base.pow(e))
        .ok_or_else(|| TraceError::InvalidOperand {
            op: "**",
            reason: format!("result of {base} ** {exp} exceeds {MAX_RESULT_BITS} bits"),
        })
}

/// Evaluates an arithmetic operator once either side is real.
fn real_op(op: BinaryOp, a: f64, b: f64) -> Result<Value, TraceError> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Mod => a - b * (a / b).floor(),
        BinaryOp::Pow => a.powf(b),
        _ => {
            return Err(TraceError::TypeMismatch {
                op: op.symbol(),
                reason: "operator requires integer operands".into(),
            })
        }
    };
    Ok(Value::Real(value))
}

impl UnaryOp {
    /// The operator's symbol as written in expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Invert => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Abs => "abs",
        }
    }

    /// Evaluates the operator on a value.
    pub fn eval(self, value: &Value) -> Result<Value, TraceError> {
        Ok(match (self, value) {
            (UnaryOp::Invert, Value::Int(i)) => Value::Int(!i),
            (UnaryOp::Invert, Value::Real(_)) => {
                return Err(TraceError::TypeMismatch {
                    op: self.symbol(),
                    reason: "cannot invert a real value".into(),
                })
            }
            (UnaryOp::Neg, Value::Int(i)) => Value::Int(-i),
            (UnaryOp::Neg, Value::Real(r)) => Value::Real(-r),
            (UnaryOp::Abs, Value::Int(i)) => Value::Int(i.abs()),
            (UnaryOp::Abs, Value::Real(r)) => Value::Real(r.abs()),
            (UnaryOp::Not, v) => Value::from(v.is_zero()),
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Applies a binary operator to two operands, producing a new trace.
///
/// With two traces the result has a sample at every change time of either
/// operand from the later of the two first-sample times onward. With a trace
/// and a scalar it has a sample at every change time of the trace. Repeated
/// result values are compacted. Two scalars are a [`TraceError::TypeMismatch`].
pub fn combine<'a>(
    op: BinaryOp,
    lhs: impl Into<Operand<'a>>,
    rhs: impl Into<Operand<'a>>,
) -> Result<Trace, TraceError> {
    let (lhs, rhs) = (lhs.into(), rhs.into());
    let result = match (&lhs, &rhs) {
        (Operand::Trace(l), Operand::Trace(r)) => merge(op, l, r)?,
        (Operand::Trace(l), Operand::Scalar(s)) => {
            if op.is_division() && s.is_zero() {
                return Err(TraceError::DivisionByZero);
            }
            let name = format!("({} {op} {s})", l.name());
            map_samples(l, name, result_width(op, l.width(), 0), |v| op.eval(v, s))?
        }
        (Operand::Scalar(s), Operand::Trace(r)) => {
            let name = format!("({s} {op} {})", r.name());
            map_samples(r, name, result_width(op, r.width(), 0), |v| op.eval(s, v))?
        }
        (Operand::Scalar(_), Operand::Scalar(_)) => {
            return Err(TraceError::TypeMismatch {
                op: op.symbol(),
                reason: "at least one operand must be a trace".into(),
            })
        }
    };
    log::trace!("{} -> {} samples", result.name(), result.len());
    Ok(result)
}

/// Applies a unary operator to a trace-like operand.
pub fn apply_unary<T: HasTrace + ?Sized>(op: UnaryOp, operand: &T) -> Result<Trace, TraceError> {
    let src = operand.trace();
    let name = match op {
        UnaryOp::Abs => format!("abs({})", src.name()),
        _ => format!("{op}{}", src.name()),
    };
    let width = if op == UnaryOp::Not { 1 } else { src.width() };
    map_samples(src, name, width, |v| op.eval(v))
}

fn result_width(op: BinaryOp, lw: u32, rw: u32) -> u32 {
    if op.is_comparison() {
        1
    } else {
        lw.max(rw)
    }
}

fn map_samples<F>(src: &Trace, name: String, width: u32, mut f: F) -> Result<Trace, TraceError>
where
    F: FnMut(&Value) -> Result<Value, TraceError>,
{
    let mut out = Trace::new(name, width);
    for sample in src.samples() {
        out.push(sample.time, f(&sample.value)?)?;
    }
    Ok(out)
}

fn merge(op: BinaryOp, l: &Trace, r: &Trace) -> Result<Trace, TraceError> {
    let name = format!("({} {op} {})", l.name(), r.name());
    let mut out = Trace::new(name, result_width(op, l.width(), r.width()));
    let (Some(lf), Some(rf)) = (l.first_time(), r.first_time()) else {
        return Ok(out);
    };
    let start = lf.max(rf);
    for time in change_times(l, r, start) {
        let value = op.eval(l.value_at(time), r.value_at(time))?;
        out.push(time, value)?;
    }
    Ok(out)
}

/// Sorted, de-duplicated change times of both traces at or after `start`.
fn change_times(l: &Trace, r: &Trace, start: Tick) -> Vec<Tick> {
    let ls = l.samples();
    let rs = r.samples();
    let mut times = Vec::with_capacity(ls.len() + rs.len());
    let (mut i, mut j) = (
        ls.partition_point(|s| s.time < start),
        rs.partition_point(|s| s.time < start),
    );
    while i < ls.len() || j < rs.len() {
        let next = match (ls.get(i), rs.get(j)) {
            (Some(a), Some(b)) if a.time == b.time => {
                i += 1;
                j += 1;
                a.time
            }
            (Some(a), Some(b)) if a.time < b.time => {
                i += 1;
                a.time
            }
            (Some(_), Some(b)) => {
                j += 1;
                b.time
            }
            (Some(a), None) => {
                i += 1;
                a.time
            }
            (None, Some(b)) => {
                j += 1;
                b.time
            }
            (None, None) => break,
        };
        times.push(next);
    }
    times
}
