//! Evaluation of trigger expressions against recorded signals.
//!
//! Signal references resolve through a [`SignalSource`]. Sub-expressions with
//! no signal in them fold to constants; everything else becomes a derived
//! [`Trace`] built through the operator table in `peek_trace`.

use std::borrow::Cow;

use peek_probe::{PeekerGroup, ProbeError};
use peek_trace::{apply_unary, combine, Tick, Trace, TraceError, Value};

use crate::ast::{Edge, Expr};
use crate::error::ExprError;
use crate::parser::parse;

/// Resolves signal names to traces.
pub trait SignalSource {
    /// Returns the trace recorded for `name`.
    fn signal(&self, name: &str) -> Result<&Trace, ProbeError>;
}

impl SignalSource for PeekerGroup {
    fn signal(&self, name: &str) -> Result<&Trace, ProbeError> {
        self.trace(name)
    }
}

/// Result of evaluating a sub-expression.
#[derive(Clone, Debug)]
pub enum Evaluated<'a> {
    /// A trace, borrowed from the source or freshly derived.
    Trace(Cow<'a, Trace>),
    /// A folded constant.
    Scalar(Value),
}

/// Evaluates `expr` to a trace.
///
/// # Errors
///
/// Returns [`ExprError::Signal`] for names the source cannot resolve and
/// [`ExprError::Eval`] for operator failures. An expression that folds to a
/// constant is a [`TraceError::TypeMismatch`], since a trigger needs a trace.
pub fn evaluate<S: SignalSource + ?Sized>(expr: &Expr, source: &S) -> Result<Trace, ExprError> {
    match evaluate_node(expr, source)? {
        Evaluated::Trace(trace) => Ok(trace.into_owned()),
        Evaluated::Scalar(value) => Err(ExprError::Eval {
            offset: expr.span().start,
            source: TraceError::TypeMismatch {
                op: "trigger",
                reason: format!("expression is the constant {value}, not a signal"),
            },
        }),
    }
}

/// Parses and evaluates `text` to a trace.
///
/// # Errors
///
/// See [`parse`] and [`evaluate`].
pub fn eval_str<S: SignalSource + ?Sized>(text: &str, source: &S) -> Result<Trace, ExprError> {
    let expr = parse(text)?;
    let trace = evaluate(&expr, source)?;
    log::debug!("evaluated `{}` -> {} samples", text.trim(), trace.len());
    Ok(trace)
}

/// Evaluates a sub-expression without requiring a trace result.
///
/// # Errors
///
/// Same as [`evaluate`], except constants are returned as
/// [`Evaluated::Scalar`].
pub fn evaluate_node<'a, S: SignalSource + ?Sized>(
    expr: &Expr,
    source: &'a S,
) -> Result<Evaluated<'a>, ExprError> {
    let offset = expr.span().start;
    let at = |source: TraceError| ExprError::Eval { offset, source };

    Ok(match expr {
        Expr::Signal { name, .. } => {
            let trace = source
                .signal(name)
                .map_err(|source| ExprError::Signal { offset, source })?;
            Evaluated::Trace(Cow::Borrowed(trace))
        }
        Expr::Int { value, .. } => Evaluated::Scalar(Value::Int(value.clone())),
        Expr::Real { value, .. } => Evaluated::Scalar(Value::Real(*value)),
        Expr::Unary { op, operand, .. } => match evaluate_node(operand, source)? {
            Evaluated::Scalar(v) => Evaluated::Scalar(op.eval(&v).map_err(at)?),
            Evaluated::Trace(t) => Evaluated::Trace(Cow::Owned(apply_unary(*op, &*t).map_err(at)?)),
        },
        Expr::Binary {
            left, op, right, ..
        } => {
            let lhs = evaluate_node(left, source)?;
            let rhs = evaluate_node(right, source)?;
            let result = match (lhs, rhs) {
                (Evaluated::Scalar(l), Evaluated::Scalar(r)) => {
                    return Ok(Evaluated::Scalar(op.eval(&l, &r).map_err(at)?));
                }
                (Evaluated::Trace(l), Evaluated::Trace(r)) => combine(*op, &*l, &*r),
                (Evaluated::Trace(l), Evaluated::Scalar(r)) => combine(*op, &*l, r),
                (Evaluated::Scalar(l), Evaluated::Trace(r)) => combine(*op, l, &*r),
            };
            Evaluated::Trace(Cow::Owned(result.map_err(at)?))
        }
        Expr::Delay { operand, ticks, .. } => {
            let ticks = delay_ticks(ticks, source)?;
            match evaluate_node(operand, source)? {
                Evaluated::Trace(t) => Evaluated::Trace(Cow::Owned(t.delay(ticks).map_err(at)?)),
                Evaluated::Scalar(v) => {
                    return Err(at(TraceError::TypeMismatch {
                        op: "delay",
                        reason: format!("cannot delay the constant {v}"),
                    }))
                }
            }
        }
        Expr::Edge { edge, operand, .. } => {
            let op = match edge {
                Edge::Pos => "posedge",
                Edge::Neg => "negedge",
            };
            match evaluate_node(operand, source)? {
                Evaluated::Trace(t) => {
                    let derived = match edge {
                        Edge::Pos => t.posedge(),
                        Edge::Neg => t.negedge(),
                    };
                    Evaluated::Trace(Cow::Owned(derived.map_err(at)?))
                }
                Evaluated::Scalar(v) => {
                    return Err(at(TraceError::TypeMismatch {
                        op,
                        reason: format!("the constant {v} has no edges"),
                    }))
                }
            }
        }
    })
}

/// Folds a delay amount to a tick count.
fn delay_ticks<S: SignalSource + ?Sized>(ticks: &Expr, source: &S) -> Result<Tick, ExprError> {
    let offset = ticks.span().start;
    let value = match evaluate_node(ticks, source)? {
        Evaluated::Scalar(value) => value,
        Evaluated::Trace(_) => {
            return Err(ExprError::Eval {
                offset,
                source: TraceError::TypeMismatch {
                    op: "delay",
                    reason: "tick count must be a constant".into(),
                },
            })
        }
    };
    value.to_u64().ok_or_else(|| ExprError::Eval {
        offset,
        source: TraceError::InvalidOperand {
            op: "delay",
            reason: format!("tick count {value} is not a non-negative integer"),
        },
    })
}
