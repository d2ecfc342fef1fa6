//! Abstract syntax tree for trigger expressions.

use std::fmt;

use num::BigInt;
use peek_trace::{BinaryOp, UnaryOp};

use crate::token::Span;

/// Edge detector applied by `posedge(e)` / `negedge(e)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Zero to non-zero.
    Pos,
    /// Non-zero to zero.
    Neg,
}

/// A parsed trigger expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A hierarchical signal name, e.g. `top.cpu.clk`.
    Signal {
        /// Dotted name as written.
        name: String,
        /// Source location.
        span: Span,
    },
    /// Integer literal.
    Int {
        /// Literal value.
        value: BigInt,
        /// Source location.
        span: Span,
    },
    /// Real literal.
    Real {
        /// Literal value.
        value: f64,
        /// Source location.
        span: Span,
    },
    /// Prefix operator or `abs(e)`.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// Binary operator.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// `e.delay(n)` or `delay(e, n)`.
    Delay {
        /// The delayed expression.
        operand: Box<Expr>,
        /// The tick count expression; must fold to a non-negative integer.
        ticks: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// `posedge(e)` or `negedge(e)`.
    Edge {
        /// Which transition to detect.
        edge: Edge,
        /// The observed expression.
        operand: Box<Expr>,
        /// Source location.
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Signal { span, .. }
            | Expr::Int { span, .. }
            | Expr::Real { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Delay { span, .. }
            | Expr::Edge { span, .. } => *span,
        }
    }

    /// Every signal name referenced by the expression, in source order.
    pub fn signals(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_signals(&mut out);
        out
    }

    fn collect_signals<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Signal { name, .. } => out.push(name),
            Expr::Int { .. } | Expr::Real { .. } => {}
            Expr::Unary { operand, .. } | Expr::Edge { operand, .. } => {
                operand.collect_signals(out)
            }
            Expr::Binary { left, right, .. } => {
                left.collect_signals(out);
                right.collect_signals(out);
            }
            Expr::Delay { operand, ticks, .. } => {
                operand.collect_signals(out);
                ticks.collect_signals(out);
            }
        }
    }
}

/// Fully parenthesized rendering, used in diagnostics and tests.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Signal { name, .. } => f.write_str(name),
            Expr::Int { value, .. } => write!(f, "{value}"),
            Expr::Real { value, .. } => write!(f, "{value:?}"),
            Expr::Unary {
                op: UnaryOp::Abs,
                operand,
                ..
            } => write!(f, "abs({operand})"),
            Expr::Unary { op, operand, .. } => write!(f, "{}{operand}", op.symbol()),
            Expr::Binary {
                left, op, right, ..
            } => write!(f, "({left} {} {right})", op.symbol()),
            Expr::Delay { operand, ticks, .. } => write!(f, "{operand}.delay({ticks})"),
            Expr::Edge {
                edge: Edge::Pos,
                operand,
                ..
            } => write!(f, "posedge({operand})"),
            Expr::Edge {
                edge: Edge::Neg,
                operand,
                ..
            } => write!(f, "negedge({operand})"),
        }
    }
}
