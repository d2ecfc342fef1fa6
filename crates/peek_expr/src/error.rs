//! Error types for trigger expressions.
//!
//! Every variant carries the byte offset in the expression source where the
//! problem was detected.

use peek_probe::ProbeError;
use peek_trace::TraceError;

/// Errors from lexing, parsing or evaluating a trigger expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    /// A character sequence that is not a token.
    #[error("at offset {offset}: {message}")]
    Lex {
        /// Byte offset of the offending character.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// Tokens that do not form an expression.
    #[error("at offset {offset}: {message}")]
    Parse {
        /// Byte offset of the offending token.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// A signal name that does not resolve.
    #[error("at offset {offset}: {source}")]
    Signal {
        /// Byte offset of the name.
        offset: usize,
        /// The lookup failure.
        source: ProbeError,
    },

    /// An operator failed while combining traces.
    #[error("at offset {offset}: {source}")]
    Eval {
        /// Byte offset of the failing sub-expression.
        offset: usize,
        /// The operator failure.
        source: TraceError,
    },
}

impl ExprError {
    /// Byte offset in the expression source.
    pub fn offset(&self) -> usize {
        match self {
            ExprError::Lex { offset, .. }
            | ExprError::Parse { offset, .. }
            | ExprError::Signal { offset, .. }
            | ExprError::Eval { offset, .. } => *offset,
        }
    }
}
