//! Error types for peeker lookup and observation.

use peek_trace::TraceError;

/// Errors raised by peekers and peeker groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// No peeker matches the requested name.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// A short name matches more than one hierarchical signal.
    #[error("signal name '{name}' is ambiguous (matches {})", candidates.join(", "))]
    AmbiguousSignal {
        /// The requested name.
        name: String,
        /// Full names of every matching peeker.
        candidates: Vec<String>,
    },

    /// Recording a sample violated a trace invariant.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
