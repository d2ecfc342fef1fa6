//! Error types for report rendering.

use peek_trace::Tick;

/// Errors raised while building or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A window whose start lies after its stop.
    #[error("invalid window: start {start} is after stop {stop}")]
    InvalidWindow {
        /// Requested first tick.
        start: Tick,
        /// Requested last tick.
        stop: Tick,
    },

    /// The requested trigger occurrence does not exist.
    #[error("trigger #{index} requested but only {count} trigger(s) fired")]
    NoSuchTrigger {
        /// Zero-based occurrence requested.
        index: usize,
        /// Number of available occurrences.
        count: usize,
    },

    /// A window too long to render one column per tick.
    #[error("window of {ticks} ticks exceeds the limit of {limit} for per-tick output")]
    WindowTooLong {
        /// Ticks in the window.
        ticks: u64,
        /// The rendering limit.
        limit: u64,
    },

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the report to JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
