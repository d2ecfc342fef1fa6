//! Error types for `peek.toml` loading and validation.

use std::path::PathBuf;

/// Errors raised while reading or checking a `peek.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// The underlying failure.
        source: std::io::Error,
    },

    /// The content is not valid TOML for this schema.
    #[error("invalid peek.toml: {0}")]
    Parse(String),

    /// A named trigger maps to a blank expression.
    #[error("trigger '{0}' has an empty expression")]
    EmptyTrigger(String),

    /// A setting parsed but holds an unusable value.
    #[error("{field} {reason}")]
    Invalid {
        /// Dotted key of the setting, e.g. `trigger.horizon`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
