//! Parsing and validation of `peek.toml` project settings.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`PeekConfig`]: named trigger expressions, the trigger
//! horizon and mode, and report defaults. [`resolve_trigger`] and friends
//! merge it with command-line choices.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_file, load_config_from_str, load_config_or_default,
    CONFIG_FILE_NAME,
};
pub use resolve::{resolve_horizon, resolve_mode, resolve_trigger, ResolvedTrigger};
pub use types::*;
