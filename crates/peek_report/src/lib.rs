//! Rendering of traces for people and viewers.
//!
//! A [`Window`] selects the ticks to show, usually anchored on one trigger
//! occurrence. [`write_table`] prints the values of a set of traces at every
//! change inside the window, [`WaveJson`] exports the same window for
//! WaveDrom-style viewers, and [`write_triggers`] lists trigger ticks.
//!
//! # Modules
//!
//! - `error`: Report errors
//! - `window`: Display windows
//! - `table`: Plain-text value tables
//! - `wavejson`: WaveJSON export
//! - `triggers`: Trigger listings

#![warn(missing_docs)]

pub mod error;
pub mod table;
pub mod triggers;
pub mod wavejson;
pub mod window;

pub use error::ReportError;
pub use table::{render_table, row_ticks, write_table};
pub use triggers::{write_triggers, ListingFormat};
pub use wavejson::{WaveHead, WaveJson, WaveLane, MAX_WAVE_TICKS};
pub use window::Window;
