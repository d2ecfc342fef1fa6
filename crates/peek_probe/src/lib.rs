//! Observers that record simulation signals into traces.
//!
//! A [`Peeker`] owns exactly one [`Trace`](peek_trace::Trace) and appends a
//! sample each time the observed signal changes. Peekers stand in for their
//! trace in every operator through [`HasTrace`](peek_trace::HasTrace).
//! A [`PeekerGroup`] is a caller-owned registry of peekers looked up by
//! hierarchical name, and [`vcd::load_vcd`] fills one from a Value Change
//! Dump file.
//!
//! # Modules
//!
//! - `error`: Lookup errors
//! - `time`: VCD timescales
//! - `peeker`: The single-signal observer
//! - `group`: Named collection of peekers
//! - `vcd`: VCD file source

#![warn(missing_docs)]

pub mod error;
pub mod group;
pub mod peeker;
pub mod time;
pub mod vcd;

pub use error::ProbeError;
pub use group::PeekerGroup;
pub use peeker::Peeker;
pub use time::{TimeUnit, Timescale};
pub use vcd::{load_vcd, load_vcd_file, LoadedVcd, VcdLoadError, VcdSignalDef};
