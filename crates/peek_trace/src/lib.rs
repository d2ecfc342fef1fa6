//! Run-length encoded signal traces and the operator algebra built on them.
//!
//! A [`Trace`] records the history of one signal as the list of samples at
//! which its value changed. Traces combine through a single operator table
//! ([`combine`], [`apply_unary`]) into new derived traces, can be shifted in
//! time with [`Trace::delay`], and reduce to the ticks at which they read
//! non-zero with [`Trace::trig_times`].
//!
//! # Usage
//!
//! ```
//! use peek_trace::{BinaryOp, Trace};
//!
//! let clk = Trace::from_samples("clk", 1, [(0, 0), (3, 1), (6, 0), (9, 1)]).unwrap();
//! let rising = clk.apply(BinaryOp::BitAnd, &clk.delay(1).unwrap().invert().unwrap()).unwrap();
//! assert_eq!(rising.trig_times(12), vec![3, 9]);
//! ```
//!
//! # Modules
//!
//! - `error`: Trace algebra error types
//! - `value`: Numeric sample values (arbitrary-width integers and reals)
//! - `sample`: Time-stamped value changes
//! - `trace`: The RLE trace container, delay and trigger queries
//! - `ops`: Operator table and the merge shared by every operator

#![warn(missing_docs)]

pub mod error;
pub mod ops;
pub mod sample;
pub mod trace;
pub mod value;

pub use error::TraceError;
pub use ops::{apply_unary, combine, BinaryOp, Operand, UnaryOp};
pub use sample::{Sample, Tick};
pub use trace::{HasTrace, Trace};
pub use value::Value;
