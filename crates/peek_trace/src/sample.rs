//! Time-stamped value changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An integer unit of simulated time.
pub type Tick = u64;

/// A recorded `(time, value)` pair marking a value change.
///
/// Traces keep samples sorted by `time`; there is no ordering on the samples
/// themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Tick at which the value took effect.
    pub time: Tick,
    /// The value held from `time` until the next sample.
    pub value: Value,
}

impl Sample {
    /// Creates a sample.
    pub fn new(time: Tick, value: impl Into<Value>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}

impl<V: Into<Value>> From<(Tick, V)> for Sample {
    fn from((time, value): (Tick, V)) -> Self {
        Self::new(time, value)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.time, self.value)
    }
}
