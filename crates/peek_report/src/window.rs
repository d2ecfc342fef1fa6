//! Display windows anchored on trigger events.

use std::fmt;

use peek_trace::Tick;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// An inclusive range of ticks `[start, stop]` to display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// First tick shown.
    pub start: Tick,
    /// Last tick shown.
    pub stop: Tick,
}

impl Window {
    /// Creates a window, rejecting `start > stop`.
    pub fn new(start: Tick, stop: Tick) -> Result<Self, ReportError> {
        if start > stop {
            return Err(ReportError::InvalidWindow { start, stop });
        }
        Ok(Self { start, stop })
    }

    /// The window from `anchor - before` to `anchor + after`, clamped to the
    /// tick range.
    pub fn around(anchor: Tick, before: Tick, after: Tick) -> Self {
        Self {
            start: anchor.saturating_sub(before),
            stop: anchor.saturating_add(after),
        }
    }

    /// The window around the `index`-th trigger time.
    pub fn from_triggers(
        times: &[Tick],
        index: usize,
        before: Tick,
        after: Tick,
    ) -> Result<Self, ReportError> {
        let anchor = times.get(index).ok_or(ReportError::NoSuchTrigger {
            index,
            count: times.len(),
        })?;
        Ok(Self::around(*anchor, before, after))
    }

    /// Returns `true` if `tick` lies inside the window.
    pub fn contains(&self, tick: Tick) -> bool {
        (self.start..=self.stop).contains(&tick)
    }

    /// Number of ticks in the window.
    pub fn len(&self) -> u64 {
        (self.stop - self.start).saturating_add(1)
    }

    /// Always `false`: a window holds at least one tick.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates every tick in the window.
    pub fn ticks(&self) -> impl Iterator<Item = Tick> {
        self.start..=self.stop
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}
