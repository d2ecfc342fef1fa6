//! WaveJSON export.
//!
//! Produces the document format read by WaveDrom-style viewers:
//!
//! ```json
//! { "signal": [ { "name": "clk", "wave": "01.0" },
//!               { "name": "data", "wave": "=.=.", "data": ["3", "7"] } ],
//!   "head": { "text": "posedge(clk)", "tick": 4 } }
//! ```
//!
//! Each tick of the window is one wave character. 1-bit traces draw `0`/`1`,
//! everything else draws `=` with the value in `data`, and `.` repeats the
//! previous tick's value.

use std::io::Write;

use peek_trace::{Tick, Trace, Value};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::window::Window;

/// Longest window rendered one character per tick.
pub const MAX_WAVE_TICKS: u64 = 100_000;

/// A WaveJSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveJson {
    /// One lane per trace.
    pub signal: Vec<WaveLane>,
    /// Title and first tick label.
    pub head: WaveHead,
}

/// One trace's lane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveLane {
    /// Lane label.
    pub name: String,
    /// One character per tick.
    pub wave: String,
    /// Labels for the `=` characters, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
}

/// Document header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveHead {
    /// Title shown above the lanes.
    pub text: String,
    /// Tick number of the first wave character.
    pub tick: Tick,
}

impl WaveJson {
    /// Builds the document for `traces` over `window`.
    pub fn build(traces: &[&Trace], window: Window, title: &str) -> Result<Self, ReportError> {
        if window.len() > MAX_WAVE_TICKS {
            return Err(ReportError::WindowTooLong {
                ticks: window.len(),
                limit: MAX_WAVE_TICKS,
            });
        }
        let signal = traces.iter().map(|t| lane(t, window)).collect();
        Ok(Self {
            signal,
            head: WaveHead {
                text: title.to_string(),
                tick: window.start,
            },
        })
    }

    /// Writes the document as pretty-printed JSON.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

fn lane(trace: &Trace, window: Window) -> WaveLane {
    let one_bit = trace.width() == 1;
    let mut wave = String::with_capacity(window.len() as usize);
    let mut data = Vec::new();
    let mut prev: Option<&Value> = None;

    for tick in window.ticks() {
        let value = trace.value_at(tick);
        if prev == Some(value) {
            wave.push('.');
            continue;
        }
        match value.to_u64() {
            Some(0) if one_bit => wave.push('0'),
            Some(1) if one_bit => wave.push('1'),
            _ => {
                wave.push('=');
                data.push(value.to_string());
            }
        }
        prev = Some(value);
    }

    log::trace!("lane {}: {} characters", trace.name(), wave.len());
    WaveLane {
        name: trace.name().to_string(),
        wave,
        data,
    }
}
