//! The run-length encoded trace container.
//!
//! A [`Trace`] stores only the samples at which its value changes. Appends
//! must be strictly increasing in time; appending the value already held is a
//! no-op. Lookups binary-search the sample list, and [`Trace::trig_times`]
//! expands non-zero runs back into the literal set of ticks.

use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::ops::{apply_unary, combine, BinaryOp, Operand, UnaryOp};
use crate::sample::{Sample, Tick};
use crate::value::Value;

/// Capability of anything that can stand in for a trace in an operator.
///
/// Implemented by [`Trace`] itself and by observers that own a trace, so that
/// operators accept either interchangeably.
pub trait HasTrace {
    /// Returns the trace backing this object.
    fn trace(&self) -> &Trace;
}

/// Ordered value-change history of one signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TraceData")]
pub struct Trace {
    name: String,
    width: u32,
    default: Value,
    samples: Vec<Sample>,
}

/// Serialized form of a [`Trace`], checked on the way in.
#[derive(Deserialize)]
struct TraceData {
    name: String,
    width: u32,
    default: Value,
    samples: Vec<Sample>,
}

impl TryFrom<TraceData> for Trace {
    type Error = TraceError;

    fn try_from(data: TraceData) -> Result<Self, Self::Error> {
        Ok(Trace::from_samples(data.name, data.width, data.samples)?.with_default(data.default))
    }
}

impl HasTrace for Trace {
    fn trace(&self) -> &Trace {
        self
    }
}

impl Trace {
    /// Creates an empty trace.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            default: Value::zero(),
            samples: Vec::new(),
        }
    }

    /// Creates a trace pre-seeded with samples.
    ///
    /// Every sample goes through [`Trace::append`], so out-of-order input is
    /// rejected and repeated values are compacted.
    pub fn from_samples<I, S>(name: impl Into<String>, width: u32, samples: I) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sample>,
    {
        let mut trace = Self::new(name, width);
        for sample in samples {
            trace.append(sample.into())?;
        }
        Ok(trace)
    }

    /// Sets the value reported for times before the first sample.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.set_default(default);
        self
    }

    /// In-place form of [`Trace::with_default`].
    pub fn set_default(&mut self, default: impl Into<Value>) {
        self.default = default.into();
    }

    /// Returns a copy of this trace under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Signal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared bit-width. Advisory for derived traces.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Value reported before the first sample.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The stored value changes, in increasing time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample has been stored.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the first stored sample.
    pub fn first_time(&self) -> Option<Tick> {
        self.samples.first().map(|s| s.time)
    }

    /// Time of the last stored sample.
    pub fn last_time(&self) -> Option<Tick> {
        self.samples.last().map(|s| s.time)
    }

    /// Appends a sample.
    ///
    /// Fails with [`TraceError::InvalidOrder`] unless `sample.time` is strictly
    /// greater than the last stored time. Does nothing if the value equals the
    /// last stored value.
    pub fn append(&mut self, sample: Sample) -> Result<(), TraceError> {
        if let Some(last) = self.samples.last() {
            if sample.time <= last.time {
                return Err(TraceError::InvalidOrder {
                    last: last.time,
                    time: sample.time,
                });
            }
            if last.value == sample.value {
                return Ok(());
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Appends `value` at `time`. See [`Trace::append`].
    pub fn push(&mut self, time: Tick, value: impl Into<Value>) -> Result<(), TraceError> {
        self.append(Sample::new(time, value))
    }

    /// Returns the value held at `time`.
    ///
    /// Before the first sample (or on an empty trace) this is the default value.
    pub fn value_at(&self, time: Tick) -> &Value {
        match self.samples.binary_search_by_key(&time, |s| s.time) {
            Ok(idx) => &self.samples[idx].value,
            Err(0) => &self.default,
            Err(idx) => &self.samples[idx - 1].value,
        }
    }

    /// Returns the samples whose time lies in `start..=stop`.
    pub fn samples_in_range(&self, start: Tick, stop: Tick) -> &[Sample] {
        if start > stop {
            return &[];
        }
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time <= stop);
        &self.samples[lo..hi]
    }

    /// Returns a copy with every sample moved `ticks` later.
    ///
    /// When the source starts at tick 0, its initial value is kept at tick 0
    /// so that lookups in `0..ticks` still see it.
    pub fn delay(&self, ticks: Tick) -> Result<Trace, TraceError> {
        let mut out = Trace {
            name: format!("{}.delay({ticks})", self.name),
            width: self.width,
            default: self.default.clone(),
            samples: Vec::with_capacity(self.samples.len() + 1),
        };
        if let Some(first) = self.samples.first() {
            if ticks > 0 && first.time == 0 {
                out.append(first.clone())?;
            }
        }
        for sample in &self.samples {
            let time = sample.time.checked_add(ticks).ok_or_else(|| TraceError::InvalidOperand {
                op: "delay",
                reason: format!("tick {} + {ticks} overflows", sample.time),
            })?;
            out.append(Sample::new(time, sample.value.clone()))?;
        }
        Ok(out)
    }

    /// Returns every tick in `0..horizon` at which the value is non-zero.
    ///
    /// Each non-zero run `[start, end)` is expanded to its individual ticks;
    /// the final run is open-ended and stops at `horizon`. Ticks before the
    /// first sample hold the default value and count when it is non-zero.
    /// Returns a fresh list on every call.
    pub fn trig_times(&self, horizon: Tick) -> Vec<Tick> {
        let mut times = Vec::new();
        for (start, end, value) in self.runs(horizon) {
            if value.is_truthy() {
                times.extend(start..end);
            }
        }
        times
    }

    /// Returns the first tick of every non-zero run that starts before `horizon`.
    ///
    /// A non-zero default makes tick 0 the first edge.
    pub fn trig_edges(&self, horizon: Tick) -> Vec<Tick> {
        let mut edges = Vec::new();
        let mut was_true = false;
        for (start, _, value) in self.runs(horizon) {
            let is_true = value.is_truthy();
            if is_true && !was_true {
                edges.push(start);
            }
            was_true = is_true;
        }
        edges
    }

    /// Iterates `(start, end, value)` runs clipped to `horizon`, starting with
    /// the default-valued run before the first sample.
    fn runs(&self, horizon: Tick) -> impl Iterator<Item = (Tick, Tick, &Value)> + '_ {
        let lead_end = self.first_time().unwrap_or(horizon).min(horizon);
        let lead = (lead_end > 0).then_some((0, lead_end, &self.default));
        let recorded = self
            .samples
            .iter()
            .enumerate()
            .take_while(move |(_, s)| s.time < horizon)
            .map(move |(i, s)| {
                let end = self
                    .samples
                    .get(i + 1)
                    .map_or(horizon, |next| next.time.min(horizon));
                (s.time, end, &s.value)
            });
        lead.into_iter().chain(recorded)
    }

    /// Applies a binary operator with this trace on the left.
    pub fn apply<'a>(&'a self, op: BinaryOp, rhs: impl Into<Operand<'a>>) -> Result<Trace, TraceError> {
        combine(op, self, rhs)
    }

    /// Applies a unary operator.
    pub fn apply_unary(&self, op: UnaryOp) -> Result<Trace, TraceError> {
        apply_unary(op, self)
    }

    /// Bitwise inversion (`~`).
    pub fn invert(&self) -> Result<Trace, TraceError> {
        apply_unary(UnaryOp::Invert, self)
    }

    /// Absolute value.
    pub fn abs(&self) -> Result<Trace, TraceError> {
        apply_unary(UnaryOp::Abs, self)
    }

    /// Arithmetic negation.
    pub fn negate(&self) -> Result<Trace, TraceError> {
        apply_unary(UnaryOp::Neg, self)
    }

    /// Logical not: 1 where the value is zero, 0 elsewhere.
    pub fn logical_not(&self) -> Result<Trace, TraceError> {
        apply_unary(UnaryOp::Not, self)
    }

    /// True for the single tick at which the value goes from zero to non-zero.
    pub fn posedge(&self) -> Result<Trace, TraceError> {
        let now = self.apply(BinaryOp::Ne, 0)?;
        let before = now.delay(1)?.logical_not()?;
        Ok(now
            .apply(BinaryOp::BitAnd, &before)?
            .renamed(format!("posedge({})", self.name)))
    }

    /// True for the single tick at which the value goes from non-zero to zero.
    pub fn negedge(&self) -> Result<Trace, TraceError> {
        let now = self.apply(BinaryOp::Ne, 0)?;
        let before = now.delay(1)?;
        Ok(now
            .logical_not()?
            .apply(BinaryOp::BitAnd, &before)?
            .renamed(format!("negedge({})", self.name)))
    }
}
