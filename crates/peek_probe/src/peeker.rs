//! The single-signal observer.

use peek_trace::{HasTrace, Tick, Trace, TraceError, Value};

/// Records one signal's value changes into an owned [`Trace`].
///
/// A peeker is the only writer of its trace and must observe changes in
/// strictly increasing time order. Observing an unchanged value is a no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct Peeker {
    trace: Trace,
}

impl Peeker {
    /// Creates a peeker with an empty trace.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            trace: Trace::new(name, width),
        }
    }

    /// Signal name.
    pub fn name(&self) -> &str {
        self.trace.name()
    }

    /// Declared bit-width.
    pub fn width(&self) -> u32 {
        self.trace.width()
    }

    /// Records the signal's value at `time`.
    pub fn observe(&mut self, time: Tick, value: impl Into<Value>) -> Result<(), TraceError> {
        self.trace.push(time, value)
    }

    /// Sets the value the trace reports before its first sample.
    pub fn set_default(&mut self, value: impl Into<Value>) {
        self.trace.set_default(value);
    }

    /// Consumes the peeker and returns its trace.
    pub fn into_trace(self) -> Trace {
        self.trace
    }
}

impl HasTrace for Peeker {
    fn trace(&self) -> &Trace {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_trace::{combine, BinaryOp};

    #[test]
    fn observe_records_changes_only() {
        let mut p = Peeker::new("top.clk", 1);
        p.observe(0, 0).unwrap();
        p.observe(1, 1).unwrap();
        p.observe(2, 1).unwrap();
        p.observe(3, 0).unwrap();
        assert_eq!(p.trace().len(), 3);
        assert_eq!(p.name(), "top.clk");
        assert_eq!(p.width(), 1);
    }

    #[test]
    fn observe_rejects_time_going_backwards() {
        let mut p = Peeker::new("s", 1);
        p.observe(5, 1).unwrap();
        assert_eq!(
            p.observe(4, 0),
            Err(TraceError::InvalidOrder { last: 5, time: 4 })
        );
    }

    #[test]
    fn peeker_stands_in_for_its_trace() {
        let mut a = Peeker::new("a", 4);
        let mut b = Peeker::new("b", 4);
        a.observe(0, 2).unwrap();
        b.observe(0, 3).unwrap();
        b.observe(5, 4).unwrap();

        let via_peekers = combine(BinaryOp::Mul, &a, &b).unwrap();
        let via_traces = combine(BinaryOp::Mul, a.trace(), b.trace()).unwrap();
        assert_eq!(via_peekers, via_traces);
        assert_eq!(via_peekers.trig_times(7), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn default_applies_before_first_sample() {
        let mut p = Peeker::new("d", 8);
        p.observe(5, 1).unwrap();
        p.set_default(3);
        assert_eq!(*p.trace().value_at(2), Value::from(3));
        assert_eq!(*p.trace().value_at(5), Value::from(1));
    }

    #[test]
    fn into_trace_keeps_samples() {
        let mut p = Peeker::new("d", 8);
        p.observe(0, 7).unwrap();
        let t = p.into_trace();
        assert_eq!(*t.value_at(10), Value::from(7));
    }
}
