//! Named collection of peekers.
//!
//! A [`PeekerGroup`] is an ordinary value owned by the caller; there is no
//! process-wide registry. Peekers keep their insertion order, which reports
//! use as the default display order.

use std::collections::HashMap;

use peek_trace::{HasTrace, Tick, Trace, Value};

use crate::error::ProbeError;
use crate::peeker::Peeker;

/// An ordered set of peekers addressable by name.
#[derive(Clone, Debug, Default)]
pub struct PeekerGroup {
    peekers: Vec<Peeker>,
    by_name: HashMap<String, usize>,
}

impl PeekerGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a peeker and returns its index.
    ///
    /// A name already in use gets a `[n]` suffix (`sig[1]`, `sig[2]`, ...) so
    /// every peeker stays addressable.
    pub fn add(&mut self, name: impl Into<String>, width: u32) -> usize {
        let base = name.into();
        let mut name = base.clone();
        let mut n = 1;
        while self.by_name.contains_key(&name) {
            name = format!("{base}[{n}]");
            n += 1;
        }
        let idx = self.peekers.len();
        self.by_name.insert(name.clone(), idx);
        self.peekers.push(Peeker::new(name, width));
        idx
    }

    /// Returns the peeker at `idx`.
    pub fn peeker(&self, idx: usize) -> Option<&Peeker> {
        self.peekers.get(idx)
    }

    /// Returns the peeker at `idx` for recording.
    pub fn peeker_mut(&mut self, idx: usize) -> Option<&mut Peeker> {
        self.peekers.get_mut(idx)
    }

    /// Looks a peeker up by name.
    ///
    /// An exact match wins. Otherwise `name` matches every peeker whose full
    /// name ends in `.name`; exactly one such match is required.
    pub fn get(&self, name: &str) -> Result<&Peeker, ProbeError> {
        if let Some(&idx) = self.by_name.get(name) {
            return Ok(&self.peekers[idx]);
        }
        let suffix = format!(".{name}");
        let matches: Vec<&Peeker> = self
            .peekers
            .iter()
            .filter(|p| p.name().ends_with(&suffix))
            .collect();
        match matches.as_slice() {
            [] => Err(ProbeError::UnknownSignal(name.to_string())),
            [one] => Ok(*one),
            many => Err(ProbeError::AmbiguousSignal {
                name: name.to_string(),
                candidates: many.iter().map(|p| p.name().to_string()).collect(),
            }),
        }
    }

    /// Looks up the trace of the named peeker. See [`PeekerGroup::get`].
    pub fn trace(&self, name: &str) -> Result<&Trace, ProbeError> {
        self.get(name).map(HasTrace::trace)
    }

    /// Names of all peekers in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.peekers.iter().map(Peeker::name).collect()
    }

    /// Iterates peekers in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Peeker> {
        self.peekers.iter()
    }

    /// Number of peekers.
    pub fn len(&self) -> usize {
        self.peekers.len()
    }

    /// Returns `true` if the group holds no peekers.
    pub fn is_empty(&self) -> bool {
        self.peekers.is_empty()
    }

    /// Sets the pre-first-sample value of every peeker.
    pub fn set_default_value(&mut self, value: &Value) {
        for peeker in &mut self.peekers {
            peeker.set_default(value.clone());
        }
    }

    /// Removes every peeker.
    pub fn clear(&mut self) {
        self.peekers.clear();
        self.by_name.clear();
    }

    /// Latest sample time across all peekers, or `None` if nothing was recorded.
    pub fn max_time(&self) -> Option<Tick> {
        self.peekers.iter().filter_map(|p| p.trace().last_time()).max()
    }
}

impl<'a> IntoIterator for &'a PeekerGroup {
    type Item = &'a Peeker;
    type IntoIter = std::slice::Iter<'a, Peeker>;

    fn into_iter(self) -> Self::IntoIter {
        self.peekers.iter()
    }
}
