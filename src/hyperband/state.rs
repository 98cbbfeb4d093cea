//! Persisted initial populations per bracket

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::params::ParamMap;

/// On-disk form of the search state: bracket indices are stringified.
pub type WireState = BTreeMap<String, Vec<ParamMap>>;

/// Initial populations for every bracket, keyed by bracket index.
///
/// Immutable input to a run once persisted: a resumed search reuses these
/// populations verbatim instead of re-sampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    brackets: BTreeMap<usize, Vec<ParamMap>>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, s: usize, population: Vec<ParamMap>) {
        self.brackets.insert(s, population);
    }

    pub fn bracket(&self, s: usize) -> Option<&[ParamMap]> {
        self.brackets.get(&s).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Number of brackets held.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Serialize to the wire form: bracket indices become strings.
    pub fn to_wire(&self) -> WireState {
        self.brackets.iter().map(|(s, pop)| (s.to_string(), pop.clone())).collect()
    }

    /// Parse the wire form back, converting stringified bracket indices to
    /// integers. A non-numeric key means the file was not written by this
    /// scheduler and is rejected outright.
    pub fn from_wire(wire: WireState) -> Result<Self> {
        let mut brackets = BTreeMap::new();
        for (key, population) in wire {
            let s: usize = key
                .parse()
                .map_err(|_| Error::CorruptState(format!("bad bracket index: {key:?}")))?;
            brackets.insert(s, population);
        }
        Ok(Self { brackets })
    }
}
