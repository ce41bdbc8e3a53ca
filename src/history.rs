// src/history.rs

//! Per-unit execution history, used to derive version numbers.

use std::collections::BTreeMap;

use tracing::trace;

use crate::execution::{ExecutionId, UnitName};

/// Ordered record of every execution sharing one unit name.
///
/// Grows only by [`UnitHistory::append`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySequence {
    ids: Vec<ExecutionId>,
}

impl HistorySequence {
    pub fn ids(&self) -> &[ExecutionId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Version of the most recent execution, if any.
    pub fn latest_version(&self) -> Option<usize> {
        self.ids.len().checked_sub(1)
    }

    /// 0-based position of `id` in this sequence.
    pub fn version_of(&self, id: ExecutionId) -> Option<usize> {
        self.ids.iter().position(|&other| other == id)
    }
}

/// Registry of [`HistorySequence`]s keyed by unit name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitHistory {
    units: BTreeMap<UnitName, HistorySequence>,
}

impl UnitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to `unit`'s sequence and return its version
    /// (`len(sequence) - 1` right after the append).
    pub fn append(&mut self, unit: &str, id: ExecutionId) -> usize {
        let seq = self.units.entry(unit.to_string()).or_default();
        seq.ids.push(id);
        let version = seq.ids.len() - 1;
        trace!(unit = %unit, id = %id, version, "appended to unit history");
        version
    }

    pub fn sequence(&self, unit: &str) -> Option<&HistorySequence> {
        self.units.get(unit)
    }

    /// Whether `version` is the latest version recorded for `unit`.
    pub fn is_latest(&self, unit: &str, version: usize) -> bool {
        self.sequence(unit)
            .and_then(HistorySequence::latest_version)
            .is_some_and(|latest| latest == version)
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &HistorySequence)> {
        self.units.iter().map(|(name, seq)| (name.as_str(), seq))
    }
}
