// src/namespace/store.rs

use std::collections::BTreeMap;

use crate::execution::Symbol;

/// Plain name → value map shared by every unit of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace<V> {
    slots: BTreeMap<Symbol, V>,
}

impl<V> Default for Namespace<V> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<V> Namespace<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&V> {
        self.slots.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.slots.contains_key(symbol)
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, value: V) -> Option<V> {
        self.slots.insert(symbol.into(), value)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<V> {
        self.slots.remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(|s| s.as_str())
    }

    /// Move every slot whose symbol fails `keep` out of the namespace.
    pub(crate) fn split_off_unless<F>(&mut self, mut keep: F) -> BTreeMap<Symbol, V>
    where
        F: FnMut(&str) -> bool,
    {
        let (kept, moved): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.slots)
                .into_iter()
                .partition(|(symbol, _)| keep(symbol));
        self.slots = kept;
        moved
    }
}

impl<V, S: Into<Symbol>> FromIterator<(S, V)> for Namespace<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|(s, v)| (s.into(), v)).collect(),
        }
    }
}
