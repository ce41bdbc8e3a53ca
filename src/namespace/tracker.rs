// src/namespace/tracker.rs

//! Read/write interposition over a [`Namespace`].
//!
//! A monitored region is opened with [`EffectTracker::enter`] and closed
//! with [`EffectTracker::leave`]. Inside the region:
//!
//! - a read of a symbol that has not been written *in this region* is an
//!   observed-pre access;
//! - every write (including removal) is an observed-post access;
//! - a read after a write in the same region is local and not logged;
//! - hidden symbols (configurable prefixes, `__` by default) are never
//!   logged.
//!
//! Regions do not nest. Outside a region all accesses go straight to the
//! namespace.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::errors::{CellgraphError, Result};
use crate::execution::Symbol;
use crate::namespace::Namespace;

/// Default prefix of internal symbols that are never recorded.
pub const DEFAULT_HIDDEN_PREFIX: &str = "__";

/// Whether `symbol` starts with one of `hidden_prefixes`. Empty prefixes
/// match nothing.
pub fn is_hidden_symbol(symbol: &str, hidden_prefixes: &[String]) -> bool {
    hidden_prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && symbol.starts_with(prefix.as_str()))
}

/// What a finished region observed.
#[derive(Debug, Clone)]
pub struct RegionReport<V> {
    /// Full namespace as it was when the region was entered.
    pub backup: Namespace<V>,
    pub observed_pre: BTreeSet<Symbol>,
    pub observed_post: BTreeSet<Symbol>,
}

#[derive(Debug)]
struct ActiveRegion<V> {
    backup: Namespace<V>,
    /// Slots moved out of the namespace by a `restrict_to` set.
    withheld: BTreeMap<Symbol, V>,
    written: BTreeSet<Symbol>,
    pre: BTreeSet<Symbol>,
}

/// Instrumented namespace. Owns the [`Namespace`] it monitors; hosts
/// thread it explicitly through their executor callback.
#[derive(Debug)]
pub struct EffectTracker<V> {
    namespace: Namespace<V>,
    hidden_prefixes: Vec<String>,
    region: Option<ActiveRegion<V>>,
}

impl<V: Clone> EffectTracker<V> {
    pub fn new(namespace: Namespace<V>) -> Self {
        Self::with_hidden_prefixes(namespace, vec![DEFAULT_HIDDEN_PREFIX.to_string()])
    }

    pub fn with_hidden_prefixes(namespace: Namespace<V>, hidden_prefixes: Vec<String>) -> Self {
        Self {
            namespace,
            hidden_prefixes,
            region: None,
        }
    }

    /// Whether `symbol` is internal and excluded from effect logging.
    pub fn is_hidden(&self, symbol: &str) -> bool {
        is_hidden_symbol(symbol, &self.hidden_prefixes)
    }

    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    /// Unlogged view of the namespace.
    pub fn namespace(&self) -> &Namespace<V> {
        &self.namespace
    }

    /// Unlogged mutable access, for hosts seeding or pruning state.
    pub fn namespace_mut(&mut self) -> &mut Namespace<V> {
        &mut self.namespace
    }

    pub fn into_namespace(self) -> Namespace<V> {
        self.namespace
    }

    /// Begin a monitored region.
    ///
    /// With `restrict_to`, every non-hidden symbol outside the set is moved
    /// out of the namespace until [`leave`](Self::leave).
    pub fn enter(&mut self, restrict_to: Option<&BTreeSet<Symbol>>) -> Result<()> {
        if self.region.is_some() {
            return Err(CellgraphError::RegionActive);
        }

        let backup = self.namespace.clone();
        let withheld = match restrict_to {
            Some(allowed) => {
                let prefixes = &self.hidden_prefixes;
                self.namespace.split_off_unless(|symbol| {
                    allowed.contains(symbol) || is_hidden_symbol(symbol, prefixes)
                })
            }
            None => BTreeMap::new(),
        };

        debug!(
            restricted = restrict_to.is_some(),
            withheld = withheld.len(),
            "entering monitored region"
        );

        self.region = Some(ActiveRegion {
            backup,
            withheld,
            written: BTreeSet::new(),
            pre: BTreeSet::new(),
        });
        Ok(())
    }

    /// End the monitored region and report what it observed.
    ///
    /// Withheld symbols that were not rewritten during the region are put
    /// back, so the namespace never silently loses prior state.
    pub fn leave(&mut self) -> Result<RegionReport<V>> {
        let region = self.region.take().ok_or(CellgraphError::NoActiveRegion)?;

        let mut restored = 0usize;
        for (symbol, value) in region.withheld {
            if !region.written.contains(&symbol) {
                self.namespace.insert(symbol, value);
                restored += 1;
            }
        }

        debug!(
            pre = region.pre.len(),
            post = region.written.len(),
            restored,
            "left monitored region"
        );

        Ok(RegionReport {
            backup: region.backup,
            observed_pre: region.pre,
            observed_post: region.written,
        })
    }

    pub fn get(&mut self, symbol: &str) -> Option<&V> {
        self.note_read(symbol);
        self.namespace.get(symbol)
    }

    pub fn contains(&mut self, symbol: &str) -> bool {
        self.note_read(symbol);
        self.namespace.contains(symbol)
    }

    pub fn set(&mut self, symbol: impl Into<Symbol>, value: V) -> Option<V> {
        let symbol = symbol.into();
        self.note_write(&symbol);
        self.namespace.insert(symbol, value)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<V> {
        self.note_write(symbol);
        self.namespace.remove(symbol)
    }

    fn note_read(&mut self, symbol: &str) {
        if self.is_hidden(symbol) {
            return;
        }
        if let Some(region) = self.region.as_mut() {
            if !region.written.contains(symbol) {
                region.pre.insert(symbol.to_string());
            }
        }
    }

    fn note_write(&mut self, symbol: &str) {
        if self.is_hidden(symbol) {
            return;
        }
        if let Some(region) = self.region.as_mut() {
            region.written.insert(symbol.to_string());
        }
    }
}
