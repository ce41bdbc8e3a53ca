// src/execution.rs

//! Executions: one record per finished run of a unit.

use std::collections::BTreeSet;
use std::fmt;

use crate::types::EdgeSource;

/// Opaque namespace key. Values stored under a symbol are never inspected.
pub type Symbol = String;

/// Name shared by every execution of the same unit (e.g. a notebook cell).
pub type UnitName = String;

/// Monotonically increasing execution identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExecutionId(pub u64);

impl ExecutionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        ExecutionId(self.0 + 1)
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single finished execution of a unit, with declared and observed effects.
///
/// `declared_*` is `None` when the unit carried no clause for that side
/// (unconstrained). `pruned` holds the produced symbols a strict session
/// removed from the namespace again; they never count as outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub id: ExecutionId,
    pub name: Option<UnitName>,
    pub declared_pre: Option<BTreeSet<Symbol>>,
    pub declared_post: Option<BTreeSet<Symbol>>,
    pub observed_pre: BTreeSet<Symbol>,
    pub observed_post: BTreeSet<Symbol>,
    pub pruned: BTreeSet<Symbol>,
}

impl Execution {
    /// Execution with observed effects only and no clauses.
    pub fn observed<I, J, S, T>(id: u64, pre: I, post: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<Symbol>,
        T: Into<Symbol>,
    {
        Self {
            id: ExecutionId(id),
            name: None,
            declared_pre: None,
            declared_post: None,
            observed_pre: pre.into_iter().map(Into::into).collect(),
            observed_post: post.into_iter().map(Into::into).collect(),
            pruned: BTreeSet::new(),
        }
    }

    /// Unit name, falling back to the stringified id for anonymous units.
    pub fn unit_name(&self) -> UnitName {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// Symbols this execution consumes for edge construction.
    pub fn effective_pre(&self, source: EdgeSource) -> BTreeSet<Symbol> {
        match (source, &self.declared_pre) {
            (EdgeSource::Declared, Some(declared)) => declared.clone(),
            _ => self.observed_pre.clone(),
        }
    }

    /// Symbols this execution produces for edge construction.
    ///
    /// Pruned symbols are never part of the result, whatever the source.
    pub fn effective_post(&self, source: EdgeSource) -> BTreeSet<Symbol> {
        let base = match (source, &self.declared_post) {
            (EdgeSource::Declared, Some(declared)) => declared,
            _ => &self.observed_post,
        };
        base.difference(&self.pruned).cloned().collect()
    }
}
