// src/diagnostics.rs

//! Non-fatal findings collected while running units and building graphs.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::execution::{ExecutionId, Symbol};

/// A finding reported back to the caller.
///
/// None of these abort processing on their own; a strict, fail-fast
/// [`Session`](crate::session::Session) additionally turns pre/post
/// violations into [`CellgraphError`](crate::errors::CellgraphError)s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("execution {execution} read symbols outside its pre clause: {undeclared:?}")]
    PreconditionViolation {
        execution: ExecutionId,
        undeclared: BTreeSet<Symbol>,
    },

    #[error(
        "execution {execution} diverged from its post clause: missing {missing:?}, undeclared {undeclared:?} (pruned: {pruned})"
    )]
    PostconditionViolation {
        execution: ExecutionId,
        missing: BTreeSet<Symbol>,
        undeclared: BTreeSet<Symbol>,
        pruned: bool,
    },

    #[error("execution {consumer} consumed '{symbol}' with no earlier producer")]
    UnresolvedProducer { consumer: ExecutionId, symbol: Symbol },

    #[error("malformed {clause}(...) clause: {reason}")]
    MalformedAnnotation { clause: String, reason: String },
}

impl Diagnostic {
    /// Whether this is a pre/post clause violation.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            Diagnostic::PreconditionViolation { .. } | Diagnostic::PostconditionViolation { .. }
        )
    }
}
