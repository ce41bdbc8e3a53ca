// src/session/audit.rs

//! Comparison of observed effects against declared clauses.

use std::collections::BTreeSet;

use crate::diagnostics::Diagnostic;
use crate::errors::{CellgraphError, Result};
use crate::execution::{Execution, Symbol};
use crate::types::IsolationMode;

/// Where an execution's observed effects leave its declared clauses.
///
/// Sides without a clause are unconstrained and never contribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseAudit {
    /// Observed reads outside the declared pre-set.
    pub undeclared_pre: BTreeSet<Symbol>,
    /// Declared outputs that were never written.
    pub missing_post: BTreeSet<Symbol>,
    /// Observed writes outside the declared post-set.
    pub undeclared_post: BTreeSet<Symbol>,
}

impl ClauseAudit {
    pub fn of(execution: &Execution) -> Self {
        let mut audit = ClauseAudit::default();
        if let Some(declared) = &execution.declared_pre {
            audit.undeclared_pre = execution.observed_pre.difference(declared).cloned().collect();
        }
        if let Some(declared) = &execution.declared_post {
            audit.missing_post = declared.difference(&execution.observed_post).cloned().collect();
            audit.undeclared_post = execution.observed_post.difference(declared).cloned().collect();
        }
        audit
    }

    pub fn pre_violated(&self) -> bool {
        !self.undeclared_pre.is_empty()
    }

    pub fn post_violated(&self) -> bool {
        !self.missing_post.is_empty() || !self.undeclared_post.is_empty()
    }

    pub fn diagnostics(&self, execution: &Execution, pruned: bool) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if self.pre_violated() {
            out.push(Diagnostic::PreconditionViolation {
                execution: execution.id,
                undeclared: self.undeclared_pre.clone(),
            });
        }
        if self.post_violated() {
            out.push(Diagnostic::PostconditionViolation {
                execution: execution.id,
                missing: self.missing_post.clone(),
                undeclared: self.undeclared_post.clone(),
                pruned: pruned && !self.undeclared_post.is_empty(),
            });
        }
        out
    }
}

/// Apply `mode` to an already-recorded execution: report violations and,
/// in strict mode, mark undeclared outputs as pruned.
///
/// Used for histories that were observed elsewhere, where there is no live
/// namespace left to restore. With `fail_fast` in strict mode a violated
/// pre-clause is an error before pruning and a violated post-clause is an
/// error after it, as in [`Session::run_unit`](super::Session::run_unit).
pub fn enforce_on_record(
    execution: &mut Execution,
    mode: IsolationMode,
    fail_fast: bool,
) -> Result<Vec<Diagnostic>> {
    match mode {
        IsolationMode::Unprotected => Ok(Vec::new()),
        IsolationMode::Loose => Ok(ClauseAudit::of(execution).diagnostics(execution, false)),
        IsolationMode::Strict => {
            let audit = ClauseAudit::of(execution);
            if fail_fast && audit.pre_violated() {
                return Err(CellgraphError::PreconditionViolation {
                    execution: execution.id,
                    undeclared: audit.undeclared_pre,
                });
            }
            execution.pruned = audit.undeclared_post.clone();
            if fail_fast && audit.post_violated() {
                return Err(CellgraphError::PostconditionViolation {
                    execution: execution.id,
                    missing: audit.missing_post,
                    undeclared: audit.undeclared_post,
                });
            }
            Ok(audit.diagnostics(execution, true))
        }
    }
}
