// src/session/mod.rs

//! A running session: one namespace, one execution history.
//!
//! [`Session::run_unit`] is the host-facing entry point. It
//!
//! 1. parses the unit's directive line into declared clauses,
//! 2. opens a monitored region (restricted to the declared pre-set in
//!    strict mode),
//! 3. hands the [`EffectTracker`] to the host's executor callback,
//! 4. closes the region, audits observed effects against the clauses and,
//!    in strict mode, prunes undeclared outputs,
//! 5. records the finished [`Execution`].
//!
//! The isolation mode is fixed when the session is created.

pub mod audit;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::annotation::parse_annotation;
use crate::config::model::ConfigSection;
use crate::diagnostics::Diagnostic;
use crate::diagram::render_dependency_graph;
use crate::errors::{CellgraphError, Result};
use crate::execution::{Execution, ExecutionId, Symbol, UnitName};
use crate::graph::{BuildOutput, DependencyGraph, GraphBuilder, Pipeline};
use crate::history::UnitHistory;
use crate::namespace::{EffectTracker, Namespace, tracker::DEFAULT_HIDDEN_PREFIX};
use crate::render::{LayoutChain, RenderOptions};
use crate::types::{EdgeSource, IsolationMode, PassKind};

pub use audit::{ClauseAudit, enforce_on_record};

/// Behaviour chosen once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: IsolationMode,
    pub edge_source: EdgeSource,
    /// In strict mode, turn clause violations into errors.
    pub fail_fast: bool,
    pub hidden_prefixes: Vec<String>,
    pub passes: Vec<PassKind>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: IsolationMode::default(),
            edge_source: EdgeSource::default(),
            fail_fast: false,
            hidden_prefixes: vec![DEFAULT_HIDDEN_PREFIX.to_string()],
            passes: Pipeline::recommended().passes().to_vec(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(cfg: &ConfigSection) -> Self {
        Self {
            mode: cfg.mode,
            edge_source: cfg.edge_source,
            fail_fast: cfg.fail_fast,
            hidden_prefixes: cfg.hidden_prefixes.clone(),
            passes: cfg.passes.clone(),
        }
    }

    pub fn with_mode(mut self, mode: IsolationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Outcome of one successful [`Session::run_unit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub execution: ExecutionId,
    pub unit: UnitName,
    pub version: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct Session<V> {
    options: SessionOptions,
    tracker: EffectTracker<V>,
    executions: Vec<Execution>,
    history: UnitHistory,
    next_id: ExecutionId,
    diagnostics: Vec<Diagnostic>,
}

impl<V: Clone> Session<V> {
    pub fn new(namespace: Namespace<V>, options: SessionOptions) -> Self {
        let tracker = EffectTracker::with_hidden_prefixes(namespace, options.hidden_prefixes.clone());
        Self {
            options,
            tracker,
            executions: Vec::new(),
            history: UnitHistory::new(),
            next_id: ExecutionId(1),
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn namespace(&self) -> &Namespace<V> {
        self.tracker.namespace()
    }

    /// Unlogged access for seeding values between units.
    pub fn namespace_mut(&mut self) -> &mut Namespace<V> {
        self.tracker.namespace_mut()
    }

    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    pub fn history(&self) -> &UnitHistory {
        &self.history
    }

    /// Every diagnostic reported by `run_unit` so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Run one unit under the effect tracker.
    ///
    /// The execution is recorded even when the executor fails or a
    /// fail-fast violation is returned; a unit that already ran cannot be
    /// undone.
    pub fn run_unit<F>(&mut self, directive: &str, executor: F) -> Result<RunReport>
    where
        F: FnOnce(&mut EffectTracker<V>) -> anyhow::Result<()>,
    {
        let (annotation, mut diagnostics) = parse_annotation(directive);
        let strict = self.options.mode == IsolationMode::Strict;

        let restrict = if strict { annotation.pre.as_ref() } else { None };
        self.tracker.enter(restrict)?;
        let outcome = executor(&mut self.tracker);
        let region = self.tracker.leave()?;

        let id = self.next_id;
        self.next_id = id.next();

        let mut execution = Execution {
            id,
            name: annotation.name,
            declared_pre: annotation.pre,
            declared_post: annotation.post,
            observed_pre: region.observed_pre,
            observed_post: region.observed_post,
            pruned: BTreeSet::new(),
        };

        let mut abort = None;
        if self.options.mode != IsolationMode::Unprotected {
            let audit = ClauseAudit::of(&execution);

            if strict && self.options.fail_fast && audit.pre_violated() {
                abort = Some(CellgraphError::PreconditionViolation {
                    execution: id,
                    undeclared: audit.undeclared_pre.clone(),
                });
                diagnostics.extend(audit.diagnostics(&execution, false));
            } else {
                if strict && !audit.undeclared_post.is_empty() {
                    self.prune(&audit.undeclared_post, &region.backup);
                    execution.pruned = audit.undeclared_post.clone();
                }
                diagnostics.extend(audit.diagnostics(&execution, strict));

                if strict && self.options.fail_fast && audit.post_violated() {
                    abort = Some(CellgraphError::PostconditionViolation {
                        execution: id,
                        missing: audit.missing_post.clone(),
                        undeclared: audit.undeclared_post.clone(),
                    });
                }
            }
        }

        let unit = execution.unit_name();
        let version = self.history.append(&unit, id);
        self.executions.push(execution);

        for diagnostic in &diagnostics {
            warn!(execution = %id, %diagnostic, "unit diagnostic");
        }
        self.diagnostics.extend(diagnostics.iter().cloned());
        info!(execution = %id, unit = %unit, version, "unit recorded");

        if let Err(reason) = outcome {
            return Err(CellgraphError::ExecutorFailed {
                execution: id,
                reason,
            });
        }
        if let Some(err) = abort {
            return Err(err);
        }

        Ok(RunReport {
            execution: id,
            unit,
            version,
            diagnostics,
        })
    }

    /// Restore each symbol to its pre-execution value, or remove it.
    fn prune(&mut self, symbols: &BTreeSet<Symbol>, backup: &Namespace<V>) {
        let namespace = self.tracker.namespace_mut();
        for symbol in symbols {
            match backup.get(symbol) {
                Some(value) => {
                    namespace.insert(symbol.clone(), value.clone());
                }
                None => {
                    namespace.remove(symbol);
                }
            }
            debug!(symbol = %symbol, restored = backup.contains(symbol), "pruned undeclared output");
        }
    }

    /// Raw multigraph of the history so far.
    pub fn build(&self) -> Result<BuildOutput> {
        GraphBuilder::new(self.options.edge_source).build(&self.executions)
    }

    /// Current dependency DAG after the configured simplification passes.
    pub fn graph(&self) -> Result<Arc<DependencyGraph>> {
        let built = self.build()?;
        Ok(Pipeline::new(self.options.passes.clone()).apply(&built.graph))
    }

    /// Render the current DAG.
    pub fn diagram(&self, layouts: &LayoutChain, options: &RenderOptions) -> Result<String> {
        let graph = self.graph()?;
        Ok(render_dependency_graph(&graph, layouts, options))
    }
}
