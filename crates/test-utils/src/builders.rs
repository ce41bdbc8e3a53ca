#![allow(dead_code)]

use std::collections::BTreeSet;

use cellgraph::config::{ConfigSection, ExecutionRecord, RawSessionFile, RenderSection, SessionFile};
use cellgraph::execution::{Execution, ExecutionId};
use cellgraph::types::IsolationMode;

fn set(symbols: &[&str]) -> BTreeSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// Builder for `Execution` to simplify test setup.
pub struct ExecutionBuilder {
    execution: Execution,
}

impl ExecutionBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            execution: Execution {
                id: ExecutionId(id),
                name: None,
                declared_pre: None,
                declared_post: None,
                observed_pre: BTreeSet::new(),
                observed_post: BTreeSet::new(),
                pruned: BTreeSet::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.execution.name = Some(name.to_string());
        self
    }

    pub fn declared_pre(mut self, symbols: &[&str]) -> Self {
        self.execution.declared_pre = Some(set(symbols));
        self
    }

    pub fn declared_post(mut self, symbols: &[&str]) -> Self {
        self.execution.declared_post = Some(set(symbols));
        self
    }

    pub fn reads(mut self, symbols: &[&str]) -> Self {
        self.execution.observed_pre.extend(set(symbols));
        self
    }

    pub fn writes(mut self, symbols: &[&str]) -> Self {
        self.execution.observed_post.extend(set(symbols));
        self
    }

    /// Declare and observe the same pre-set.
    pub fn pre(self, symbols: &[&str]) -> Self {
        self.declared_pre(symbols).reads(symbols)
    }

    /// Declare and observe the same post-set.
    pub fn post(self, symbols: &[&str]) -> Self {
        self.declared_post(symbols).writes(symbols)
    }

    pub fn build(self) -> Execution {
        self.execution
    }
}

/// Builder for `SessionFile`, going through the same validation as a
/// file on disk.
pub struct SessionFileBuilder {
    session: RawSessionFile,
}

impl SessionFileBuilder {
    pub fn new() -> Self {
        Self {
            session: RawSessionFile {
                config: ConfigSection::default(),
                render: RenderSection::default(),
                execution: Vec::new(),
            },
        }
    }

    pub fn mode(mut self, mode: IsolationMode) -> Self {
        self.session.config.mode = mode;
        self
    }

    pub fn with_record(mut self, record: ExecutionRecord) -> Self {
        self.session.execution.push(record);
        self
    }

    /// Record with an annotation line and observed effects.
    pub fn with_execution(
        self,
        id: u64,
        annotation: &str,
        observed_pre: &[&str],
        observed_post: &[&str],
    ) -> Self {
        self.with_record(ExecutionRecord {
            id,
            annotation: Some(annotation.to_string()),
            observed_pre: observed_pre.iter().map(|s| s.to_string()).collect(),
            observed_post: observed_post.iter().map(|s| s.to_string()).collect(),
            ..ExecutionRecord::default()
        })
    }

    pub fn raw(self) -> RawSessionFile {
        self.session
    }

    pub fn build(self) -> SessionFile {
        SessionFile::try_from(self.session).expect("Failed to build valid session from builder")
    }
}

impl Default for SessionFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
