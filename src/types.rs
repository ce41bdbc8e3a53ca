use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How much a [`Session`](crate::session::Session) trusts a unit's
/// `pre(...)` / `post(...)` clauses.
///
/// - `Unprotected`: observe effects only, never compare against clauses.
/// - `Loose`: observe effects and report clause violations as diagnostics.
/// - `Strict`: hide everything outside the declared pre-set while the unit
///   runs, report violations, and prune undeclared outputs afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationMode {
    Unprotected,
    Loose,
    Strict,
}

impl Default for IsolationMode {
    fn default() -> Self {
        IsolationMode::Loose
    }
}

impl FromStr for IsolationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unprotected" => Ok(IsolationMode::Unprotected),
            "loose" => Ok(IsolationMode::Loose),
            "strict" => Ok(IsolationMode::Strict),
            other => Err(format!(
                "invalid mode: {other} (expected \"unprotected\", \"loose\" or \"strict\")"
            )),
        }
    }
}

/// Which pre/post sets feed dependency-edge construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    /// Observed effects always govern edges; clauses are only compared.
    Observed,
    /// A declared clause wins when present, else the observed set is used.
    Declared,
}

impl Default for EdgeSource {
    fn default() -> Self {
        EdgeSource::Observed
    }
}

impl FromStr for EdgeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "observed" => Ok(EdgeSource::Observed),
            "declared" => Ok(EdgeSource::Declared),
            other => Err(format!(
                "invalid edge_source: {other} (expected \"observed\" or \"declared\")"
            )),
        }
    }
}

/// One simplification pass, as named in `[config].passes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    DropIsolated,
    MergeParallelEdges,
    KeepLatestVersion,
}

impl PassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassKind::DropIsolated => "drop_isolated",
            PassKind::MergeParallelEdges => "merge_parallel_edges",
            PassKind::KeepLatestVersion => "keep_latest_version",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position-assignment strategies that can be chained in `[render].layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Layered,
    Circular,
}
