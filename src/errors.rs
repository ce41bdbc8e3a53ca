// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::execution::{ExecutionId, Symbol};

#[derive(Error, Debug)]
pub enum CellgraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("a monitored region is already active; regions do not nest")]
    RegionActive,

    #[error("no monitored region is active")]
    NoActiveRegion,

    #[error("execution {current} does not follow execution {previous}; ids must strictly increase")]
    OutOfOrder {
        previous: ExecutionId,
        current: ExecutionId,
    },

    #[error("execution {execution} read undeclared symbols {undeclared:?}")]
    PreconditionViolation {
        execution: ExecutionId,
        undeclared: BTreeSet<Symbol>,
    },

    #[error(
        "execution {execution} broke its post clause (missing {missing:?}, undeclared {undeclared:?})"
    )]
    PostconditionViolation {
        execution: ExecutionId,
        missing: BTreeSet<Symbol>,
        undeclared: BTreeSet<Symbol>,
    },

    #[error("executor failed for execution {execution}: {reason:#}")]
    ExecutorFailed {
        execution: ExecutionId,
        reason: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CellgraphError>;
