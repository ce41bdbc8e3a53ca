// src/config/mod.rs

//! Session file loading and validation for cellgraph.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a session file from disk (`loader.rs`).
//! - Validate it and turn records into executions (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, ExecutionRecord, RawSessionFile, RenderSection, SessionFile};
