// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSessionFile, SessionFile};
use crate::errors::Result;

/// Load a session file from a given path and return the raw `RawSessionFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (id ordering, render sanity, etc.). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSessionFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let session: RawSessionFile = toml::from_str(&contents)?;

    Ok(session)
}

/// Load a session file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Checks execution ids, symbols and render settings.
/// - Parses annotations and applies the configured isolation mode.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SessionFile> {
    let raw = load_from_path(&path)?;
    SessionFile::try_from(raw)
}

/// Default session file: `Cellgraph.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Cellgraph.toml")
}
