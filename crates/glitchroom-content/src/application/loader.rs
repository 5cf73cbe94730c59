//! Loads game scripts from YAML.

use std::path::Path;

use glitchroom_orchestrator::domain::script::GameScript;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::document::ScriptDocument;
use crate::domain::error::ScriptError;

const DEFAULT_SCRIPT: &str = include_str!("../../scripts/diagnostic.yaml");

/// Hex SHA-256 of the script source.
#[must_use]
pub fn version_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

/// Parses and validates a YAML script.
///
/// # Errors
///
/// Returns `ScriptError::Parse` for malformed YAML or unknown fields and
/// `ScriptError::Invalid` for values the game cannot run with.
pub fn load_script(source: &str) -> Result<GameScript, ScriptError> {
    let document: ScriptDocument = serde_yaml::from_str(source)?;
    let script = document.into_script(version_hash(source))?;
    info!(
        title = %script.title,
        modules = script.module_count(),
        version_hash = %script.version_hash,
        "game script loaded"
    );
    Ok(script)
}

/// Reads and loads a script file.
///
/// # Errors
///
/// Returns `ScriptError::Io` if the file cannot be read, otherwise as
/// [`load_script`].
pub fn load_script_file(path: &Path) -> Result<GameScript, ScriptError> {
    let source = std::fs::read_to_string(path)?;
    load_script(&source)
}

/// The built-in five-module diagnostic script.
///
/// # Errors
///
/// Fails only if the bundled script is invalid.
pub fn default_script() -> Result<GameScript, ScriptError> {
    load_script(DEFAULT_SCRIPT)
}
