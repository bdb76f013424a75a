// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read a YAML configuration file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(crate::errors::JorunError::Io)?;
    let raw: RawConfigFile = serde_yaml::from_str(&contents)
        .map_err(|e| crate::errors::JorunError::Configuration(format!("{path:?}: {e}")))?;
    Ok(raw)
}

/// Load and validate a configuration file. This is the entry point `main`
/// uses: it reads YAML, injects each task's `name`, and checks DAG
/// correctness and per-kind field requirements (`config::validate`).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(path)?;
    ConfigFile::try_from(raw)
}
