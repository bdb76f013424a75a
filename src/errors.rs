// src/errors.rs

//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JorunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to start task '{task}': {source}")]
    Spawn {
        task: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not match completion pattern on '{task}' before process exit")]
    PatternMiss { task: String },

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("cycle detected in task dependency graph: {0}")]
    Cycle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JorunError>;
