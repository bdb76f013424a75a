// src/config/mod.rs

//! Configuration document loading and validation.
//!
//! - [`model`] holds the deserialized shape of the YAML document.
//! - [`loader`] reads the file and injects each task's `name`.
//! - [`validate`] checks DAG correctness and per-kind field requirements.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::load_and_validate;
pub use model::{
    ConfigFile, DockerOptions, GuiConfig, PaneConfig, RawConfigFile, RawTaskDef, RunMode,
    ShellCommand, ShellOptions, TaskDef, TaskKind,
};
