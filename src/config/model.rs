// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw shape of the YAML document, before name injection and validation.
/// `Serialize` is kept alongside `Deserialize` so a parsed document can be
/// round-tripped (spec §8's "load, serialize, reload" idempotence check).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawConfigFile {
    pub tasks: BTreeMap<String, RawTaskDef>,
    #[serde(default)]
    pub gui: Option<GuiConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTaskDef {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub run_mode: RunMode,
    #[serde(default)]
    pub completion_pattern: Option<String>,
    #[serde(default)]
    pub pattern_in_stderr: bool,
    #[serde(default)]
    pub depends: Vec<String>,
    #[serde(default)]
    pub shell: Option<ShellOptions>,
    #[serde(default)]
    pub docker: Option<DockerOptions>,
}

/// A task's kind, selecting which [`crate::handler::Handler`] spawns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Shell,
    Docker,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    AwaitCompletion,
    Indefinite,
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::AwaitCompletion
    }
}

/// `command` is either a shell string or an argv list (direct exec, no shell).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ShellCommand {
    Line(String),
    Argv(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShellOptions {
    pub command: ShellCommand,
    #[serde(default)]
    pub working_directory: Option<PathBuf>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DockerOptions {
    pub container_name: String,
    pub image: String,
    #[serde(default)]
    pub docker_arguments: Vec<String>,
    #[serde(default)]
    pub docker_command: Vec<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub working_directory: Option<PathBuf>,
    #[serde(default)]
    pub stop_at_exit: bool,
}

/// Opaque passthrough for the observer; the core never reads these fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GuiConfig {
    #[serde(default)]
    pub palette: Option<String>,
    #[serde(default)]
    pub panes: BTreeMap<String, PaneConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaneConfig {
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// A task definition with its `name` injected from the configuration map key.
/// Immutable after load.
#[derive(Debug, Clone)]
pub struct TaskDef {
    pub name: String,
    pub kind: TaskKind,
    pub run_mode: RunMode,
    pub completion_pattern: Option<String>,
    pub pattern_in_stderr: bool,
    pub depends: Vec<String>,
    pub shell: Option<ShellOptions>,
    pub docker: Option<DockerOptions>,
}

#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub tasks: BTreeMap<String, TaskDef>,
    pub gui: Option<GuiConfig>,
}

impl ConfigFile {
    pub fn task(&self, name: &str) -> Option<&TaskDef> {
        self.tasks.get(name)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }
}
