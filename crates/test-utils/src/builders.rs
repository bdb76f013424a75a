#![allow(dead_code)]

use std::collections::BTreeMap;

use jorun::config::{
    ConfigFile, DockerOptions, GuiConfig, RawConfigFile, RawTaskDef, RunMode, ShellCommand,
    ShellOptions, TaskKind,
};

/// Builder for a [`ConfigFile`], so tests can assemble a task graph without
/// writing a YAML fixture to disk.
pub struct ConfigFileBuilder {
    tasks: BTreeMap<String, RawTaskDef>,
    gui: Option<GuiConfig>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            gui: None,
        }
    }

    pub fn with_task(mut self, name: &str, task: RawTaskDef) -> Self {
        self.tasks.insert(name.to_string(), task);
        self
    }

    /// Build and validate, panicking (with the configuration error message)
    /// if the graph is malformed. Tests that exercise validation failures
    /// should call `try_build` instead.
    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("failed to build valid config from builder")
    }

    pub fn try_build(self) -> jorun::errors::Result<ConfigFile> {
        let raw = RawConfigFile {
            tasks: self.tasks,
            gui: self.gui,
        };
        ConfigFile::try_from(raw)
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one [`RawTaskDef`].
pub struct TaskDefBuilder {
    task: RawTaskDef,
}

impl TaskDefBuilder {
    fn blank(kind: TaskKind) -> Self {
        Self {
            task: RawTaskDef {
                kind,
                run_mode: RunMode::AwaitCompletion,
                completion_pattern: None,
                pattern_in_stderr: false,
                depends: Vec::new(),
                shell: None,
                docker: None,
            },
        }
    }

    /// A `shell` task running the given argv (no shell interpolation).
    pub fn shell_argv(argv: &[&str]) -> Self {
        let mut b = Self::blank(TaskKind::Shell);
        b.task.shell = Some(ShellOptions {
            command: ShellCommand::Argv(argv.iter().map(|s| s.to_string()).collect()),
            working_directory: None,
            environment: BTreeMap::new(),
        });
        b
    }

    /// A `shell` task running the given command line via the platform shell.
    pub fn shell_line(line: &str) -> Self {
        let mut b = Self::blank(TaskKind::Shell);
        b.task.shell = Some(ShellOptions {
            command: ShellCommand::Line(line.to_string()),
            working_directory: None,
            environment: BTreeMap::new(),
        });
        b
    }

    pub fn docker(container_name: &str, image: &str) -> Self {
        let mut b = Self::blank(TaskKind::Docker);
        b.task.docker = Some(DockerOptions {
            container_name: container_name.to_string(),
            image: image.to_string(),
            docker_arguments: Vec::new(),
            docker_command: Vec::new(),
            environment: BTreeMap::new(),
            working_directory: None,
            stop_at_exit: false,
        });
        b
    }

    pub fn group() -> Self {
        Self::blank(TaskKind::Group)
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.task.depends.push(dep.to_string());
        self
    }

    pub fn run_mode(mut self, mode: RunMode) -> Self {
        self.task.run_mode = mode;
        self
    }

    pub fn indefinite(self) -> Self {
        self.run_mode(RunMode::Indefinite)
    }

    pub fn completion_pattern(mut self, pattern: &str) -> Self {
        self.task.completion_pattern = Some(pattern.to_string());
        self
    }

    pub fn pattern_in_stderr(mut self, val: bool) -> Self {
        self.task.pattern_in_stderr = val;
        self
    }

    pub fn stop_at_exit(mut self, val: bool) -> Self {
        if let Some(docker) = self.task.docker.as_mut() {
            docker.stop_at_exit = val;
        }
        self
    }

    pub fn build(self) -> RawTaskDef {
        self.task
    }
}
