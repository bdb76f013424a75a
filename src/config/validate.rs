// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile, RawTaskDef, TaskDef, TaskKind};
use crate::errors::{JorunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = JorunError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        ensure_has_tasks(&raw)?;
        validate_kinds(&raw)?;
        validate_task_dependencies(&raw)?;
        validate_dag(&raw)?;

        let tasks = raw
            .tasks
            .into_iter()
            .map(|(name, t)| (name.clone(), inject_name(name, t)))
            .collect();

        Ok(ConfigFile {
            tasks,
            gui: raw.gui,
        })
    }
}

fn inject_name(name: String, raw: RawTaskDef) -> TaskDef {
    TaskDef {
        name,
        kind: raw.kind,
        run_mode: raw.run_mode,
        completion_pattern: raw.completion_pattern,
        pattern_in_stderr: raw.pattern_in_stderr,
        depends: raw.depends,
        shell: raw.shell,
        docker: raw.docker,
    }
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.tasks.is_empty() {
        return Err(JorunError::Configuration(
            "configuration must contain at least one task under `tasks`".to_string(),
        ));
    }
    Ok(())
}

fn validate_kinds(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.tasks.iter() {
        match task.kind {
            TaskKind::Shell if task.shell.is_none() => {
                return Err(JorunError::Configuration(format!(
                    "task '{name}' has type 'shell' but no `shell:` section"
                )));
            }
            TaskKind::Docker if task.docker.is_none() => {
                return Err(JorunError::Configuration(format!(
                    "task '{name}' has type 'docker' but no `docker:` section"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.tasks.iter() {
        for dep in task.depends.iter() {
            if !cfg.tasks.contains_key(dep) {
                return Err(JorunError::Configuration(format!(
                    "task '{name}' depends on unknown task '{dep}'"
                )));
            }
            if dep == name {
                return Err(JorunError::Configuration(format!(
                    "task '{name}' cannot depend on itself"
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> task, so a topological sort fails iff there's a cycle.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.tasks.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.tasks.iter() {
        for dep in task.depends.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(JorunError::Cycle(format!(
            "cycle detected in task dependency graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}
