// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::ConfigFile;

/// Immediate dependencies and dependents of one task.
#[derive(Debug, Clone, Default)]
struct DagNode {
    deps: Vec<String>,
    dependents: Vec<String>,
}

/// Name-keyed DAG adjacency. Deliberately not a tree of `TaskNode`s with
/// owned children: a diamond dependency has two incoming edges into the
/// same node, which a tree representation cannot express.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<String, DagNode>,
}

impl DagGraph {
    /// Build the graph from a validated [`ConfigFile`]. Assumes `depends`
    /// references are all valid and acyclic (checked by `config::validate`).
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let mut nodes: HashMap<String, DagNode> = HashMap::new();

        for (name, task) in cfg.tasks.iter() {
            nodes.insert(
                name.clone(),
                DagNode {
                    deps: task.depends.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        let task_names: Vec<String> = nodes.keys().cloned().collect();
        for task_name in task_names {
            let deps = nodes
                .get(&task_name)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(task_name.clone());
                }
            }
        }

        Self { nodes }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::config::model::{RunMode, TaskDef, TaskKind};

    fn task(name: &str, depends: &[&str]) -> TaskDef {
        TaskDef {
            name: name.to_string(),
            kind: TaskKind::Group,
            run_mode: RunMode::AwaitCompletion,
            completion_pattern: None,
            pattern_in_stderr: false,
            depends: depends.iter().map(|s| s.to_string()).collect(),
            shell: None,
            docker: None,
        }
    }

    #[test]
    fn diamond_dependents() {
        let mut tasks = BTreeMap::new();
        tasks.insert("a".to_string(), task("a", &[]));
        tasks.insert("b".to_string(), task("b", &["a"]));
        tasks.insert("c".to_string(), task("c", &["a"]));
        tasks.insert("d".to_string(), task("d", &["b", "c"]));
        let cfg = ConfigFile { tasks, gui: None };

        let graph = DagGraph::from_config(&cfg);
        let mut dependents = graph.dependents_of("a").to_vec();
        dependents.sort();
        assert_eq!(dependents, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(graph.dependencies_of("d"), &["b".to_string(), "c".to_string()]);
    }
}
