// src/handler/mod.rs

//! Kind-specific spawn/teardown strategies, keyed by [`TaskKind`].
//!
//! A [`Handler`] translates a task's kind-specific options into a spawned
//! child process (or a no-op, for `group`) and performs kind-specific
//! teardown. Handler selection happens once, at Runner construction time;
//! an unknown `kind` is caught earlier by `config::validate`.

pub mod docker;
pub mod group;
pub mod shell;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::process::Child;

use crate::config::model::{TaskDef, TaskKind};
use crate::errors::Result;

/// A single-fire readiness callback. Cloning shares the same underlying
/// fire-once guard, so the pattern-match path and the natural-exit path can
/// both hold a copy and race harmlessly — only the first caller's closure
/// runs.
#[derive(Clone)]
pub struct OnReady {
    fired: Arc<AtomicBool>,
    callback: Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>,
}

impl OnReady {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            fired: Arc::new(AtomicBool::new(false)),
            callback: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// Fire the callback, exactly once across all clones.
    pub fn fire(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(f) = self.callback.lock().unwrap().take() {
            f();
        }
    }
}

/// The child process a `Handler::execute` call produced, if any.
pub struct ChildHandle {
    pub child: Child,
}

/// Kind-specific strategy for spawning and tearing down a task's child.
pub trait Handler: Send + Sync {
    /// Spawn the child. Returns `None` for `group`, in which case the
    /// handler has already invoked `on_ready` synchronously before
    /// returning.
    fn execute(&self, on_ready: OnReady, merge_stderr: bool) -> Result<Option<ChildHandle>>;

    /// Kind-specific post-termination cleanup. Called by the Runner after
    /// the graceful/forceful termination sequence (or immediately, for a
    /// task that was never alive in the handler's own sense, e.g. docker's
    /// `stop_at_exit`).
    fn on_exit(&self) -> Result<()>;
}

/// Build the handler for a task definition. The kind-specific section
/// presence is already guaranteed by `config::validate`.
pub fn build_handler(task: &TaskDef) -> Result<Box<dyn Handler>> {
    match task.kind {
        TaskKind::Shell => Ok(Box::new(shell::ShellHandler::new(
            task.name.clone(),
            task.shell.clone().expect("validated: shell section present"),
        ))),
        TaskKind::Docker => Ok(Box::new(docker::DockerHandler::new(
            task.name.clone(),
            task.docker
                .clone()
                .expect("validated: docker section present"),
        ))),
        TaskKind::Group => Ok(Box::new(group::GroupHandler)),
    }
}
