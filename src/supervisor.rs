// src/supervisor.rs

//! Supervisor: dependency-gated admission and runner lifecycle, §4.4.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::bus::{CommandKind, CommandReceiver, LogRecord, LogSender, StatusSender, TaskCommand, TaskStatus, TaskStatusEvent};
use crate::config::model::ConfigFile;
use crate::dag::DagGraph;
use crate::errors::Result;
use crate::handler::OnReady;
use crate::runner::{Runner, DEFAULT_STOP_TIMEOUT};

enum SupervisorEvent {
    TaskReady(String),
    TaskExited(String, Result<()>),
}

pub struct Supervisor {
    definitions: BTreeMap<String, crate::config::model::TaskDef>,
    graph: DagGraph,
    pending: HashSet<String>,
    running: HashMap<String, Runner>,
    running_order: Vec<String>,
    completed: HashSet<String>,
    log_tx: LogSender,
    status_tx: StatusSender,
    internal_tx: mpsc::UnboundedSender<SupervisorEvent>,
    internal_rx: mpsc::UnboundedReceiver<SupervisorEvent>,
    idle_notice_logged: bool,
}

impl Supervisor {
    pub fn new(cfg: &ConfigFile, log_tx: LogSender, status_tx: StatusSender) -> Self {
        let graph = DagGraph::from_config(cfg);
        let pending = cfg.tasks.keys().cloned().collect();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        Self {
            definitions: cfg.tasks.clone(),
            graph,
            pending,
            running: HashMap::new(),
            running_order: Vec::new(),
            completed: HashSet::new(),
            log_tx,
            status_tx,
            internal_tx,
            internal_rx,
            idle_notice_logged: false,
        }
    }

    /// Drive the supervisor to completion: run the initial admission wave,
    /// then process readiness/exit events and incoming commands until
    /// `shutdown_rx` resolves, then tear every live Runner down in reverse
    /// insertion order.
    pub async fn run(
        mut self,
        mut command_rx: CommandReceiver,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()> {
        self.admit();
        self.check_idle();

        loop {
            tokio::select! {
                event = self.internal_rx.recv() => {
                    match event {
                        Some(SupervisorEvent::TaskReady(name)) => self.handle_ready(name),
                        Some(SupervisorEvent::TaskExited(name, result)) => self.handle_exited(name, result),
                        None => {}
                    }
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {}
                    }
                }
                _ = &mut shutdown_rx => {
                    break;
                }
            }
        }

        self.shutdown(DEFAULT_STOP_TIMEOUT).await;
        Ok(())
    }

    fn admit(&mut self) {
        let ready: Vec<String> = self
            .pending
            .iter()
            .filter(|name| {
                self.graph
                    .dependencies_of(name)
                    .iter()
                    .all(|dep| self.completed.contains(dep))
            })
            .cloned()
            .collect();

        if ready.is_empty() {
            return;
        }

        for name in ready {
            self.pending.remove(&name);
            self.start_runner(&name, false);
        }
    }

    fn start_runner(&mut self, name: &str, manual: bool) {
        let Some(task) = self.definitions.get(name) else {
            return;
        };

        let mut runner = match Runner::new(task, self.log_tx.clone()) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(task = %name, error = %e, "failed to construct runner");
                let _ = self.log_tx.send(LogRecord::error(name, e.to_string()));
                return;
            }
        };

        let on_ready = if manual {
            // Manual restart: a no-op callback so it doesn't re-trigger dependents.
            OnReady::new(|| {})
        } else {
            let tx = self.internal_tx.clone();
            let owned_name = name.to_string();
            OnReady::new(move || {
                let _ = tx.send(SupervisorEvent::TaskReady(owned_name));
            })
        };

        let join = runner.start(on_ready);

        let exit_tx = self.internal_tx.clone();
        let owned_name = name.to_string();
        tokio::spawn(async move {
            let result = match join.await {
                Ok(result) => result,
                Err(e) => Err(crate::errors::JorunError::Other(e.into())),
            };
            let _ = exit_tx.send(SupervisorEvent::TaskExited(owned_name, result));
        });

        self.running.insert(name.to_string(), runner);
        self.running_order.push(name.to_string());
        let _ = self.status_tx.send(TaskStatusEvent {
            name: name.to_string(),
            status: TaskStatus::Started,
        });
    }

    fn handle_ready(&mut self, name: String) {
        if self.completed.insert(name.clone()) {
            let _ = self.status_tx.send(TaskStatusEvent {
                name,
                status: TaskStatus::Completed,
            });
            self.admit();
        }
    }

    fn handle_exited(&mut self, name: String, result: Result<()>) {
        self.running.remove(&name);
        if let Err(e) = result {
            tracing::error!(task = %name, error = %e, "task exited with error");
            let _ = self.log_tx.send(LogRecord::error(&name, e.to_string()));
        }
        let _ = self.status_tx.send(TaskStatusEvent {
            name,
            status: TaskStatus::Stopped,
        });
        self.check_idle();
    }

    /// Log once, at `info`, when nothing is running and no pending task can
    /// ever become admitted again (every completion is monotonic, so if
    /// admission just ran and `pending` is still non-empty, it's stuck on a
    /// dependency that errored out without completing). Purely a log
    /// emission — it does not change the Supervisor's state or behavior:
    /// the event loop still services commands and live runners exactly as
    /// before.
    fn check_idle(&mut self) {
        if self.idle_notice_logged || !self.running.is_empty() || self.pending.is_empty() {
            return;
        }
        self.idle_notice_logged = true;
        let stuck: Vec<&str> = self.pending.iter().map(String::as_str).collect();
        tracing::info!(tasks = ?stuck, "no runners left and no pending task's dependencies can still be satisfied");
    }

    fn handle_command(&mut self, cmd: TaskCommand) {
        match cmd.command {
            CommandKind::Start => {
                if self.running.contains_key(&cmd.name) {
                    return; // no-op: a Runner already exists in a non-terminal state.
                }
                if !self.definitions.contains_key(&cmd.name) {
                    tracing::warn!(task = %cmd.name, "START for unknown task ignored");
                    return;
                }
                self.start_runner(&cmd.name, true);
            }
            CommandKind::Stop => {
                if let Some(runner) = self.running.get_mut(&cmd.name) {
                    runner.stop(DEFAULT_STOP_TIMEOUT);
                }
            }
        }
    }

    /// LIFO teardown: stop the most-recently-admitted live Runner first and
    /// wait for it to report stopped before moving to the previous one,
    /// while still servicing readiness/exit events from the others.
    async fn shutdown(&mut self, timeout: Duration) {
        let order: Vec<String> = self.running_order.iter().rev().cloned().collect();

        for name in order {
            if !self.running.contains_key(&name) {
                continue;
            }
            if let Some(runner) = self.running.get_mut(&name) {
                runner.stop(timeout);
            }

            loop {
                match self.internal_rx.recv().await {
                    Some(SupervisorEvent::TaskExited(n, result)) => {
                        let done = n == name;
                        self.handle_exited(n, result);
                        if done {
                            break;
                        }
                    }
                    Some(SupervisorEvent::TaskReady(n)) => self.handle_ready(n),
                    None => break,
                }
            }
        }
    }
}
