//! Shared harness for driving a `Supervisor` end-to-end against real `sh -c`
//! child processes, the way the seed scenarios in spec §8 are phrased.

#![allow(dead_code)]

use std::time::Duration;

use jorun::bus::{LogRecord, TaskCommand, TaskStatus, TaskStatusEvent};
use jorun::config::ConfigFile;
use jorun::supervisor::Supervisor;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Harness {
    pub log_rx: mpsc::UnboundedReceiver<LogRecord>,
    status_rx: mpsc::UnboundedReceiver<TaskStatusEvent>,
    command_tx: mpsc::UnboundedSender<TaskCommand>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<jorun::errors::Result<()>>,
}

impl Harness {
    pub fn spawn(cfg: &ConfigFile) -> Self {
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let supervisor = Supervisor::new(cfg, log_tx, status_tx);
        let join = tokio::spawn(supervisor.run(command_rx, shutdown_rx));

        Self {
            log_rx,
            status_rx,
            command_tx,
            shutdown_tx: Some(shutdown_tx),
            join,
        }
    }

    /// Wait for the next status event, with a generous timeout so a hung
    /// scheduler fails the test instead of the suite itself.
    pub async fn next_status(&mut self) -> TaskStatusEvent {
        tokio::time::timeout(EVENT_TIMEOUT, self.status_rx.recv())
            .await
            .expect("timed out waiting for a status event")
            .expect("status channel closed unexpectedly")
    }

    /// Non-blocking poll: `None` if nothing is queued right now.
    pub fn try_next_status(&mut self) -> Option<TaskStatusEvent> {
        self.status_rx.try_recv().ok()
    }

    pub fn send_command(&self, name: &str, command: jorun::bus::CommandKind) {
        let _ = self.command_tx.send(TaskCommand {
            name: name.to_string(),
            command,
        });
    }

    /// Raise termination and collect status events until `expected` task
    /// names have each reported `Stopped`, in the order they arrive.
    pub async fn shutdown_and_collect_stopped(mut self, expected: usize) -> Vec<String> {
        let _ = self.shutdown_tx.take().unwrap().send(());
        let mut stopped = Vec::new();
        while stopped.len() < expected {
            let ev = self.next_status().await;
            if ev.status == TaskStatus::Stopped {
                stopped.push(ev.name);
            }
        }
        let _ = tokio::time::timeout(EVENT_TIMEOUT, self.join).await;
        stopped
    }
}
