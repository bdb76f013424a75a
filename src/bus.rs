// src/bus.rs

//! The typed message bus crossing the host/observer boundary: §4.5/§4.6.
//!
//! Channels are many-to-one FIFO; the host is the sole consumer of commands,
//! the observer is the sole consumer of logs and statuses. The termination
//! signal is bidirectional: each side gets its own one-shot half so either
//! can raise it and the other reacts.

use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
    Debug,
}

/// A log record crossing the boundary: `{timestamp, level, task_name,
/// stream, message_text}`.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub level: LogLevel,
    pub task_name: String,
    pub stream: StreamKind,
    pub message: String,
}

impl LogRecord {
    pub fn new(task_name: impl Into<String>, stream: StreamKind, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now(),
            level: LogLevel::Info,
            task_name: task_name.into(),
            stream,
            message: message.into(),
        }
    }

    pub fn error(task_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now(),
            level: LogLevel::Error,
            task_name: task_name.into(),
            stream: StreamKind::Stderr,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Started,
    Stopped,
    Completed,
}

#[derive(Debug, Clone)]
pub struct TaskStatusEvent {
    pub name: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct TaskCommand {
    pub name: String,
    pub command: CommandKind,
}

pub type LogSender = mpsc::UnboundedSender<LogRecord>;
pub type LogReceiver = mpsc::UnboundedReceiver<LogRecord>;
pub type StatusSender = mpsc::UnboundedSender<TaskStatusEvent>;
pub type StatusReceiver = mpsc::UnboundedReceiver<TaskStatusEvent>;
pub type CommandSender = mpsc::UnboundedSender<TaskCommand>;
pub type CommandReceiver = mpsc::UnboundedReceiver<TaskCommand>;

/// The host's half of the bus: the Supervisor's execution context.
pub struct HostEndpoint {
    pub log_tx: LogSender,
    pub status_tx: StatusSender,
    pub command_rx: CommandReceiver,
    /// Raise to tell the observer to begin its own shutdown.
    pub terminate_tx: oneshot::Sender<()>,
    /// Resolves when the observer raises termination first.
    pub terminate_rx: oneshot::Receiver<()>,
}

/// The observer's half of the bus: a UI, TUI, or the built-in console sink.
pub struct ObserverEndpoint {
    pub log_rx: LogReceiver,
    pub status_rx: StatusReceiver,
    pub command_tx: CommandSender,
    /// Raise to tell the host to begin its own shutdown.
    pub terminate_tx: oneshot::Sender<()>,
    /// Resolves when the host raises termination first.
    pub terminate_rx: oneshot::Receiver<()>,
}

/// Build a connected pair of endpoints.
pub fn channel() -> (HostEndpoint, ObserverEndpoint) {
    let (log_tx, log_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (host_terminate_tx, observer_terminate_rx) = oneshot::channel();
    let (observer_terminate_tx, host_terminate_rx) = oneshot::channel();

    (
        HostEndpoint {
            log_tx,
            status_tx,
            command_rx,
            terminate_tx: host_terminate_tx,
            terminate_rx: host_terminate_rx,
        },
        ObserverEndpoint {
            log_rx,
            status_rx,
            command_tx,
            terminate_tx: observer_terminate_tx,
            terminate_rx: observer_terminate_rx,
        },
    )
}
