// src/runner.rs

//! Task Runner: wires a Handler and the Scanner together, §4.3.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use regex::Regex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::bus::LogSender;
use crate::config::model::TaskDef;
use crate::errors::Result;
use crate::handler::{Handler, OnReady};
use crate::scanner;

/// Default graceful-termination window before escalating to SIGKILL.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStatus {
    Starting,
    Running,
    Ready,
    Exited,
    Stopping,
    Stopped,
}

/// One live supervision instance wrapping a Task's execution.
pub struct Runner {
    name: String,
    handler: Arc<dyn Handler>,
    completion_pattern: Option<Regex>,
    pattern_in_stderr: bool,
    log_tx: LogSender,
    status: Arc<Mutex<RunnerStatus>>,
    stop_tx: Option<oneshot::Sender<Duration>>,
}

impl Runner {
    pub fn new(task: &TaskDef, log_tx: LogSender) -> Result<Self> {
        let handler: Arc<dyn Handler> = Arc::from(crate::handler::build_handler(task)?);
        // Print-and-scan mode is selected purely by the presence of a
        // completion_pattern (§4.2); run_mode does not gate it; `indefinite`
        // tasks with a pattern still become ready on first match and keep
        // running afterward (§8 boundary behavior), and a pattern miss is
        // reported regardless of run_mode.
        let completion_pattern = match &task.completion_pattern {
            Some(p) => Some(Regex::new(p).map_err(|e| {
                crate::errors::JorunError::Configuration(format!(
                    "task '{}': invalid completion_pattern: {e}",
                    task.name
                ))
            })?),
            None => None,
        };

        Ok(Self {
            name: task.name.clone(),
            handler,
            completion_pattern,
            pattern_in_stderr: task.pattern_in_stderr,
            log_tx,
            status: Arc::new(Mutex::new(RunnerStatus::Starting)),
            stop_tx: None,
        })
    }

    pub fn status(&self) -> RunnerStatus {
        *self.status.lock().unwrap()
    }

    /// Start the task. `on_ready` is fired at most once, on first pattern
    /// match or natural exit. Returns a join handle the caller can await to
    /// learn of spawn errors or a pattern-miss.
    pub fn start(&mut self, on_ready: OnReady) -> JoinHandle<Result<()>> {
        let (stop_tx, stop_rx) = oneshot::channel::<Duration>();
        self.stop_tx = Some(stop_tx);

        let handler = Arc::clone(&self.handler);
        let pattern = self.completion_pattern.clone();
        let merge_stderr = self.pattern_in_stderr;
        let name = self.name.clone();
        let log_tx = self.log_tx.clone();
        let status = Arc::clone(&self.status);

        tokio::spawn(async move {
            *status.lock().unwrap() = RunnerStatus::Starting;

            let child_handle = match handler.execute(on_ready.clone(), merge_stderr) {
                Ok(handle) => handle,
                Err(e) => {
                    *status.lock().unwrap() = RunnerStatus::Stopped;
                    return Err(e);
                }
            };

            let Some(mut handle) = child_handle else {
                // group: handler already fired on_ready synchronously.
                *status.lock().unwrap() = RunnerStatus::Exited;
                return Ok(());
            };

            *status.lock().unwrap() = RunnerStatus::Running;

            let pid = handle.child.id();
            let stdout = handle.child.stdout.take();
            let stderr = if merge_stderr { None } else { handle.child.stderr.take() };

            let scan_fut = scanner::run(name.clone(), stdout, stderr, pattern, on_ready.clone(), log_tx);
            tokio::pin!(scan_fut);
            tokio::pin!(stop_rx);

            tokio::select! {
                scan_result = &mut scan_fut => {
                    let wait_result = handle.child.wait().await;
                    *status.lock().unwrap() = RunnerStatus::Exited;
                    // Natural-exit fallback: no-op if the scanner already fired it on a
                    // pattern match. On a pattern-miss the scanner never fired, and it
                    // must stay unfired here too, or a failed task would wrongly
                    // unblock its dependents.
                    if scan_result.is_ok() {
                        on_ready.fire();
                    }
                    wait_result.map_err(crate::errors::JorunError::Io)?;
                    scan_result
                }
                timeout = &mut stop_rx => {
                    *status.lock().unwrap() = RunnerStatus::Stopping;
                    if let Ok(timeout) = timeout {
                        if let Err(e) = handler.on_exit() {
                            tracing::debug!(task = %name, error = %e, "handler teardown error");
                        }
                        if let Some(pid) = pid {
                            terminate(pid, timeout).await;
                        }
                    }
                    let _ = handle.child.wait().await;
                    *status.lock().unwrap() = RunnerStatus::Stopped;
                    Ok(())
                }
            }
        })
    }

    /// Request termination. If the child is alive, sends a graceful signal
    /// and escalates to a forceful kill after `timeout`. A no-op if the
    /// runner was never started or has already stopped.
    pub fn stop(&mut self, timeout: Duration) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(timeout);
        }
    }
}

#[cfg(unix)]
async fn terminate(pid: u32, timeout: Duration) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let pgid = Pid::from_raw(pid as i32);
    let _ = signal::killpg(pgid, Signal::SIGTERM);

    let poll_interval = Duration::from_millis(50);
    let mut waited = Duration::ZERO;
    while waited < timeout {
        tokio::time::sleep(poll_interval).await;
        waited += poll_interval;
        if signal::kill(pgid, None).is_err() {
            return; // process group gone
        }
    }
    let _ = signal::killpg(pgid, Signal::SIGKILL);
}

#[cfg(windows)]
async fn terminate(pid: u32, timeout: Duration) {
    let _ = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T"])
        .status()
        .await;

    tokio::time::sleep(timeout).await;

    let _ = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .status()
        .await;
}
