// src/host.rs

//! Host Process: owns the Supervisor, wires the bus to whichever Observer
//! is attached (or to the built-in no-observer stdout path), and turns
//! Ctrl-C into an orderly shutdown, §5.

use std::path::PathBuf;

use crate::bus::{self, ObserverEndpoint};
use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::file_log::FileLogMirror;
use crate::observer::{ConsoleObserver, Observer};
use crate::supervisor::Supervisor;

pub struct HostOptions {
    pub file_output_dir: Option<PathBuf>,
    /// `--gui` / config `gui:` block present: attach the built-in
    /// `ConsoleObserver` on its own thread instead of the default inline
    /// stdout path. A real GUI build would substitute its own `Observer`
    /// here; this crate ships the console stand-in.
    pub want_observer: bool,
}

/// How the run wound down, so `main` can pick the conventional exit code
/// (spec §6: `0` normal, `130` on interrupt).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Normal,
    Interrupted,
}

/// Run one configuration to completion: admit tasks, service the bus, and
/// return once every task has wound down (via Ctrl-C or the observer
/// raising termination).
pub async fn run(cfg: ConfigFile, options: HostOptions) -> Result<Shutdown> {
    let (host_ep, observer_ep) = bus::channel();

    let supervisor = Supervisor::new(&cfg, host_ep.log_tx, host_ep.status_tx);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let host_terminate_tx = host_ep.terminate_tx;
    let host_terminate_rx = host_ep.terminate_rx;
    let interrupted = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let interrupted_writer = std::sync::Arc::clone(&interrupted);

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                interrupted_writer.store(true, std::sync::atomic::Ordering::SeqCst);
                let _ = host_terminate_tx.send(());
            }
            _ = host_terminate_rx => {}
        }
        let _ = shutdown_tx.send(());
    });

    let consumer = spawn_consumer(observer_ep, options);

    supervisor.run(host_ep.command_rx, shutdown_rx).await?;
    let _ = consumer.await;

    Ok(if interrupted.load(std::sync::atomic::Ordering::SeqCst) {
        Shutdown::Interrupted
    } else {
        Shutdown::Normal
    })
}

fn spawn_consumer(
    observer_ep: ObserverEndpoint,
    options: HostOptions,
) -> tokio::task::JoinHandle<()> {
    if options.want_observer {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to start observer runtime");
            rt.block_on(run_observer(
                observer_ep,
                Box::new(ConsoleObserver::new()),
                options.file_output_dir,
            ));
            let _ = done_tx.send(());
        });
        tokio::spawn(async move {
            let _ = done_rx.await;
        })
    } else {
        tokio::spawn(run_default(observer_ep, options.file_output_dir))
    }
}

/// Drive an attached Observer on its own thread/runtime until it raises
/// termination or the bus closes.
async fn run_observer(
    mut ep: ObserverEndpoint,
    mut observer: Box<dyn Observer>,
    file_output_dir: Option<PathBuf>,
) {
    let mut mirror = open_mirror(file_output_dir);

    loop {
        tokio::select! {
            log = ep.log_rx.recv() => {
                match log {
                    Some(record) => {
                        if let Some(m) = mirror.as_mut() {
                            m.write(&record);
                        }
                        observer.on_log(record);
                    }
                    None => break,
                }
            }
            status = ep.status_rx.recv() => {
                match status {
                    Some(event) => observer.on_status(event),
                    None => break,
                }
            }
            _ = &mut ep.terminate_rx => break,
        }

        if let Some(cmd) = observer.next_command() {
            let _ = ep.command_tx.send(cmd);
        }
        if observer.terminated() {
            let _ = ep.terminate_tx.send(());
            break;
        }
    }
}

/// No observer configured: write log records straight to stdout with the
/// `[task_name]: ` prefix and ignore commands entirely, §4.5.
async fn run_default(mut ep: ObserverEndpoint, file_output_dir: Option<PathBuf>) {
    let mut mirror = open_mirror(file_output_dir);

    loop {
        tokio::select! {
            log = ep.log_rx.recv() => {
                match log {
                    Some(record) => {
                        if let Some(m) = mirror.as_mut() {
                            m.write(&record);
                        }
                        print!("[{}]: {}", record.task_name, record.message);
                        if !record.message.ends_with('\n') {
                            println!();
                        }
                    }
                    None => break,
                }
            }
            status = ep.status_rx.recv() => {
                if status.is_none() {
                    break;
                }
            }
        }
    }
}

fn open_mirror(file_output_dir: Option<PathBuf>) -> Option<FileLogMirror> {
    match file_output_dir.map(FileLogMirror::new) {
        Some(Ok(m)) => Some(m),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "could not set up file-output mirror");
            None
        }
        None => None,
    }
}
