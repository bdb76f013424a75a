// src/lib.rs

pub mod bus;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod file_log;
pub mod handler;
pub mod host;
pub mod logging;
pub mod observer;
pub mod runner;
pub mod scanner;
pub mod supervisor;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::errors::Result;
use crate::host::{HostOptions, Shutdown};

/// High-level entry point used by `main.rs`: load and validate the
/// configuration, then hand it to the Host Process to admit, run and tear
/// down every task.
pub async fn run(args: CliArgs) -> Result<Shutdown> {
    let cfg = load_and_validate(&args.configuration_file)?;

    info!(
        tasks = cfg.tasks.len(),
        config = %args.configuration_file.display(),
        "configuration loaded"
    );

    let want_observer = args
        .observer_override()
        .unwrap_or_else(|| cfg.gui.is_some());

    let options = HostOptions {
        file_output_dir: args.file_output.clone(),
        want_observer,
    };

    host::run(cfg, options).await
}
