// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `jorun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jorun",
    version,
    about = "Run a DAG of shell, docker and group tasks, gated on their dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the YAML configuration file.
    pub configuration_file: PathBuf,

    /// Logging level filter. If omitted, `JORUN_LOG` or a default of `info`
    /// is used (`logging::init_logging`).
    #[arg(long, value_enum)]
    pub level: Option<LogLevel>,

    /// Mirror per-task logs into this directory, one file per task run.
    #[arg(long, value_name = "DIR")]
    pub file_output: Option<PathBuf>,

    /// Force the observer on.
    #[arg(long, conflicts_with = "no_gui")]
    pub gui: bool,

    /// Force the observer off.
    #[arg(long)]
    pub no_gui: bool,
}

impl CliArgs {
    /// `None` means "decide from the configuration's `gui:` block".
    pub fn observer_override(&self) -> Option<bool> {
        if self.gui {
            Some(true)
        } else if self.no_gui {
            Some(false)
        } else {
            None
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
