// src/handler/shell.rs

use std::process::Stdio;

use tokio::process::Command;

use crate::config::model::{ShellCommand, ShellOptions};
use crate::errors::{JorunError, Result};
use crate::handler::{ChildHandle, Handler, OnReady};

pub struct ShellHandler {
    task_name: String,
    options: ShellOptions,
}

impl ShellHandler {
    pub fn new(task_name: String, options: ShellOptions) -> Self {
        Self { task_name, options }
    }
}

impl Handler for ShellHandler {
    fn execute(&self, _on_ready: OnReady, merge_stderr: bool) -> Result<Option<ChildHandle>> {
        let mut cmd = match &self.options.command {
            ShellCommand::Line(line) => {
                if cfg!(windows) {
                    let mut c = Command::new("cmd");
                    c.arg("/C").arg(line);
                    c
                } else {
                    let mut c = Command::new("sh");
                    c.arg("-c").arg(line);
                    c
                }
            }
            ShellCommand::Argv(argv) => {
                let mut iter = argv.iter();
                let program = iter
                    .next()
                    .ok_or_else(|| JorunError::Configuration("empty shell command argv".into()))?;
                let mut c = Command::new(program);
                c.args(iter);
                c
            }
        };

        if let Some(dir) = &self.options.working_directory {
            cmd.current_dir(dir);
        }
        for (k, v) in self.options.environment.iter() {
            cmd.env(k, v);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        new_process_group(&mut cmd);
        if merge_stderr {
            merge_stderr_into_stdout(&mut cmd);
        }

        let child = cmd.spawn().map_err(|source| JorunError::Spawn {
            task: self.task_name.clone(),
            source,
        })?;

        Ok(Some(ChildHandle { child }))
    }

    fn on_exit(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
pub(crate) fn new_process_group(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(windows)]
pub(crate) fn new_process_group(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
}

/// Dup stderr onto stdout inside the child before exec, so the scanner only
/// has one stream to read and sees stderr lines interleaved in the order the
/// child wrote them. Only meaningful on unix; on Windows stderr remains a
/// separate piped stream.
#[cfg(unix)]
pub(crate) fn merge_stderr_into_stdout(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::dup2(1, 2)
                .map(|_| ())
                .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
        });
    }
}

#[cfg(windows)]
pub(crate) fn merge_stderr_into_stdout(_cmd: &mut Command) {}
