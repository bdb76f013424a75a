// src/handler/docker.rs

use std::process::Stdio;

use tokio::process::Command;

use crate::config::model::DockerOptions;
use crate::errors::{JorunError, Result};
use crate::handler::{ChildHandle, Handler, OnReady};

pub struct DockerHandler {
    task_name: String,
    options: DockerOptions,
    /// The `docker` executable to invoke. Always `"docker"` outside tests;
    /// overridable so tests can point it at a stub script instead of a real
    /// daemon.
    docker_bin: String,
}

impl DockerHandler {
    pub fn new(task_name: String, options: DockerOptions) -> Self {
        Self {
            task_name,
            options,
            docker_bin: "docker".to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_docker_bin(
        task_name: String,
        options: DockerOptions,
        docker_bin: impl Into<String>,
    ) -> Self {
        Self {
            task_name,
            options,
            docker_bin: docker_bin.into(),
        }
    }
}

/// Build the `docker run` argv (everything after the `docker` program name
/// itself) in the order spec §4.1 requires: `--name`, then
/// `docker_arguments`, then one `-e K=V` per environment entry with
/// embedded double-quotes backslash-escaped, then `image`, then
/// `docker_command`. No shell is involved; each token is a separate argv
/// entry.
pub fn build_run_args(options: &DockerOptions) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--name".to_string(), options.container_name.clone()];
    args.extend(options.docker_arguments.iter().cloned());

    for (k, v) in options.environment.iter() {
        let escaped = v.replace('"', "\\\"");
        args.push("-e".to_string());
        args.push(format!("{k}={escaped}"));
    }

    args.push(options.image.clone());
    args.extend(options.docker_command.iter().cloned());
    args
}

impl Handler for DockerHandler {
    fn execute(&self, _on_ready: OnReady, merge_stderr: bool) -> Result<Option<ChildHandle>> {
        let mut cmd = Command::new(&self.docker_bin);
        cmd.args(build_run_args(&self.options));

        if let Some(dir) = &self.options.working_directory {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        crate::handler::shell::new_process_group(&mut cmd);
        if merge_stderr {
            crate::handler::shell::merge_stderr_into_stdout(&mut cmd);
        }

        let child = cmd.spawn().map_err(|source| JorunError::Spawn {
            task: self.task_name.clone(),
            source,
        })?;

        Ok(Some(ChildHandle { child }))
    }

    fn on_exit(&self) -> Result<()> {
        if !self.options.stop_at_exit {
            return Ok(());
        }
        let status = std::process::Command::new(&self.docker_bin)
            .arg("stop")
            .arg(&self.options.container_name)
            .status();
        match status {
            Ok(s) if s.success() => Ok(()),
            Ok(s) => {
                tracing::warn!(
                    container = %self.options.container_name,
                    code = ?s.code(),
                    "docker stop exited non-zero"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    container = %self.options.container_name,
                    error = %e,
                    "failed to run docker stop"
                );
                Ok(())
            }
        }
    }
}
