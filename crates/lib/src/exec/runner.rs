//! The real [`CommandRunner`], backed by `tokio::process`.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::{CommandRunner, Invocation, RunError};

/// Spawns invocations as child processes with inherited stdio.
///
/// Output streams straight to the operator's terminal; compiler and test logs
/// are the main thing a person watches while the installer runs.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
  timeout: Option<Duration>,
}

impl ProcessRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Kill any child that runs longer than `timeout`.
  pub fn with_timeout(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }
}

impl CommandRunner for ProcessRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    let command_line = invocation.to_string();
    debug!(command = %command_line, cwd = ?invocation.cwd, env = ?invocation.env, "spawning process");

    let mut command = Command::new(&invocation.program);
    command
      .args(&invocation.args)
      .envs(&invocation.env)
      .stdin(Stdio::null())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .kill_on_drop(true);

    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|source| RunError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

    let status = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
          warn!(command = %command_line, "timed out, killing child");
          child.kill().await?;
          return Err(RunError::TimedOut {
            command: command_line,
            after: limit,
          });
        }
      },
      None => child.wait().await?,
    };

    if !status.success() {
      return Err(RunError::Failed {
        command: command_line,
        code: status.code(),
      });
    }

    Ok(())
  }
}
