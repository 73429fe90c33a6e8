//! Source working copy: clone on first run, pull afterwards.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::exec::{CommandRunner, Invocation, RunError};

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("failed to clone '{remote}': {source}")]
  Clone {
    remote: String,
    #[source]
    source: RunError,
  },

  #[error("failed to update working copy at '{}': {source}", .path.display())]
  Pull {
    path: std::path::PathBuf,
    #[source]
    source: RunError,
  },
}

/// Which of the two transitions a sync performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
  Cloned,
  Pulled,
}

/// Bring the working copy at `path` up to date with `remote`.
///
/// The pull runs with the child's working directory set to `path`; the
/// installer's own working directory is never changed.
pub async fn sync_source(
  runner: &impl CommandRunner,
  git: &str,
  remote: &str,
  path: &Path,
) -> Result<SyncAction, SyncError> {
  if path.exists() {
    info!(path = %path.display(), "working copy exists, pulling latest changes");
    let pull = Invocation::new(git).arg("pull").current_dir(path);
    runner.run(&pull).await.map_err(|source| SyncError::Pull {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(SyncAction::Pulled)
  } else {
    info!(remote, path = %path.display(), "cloning repository");
    let clone = Invocation::new(git).arg("clone").arg(remote).arg(path);
    runner.run(&clone).await.map_err(|source| SyncError::Clone {
      remote: remote.to_string(),
      source,
    })?;
    Ok(SyncAction::Cloned)
  }
}
