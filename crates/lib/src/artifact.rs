//! Pinned dependency archive: download and extraction.
//!
//! Presence on disk is the only state. The archive file existing means the
//! download happened; the stem directory existing means extraction happened.
//! Re-running after a partial failure therefore resumes where it stopped
//! instead of fetching hundreds of megabytes again.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ToolSpec;
use crate::consts::{BOOST_HOST, BOOST_NAME, BOOST_VERSION};
use crate::exec::{CommandRunner, Invocation, RunError};
use crate::util::hash::{digest_matches, hash_file};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to download {url}: {source}")]
  Download {
    url: String,
    #[source]
    source: RunError,
  },

  #[error("failed to extract {archive}: {source}")]
  Extract {
    archive: PathBuf,
    #[source]
    source: RunError,
  },

  /// The archive on disk does not match the pinned SHA-256, even after a fresh download.
  #[error("hash mismatch for {archive}: expected {expected}, got {actual}")]
  HashMismatch {
    archive: PathBuf,
    expected: String,
    actual: String,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// A third-party source archive identified by an exact version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinnedArtifact {
  pub name: String,
  pub version: String,
  /// Release host; the archive lives under `https://archives.<host>/`.
  pub host: String,
  /// Optional lowercase hex SHA-256 of the archive.
  pub sha256: Option<String>,
}

impl Default for PinnedArtifact {
  fn default() -> Self {
    Self {
      name: BOOST_NAME.to_string(),
      version: BOOST_VERSION.to_string(),
      host: BOOST_HOST.to_string(),
      sha256: None,
    }
  }
}

impl PinnedArtifact {
  /// Directory name the archive unpacks to, e.g. `boost_1_81_0`.
  pub fn stem(&self) -> String {
    format!("{}_{}", self.name, self.version.replace('.', "_"))
  }

  pub fn archive_filename(&self) -> String {
    format!("{}.tar.gz", self.stem())
  }

  pub fn url(&self) -> String {
    format!(
      "https://archives.{}/release/{}/source/{}",
      self.host,
      self.version,
      self.archive_filename()
    )
  }
}

/// Where the artifact ended up and which transitions this run performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
  /// Absolute path of the extracted tree.
  pub root: PathBuf,
  pub downloaded: bool,
  pub extracted: bool,
}

/// Make sure `artifact` is downloaded and extracted inside `work_dir`.
///
/// Each step is skipped when its output already exists. The downloader writes
/// to `<filename>.part`, which is renamed only after the download succeeded
/// (and verified, when pinned), so a failed download never leaves an archive
/// that later runs would trust. When the artifact carries a SHA-256, an
/// archive already on disk is verified first; on mismatch both the archive and
/// the tree extracted from it are discarded and fetched again.
pub async fn ensure_artifact(
  runner: &impl CommandRunner,
  artifact: &PinnedArtifact,
  tools: &ToolSpec,
  work_dir: &Path,
) -> Result<FetchedArtifact, FetchError> {
  let work_dir = std::path::absolute(work_dir)?;
  let filename = artifact.archive_filename();
  let archive = work_dir.join(&filename);
  let root = work_dir.join(artifact.stem());

  if archive.exists() {
    match &artifact.sha256 {
      Some(expected) => {
        let actual = hash_file(&archive)?;
        if digest_matches(expected, &actual) {
          debug!(archive = %archive.display(), "archive present and verified, skipping download");
        } else {
          warn!(archive = %archive.display(), expected = %expected, actual = %actual, "archive hash mismatch, fetching again");
          std::fs::remove_file(&archive)?;
          if root.exists() {
            debug!(dir = %root.display(), "removing tree extracted from mismatched archive");
            std::fs::remove_dir_all(&root)?;
          }
        }
      }
      None => debug!(archive = %archive.display(), "archive already exists, skipping download"),
    }
  }

  let mut downloaded = false;
  if !archive.exists() {
    download(runner, artifact, tools, &work_dir, &archive).await?;
    downloaded = true;
  }

  let mut extracted = false;
  if root.exists() {
    debug!(dir = %root.display(), "extracted directory already exists, skipping extraction");
  } else {
    info!(archive = %archive.display(), "extracting archive");

    let extract = Invocation::new(tools.extractor.as_str())
      .arg("-xzf")
      .arg(&filename)
      .current_dir(&work_dir);
    runner
      .run(&extract)
      .await
      .map_err(|source| FetchError::Extract {
        archive: archive.clone(),
        source,
      })?;
    extracted = true;
  }

  info!(dir = %root.display(), "dependency root ready");
  Ok(FetchedArtifact {
    root,
    downloaded,
    extracted,
  })
}

/// Fetch into `<archive>.part`, verify, then move into place.
async fn download(
  runner: &impl CommandRunner,
  artifact: &PinnedArtifact,
  tools: &ToolSpec,
  work_dir: &Path,
  archive: &Path,
) -> Result<(), FetchError> {
  let url = artifact.url();
  let partial_name = format!("{}.part", artifact.archive_filename());
  let partial = work_dir.join(&partial_name);
  info!(url = %url, "downloading archive");

  let download = Invocation::new(tools.downloader.as_str())
    .arg("-O")
    .arg(&partial_name)
    .arg(&url)
    .current_dir(work_dir);
  if let Err(source) = runner.run(&download).await {
    discard_partial(&partial);
    return Err(FetchError::Download { url, source });
  }

  if let Some(expected) = &artifact.sha256 {
    let actual = hash_file(&partial)?;
    if !digest_matches(expected, &actual) {
      discard_partial(&partial);
      return Err(FetchError::HashMismatch {
        archive: archive.to_path_buf(),
        expected: expected.clone(),
        actual,
      });
    }
  }

  std::fs::rename(&partial, archive)?;
  Ok(())
}

fn discard_partial(partial: &Path) {
  match std::fs::remove_file(partial) {
    Ok(()) => debug!(file = %partial.display(), "removed partial download"),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
    Err(e) => warn!(file = %partial.display(), error = %e, "failed to remove partial download"),
  }
}
