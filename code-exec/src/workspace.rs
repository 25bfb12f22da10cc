use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::Error, Result};

/// Shared directory in which every request writes its source and build artifacts
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open the workspace, creating the directory (and any parents) if it is absent
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            Error::Workspace(format!(
                "Failed to create workspace directory {}: {}",
                root.display(),
                e
            ))
        })?;
        // Absolute, so compiled artifacts can be run as programs from any cwd
        let root = fs::canonicalize(&root).await?;
        debug!("Using workspace directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh identifier used to namespace one request's files
    pub fn new_request_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Removes a request's files when dropped.
///
/// Paths are tracked before they are created, so anything a failed or cancelled request
/// managed to write is still removed. Paths that never materialised are skipped.
#[derive(Debug, Default)]
pub struct ArtifactGuard {
    paths: Vec<PathBuf>,
}

impl ArtifactGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every tracked path that still exists. Failures are logged, never returned.
    pub fn cleanup(&mut self) {
        for path in self.paths.drain(..) {
            remove_artifact(&path);
        }
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_artifact(path: &Path) {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return;
    };

    let removed = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match removed {
        Ok(()) => debug!("Removed artifact {}", path.display()),
        Err(e) => warn!("Failed to clean up artifact {}: {}", path.display(), e),
    }
}
