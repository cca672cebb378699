//! Access to the destination directory handed to `out`
//!
//! All paths are relative to the destination. The working tree is only read.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Git config key the `in` step records the PR number under
pub const PULL_REQUEST_ID_KEY: &str = "pullrequest.id";

/// Filesystem and git capability used by the output stage
pub trait Workspace: Send + Sync {
    /// Whether `relative` exists
    fn exists(&self, relative: &str) -> bool;

    /// Read `relative` as UTF-8 text
    fn read_to_string(&self, relative: &str) -> Result<String>;

    /// Commit checked out in the working tree at `relative`
    fn head_sha(&self, relative: &str) -> Result<String>;

    /// PR number recorded in the working tree at `relative`, if any
    fn pull_request_id(&self, relative: &str) -> Result<Option<String>>;
}

/// Workspace rooted at a directory on local disk
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    /// Create a workspace rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn open_repo(&self, relative: &str) -> Result<gix::Repository> {
        let path = self.resolve(relative);
        gix::open(&path)
            .map_err(|e| Error::Git(format!("failed to open {}: {e}", path.display())))
    }
}

impl Workspace for LocalWorkspace {
    fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).exists()
    }

    fn read_to_string(&self, relative: &str) -> Result<String> {
        let path = self.resolve(relative);
        debug!(path = %path.display(), "reading file");
        Ok(fs::read_to_string(path)?)
    }

    fn head_sha(&self, relative: &str) -> Result<String> {
        let repo = self.open_repo(relative)?;
        let id = repo
            .head_id()
            .map_err(|e| Error::Git(format!("failed to resolve HEAD: {e}")))?;
        Ok(id.to_string().trim().to_string())
    }

    fn pull_request_id(&self, relative: &str) -> Result<Option<String>> {
        let repo = self.open_repo(relative)?;
        let id = repo
            .config_snapshot()
            .string(PULL_REQUEST_ID_KEY)
            .map(|value| value.to_string().trim().to_string())
            .filter(|value| !value.is_empty());
        debug!(id = ?id, "read pull request id");
        Ok(id)
    }
}
