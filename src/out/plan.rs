//! Validation and identity resolution for `out`

use crate::config::{OutConfig, OutParams};
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{PullRequest, RepoName, Version};
use crate::workspace::Workspace;
use tracing::{debug, info};

fn check_exists(workspace: &dyn Workspace, field: &'static str, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) if !workspace.exists(path) => Err(Error::MissingFile {
            field,
            path: path.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validate params and make sure every file they reference exists
///
/// Runs before any network call, so a bad configuration never leaves a
/// partial result behind.
pub fn validate_out(params: OutParams, workspace: &dyn Workspace) -> Result<OutConfig> {
    let config = OutConfig::validate(params)?;

    check_exists(workspace, "path", Some(&config.path))?;
    check_exists(workspace, "comment", config.comment.as_deref())?;
    check_exists(
        workspace,
        "merge.commit_msg",
        config.merge_commit_msg.as_deref(),
    )?;
    check_exists(workspace, "assignee_file", config.assignee_file.as_deref())?;
    check_exists(workspace, "label_file", config.label_file.as_deref())?;

    debug!(path = %config.path, status = %config.status, "validated params");
    Ok(config)
}

/// Commit and PR a build result belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Commit statuses are published against
    pub sha: String,
    /// PR id as recorded in the working tree
    pub pr_id: Option<String>,
    /// The PR, when the build is tied to one
    pub pull_request: Option<PullRequest>,
}

impl Identity {
    /// Version to report for this identity
    pub fn version(&self) -> Version {
        match self.pr_id {
            Some(ref id) => Version::for_pull_request(id.clone(), self.sha.clone()),
            None => Version::for_commit(self.sha.clone()),
        }
    }

    /// PR number, when tied to a PR
    pub fn pull_number(&self) -> Option<u64> {
        self.pull_request.as_ref().map(|pr| pr.number)
    }
}

/// Resolve the effective commit and PR for a build
///
/// If the build checked out the PR's test-merge commit, statuses go to the
/// PR head instead, since that is the commit reviewers see.
pub async fn resolve_identity(
    platform: &dyn PlatformService,
    repo: &RepoName,
    local_sha: String,
    pr_id: Option<String>,
) -> Result<Identity> {
    let Some(pr_id) = pr_id else {
        debug!(sha = %local_sha, "no pull request id, using commit only");
        return Ok(Identity {
            sha: local_sha,
            pr_id: None,
            pull_request: None,
        });
    };

    let number: u64 = pr_id.parse().map_err(|_| {
        Error::Config(format!("pull request id \"{pr_id}\" is not a number"))
    })?;
    let pr = platform.get_pull_request(repo, number).await?;

    let sha = if pr.merge_commit_sha.as_deref() == Some(local_sha.as_str()) {
        info!(
            pr_number = number,
            merge_sha = %local_sha,
            head_sha = %pr.head_sha,
            "build used merge commit, publishing against PR head"
        );
        pr.head_sha.clone()
    } else {
        local_sha
    };

    Ok(Identity {
        sha,
        pr_id: Some(pr_id),
        pull_request: Some(pr),
    })
}
