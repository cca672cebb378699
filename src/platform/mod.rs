//! Code-review platform services
//!
//! Provides the interface the output stage uses to talk to GitHub.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    Comment, MergeRequest, PullRequest, RepoName, Review, ReviewState, StatusUpdate,
};
use async_trait::async_trait;
use tracing::debug;

/// Platform service trait for PR operations
///
/// Every method takes the repository explicitly: dependency checks read PRs
/// from other repositories than the one the resource is configured for.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch a PR
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest>;

    /// List reviews on a PR
    async fn list_reviews(&self, repo: &RepoName, number: u64) -> Result<Vec<Review>>;

    /// List conversation comments on a PR
    async fn list_issue_comments(&self, repo: &RepoName, number: u64) -> Result<Vec<Comment>>;

    /// Create a commit status
    async fn create_status(&self, repo: &RepoName, status: &StatusUpdate) -> Result<()>;

    /// Create a comment on a PR
    async fn create_comment(&self, repo: &RepoName, number: u64, body: &str) -> Result<()>;

    /// Add assignees to a PR
    async fn add_assignees(&self, repo: &RepoName, number: u64, assignees: &[String])
    -> Result<()>;

    /// Add labels to a PR
    async fn add_labels(&self, repo: &RepoName, number: u64, labels: &[String]) -> Result<()>;

    /// Merge a PR
    ///
    /// Errors keep the HTTP status so callers can tell 4xx from 5xx failures.
    async fn merge_pull_request(&self, repo: &RepoName, request: &MergeRequest) -> Result<()>;
}

/// Whether any review on the PR approves it
///
/// Reviews are read from the PR's base repository.
pub async fn is_review_approved(platform: &dyn PlatformService, pr: &PullRequest) -> Result<bool> {
    let repo = pr.base_repo_name()?;
    let reviews = platform.list_reviews(&repo, pr.number).await?;
    let approved = reviews.iter().any(|r| r.state == ReviewState::Approved);
    debug!(pr_number = pr.number, approved, "checked review approval");
    Ok(approved)
}
