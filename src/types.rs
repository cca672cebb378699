//! Core types for gh-pr-resource

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A repository identified as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoName {
    /// Build a repository name from its parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::Config(format!(
                "`repo` \"{s}\" must be of the form owner/name"
            ))),
        }
    }
}

impl TryFrom<String> for RepoName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RepoName> for String {
    fn from(repo: RepoName) -> Self {
        repo.to_string()
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Relationship of a comment or PR author to the repository, as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorAssociation {
    /// Owner of the repository
    Owner,
    /// Invited collaborator
    Collaborator,
    /// Member of the owning organization
    Member,
    /// Has previously committed to the repository
    Contributor,
    /// First contribution to this repository
    FirstTimeContributor,
    /// First contribution to GitHub at all
    FirstTimer,
    /// Placeholder for an imported user
    Mannequin,
    /// No association
    #[serde(rename = "NONE")]
    NoAssociation,
    /// Anything GitHub adds later
    #[serde(other)]
    Unknown,
}

impl AuthorAssociation {
    /// Whether comments from this author are trusted to declare dependencies
    pub const fn is_trusted_commenter(self) -> bool {
        matches!(
            self,
            Self::Owner | Self::Collaborator | Self::Member | Self::Contributor
        )
    }

    /// Whether the author is formally associated with the repository
    pub const fn is_associated(self) -> bool {
        matches!(self, Self::Owner | Self::Collaborator | Self::Member)
    }
}

/// A pull request as fetched from the code-review service
///
/// Immutable once fetched. Anything that needs fresh state (for example the
/// head SHA after a merge) must fetch a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Commit at the tip of the head branch
    pub head_sha: String,
    /// Test-merge commit computed by the service, if any
    pub merge_commit_sha: Option<String>,
    /// `owner/name` of the repository the PR targets
    pub base_repo: String,
    /// `owner/name` of the repository the PR comes from (None if deleted)
    pub head_repo: Option<String>,
    /// Author relationship to the base repository
    pub author_association: AuthorAssociation,
    /// Whether the PR has been merged
    pub merged: bool,
}

impl PullRequest {
    /// Whether the PR comes from a different repository than it targets
    pub fn is_from_fork(&self) -> bool {
        self.head_repo.as_deref() != Some(self.base_repo.as_str())
    }

    /// Whether the author owns, collaborates on, or is a member of the base repository
    pub const fn is_author_associated(&self) -> bool {
        self.author_association.is_associated()
    }

    /// Whether the PR was merged
    pub const fn is_merged(&self) -> bool {
        self.merged
    }

    /// Whether this PR has the given number and head SHA
    pub fn matches(&self, id: &str, sha: &str) -> bool {
        self.number.to_string() == id && self.head_sha == sha
    }

    /// Resource version pointing at the head of this PR
    pub fn version(&self) -> Version {
        Version::for_pull_request(self.number.to_string(), self.head_sha.clone())
    }

    /// Base repository as a [`RepoName`]
    pub fn base_repo_name(&self) -> Result<RepoName> {
        self.base_repo.parse()
    }
}

/// A comment on a pull request's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    pub id: u64,
    /// Comment author relationship to the repository
    pub author_association: AuthorAssociation,
    /// Comment body text
    pub body: String,
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    /// Approved
    Approved,
    /// Changes requested
    ChangesRequested,
    /// Commented without a verdict
    Commented,
    /// Dismissed, pending, or anything else
    Other,
}

/// A review left on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review verdict
    pub state: ReviewState,
}

/// A `depends: <url>` reference extracted from a comment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyReference {
    /// Repository of the referenced PR
    pub repo: RepoName,
    /// Referenced PR number
    pub pull_number: u64,
}

impl std::fmt::Display for DependencyReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repo, self.pull_number)
    }
}

/// Commit status state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Checks passed
    Success,
    /// Checks failed
    Failure,
    /// Checks could not run
    Error,
    /// Checks in progress
    Pending,
}

impl CommitState {
    /// Lowercase name as used by the GitHub API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for CommitState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "error" => Ok(Self::Error),
            "pending" => Ok(Self::Pending),
            other => Err(Error::Config(format!(
                "`status` \"{other}\" is not supported -- only success, failure, error, or pending"
            ))),
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single commit status to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    /// Commit the status is attached to
    pub sha: String,
    /// Status state
    pub state: CommitState,
    /// Status context (already expanded)
    pub context: String,
    /// Link to the build (already expanded)
    pub target_url: Option<String>,
    /// Short human-readable description
    pub description: String,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl MergeMethod {
    /// Lowercase name as used by the GitHub API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}

impl FromStr for MergeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(Error::Config(format!(
                "`merge.method` \"{other}\" is not supported -- only merge, squash, or rebase"
            ))),
        }
    }
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A merge to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// PR number
    pub pull_number: u64,
    /// Merge strategy
    pub method: MergeMethod,
    /// Commit message; empty means the service default
    pub commit_message: String,
}

/// Resource version emitted by `out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// PR number, absent when the build is not tied to a PR
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pr: Option<String>,
    /// Commit SHA
    #[serde(rename = "ref")]
    pub sha: String,
}

impl Version {
    /// Version for a bare commit
    pub fn for_commit(sha: impl Into<String>) -> Self {
        Self {
            pr: None,
            sha: sha.into(),
        }
    }

    /// Version for a commit of a pull request
    pub fn for_pull_request(pr: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            pr: Some(pr.into()),
            sha: sha.into(),
        }
    }
}

/// A name/value pair displayed alongside the version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Entry name
    pub name: String,
    /// Entry value
    pub value: String,
}

impl MetadataEntry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The response printed by `out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutResponse {
    /// Version that was published against
    pub version: Version,
    /// Metadata in the order the steps ran
    pub metadata: Vec<MetadataEntry>,
}
