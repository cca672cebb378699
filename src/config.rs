//! Resource configuration: the JSON request handed to `out` and its validated form

use crate::error::{Error, Result};
use crate::types::{CommitState, MergeMethod, RepoName};
use serde::Deserialize;

/// Contexts used when `params.context` is not set
pub const DEFAULT_CONTEXT: &str = "status";

/// Request read from stdin by the `out` script
#[derive(Debug, Clone, Deserialize)]
pub struct OutRequest {
    /// Resource-level configuration
    pub source: Source,
    /// Step-level parameters
    #[serde(default)]
    pub params: OutParams,
}

/// `source` block of the resource configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    /// Repository the PRs live in
    pub repo: RepoName,
    /// API token; falls back to `GITHUB_TOKEN`
    #[serde(default)]
    pub access_token: Option<String>,
    /// API root for GitHub Enterprise
    #[serde(default, alias = "v3_endpoint")]
    pub api_endpoint: Option<String>,
    /// External CI URL, overrides `ATC_EXTERNAL_URL` in status links
    #[serde(default)]
    pub base_url: Option<String>,
    /// Whether PRs with unmerged `depends:` references are filtered out
    #[serde(default)]
    pub check_dependent_prs: bool,
}

/// Either a single value or a list of values
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single value
    One(String),
    /// A list of values
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flatten into a list
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// `params.merge` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeParams {
    /// Merge strategy, one of merge/squash/rebase
    #[serde(default)]
    pub method: Option<String>,
    /// File holding the commit message, relative to the destination
    #[serde(default)]
    pub commit_msg: Option<String>,
}

/// `params` block, exactly as configured in the pipeline
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutParams {
    /// Directory of the fetched PR, relative to the destination
    #[serde(default)]
    pub path: Option<String>,
    /// Status state to publish
    #[serde(default)]
    pub status: Option<String>,
    /// Status context(s)
    #[serde(default)]
    pub context: Option<OneOrMany>,
    /// File holding a comment to post
    #[serde(default)]
    pub comment: Option<String>,
    /// File holding a login to assign
    #[serde(default)]
    pub assignee_file: Option<String>,
    /// Label(s) to add
    #[serde(default)]
    pub label: Option<OneOrMany>,
    /// File holding comma-separated labels to add
    #[serde(default)]
    pub label_file: Option<String>,
    /// Merge settings
    #[serde(default)]
    pub merge: MergeParams,
}

/// Validated `params`
///
/// Produced once by [`OutConfig::validate`]; nothing downstream re-checks
/// status or merge method strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutConfig {
    /// Directory of the fetched PR, relative to the destination
    pub path: String,
    /// Status state to publish
    pub status: CommitState,
    /// Status contexts in publish order, never empty
    pub contexts: Vec<String>,
    /// File holding a comment to post
    pub comment: Option<String>,
    /// File holding a login to assign
    pub assignee_file: Option<String>,
    /// Literal labels to add
    pub labels: Option<Vec<String>>,
    /// File holding comma-separated labels to add
    pub label_file: Option<String>,
    /// Merge strategy; no merge happens without one
    pub merge_method: Option<MergeMethod>,
    /// File holding the merge commit message, relative to the destination
    ///
    /// Kept even without a method so a dangling path is still reported.
    pub merge_commit_msg: Option<String>,
}

impl OutConfig {
    /// Validate raw params
    ///
    /// Checks run in a fixed order: `status`, then `merge.method`, then `path`.
    pub fn validate(params: OutParams) -> Result<Self> {
        let status: CommitState = params.status.as_deref().unwrap_or_default().parse()?;

        let merge_method = params
            .merge
            .method
            .as_deref()
            .map(str::parse::<MergeMethod>)
            .transpose()?;

        let path = params
            .path
            .ok_or_else(|| Error::Config("`path` required in `params`".to_string()))?;

        let contexts = match params.context.map(OneOrMany::into_vec) {
            Some(contexts) if !contexts.is_empty() => contexts,
            _ => vec![DEFAULT_CONTEXT.to_string()],
        };

        Ok(Self {
            path,
            status,
            contexts,
            comment: params.comment,
            assignee_file: params.assignee_file,
            labels: params.label.map(OneOrMany::into_vec),
            label_file: params.label_file,
            merge_method,
            merge_commit_msg: params.merge.commit_msg,
        })
    }

    /// Whether any step needs a pull request to act on
    pub const fn needs_pull_request(&self) -> bool {
        self.comment.is_some()
            || self.assignee_file.is_some()
            || self.labels.is_some()
            || self.label_file.is_some()
            || self.merge_method.is_some()
    }
}
