//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use gh_pr_resource::error::{Error, Result};
use gh_pr_resource::merge::RetryPolicy;
use gh_pr_resource::out::OutContext;
use gh_pr_resource::template::BuildMetadata;
use gh_pr_resource::types::{AuthorAssociation, Comment, PullRequest, RepoName};
use gh_pr_resource::workspace::Workspace;
use std::collections::HashMap;

/// Repository every fixture PR lives in
pub const REPO: &str = "acme/widgets";

/// Repository name for the fixture repo
pub fn repo() -> RepoName {
    REPO.parse().unwrap()
}

/// An open PR from a branch of the same repository
pub fn make_pr(number: u64, head_sha: &str, merge_commit_sha: Option<&str>) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/{REPO}/pull/{number}"),
        head_sha: head_sha.to_string(),
        merge_commit_sha: merge_commit_sha.map(ToString::to_string),
        base_repo: REPO.to_string(),
        head_repo: Some(REPO.to_string()),
        author_association: AuthorAssociation::Member,
        merged: false,
    }
}

/// A PR in another repository, merged or not
pub fn make_dependency(repo: &str, number: u64, merged: bool) -> PullRequest {
    PullRequest {
        base_repo: repo.to_string(),
        head_repo: Some(repo.to_string()),
        html_url: format!("https://github.com/{repo}/pull/{number}"),
        merged,
        ..make_pr(number, "dep-sha", None)
    }
}

/// A comment by an author with the given association
pub fn make_comment(id: u64, author_association: AuthorAssociation, body: &str) -> Comment {
    Comment {
        id,
        author_association,
        body: body.to_string(),
    }
}

/// Build metadata from a fixed list of variables
pub fn build_metadata(vars: &[(&str, &str)]) -> BuildMetadata {
    BuildMetadata::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_string())
    })
}

/// Retry policy with the production bounds
pub fn retry_policy() -> RetryPolicy {
    RetryPolicy::default()
}

/// In-memory destination directory
///
/// Holds one working tree (at `tree_path`) plus arbitrary text files.
#[derive(Debug, Clone, Default)]
pub struct FakeWorkspace {
    tree_path: String,
    head_sha: String,
    pull_request_id: Option<String>,
    files: HashMap<String, String>,
}

impl FakeWorkspace {
    /// Working tree at `tree_path` with the given HEAD and recorded PR id
    pub fn new(tree_path: &str, head_sha: &str, pull_request_id: Option<&str>) -> Self {
        Self {
            tree_path: tree_path.to_string(),
            head_sha: head_sha.to_string(),
            pull_request_id: pull_request_id.map(ToString::to_string),
            files: HashMap::new(),
        }
    }

    /// Add a file
    #[must_use]
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    fn check_tree(&self, relative: &str) -> Result<()> {
        if relative == self.tree_path {
            Ok(())
        } else {
            Err(Error::Git(format!("{relative} is not a git repository")))
        }
    }
}

impl Workspace for FakeWorkspace {
    fn exists(&self, relative: &str) -> bool {
        relative == self.tree_path || self.files.contains_key(relative)
    }

    fn read_to_string(&self, relative: &str) -> Result<String> {
        self.files.get(relative).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                relative.to_string(),
            ))
        })
    }

    fn head_sha(&self, relative: &str) -> Result<String> {
        self.check_tree(relative)?;
        Ok(self.head_sha.clone())
    }

    fn pull_request_id(&self, relative: &str) -> Result<Option<String>> {
        self.check_tree(relative)?;
        Ok(self.pull_request_id.clone())
    }
}

/// Borrow fixtures as an orchestrator context
pub fn out_context<'a>(
    platform: &'a MockPlatformService,
    workspace: &'a FakeWorkspace,
    repo: &'a RepoName,
    build: &'a BuildMetadata,
    base_url: Option<&'a str>,
) -> OutContext<'a> {
    OutContext {
        platform,
        workspace,
        repo,
        build,
        base_url,
        retry: retry_policy(),
    }
}
