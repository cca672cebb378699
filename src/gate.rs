//! Dependency gate: `depends: <pull request URL>` declarations in PR comments
//!
//! A PR is allowed through when it has comments and every trusted comment's
//! references point at merged PRs.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{Comment, DependencyReference, PullRequest, RepoName};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static DEPENDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"depends: https://[^/\s]+/([\w.-]+)/([\w.-]+)/pull/(\d+)")
        .expect("dependency pattern is a valid regex")
});

/// Extract every dependency reference from a comment body, in order of appearance
///
/// References whose number does not fit a PR number are skipped with a warning.
pub fn parse_dependency_references(body: &str) -> Vec<DependencyReference> {
    DEPENDS_PATTERN
        .captures_iter(body)
        .filter_map(|caps| {
            let Ok(pull_number) = caps[3].parse::<u64>() else {
                warn!(reference = &caps[0], "ignoring dependency with out-of-range PR number");
                return None;
            };
            Some(DependencyReference {
                repo: RepoName::new(&caps[1], &caps[2]),
                pull_number,
            })
        })
        .collect()
}

/// Whether every PR the comment depends on is merged
///
/// A comment without references is satisfied. References are fetched one by
/// one, without de-duplication.
async fn comment_satisfied(platform: &dyn PlatformService, comment: &Comment) -> Result<bool> {
    for reference in parse_dependency_references(&comment.body) {
        let dependency = platform
            .get_pull_request(&reference.repo, reference.pull_number)
            .await?;
        if !dependency.is_merged() {
            debug!(comment_id = comment.id, %reference, "dependency not merged");
            return Ok(false);
        }
        debug!(comment_id = comment.id, %reference, "dependency merged");
    }
    Ok(true)
}

/// Decide whether a PR's declared dependencies are all merged
///
/// - No comments at all: unsatisfied.
/// - Comments are visited in the order the service returns them. The first
///   comment by an author outside OWNER/COLLABORATOR/MEMBER/CONTRIBUTOR ends
///   the scan as satisfied, without looking at later comments.
/// - Otherwise every trusted comment must be satisfied.
pub async fn dependencies_satisfied(
    platform: &dyn PlatformService,
    pr: &PullRequest,
) -> Result<bool> {
    let repo = pr.base_repo_name()?;
    let comments = platform.list_issue_comments(&repo, pr.number).await?;

    if comments.is_empty() {
        debug!(pr_number = pr.number, "no comments, dependencies unsatisfied");
        return Ok(false);
    }

    for comment in &comments {
        if !comment.author_association.is_trusted_commenter() {
            debug!(
                pr_number = pr.number,
                comment_id = comment.id,
                association = ?comment.author_association,
                "untrusted comment ends dependency scan"
            );
            return Ok(true);
        }
        if !comment_satisfied(platform, comment).await? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Keep only the PRs whose dependencies are satisfied, when checking is enabled
///
/// Order is preserved. With `check_dependent_prs` off the input is returned as is.
pub async fn filter_dependents(
    platform: &dyn PlatformService,
    pull_requests: Vec<PullRequest>,
    check_dependent_prs: bool,
) -> Result<Vec<PullRequest>> {
    if !check_dependent_prs {
        return Ok(pull_requests);
    }

    let mut kept = Vec::with_capacity(pull_requests.len());
    for pr in pull_requests {
        if dependencies_satisfied(platform, &pr).await? {
            kept.push(pr);
        } else {
            info!(pr_number = pr.number, "skipping PR with unmerged dependencies");
        }
    }
    Ok(kept)
}
