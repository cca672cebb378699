//! Merge execution - effectful operations
//!
//! Sends the merge request through the platform API, retrying in place
//! according to a `RetryPolicy`. There is no way to cancel the loop; the
//! attempt ceiling is the only bound.

use crate::error::Result;
use crate::merge::retry::{AttemptOutcome, RetryPolicy};
use crate::platform::PlatformService;
use crate::types::{MergeRequest, RepoName};
use tracing::{info, warn};

/// Result of a successful merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Number of attempts it took, including the successful one
    pub attempts: u32,
}

/// Merge a PR, retrying transient failures (EFFECTFUL)
///
/// The same request is re-sent on every attempt. When the budget is
/// exhausted the last failure is returned unchanged.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    repo: &RepoName,
    request: &MergeRequest,
    policy: &RetryPolicy,
) -> Result<MergeOutcome> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        info!(
            pr_number = request.pull_number,
            method = %request.method,
            attempt,
            "merging PR"
        );

        let result = platform.merge_pull_request(repo, request).await;
        match policy.classify(attempt, result) {
            AttemptOutcome::Success(()) => {
                info!(pr_number = request.pull_number, attempt, "merged PR");
                return Ok(MergeOutcome { attempts: attempt });
            }
            AttemptOutcome::Retryable(e) => {
                warn!(
                    pr_number = request.pull_number,
                    attempt,
                    error = %e,
                    delay_secs = policy.delay.as_secs(),
                    "merge failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            AttemptOutcome::Fatal(e) => {
                warn!(pr_number = request.pull_number, attempt, error = %e, "merge failed");
                return Err(e);
            }
        }
    }
}
