//! Commit status publishing

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::template::BuildMetadata;
use crate::types::{CommitState, RepoName, StatusUpdate};
use tracing::{debug, warn};

/// Link to a build, given the CI base URL template
///
/// The template is expanded first; an empty result means no link.
pub fn build_target_url(base_url_template: &str, build: &BuildMetadata) -> Option<String> {
    let base = build.expand(base_url_template);
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(format!(
        "{base}/builds/{}",
        build.build_id.as_deref().unwrap_or_default()
    ))
}

/// Build one status per context, in the given order
pub fn build_status_updates(
    sha: &str,
    state: CommitState,
    contexts: &[String],
    base_url_template: &str,
    build: &BuildMetadata,
) -> Vec<StatusUpdate> {
    let target_url = build_target_url(base_url_template, build);
    contexts
        .iter()
        .map(|context| StatusUpdate {
            sha: sha.to_string(),
            state,
            context: build.expand(context),
            target_url: target_url.clone(),
            description: format!("Concourse CI build {state}"),
        })
        .collect()
}

/// Publish every status, in order
///
/// A failed context does not stop the remaining ones from being attempted.
/// The first failure is returned once all have been tried.
pub async fn publish_statuses(
    platform: &dyn PlatformService,
    repo: &RepoName,
    updates: &[StatusUpdate],
) -> Result<()> {
    let mut first_error: Option<Error> = None;

    for update in updates {
        match platform.create_status(repo, update).await {
            Ok(()) => debug!(context = %update.context, sha = %update.sha, "published status"),
            Err(e) => {
                warn!(context = %update.context, error = %e, "failed to publish status");
                first_error.get_or_insert(e);
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}
