//! Execution of a validated `out` invocation (EFFECTFUL)

use crate::config::{OutConfig, OutParams};
use crate::error::{Error, Result};
use crate::merge::{RetryPolicy, execute_merge};
use crate::out::plan::{resolve_identity, validate_out};
use crate::platform::PlatformService;
use crate::status::{build_status_updates, publish_statuses};
use crate::template::BuildMetadata;
use crate::types::{MergeRequest, MetadataEntry, OutResponse, RepoName};
use crate::workspace::Workspace;
use tracing::{debug, info};

/// Template used for the status link when `source.base_url` is unset
const DEFAULT_BASE_URL_TEMPLATE: &str = "$ATC_EXTERNAL_URL";

/// Everything an `out` invocation talks to
///
/// Passed explicitly so no step reads ambient state.
pub struct OutContext<'a> {
    /// Code-review service
    pub platform: &'a dyn PlatformService,
    /// Destination directory
    pub workspace: &'a dyn Workspace,
    /// Repository the resource is configured for
    pub repo: &'a RepoName,
    /// Build metadata for template expansion
    pub build: &'a BuildMetadata,
    /// `source.base_url`, overriding `ATC_EXTERNAL_URL`
    pub base_url: Option<&'a str>,
    /// Merge retry bounds
    pub retry: RetryPolicy,
}

/// Validate then execute an `out` invocation
pub async fn run_out(params: OutParams, ctx: &OutContext<'_>) -> Result<OutResponse> {
    let config = validate_out(params, ctx.workspace)?;
    execute_out(&config, ctx).await
}

/// Labels from a comma-separated file, trimmed, empty entries dropped
pub fn split_labels(contents: &str) -> Vec<String> {
    contents
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn pull_request_required(config: &OutConfig) -> Error {
    Error::Config(format!(
        "no pull request id found in `path` \"{}\", but comment, assignee, label or merge params need one",
        config.path
    ))
}

/// Execute a validated invocation
///
/// Steps run in a fixed order and each appends its metadata as it completes:
/// status, url, comment, assignee, label, label file, merge.
pub async fn execute_out(config: &OutConfig, ctx: &OutContext<'_>) -> Result<OutResponse> {
    // Resolve identity
    let local_sha = ctx.workspace.head_sha(&config.path)?;
    let pr_id = ctx.workspace.pull_request_id(&config.path)?;
    let identity = resolve_identity(ctx.platform, ctx.repo, local_sha, pr_id).await?;

    let pull_number = match identity.pull_number() {
        Some(number) => Some(number),
        None if config.needs_pull_request() => return Err(pull_request_required(config)),
        None => None,
    };

    let mut metadata = vec![MetadataEntry::new("status", config.status.as_str())];
    if let Some(ref pr) = identity.pull_request {
        metadata.push(MetadataEntry::new("url", pr.html_url.clone()));
    }

    // Publish statuses
    let updates = build_status_updates(
        &identity.sha,
        config.status,
        &config.contexts,
        ctx.base_url.unwrap_or(DEFAULT_BASE_URL_TEMPLATE),
        ctx.build,
    );
    publish_statuses(ctx.platform, ctx.repo, &updates).await?;
    info!(sha = %identity.sha, count = updates.len(), state = %config.status, "published statuses");

    // Attach artifacts
    if let Some(number) = pull_number {
        if let Some(ref comment_path) = config.comment {
            let comment = ctx.workspace.read_to_string(comment_path)?;
            ctx.platform
                .create_comment(ctx.repo, number, &comment)
                .await?;
            debug!(pr_number = number, "posted comment");
            metadata.push(MetadataEntry::new("comment", comment));
        }

        if let Some(ref assignee_path) = config.assignee_file {
            let assignee = ctx.workspace.read_to_string(assignee_path)?.trim().to_string();
            ctx.platform
                .add_assignees(ctx.repo, number, std::slice::from_ref(&assignee))
                .await?;
            debug!(pr_number = number, %assignee, "assigned PR");
            metadata.push(MetadataEntry::new("assignee", assignee));
        }

        if let Some(ref labels) = config.labels {
            ctx.platform.add_labels(ctx.repo, number, labels).await?;
            debug!(pr_number = number, ?labels, "labelled PR");
            metadata.push(MetadataEntry::new("label", format!("{labels:?}")));
        }

        if let Some(ref label_path) = config.label_file {
            let labels = split_labels(&ctx.workspace.read_to_string(label_path)?);
            ctx.platform.add_labels(ctx.repo, number, &labels).await?;
            debug!(pr_number = number, ?labels, "labelled PR from file");
            metadata.push(MetadataEntry::new("label", format!("{labels:?}")));
        }

        // Merge
        if let Some(method) = config.merge_method {
            let commit_message = match config.merge_commit_msg {
                Some(ref path) => ctx.workspace.read_to_string(path)?,
                None => String::new(),
            };
            let request = MergeRequest {
                pull_number: number,
                method,
                commit_message,
            };
            let outcome = execute_merge(ctx.platform, ctx.repo, &request, &ctx.retry).await?;
            debug!(pr_number = number, attempts = outcome.attempts, "merge finished");
            metadata.push(MetadataEntry::new("merge", method.as_str()));
            metadata.push(MetadataEntry::new("merge_commit_msg", request.commit_message));
        }
    }

    Ok(OutResponse {
        version: identity.version(),
        metadata,
    })
}
