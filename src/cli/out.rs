//! Out command - publish a build result to the PR

use crate::cli::context::CommandContext;
use gh_pr_resource::config::OutRequest;
use gh_pr_resource::error::Result;
use gh_pr_resource::out::{execute_out, validate_out};
use gh_pr_resource::types::OutResponse;
use gh_pr_resource::workspace::LocalWorkspace;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Run the out command against a request read from `input`
///
/// Params are validated before any service is constructed, so configuration
/// errors are reported even without credentials.
#[allow(clippy::future_not_send)]
pub async fn run_out_command(destination: &Path, input: impl Read) -> Result<OutResponse> {
    let request: OutRequest = serde_json::from_reader(input)?;
    info!(repo = %request.source.repo, destination = %destination.display(), "running out");

    let config = validate_out(request.params, &LocalWorkspace::new(destination))?;

    let ctx = CommandContext::new(request.source, destination)?;
    let response = execute_out(&config, &ctx.as_out_context()).await?;

    info!(version = ?response.version, "out complete");
    Ok(response)
}
