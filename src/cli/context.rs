//! Shared command context for the `out` command
//!
//! Turns the resource `source` block into the services an invocation needs.

use gh_pr_resource::config::Source;
use gh_pr_resource::error::{Error, Result};
use gh_pr_resource::merge::RetryPolicy;
use gh_pr_resource::out::OutContext;
use gh_pr_resource::platform::{GitHubService, PlatformService};
use gh_pr_resource::template::BuildMetadata;
use gh_pr_resource::workspace::LocalWorkspace;
use std::path::Path;

/// Environment variable consulted when `source.access_token` is unset
const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Owned services for one invocation
///
/// Borrowed as an [`OutContext`] by the orchestrator.
pub struct CommandContext {
    /// Resource source configuration
    pub source: Source,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// Destination directory
    pub workspace: LocalWorkspace,
    /// Build metadata from the environment
    pub build: BuildMetadata,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(source: Source, destination: &Path) -> Result<Self> {
        let token = source
            .access_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .ok_or_else(|| {
                Error::Config(format!(
                    "`access_token` required in `source` (or set {TOKEN_ENV_VAR})"
                ))
            })?;

        let platform = GitHubService::new(&token, source.api_endpoint.as_deref())?;

        Ok(Self {
            source,
            platform: Box::new(platform),
            workspace: LocalWorkspace::new(destination),
            build: BuildMetadata::from_env(),
        })
    }

    /// Borrow as the orchestrator's context
    pub fn as_out_context(&self) -> OutContext<'_> {
        OutContext {
            platform: self.platform.as_ref(),
            workspace: &self.workspace,
            repo: &self.source.repo,
            build: &self.build,
            base_url: self.source.base_url.as_deref(),
            retry: RetryPolicy::default(),
        }
    }
}
