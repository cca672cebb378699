//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    AuthorAssociation, Comment, MergeRequest, PullRequest, RepoName, Review,
    ReviewState, StatusUpdate,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Public GitHub API root
pub const DEFAULT_API_ENDPOINT: &str = "https://api.github.com";

/// Page size used when listing comments
const COMMENTS_PER_PAGE: usize = 100;

// REST response shapes read through raw requests

#[derive(Deserialize)]
struct PullRequestRecord {
    number: u64,
    html_url: String,
    merge_commit_sha: Option<String>,
    #[serde(default)]
    merged: bool,
    author_association: AuthorAssociation,
    head: BranchRecord,
    base: BranchRecord,
}

#[derive(Deserialize)]
struct BranchRecord {
    sha: String,
    repo: Option<RepositoryRecord>,
}

#[derive(Deserialize)]
struct RepositoryRecord {
    full_name: String,
}

#[derive(Deserialize)]
struct CommentRecord {
    id: u64,
    author_association: AuthorAssociation,
    body: Option<String>,
}

#[derive(Deserialize)]
struct MergeRecord {
    #[serde(default)]
    merged: bool,
    sha: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<PullRequestRecord> for PullRequest {
    fn from(pr: PullRequestRecord) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url,
            head_sha: pr.head.sha,
            merge_commit_sha: pr.merge_commit_sha,
            base_repo: pr.base.repo.map(|r| r.full_name).unwrap_or_default(),
            head_repo: pr.head.repo.map(|r| r.full_name),
            author_association: pr.author_association,
            merged: pr.merged,
        }
    }
}

impl From<CommentRecord> for Comment {
    fn from(c: CommentRecord) -> Self {
        Self {
            id: c.id,
            author_association: c.author_association,
            body: c.body.unwrap_or_default(),
        }
    }
}

/// Turn a non-success response into [`Error::Http`]
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.json::<ApiErrorBody>().await.map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        },
        |body| body.message,
    );
    Err(Error::Http {
        status: status.as_u16(),
        message,
    })
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (PR and comment reads, statuses, merges)
    http_client: Client,
    /// API root for raw requests, without trailing slash
    api_root: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_endpoint` selects a GitHub Enterprise API root; `None` means github.com.
    pub fn new(token: &str, api_endpoint: Option<&str>) -> Result<Self> {
        let api_root = api_endpoint
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .trim_end_matches('/')
            .to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_root)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("gh-pr-resource")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_root,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_root)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .authorized(self.http_client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {path}: {e}")))?;

        error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {path}: {e}")))
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest> {
        debug!(%repo, pr_number = number, "fetching PR");
        let record: PullRequestRecord = self
            .get_json(&format!("/repos/{repo}/pulls/{number}"))
            .await?;
        let pr = PullRequest::from(record);
        debug!(pr_number = number, head_sha = %pr.head_sha, merged = pr.merged, "fetched PR");
        Ok(pr)
    }

    async fn list_reviews(&self, repo: &RepoName, number: u64) -> Result<Vec<Review>> {
        debug!(%repo, pr_number = number, "listing reviews");
        let reviews = self
            .client
            .pulls(&repo.owner, &repo.name)
            .list_reviews(number)
            .send()
            .await?;

        let result: Vec<Review> = reviews
            .items
            .iter()
            .map(|r| Review {
                state: match r.state {
                    Some(octocrab::models::pulls::ReviewState::Approved) => ReviewState::Approved,
                    Some(octocrab::models::pulls::ReviewState::ChangesRequested) => {
                        ReviewState::ChangesRequested
                    }
                    Some(octocrab::models::pulls::ReviewState::Commented) => ReviewState::Commented,
                    Some(_) | None => ReviewState::Other,
                },
            })
            .collect();
        debug!(pr_number = number, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn list_issue_comments(&self, repo: &RepoName, number: u64) -> Result<Vec<Comment>> {
        debug!(%repo, pr_number = number, "listing PR comments");
        let mut result = Vec::new();
        let mut page = 1;
        loop {
            let batch: Vec<CommentRecord> = self
                .get_json(&format!(
                    "/repos/{repo}/issues/{number}/comments?per_page={COMMENTS_PER_PAGE}&page={page}"
                ))
                .await?;
            let last_page = batch.len() < COMMENTS_PER_PAGE;
            result.extend(batch.into_iter().map(Comment::from));
            if last_page {
                break;
            }
            page += 1;
        }
        debug!(pr_number = number, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn create_status(&self, repo: &RepoName, status: &StatusUpdate) -> Result<()> {
        debug!(%repo, sha = %status.sha, context = %status.context, state = %status.state, "creating status");
        let mut body = serde_json::json!({
            "state": status.state.as_str(),
            "context": status.context,
            "description": status.description,
        });
        if let Some(ref target_url) = status.target_url {
            body["target_url"] = serde_json::Value::String(target_url.clone());
        }

        let response = self
            .authorized(
                self.http_client
                    .post(self.url(&format!("/repos/{repo}/statuses/{}", status.sha))),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to create status: {e}")))?;
        error_for_status(response).await?;

        debug!(context = %status.context, "created status");
        Ok(())
    }

    async fn create_comment(&self, repo: &RepoName, number: u64, body: &str) -> Result<()> {
        debug!(%repo, pr_number = number, "creating PR comment");
        self.client
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await?;
        debug!(pr_number = number, "created PR comment");
        Ok(())
    }

    async fn add_assignees(
        &self,
        repo: &RepoName,
        number: u64,
        assignees: &[String],
    ) -> Result<()> {
        debug!(%repo, pr_number = number, ?assignees, "adding assignees");
        let logins: Vec<&str> = assignees.iter().map(String::as_str).collect();
        self.client
            .issues(&repo.owner, &repo.name)
            .add_assignees(number, &logins)
            .await?;
        Ok(())
    }

    async fn add_labels(&self, repo: &RepoName, number: u64, labels: &[String]) -> Result<()> {
        debug!(%repo, pr_number = number, ?labels, "adding labels");
        self.client
            .issues(&repo.owner, &repo.name)
            .add_labels(number, labels)
            .await?;
        Ok(())
    }

    async fn merge_pull_request(&self, repo: &RepoName, request: &MergeRequest) -> Result<()> {
        let pr_number = request.pull_number;
        debug!(%repo, pr_number, method = %request.method, "merging PR");

        // Sent raw so gateway failures with HTML or empty bodies keep their status
        let mut body = serde_json::json!({ "merge_method": request.method.as_str() });
        if !request.commit_message.is_empty() {
            body["commit_message"] = serde_json::Value::String(request.commit_message.clone());
        }

        let response = self
            .authorized(
                self.http_client
                    .put(self.url(&format!("/repos/{repo}/pulls/{pr_number}/merge"))),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to merge PR #{pr_number}: {e}")))?;
        let result: MergeRecord = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse merge result: {e}")))?;

        if !result.merged {
            return Err(Error::GitHubApi(format!(
                "Merge of PR #{pr_number} was not performed: {}",
                result.message.unwrap_or_default()
            )));
        }

        debug!(pr_number, sha = ?result.sha, "merge complete");
        Ok(())
    }
}
