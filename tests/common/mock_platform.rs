//! In-memory code-review service that records every call

#![allow(dead_code)]

use async_trait::async_trait;
use gh_pr_resource::error::{Error, Result};
use gh_pr_resource::platform::PlatformService;
use gh_pr_resource::types::{
    Comment, MergeRequest, PullRequest, RepoName, Review, StatusUpdate,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `add_labels` / `add_assignees`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub pr_number: u64,
    pub values: Vec<String>,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable PRs per (repo, number), comments and reviews per PR
/// - Call tracking for verification, including one ordered log of every call
/// - Error injection for failure path testing
/// - Scripted merge failures by HTTP status
pub struct MockPlatformService {
    pull_requests: Mutex<HashMap<(String, u64), PullRequest>>,
    comments: Mutex<HashMap<u64, Vec<Comment>>>,
    reviews: Mutex<HashMap<u64, Vec<Review>>>,
    // Call tracking
    call_log: Mutex<Vec<String>>,
    get_pr_calls: Mutex<Vec<(String, u64)>>,
    list_comments_calls: Mutex<Vec<u64>>,
    create_status_calls: Mutex<Vec<StatusUpdate>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    add_assignees_calls: Mutex<Vec<ListCall>>,
    add_labels_calls: Mutex<Vec<ListCall>>,
    merge_calls: Mutex<Vec<MergeRequest>>,
    // Error injection
    error_on_get_pr: Mutex<Option<String>>,
    error_on_status_context: Mutex<HashMap<String, u16>>,
    error_on_comment: Mutex<Option<u16>>,
    merge_failures: Mutex<VecDeque<u16>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            pull_requests: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
            call_log: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            create_status_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            add_assignees_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_get_pr: Mutex::new(None),
            error_on_status_context: Mutex::new(HashMap::new()),
            error_on_comment: Mutex::new(None),
            merge_failures: Mutex::new(VecDeque::new()),
        }
    }

    // === Response setup ===

    /// Register a PR under its base repository
    pub fn add_pull_request(&self, pr: PullRequest) {
        self.pull_requests
            .lock()
            .unwrap()
            .insert((pr.base_repo.clone(), pr.number), pr);
    }

    /// Set the comments returned for a PR
    pub fn set_comments(&self, pr_number: u64, comments: Vec<Comment>) {
        self.comments.lock().unwrap().insert(pr_number, comments);
    }

    /// Set the reviews returned for a PR
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().insert(pr_number, reviews);
    }

    // === Error injection methods ===

    /// Make `get_pull_request` return an error
    pub fn fail_get_pr(&self, msg: &str) {
        *self.error_on_get_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_status` fail with `status` for one context
    pub fn fail_status_context(&self, context: &str, status: u16) {
        self.error_on_status_context
            .lock()
            .unwrap()
            .insert(context.to_string(), status);
    }

    /// Make `create_comment` fail with `status`
    pub fn fail_comment(&self, status: u16) {
        *self.error_on_comment.lock().unwrap() = Some(status);
    }

    /// Make the next merge attempts fail with these statuses, in order
    pub fn fail_merges(&self, statuses: &[u16]) {
        self.merge_failures
            .lock()
            .unwrap()
            .extend(statuses.iter().copied());
    }

    // === Call verification methods ===

    /// Every call in the order it was made, as `method` or `method:detail`
    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Total number of calls of any kind
    pub fn total_calls(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Get all `get_pull_request` calls
    pub fn get_pr_calls(&self) -> Vec<(String, u64)> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// Get all `list_issue_comments` calls
    pub fn list_comments_calls(&self) -> Vec<u64> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    /// Get all `create_status` calls
    pub fn status_calls(&self) -> Vec<StatusUpdate> {
        self.create_status_calls.lock().unwrap().clone()
    }

    /// Get all `create_comment` calls
    pub fn comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all `add_assignees` calls
    pub fn assignee_calls(&self) -> Vec<ListCall> {
        self.add_assignees_calls.lock().unwrap().clone()
    }

    /// Get all `add_labels` calls
    pub fn label_calls(&self) -> Vec<ListCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// Get all merge attempts
    pub fn merge_calls(&self) -> Vec<MergeRequest> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Assert that no call reached the service
    pub fn assert_no_calls(&self) {
        let calls = self.call_log();
        assert!(calls.is_empty(), "Expected no platform calls but got: {calls:?}");
    }

    fn record(&self, entry: String) {
        self.call_log.lock().unwrap().push(entry);
    }
}

fn http_error(status: u16, message: &str) -> Error {
    Error::Http {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequest> {
        self.record(format!("get_pull_request:{repo}#{number}"));
        self.get_pr_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), number));

        if let Some(msg) = self.error_on_get_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.pull_requests.lock().unwrap();
        responses
            .get(&(repo.to_string(), number))
            .cloned()
            .ok_or_else(|| http_error(404, "Not Found"))
    }

    async fn list_reviews(&self, _repo: &RepoName, number: u64) -> Result<Vec<Review>> {
        self.record(format!("list_reviews:{number}"));
        let responses = self.reviews.lock().unwrap();
        Ok(responses.get(&number).cloned().unwrap_or_default())
    }

    async fn list_issue_comments(&self, _repo: &RepoName, number: u64) -> Result<Vec<Comment>> {
        self.record(format!("list_issue_comments:{number}"));
        self.list_comments_calls.lock().unwrap().push(number);
        let responses = self.comments.lock().unwrap();
        Ok(responses.get(&number).cloned().unwrap_or_default())
    }

    async fn create_status(&self, _repo: &RepoName, status: &StatusUpdate) -> Result<()> {
        self.record(format!("create_status:{}", status.context));
        self.create_status_calls
            .lock()
            .unwrap()
            .push(status.clone());

        if let Some(code) = self
            .error_on_status_context
            .lock()
            .unwrap()
            .get(&status.context)
        {
            return Err(http_error(*code, "status rejected"));
        }
        Ok(())
    }

    async fn create_comment(&self, _repo: &RepoName, number: u64, body: &str) -> Result<()> {
        self.record("create_comment".to_string());
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number: number,
                body: body.to_string(),
            });

        if let Some(code) = *self.error_on_comment.lock().unwrap() {
            return Err(http_error(code, "comment rejected"));
        }
        Ok(())
    }

    async fn add_assignees(
        &self,
        _repo: &RepoName,
        number: u64,
        assignees: &[String],
    ) -> Result<()> {
        self.record("add_assignees".to_string());
        self.add_assignees_calls.lock().unwrap().push(ListCall {
            pr_number: number,
            values: assignees.to_vec(),
        });
        Ok(())
    }

    async fn add_labels(&self, _repo: &RepoName, number: u64, labels: &[String]) -> Result<()> {
        self.record("add_labels".to_string());
        self.add_labels_calls.lock().unwrap().push(ListCall {
            pr_number: number,
            values: labels.to_vec(),
        });
        Ok(())
    }

    async fn merge_pull_request(&self, _repo: &RepoName, request: &MergeRequest) -> Result<()> {
        self.record("merge_pull_request".to_string());
        self.merge_calls.lock().unwrap().push(request.clone());

        if let Some(code) = self.merge_failures.lock().unwrap().pop_front() {
            return Err(http_error(code, "merge rejected"));
        }
        Ok(())
    }
}
