//! Error types for gh-pr-resource

use thiserror::Error;

/// Errors raised while resolving, publishing or merging a pull request
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete resource configuration
    #[error("{0}")]
    Config(String),

    /// A file named in `params` does not exist under the destination
    #[error("`{field}` \"{path}\" does not exist")]
    MissingFile {
        /// Name of the `params` field that referenced the file
        field: &'static str,
        /// Path as configured, relative to the destination
        path: String,
    },

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading pull request metadata from the git working tree failed
    #[error("git error: {0}")]
    Git(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The code-review API answered with a non-success status
    #[error("GitHub API returned {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message reported by the API
        message: String,
    },

    /// Transport or decoding failure talking to GitHub
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform service failure
    #[error("platform error: {0}")]
    Platform(String),
}

/// Coarse classification of a failure, used to decide whether a merge is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The service rejected the request (4xx)
    Client,
    /// The service failed to handle the request (5xx)
    Server,
    /// Anything else: configuration, I/O, transport
    Other,
}

impl Error {
    /// Classify this error for retry purposes
    pub const fn failure_class(&self) -> FailureClass {
        match self {
            Self::Http { status, .. } if *status >= 400 && *status < 500 => FailureClass::Client,
            Self::Http { status, .. } if *status >= 500 && *status < 600 => FailureClass::Server,
            _ => FailureClass::Other,
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::Http {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            // Display appends "Found at <backtrace>" on later lines
            other => Self::GitHubApi(
                other
                    .to_string()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_end()
                    .to_string(),
            ),
        }
    }
}

/// Result type alias for gh-pr-resource
pub type Result<T> = std::result::Result<T, Error>;
