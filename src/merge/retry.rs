//! Merge retry policy - pure functions deciding whether an attempt is retried
//!
//! No I/O happens here. The executor feeds each attempt's result through
//! [`RetryPolicy::classify`] and acts on the outcome.

use crate::error::{Error, FailureClass, Result};
use std::time::Duration;

/// Delay between merge attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Bounds on merge attempts, by failure class
///
/// The attempt counter is shared across classes: a client failure on the
/// fourth attempt is fatal even if earlier attempts failed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed while failures are client errors (4xx)
    pub client_attempts: u32,
    /// Total attempts allowed while failures are server errors (5xx)
    pub server_attempts: u32,
    /// Wait before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            client_attempts: 3,
            server_attempts: 5,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// What to do after one attempt
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// The attempt succeeded
    Success(T),
    /// The attempt failed and another one is allowed
    Retryable(Error),
    /// The attempt failed and no more are allowed (or the failure is not retryable)
    Fatal(Error),
}

impl RetryPolicy {
    /// Attempt ceiling for a failure class, `None` if it is never retried
    pub const fn max_attempts(&self, class: FailureClass) -> Option<u32> {
        match class {
            FailureClass::Client => Some(self.client_attempts),
            FailureClass::Server => Some(self.server_attempts),
            FailureClass::Other => None,
        }
    }

    /// Classify the result of attempt number `attempt` (1-based)
    pub fn classify<T>(&self, attempt: u32, result: Result<T>) -> AttemptOutcome<T> {
        match result {
            Ok(value) => AttemptOutcome::Success(value),
            Err(err) => match self.max_attempts(err.failure_class()) {
                Some(max) if attempt < max => AttemptOutcome::Retryable(err),
                _ => AttemptOutcome::Fatal(err),
            },
        }
    }
}
