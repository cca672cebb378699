//! Merge engine for the output stage
//!
//! Two parts, matching the rest of the crate:
//! 1. Retry - classify each attempt's result against a `RetryPolicy` (pure, testable)
//! 2. Execute - perform the merge attempts with a fixed backoff (effectful)

mod execute;
mod retry;

pub use execute::{MergeOutcome, execute_merge};
pub use retry::{AttemptOutcome, DEFAULT_RETRY_DELAY, RetryPolicy};
