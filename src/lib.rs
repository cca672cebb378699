//! gh-pr-resource: the output stage of a GitHub pull request CI resource
//!
//! Resolves which commit and PR a build result belongs to, publishes commit
//! statuses, attaches comments, assignees and labels, and optionally merges
//! the PR with bounded retries. The dependency gate decides whether a PR's
//! `depends:` declarations are all merged.

pub mod config;
pub mod error;
pub mod gate;
pub mod merge;
pub mod out;
pub mod platform;
pub mod status;
pub mod template;
pub mod types;
pub mod workspace;

pub use error::{Error, Result};
