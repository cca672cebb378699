//! Output stage orchestration
//!
//! Runs one `out` invocation in fixed phases:
//! 1. Validate - check params and referenced files before any side effect
//! 2. Resolve - find the commit and PR the build belongs to
//! 3. Execute - publish statuses, attach artifacts, merge
//!
//! Nothing is rolled back: a failure part way leaves earlier side effects in
//! place and the invocation fails without a response.

mod execute;
mod plan;

pub use execute::{OutContext, execute_out, run_out, split_labels};
pub use plan::{Identity, resolve_identity, validate_out};
