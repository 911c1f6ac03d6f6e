//! Agent invoker: prompt, call, parse, retry and repair for one reviewer.
//!
//! # Module layout
//!
//! - [`prompt`]: shared system prompt, review and repair prompts
//! - [`parse`]: `strip_code_fence`, `parse_review`
//! - [`retry`]: `RetryPolicy` (linear backoff)
//! - [`invoker`]: `AgentInvoker::invoke` state machine

pub mod invoker;
pub mod parse;
pub mod prompt;
pub mod retry;

pub use invoker::{AgentInvoker, Pass};
pub use parse::{parse_review, strip_code_fence};
pub use retry::RetryPolicy;
