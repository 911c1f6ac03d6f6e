//! PR review core library.
//!
//! Three reviewer agents (security, performance, maintainability) are run
//! concurrently over one unified diff; their findings are merged into a
//! single ranked, deduplicated list and rendered as JSON and Markdown.

pub mod agent;
pub mod domain;
pub mod llm;
pub mod merge;
pub mod obs;
pub mod orchestrator;
pub mod reporting;
pub mod telemetry;

pub use agent::{parse_review, strip_code_fence, AgentInvoker, RetryPolicy};
pub use domain::{
    AgentError, AgentReview, BackendError, DiffDigest, Issue, OutputError, ReviewError,
    ReviewResult, ReviewSet, ReviewerKind, SchemaError, Severity,
};
pub use llm::{LlmBackend, LlmConfig, OpenAiBackend, ScriptedBackend};
pub use merge::{merge_issues, merge_reviews, LineRange, MergeConfig};
pub use obs::{emit_review_merged, emit_review_started, ReviewSpan};
pub use orchestrator::{Orchestrator, ReviewConfig};
pub use reporting::{
    render_markdown, write_review_json, write_review_md, SeverityCounts, REVIEW_JSON_FILE,
    REVIEW_MD_FILE,
};
pub use telemetry::init_tracing;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
