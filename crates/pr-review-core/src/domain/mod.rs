//! Domain models for a review run.
//!
//! - `Issue` / `AgentReview`: closed-schema finding records
//! - `ReviewSet`: the three per-reviewer results of one run
//! - `DiffDigest`: content digest of the reviewed diff

pub mod digest;
pub mod error;
pub mod finding;
pub mod review_set;

pub use digest::DiffDigest;
pub use error::{AgentError, BackendError, OutputError, ReviewError, ReviewResult, SchemaError};
pub use finding::{AgentReview, Issue, ReviewerKind, Severity};
pub use review_set::ReviewSet;
