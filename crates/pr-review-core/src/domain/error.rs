//! Error taxonomy for a review run.
//!
//! - [`BackendError`]: one backend attempt failed; retried locally.
//! - [`OutputError`]: a reply could not be parsed or validated; repaired once.
//! - [`AgentError`]: fatal for one reviewer kind.
//! - [`ReviewError`]: fatal for the whole run.

use crate::domain::finding::ReviewerKind;

/// A single failed call to the language-model backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("empty model response")]
    EmptyResponse,

    #[error("undecodable backend response: {0}")]
    Decode(String),
}

/// Structural violations of the finding schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field `{field}` must not be empty")]
    EmptyField { field: String },

    #[error("reviewer mismatch: expected {expected}, got {actual}")]
    ReviewerMismatch {
        expected: ReviewerKind,
        actual: ReviewerKind,
    },

    #[error("unknown reviewer kind: {name}")]
    UnknownReviewer { name: String },
}

/// Why a model reply was rejected.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),
}

/// Fatal failure of one agent invocation.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("{reviewer}: backend failed after {attempts} attempt(s): {last}")]
    BackendExhausted {
        reviewer: ReviewerKind,
        attempts: u32,
        #[source]
        last: BackendError,
    },

    #[error("{reviewer}: malformed output after repair: {source}")]
    MalformedOutput {
        reviewer: ReviewerKind,
        #[source]
        source: OutputError,
    },
}

impl AgentError {
    pub fn reviewer(&self) -> ReviewerKind {
        match self {
            AgentError::BackendExhausted { reviewer, .. }
            | AgentError::MalformedOutput { reviewer, .. } => *reviewer,
        }
    }
}

/// Errors surfaced to callers of the review pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("diff text is empty")]
    EmptyDiff,

    #[error("{reviewer} reviewer failed: {source}")]
    AgentFailed {
        reviewer: ReviewerKind,
        #[source]
        source: AgentError,
    },

    #[error("{reviewer} reviewer task aborted: {detail}")]
    TaskAborted {
        reviewer: ReviewerKind,
        detail: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AgentError> for ReviewError {
    fn from(source: AgentError) -> Self {
        ReviewError::AgentFailed {
            reviewer: source.reviewer(),
            source,
        }
    }
}

/// Result type for review pipeline operations.
pub type ReviewResult<T> = std::result::Result<T, ReviewError>;
