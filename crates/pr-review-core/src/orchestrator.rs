//! Concurrent fan-out of the three reviewers.
//!
//! Each reviewer runs as its own tokio task sharing one read-only backend
//! handle. Results flow back over a channel; the first fatal failure aborts
//! the sibling tasks and fails the whole run. There is no partial-result
//! mode: a [`ReviewSet`] is only built once all three reviews arrived.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{instrument, Instrument};
use uuid::Uuid;

use crate::agent::{AgentInvoker, RetryPolicy};
use crate::domain::digest::DiffDigest;
use crate::domain::error::{AgentError, ReviewError, ReviewResult};
use crate::domain::finding::{AgentReview, ReviewerKind};
use crate::domain::review_set::ReviewSet;
use crate::llm::LlmBackend;
use crate::merge::MergeConfig;
use crate::obs::{emit_agent_failed, emit_review_started, review_span};

/// Settings for one review run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub retry: RetryPolicy,
    pub merge: MergeConfig,
}

/// Reviews collected so far.
#[derive(Default)]
struct Collected {
    security: Option<AgentReview>,
    performance: Option<AgentReview>,
    maintainability: Option<AgentReview>,
}

impl Collected {
    fn insert(&mut self, kind: ReviewerKind, review: AgentReview) {
        let slot = match kind {
            ReviewerKind::Security => &mut self.security,
            ReviewerKind::Performance => &mut self.performance,
            ReviewerKind::Maintainability => &mut self.maintainability,
        };
        *slot = Some(review);
    }

    /// The full set, or the first reviewer still missing.
    fn complete(self) -> Result<ReviewSet, ReviewerKind> {
        match (self.security, self.performance, self.maintainability) {
            (Some(security), Some(performance), Some(maintainability)) => Ok(ReviewSet {
                security,
                performance,
                maintainability,
            }),
            (None, _, _) => Err(ReviewerKind::Security),
            (_, None, _) => Err(ReviewerKind::Performance),
            (_, _, None) => Err(ReviewerKind::Maintainability),
        }
    }
}

/// Runs all reviewers against one diff.
#[derive(Clone)]
pub struct Orchestrator {
    invoker: AgentInvoker,
    config: ReviewConfig,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn LlmBackend>, config: ReviewConfig) -> Self {
        Self {
            invoker: AgentInvoker::new(backend, config.retry),
            config,
        }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Run all three reviewers under a fresh run id.
    pub async fn run(&self, diff: &str) -> ReviewResult<ReviewSet> {
        self.run_with_id(&Uuid::new_v4().to_string(), diff).await
    }

    /// Run all three reviewers concurrently and wait for every result.
    ///
    /// Returns [`ReviewError::EmptyDiff`] without calling the backend when
    /// `diff` is blank, and [`ReviewError::AgentFailed`] for the first
    /// reviewer that fails.
    #[instrument(skip(self, diff), fields(diff_bytes = diff.len()))]
    pub async fn run_with_id(&self, run_id: &str, diff: &str) -> ReviewResult<ReviewSet> {
        if diff.trim().is_empty() {
            return Err(ReviewError::EmptyDiff);
        }

        let digest = DiffDigest::of(diff);
        let span = review_span(run_id, digest.short());
        emit_review_started(run_id, digest.as_str(), diff.len());

        let diff: Arc<str> = Arc::from(diff);
        let (tx, mut rx) = mpsc::channel::<(ReviewerKind, Result<AgentReview, AgentError>)>(
            ReviewerKind::ALL.len(),
        );

        let mut handles: Vec<(ReviewerKind, JoinHandle<()>)> =
            Vec::with_capacity(ReviewerKind::ALL.len());
        for kind in ReviewerKind::ALL {
            let invoker = self.invoker.clone();
            let diff = Arc::clone(&diff);
            let tx = tx.clone();
            let task = async move {
                let result = invoker.invoke(kind, &diff).await;
                // The receiver is gone only when a sibling already failed.
                let _ = tx.send((kind, result)).await;
            };
            handles.push((kind, tokio::spawn(task.instrument(span.clone()))));
        }
        drop(tx);

        let mut collected = Collected::default();
        while let Some((kind, result)) = rx.recv().await {
            match result {
                Ok(review) => collected.insert(kind, review),
                Err(source) => {
                    emit_agent_failed(kind, &source);
                    for (_, handle) in &handles {
                        handle.abort();
                    }
                    return Err(ReviewError::AgentFailed {
                        reviewer: kind,
                        source,
                    });
                }
            }
        }

        match collected.complete() {
            Ok(set) => Ok(set),
            Err(missing) => {
                // A task ended without reporting: surface its join error.
                for (kind, handle) in handles {
                    if let Err(join_err) = handle.await {
                        return Err(ReviewError::TaskAborted {
                            reviewer: kind,
                            detail: join_err.to_string(),
                        });
                    }
                }
                Err(ReviewError::TaskAborted {
                    reviewer: missing,
                    detail: "task exited without reporting a result".to_string(),
                })
            }
        }
    }
}
