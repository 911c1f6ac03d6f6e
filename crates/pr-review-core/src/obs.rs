//! Structured observability hooks for the review lifecycle.
//!
//! This module provides:
//! - Run-scoped tracing spans via `ReviewSpan` RAII guard
//! - Emission functions for key lifecycle events: run start, attempt
//!   failure, repair request, agent completion, merge
//!
//! Events are emitted at `info!` level (`warn!` for failures); filter with
//! `RUST_LOG`.

use tracing::{info, warn};

use crate::domain::finding::ReviewerKind;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = ReviewSpan::enter("3f0c…", "a1b2c3d4e5f6");
/// // Now all tracing calls carry run_id and diff_digest.
/// ```
pub struct ReviewSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReviewSpan {
    /// Create and enter a span tagged with the run id and diff digest.
    pub fn enter(run_id: &str, diff_digest: &str) -> Self {
        Self {
            _span: review_span(run_id, diff_digest).entered(),
        }
    }
}

/// The run-scoped span, unentered. Async code attaches it with
/// `tracing::Instrument` instead of holding a [`ReviewSpan`] across awaits.
pub fn review_span(run_id: &str, diff_digest: &str) -> tracing::Span {
    tracing::info_span!("pr_review.run", run_id = %run_id, diff_digest = %diff_digest)
}

/// Emit event: review run started.
pub fn emit_review_started(run_id: &str, diff_digest: &str, diff_bytes: usize) {
    info!(
        event = "review.started",
        run_id = %run_id,
        diff_digest = %diff_digest,
        diff_bytes = diff_bytes,
    );
}

/// Emit event: one backend attempt failed (will be retried or surfaced).
pub fn emit_attempt_failed(
    reviewer: ReviewerKind,
    attempt: u32,
    max_attempts: u32,
    error: &dyn std::fmt::Display,
) {
    warn!(
        event = "agent.attempt_failed",
        reviewer = %reviewer,
        attempt = attempt,
        max_attempts = max_attempts,
        error = %error,
    );
}

/// Emit event: the first reply was rejected and a repair prompt is sent.
pub fn emit_repair_requested(reviewer: ReviewerKind, error: &dyn std::fmt::Display) {
    warn!(event = "agent.repair_requested", reviewer = %reviewer, error = %error);
}

/// Emit event: one reviewer produced a validated review.
pub fn emit_agent_completed(reviewer: ReviewerKind, issues: usize, backend_calls: u32) {
    info!(
        event = "agent.completed",
        reviewer = %reviewer,
        issues = issues,
        backend_calls = backend_calls,
    );
}

/// Emit event: one reviewer failed fatally.
pub fn emit_agent_failed(reviewer: ReviewerKind, error: &dyn std::fmt::Display) {
    warn!(event = "agent.failed", reviewer = %reviewer, error = %error);
}

/// Emit event: findings merged.
pub fn emit_review_merged(input_issues: usize, kept_issues: usize) {
    info!(
        event = "review.merged",
        input_issues = input_issues,
        kept_issues = kept_issues,
        dropped = input_issues.saturating_sub(kept_issues),
    );
}
