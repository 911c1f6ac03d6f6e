//! Concurrent fan-out: all three reviewers or nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pr_review_core::domain::error::{AgentError, BackendError};
use pr_review_core::{
    LlmBackend, MergeConfig, Orchestrator, RetryPolicy, ReviewConfig, ReviewError, ReviewerKind,
};
use serde_json::json;

const DIFF: &str = "--- a/db.py\n+++ b/db.py\n@@ -40,0 +40,3 @@\n+for user in users:\n+    orders = query(user.id)\n";

/// Answers each prompt according to the reviewer named in it.
#[derive(Default)]
struct RoutingBackend {
    replies: Mutex<HashMap<ReviewerKind, Vec<Result<String, BackendError>>>>,
    /// Per-reply latency, to let siblings finish in any order.
    delays: HashMap<ReviewerKind, Duration>,
    calls: AtomicUsize,
}

impl RoutingBackend {
    fn script(self, kind: ReviewerKind, replies: Vec<Result<String, BackendError>>) -> Self {
        self.replies.lock().unwrap().insert(kind, replies);
        self
    }

    fn delay(mut self, kind: ReviewerKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    fn reviewer_of(prompt: &str) -> Option<ReviewerKind> {
        if let Some(rest) = prompt.strip_prefix("Reviewer: ") {
            return rest.lines().next()?.parse().ok();
        }
        // Repair prompts echo the previous reply.
        ReviewerKind::ALL
            .into_iter()
            .find(|kind| prompt.contains(&format!("\"reviewer\":\"{kind}\"")))
    }
}

#[async_trait]
impl LlmBackend for RoutingBackend {
    fn name(&self) -> &str {
        "routing"
    }

    async fn send(
        &self,
        _system_prompt: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let kind = Self::reviewer_of(user_prompt)
            .ok_or_else(|| BackendError::Transport("unroutable prompt".to_string()))?;
        if let Some(delay) = self.delays.get(&kind) {
            tokio::time::sleep(*delay).await;
        }
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.entry(kind).or_default();
        if queue.is_empty() {
            return Err(BackendError::Transport("script exhausted".to_string()));
        }
        queue.remove(0)
    }
}

fn reply(kind: ReviewerKind, issues: serde_json::Value) -> Result<String, BackendError> {
    Ok(json!({
        "reviewer": kind.as_str(),
        "summary": format!("{kind} pass done"),
        "issues": issues,
    })
    .to_string())
}

fn config() -> ReviewConfig {
    ReviewConfig {
        retry: RetryPolicy::new(2, Duration::from_millis(100)),
        merge: MergeConfig::default(),
    }
}

#[tokio::test(start_paused = true)]
async fn all_three_reviews_are_collected() {
    let backend = RoutingBackend::default()
        .script(
            ReviewerKind::Security,
            vec![reply(ReviewerKind::Security, json!([]))],
        )
        .script(
            ReviewerKind::Performance,
            vec![reply(
                ReviewerKind::Performance,
                json!([{
                    "severity": "med",
                    "file": "db.py",
                    "lines": "40-42",
                    "title": "N+1 query",
                    "details": "One query per user.",
                    "suggestion": "Fetch orders in one batch."
                }]),
            )],
        )
        .script(
            ReviewerKind::Maintainability,
            vec![reply(ReviewerKind::Maintainability, json!([]))],
        )
        .delay(ReviewerKind::Security, Duration::from_millis(300));
    let backend = Arc::new(backend);

    let set = Orchestrator::new(backend.clone(), config())
        .run(DIFF)
        .await
        .unwrap();

    for (kind, review) in set.iter() {
        assert_eq!(review.reviewer, kind);
    }
    assert_eq!(set.issue_count(), 1);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 3);

    let keys: Vec<String> = serde_json::to_value(&set)
        .unwrap()
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys.len(), 3);
    for kind in ReviewerKind::ALL {
        assert!(keys.iter().any(|k| k == kind.as_str()));
    }

    let merged = set.merged(&MergeConfig::default());
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].title, "N+1 query");
}

#[tokio::test(start_paused = true)]
async fn reviewers_run_concurrently() {
    let backend = Arc::new(
        RoutingBackend::default()
            .script(ReviewerKind::Security, vec![reply(ReviewerKind::Security, json!([]))])
            .script(ReviewerKind::Performance, vec![reply(ReviewerKind::Performance, json!([]))])
            .script(
                ReviewerKind::Maintainability,
                vec![reply(ReviewerKind::Maintainability, json!([]))],
            )
            .delay(ReviewerKind::Security, Duration::from_secs(5))
            .delay(ReviewerKind::Performance, Duration::from_secs(5))
            .delay(ReviewerKind::Maintainability, Duration::from_secs(5)),
    );
    let start = tokio::time::Instant::now();

    Orchestrator::new(backend, config()).run(DIFF).await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn one_failed_reviewer_fails_the_run() {
    let backend = Arc::new(
        RoutingBackend::default()
            .script(ReviewerKind::Security, vec![reply(ReviewerKind::Security, json!([]))])
            .script(
                ReviewerKind::Performance,
                vec![
                    Ok(json!({"reviewer": "performance", "summary": "", "issues": []}).to_string()),
                    Ok("nope".to_string()),
                ],
            )
            .script(
                ReviewerKind::Maintainability,
                vec![reply(ReviewerKind::Maintainability, json!([]))],
            ),
    );

    let err = Orchestrator::new(backend, config())
        .run(DIFF)
        .await
        .unwrap_err();

    match err {
        ReviewError::AgentFailed { reviewer, source } => {
            assert_eq!(reviewer, ReviewerKind::Performance);
            assert!(matches!(source, AgentError::MalformedOutput { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn failure_does_not_wait_for_slow_siblings() {
    let backend = Arc::new(
        RoutingBackend::default()
            .script(ReviewerKind::Security, vec![reply(ReviewerKind::Security, json!([]))])
            .script(ReviewerKind::Performance, vec![reply(ReviewerKind::Performance, json!([]))])
            .delay(ReviewerKind::Security, Duration::from_secs(60))
            .delay(ReviewerKind::Performance, Duration::from_secs(60)),
    );
    let start = tokio::time::Instant::now();

    // Maintainability has no script: both attempts fail fast.
    let err = Orchestrator::new(backend, config())
        .run(DIFF)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReviewError::AgentFailed {
            reviewer: ReviewerKind::Maintainability,
            source: AgentError::BackendExhausted { attempts: 2, .. },
        }
    ));
    assert!(start.elapsed() < Duration::from_secs(60));
}

#[tokio::test]
async fn blank_diff_never_reaches_the_backend() {
    let backend = Arc::new(RoutingBackend::default());
    let err = Orchestrator::new(backend.clone(), config())
        .run("\n \t\n")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::EmptyDiff));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}
