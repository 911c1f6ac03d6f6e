//! Agent invocation: one reviewer kind, one diff, one validated review.
//!
//! The call is driven by an explicit state machine:
//!
//! ```text
//! Attempting ──ok, valid──────────────► Succeeded
//!     │  ├──ok, invalid (initial)──────► Repairing ──► Attempting (repair pass)
//!     │  ├──ok, invalid (repair)───────► Failed(MalformedOutput)
//!     │  ├──backend error, retry left──► Backoff ──sleep──► Attempting
//!     │  └──backend error, exhausted───► Failed(BackendExhausted)
//! ```
//!
//! Backend retries are counted per pass, so the repair call gets its own
//! fresh attempt budget. At most two replies are ever parsed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::agent::parse::parse_review;
use crate::agent::prompt::{repair_prompt, review_prompt, system_prompt};
use crate::agent::retry::RetryPolicy;
use crate::domain::error::{AgentError, BackendError, OutputError};
use crate::domain::finding::{AgentReview, ReviewerKind};
use crate::llm::LlmBackend;
use crate::obs::{emit_agent_completed, emit_attempt_failed, emit_repair_requested};

/// Which reply is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Initial,
    Repair,
}

/// States of one invocation.
#[derive(Debug)]
enum InvocationState {
    Attempting {
        pass: Pass,
        prompt: String,
        attempt: u32,
    },
    Backoff {
        pass: Pass,
        prompt: String,
        attempt: u32,
        delay: Duration,
    },
    Repairing {
        raw: String,
        error: OutputError,
    },
    Succeeded(AgentReview),
    Failed(AgentError),
}

/// Sends review prompts for one backend and absorbs transient failures and
/// malformed replies.
#[derive(Clone)]
pub struct AgentInvoker {
    backend: Arc<dyn LlmBackend>,
    policy: RetryPolicy,
    system_prompt: Arc<str>,
}

impl AgentInvoker {
    pub fn new(backend: Arc<dyn LlmBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            system_prompt: system_prompt().into(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run one reviewer over `diff`.
    ///
    /// The diff must be non-empty; the orchestrator checks this before
    /// fanning out.
    #[instrument(skip(self, diff), fields(reviewer = %kind, backend = %self.backend.name()))]
    pub async fn invoke(&self, kind: ReviewerKind, diff: &str) -> Result<AgentReview, AgentError> {
        let mut backend_calls = 0u32;
        let mut state = InvocationState::Attempting {
            pass: Pass::Initial,
            prompt: review_prompt(kind, diff),
            attempt: 1,
        };

        loop {
            state = match state {
                InvocationState::Attempting {
                    pass,
                    prompt,
                    attempt,
                } => {
                    backend_calls += 1;
                    match self.send(&prompt).await {
                        Ok(raw) => self.on_reply(kind, pass, raw),
                        Err(err) => {
                            emit_attempt_failed(kind, attempt, self.policy.attempts(), &err);
                            if self.policy.can_retry(attempt) {
                                InvocationState::Backoff {
                                    pass,
                                    prompt,
                                    attempt,
                                    delay: self.policy.delay_after(attempt),
                                }
                            } else {
                                InvocationState::Failed(AgentError::BackendExhausted {
                                    reviewer: kind,
                                    attempts: attempt,
                                    last: err,
                                })
                            }
                        }
                    }
                }
                InvocationState::Backoff {
                    pass,
                    prompt,
                    attempt,
                    delay,
                } => {
                    debug!(?pass, attempt, delay_ms = delay.as_millis() as u64, "backing off");
                    tokio::time::sleep(delay).await;
                    InvocationState::Attempting {
                        pass,
                        prompt,
                        attempt: attempt + 1,
                    }
                }
                InvocationState::Repairing { raw, error } => {
                    emit_repair_requested(kind, &error);
                    InvocationState::Attempting {
                        pass: Pass::Repair,
                        prompt: repair_prompt(&raw, &error),
                        attempt: 1,
                    }
                }
                InvocationState::Succeeded(review) => {
                    emit_agent_completed(kind, review.issues.len(), backend_calls);
                    return Ok(review);
                }
                InvocationState::Failed(err) => return Err(err),
            };
        }
    }

    /// One backend call. Blank replies count as a backend failure.
    async fn send(&self, prompt: &str) -> Result<String, BackendError> {
        let raw = self.backend.send(Some(&*self.system_prompt), prompt).await?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }

    fn on_reply(&self, kind: ReviewerKind, pass: Pass, raw: String) -> InvocationState {
        match parse_review(&raw, kind) {
            Ok(review) => InvocationState::Succeeded(review),
            Err(error) => match pass {
                Pass::Initial => InvocationState::Repairing { raw, error },
                Pass::Repair => InvocationState::Failed(AgentError::MalformedOutput {
                    reviewer: kind,
                    source: error,
                }),
            },
        }
    }
}
