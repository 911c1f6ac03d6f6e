//! In-memory backend fakes (testing and offline runs).
//!
//! [`ScriptedBackend`] replays canned replies and records every prompt it
//! receives, so tests can assert on call counts and prompt contents.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::error::BackendError;
use crate::llm::backend::LlmBackend;

/// One prompt pair as received by a fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
}

/// Replays a queue of scripted replies in order.
///
/// Once the script is exhausted every further call fails with
/// [`BackendError::Transport`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, BackendError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that answers every call with `reply`, `count` times.
    pub fn repeating(reply: impl Into<String>, count: usize) -> Self {
        let reply = reply.into();
        Self::new((0..count).map(|_| Ok(reply.clone())))
    }

    /// Append one more reply to the script.
    pub fn push(&self, reply: Result<String, BackendError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system_prompt: system_prompt.map(str::to_string),
            user_prompt: user_prompt.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_fails() {
        let backend = ScriptedBackend::new([Ok("one".to_string()), Err(BackendError::EmptyResponse)]);
        assert_eq!(backend.send(None, "a").await.unwrap(), "one");
        assert!(matches!(
            backend.send(Some("sys"), "b").await,
            Err(BackendError::EmptyResponse)
        ));
        assert!(matches!(
            backend.send(None, "c").await,
            Err(BackendError::Transport(_))
        ));
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].system_prompt.as_deref(), Some("sys"));
    }
}
