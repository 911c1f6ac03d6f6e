//! The language-model call boundary.

use async_trait::async_trait;

use crate::domain::error::BackendError;

/// A chat-style language model.
///
/// Implementations are shared read-only between concurrent reviewer tasks,
/// so they must be `Send + Sync`. A single call either yields the raw reply
/// text or one [`BackendError`]; retries are the caller's concern.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Send one prompt pair and return the raw reply text.
    async fn send(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
    ) -> Result<String, BackendError>;
}
