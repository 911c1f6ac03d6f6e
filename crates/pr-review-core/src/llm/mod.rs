//! Language-model backends.
//!
//! - [`backend`]: the `LlmBackend` trait (the call boundary)
//! - [`config`]: `LlmConfig` and its environment overlay
//! - [`openai`]: `OpenAiBackend` over `reqwest`
//! - [`fakes`]: `ScriptedBackend` for tests

pub mod backend;
pub mod config;
pub mod fakes;
pub mod openai;

pub use backend::LlmBackend;
pub use config::LlmConfig;
pub use fakes::{RecordedCall, ScriptedBackend};
pub use openai::OpenAiBackend;
