//! Chat-completion client for llm-code.
//!
//! The remote model API is reached through the narrow [`ChatBackend`] trait
//! (one `complete` operation), so the rest of the system can be exercised
//! against a canned backend. [`OpenAiClient`] is the production
//! implementation over the OpenAI chat-completions endpoint.

mod error;
mod openai;
mod types;

pub use error::ClientError;
pub use openai::OpenAiClient;
pub use types::{ChatMessage, ChatRole, CompletionRequest, CompletionResponse, Usage};

use async_trait::async_trait;

/// The single operation the assistant needs from a remote model.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one ordered list of messages and block until the reply arrives.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ClientError>;
}
