//! Language-model completion backends.

pub mod responses;

use async_trait::async_trait;

use crate::error::Result;

pub use responses::ResponsesClient;

/// One system/user prompt pair sent to a completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// A text-completion endpoint.
///
/// Implementations return the plain answer text, which may be empty when the
/// endpoint produced nothing usable.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
