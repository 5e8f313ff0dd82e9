//! Transform seam between the pipeline and the remote generation service.

use async_trait::async_trait;
use thiserror::Error;

use super::prompts::PromptTemplate;

/// A failed generation call. Recoverable: the pipeline skips the file.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Response contained no candidate text")]
    MissingText,
}

/// Turns one file's content into an artifact.
///
/// Implementations make at most one remote call per invocation and never
/// retry; callers decide what a failure means.
#[async_trait]
pub trait TransformInvoker: Send + Sync {
    async fn invoke(&self, template: &PromptTemplate, content: &str) -> Result<String, InvocationError>;
}
