use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Completion contained no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// Opaque text-completion service: prompt in, completion text out.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model name used for logging.
    fn model(&self) -> &str {
        "unknown"
    }
}
