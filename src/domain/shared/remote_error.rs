use std::time::Duration;

/// Failure of a call to the remote AI provider (translation, transcription
/// or speech synthesis).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("provider quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("request rejected by provider: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Whether another attempt could succeed. Rejections and an exhausted
    /// quota repeat on every attempt, everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            RemoteError::Rejected(_) | RemoteError::QuotaExhausted(_)
        )
    }
}
