use crate::domain::shared::RemoteError;
use async_trait::async_trait;

/// Repository for speech-to-text
#[async_trait]
pub trait TranscriptionRepository: Send + Sync {
    /// Transcribe an audio payload. One attempt; the caller owns retries and
    /// timeouts.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, RemoteError>;
}
