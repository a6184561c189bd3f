use crate::domain::language::LanguageCode;
use crate::domain::shared::RemoteError;
use async_trait::async_trait;

/// Repository for text translation.
/// Abstracts the underlying AI provider.
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Translate `text` from `source` into `target` with `model`. One
    /// attempt; the caller owns retries and timeouts.
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
        model: &str,
    ) -> Result<String, RemoteError>;
}
