use crate::domain::language::LanguageCode;
use crate::domain::shared::RemoteError;
use async_trait::async_trait;

/// Voice settings for one synthesis call. They are part of the speech cache
/// key, so two calls with equal params must produce interchangeable audio.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    pub model: String,
    pub voice: String,
    pub speed: f32,
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying speech provider.
///
/// Implementations are responsible for provider-specific voice selection and
/// input limits. A single call makes one attempt; retries and timeouts are
/// applied by the caller.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Voice settings used for `language`
    fn voice_for(&self, language: LanguageCode) -> VoiceParams;

    /// Synthesize text to speech. Returns Opus audio ready for a voice reply.
    async fn synthesize(&self, text: &str, voice: &VoiceParams) -> Result<Vec<u8>, RemoteError>;
}
