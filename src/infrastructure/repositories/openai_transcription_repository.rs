use super::transcription_repository::TranscriptionRepository;
use crate::domain::shared::RemoteError;
use crate::infrastructure::openai::{map_openai_error, OpenAiClient};
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::sync::Arc;

/// Chat platforms deliver voice notes as Ogg/Opus
const UPLOAD_FILE_NAME: &str = "voice.ogg";

/// OpenAI Whisper implementation of the transcription repository
pub struct OpenAiTranscriptionRepository {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiTranscriptionRepository {
    pub fn new(client: Arc<OpenAiClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl TranscriptionRepository for OpenAiTranscriptionRepository {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, RemoteError> {
        let start_time = std::time::Instant::now();

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                UPLOAD_FILE_NAME.to_string(),
                audio.to_vec(),
            ))
            .model(&self.model)
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    audio_size_bytes = audio.len(),
                    "OpenAI transcription call failed"
                );
                map_openai_error(e)
            })?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis() as u64,
            audio_size_bytes = audio.len(),
            characters_count = response.text.chars().count(),
            "Transcription completed"
        );

        Ok(response.text)
    }
}
