use super::tts_repository::{TtsRepository, VoiceParams};
use crate::domain::language::LanguageCode;
use crate::domain::shared::RemoteError;
use crate::infrastructure::openai::{map_openai_error, OpenAiClient};
use async_openai::types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_INPUT_CHARACTERS: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<OpenAiClient>,
    model: String,
    voice_override: Option<String>,
    speed: f32,
}

impl OpenAiTtsRepository {
    pub fn new(
        client: Arc<OpenAiClient>,
        model: String,
        voice_override: Option<String>,
        speed: f32,
    ) -> Self {
        Self {
            client,
            model,
            voice_override,
            speed,
        }
    }

    /// Voice used for a language when no single voice is configured
    fn get_voice_for_language(language: LanguageCode) -> &'static str {
        match language {
            LanguageCode::Russian => "onyx",
            LanguageCode::English => "alloy",
            LanguageCode::Thai => "shimmer",
            LanguageCode::Japanese => "nova",
            LanguageCode::Korean => "nova",
            LanguageCode::Vietnamese => "echo",
        }
    }

    fn speech_model(model: &str) -> SpeechModel {
        match model {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn voice(name: &str) -> Result<Voice, RemoteError> {
        match name.to_lowercase().as_str() {
            "alloy" => Ok(Voice::Alloy),
            "echo" => Ok(Voice::Echo),
            "fable" => Ok(Voice::Fable),
            "onyx" => Ok(Voice::Onyx),
            "nova" => Ok(Voice::Nova),
            "shimmer" => Ok(Voice::Shimmer),
            other => Err(RemoteError::Rejected(format!("unknown voice {other}"))),
        }
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn voice_for(&self, language: LanguageCode) -> VoiceParams {
        let voice = self
            .voice_override
            .clone()
            .unwrap_or_else(|| Self::get_voice_for_language(language).to_string());

        VoiceParams {
            model: self.model.clone(),
            voice,
            speed: self.speed,
        }
    }

    async fn synthesize(&self, text: &str, voice: &VoiceParams) -> Result<Vec<u8>, RemoteError> {
        let start_time = std::time::Instant::now();
        let characters_count = text.chars().count();

        if characters_count > MAX_INPUT_CHARACTERS {
            return Err(RemoteError::Rejected(format!(
                "speech input of {} characters exceeds {}",
                characters_count, MAX_INPUT_CHARACTERS
            )));
        }

        let request = CreateSpeechRequest {
            model: Self::speech_model(&voice.model),
            input: text.to_string(),
            voice: Self::voice(&voice.voice)?,
            response_format: Some(SpeechResponseFormat::Opus),
            speed: Some(voice.speed),
        };

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %voice.model,
                    voice = %voice.voice,
                    text_length = characters_count,
                    "OpenAI TTS API call failed"
                );
                map_openai_error(e)
            })?;

        let audio_data = response.bytes.to_vec();
        if audio_data.is_empty() {
            return Err(RemoteError::Malformed("empty audio".to_string()));
        }

        tracing::info!(
            provider = "openai",
            model = %voice.model,
            voice = %voice.voice,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count,
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
