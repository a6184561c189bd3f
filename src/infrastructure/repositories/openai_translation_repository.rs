use super::translation_repository::TranslationRepository;
use crate::domain::language::LanguageCode;
use crate::domain::shared::RemoteError;
use crate::infrastructure::openai::{map_openai_error, OpenAiClient};
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_trait::async_trait;
use std::sync::Arc;

const TEMPERATURE: f32 = 0.3;

/// OpenAI chat-completion implementation of the translation repository
pub struct OpenAiTranslationRepository {
    client: Arc<OpenAiClient>,
    max_tokens: u32,
}

impl OpenAiTranslationRepository {
    pub fn new(client: Arc<OpenAiClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    fn prompt(text: &str, source: LanguageCode, target: LanguageCode) -> String {
        format!(
            "Translate this {source} text into {target}.\n\n\
             Reply with the translation only, without quotes or the language name.\n\n\
             Text: {text}",
            source = source.name(),
            target = target.name(),
        )
    }
}

/// Models sometimes answer "Thai: ..." despite the prompt; drop that label
fn strip_language_label(reply: &str, target: LanguageCode) -> &str {
    let reply = reply.trim();
    match reply.split_once(':') {
        Some((label, rest)) if label.trim().eq_ignore_ascii_case(target.name()) => rest.trim(),
        _ => reply,
    }
}

#[async_trait]
impl TranslationRepository for OpenAiTranslationRepository {
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
        model: &str,
    ) -> Result<String, RemoteError> {
        let start_time = std::time::Instant::now();

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(Self::prompt(text, source, target))
            .build()
            .map_err(map_openai_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .max_tokens(self.max_tokens)
            .temperature(TEMPERATURE)
            .messages(vec![message.into()])
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model,
                    source = %source,
                    target = %target,
                    "OpenAI translation call failed"
                );
                map_openai_error(e)
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RemoteError::Malformed("completion has no content".to_string()))?;

        let translation = strip_language_label(&content, target);
        if translation.is_empty() {
            return Err(RemoteError::Malformed("empty translation".to_string()));
        }

        tracing::info!(
            provider = "openai",
            model,
            source = %source,
            target = %target,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.chars().count(),
            "Translation completed"
        );

        Ok(translation.to_string())
    }
}
