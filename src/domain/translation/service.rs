use super::error::TranslationServiceError;
use super::formatting;
use super::model::ModelSelector;
use super::rate_limit::{MessageKind, RateLimiter};
use super::{OutgoingMessage, OutgoingMessages};
use crate::domain::cache::{
    fingerprint, Fingerprint, FingerprintParams, OperationKind, ResponseCache, SpeechCache,
    TranslationCache,
};
use crate::domain::fanout::{Fanout, FanoutResults};
use crate::domain::language::{LanguageCode, LanguageDetection};
use crate::domain::shared::RemoteError;
use crate::domain::user::{UserId, UserProfile, UserRecord};
use crate::infrastructure::repositories::{
    TranscriptionRepository, TranslationRepository, TtsRepository, UserStateStore, VoiceParams,
};
use async_trait::async_trait;
use base64::Engine;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Per-target translation outcome of one request
pub type TranslationBatch = FanoutResults<LanguageCode, String>;

/// Per-language synthesis outcome of one request
pub type SpeechBatch = FanoutResults<LanguageCode, Vec<u8>>;

#[derive(Debug, Clone)]
pub struct TranslationSettings {
    pub max_input_characters: usize,
    pub max_audio_bytes: usize,
    pub tts_max_characters: usize,
    pub display_truncate: usize,
}

/// Remote AI collaborators
#[derive(Clone)]
pub struct RemoteProviders {
    pub translator: Arc<dyn TranslationRepository>,
    /// Model the translator is asked to use, switchable by admins
    pub translation_model: Arc<ModelSelector>,
    pub transcriber: Arc<dyn TranscriptionRepository>,
    pub tts: Arc<dyn TtsRepository>,
}

#[derive(Clone)]
pub struct ResponseCaches {
    pub translation: Arc<TranslationCache>,
    pub speech: Arc<SpeechCache>,
}

/// Per-message orchestration: admission, cache lookup, fanout on misses,
/// cache population, counters.
pub struct TranslationService {
    users: Arc<dyn UserStateStore>,
    providers: RemoteProviders,
    detector: Arc<dyn LanguageDetection>,
    caches: ResponseCaches,
    fanout: Fanout,
    rate_limiter: Arc<RateLimiter>,
    settings: TranslationSettings,
}

impl TranslationService {
    pub fn new(
        users: Arc<dyn UserStateStore>,
        providers: RemoteProviders,
        detector: Arc<dyn LanguageDetection>,
        caches: ResponseCaches,
        fanout: Fanout,
        rate_limiter: Arc<RateLimiter>,
        settings: TranslationSettings,
    ) -> Self {
        Self {
            users,
            providers,
            detector,
            caches,
            fanout,
            rate_limiter,
            settings,
        }
    }
}

#[async_trait]
pub trait TranslationServiceApi: Send + Sync {
    /// Translate an inbound text message into the user's target languages.
    ///
    /// The user's message counter is incremented exactly once for every
    /// admitted request. Provider failures become notices in the reply;
    /// only invalid input, disabled access, throttling and store failures
    /// are errors.
    async fn handle_text_message(
        &self,
        user_id: UserId,
        text: &str,
        profile: Option<UserProfile>,
    ) -> Result<OutgoingMessages, TranslationServiceError>;

    /// Transcribe an inbound voice message, echo the transcription and
    /// translate it like a text message
    async fn handle_voice_message(
        &self,
        user_id: UserId,
        audio: &[u8],
    ) -> Result<OutgoingMessages, TranslationServiceError>;

    /// Translate `text` into every target, serving cached targets directly
    /// and fanning out the rest. Successful results are cached before this
    /// returns.
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        targets: &BTreeSet<LanguageCode>,
    ) -> TranslationBatch;

    /// Synthesize speech for every (language, text) pair through the speech
    /// cache
    async fn synthesize(&self, texts: &BTreeMap<LanguageCode, String>) -> SpeechBatch;
}

#[async_trait]
impl TranslationServiceApi for TranslationService {
    async fn handle_text_message(
        &self,
        user_id: UserId,
        text: &str,
        profile: Option<UserProfile>,
    ) -> Result<OutgoingMessages, TranslationServiceError> {
        let text = text.trim();
        self.validate_text(text)?;

        let user = self
            .admit(user_id, MessageKind::Text, profile.as_ref())
            .await?;

        tracing::info!(
            user_id,
            text_length = text.chars().count(),
            "Text message admitted"
        );

        self.reply_to(&user, text, false).await
    }

    async fn handle_voice_message(
        &self,
        user_id: UserId,
        audio: &[u8],
    ) -> Result<OutgoingMessages, TranslationServiceError> {
        if audio.is_empty() {
            return Err(TranslationServiceError::Invalid(
                formatting::EMPTY_AUDIO.to_string(),
            ));
        }
        if audio.len() > self.settings.max_audio_bytes {
            return Err(TranslationServiceError::PayloadTooLarge(
                formatting::audio_too_large(audio.len(), self.settings.max_audio_bytes),
            ));
        }

        let user = self.admit(user_id, MessageKind::Voice, None).await?;

        tracing::info!(
            user_id,
            audio_size_bytes = audio.len(),
            "Voice message admitted"
        );

        let transcriber = &self.providers.transcriber;
        let transcription = match self
            .fanout
            .retry_policy()
            .run("transcribe", || transcriber.transcribe(audio))
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Transcription failed");
                return Ok(OutgoingMessages::single(formatting::TRANSCRIPTION_FAILED));
            }
        };

        if transcription.is_empty() {
            tracing::warn!(user_id, "Transcription is empty");
            return Ok(OutgoingMessages::single(formatting::TRANSCRIPTION_FAILED));
        }

        let length = transcription.chars().count();
        if length > self.settings.max_input_characters {
            return Ok(OutgoingMessages::single(formatting::text_too_long(
                length,
                self.settings.max_input_characters,
            )));
        }

        self.reply_to(&user, &transcription, true).await
    }

    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        targets: &BTreeSet<LanguageCode>,
    ) -> TranslationBatch {
        let translator = &self.providers.translator;
        let model = self.providers.translation_model.current();
        let keys: BTreeMap<LanguageCode, Fingerprint> = targets
            .iter()
            .map(|&target| {
                let params = FingerprintParams {
                    source: Some(source),
                    targets: &[target],
                    model: &model,
                    ..Default::default()
                };
                (target, fingerprint(OperationKind::Translate, text, &params))
            })
            .collect();

        let (mut results, misses) = lookup(&self.caches.translation, &keys).await;

        tracing::debug!(
            source = %source,
            cache_hits = results.len(),
            cache_misses = misses.len(),
            "Translation cache lookup"
        );

        if !misses.is_empty() {
            let fetched = self
                .fanout
                .run("translate", misses, |target| {
                    translator.translate(text, source, target, &model)
                })
                .await;

            let ttl = self.caches.translation.ttl();
            for (target, result) in fetched {
                if let Ok(translation) = &result {
                    self.caches
                        .translation
                        .put(keys[&target], translation.clone(), ttl)
                        .await;
                }
                results.push((target, result));
            }
        }

        results.into_iter().collect()
    }

    async fn synthesize(&self, texts: &BTreeMap<LanguageCode, String>) -> SpeechBatch {
        let tts = &self.providers.tts;
        let voices: BTreeMap<LanguageCode, VoiceParams> = texts
            .keys()
            .map(|&language| (language, tts.voice_for(language)))
            .collect();
        let keys: BTreeMap<LanguageCode, Fingerprint> = texts
            .iter()
            .map(|(&language, text)| {
                let voice = &voices[&language];
                let params = FingerprintParams {
                    source: None,
                    targets: &[language],
                    model: &voice.model,
                    voice: Some(&voice.voice),
                    speed: Some(voice.speed),
                };
                (language, fingerprint(OperationKind::Speech, text, &params))
            })
            .collect();

        let (mut results, misses) = lookup(&self.caches.speech, &keys).await;

        tracing::debug!(
            cache_hits = results.len(),
            cache_misses = misses.len(),
            "Speech cache lookup"
        );

        if !misses.is_empty() {
            let fetched = self
                .fanout
                .run("speech", misses, |language| {
                    tts.synthesize(&texts[&language], &voices[&language])
                })
                .await;

            let ttl = self.caches.speech.ttl();
            for (language, result) in fetched {
                if let Ok(audio) = &result {
                    self.caches.speech.put(keys[&language], audio.clone(), ttl).await;
                }
                results.push((language, result));
            }
        }

        results.into_iter().collect()
    }
}

impl TranslationService {
    fn validate_text(&self, text: &str) -> Result<(), TranslationServiceError> {
        if text.is_empty() {
            return Err(TranslationServiceError::Invalid(
                formatting::EMPTY_MESSAGE.to_string(),
            ));
        }
        let length = text.chars().count();
        if length > self.settings.max_input_characters {
            return Err(TranslationServiceError::PayloadTooLarge(
                formatting::text_too_long(length, self.settings.max_input_characters),
            ));
        }
        Ok(())
    }

    /// Load the user, refuse disabled or throttled users, then count the
    /// message. Nothing after this point may fail the request silently.
    async fn admit(
        &self,
        user_id: UserId,
        kind: MessageKind,
        profile: Option<&UserProfile>,
    ) -> Result<UserRecord, TranslationServiceError> {
        // 1. Load or create the user
        let user = match profile.filter(|profile| !profile.is_empty()) {
            Some(profile) => self.users.record_profile(user_id, profile).await?,
            None => self.users.get_or_create(user_id).await?,
        };

        // 2. Disabled users never reach the providers
        if user.is_disabled {
            tracing::warn!(
                target: "audit",
                user_id,
                kind = ?kind,
                "Blocked access: disabled user attempted a message"
            );
            return Err(TranslationServiceError::AccessDisabled);
        }

        // 3. Throttle
        self.rate_limiter
            .check(user_id, kind)
            .await
            .map_err(TranslationServiceError::RateLimited)?;

        // 4. Count the message, once
        let message_count = self.users.increment_message_count(user_id).await?;
        tracing::debug!(user_id, message_count, "Message counted");

        Ok(user)
    }

    async fn reply_to(
        &self,
        user: &UserRecord,
        text: &str,
        from_voice: bool,
    ) -> Result<OutgoingMessages, TranslationServiceError> {
        let started = std::time::Instant::now();

        let Some(source) = self.detector.detect(text) else {
            tracing::info!(user_id = user.user_id, "Source language not supported");
            return Ok(OutgoingMessages::single(formatting::unsupported_language()));
        };

        let targets = user.targets_for(source);
        let batch = self.translate(text, source, &targets).await;

        if batch.is_total_failure() {
            tracing::warn!(
                user_id = user.user_id,
                source = %source,
                targets = targets.len(),
                "Every translation failed"
            );
            return Ok(OutgoingMessages::single(formatting::TRANSLATION_FAILED));
        }

        let failed = batch.failed().count();
        let mut reply = OutgoingMessages::default();
        if from_voice {
            reply.push_text(formatting::transcription_echo(
                source,
                text,
                self.settings.display_truncate,
            ));
        }

        let mut translations = BTreeMap::new();
        for (language, result) in batch {
            match result {
                Ok(translation) => {
                    reply.push_text(formatting::translation_message(language, &translation));
                    translations.insert(language, translation);
                }
                Err(_) => reply.push_text(formatting::translation_unavailable(language)),
            }
        }

        if user.voice_replies_enabled {
            self.append_voice_replies(user.user_id, translations, &mut reply)
                .await?;
        }

        tracing::info!(
            user_id = user.user_id,
            source = %source,
            targets = targets.len(),
            failed,
            latency_ms = started.elapsed().as_millis() as u64,
            "Message translated"
        );

        Ok(reply)
    }

    async fn append_voice_replies(
        &self,
        user_id: UserId,
        translations: BTreeMap<LanguageCode, String>,
        reply: &mut OutgoingMessages,
    ) -> Result<(), TranslationServiceError> {
        let max_characters = self.settings.tts_max_characters;
        let (speakable, too_long): (BTreeMap<_, _>, BTreeMap<_, _>) = translations
            .into_iter()
            .partition(|(_, translation)| translation.chars().count() <= max_characters);

        for language in too_long.keys() {
            reply.push_text(formatting::voice_reply_too_long(*language));
        }
        if speakable.is_empty() {
            return Ok(());
        }

        let mut produced = 0;
        for (language, result) in self.synthesize(&speakable).await {
            match result {
                Ok(audio) => {
                    produced += 1;
                    reply.messages.push(OutgoingMessage::Voice {
                        language,
                        caption: formatting::voice_caption(language),
                        audio_base64: base64::engine::general_purpose::STANDARD.encode(&audio),
                    });
                }
                Err(_) => reply.push_text(formatting::voice_reply_failed(language)),
            }
        }

        if produced > 0 {
            let voice_response_count = self.users.increment_voice_response_count(user_id).await?;
            tracing::info!(user_id, produced, voice_response_count, "Voice replies produced");
        }
        Ok(())
    }
}

/// Split targets into cache hits (already settled) and misses
async fn lookup<V>(
    cache: &ResponseCache<V>,
    keys: &BTreeMap<LanguageCode, Fingerprint>,
) -> (Vec<(LanguageCode, Result<V, RemoteError>)>, Vec<LanguageCode>)
where
    V: Clone + Send + Sync + 'static,
{
    let mut hits = Vec::new();
    let mut misses = Vec::new();
    for (&target, key) in keys {
        match cache.get(key).await {
            Some(value) => hits.push((target, Ok(value))),
            None => misses.push(target),
        }
    }
    (hits, misses)
}
