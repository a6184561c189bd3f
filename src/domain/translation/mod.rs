pub mod error;
pub mod formatting;
pub mod model;
pub mod rate_limit;
pub mod service;

pub use error::{ModelServiceError, TranslationServiceError};
pub use model::{
    ModelSelection, ModelSelector, ModelService, ModelServiceApi, SetModelRequest,
    AVAILABLE_MODELS,
};
pub use rate_limit::{MessageKind, RateLimitSettings, RateLimiter};
pub use service::{
    RemoteProviders, ResponseCaches, SpeechBatch, TranslationBatch, TranslationService,
    TranslationServiceApi, TranslationSettings,
};

use crate::domain::language::LanguageCode;
use crate::domain::user::UserProfile;
use serde::{Deserialize, Serialize};

/// One reply for the transport layer to deliver, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Text {
        body: String,
    },
    Voice {
        language: LanguageCode,
        caption: String,
        /// Opus audio, base64 encoded
        audio_base64: String,
    },
}

impl OutgoingMessage {
    pub fn text(body: impl Into<String>) -> Self {
        OutgoingMessage::Text { body: body.into() }
    }
}

/// Response for POST /api/messages/text and /api/messages/voice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessages {
    pub messages: Vec<OutgoingMessage>,
}

impl OutgoingMessages {
    pub fn single(body: impl Into<String>) -> Self {
        Self {
            messages: vec![OutgoingMessage::text(body)],
        }
    }

    pub fn push_text(&mut self, body: impl Into<String>) {
        self.messages.push(OutgoingMessage::text(body));
    }
}

/// Request for POST /api/messages/text
#[derive(Debug, Serialize, Deserialize)]
pub struct TextMessageRequest {
    pub text: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}
