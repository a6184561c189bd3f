use axum::{body::Bytes, extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::translation::{OutgoingMessages, TextMessageRequest, TranslationServiceApi},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct MessagesController {
    translation_service: Arc<dyn TranslationServiceApi>,
}

impl MessagesController {
    pub fn new(translation_service: Arc<dyn TranslationServiceApi>) -> Self {
        Self {
            translation_service,
        }
    }

    /// POST /api/messages/text - Translate a text message
    pub async fn text(
        State(controller): State<Arc<MessagesController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<TextMessageRequest>,
    ) -> AppResult<Json<OutgoingMessages>> {
        let reply = controller
            .translation_service
            .handle_text_message(auth_user.user_id, &request.text, request.profile)
            .await?;
        Ok(Json(reply))
    }

    /// POST /api/messages/voice - Transcribe and translate a voice message.
    /// The body is the raw audio.
    pub async fn voice(
        State(controller): State<Arc<MessagesController>>,
        Extension(auth_user): Extension<AuthUser>,
        audio: Bytes,
    ) -> AppResult<Json<OutgoingMessages>> {
        let reply = controller
            .translation_service
            .handle_voice_message(auth_user.user_id, &audio)
            .await?;
        Ok(Json(reply))
    }
}
