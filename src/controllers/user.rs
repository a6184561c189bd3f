use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::user::{PreferredTargetsResponse, UserRecord, UserServiceApi, VoiceRepliesResponse},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct UserController {
    user_service: Arc<dyn UserServiceApi>,
}

impl UserController {
    pub fn new(user_service: Arc<dyn UserServiceApi>) -> Self {
        Self { user_service }
    }

    /// GET /api/me - Get the caller's record
    pub async fn get_me(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UserRecord>> {
        let record = controller.user_service.get_profile(auth_user.user_id).await?;
        Ok(Json(record))
    }

    /// POST /api/me/languages/:code/toggle - Flip one target language
    pub async fn toggle_language(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(code): Path<String>,
    ) -> AppResult<Json<PreferredTargetsResponse>> {
        let preferred_targets = controller
            .user_service
            .toggle_language(auth_user.user_id, &code)
            .await?;
        Ok(Json(PreferredTargetsResponse { preferred_targets }))
    }

    /// POST /api/me/voice-replies/toggle
    pub async fn toggle_voice_replies(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<VoiceRepliesResponse>> {
        let voice_replies_enabled = controller
            .user_service
            .toggle_voice_replies(auth_user.user_id)
            .await?;
        Ok(Json(VoiceRepliesResponse {
            voice_replies_enabled,
        }))
    }
}
