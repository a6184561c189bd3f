use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::translation::{ModelSelection, ModelServiceApi, SetModelRequest},
    domain::user::{SetDisabledRequest, UserId, UserRecord, UserServiceApi, UsersOverview},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

/// Administrative endpoints. Admin membership is enforced by the services so
/// every refusal lands in the audit log.
pub struct AdminController {
    user_service: Arc<dyn UserServiceApi>,
    model_service: Arc<dyn ModelServiceApi>,
}

impl AdminController {
    pub fn new(
        user_service: Arc<dyn UserServiceApi>,
        model_service: Arc<dyn ModelServiceApi>,
    ) -> Self {
        Self {
            user_service,
            model_service,
        }
    }

    /// GET /api/admin/users
    pub async fn list_users(
        State(controller): State<Arc<AdminController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsersOverview>> {
        let overview = controller.user_service.list_users(auth_user.user_id).await?;
        Ok(Json(overview))
    }

    /// PUT /api/admin/users/:id/disabled
    pub async fn set_disabled(
        State(controller): State<Arc<AdminController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(user_id): Path<UserId>,
        Json(request): Json<SetDisabledRequest>,
    ) -> AppResult<Json<UserRecord>> {
        let record = controller
            .user_service
            .set_disabled(auth_user.user_id, user_id, request.disabled)
            .await?;
        Ok(Json(record))
    }

    /// GET /api/admin/model
    pub async fn get_model(
        State(controller): State<Arc<AdminController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<ModelSelection>> {
        let selection = controller.model_service.get_model(auth_user.user_id).await?;
        Ok(Json(selection))
    }

    /// PUT /api/admin/model
    pub async fn set_model(
        State(controller): State<Arc<AdminController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<SetModelRequest>,
    ) -> AppResult<Json<ModelSelection>> {
        let selection = controller
            .model_service
            .set_model(auth_user.user_id, &request.model)
            .await?;
        Ok(Json(selection))
    }
}
