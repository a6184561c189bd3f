use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::user::UserId;
use crate::infrastructure::config::Config;
use crate::{domain::auth::JwtManager, error::AppError};

/// Caller identity injected into request extensions after authentication
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Bearer-token authentication. The token subject is the chat user id; users
/// are created lazily by the services, so there is no lookup here.
pub async fn auth_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))?;

    let jwt_manager = JwtManager::new(config.jwt_secret.clone(), config.jwt_expiration_hours);
    let user_id = jwt_manager.extract_user_id(token)?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
