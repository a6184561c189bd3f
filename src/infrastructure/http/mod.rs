use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::infrastructure::config::Config;
use crate::{
    controllers::{
        admin::AdminController,
        health::{self, HealthState},
        messages::MessagesController,
        user::UserController,
    },
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

/// Build the application router with all routes configured
pub fn build_router(
    config: Arc<Config>,
    health_state: HealthState,
    messages_controller: Arc<MessagesController>,
    user_controller: Arc<UserController>,
    admin_controller: Arc<AdminController>,
) -> Router {
    // Message routes (require authentication)
    let message_routes = Router::new()
        .route("/api/messages/text", post(MessagesController::text))
        .route(
            "/api/messages/voice",
            post(MessagesController::voice)
                .layer(DefaultBodyLimit::max(config.max_audio_bytes + 1)),
        )
        .with_state(messages_controller)
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_middleware,
        ));

    // User routes (require authentication)
    let user_routes = Router::new()
        .route("/api/me", get(UserController::get_me))
        .route(
            "/api/me/languages/:code/toggle",
            post(UserController::toggle_language),
        )
        .route(
            "/api/me/voice-replies/toggle",
            post(UserController::toggle_voice_replies),
        )
        .with_state(user_controller)
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_middleware,
        ));

    // Admin routes (require authentication, admin checked by the services)
    let admin_routes = Router::new()
        .route("/api/admin/users", get(AdminController::list_users))
        .route(
            "/api/admin/users/:id/disabled",
            put(AdminController::set_disabled),
        )
        .route(
            "/api/admin/model",
            get(AdminController::get_model).put(AdminController::set_model),
        )
        .with_state(admin_controller)
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(message_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
