use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use translation_relay::controllers::{
    admin::AdminController, health::HealthState, messages::MessagesController,
    user::UserController,
};
use translation_relay::domain::cache::{SpeechCache, TranslationCache};
use translation_relay::domain::fanout::{Fanout, RetryPolicy};
use translation_relay::domain::language::LinguaDetector;
use translation_relay::domain::translation::{
    ModelSelector, ModelService, RateLimitSettings, RateLimiter, RemoteProviders, ResponseCaches,
    TranslationService, TranslationSettings,
};
use translation_relay::domain::user::UserService;
use translation_relay::infrastructure::config::{Config, LogFormat};
use translation_relay::infrastructure::db::{check_connection, create_pool, run_migrations};
use translation_relay::infrastructure::http::{build_router, start_http_server};
use translation_relay::infrastructure::openai::create_client;
use translation_relay::infrastructure::repositories::{
    OpenAiTranscriptionRepository, OpenAiTranslationRepository, OpenAiTtsRepository,
    UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting translation relay on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let openai_client = Arc::new(create_client(&config.openai_api_key));
    tracing::info!(
        model = %config.openai_model,
        transcription_model = %config.openai_transcription_model,
        tts_model = %config.openai_tts_model,
        "OpenAI client initialized"
    );

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let translator = Arc::new(OpenAiTranslationRepository::new(
        openai_client.clone(),
        config.translation_max_tokens,
    ));
    let transcriber = Arc::new(OpenAiTranscriptionRepository::new(
        openai_client.clone(),
        config.openai_transcription_model.clone(),
    ));
    let tts = Arc::new(OpenAiTtsRepository::new(
        openai_client,
        config.openai_tts_model.clone(),
        config.openai_tts_voice.clone(),
        config.tts_speed,
    ));

    // 2. Instantiate model selection, caches, fanout and throttling
    let translation_model = Arc::new(ModelSelector::new(config.openai_model.clone()));

    tracing::info!("Instantiating caches...");
    let caches = ResponseCaches {
        translation: Arc::new(TranslationCache::new(
            "translation",
            config.translation_cache_capacity,
            config.translation_cache_ttl(),
        )),
        speech: Arc::new(SpeechCache::new(
            "speech",
            config.tts_cache_capacity,
            config.tts_cache_ttl(),
        )),
    };
    let fanout = Fanout::new(
        RetryPolicy {
            max_attempts: config.remote_max_attempts,
            base_delay: config.retry_base_delay(),
            attempt_timeout: config.remote_timeout(),
            ..RetryPolicy::default()
        },
        config.fanout_deadline(),
    );
    let rate_limiter = Arc::new(RateLimiter::new(
        RateLimitSettings {
            enabled: config.rate_limit_enabled,
            messages_per_minute: config.rate_limit_messages_per_minute,
            voice_per_hour: config.rate_limit_voice_per_hour,
            admin_bypass: config.rate_limit_admin_bypass,
        },
        config.admin_user_ids.clone(),
    ));

    // 3. Instantiate services
    tracing::info!("Instantiating services...");
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        config.admin_user_ids.clone(),
    ));
    let model_service = Arc::new(ModelService::new(
        translation_model.clone(),
        config.admin_user_ids.clone(),
    ));
    let translation_service = Arc::new(TranslationService::new(
        user_repo,
        RemoteProviders {
            translator,
            translation_model,
            transcriber,
            tts,
        },
        Arc::new(LinguaDetector::new()),
        caches.clone(),
        fanout,
        rate_limiter,
        TranslationSettings {
            max_input_characters: config.translation_max_input_characters,
            max_audio_bytes: config.max_audio_bytes,
            tts_max_characters: config.tts_max_characters,
            display_truncate: config.translation_display_truncate,
        },
    ));

    // 4. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let messages_controller = Arc::new(MessagesController::new(translation_service));
    let user_controller = Arc::new(UserController::new(user_service.clone()));
    let admin_controller = Arc::new(AdminController::new(user_service, model_service));

    let app = build_router(
        config.clone(),
        HealthState { pool, caches },
        messages_controller,
        user_controller,
        admin_controller,
    );

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "translation_relay=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
