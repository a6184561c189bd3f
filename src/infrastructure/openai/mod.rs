use crate::domain::shared::RemoteError;
use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

pub type OpenAiClient = Client<OpenAIConfig>;

/// Client that makes exactly one HTTP attempt per call. Retries belong to
/// `RetryPolicy`, which logs each attempt.
pub fn create_client(api_key: &str) -> OpenAiClient {
    Client::with_config(OpenAIConfig::new().with_api_key(api_key)).with_backoff(single_attempt())
}

fn single_attempt() -> backoff::ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Classify a provider failure. Provider messages stay in logs; callers only
/// ever show users a generic notice.
pub fn map_openai_error(err: OpenAIError) -> RemoteError {
    match err {
        OpenAIError::Reqwest(e) => RemoteError::Transport(e.to_string()),
        OpenAIError::ApiError(api) => map_api_error(&api.message, api.r#type.as_deref()),
        OpenAIError::JSONDeserialize(e) => RemoteError::Malformed(e.to_string()),
        OpenAIError::InvalidArgument(msg) => RemoteError::Rejected(msg),
        other => RemoteError::Provider(other.to_string()),
    }
}

fn map_api_error(message: &str, kind: Option<&str>) -> RemoteError {
    match kind {
        Some("insufficient_quota") => RemoteError::QuotaExhausted(message.to_string()),
        Some("requests" | "tokens" | "rate_limit_exceeded") => {
            RemoteError::RateLimited(message.to_string())
        }
        Some("invalid_request_error") => RemoteError::Rejected(message.to_string()),
        _ => RemoteError::Provider(message.to_string()),
    }
}
