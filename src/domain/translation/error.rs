use crate::domain::user::StoreError;
use crate::error::AppError;

/// Request-level failures. Provider trouble is never one of these: it ends up
/// as a notice inside the reply.
#[derive(Debug, thiserror::Error)]
pub enum TranslationServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("access disabled")]
    AccessDisabled,
    #[error("{0}")]
    RateLimited(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for TranslationServiceError {
    fn from(err: StoreError) -> Self {
        TranslationServiceError::StoreUnavailable(err.to_string())
    }
}

impl From<TranslationServiceError> for AppError {
    fn from(err: TranslationServiceError) -> Self {
        match err {
            TranslationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TranslationServiceError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            TranslationServiceError::AccessDisabled => {
                AppError::Forbidden(super::formatting::ACCESS_DISABLED.to_string())
            }
            TranslationServiceError::RateLimited(msg) => AppError::RateLimitExceeded(msg),
            TranslationServiceError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelServiceError {
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unknown translation model: {0}")]
    UnknownModel(String),
}

impl From<ModelServiceError> for AppError {
    fn from(err: ModelServiceError) -> Self {
        match err {
            ModelServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            e @ ModelServiceError::UnknownModel(_) => AppError::BadRequest(e.to_string()),
        }
    }
}
