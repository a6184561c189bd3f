use crate::domain::language::LanguageCode;
use crate::error::AppError;

/// Failure of the durable user-state store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
    #[error("{0} is the last enabled target language")]
    LastTargetLanguage(LanguageCode),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("user not found")]
    NotFound,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("cannot disable {0}: at least one target language must stay enabled")]
    LastTargetLanguage(LanguageCode),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for UserServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => UserServiceError::StoreUnavailable(msg),
            StoreError::LastTargetLanguage(language) => {
                UserServiceError::LastTargetLanguage(language)
            }
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Invalid(msg) => AppError::BadRequest(msg),
            UserServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            e @ UserServiceError::LastTargetLanguage(_) => AppError::Conflict(e.to_string()),
            UserServiceError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
        }
    }
}
