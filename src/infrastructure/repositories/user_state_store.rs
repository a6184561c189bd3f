use crate::domain::language::LanguageCode;
use crate::domain::user::{StoreError, UserId, UserProfile, UserRecord};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Durable per-user state with named atomic mutations.
///
/// Implementations must apply every mutation as one atomic step at the
/// storage layer: concurrent callers never lose an update, and there is no
/// way to write back a modified `UserRecord`. Any operation except
/// `set_disabled` and `list_all` creates the user with default preferences
/// on first contact.
///
/// When the backing store cannot be reached every operation fails with
/// `StoreError::Unavailable`.
#[async_trait]
pub trait UserStateStore: Send + Sync {
    /// Fetch the record, creating it on first contact. Idempotent.
    async fn get_or_create(&self, user_id: UserId) -> Result<UserRecord, StoreError>;

    /// Store the chat-platform profile and touch `last_activity`. Fields
    /// missing from `profile` keep their stored value.
    async fn record_profile(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<UserRecord, StoreError>;

    /// Atomic +1; also touches `last_activity`. Returns the new count.
    async fn increment_message_count(&self, user_id: UserId) -> Result<u64, StoreError>;

    /// Atomic +1. Returns the new count.
    async fn increment_voice_response_count(&self, user_id: UserId) -> Result<u64, StoreError>;

    /// Flip membership of `language` in the preferred targets and return the
    /// resulting set. Removing the only remaining language is refused with
    /// `StoreError::LastTargetLanguage`.
    async fn toggle_language_preference(
        &self,
        user_id: UserId,
        language: LanguageCode,
    ) -> Result<BTreeSet<LanguageCode>, StoreError>;

    /// Flip voice replies and return the new state
    async fn toggle_voice_replies(&self, user_id: UserId) -> Result<bool, StoreError>;

    /// Returns `None` when the user has never been seen
    async fn set_disabled(
        &self,
        user_id: UserId,
        disabled: bool,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Every user ordered by id, for administrative reporting
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;
}
