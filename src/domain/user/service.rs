use super::error::UserServiceError;
use super::{UserId, UserRecord, UsersOverview, UsersSummary};
use crate::domain::language::{LanguageCode, UnsupportedLanguage};
use crate::infrastructure::repositories::UserStateStore;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

pub struct UserService {
    store: Arc<dyn UserStateStore>,
    admin_ids: HashSet<UserId>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStateStore>, admin_ids: HashSet<UserId>) -> Self {
        Self { store, admin_ids }
    }
}

#[async_trait]
pub trait UserServiceApi: Send + Sync {
    /// The caller's own record, created on first contact
    async fn get_profile(&self, user_id: UserId) -> Result<UserRecord, UserServiceError>;

    /// Flip one target language. `code` is an ISO 639-1 code.
    async fn toggle_language(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<BTreeSet<LanguageCode>, UserServiceError>;

    async fn toggle_voice_replies(&self, user_id: UserId) -> Result<bool, UserServiceError>;

    /// Admin only: every user plus dashboard totals
    async fn list_users(&self, requester: UserId) -> Result<UsersOverview, UserServiceError>;

    /// Admin only: block or unblock a user
    async fn set_disabled(
        &self,
        requester: UserId,
        user_id: UserId,
        disabled: bool,
    ) -> Result<UserRecord, UserServiceError>;

    fn is_admin(&self, user_id: UserId) -> bool;
}

#[async_trait]
impl UserServiceApi for UserService {
    async fn get_profile(&self, user_id: UserId) -> Result<UserRecord, UserServiceError> {
        Ok(self.store.get_or_create(user_id).await?)
    }

    async fn toggle_language(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<BTreeSet<LanguageCode>, UserServiceError> {
        let language: LanguageCode = code
            .parse()
            .map_err(|e: UnsupportedLanguage| UserServiceError::Invalid(e.to_string()))?;

        let targets = self
            .store
            .toggle_language_preference(user_id, language)
            .await?;

        tracing::info!(
            user_id,
            language = %language,
            enabled = targets.contains(&language),
            "Target language toggled"
        );
        Ok(targets)
    }

    async fn toggle_voice_replies(&self, user_id: UserId) -> Result<bool, UserServiceError> {
        let enabled = self.store.toggle_voice_replies(user_id).await?;
        tracing::info!(user_id, enabled, "Voice replies toggled");
        Ok(enabled)
    }

    async fn list_users(&self, requester: UserId) -> Result<UsersOverview, UserServiceError> {
        self.guard_admin(requester, "list users")?;

        let users = self.store.list_all().await?;
        let summary = UsersSummary::from_records(&users);

        tracing::info!(
            target: "audit",
            admin_id = requester,
            total_users = summary.total_users,
            "Admin listed users"
        );
        Ok(UsersOverview { summary, users })
    }

    async fn set_disabled(
        &self,
        requester: UserId,
        user_id: UserId,
        disabled: bool,
    ) -> Result<UserRecord, UserServiceError> {
        self.guard_admin(requester, "change user access")?;

        let record = self
            .store
            .set_disabled(user_id, disabled)
            .await?
            .ok_or(UserServiceError::NotFound)?;

        tracing::warn!(
            target: "audit",
            admin_id = requester,
            user_id,
            disabled,
            "User access changed"
        );
        Ok(record)
    }

    fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

impl UserService {
    fn guard_admin(&self, requester: UserId, action: &str) -> Result<(), UserServiceError> {
        if self.is_admin(requester) {
            return Ok(());
        }
        tracing::warn!(
            target: "audit",
            user_id = requester,
            action,
            "Non-admin attempted admin action"
        );
        Err(UserServiceError::Forbidden(format!(
            "admin privileges required to {}",
            action
        )))
    }
}
