use super::user_state_store::UserStateStore;
use crate::domain::language::LanguageCode;
use crate::domain::user::{default_preferences, StoreError, UserId, UserProfile, UserRecord};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::sync::Arc;

const USER_COLUMNS: &str = "id, username, first_name, last_name, preferred_targets, \
    voice_replies_enabled, is_disabled, message_count, voice_response_count, \
    last_activity, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    preferred_targets: Vec<String>,
    voice_replies_enabled: bool,
    is_disabled: bool,
    message_count: i64,
    voice_response_count: i64,
    last_activity: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            preferred_targets: parse_targets(&row.preferred_targets),
            voice_replies_enabled: row.voice_replies_enabled,
            is_disabled: row.is_disabled,
            message_count: row.message_count.max(0) as u64,
            voice_response_count: row.voice_response_count.max(0) as u64,
            last_activity: row.last_activity,
            created_at: row.created_at,
        }
    }
}

fn parse_targets(codes: &[String]) -> BTreeSet<LanguageCode> {
    codes
        .iter()
        .filter_map(|code| match code.parse() {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unknown stored target language");
                None
            }
        })
        .collect()
}

fn target_codes(targets: &BTreeSet<LanguageCode>) -> Vec<String> {
    targets.iter().map(|language| language.to_string()).collect()
}

/// Postgres-backed user-state store. Each mutation is a single statement.
pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStateStore for UserRepository {
    async fn get_or_create(&self, user_id: UserId) -> Result<UserRecord, StoreError> {
        let pool = self.pool.as_ref();
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, preferred_targets)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET last_activity = users.last_activity
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(target_codes(&default_preferences()))
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    async fn record_profile(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<UserRecord, StoreError> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, preferred_targets, username, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                username = COALESCE(EXCLUDED.username, users.username),
                first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                last_activity = NOW()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(target_codes(&default_preferences()))
        .bind(profile.username.as_deref())
        .bind(profile.first_name.as_deref())
        .bind(profile.last_name.as_deref())
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    async fn increment_message_count(&self, user_id: UserId) -> Result<u64, StoreError> {
        let pool = self.pool.as_ref();
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, preferred_targets, message_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (id) DO UPDATE SET
                message_count = users.message_count + 1,
                last_activity = NOW()
            RETURNING message_count
            "#,
        )
        .bind(user_id)
        .bind(target_codes(&default_preferences()))
        .fetch_one(pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn increment_voice_response_count(&self, user_id: UserId) -> Result<u64, StoreError> {
        let pool = self.pool.as_ref();
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, preferred_targets, voice_response_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (id) DO UPDATE SET
                voice_response_count = users.voice_response_count + 1
            RETURNING voice_response_count
            "#,
        )
        .bind(user_id)
        .bind(target_codes(&default_preferences()))
        .fetch_one(pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn toggle_language_preference(
        &self,
        user_id: UserId,
        language: LanguageCode,
    ) -> Result<BTreeSet<LanguageCode>, StoreError> {
        self.get_or_create(user_id).await?;

        let pool = self.pool.as_ref();
        // The guard refuses to remove the only remaining language; the row is
        // re-checked under its lock, so concurrent toggles cannot empty the set
        let targets: Option<Vec<String>> = sqlx::query_scalar(
            r#"
            UPDATE users SET preferred_targets = CASE
                WHEN $2 = ANY(preferred_targets) THEN array_remove(preferred_targets, $2)
                ELSE array_append(preferred_targets, $2)
            END
            WHERE id = $1 AND NOT (preferred_targets <@ ARRAY[$2]::TEXT[])
            RETURNING preferred_targets
            "#,
        )
        .bind(user_id)
        .bind(language.as_str())
        .fetch_optional(pool)
        .await?;

        match targets {
            Some(codes) => Ok(parse_targets(&codes)),
            None => Err(StoreError::LastTargetLanguage(language)),
        }
    }

    async fn toggle_voice_replies(&self, user_id: UserId) -> Result<bool, StoreError> {
        let pool = self.pool.as_ref();
        let enabled: bool = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, preferred_targets, voice_replies_enabled)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (id) DO UPDATE SET
                voice_replies_enabled = NOT users.voice_replies_enabled
            RETURNING voice_replies_enabled
            "#,
        )
        .bind(user_id)
        .bind(target_codes(&default_preferences()))
        .fetch_one(pool)
        .await?;

        Ok(enabled)
    }

    async fn set_disabled(
        &self,
        user_id: UserId,
        disabled: bool,
    ) -> Result<Option<UserRecord>, StoreError> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET is_disabled = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(disabled)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }
}
