use crate::domain::language::LanguageCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Chat-platform user identifier
pub type UserId = i64;

/// Durable per-user state. Only the user-state store produces these; callers
/// never write a modified copy back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_targets: BTreeSet<LanguageCode>,
    pub voice_replies_enabled: bool,
    pub is_disabled: bool,
    pub message_count: u64,
    pub voice_response_count: u64,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Name shown in admin listings
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .or(self.first_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("User {}", self.user_id))
    }

    /// Languages a message in `source` is translated into.
    ///
    /// The source language is never a target. If that leaves nothing, every
    /// other supported language is used instead.
    pub fn targets_for(&self, source: LanguageCode) -> BTreeSet<LanguageCode> {
        let targets: BTreeSet<_> = self
            .preferred_targets
            .iter()
            .copied()
            .filter(|language| *language != source)
            .collect();

        if targets.is_empty() {
            return LanguageCode::all()
                .into_iter()
                .filter(|language| *language != source)
                .collect();
        }
        targets
    }
}

/// Profile details forwarded by the chat platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Target languages a new user starts with
pub fn default_preferences() -> BTreeSet<LanguageCode> {
    LanguageCode::all()
}

/// Totals for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersSummary {
    pub total_users: u64,
    pub active_users: u64,
    pub disabled_users: u64,
    pub voice_enabled_users: u64,
    pub total_messages: u64,
    pub total_voice_responses: u64,
}

impl UsersSummary {
    pub fn from_records(records: &[UserRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total_users += 1;
            if record.is_disabled {
                summary.disabled_users += 1;
            } else {
                summary.active_users += 1;
            }
            if record.voice_replies_enabled {
                summary.voice_enabled_users += 1;
            }
            summary.total_messages += record.message_count;
            summary.total_voice_responses += record.voice_response_count;
            summary
        })
    }
}
