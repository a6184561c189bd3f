pub mod error;
pub mod model;
pub mod service;

pub use error::{StoreError, UserServiceError};
pub use model::{default_preferences, UserId, UserProfile, UserRecord, UsersSummary};
pub use service::{UserService, UserServiceApi};

use crate::domain::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Response for GET /api/admin/users
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersOverview {
    pub summary: UsersSummary,
    pub users: Vec<UserRecord>,
}

/// Response for POST /api/me/languages/{code}/toggle
#[derive(Debug, Serialize, Deserialize)]
pub struct PreferredTargetsResponse {
    pub preferred_targets: BTreeSet<LanguageCode>,
}

/// Response for POST /api/me/voice-replies/toggle
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceRepliesResponse {
    pub voice_replies_enabled: bool,
}

/// Request for PUT /api/admin/users/{id}/disabled
#[derive(Debug, Serialize, Deserialize)]
pub struct SetDisabledRequest {
    pub disabled: bool,
}
