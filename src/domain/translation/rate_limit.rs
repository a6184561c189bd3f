use super::formatting;
use crate::domain::user::UserId;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

const MAX_TRACKED_USERS: u64 = 10_000;
const MESSAGE_WINDOW: Duration = Duration::from_secs(60);
const VOICE_WINDOW: Duration = Duration::from_secs(3600);

/// Messages admitted in the window that opened at `started`
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub messages_per_minute: u32,
    pub voice_per_hour: u32,
    pub admin_bypass: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Voice,
}

/// Per-user message throttling.
///
/// Fixed windows anchored at the first message: a window opens with the
/// first admitted message and closes one period later, whatever arrives in
/// between. Check-and-increment is a single atomic compute per user, so
/// concurrent requests cannot both take the last slot. The moka TTL only
/// sweeps idle users.
pub struct RateLimiter {
    settings: RateLimitSettings,
    admin_ids: HashSet<UserId>,
    messages: Cache<UserId, Window>,
    voice_messages: Cache<UserId, Window>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings, admin_ids: HashSet<UserId>) -> Self {
        tracing::info!(
            enabled = settings.enabled,
            messages_per_minute = settings.messages_per_minute,
            voice_per_hour = settings.voice_per_hour,
            admin_bypass = settings.admin_bypass,
            "Rate limiting initialized"
        );

        Self {
            settings,
            admin_ids,
            messages: Cache::builder()
                .max_capacity(MAX_TRACKED_USERS)
                .time_to_live(MESSAGE_WINDOW)
                .build(),
            voice_messages: Cache::builder()
                .max_capacity(MAX_TRACKED_USERS)
                .time_to_live(VOICE_WINDOW)
                .build(),
        }
    }

    /// Count one message against the user's limits. Returns the notice to
    /// show when a limit is exceeded.
    pub async fn check(&self, user_id: UserId, kind: MessageKind) -> Result<(), String> {
        if !self.settings.enabled {
            return Ok(());
        }
        if self.settings.admin_bypass && self.admin_ids.contains(&user_id) {
            tracing::debug!(user_id, "Rate limit bypassed for admin");
            return Ok(());
        }

        if kind == MessageKind::Voice
            && !Self::take_slot(
                &self.voice_messages,
                user_id,
                self.settings.voice_per_hour,
                VOICE_WINDOW,
            )
            .await
        {
            tracing::warn!(
                user_id,
                limit = self.settings.voice_per_hour,
                "Voice rate limit exceeded"
            );
            return Err(formatting::too_many_voice_messages(
                self.settings.voice_per_hour,
            ));
        }

        if !Self::take_slot(
            &self.messages,
            user_id,
            self.settings.messages_per_minute,
            MESSAGE_WINDOW,
        )
        .await
        {
            tracing::warn!(
                user_id,
                limit = self.settings.messages_per_minute,
                "Message rate limit exceeded"
            );
            return Err(formatting::too_many_messages(
                self.settings.messages_per_minute,
            ));
        }

        Ok(())
    }

    async fn take_slot(
        counters: &Cache<UserId, Window>,
        user_id: UserId,
        limit: u32,
        period: Duration,
    ) -> bool {
        let now = Instant::now();
        let result = counters
            .entry(user_id)
            .and_compute_with(|entry| {
                let open = entry
                    .map(|e| e.into_value())
                    .filter(|window| now.duration_since(window.started) < period);
                let op = match open {
                    Some(window) if window.count >= limit => Op::Nop,
                    Some(window) => Op::Put(Window {
                        count: window.count + 1,
                        ..window
                    }),
                    None => Op::Put(Window {
                        started: now,
                        count: 1,
                    }),
                };
                std::future::ready(op)
            })
            .await;

        matches!(
            result,
            CompResult::Inserted(_) | CompResult::ReplacedWith(_)
        )
    }
}
