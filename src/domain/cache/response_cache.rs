use super::fingerprint::Fingerprint;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use moka::Expiry;
use std::time::{Duration, Instant};

/// A cached value together with the moment it was written and how long it
/// stays visible.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self) -> bool {
        self.inserted_at.elapsed() < self.ttl
    }
}

/// Expires every entry after its own TTL, counted from the last write
struct PerEntryTtl;

impl<V> Expiry<Fingerprint, CacheEntry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &Fingerprint,
        value: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &Fingerprint,
        value: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// TTL-bounded key/value store for remote results.
///
/// Capacity is bounded by entry count with least-recently-used eviction.
/// Entries are replaced as a whole on every write; readers never observe a
/// value older than its TTL, even before the background sweep removes it.
pub struct ResponseCache<V> {
    inner: Cache<Fingerprint, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, max_capacity: u64, default_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .name(name)
            .max_capacity(max_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(PerEntryTtl)
            .build();

        Self { inner, default_ttl }
    }

    /// TTL applied by callers that have no reason to pick their own
    pub fn ttl(&self) -> Duration {
        self.default_ttl
    }

    pub async fn get(&self, key: &Fingerprint) -> Option<V> {
        let entry = self.inner.get(key).await?;
        if entry.is_fresh() {
            Some(entry.value)
        } else {
            None
        }
    }

    /// Insert or fully replace the entry for `key`, restarting its expiry
    pub async fn put(&self, key: Fingerprint, value: V, ttl: Duration) {
        self.inner
            .insert(
                key,
                CacheEntry {
                    value,
                    inserted_at: Instant::now(),
                    ttl,
                },
            )
            .await;
    }

    /// Number of live entries. Entries past their TTL are not counted even
    /// while the timer wheel still holds them.
    pub async fn size(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner
            .iter()
            .filter(|(_, entry)| entry.is_fresh())
            .count() as u64
    }

    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}
