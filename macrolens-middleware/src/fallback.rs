use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use macrolens_core::{CacheEnvelope, CacheStore};
use macrolens_types::{CacheStatus, DegradedPolicy, MacrolensError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Decides, per fetch, between a fresh cache hit, a live call with
/// write-through, and serving an expired entry after a live failure.
#[derive(Clone)]
pub struct CacheCoordinator {
    store: Arc<dyn CacheStore>,
    policy: DegradedPolicy,
}

impl CacheCoordinator {
    /// Build a coordinator over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, policy: DegradedPolicy) -> Self {
        Self { store, policy }
    }

    /// The stale-serving policy this coordinator runs under.
    #[must_use]
    pub const fn policy(&self) -> DegradedPolicy {
        self.policy
    }

    /// Resolve one value through the cache.
    ///
    /// The cache is read exactly once, before any live call. A fresh entry
    /// short-circuits unless `force_refresh` is set. A live success fully
    /// overwrites the entry. On live failure, an expired entry is served
    /// with a warning when the policy allows it and the failure is not
    /// definitive (e.g. not-found); the stale path never writes back.
    ///
    /// # Errors
    /// Propagates definitive fetch errors as-is; transient failures with no
    /// usable cached copy become `Unavailable`.
    pub async fn fetch_with_fallback<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        force_refresh: bool,
        fetch: F,
    ) -> Result<(T, CacheStatus), MacrolensError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MacrolensError>>,
    {
        let cached = self.read_envelope(key).await;

        if !force_refresh
            && let Some(env) = cached.as_ref()
            && env.is_fresh(Utc::now())
            && let Ok(value) = env.unwrap_payload::<T>()
        {
            return Ok((value, CacheStatus::Cached));
        }

        match fetch().await {
            Ok(value) => {
                match CacheEnvelope::wrap(&value, ttl) {
                    Ok(env) => match serde_json::to_string(&env) {
                        Ok(raw) => self.store.set(key, raw).await,
                        Err(e) => debug!(key, error = %e, "skipping cache write"),
                    },
                    Err(e) => debug!(key, error = %e, "skipping cache write"),
                }
                Ok((value, CacheStatus::Fresh))
            }
            Err(e) if e.is_definitive() => Err(e),
            Err(e) => {
                if self.policy == DegradedPolicy::StaleIfError
                    && let Some(env) = cached.as_ref()
                    && let Ok(value) = env.unwrap_payload::<T>()
                {
                    warn!(key, error = %e, stored_at = %env.stored_at, "serving stale cache entry after live failure");
                    return Ok((value, CacheStatus::Stale));
                }
                debug!(key, error = %e, "live fetch failed with no usable cache entry");
                Err(MacrolensError::unavailable(format!("{key}: {e}")))
            }
        }
    }

    async fn read_envelope(&self, key: &str) -> Option<CacheEnvelope> {
        let raw = self.store.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(env) => Some(env),
            Err(e) => {
                // A corrupt entry is treated as a miss and dropped.
                debug!(key, error = %e, "dropping unreadable cache entry");
                self.store.delete(key).await;
                None
            }
        }
    }
}
