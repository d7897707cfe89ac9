use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MacrolensError;

/// String-keyed, string-valued cache contract.
///
/// The store only retains and evicts; freshness lives in the serialized
/// [`CacheEnvelope`] so an expired entry stays readable for stale serving.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the raw value for a key, fresh or not.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a raw value, replacing any previous entry for the key.
    async fn set(&self, key: &str, value: String);

    /// Drop the entry for a key, if any.
    async fn delete(&self, key: &str);
}

/// Self-describing cache record: payload plus its own freshness window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// When the payload was fetched live.
    pub stored_at: DateTime<Utc>,
    /// Seconds the payload counts as fresh after `stored_at`.
    pub fresh_for_secs: u64,
    /// The cached payload, serialized as JSON.
    pub payload: serde_json::Value,
}

impl CacheEnvelope {
    /// Wrap a payload with a freshness window starting now.
    ///
    /// # Errors
    /// Returns `Data` if the payload cannot be serialized.
    pub fn wrap<T: Serialize>(payload: &T, ttl: Duration) -> Result<Self, MacrolensError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| MacrolensError::Data(format!("cache payload serialization: {e}")))?;
        Ok(Self {
            stored_at: Utc::now(),
            fresh_for_secs: ttl.as_secs(),
            payload,
        })
    }

    /// Whether the payload is still inside its freshness window at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        age.num_seconds() >= 0 && age.num_seconds() as u64 <= self.fresh_for_secs
    }

    /// Deserialize the payload into its concrete type.
    ///
    /// # Errors
    /// Returns `Data` if the stored payload does not match the expected shape.
    pub fn unwrap_payload<T: serde::de::DeserializeOwned>(&self) -> Result<T, MacrolensError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| MacrolensError::Data(format!("cache payload deserialization: {e}")))
    }
}
