//! Key-value persistence capability
//!
//! UI flags (dismissed banners, finished onboarding tours) are persisted through
//! a [`KeyValueStore`] handed to whoever needs it, never through a global.
//! All keys live under the `steersolo:` namespace and are built by [`StorageKey`].

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::AppError;

/// Prefix shared by every persisted key
pub const KEY_NAMESPACE: &str = "steersolo";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key segment: {0:?}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Get/set/remove over string keys and values
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>>;
    fn set(&self, key: &StorageKey, value: &str) -> StorageResult<()>;
    /// Returns whether a value was present
    fn remove(&self, key: &StorageKey) -> StorageResult<bool>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &StorageKey, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &StorageKey) -> StorageResult<bool> {
        (**self).remove(key)
    }
}

/// Every key the app persists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// `steersolo:banner:<id>:dismissed`
    BannerDismissed(String),
    /// `steersolo:tour:<id>:completed`
    TourCompleted(String),
}

impl StorageKey {
    pub fn banner_dismissed(banner_id: &str) -> StorageResult<Self> {
        Ok(StorageKey::BannerDismissed(check_segment(banner_id)?))
    }

    pub fn tour_completed(tour_id: &str) -> StorageResult<Self> {
        Ok(StorageKey::TourCompleted(check_segment(tour_id)?))
    }

    /// Full namespaced key as stored by the backend
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::BannerDismissed(id) => write!(f, "{KEY_NAMESPACE}:banner:{id}:dismissed"),
            StorageKey::TourCompleted(id) => write!(f, "{KEY_NAMESPACE}:tour:{id}:completed"),
        }
    }
}

fn check_segment(segment: &str) -> StorageResult<String> {
    if segment.is_empty() || segment.contains(':') || segment.chars().any(char::is_whitespace) {
        return Err(StorageError::InvalidKey(segment.to_string()));
    }
    Ok(segment.to_string())
}

/// In-process store, for tests and for sessions that should not outlive the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        Ok(self.entries.get(&key.as_key()).map(|v| v.value().clone()))
    }

    fn set(&self, key: &StorageKey, value: &str) -> StorageResult<()> {
        self.entries.insert(key.as_key(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> StorageResult<bool> {
        Ok(self.entries.remove(&key.as_key()).is_some())
    }
}
