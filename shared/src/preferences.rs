//! 本地 UI 偏好
//!
//! 横幅关闭状态、新手引导完成状态，通过注入的 [`KeyValueStore`] 持久化。

use crate::storage::{KeyValueStore, StorageKey, StorageResult};
use crate::util::now_millis;

/// Banner dismissal and onboarding tour flags over an injected store
#[derive(Debug, Clone)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== Banners ==========

    pub fn is_banner_dismissed(&self, banner_id: &str) -> StorageResult<bool> {
        Ok(self.banner_dismissed_at(banner_id)?.is_some())
    }

    /// 关闭时间 (Unix millis)
    ///
    /// A value that is present but not a timestamp still counts as dismissed
    /// and reports 0.
    pub fn banner_dismissed_at(&self, banner_id: &str) -> StorageResult<Option<i64>> {
        let key = StorageKey::banner_dismissed(banner_id)?;
        Ok(self
            .store
            .get(&key)?
            .map(|v| v.parse::<i64>().unwrap_or(0)))
    }

    pub fn dismiss_banner(&self, banner_id: &str) -> StorageResult<()> {
        let key = StorageKey::banner_dismissed(banner_id)?;
        self.store.set(&key, &now_millis().to_string())?;
        tracing::debug!(banner_id, "Banner dismissed");
        Ok(())
    }

    /// 重新显示横幅
    pub fn restore_banner(&self, banner_id: &str) -> StorageResult<bool> {
        let key = StorageKey::banner_dismissed(banner_id)?;
        self.store.remove(&key)
    }

    // ========== Onboarding tours ==========

    pub fn has_completed_tour(&self, tour_id: &str) -> StorageResult<bool> {
        let key = StorageKey::tour_completed(tour_id)?;
        Ok(self.store.get(&key)?.is_some())
    }

    pub fn complete_tour(&self, tour_id: &str) -> StorageResult<()> {
        let key = StorageKey::tour_completed(tour_id)?;
        self.store.set(&key, "true")?;
        tracing::debug!(tour_id, "Onboarding tour completed");
        Ok(())
    }

    pub fn reset_tour(&self, tour_id: &str) -> StorageResult<bool> {
        let key = StorageKey::tour_completed(tour_id)?;
        self.store.remove(&key)
    }
}
