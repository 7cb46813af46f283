//! 订阅状态计算与功能门控
//!
//! 根据用户资料中的订阅字段推导出订阅状态 (active / trial / expired)
//! 以及剩余天数，并据此决定是否开放店主功能。
//!
//! 纯函数：每次调用都重新计算，不缓存、不持久化。唯一的外部输入是当前时钟。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{ceil_days, millis_until, now_millis};

/// 用户资料中与订阅相关的字段
///
/// 由资料存储提供，只读。`is_subscribed` 缺省为 false。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSubscriptionFacts {
    /// 是否持有已付费的订阅
    #[serde(default)]
    pub is_subscribed: bool,
    /// 当前订阅或试用期结束的时间点
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expires_at: Option<DateTime<Utc>>,
}

impl ProfileSubscriptionFacts {
    pub fn new(is_subscribed: bool, subscription_expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            is_subscribed,
            subscription_expires_at,
        }
    }

    /// Paid subscription ending at `expires_at`
    pub fn subscribed_until(expires_at: DateTime<Utc>) -> Self {
        Self::new(true, Some(expires_at))
    }

    /// Free trial ending at `expires_at`
    pub fn trial_until(expires_at: DateTime<Utc>) -> Self {
        Self::new(false, Some(expires_at))
    }
}

/// 订阅状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// 已付费且未过期
    Active,
    /// 试用期内
    Trial,
    /// 已过期或无资料
    Expired,
}

impl SubscriptionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionState::Active => "active",
            SubscriptionState::Trial => "trial",
            SubscriptionState::Expired => "expired",
        }
    }

    /// 是否处于可使用店主功能的窗口内
    pub fn grants_access(&self) -> bool {
        !matches!(self, SubscriptionState::Expired)
    }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计算结果
///
/// Invariant: `Expired` always carries 0 days; `Active`/`Trial` always carry at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub status: SubscriptionState,
    pub days_remaining: u32,
}

impl SubscriptionStatus {
    pub const EXPIRED: SubscriptionStatus = SubscriptionStatus {
        status: SubscriptionState::Expired,
        days_remaining: 0,
    };

    fn within_window(status: SubscriptionState, diff_days: i64) -> Self {
        Self {
            status,
            days_remaining: u32::try_from(diff_days).unwrap_or(u32::MAX),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.status == SubscriptionState::Expired
    }

    pub fn can_access_shop_features(&self) -> bool {
        self.status.grants_access()
    }
}

/// 按当前时钟计算订阅状态
pub fn calculate_subscription_status(facts: Option<&ProfileSubscriptionFacts>) -> SubscriptionStatus {
    calculate_subscription_status_at(facts, now_millis())
}

/// 按给定时刻 (Unix millis) 计算订阅状态
///
/// 判定顺序固定：
/// 1. 无资料 → expired
/// 2. 已订阅且有过期时间，剩余天数 > 0 → active；否则继续往下判断
/// 3. 未订阅且有过期时间，剩余天数 > 0 → trial
/// 4. 其余 → expired
pub fn calculate_subscription_status_at(
    facts: Option<&ProfileSubscriptionFacts>,
    now_ms: i64,
) -> SubscriptionStatus {
    let Some(facts) = facts else {
        return SubscriptionStatus::EXPIRED;
    };

    if facts.is_subscribed
        && let Some(expires_at) = &facts.subscription_expires_at
    {
        let diff_days = ceil_days(millis_until(expires_at, now_ms));
        if diff_days > 0 {
            return SubscriptionStatus::within_window(SubscriptionState::Active, diff_days);
        }
        // A lapsed paid subscription is not short-circuited here; it falls
        // through to the trial check below, which requires !is_subscribed.
    }

    if !facts.is_subscribed
        && let Some(expires_at) = &facts.subscription_expires_at
    {
        let diff_days = ceil_days(millis_until(expires_at, now_ms));
        if diff_days > 0 {
            return SubscriptionStatus::within_window(SubscriptionState::Trial, diff_days);
        }
    }

    SubscriptionStatus::EXPIRED
}

/// 是否可以使用店主功能 (active 或 trial)
pub fn can_access_shop_features(facts: Option<&ProfileSubscriptionFacts>) -> bool {
    calculate_subscription_status(facts).can_access_shop_features()
}

/// 按给定时刻判断是否可以使用店主功能
pub fn can_access_shop_features_at(facts: Option<&ProfileSubscriptionFacts>, now_ms: i64) -> bool {
    calculate_subscription_status_at(facts, now_ms).can_access_shop_features()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MILLIS_PER_DAY;
    use chrono::Duration;

    // 2025-03-01T12:00:00Z
    const NOW: i64 = 1_740_830_400_000;

    fn at(offset_ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(NOW + offset_ms).unwrap()
    }

    #[test]
    fn test_absent_facts_are_expired() {
        let status = calculate_subscription_status_at(None, NOW);
        assert_eq!(status, SubscriptionStatus::EXPIRED);
        assert!(!can_access_shop_features_at(None, NOW));
    }

    #[test]
    fn test_default_facts_are_expired() {
        let facts = ProfileSubscriptionFacts::default();
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status.status, SubscriptionState::Expired);
        assert_eq!(status.days_remaining, 0);
    }

    #[test]
    fn test_subscribed_with_future_expiry_is_active() {
        let facts = ProfileSubscriptionFacts::subscribed_until(at(5 * MILLIS_PER_DAY));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status.status, SubscriptionState::Active);
        assert_eq!(status.days_remaining, 5);
        assert!(can_access_shop_features_at(Some(&facts), NOW));
    }

    #[test]
    fn test_subscribed_with_past_expiry_is_expired() {
        let facts = ProfileSubscriptionFacts::subscribed_until(at(-MILLIS_PER_DAY));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status, SubscriptionStatus::EXPIRED);
        assert!(!can_access_shop_features_at(Some(&facts), NOW));
    }

    #[test]
    fn test_unsubscribed_with_future_expiry_is_trial() {
        let facts = ProfileSubscriptionFacts::trial_until(at(3 * MILLIS_PER_DAY));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status.status, SubscriptionState::Trial);
        assert_eq!(status.days_remaining, 3);
        assert!(can_access_shop_features_at(Some(&facts), NOW));
    }

    #[test]
    fn test_unsubscribed_with_past_expiry_is_expired() {
        let facts = ProfileSubscriptionFacts::trial_until(at(-3 * MILLIS_PER_DAY));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status, SubscriptionStatus::EXPIRED);
        assert!(!can_access_shop_features_at(Some(&facts), NOW));
    }

    #[test]
    fn test_subscribed_without_expiry_is_expired() {
        let facts = ProfileSubscriptionFacts::new(true, None);
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status, SubscriptionStatus::EXPIRED);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let facts = ProfileSubscriptionFacts::trial_until(at(1));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status.status, SubscriptionState::Trial);
        assert_eq!(status.days_remaining, 1);

        let facts = ProfileSubscriptionFacts::subscribed_until(at(2 * MILLIS_PER_DAY + 1));
        let status = calculate_subscription_status_at(Some(&facts), NOW);
        assert_eq!(status.days_remaining, 3);
    }

    #[test]
    fn test_expiry_exactly_now_is_expired() {
        let facts = ProfileSubscriptionFacts::subscribed_until(at(0));
        assert_eq!(
            calculate_subscription_status_at(Some(&facts), NOW),
            SubscriptionStatus::EXPIRED
        );

        let facts = ProfileSubscriptionFacts::trial_until(at(0));
        assert_eq!(
            calculate_subscription_status_at(Some(&facts), NOW),
            SubscriptionStatus::EXPIRED
        );
    }

    #[test]
    fn test_access_matches_status_for_all_scenarios() {
        let scenarios = [
            None,
            Some(ProfileSubscriptionFacts::subscribed_until(at(5 * MILLIS_PER_DAY))),
            Some(ProfileSubscriptionFacts::subscribed_until(at(-MILLIS_PER_DAY))),
            Some(ProfileSubscriptionFacts::trial_until(at(3 * MILLIS_PER_DAY))),
            Some(ProfileSubscriptionFacts::trial_until(at(-3 * MILLIS_PER_DAY))),
        ];

        for facts in &scenarios {
            let status = calculate_subscription_status_at(facts.as_ref(), NOW);
            assert_eq!(
                can_access_shop_features_at(facts.as_ref(), NOW),
                status.status != SubscriptionState::Expired
            );
            // expired ⇔ 0 days
            assert_eq!(status.is_expired(), status.days_remaining == 0);
        }
    }

    #[test]
    fn test_wall_clock_variant() {
        let facts = ProfileSubscriptionFacts::subscribed_until(Utc::now() + Duration::days(5));
        let status = calculate_subscription_status(Some(&facts));
        assert_eq!(status.status, SubscriptionState::Active);
        assert!((4..=6).contains(&status.days_remaining));
        assert!(can_access_shop_features(Some(&facts)));
        assert!(!can_access_shop_features(None));
    }

    #[test]
    fn test_idempotent() {
        let facts = ProfileSubscriptionFacts::trial_until(Utc::now() + Duration::days(10));
        let first = calculate_subscription_status(Some(&facts));
        let second = calculate_subscription_status(Some(&facts));
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_serializes_in_frontend_shape() {
        let status = SubscriptionStatus {
            status: SubscriptionState::Trial,
            days_remaining: 3,
        };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json, serde_json::json!({"status": "trial", "daysRemaining": 3}));
    }

    #[test]
    fn test_facts_deserialize_with_defaults() {
        let facts: ProfileSubscriptionFacts = serde_json::from_str("{}").unwrap();
        assert!(!facts.is_subscribed);
        assert!(facts.subscription_expires_at.is_none());

        let facts: ProfileSubscriptionFacts = serde_json::from_str(
            r#"{"is_subscribed": true, "subscription_expires_at": "2025-03-06T12:00:00+00:00"}"#,
        )
        .unwrap();
        assert!(facts.is_subscribed);
        assert_eq!(
            calculate_subscription_status_at(Some(&facts), NOW).days_remaining,
            5
        );
    }
}
