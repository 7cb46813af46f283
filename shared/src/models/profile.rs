//! Profile Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, RemoteRecord};
use crate::subscription::ProfileSubscriptionFacts;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    ShopOwner,
    Admin,
}

/// Row of the `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    /// Null and missing both mean "not subscribed"
    #[serde(default)]
    pub is_subscribed: Option<bool>,
    #[serde(default)]
    pub subscription_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subscription_plan: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProfileRow {
    /// Project the fields the subscription gate reads
    pub fn subscription_facts(&self) -> ProfileSubscriptionFacts {
        ProfileSubscriptionFacts {
            is_subscribed: self.is_subscribed.unwrap_or(false),
            subscription_expires_at: self.subscription_expires_at,
        }
    }

    pub fn is_shop_owner(&self) -> bool {
        matches!(self.role, Some(UserRole::ShopOwner) | Some(UserRole::Admin))
    }
}

impl RemoteRecord for ProfileRow {
    const ENTITY: &'static str = "profiles";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.id.trim().is_empty() {
            return Err(DecodeError::invalid_value(Self::ENTITY, "id", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use serde_json::json;

    #[test]
    fn test_decode_full_profile() {
        let row: ProfileRow = decode(json!({
            "id": "4f1c",
            "email": "ada@example.com",
            "full_name": "Ada Obi",
            "role": "shop_owner",
            "is_subscribed": true,
            "subscription_expires_at": "2025-04-01T00:00:00+00:00",
            "subscription_plan": "monthly",
            "created_at": "2025-01-10T08:30:00.123456+00:00"
        }))
        .unwrap();

        assert!(row.is_shop_owner());
        let facts = row.subscription_facts();
        assert!(facts.is_subscribed);
        assert_eq!(
            facts.subscription_expires_at.unwrap().to_rfc3339(),
            "2025-04-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_null_subscription_fields_default() {
        let row: ProfileRow = decode(json!({
            "id": "4f1c",
            "email": null,
            "full_name": null,
            "role": "customer",
            "is_subscribed": null,
            "subscription_expires_at": null,
            "created_at": null
        }))
        .unwrap();

        assert!(!row.is_shop_owner());
        assert_eq!(row.subscription_facts(), ProfileSubscriptionFacts::default());
    }

    #[test]
    fn test_missing_id_is_decode_error() {
        let err = decode::<ProfileRow>(json!({"is_subscribed": true})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_mistyped_flag_is_decode_error() {
        let err = decode::<ProfileRow>(json!({"id": "4f1c", "is_subscribed": "yes"})).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unparseable_expiry_is_decode_error() {
        let err = decode::<ProfileRow>(json!({
            "id": "4f1c",
            "subscription_expires_at": "next tuesday"
        }))
        .unwrap_err();
        assert_eq!(err.entity(), "profiles");
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let err = decode::<ProfileRow>(json!({"id": "  "})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { field: "id", .. }));
    }
}
