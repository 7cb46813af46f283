//! Shop Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, RemoteRecord};

/// Row of the `shops` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub owner_id: String,
    pub shop_name: String,
    /// Public URL segment (`/shop/<slug>`)
    pub shop_slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub whatsapp_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Shop {
    /// wa.me link for the shop's WhatsApp number, digits only
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self
            .whatsapp_number
            .as_deref()?
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        (!digits.is_empty()).then(|| format!("https://wa.me/{digits}"))
    }
}

impl RemoteRecord for Shop {
    const ENTITY: &'static str = "shops";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.shop_slug.trim().is_empty() {
            return Err(DecodeError::invalid_value(
                Self::ENTITY,
                "shop_slug",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use serde_json::json;

    fn shop_json() -> serde_json::Value {
        json!({
            "id": "s-1",
            "owner_id": "u-1",
            "shop_name": "Ada's Kitchen",
            "shop_slug": "ada-kitchen",
            "description": null,
            "logo_url": null,
            "whatsapp_number": "+234 801 234 5678",
            "created_at": "2025-02-01T10:00:00Z"
        })
    }

    #[test]
    fn test_decode_defaults_active() {
        let shop: Shop = decode(shop_json()).unwrap();
        assert!(shop.is_active);
        assert_eq!(shop.shop_slug, "ada-kitchen");
    }

    #[test]
    fn test_whatsapp_link() {
        let shop: Shop = decode(shop_json()).unwrap();
        assert_eq!(
            shop.whatsapp_link().as_deref(),
            Some("https://wa.me/2348012345678")
        );

        let mut shop = shop;
        shop.whatsapp_number = Some("n/a".into());
        assert!(shop.whatsapp_link().is_none());
    }

    #[test]
    fn test_empty_slug_rejected() {
        let mut value = shop_json();
        value["shop_slug"] = json!("");
        assert!(matches!(
            decode::<Shop>(value),
            Err(DecodeError::InvalidValue { field: "shop_slug", .. })
        ));
    }
}
