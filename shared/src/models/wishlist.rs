//! Wishlist Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::RemoteRecord;

/// Row of the `wishlists` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub customer_id: String,
    pub product_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl RemoteRecord for WishlistItem {
    const ENTITY: &'static str = "wishlists";
}

/// Insert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWishlistItem {
    pub customer_id: String,
    pub product_id: String,
}

/// Whether `product_id` is already saved
pub fn contains_product(items: &[WishlistItem], product_id: &str) -> bool {
    items.iter().any(|item| item.product_id == product_id)
}
