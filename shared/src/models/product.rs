//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, RemoteRecord};

/// Row of the `products` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in naira
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Available and not sold out. A null stock count means "not tracked".
    pub fn is_in_stock(&self) -> bool {
        self.is_available && self.stock_quantity.is_none_or(|q| q > 0)
    }
}

impl RemoteRecord for Product {
    const ENTITY: &'static str = "products";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.price.is_sign_negative() {
            return Err(DecodeError::invalid_value(
                Self::ENTITY,
                "price",
                format!("must not be negative, got {}", self.price),
            ));
        }
        Ok(())
    }
}
