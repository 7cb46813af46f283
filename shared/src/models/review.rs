//! Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, RemoteRecord};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Row of the `reviews` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub customer_name: String,
    /// 1..=5 stars
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RemoteRecord for Review {
    const ENTITY: &'static str = "reviews";

    fn validate(&self) -> Result<(), DecodeError> {
        check_rating(self.rating).map_err(|reason| {
            DecodeError::invalid_value(Self::ENTITY, "rating", reason)
        })
    }
}

/// Insert payload for a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub product_id: String,
    pub customer_name: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    /// Check the payload before it is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("customer name must not be empty".into());
        }
        check_rating(self.rating)
    }
}

fn check_rating(rating: u8) -> Result<(), String> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        ))
    }
}

/// Aggregate shown next to a product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating rounded to one decimal place, 0.0 when there are no reviews
    pub average: f64,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self {
                count: 0,
                average: 0.0,
            };
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        let mean = f64::from(total) / reviews.len() as f64;
        Self {
            count: reviews.len(),
            average: (mean * 10.0).round() / 10.0,
        }
    }
}
