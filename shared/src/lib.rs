//! Shared types for SteerSolo
//!
//! Subscription gating, validated remote records, payment request types and the
//! key-value persistence capability used by the client crate and the frontend
//! bindings.

pub mod decode;
pub mod error;
pub mod models;
pub mod payment;
pub mod preferences;
pub mod storage;
pub mod subscription;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use decode::{DecodeError, RemoteRecord};
pub use error::{AppError, AppResult, ErrorCode};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageKey};
pub use subscription::{
    ProfileSubscriptionFacts, SubscriptionState, SubscriptionStatus, calculate_subscription_status,
    calculate_subscription_status_at, can_access_shop_features, can_access_shop_features_at,
};
