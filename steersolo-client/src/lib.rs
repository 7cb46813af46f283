//! SteerSolo client - data access over the backend-as-a-service
//!
//! Wraps the backend's REST tables and serverless functions, decodes every
//! response through the validated records in `shared`, and persists UI
//! preferences in a local redb file.

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::BackendClient;
pub use store::{RedbStore, RedbStoreError, open_preferences};

// Re-export shared types for convenience
pub use shared::subscription::{SubscriptionState, SubscriptionStatus};
