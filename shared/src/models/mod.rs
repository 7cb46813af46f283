//! Data models
//!
//! Rows returned by the backend's REST endpoints. Every type implements
//! [`RemoteRecord`](crate::decode::RemoteRecord) and is only ever built through
//! the validated decoders in [`crate::decode`].

pub mod product;
pub mod profile;
pub mod review;
pub mod shop;
pub mod wishlist;

// Re-exports
pub use product::*;
pub use profile::*;
pub use review::*;
pub use shop::*;
pub use wishlist::*;
