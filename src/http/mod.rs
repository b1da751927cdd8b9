//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! document routes.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use cache::{hash_data, CacheValidators};
pub use response::{build_404_response, build_500_response, Payload, SendOptions};
