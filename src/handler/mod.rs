//! Request handler module
//!
//! Responsible for request routing dispatch: the viewer shell, the bootstrap
//! script, document downloads and static viewer assets.

pub mod router;
pub mod static_files;
pub mod templates;

// Re-export main entry point
pub use router::handle_request;
