//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Fallback for files whose type cannot be resolved
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_JAVASCRIPT: &str = "text/javascript; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_YAML: &str = "application/x-yaml; charset=utf-8";
pub const CONTENT_TYPE_TOML: &str = "application/toml; charset=utf-8";

/// Get MIME Content-Type based on the file extension of `path`
pub fn get_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}
