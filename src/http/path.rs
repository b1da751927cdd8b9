//! Request path normalization
//!
//! Produces the canonical form used for route matching: forward slashes
//! only, no trailing slash, exactly one leading slash.

use std::path::MAIN_SEPARATOR;

/// Replace platform separators with `/` and trim surrounding whitespace
pub fn to_url_separators(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.trim().to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/").trim().to_string()
    }
}

/// Normalize a (possibly absent) request path
///
/// # Examples
/// - `None` and `""` become `/`
/// - `"docs//"` becomes `/docs`
/// - `"//json"` becomes `/json`
pub fn normalize_path(path: Option<&str>) -> String {
    let mut p = to_url_separators(path.unwrap_or_default());

    while p.ends_with('/') {
        p.pop();
        let trimmed_len = p.trim_end().len();
        p.truncate(trimmed_len);
    }

    let rest = p.trim_start_matches('/');
    format!("/{rest}")
}
