// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub document: DocumentConfig,
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// Document source and export configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Local path or http(s) URL of the API description
    pub source: String,
    /// Page title of the UI shell
    pub title: String,
    /// Base name for download attachments, sanitized before use
    #[serde(default)]
    pub file_name: Option<String>,
    /// Overrides the document URL handed to the viewer
    #[serde(default)]
    pub swagger_url: Option<String>,
    /// Basic auth credentials for remote sources
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Interpreter used for `.js` sources
    pub script_interpreter: String,
    pub export_json: bool,
    pub export_yaml: bool,
    pub export_toml: bool,
}

/// Static asset provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Directory holding the bundled viewer files
    pub dir: String,
}
