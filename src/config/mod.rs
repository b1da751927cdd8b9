// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::ConfigBuilder;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, DocumentConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Environment variable naming the configuration file (without extension)
pub const CONFIG_PATH_ENV: &str = "SWAGGER_UI_CONFIG";

/// Default configuration file, `swagger-ui.toml` in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "swagger-ui";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Layers, lowest priority first: defaults, the optional file,
    /// `SWAGGER_UI_*` environment variables, then `source_override`.
    pub fn load_from(
        config_path: &str,
        source_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = Self::defaults_builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SWAGGER_UI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("document.source", source_override)?
            .build()?;

        settings.try_deserialize()
    }

    /// Configuration made of built-in defaults only
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::defaults_builder()?.build()?.try_deserialize()
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("document.source", "")?
            .set_default("document.title", "Swagger UI")?
            .set_default("document.script_interpreter", "node")?
            .set_default("document.export_json", true)?
            .set_default("document.export_yaml", true)?
            .set_default("document.export_toml", true)?
            .set_default("assets.dir", "swagger-ui-dist")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| StartupError::Address(format!("{}:{} ({e})", self.server.host, self.server.port)))
    }

    /// Check settings that the deserializer cannot express
    pub fn validate(&self) -> Result<(), StartupError> {
        self.get_socket_addr()?;
        if self.document.source.trim().is_empty() {
            return Err(StartupError::NoDocument);
        }
        Ok(())
    }
}
