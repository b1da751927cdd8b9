//! Error types
//!
//! Startup failures are fatal and reported once; request failures are
//! contained by the router and turned into a 500.

use thiserror::Error;

/// Failure while acquiring, decoding or exporting the API document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0} is no file")]
    NotAFile(String),

    #[error("{0} must be of one of the following types: json, toml, yaml, yml, js")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("Swagger document must be a plain object")]
    InvalidDocumentType,

    #[error("failed to export document as {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

/// Failure before the server starts accepting connections
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    Address(String),

    #[error("no document source defined (set document.source or pass it as first argument)")]
    NoDocument,

    #[error("static asset directory '{path}' is not usable: {reason}")]
    Assets { path: String, reason: String },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to bind listener: {0}")]
    Listener(#[from] std::io::Error),
}

/// Failure while producing a single response
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read static asset {path}: {source}")]
    AssetRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build response: {0}")]
    Build(#[from] hyper::http::Error),

    #[error("failed to render bootstrap script: {0}")]
    Render(#[from] serde_json::Error),
}
