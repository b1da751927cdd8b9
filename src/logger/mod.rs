//! Logger module
//!
//! Named logging helpers for the server, emitted as `tracing` events:
//! - Server lifecycle logging
//! - Access logging with multiple formats (target `access`)
//! - Error and warning logging
//! - Optional file output

mod format;

pub use format::AccessLogEntry;

use std::fs::OpenOptions;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::document::DocumentBundle;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup.
pub fn init(config: &Config) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.logging.log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        None => registry.with(fmt::layer()).try_init(),
    };

    installed.map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<std::fs::File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, assets_root: &Path, config: &Config) {
    tracing::info!(
        address = %addr,
        assets = %assets_root.display(),
        log_level = %config.logging.level,
        "Swagger UI available at http://{addr}"
    );
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_document_loaded(source: &str, bundle: &DocumentBundle) {
    let exports: Vec<&str> = [
        ("json", bundle.json.is_some()),
        ("yaml", bundle.yaml.is_some()),
        ("toml", bundle.toml.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, enabled)| enabled.then_some(name))
    .collect();

    tracing::info!(
        source,
        mount = %format!("/{}", bundle.name),
        file_name = %bundle.file_name,
        exports = %exports.join(","),
        "Document loaded"
    );
}

pub fn log_shutdown() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::warn!("Failed to serve connection: {err:?}");
}

pub fn log_request_failed(path: &str, err: &crate::error::RequestError) {
    tracing::error!(path, "Request failed: {err}");
}

pub fn log_not_found(path: &str) {
    tracing::debug!(path, "Not found");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
