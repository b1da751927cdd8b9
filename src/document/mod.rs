//! Document module
//!
//! Acquires the API description once at startup and prepares the bundle
//! the router serves.

pub mod bundle;
pub mod format;
pub mod reader;
pub mod script;

use std::path::PathBuf;

use url::Url;

pub use bundle::{DocumentBundle, DocumentRegistry, Export, ExportOptions};
pub use reader::{DocumentReader, HttpDocReader, LocalFileReader};

use crate::config::DocumentConfig;
use crate::error::DocumentError;
use crate::logger;

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Local(PathBuf),
    Remote(Url),
}

impl DocumentSource {
    /// `http://` and `https://` sources are remote, anything else is a
    /// path relative to the working directory
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let source = source.trim();
        if source.starts_with("https://") || source.starts_with("http://") {
            let url = Url::parse(source)
                .map_err(|e| DocumentError::UnsupportedFormat(format!("{source} ({e})")))?;
            return Ok(Self::Remote(url));
        }

        let path = PathBuf::from(source);
        if path.is_absolute() {
            return Ok(Self::Local(path));
        }
        let cwd = std::env::current_dir().map_err(|source_err| DocumentError::Io {
            path: source.to_string(),
            source: source_err,
        })?;
        Ok(Self::Local(cwd.join(path)))
    }

    /// Reader for this source
    pub fn reader(&self, cfg: &DocumentConfig) -> Box<dyn DocumentReader> {
        match self {
            Self::Local(path) => Box::new(LocalFileReader::new(
                path.clone(),
                cfg.script_interpreter.clone(),
            )),
            Self::Remote(url) => Box::new(HttpDocReader::new(
                url.clone(),
                cfg.username.clone(),
                cfg.password.clone(),
                cfg.script_interpreter.clone(),
            )),
        }
    }
}

/// Load the configured document and mount it at the server root
pub async fn load_registry(cfg: &DocumentConfig) -> Result<DocumentRegistry, DocumentError> {
    let source = DocumentSource::parse(&cfg.source)?;
    let reader = source.reader(cfg);
    let object = reader.read().await?;

    let exports = ExportOptions {
        json: cfg.export_json,
        yaml: cfg.export_yaml,
        toml: cfg.export_toml,
    };
    let bundle = DocumentBundle::build("", cfg.file_name.as_deref(), object, exports)?;
    logger::log_document_loaded(&reader.describe(), &bundle);

    let mut registry = DocumentRegistry::new();
    registry.insert(bundle);
    Ok(registry)
}
