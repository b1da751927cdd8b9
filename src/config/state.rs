// Application state module
// Everything the router reads, built once before the listener starts

use chrono::Utc;

use super::types::Config;
use crate::document::{DocumentRegistry, Export};
use crate::handler::static_files::StaticAssetCache;
use crate::handler::templates;
use crate::http::CacheValidators;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Read-only after startup
    pub documents: DocumentRegistry,
    /// The only state mutated while serving
    pub assets: StaticAssetCache,
    pub validators: CacheValidators,
    /// Rendered UI shell, shared by every mount
    pub index_page: Export,
}

impl AppState {
    /// `Last-Modified` and the `ETag` salt are fixed here, at server start
    pub fn new(config: Config, documents: DocumentRegistry, assets: StaticAssetCache) -> Self {
        Self::with_validators(config, documents, assets, CacheValidators::new(Utc::now()))
    }

    pub fn with_validators(
        config: Config,
        documents: DocumentRegistry,
        assets: StaticAssetCache,
        validators: CacheValidators,
    ) -> Self {
        let index_page = Export::new(templates::render_index(&config.document.title).into_bytes());

        Self {
            config,
            documents,
            assets,
            validators,
            index_page,
        }
    }

    /// Document URL the bootstrap script points the viewer at
    pub fn swagger_url(&self, mount: &str) -> String {
        self.config
            .document
            .swagger_url
            .clone()
            .unwrap_or_else(|| default_swagger_url(mount))
    }
}

/// JSON download endpoint of a mount
pub fn default_swagger_url(mount: &str) -> String {
    if mount.is_empty() {
        "/json".to_string()
    } else {
        format!("/{mount}/json")
    }
}
