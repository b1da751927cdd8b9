//! Document bundles and the registry the router serves from

use hyper::body::Bytes;
use serde_json::Value;

use super::format;
use crate::error::DocumentError;
use crate::http::hash_data;

/// Base name used when no file name is configured
pub const DEFAULT_FILE_NAME: &str = "swagger";

/// A pre-encoded export with its content hash
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Bytes,
    pub hash: String,
}

impl Export {
    pub fn new(bytes: Vec<u8>) -> Self {
        let hash = hash_data(&bytes);
        Self {
            bytes: Bytes::from(bytes),
            hash,
        }
    }
}

/// Which download representations a bundle offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub json: bool,
    pub yaml: bool,
    pub toml: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            json: true,
            yaml: true,
            toml: true,
        }
    }
}

/// One loaded document, ready to serve; immutable once built
#[derive(Debug, Clone)]
pub struct DocumentBundle {
    /// Mount name; empty means the server root
    pub name: String,
    /// Sanitized base name for `Content-Disposition`
    pub file_name: String,
    pub object: Value,
    pub json: Option<Export>,
    pub yaml: Option<Export>,
    pub toml: Option<Export>,
}

impl DocumentBundle {
    /// Encode the enabled exports of `object`
    ///
    /// Fails if `object` is not a JSON object or an enabled export cannot
    /// be encoded.
    pub fn build(
        name: impl Into<String>,
        file_name: Option<&str>,
        object: Value,
        exports: ExportOptions,
    ) -> Result<Self, DocumentError> {
        if !object.is_object() {
            return Err(DocumentError::InvalidDocumentType);
        }

        let json = exports
            .json
            .then(|| format::encode_json(&object).map(Export::new))
            .transpose()?;
        let yaml = exports
            .yaml
            .then(|| format::encode_yaml(&object).map(Export::new))
            .transpose()?;
        let toml = exports
            .toml
            .then(|| format::encode_toml(&object).map(Export::new))
            .transpose()?;

        Ok(Self {
            name: name.into(),
            file_name: safe_file_name(file_name.unwrap_or_default()),
            object,
            json,
            yaml,
            toml,
        })
    }

    /// `Content-Disposition` value for an export with extension `ext`
    pub fn content_disposition(&self, ext: &str) -> String {
        format!("attachment; filename=\"{}.{ext}\"", self.file_name)
    }
}

/// Mount name to bundle mapping, built before serving and read-only after
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    bundles: Vec<DocumentBundle>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle, replacing an existing one with the same name
    pub fn insert(&mut self, bundle: DocumentBundle) {
        if let Some(existing) = self.bundles.iter_mut().find(|b| b.name == bundle.name) {
            *existing = bundle;
        } else {
            self.bundles.push(bundle);
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&DocumentBundle> {
        self.bundles.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentBundle> {
        self.bundles.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl From<DocumentBundle> for DocumentRegistry {
    fn from(bundle: DocumentBundle) -> Self {
        Self {
            bundles: vec![bundle],
        }
    }
}

/// Sanitize a download base name
///
/// Strips path separators, characters that file systems or the quoted
/// header value reject, control and non-ASCII characters, Windows
/// reserved names and trailing dots/spaces. An empty result falls back to
/// [`DEFAULT_FILE_NAME`].
pub fn safe_file_name(name: &str) -> String {
    const ILLEGAL: &[char] = &['/', '?', '<', '>', '\\', ':', '*', '|', '"'];

    let name = name.trim();
    let mut cleaned: String = name
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !ILLEGAL.contains(c))
        .collect();

    if cleaned.chars().all(|c| c == '.') || is_windows_reserved(&cleaned) {
        cleaned.clear();
    }

    let trimmed_len = cleaned.trim_end_matches(['.', ' ']).len();
    cleaned.truncate(trimmed_len.min(255));

    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

fn is_windows_reserved(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or_default().to_ascii_lowercase();
    matches!(stem.as_str(), "con" | "prn" | "aux" | "nul")
        || ((stem.starts_with("com") || stem.starts_with("lpt"))
            && stem.len() == 4
            && stem.as_bytes()[3].is_ascii_digit())
}
