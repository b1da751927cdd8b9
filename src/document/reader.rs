//! Document readers
//!
//! A reader is a zero-argument async operation producing the decoded
//! document. Local files are decoded by extension; remote documents by
//! `Content-Type` first and URL extension second.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use super::format::{self, Format};
use super::script;
use crate::error::DocumentError;

#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Load and decode the document
    async fn read(&self) -> Result<Value, DocumentError>;

    /// Human readable origin for log messages
    fn describe(&self) -> String;
}

/// Reads a document from the local file system
#[derive(Debug, Clone)]
pub struct LocalFileReader {
    pub path: PathBuf,
    pub script_interpreter: String,
}

impl LocalFileReader {
    pub fn new(path: impl Into<PathBuf>, script_interpreter: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            script_interpreter: script_interpreter.into(),
        }
    }
}

#[async_trait]
impl DocumentReader for LocalFileReader {
    async fn read(&self) -> Result<Value, DocumentError> {
        let display = self.path.display().to_string();

        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| DocumentError::Io {
                path: display.clone(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(DocumentError::NotAFile(display));
        }

        let format = Format::from_extension(&display)
            .ok_or_else(|| DocumentError::UnsupportedFormat(display.clone()))?;

        let text = read_text(&self.path).await?;
        match format {
            Format::Script => script::execute_script(&self.script_interpreter, &text).await,
            other => format::decode(other, &text),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

async fn read_text(path: &Path) -> Result<String, DocumentError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Downloads a document over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpDocReader {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub script_interpreter: String,
}

impl HttpDocReader {
    /// Credentials embedded in `url` are moved out of it and used unless
    /// explicit ones are given.
    pub fn new(
        mut url: Url,
        username: Option<String>,
        password: Option<String>,
        script_interpreter: impl Into<String>,
    ) -> Self {
        let url_user = Some(url.username().to_string()).filter(|u| !u.is_empty());
        let url_password = url.password().map(ToString::to_string);
        if url_user.is_some() || url_password.is_some() {
            // Only fails for URLs that cannot carry credentials in the first place
            let _ = url.set_username("");
            let _ = url.set_password(None);
        }

        let (username, password) = if username.is_some() {
            (username, password)
        } else {
            (url_user, url_password)
        };

        Self {
            url,
            username,
            password,
            script_interpreter: script_interpreter.into(),
        }
    }

    fn fetch_error(&self, source: reqwest::Error) -> DocumentError {
        DocumentError::Fetch {
            url: self.url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl DocumentReader for HttpDocReader {
    async fn read(&self) -> Result<Value, DocumentError> {
        let mut request = reqwest::Client::new().get(self.url.clone());
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.fetch_error(e))?;

        let by_content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(Format::from_content_type);
        let by_extension = Format::from_extension(self.url.path());

        let format = by_content_type
            .or(by_extension)
            .ok_or_else(|| DocumentError::UnsupportedFormat(self.url.to_string()))?;

        let text = response
            .text_with_charset("utf-8")
            .await
            .map_err(|e| self.fetch_error(e))?;

        match format {
            Format::Script => script::execute_script(&self.script_interpreter, &text).await,
            other => format::decode(other, &text),
        }
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
