//! Document formats
//!
//! Detection by file extension or `Content-Type`, decoding into a generic
//! JSON value, and encoding back for the download routes.

use serde_json::Value;

use crate::error::DocumentError;

/// Representation a document source is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
    /// Executable script whose return value is the document
    Script,
}

impl Format {
    /// Detect the format from a path or URL path
    pub fn from_extension(path: &str) -> Option<Self> {
        let lower = path.trim().to_ascii_lowercase();
        if lower.ends_with(".json") {
            Some(Self::Json)
        } else if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Some(Self::Yaml)
        } else if lower.ends_with(".toml") {
            Some(Self::Toml)
        } else if lower.ends_with(".js") {
            Some(Self::Script)
        } else {
            None
        }
    }

    /// Detect the format from a `Content-Type` header value
    ///
    /// Only the media type is considered; parameters such as `charset`
    /// are ignored. Suffix matching accepts vendor types like
    /// `application/vnd.oai.openapi+json`.
    pub fn from_content_type(header: &str) -> Option<Self> {
        let media_type = header.split(';').next()?.trim().to_ascii_lowercase();
        if media_type.ends_with("json") {
            Some(Self::Json)
        } else if media_type.ends_with("yaml") {
            Some(Self::Yaml)
        } else if media_type.ends_with("toml") {
            Some(Self::Toml)
        } else if media_type.ends_with("javascript") {
            Some(Self::Script)
        } else {
            None
        }
    }
}

/// Decode a textual document; scripts are handled by [`super::script`]
pub fn decode(format: Format, text: &str) -> Result<Value, DocumentError> {
    match format {
        Format::Json => Ok(serde_json::from_str(text)?),
        Format::Yaml => Ok(serde_yaml::from_str(text)?),
        Format::Toml => Ok(toml::from_str(text)?),
        Format::Script => Err(DocumentError::Script(
            "scripts must be executed, not decoded".to_string(),
        )),
    }
}

pub fn encode_json(value: &Value) -> Result<Vec<u8>, DocumentError> {
    serde_json::to_vec(value).map_err(|e| DocumentError::Encode {
        format: "json",
        message: e.to_string(),
    })
}

pub fn encode_yaml(value: &Value) -> Result<Vec<u8>, DocumentError> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|e| DocumentError::Encode {
            format: "yaml",
            message: e.to_string(),
        })
}

pub fn encode_toml(value: &Value) -> Result<Vec<u8>, DocumentError> {
    toml::to_string(value)
        .map(String::into_bytes)
        .map_err(|e| DocumentError::Encode {
            format: "toml",
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("api.json"), Some(Format::Json));
        assert_eq!(Format::from_extension("/x/API.YAML"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("api.yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("api.toml"), Some(Format::Toml));
        assert_eq!(Format::from_extension("gen.js"), Some(Format::Script));
        assert_eq!(Format::from_extension("api.txt"), None);
        assert_eq!(Format::from_extension("json"), None);
    }

    #[test]
    fn test_from_content_type() {
        assert_eq!(
            Format::from_content_type("application/json; charset=utf-8"),
            Some(Format::Json)
        );
        assert_eq!(
            Format::from_content_type("application/vnd.oai.openapi+json"),
            Some(Format::Json)
        );
        assert_eq!(Format::from_content_type("Application/X-YAML"), Some(Format::Yaml));
        assert_eq!(Format::from_content_type("text/yaml;charset=UTF-8"), Some(Format::Yaml));
        assert_eq!(Format::from_content_type("application/toml"), Some(Format::Toml));
        assert_eq!(
            Format::from_content_type("text/javascript"),
            Some(Format::Script)
        );
        assert_eq!(Format::from_content_type("text/plain"), None);
        assert_eq!(Format::from_content_type(""), None);
    }

    #[test]
    fn test_decode_each_format() {
        let expected = json!({"openapi": "3.0.0", "info": {"title": "Pets"}});
        assert_eq!(
            decode(Format::Json, r#"{"openapi":"3.0.0","info":{"title":"Pets"}}"#).unwrap(),
            expected
        );
        assert_eq!(
            decode(Format::Yaml, "openapi: 3.0.0\ninfo:\n  title: Pets\n").unwrap(),
            expected
        );
        assert_eq!(
            decode(Format::Toml, "openapi = \"3.0.0\"\n[info]\ntitle = \"Pets\"\n").unwrap(),
            expected
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode(Format::Json, "{"), Err(DocumentError::Json(_))));
        assert!(matches!(decode(Format::Yaml, "a: [1"), Err(DocumentError::Yaml(_))));
        assert!(matches!(decode(Format::Toml, "a = "), Err(DocumentError::Toml(_))));
    }

    #[test]
    fn test_encode() {
        let doc = json!({"openapi": "3.0.0", "paths": {}});
        assert_eq!(encode_json(&doc).unwrap(), br#"{"openapi":"3.0.0","paths":{}}"#);
        let yaml = String::from_utf8(encode_yaml(&doc).unwrap()).unwrap();
        assert!(yaml.contains("openapi:"));
        assert!(yaml.contains("paths: {}"));
        let toml = String::from_utf8(encode_toml(&doc).unwrap()).unwrap();
        assert!(toml.contains("openapi = \"3.0.0\""));
    }

    #[test]
    fn test_encode_keeps_document_order() {
        let doc = decode(
            Format::Yaml,
            "openapi: 3.0.0\ninfo:\n  title: T\npaths:\n  /zebra: {}\n  /apple: {}\n",
        )
        .unwrap();
        assert_eq!(
            encode_json(&doc).unwrap(),
            br#"{"openapi":"3.0.0","info":{"title":"T"},"paths":{"/zebra":{},"/apple":{}}}"#
        );

        let yaml = String::from_utf8(encode_yaml(&doc).unwrap()).unwrap();
        assert!(yaml.find("/zebra").unwrap() < yaml.find("/apple").unwrap());
    }
}
