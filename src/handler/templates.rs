//! Viewer templates
//!
//! The UI shell is rendered once per server instance; the bootstrap script
//! is rendered per request because it embeds the document and its URL.

use serde::Serialize;
use serde_json::{Map, Value};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const INIT_SCRIPT_TEMPLATE: &str = include_str!("../../templates/swagger-ui-init.js");

/// Icon links pointing at the icons shipped with the viewer assets
pub const DEFAULT_FAV_ICON: &str = concat!(
    r#"<link rel="icon" type="image/png" href="./favicon-32x32.png" sizes="32x32" />"#,
    r#"<link rel="icon" type="image/png" href="./favicon-16x16.png" sizes="16x16" />"#,
);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitOptions<'a> {
    swagger_doc: &'a Value,
    custom_options: Map<String, Value>,
    swagger_url: &'a str,
}

/// Render the UI shell page
pub fn render_index(title: &str) -> String {
    INDEX_TEMPLATE
        .replace("<% title %>", &html_escape::encode_text(title))
        .replace("<% favIconString %>", DEFAULT_FAV_ICON)
        .replace("<% customJsUrl %>", "")
        .replace("<% customCssUrl %>", "")
        .replace("<% customCss %>", "")
        .replace("<% customJs %>", "")
}

/// Render the bootstrap script for `document` served from `swagger_url`
pub fn render_init_script(document: &Value, swagger_url: &str) -> Result<String, serde_json::Error> {
    let options = serde_json::to_string(&InitOptions {
        swagger_doc: document,
        custom_options: Map::new(),
        swagger_url,
    })?;

    Ok(INIT_SCRIPT_TEMPLATE.replace("<% swaggerOptions %>", &format!("var options = {options};")))
}
