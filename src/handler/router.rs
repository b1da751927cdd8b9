//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Each request is claimed by the
//! first mount whose prefix it starts with, then dispatched through a fixed,
//! ordered route table; anything the table does not match is looked up in
//! the static asset directory.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::document::{DocumentBundle, Export};
use crate::error::RequestError;
use crate::handler::templates;
use crate::http::{self, mime, path, Payload, SendOptions};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Request target as received, query string included
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    fn send_options(&self) -> SendOptions<'a> {
        SendOptions {
            if_none_match: self.if_none_match,
            is_head: self.is_head,
        }
    }
}

/// A download endpoint backed by one pre-encoded export
struct DownloadRoute {
    prefix: &'static str,
    extension: &'static str,
    content_type: &'static str,
    export: fn(&DocumentBundle) -> Option<&Export>,
}

fn json_export(bundle: &DocumentBundle) -> Option<&Export> {
    bundle.json.as_ref()
}

fn yaml_export(bundle: &DocumentBundle) -> Option<&Export> {
    bundle.yaml.as_ref()
}

fn toml_export(bundle: &DocumentBundle) -> Option<&Export> {
    bundle.toml.as_ref()
}

/// Tried in order after the shell and bootstrap routes
static DOWNLOAD_ROUTES: [DownloadRoute; 3] = [
    DownloadRoute {
        prefix: "/json",
        extension: "json",
        content_type: mime::CONTENT_TYPE_JSON,
        export: json_export,
    },
    DownloadRoute {
        prefix: "/yaml",
        extension: "yaml",
        content_type: mime::CONTENT_TYPE_YAML,
        export: yaml_export,
    },
    DownloadRoute {
        prefix: "/toml",
        extension: "toml",
        content_type: mime::CONTENT_TYPE_TOML,
        export: toml_export,
    },
];

const INIT_SCRIPT_PATH: &str = "/swagger-ui-init.js";

/// Response strategy chosen for a mount-relative path
enum Route<'a> {
    Index,
    InitScript,
    Download(&'static DownloadRoute, &'a Export),
    /// Sub-path below the static asset root
    Asset(&'a str),
}

impl<'a> Route<'a> {
    fn select(relative: &'a str, bundle: &'a DocumentBundle) -> Self {
        if relative == "/" || relative == "/index.html" {
            return Self::Index;
        }
        if relative.starts_with(INIT_SCRIPT_PATH) {
            return Self::InitScript;
        }

        let download = DOWNLOAD_ROUTES
            .iter()
            .filter(|route| relative.starts_with(route.prefix))
            .find_map(|route| (route.export)(bundle).map(|export| (route, export)));
        if let Some((route, export)) = download {
            return Self::Download(route, export);
        }

        let sub_path = relative.split_once('?').map_or(relative, |(p, _)| p);
        Self::Asset(sub_path)
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path(), |pq| pq.as_str());

    let ctx = RequestContext {
        is_head: req.method() == Method::HEAD,
        if_none_match: header_str(&req, IF_NONE_MATCH),
        ..RequestContext::new(target)
    };

    let response = dispatch(&ctx, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_str(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.referer = header_str(&req, REFERER).map(ToString::to_string);
        entry.user_agent = header_str(&req, USER_AGENT).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request, turning any failure into an empty 500
pub async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match route(ctx, state).await {
        Ok(response) => response,
        Err(err) => {
            logger::log_request_failed(ctx.path, &err);
            http::build_500_response()
        }
    }
}

/// Produce the response for one request
///
/// Only the first mount whose prefix matches is consulted; an unresolved
/// static lookup there ends routing with a 404.
pub async fn route(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let request_path = path::to_url_separators(ctx.path);

    for bundle in state.documents.iter() {
        let base_path = format!("/{}", bundle.name);
        let Some(rest) = request_path.strip_prefix(base_path.as_str()) else {
            continue;
        };

        let relative = path::normalize_path(Some(rest));
        return serve_mount(ctx, state, bundle, &relative).await;
    }

    logger::log_not_found(ctx.path);
    Ok(http::build_404_response())
}

async fn serve_mount(
    ctx: &RequestContext<'_>,
    state: &AppState,
    bundle: &DocumentBundle,
    relative: &str,
) -> Result<Response<Full<Bytes>>, RequestError> {
    let validators = &state.validators;

    let payload = match Route::select(relative, bundle) {
        Route::Index => Payload {
            body: state.index_page.bytes.clone(),
            content_type: mime::CONTENT_TYPE_HTML.to_string(),
            etag: validators.etag(&state.index_page.hash),
            content_disposition: None,
        },
        Route::InitScript => {
            let script =
                templates::render_init_script(&bundle.object, &state.swagger_url(&bundle.name))?;
            let body = Bytes::from(script);
            Payload {
                etag: validators.etag(&http::hash_data(&body)),
                body,
                content_type: mime::CONTENT_TYPE_JAVASCRIPT.to_string(),
                content_disposition: None,
            }
        }
        Route::Download(route, export) => Payload {
            body: export.bytes.clone(),
            content_type: route.content_type.to_string(),
            etag: validators.etag(&export.hash),
            content_disposition: Some(bundle.content_disposition(route.extension)),
        },
        Route::Asset(sub_path) => {
            let file = state.assets.resolve(sub_path);
            let Some(entry) = state.assets.lookup(&file).await? else {
                logger::log_not_found(ctx.path);
                return Ok(http::build_404_response());
            };
            Payload {
                body: entry.content.clone(),
                content_type: entry.mime_type.clone(),
                etag: validators.etag(&entry.hash),
                content_disposition: None,
            }
        }
    };

    Ok(http::response::build_payload_response(
        payload,
        validators.last_modified(),
        ctx.send_options(),
    )?)
}

fn header_str<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
