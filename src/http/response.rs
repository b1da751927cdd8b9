//! HTTP response building module
//!
//! Provides builders for the status codes the router emits, decoupled from
//! specific route logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use hyper::{Response, StatusCode};

use super::cache;

/// A fully buffered, cacheable response body with its headers
#[derive(Debug, Clone)]
pub struct Payload {
    pub body: Bytes,
    pub content_type: String,
    /// Quoted, salted `ETag`
    pub etag: String,
    /// `Content-Disposition` value for downloads
    pub content_disposition: Option<String>,
}

/// Request facts that influence how a payload is sent
#[derive(Debug, Clone, Copy, Default)]
pub struct SendOptions<'a> {
    pub if_none_match: Option<&'a str>,
    pub is_head: bool,
}

/// Build a 200 response for `payload`, or 304 if the client already has it
pub fn build_payload_response(
    payload: Payload,
    last_modified: &str,
    opts: SendOptions<'_>,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    if cache::check_etag_match(opts.if_none_match, &payload.etag) {
        return build_304_response(&payload.etag, last_modified);
    }

    let content_length = payload.body.len();
    let body = if opts.is_head {
        Bytes::new()
    } else {
        payload.body
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(LAST_MODIFIED, last_modified)
        .header(CONTENT_LENGTH, content_length)
        .header(ETAG, &payload.etag)
        .header(CONTENT_TYPE, payload.content_type);

    if let Some(disposition) = payload.content_disposition {
        builder = builder.header(CONTENT_DISPOSITION, disposition);
    }

    builder.body(Full::new(body))
}

/// Build 304 Not Modified response
pub fn build_304_response(
    etag: &str,
    last_modified: &str,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(LAST_MODIFIED, last_modified)
        .body(Full::new(Bytes::new()))
}

/// Build 404 Not Found response with an empty body
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_empty_response(StatusCode::NOT_FOUND)
}

/// Build 500 Internal Server Error response with an empty body
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_empty_response(StatusCode::INTERNAL_SERVER_ERROR)
}

fn build_empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = status;
            resp
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
