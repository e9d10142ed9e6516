//! Embedded single-page UI.
//!
//! Files are unversioned, so every response is `no-cache` with a content
//! hash ETag; browsers revalidate and get `304 Not Modified` when nothing
//! changed.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;
use std::fmt::Write;

#[derive(RustEmbed)]
#[folder = "ui"]
struct Asset;

const INDEX: &str = "index.html";

fn etag(hash: &[u8; 32]) -> String {
    // First 16 bytes of the sha256.
    let mut tag = String::with_capacity(34);
    tag.push('"');
    for byte in &hash[..16] {
        let _ = write!(tag, "{byte:02x}");
    }
    tag.push('"');
    tag
}

fn matches_etag(headers: &HeaderMap, tag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| {
            let candidate = candidate.trim();
            candidate == "*" || candidate.trim_start_matches("W/") == tag
        })
}

pub async fn serve_asset(uri: Uri, headers: HeaderMap) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => INDEX,
        other => other,
    };

    let Some(file) = Asset::get(path) else {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };

    let tag = etag(&file.metadata.sha256_hash());
    let cache = [
        (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        (
            header::ETAG,
            HeaderValue::from_str(&tag).unwrap_or_else(|_| HeaderValue::from_static("\"\"")),
        ),
    ];

    if matches_etag(&headers, &tag) {
        return (StatusCode::NOT_MODIFIED, cache).into_response();
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        cache,
        [(header::CONTENT_TYPE, mime.as_ref())],
        Body::from(file.data),
    )
        .into_response()
}
