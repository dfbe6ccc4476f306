//! Request identification and upstream targeting.
//!
//! # Responsibilities
//! - Expose the request ID for log correlation
//! - Compute the upstream URI for a (possibly rewritten) request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The upstream keeps the request's path and query; only scheme and
//!   authority are replaced

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{Request, Uri};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read access to the request ID set by the request-id layer.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Scheme and authority of the upstream application.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
}

impl UpstreamTarget {
    /// Parse an absolute base URL such as `http://127.0.0.1:3000`.
    /// Any path on the base URL is ignored.
    pub fn parse(url: &str) -> Option<Self> {
        let uri: Uri = url.parse().ok()?;
        Some(Self {
            scheme: uri.scheme()?.clone(),
            authority: uri.authority()?.clone(),
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Absolute URI on the upstream for the request target of `uri`.
    pub fn uri_for(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Replace the path of `original`, keeping its query string.
pub fn rewrite_uri(original: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match original.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
