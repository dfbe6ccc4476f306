//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and header/cookie names
//! - Detect contradictory tenancy rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,

    #[error("upstream.url {0:?} must be an absolute http:// URL")]
    InvalidUpstream(String),

    #[error("tenancy.header_name {0:?} is not a valid HTTP header name")]
    InvalidHeaderName(String),

    #[error("tenancy.cookie_name {0:?} is not a valid cookie name")]
    InvalidCookieName(String),

    #[error("tenancy.public_paths entry {0:?} must start with '/'")]
    RelativePublicPath(String),

    #[error("tenancy.{field} entry {value:?} must be a single non-empty path segment")]
    InvalidSegment { field: &'static str, value: String },

    #[error("tenancy.personal_routes entry {0:?} is also reserved and would never be reached")]
    PersonalRouteReserved(String),

    #[error("tenancy.intercept_exclusions entry {0:?} must start with '/'")]
    RelativeExclusion(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("ops.bind_address {0:?} is not a socket address")]
    InvalidOpsAddress(String),

    #[error("ops.api_key must be set when the ops API is enabled")]
    MissingOpsKey,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }

    match url::Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() == "http" && url.host().is_some() => {}
        _ => errors.push(ValidationError::InvalidUpstream(config.upstream.url.clone())),
    }

    let tenancy = &config.tenancy;
    if HeaderName::from_bytes(tenancy.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName(tenancy.header_name.clone()));
    }
    if !is_cookie_name(&tenancy.cookie_name) {
        errors.push(ValidationError::InvalidCookieName(tenancy.cookie_name.clone()));
    }
    for path in &tenancy.public_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativePublicPath(path.clone()));
        }
    }
    for (field, values) in [
        ("reserved_segments", &tenancy.reserved_segments),
        ("personal_routes", &tenancy.personal_routes),
    ] {
        for value in values {
            if value.is_empty() || value.contains('/') {
                errors.push(ValidationError::InvalidSegment {
                    field,
                    value: value.clone(),
                });
            }
        }
    }
    for route in &tenancy.personal_routes {
        if tenancy.reserved_segments.contains(route) {
            errors.push(ValidationError::PersonalRouteReserved(route.clone()));
        }
    }
    for prefix in &tenancy.intercept_exclusions {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::RelativeExclusion(prefix.clone()));
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.ops.enabled {
        if config.ops.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidOpsAddress(config.ops.bind_address.clone()));
        }
        if config.ops.api_key.trim().is_empty() {
            errors.push(ValidationError::MissingOpsKey);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// RFC 6265 cookie-name is an HTTP token.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
