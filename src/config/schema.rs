//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant router.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// The web application that receives rewritten requests.
    pub upstream: UpstreamConfig,

    /// Tenant routing rules and propagation.
    pub tenancy: TenancyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Operations API.
    pub ops: OpsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Upstream web application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the application server (plain HTTP).
    pub url: String,

    /// Also send the tenant header on the forwarded request.
    pub forward_tenant_header: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
            forward_tenant_header: true,
        }
    }
}

/// Deployment environment. Only affects the cookie `Secure` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Interpret an environment flag value: `production` is production,
    /// everything else is development.
    pub fn from_flag(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Tenant routing rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TenancyConfig {
    /// Running environment.
    pub environment: Environment,

    /// Response header carrying the resolved tenant.
    pub header_name: String,

    /// Cookie carrying the resolved tenant.
    pub cookie_name: String,

    /// First segments that are never treated as a tenant slug.
    pub reserved_segments: Vec<String>,

    /// Exact paths served without tenant context.
    pub public_paths: Vec<String>,

    /// Bare route names that resolve to the personal tenant.
    pub personal_routes: Vec<String>,

    /// Path prefixes the router is never invoked for.
    pub intercept_exclusions: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            header_name: "X-Tenant-Slug".to_string(),
            cookie_name: "tenant-slug".to_string(),
            reserved_segments: strings(&[
                "login",
                "signup",
                "forgot-password",
                "reset-password",
                "verify-email",
                "admin",
                "support",
                "api",
                "_next",
                "static",
                "favicon.ico",
                "robots.txt",
                "sitemap.xml",
            ]),
            public_paths: strings(&[
                "/",
                "/login",
                "/signup",
                "/forgot-password",
                "/reset-password",
                "/verify-email",
                "/pricing",
                "/about",
                "/contact",
            ]),
            personal_routes: strings(&[
                "dashboard",
                "settings",
                "transactions",
                "accounts",
                "reports",
                "profile",
            ]),
            intercept_exclusions: strings(&[
                "/_next/static",
                "/_next/image",
                "/favicon.ico",
                "/public/",
            ]),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus recorder.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Operations API configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OpsConfig {
    /// Enable the ops listener.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Ops listener bind address.
    pub bind_address: String,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
