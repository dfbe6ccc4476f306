//! Tenant route resolution.
//!
//! # Responsibilities
//! - Classify a request path as API, framework-internal, static, public,
//!   organization-scoped or personal
//! - Compute the internal `/app/...` path for tenant-scoped requests
//!
//! # Design Decisions
//! - Pure function of the path and the compiled tables: no I/O, no state
//! - First matching rule wins; anything unrecognized passes through
//! - Personal route names are checked before slug classification, so a
//!   personal route can never be claimed by an organization

use crate::config::schema::TenancyConfig;
use crate::routing::decision::{PassReason, RoutingDecision, TenantContext};
use crate::routing::slug::OrgSlug;
use crate::routing::tables::RouteTables;

const API_PREFIX: &str = "/api/";
const FRAMEWORK_PREFIX: &str = "/_next/";

/// Internal namespace rewritten paths live under.
pub const APP_NAMESPACE: &str = "/app";

/// Sub-path used when an organization URL names no page.
pub const DEFAULT_ORG_ROUTE: &str = "dashboard";

/// Rule evaluator mapping request paths to routing decisions.
#[derive(Debug, Clone, Default)]
pub struct TenantRouter {
    tables: RouteTables,
}

impl TenantRouter {
    pub fn new(tables: RouteTables) -> Self {
        Self { tables }
    }

    pub fn from_config(config: &TenancyConfig) -> Self {
        Self::new(RouteTables::from_config(config))
    }

    pub fn tables(&self) -> &RouteTables {
        &self.tables
    }

    /// Resolve a request path (no query string).
    pub fn resolve(&self, path: &str) -> RoutingDecision {
        if path.starts_with(API_PREFIX) {
            return RoutingDecision::pass(PassReason::ApiRoute);
        }
        if path.starts_with(FRAMEWORK_PREFIX) {
            return RoutingDecision::pass(PassReason::FrameworkInternal);
        }
        if has_file_extension(path) {
            return RoutingDecision::pass(PassReason::StaticAsset);
        }
        if self.tables.is_public(path) {
            return RoutingDecision::pass(PassReason::PublicPath);
        }

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return RoutingDecision::pass(PassReason::EmptyPath);
        };

        if self.tables.is_reserved(first) {
            return RoutingDecision::pass(PassReason::ReservedSegment);
        }

        if self.tables.is_personal_route(first) {
            let rest = path.strip_prefix('/').unwrap_or(path);
            return RoutingDecision::Rewrite {
                path: format!("{APP_NAMESPACE}/personal/{rest}"),
                tenant: TenantContext::Personal,
            };
        }

        match OrgSlug::parse(first) {
            Ok(slug) => {
                let rest = segments.collect::<Vec<_>>().join("/");
                let sub_path = if rest.is_empty() { DEFAULT_ORG_ROUTE } else { rest.as_str() };
                RoutingDecision::Rewrite {
                    path: format!("{APP_NAMESPACE}/{slug}/{sub_path}"),
                    tenant: TenantContext::Organization(slug),
                }
            }
            Err(_) => RoutingDecision::pass(PassReason::Unrecognized),
        }
    }
}

/// True when the path ends in `.` followed by one or more ASCII alphanumerics.
fn has_file_extension(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric()),
        None => false,
    }
}
