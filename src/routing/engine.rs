//! Compiled routing engine.
//!
//! Bundles the rule evaluator, interception scope and propagation settings
//! built from one configuration. The HTTP edge holds it behind an `ArcSwap`
//! so a reload replaces the whole engine atomically.

use std::borrow::Cow;

use axum::http::header::InvalidHeaderName;
use axum::http::Uri;
use serde::Serialize;

use crate::config::schema::{Environment, RouterConfig};
use crate::routing::decision::{PassReason, RoutingDecision};
use crate::routing::matcher::{InterceptScope, Matcher};
use crate::routing::propagation::TenantPropagation;
use crate::routing::router::TenantRouter;

/// Explainable result of routing one request target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: String,
    pub intercepted: bool,
    pub decision: RoutingDecision,
}

/// Everything the tenant middleware needs, compiled from config.
#[derive(Debug)]
pub struct RoutingEngine {
    router: TenantRouter,
    scope: InterceptScope,
    propagation: TenantPropagation,
    forward_tenant_header: bool,
    environment: Environment,
}

impl RoutingEngine {
    pub fn from_config(config: &RouterConfig) -> Result<Self, InvalidHeaderName> {
        let tenancy = &config.tenancy;
        Ok(Self {
            router: TenantRouter::from_config(tenancy),
            scope: InterceptScope::excluding_prefixes(&tenancy.intercept_exclusions),
            propagation: TenantPropagation::from_config(tenancy)?,
            forward_tenant_header: config.upstream.forward_tenant_header,
            environment: tenancy.environment,
        })
    }

    pub fn router(&self) -> &TenantRouter {
        &self.router
    }

    pub fn propagation(&self) -> &TenantPropagation {
        &self.propagation
    }

    pub fn forwards_tenant_header(&self) -> bool {
        self.forward_tenant_header
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Route a request URI, honoring the interception scope.
    pub fn route(&self, uri: &Uri) -> RoutingDecision {
        if !self.scope.matches(uri) {
            return RoutingDecision::pass(PassReason::NotIntercepted);
        }
        self.router.resolve(uri.path())
    }

    /// Route a raw request target (path plus optional query) for display.
    ///
    /// A missing leading `/` is added. Targets that still do not parse as a
    /// URI are reported as unrecognized.
    pub fn explain(&self, target: &str) -> Resolution {
        let target: Cow<'_, str> = if target.starts_with('/') {
            Cow::Borrowed(target)
        } else {
            Cow::Owned(format!("/{target}"))
        };
        match target.parse::<Uri>() {
            Ok(uri) => {
                let decision = self.route(&uri);
                Resolution {
                    path: uri.path().to_string(),
                    intercepted: !matches!(
                        decision,
                        RoutingDecision::PassThrough { reason: PassReason::NotIntercepted }
                    ),
                    decision,
                }
            }
            Err(_) => Resolution {
                path: target.into_owned(),
                intercepted: false,
                decision: RoutingDecision::pass(PassReason::Unrecognized),
            },
        }
    }
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self {
            router: TenantRouter::default(),
            scope: InterceptScope::excluding_prefixes(&RouterConfig::default().tenancy.intercept_exclusions),
            propagation: TenantPropagation::new(
                axum::http::HeaderName::from_static("x-tenant-slug"),
                "tenant-slug",
                false,
            ),
            forward_tenant_header: true,
            environment: Environment::Development,
        }
    }
}
