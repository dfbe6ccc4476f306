//! Routing decision types.

use serde::Serialize;

use crate::routing::slug::OrgSlug;

/// Tenant identifier propagated for the personal workspace.
pub const PERSONAL_TENANT: &str = "personal";

/// Resolved tenant for a rewritten request.
///
/// A pass-through request has no tenant context at all; use
/// `Option<TenantContext>` where "none" must be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "slug", rename_all = "snake_case")]
pub enum TenantContext {
    Organization(OrgSlug),
    Personal,
}

impl TenantContext {
    /// Value written to the tenant header and cookie.
    pub fn identifier(&self) -> &str {
        match self {
            TenantContext::Organization(slug) => slug.as_str(),
            TenantContext::Personal => PERSONAL_TENANT,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            TenantContext::Organization(_) => "organization",
            TenantContext::Personal => "personal",
        }
    }
}

/// Why a request was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassReason {
    ApiRoute,
    FrameworkInternal,
    StaticAsset,
    PublicPath,
    EmptyPath,
    ReservedSegment,
    Unrecognized,
    /// Outside the interception scope; the rules never ran.
    NotIntercepted,
}

impl PassReason {
    pub fn as_str(self) -> &'static str {
        match self {
            PassReason::ApiRoute => "api_route",
            PassReason::FrameworkInternal => "framework_internal",
            PassReason::StaticAsset => "static_asset",
            PassReason::PublicPath => "public_path",
            PassReason::EmptyPath => "empty_path",
            PassReason::ReservedSegment => "reserved_segment",
            PassReason::Unrecognized => "unrecognized",
            PassReason::NotIntercepted => "not_intercepted",
        }
    }
}

/// Outcome of evaluating one request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Forward the request unmodified.
    PassThrough { reason: PassReason },
    /// Serve `path` instead, scoped to `tenant`.
    Rewrite { path: String, tenant: TenantContext },
}

impl RoutingDecision {
    pub(crate) fn pass(reason: PassReason) -> Self {
        RoutingDecision::PassThrough { reason }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, RoutingDecision::PassThrough { .. })
    }

    /// Rewritten path, if any.
    pub fn rewritten_path(&self) -> Option<&str> {
        match self {
            RoutingDecision::Rewrite { path, .. } => Some(path),
            RoutingDecision::PassThrough { .. } => None,
        }
    }

    /// Tenant context, `None` for pass-through.
    pub fn tenant(&self) -> Option<&TenantContext> {
        match self {
            RoutingDecision::Rewrite { tenant, .. } => Some(tenant),
            RoutingDecision::PassThrough { .. } => None,
        }
    }

    /// Low-cardinality label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            RoutingDecision::PassThrough { .. } => "pass_through",
            RoutingDecision::Rewrite { tenant, .. } => tenant.mode(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RoutingDecision::PassThrough { reason } => reason.as_str(),
            RoutingDecision::Rewrite { .. } => "rewrite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let decision = RoutingDecision::Rewrite {
            path: "/app/acme-co/dashboard".to_string(),
            tenant: TenantContext::Organization(OrgSlug::parse("acme-co").unwrap()),
        };
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            serde_json::json!({
                "disposition": "rewrite",
                "path": "/app/acme-co/dashboard",
                "tenant": { "mode": "organization", "slug": "acme-co" }
            })
        );

        let personal = serde_json::to_value(TenantContext::Personal).unwrap();
        assert_eq!(personal, serde_json::json!({ "mode": "personal" }));

        let pass = RoutingDecision::pass(PassReason::ReservedSegment);
        assert_eq!(
            serde_json::to_value(&pass).unwrap(),
            serde_json::json!({ "disposition": "pass_through", "reason": "reserved_segment" })
        );
    }

    #[test]
    fn test_labels() {
        let pass = RoutingDecision::pass(PassReason::StaticAsset);
        assert_eq!(pass.label(), "pass_through");
        assert_eq!(pass.reason(), "static_asset");
        assert!(pass.tenant().is_none());
        assert!(pass.rewritten_path().is_none());

        let personal = RoutingDecision::Rewrite {
            path: "/app/personal/dashboard".to_string(),
            tenant: TenantContext::Personal,
        };
        assert_eq!(personal.label(), "personal");
        assert_eq!(personal.tenant().map(|t| t.identifier()), Some("personal"));
    }
}
