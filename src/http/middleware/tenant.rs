//! Tenant routing middleware.
//! Rewrites tenant-scoped paths and propagates the tenant downstream.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{rewrite_uri, RequestIdExt};
use crate::observability::metrics;
use crate::routing::{RoutingDecision, RoutingEngine};

/// Routing engine shared with the reloader.
pub type SharedEngine = Arc<ArcSwap<RoutingEngine>>;

pub async fn tenant_routing_middleware(
    State(engine): State<SharedEngine>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // One snapshot per request; a concurrent reload does not affect it.
    let engine = engine.load_full();

    // Tenant identity is only ever asserted by the router.
    req.headers_mut().remove(engine.propagation().header_name());

    let decision = engine.route(req.uri());
    metrics::record_decision(&decision);

    match decision {
        RoutingDecision::PassThrough { reason } => {
            tracing::trace!(
                request_id = %req.request_id(),
                path = %req.uri().path(),
                reason = reason.as_str(),
                "Passing through"
            );
            next.run(req).await
        }
        RoutingDecision::Rewrite { path, tenant } => {
            let uri = match rewrite_uri(req.uri(), &path) {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!(
                        request_id = %req.request_id(),
                        target = %path,
                        error = %e,
                        "Rewrite produced an invalid URI; passing through"
                    );
                    return next.run(req).await;
                }
            };

            tracing::debug!(
                request_id = %req.request_id(),
                from = %req.uri().path(),
                to = %path,
                tenant = tenant.identifier(),
                mode = tenant.mode(),
                "Rewriting request"
            );

            *req.uri_mut() = uri;
            if engine.forwards_tenant_header() {
                engine.propagation().apply_to_request(req.headers_mut(), &tenant);
            }
            req.extensions_mut().insert(tenant.clone());

            let mut response = next.run(req).await;
            engine.propagation().apply_to_response(response.headers_mut(), &tenant);
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Extension, http::StatusCode, middleware, Router};
    use tower::ServiceExt;

    use crate::config::{Environment, RouterConfig};
    use crate::routing::TenantContext;

    // Echoes the URI the inner service saw, plus the tenant header.
    async fn echo(req: Request<Body>) -> String {
        let tenant = req
            .headers()
            .get("x-tenant-slug")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        format!("{} {}", req.uri(), tenant)
    }

    fn app(config: RouterConfig) -> Router {
        let engine: SharedEngine = Arc::new(ArcSwap::from_pointee(RoutingEngine::from_config(&config).unwrap()));
        Router::new()
            .fallback(echo)
            .layer(middleware::from_fn_with_state(engine, tenant_routing_middleware))
    }

    async fn call(app: Router, uri: &str, header: Option<&str>) -> (StatusCode, axum::http::HeaderMap, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header("x-tenant-slug", value);
        }
        let res = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_organization_rewrite() {
        let (status, headers, body) = call(app(RouterConfig::default()), "/acme-co?tab=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "/app/acme-co/dashboard?tab=2 acme-co");
        assert_eq!(headers.get("x-tenant-slug").unwrap(), "acme-co");
        assert_eq!(
            headers.get("set-cookie").unwrap(),
            "tenant-slug=acme-co; Path=/; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_personal_rewrite_in_production() {
        let mut config = RouterConfig::default();
        config.tenancy.environment = Environment::Production;

        let (_, headers, body) = call(app(config), "/dashboard", None).await;
        assert_eq!(body, "/app/personal/dashboard personal");
        assert_eq!(
            headers.get("set-cookie").unwrap(),
            "tenant-slug=personal; Path=/; SameSite=Lax; Secure"
        );
    }

    #[tokio::test]
    async fn test_pass_through_is_undecorated() {
        for uri in ["/api/v1/transactions", "/admin/orgs", "/login", "/ab", "/favicon.ico"] {
            let (_, headers, body) = call(app(RouterConfig::default()), uri, None).await;
            assert_eq!(body, format!("{uri} -"));
            assert!(headers.get("x-tenant-slug").is_none(), "{uri}");
            assert!(headers.get("set-cookie").is_none(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_client_supplied_tenant_header_is_dropped() {
        let (_, _, body) = call(app(RouterConfig::default()), "/admin/orgs", Some("acme-co")).await;
        assert_eq!(body, "/admin/orgs -");

        let (_, _, body) = call(app(RouterConfig::default()), "/other-org", Some("acme-co")).await;
        assert_eq!(body, "/app/other-org/dashboard other-org");
    }

    #[tokio::test]
    async fn test_header_not_forwarded_when_disabled() {
        let mut config = RouterConfig::default();
        config.upstream.forward_tenant_header = false;

        let (_, headers, body) = call(app(config.clone()), "/acme-co/reports", None).await;
        assert_eq!(body, "/app/acme-co/reports -");
        // still decorated on the response
        assert_eq!(headers.get("x-tenant-slug").unwrap(), "acme-co");

        // a client-supplied value never reaches the upstream either
        let (_, _, body) = call(app(config.clone()), "/admin/orgs", Some("victim-org")).await;
        assert_eq!(body, "/admin/orgs -");

        let (_, headers, body) = call(app(config), "/other-org", Some("victim-org")).await;
        assert_eq!(body, "/app/other-org/dashboard -");
        assert_eq!(headers.get("x-tenant-slug").unwrap(), "other-org");
    }

    #[tokio::test]
    async fn test_tenant_context_in_extensions() {
        async fn tenant_of(Extension(tenant): Extension<TenantContext>) -> String {
            tenant.identifier().to_string()
        }

        let engine: SharedEngine = Arc::new(ArcSwap::from_pointee(RoutingEngine::default()));
        let app = Router::new()
            .fallback(tenant_of)
            .layer(middleware::from_fn_with_state(engine, tenant_routing_middleware));

        let (_, _, body) = call(app, "/acme-co/settings", None).await;
        assert_eq!(body, "acme-co");
    }
}
