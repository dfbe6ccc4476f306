//! Tenant identity propagation.
//!
//! The resolved tenant travels downstream twice: as a response header for
//! server-side consumers and as a cookie that client-side code can read
//! without parsing the URL. The cookie is deliberately not `HttpOnly`.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName, SET_COOKIE};

use crate::config::schema::TenancyConfig;
use crate::routing::decision::TenantContext;

/// Header and cookie settings for tenant propagation.
#[derive(Debug, Clone)]
pub struct TenantPropagation {
    header_name: HeaderName,
    cookie_name: String,
    secure: bool,
}

impl TenantPropagation {
    pub fn new(header_name: HeaderName, cookie_name: impl Into<String>, secure: bool) -> Self {
        Self {
            header_name,
            cookie_name: cookie_name.into(),
            secure,
        }
    }

    pub fn from_config(config: &TenancyConfig) -> Result<Self, InvalidHeaderName> {
        let header_name = HeaderName::from_bytes(config.header_name.as_bytes())?;
        Ok(Self::new(
            header_name,
            config.cookie_name.clone(),
            config.environment.is_production(),
        ))
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// `Set-Cookie` value for the tenant. Session lifetime, root path.
    pub fn cookie(&self, tenant: &TenantContext) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; SameSite=Lax",
            self.cookie_name,
            tenant.identifier()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Write the tenant header onto a forwarded request.
    pub fn apply_to_request(&self, headers: &mut HeaderMap, tenant: &TenantContext) {
        if let Ok(value) = HeaderValue::from_str(tenant.identifier()) {
            headers.insert(self.header_name.clone(), value);
        }
    }

    /// Decorate a response with the tenant header and cookie.
    pub fn apply_to_response(&self, headers: &mut HeaderMap, tenant: &TenantContext) {
        self.apply_to_request(headers, tenant);
        match HeaderValue::from_str(&self.cookie(tenant)) {
            Ok(cookie) => {
                headers.append(SET_COOKIE, cookie);
            }
            Err(e) => tracing::warn!(error = %e, "Tenant cookie is not a valid header value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Environment;
    use crate::routing::slug::OrgSlug;

    fn org(slug: &str) -> TenantContext {
        TenantContext::Organization(OrgSlug::parse(slug).unwrap())
    }

    #[test]
    fn test_cookie_attributes() {
        let dev = TenantPropagation::from_config(&TenancyConfig::default()).unwrap();
        assert_eq!(dev.cookie(&org("acme-co")), "tenant-slug=acme-co; Path=/; SameSite=Lax");
        assert_eq!(dev.cookie(&TenantContext::Personal), "tenant-slug=personal; Path=/; SameSite=Lax");

        let prod = TenantPropagation::from_config(&TenancyConfig {
            environment: Environment::Production,
            ..TenancyConfig::default()
        })
        .unwrap();
        assert_eq!(prod.cookie(&org("acme-co")), "tenant-slug=acme-co; Path=/; SameSite=Lax; Secure");
        assert!(!prod.cookie(&org("acme-co")).contains("HttpOnly"));
    }

    #[test]
    fn test_apply_to_response_keeps_existing_cookies() {
        let propagation = TenantPropagation::from_config(&TenancyConfig::default()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(SET_COOKIE, HeaderValue::from_static("session=abc; HttpOnly"));

        propagation.apply_to_response(&mut headers, &org("acme-co"));

        assert_eq!(headers.get("x-tenant-slug").unwrap(), "acme-co");
        let cookies: Vec<_> = headers.get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[1], "tenant-slug=acme-co; Path=/; SameSite=Lax");
    }

    #[test]
    fn test_invalid_header_name() {
        let config = TenancyConfig {
            header_name: "X Tenant".to_string(),
            ..TenancyConfig::default()
        };
        assert!(TenantPropagation::from_config(&config).is_err());
    }
}
