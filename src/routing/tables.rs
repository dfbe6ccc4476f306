//! Compiled lookup sets for route classification.
//!
//! Built once from [`TenancyConfig`] and never mutated; a config reload
//! builds a fresh set of tables.

use std::collections::HashSet;

use crate::config::schema::TenancyConfig;
use crate::routing::slug::{OrgSlug, SlugError};

/// Immutable allow/deny sets consulted by the tenant router.
#[derive(Debug, Clone)]
pub struct RouteTables {
    reserved: HashSet<String>,
    public_paths: HashSet<String>,
    personal_routes: HashSet<String>,
}

impl RouteTables {
    pub fn from_config(config: &TenancyConfig) -> Self {
        Self {
            reserved: config.reserved_segments.iter().cloned().collect(),
            public_paths: config.public_paths.iter().cloned().collect(),
            personal_routes: config.personal_routes.iter().cloned().collect(),
        }
    }

    /// First segment that must never be read as a tenant slug.
    pub fn is_reserved(&self, segment: &str) -> bool {
        self.reserved.contains(segment)
    }

    /// Exact-match public path.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }

    /// Bare route name served from the personal tenant.
    pub fn is_personal_route(&self, segment: &str) -> bool {
        self.personal_routes.contains(segment)
    }

    /// Validate a slug for a new organization.
    ///
    /// Stricter than routing: besides the shape, the slug must not collide
    /// with a reserved segment or a personal route name, otherwise the
    /// organization could never be reached by URL.
    pub fn check_new_slug(&self, candidate: &str) -> Result<OrgSlug, SlugError> {
        let slug = OrgSlug::parse(candidate)?;
        if self.is_reserved(slug.as_str()) || self.is_personal_route(slug.as_str()) {
            return Err(SlugError::Reserved(slug.as_str().to_string()));
        }
        Ok(slug)
    }

    /// (reserved, public, personal) set sizes.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (
            self.reserved.len(),
            self.public_paths.len(),
            self.personal_routes.len(),
        )
    }
}

impl Default for RouteTables {
    fn default() -> Self {
        Self::from_config(&TenancyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let tables = RouteTables::default();
        assert!(tables.is_reserved("admin"));
        assert!(tables.is_reserved("favicon.ico"));
        assert!(!tables.is_reserved("acme-co"));
        assert!(tables.is_public("/"));
        assert!(tables.is_public("/pricing"));
        assert!(!tables.is_public("/pricing/"));
        assert!(tables.is_personal_route("transactions"));
        assert!(!tables.is_personal_route("Transactions"));
    }

    #[test]
    fn test_check_new_slug() {
        let tables = RouteTables::default();
        assert_eq!(tables.check_new_slug("acme-co").unwrap().as_str(), "acme-co");
        assert_eq!(
            tables.check_new_slug("admin"),
            Err(SlugError::Reserved("admin".to_string()))
        );
        assert_eq!(
            tables.check_new_slug("reports"),
            Err(SlugError::Reserved("reports".to_string()))
        );
        assert_eq!(tables.check_new_slug("x"), Err(SlugError::TooShort));
    }
}
