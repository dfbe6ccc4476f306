//! Path-based tenant routing edge.
//!
//! Classifies inbound browser paths, rewrites organization and personal
//! workspace URLs into the application's `/app/...` namespace, and tags the
//! response with the resolved tenant.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod ops;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RoutingDecision, RoutingEngine, TenantContext, TenantRouter};
