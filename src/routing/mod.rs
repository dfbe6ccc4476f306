//! Tenant routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → matcher.rs (inside interception scope?)
//!     → router.rs (classify path, compute /app/... target)
//!     → Return: RoutingDecision (PassThrough or Rewrite + TenantContext)
//!     → propagation.rs (X-Tenant-Slug header + tenant-slug cookie)
//!
//! Engine Compilation (at startup and on reload):
//!     TenancyConfig
//!     → tables.rs (hash sets for reserved/public/personal)
//!     → engine.rs (router + scope + propagation)
//!     → Freeze as immutable RoutingEngine
//! ```
//!
//! # Design Decisions
//! - Tables compiled once, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always yields the same decision
//! - Never fails a request: unknown shapes pass through

pub mod decision;
pub mod engine;
pub mod matcher;
pub mod propagation;
pub mod router;
pub mod slug;
pub mod tables;

pub use decision::{PassReason, RoutingDecision, TenantContext, PERSONAL_TENANT};
pub use engine::{Resolution, RoutingEngine};
pub use router::TenantRouter;
pub use slug::{is_valid_slug, slugify, OrgSlug, SlugError};
pub use tables::RouteTables;
