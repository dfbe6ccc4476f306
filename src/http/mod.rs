//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → middleware/tenant.rs (route, rewrite, tag tenant)
//!     → server.rs forward_handler (headers.rs, upstream client)
//!     → response.rs (strip hop-by-hop) + tenant header/cookie
//!     → Send to client
//! ```

pub mod headers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UpstreamTarget, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
