pub mod limit;
pub mod tenant;

pub use limit::concurrency_limit_middleware;
pub use tenant::{tenant_routing_middleware, SharedEngine};
