//! HTTP middleware: auth extractors and rate limiting.

pub mod auth;
pub mod rate_limit;

pub use auth::{RequireAdmin, RequireSuperAdmin, request_context};
pub use rate_limit::login_rate_limiter;
