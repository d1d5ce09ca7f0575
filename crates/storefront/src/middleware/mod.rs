//! HTTP middleware for the storefront.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalShopper, RequireShopper};
pub use rate_limit::{RateLimiterLayer, api_rate_limiter, checkout_rate_limiter};
pub use session::create_session_layer;
