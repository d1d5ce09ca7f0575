//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database ping)
//!
//! # Catalog
//! GET  /api/products                 - Product listing (search, category, pagination)
//! GET  /api/products/{slug}          - Product detail
//! GET  /api/products/{slug}/reviews  - Reviews for a product
//! POST /api/products/{slug}/reviews  - Leave a review (requires login)
//! GET  /api/categories               - Category listing
//!
//! # Checkout (rate-limited, ~5/min/IP)
//! POST /api/checkout                 - Create a gateway order for the cart
//! POST /api/verify                   - Verify payment signature, persist order
//!
//! # Coupons
//! GET  /api/coupons/validate         - Validate a coupon code
//!
//! # Wishlist (requires login)
//! GET  /api/wishlist                 - List wishlist entries
//! POST /api/wishlist                 - Toggle a product on the wishlist
//!
//! # Auth
//! POST /api/auth/register            - Register with email/password
//! POST /api/auth/login               - Login with email/password
//! POST /api/auth/logout              - Logout
//! GET  /api/auth/me                  - Current shopper
//! GET  /api/auth/oauth/login         - Redirect to federated provider
//! GET  /api/auth/oauth/callback      - Federated login callback
//!
//! # Account (requires login)
//! GET  /api/account/orders           - Order history
//! ```

pub mod account;
pub mod auth;
pub mod checkout;
pub mod coupons;
pub mod oauth;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route(
            "/products/{slug}/reviews",
            get(products::reviews).post(products::create_review),
        )
        .route("/categories", get(products::categories))
}

/// Create the checkout routes router, rate-limited per client IP.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::create_order))
        .route("/verify", post(checkout::verify_payment))
        .layer(middleware::checkout_rate_limiter())
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/oauth/login", get(oauth::login))
        .route("/oauth/callback", get(oauth::callback))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(catalog_routes())
                .merge(checkout_routes())
                .route("/coupons/validate", get(coupons::validate))
                .route(
                    "/wishlist",
                    get(wishlist::index).post(wishlist::toggle),
                )
                .route("/account/orders", get(account::orders))
                .nest("/auth", auth_routes()),
        )
}
