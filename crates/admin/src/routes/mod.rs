//! HTTP route handlers for the back office.
//!
//! All routes live under `/api/admin`:
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/api/admin/login` | `auth::login` (rate limited) |
//! | POST | `/api/admin/refresh` | `auth::refresh` |
//! | POST | `/api/admin/logout` | `auth::logout` |
//! | GET | `/api/admin/dashboard` | `dashboard::stats` |
//! | GET, POST | `/api/admin/products` | `products::index`, `products::create` |
//! | GET, PUT, DELETE | `/api/admin/products/{id}` | `products::show`, `update`, `destroy` |
//! | PUT | `/api/admin/products/{id}/stock` | `products::set_stock` |
//! | GET, POST | `/api/admin/categories` | `categories::index`, `categories::create` |
//! | PUT, DELETE | `/api/admin/categories/{id}` | `categories::update`, `categories::destroy` |
//! | GET | `/api/admin/orders` | `orders::index` |
//! | GET | `/api/admin/orders/{id}` | `orders::show` |
//! | PUT | `/api/admin/orders/{id}/status` | `orders::update_status` |
//! | GET, POST | `/api/admin/coupons` | `coupons::index`, `coupons::create` |
//! | PUT, DELETE | `/api/admin/coupons/{id}` | `coupons::update`, `coupons::destroy` |
//! | GET | `/api/admin/reviews` | `reviews::index` |
//! | DELETE | `/api/admin/reviews/{id}` | `reviews::destroy` |
//! | GET | `/api/admin/customers` | `customers::index` |
//! | GET, POST | `/api/admin/users` | `admin_users::index`, `admin_users::create` |
//! | PUT, DELETE | `/api/admin/users/{id}` | `admin_users::update`, `admin_users::destroy` |
//! | GET | `/api/admin/audit-log` | `audit::index` |

pub mod admin_users;
pub mod audit;
pub mod auth;
pub mod categories;
pub mod coupons;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reviews;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::middleware;
use crate::state::AppState;

/// Assemble the `/api/admin` router.
pub fn routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .layer(middleware::login_rate_limiter())
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout));

    let management_routes = Router::new()
        .route("/dashboard", get(dashboard::stats))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/products/{id}/stock", put(products::set_stock))
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/coupons", get(coupons::index).post(coupons::create))
        .route(
            "/coupons/{id}",
            put(coupons::update).delete(coupons::destroy),
        )
        .route("/reviews", get(reviews::index))
        .route("/reviews/{id}", delete(reviews::destroy))
        .route("/customers", get(customers::index))
        .route("/users", get(admin_users::index).post(admin_users::create))
        .route(
            "/users/{id}",
            put(admin_users::update).delete(admin_users::destroy),
        )
        .route("/audit-log", get(audit::index));

    Router::new().nest("/api/admin", auth_routes.merge(management_routes))
}
