//! Domain types for the storefront.

pub mod coupon;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

pub use coupon::Coupon;
pub use order::{Address, CartItem, NewAddress, Order, OrderItem};
pub use product::{Category, Product, Review};
pub use user::{CurrentShopper, Shopper};
pub use wishlist::WishlistEntry;

/// Keys used for session storage.
pub mod session_keys {
    /// The authenticated shopper (`CurrentShopper`).
    pub const CURRENT_SHOPPER: &str = "current_shopper";
    /// CSRF state for the federated login flow.
    pub const OAUTH_STATE: &str = "oauth_state";
}
