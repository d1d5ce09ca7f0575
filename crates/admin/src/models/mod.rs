//! Domain types for the back office.

pub mod admin_user;
pub mod audit;
pub mod catalog;
pub mod coupon;
pub mod customer;
pub mod order;

pub use admin_user::{AdminUser, AdminUserView};
pub use audit::AuditEntry;
pub use catalog::{AdminCategory, AdminProduct, AdminReview};
pub use coupon::AdminCoupon;
pub use customer::CustomerSummary;
pub use order::{AdminOrder, AdminOrderItem};
