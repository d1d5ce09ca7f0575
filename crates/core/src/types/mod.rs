//! Shared domain types.

pub mod email;
pub mod id;
pub mod money;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Currency, Money};
pub use role::Role;
pub use status::{AuditOutcome, DiscountType, OrderStatus, PaymentStatus};
