//! Shopper summaries for the back office.

use chrono::{DateTime, Utc};
use serde::Serialize;

use larkspur_core::ShopperId;

/// One row in the customer listing.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: ShopperId,
    pub email: String,
    pub oauth_provider: Option<String>,
    pub order_count: i64,
    pub created_at: DateTime<Utc>,
}
