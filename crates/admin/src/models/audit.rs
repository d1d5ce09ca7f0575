//! Audit trail domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use larkspur_core::{AuditLogId, AuditOutcome};

/// One recorded back-office login attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: AuditLogId,
    /// The identifier the caller tried to log in with.
    pub username: String,
    /// What happened.
    pub outcome: AuditOutcome,
    /// Client IP, as reported by proxy headers.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the attempt happened.
    pub created_at: DateTime<Utc>,
}
