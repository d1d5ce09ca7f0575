//! Audit trail handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::db::audit_log::AuditLogRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::audit::AuditEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    limit: Option<i64>,
}

/// `GET /api/admin/audit-log`
pub async fn index(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let entries = AuditLogRepository::new(state.pool())
        .recent(query.limit.unwrap_or(100))
        .await?;
    Ok(Json(entries))
}
