//! Admin roster management. Every handler here requires `SUPER_ADMIN`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use larkspur_core::{AdminUserId, Email, Role};

use crate::db::admin_users::{AdminUserRepository, NewAdminUser};
use crate::error::AppError;
use crate::middleware::RequireSuperAdmin;
use crate::models::admin_user::AdminUserView;
use crate::services::auth::hash_password;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    username: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    role: String,
    is_active: bool,
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    // Accept either casing; the UI sends SCREAMING_SNAKE.
    raw.to_lowercase()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("unknown role: {raw}")))
}

/// `GET /api/admin/users`
pub async fn index(
    RequireSuperAdmin(_): RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUserView>>, AppError> {
    let users = AdminUserRepository::new(state.pool()).list().await?;
    Ok(Json(users.iter().map(|u| u.to_view()).collect()))
}

/// `POST /api/admin/users`
pub async fn create(
    RequireSuperAdmin(_): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<AdminUserView>), AppError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("username is required".to_owned()));
    }
    if body.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    let email =
        Email::parse(body.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let role = parse_role(&body.role)?;
    let password_hash = hash_password(&body.password)?;

    let user = AdminUserRepository::new(state.pool())
        .create(NewAdminUser {
            username,
            email: &email,
            password_hash: &password_hash,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.to_view())))
}

/// `PUT /api/admin/users/{id}`
pub async fn update(
    RequireSuperAdmin(_): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<AdminUserView>, AppError> {
    let role = parse_role(&body.role)?;
    let user = AdminUserRepository::new(state.pool())
        .update(AdminUserId::new(id), role, body.is_active)
        .await?;
    Ok(Json(user.to_view()))
}

/// `DELETE /api/admin/users/{id}`
///
/// Self-deletion is refused so the roster can never lose its last
/// active super admin by accident.
pub async fn destroy(
    RequireSuperAdmin(claims): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let target = AdminUserId::new(id);
    if target == claims.admin_user_id() {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_owned(),
        ));
    }

    AdminUserRepository::new(state.pool()).delete(target).await?;
    Ok(StatusCode::NO_CONTENT)
}
