// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::user::User};

/// Lists all users with their profiles, allocations and scores, plus a
/// per-batch headcount summary for the dashboard.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = User::find_all(&pool).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT COALESCE(batch_allocation, 'Unallocated'), COUNT(*) \
         FROM users \
         GROUP BY COALESCE(batch_allocation, 'Unallocated')",
    )
    .fetch_all(&pool)
    .await?;

    let mut batch_counts = serde_json::Map::new();
    for (batch, count) in counts {
        batch_counts.insert(batch, json!(count));
    }

    Ok(Json(json!({
        "users": users,
        "batch_counts": batch_counts,
    })))
}

/// Fetches a single user by id.
/// Admin only.
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// DTO for admin edits. Only the provided fields change.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    /// 'candidate' or 'admin'.
    pub role: Option<String>,
    /// Batch label override, e.g. for manual re-allocation.
    #[validate(length(max = 50))]
    pub batch_allocation: Option<String>,
}

/// Updates a user's account fields.
/// Admin only.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if let Some(role) = &payload.role {
        if role != "candidate" && role != "admin" {
            return Err(AppError::BadRequest(
                "Role must be 'candidate' or 'admin'".to_string(),
            ));
        }
    }

    let result = sqlx::query(
        "UPDATE users SET \
            username = COALESCE(?, username), \
            role = COALESCE(?, role), \
            batch_allocation = COALESCE(?, batch_allocation) \
         WHERE id = ?",
    )
    .bind(&payload.username)
    .bind(&payload.role)
    .bind(&payload.batch_allocation)
    .bind(id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    Ok(Json(json!({ "message": "User updated" })))
}

/// Deletes a user record.
/// Admin only.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
