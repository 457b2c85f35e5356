// src/handlers/batch.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{batch::Batch, user::User},
    utils::jwt::Claims,
};

/// Allocates the candidate to a batch from their declared certifications
/// and persists the label on the record.
///
/// Idempotent: recomputing yields the same label unless the certification
/// changed, in which case the stored allocation follows it.
pub async fn allocate_batch(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&pool, claims.user_id())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let batch = Batch::from_skill(user.certifications.as_deref().unwrap_or(""));

    persist_allocation(&pool, user.id, batch).await?;

    Ok(Json(json!({ "batch_allocation": batch.label() })))
}

/// Writes the allocation label onto the user record.
pub async fn persist_allocation(
    pool: &SqlitePool,
    user_id: i64,
    batch: Batch,
) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET batch_allocation = ? WHERE id = ?")
        .bind(batch.label())
        .bind(user_id)
        .execute(pool)
        .await?;

    tracing::info!("Allocated user {} to {}", user_id, batch.label());
    Ok(())
}
