// src/handlers/recommendation.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::batch::persist_allocation,
    models::{batch::Batch, user::User},
    provider::prompts,
    state::AppState,
    utils::{html::sanitize_generated_html, jwt::Claims},
};

/// Returns course and job-role recommendations for the candidate's batch.
///
/// The provider is called at most once per user: the first successful
/// response is sanitized and cached on the record, and later views serve
/// the cached value. A provider failure surfaces as a retryable 502 and
/// caches nothing.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&state.pool, claims.user_id())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if let Some(cached) = user.courses_allocated {
        return Ok(Json(json!({
            "cached": true,
            "batch_allocation": user.batch_allocation,
            "recommendations": cached,
        })));
    }

    // Allocate on the way in when the profile has not been through the
    // batch allocation view yet.
    let batch = match user.batch_allocation.as_deref().and_then(Batch::parse_label) {
        Some(batch) => batch,
        None => {
            let batch = Batch::from_skill(user.certifications.as_deref().unwrap_or(""));
            persist_allocation(&state.pool, user.id, batch).await?;
            batch
        }
    };

    let raw = state
        .provider
        .generate(&prompts::recommendation_prompt(batch))
        .await?;

    let recommendations = sanitize_generated_html(&raw);

    sqlx::query("UPDATE users SET courses_allocated = ? WHERE id = ?")
        .bind(&recommendations)
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    tracing::info!("Cached recommendations for user {} ({})", user.id, batch.label());

    Ok(Json(json!({
        "cached": false,
        "batch_allocation": batch.label(),
        "recommendations": recommendations,
    })))
}
