// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;
use std::path::Path;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{UpdateProfileRequest, User},
    state::AppState,
    utils::jwt::Claims,
};

/// Extensions accepted for resume uploads.
const ALLOWED_RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Returns the current user's record, including batch allocation and the
/// bounded score history shown on the candidate home view.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&state.pool, claims.user_id())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Saves the candidate info form.
///
/// Every field is written on each submit; an absent field clears the
/// stored value.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id();

    let result = sqlx::query(
        "UPDATE users SET \
            name = ?, degree = ?, specialization = ?, phone_number = ?, \
            certifications = ?, internship_details = ?, courses_completed = ?, \
            linkedin = ?, github = ?, programming_languages = ? \
         WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.degree)
    .bind(&payload.specialization)
    .bind(&payload.phone_number)
    .bind(&payload.certifications)
    .bind(&payload.internship_details)
    .bind(&payload.courses_completed)
    .bind(&payload.linkedin)
    .bind(&payload.github)
    .bind(&payload.programming_languages)
    .bind(user_id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({ "message": "Information saved successfully!" })))
}

/// Accepts a resume file as multipart form data.
///
/// Only the extension allow-list is enforced; the file lands under the
/// configured upload directory at a path derived from the uploaded
/// filename.
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("resume") {
            continue;
        }

        let file_name = field
            .file_name()
            .ok_or(AppError::BadRequest("Resume filename is missing".to_string()))?
            .to_string();

        // Keep only the final path component so the stored path stays
        // inside the upload directory.
        let file_name = Path::new(&file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(AppError::BadRequest("Invalid resume filename".to_string()))?
            .to_string();

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_RESUME_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported resume format '{}'; allowed: pdf, doc, docx",
                extension
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        tokio::fs::create_dir_all(&state.config.upload_dir).await?;
        let resume_path = format!("{}/{}", state.config.upload_dir, file_name);
        tokio::fs::write(&resume_path, &data).await?;

        sqlx::query("UPDATE users SET resume_path = ? WHERE id = ?")
            .bind(&resume_path)
            .bind(claims.user_id())
            .execute(&state.pool)
            .await?;

        tracing::info!("Stored resume for user {} at {}", claims.user_id(), resume_path);

        return Ok(Json(json!({ "resume_path": resume_path })));
    }

    Err(AppError::BadRequest(
        "Missing 'resume' field in upload".to_string(),
    ))
}
