// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, SignupRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new candidate.
///
/// Hashes the password using Argon2 before storing it.
/// A duplicate email is reported as 409 Conflict with a visible message,
/// matching the signup form behavior.
pub async fn signup(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if User::find_by_email(&pool, &payload.email).await?.is_some() {
        return Err(AppError::Conflict(
            "Email already exists. Please try logging in.".to_string(),
        ));
    }

    let hashed_password = hash_password(&payload.password)?;

    let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&hashed_password)
        .execute(&pool)
        .await
        .map_err(|e| {
            // The pre-check can race with a concurrent signup; the unique
            // index is the real guard.
            if e.to_string().contains("UNIQUE constraint") {
                AppError::Conflict("Email already exists. Please try logging in.".to_string())
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": result.last_insert_rowid(),
            "username": payload.username,
            "email": payload.email,
        })),
    ))
}

/// Authenticates a user by email and returns a JWT token.
///
/// Candidates and admins log in through the same endpoint; the role claim
/// in the token determines what they can reach afterwards.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = User::find_by_email(&pool, &payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or(AppError::AuthError("Invalid credentials.".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid credentials.".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "username": user.username,
        "role": user.role,
    })))
}
