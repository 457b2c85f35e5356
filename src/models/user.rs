// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use validator::{Validate, ValidationError};

/// Represents the 'users' table. Candidates and admins share the table,
/// distinguished by `role`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// Unique login identifier.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'candidate' or 'admin'.
    pub role: String,

    // Candidate info form fields. All optional until the profile is filled in.
    pub name: Option<String>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub phone_number: Option<String>,
    pub certifications: Option<String>,
    pub internship_details: Option<String>,
    pub courses_completed: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub programming_languages: Option<String>,
    pub resume_path: Option<String>,

    /// Label of the allocated batch, absent until allocation runs.
    pub batch_allocation: Option<String>,

    /// Cached, sanitized recommendation HTML. Written once; later views
    /// reuse it instead of calling the provider again.
    pub courses_allocated: Option<String>,

    /// Most recent quiz scores, oldest first, at most five entries.
    pub scores: Json<Vec<i64>>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

const USER_COLUMNS: &str = "id, username, email, password, role, name, degree, specialization, \
     phone_number, certifications, internship_details, courses_completed, linkedin, github, \
     programming_languages, resume_path, batch_allocation, courses_allocated, scores, created_at";

impl User {
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id DESC",
            USER_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }
}

/// DTO for candidate signup.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for the candidate info form. Every field is written on submit;
/// absent fields clear the stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub degree: Option<String>,
    #[validate(length(max = 100))]
    pub specialization: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 100))]
    pub certifications: Option<String>,
    #[validate(length(max = 1000))]
    pub internship_details: Option<String>,
    #[validate(length(max = 2000))]
    pub courses_completed: Option<String>,
    #[validate(custom(function = validate_profile_link))]
    pub linkedin: Option<String>,
    #[validate(custom(function = validate_profile_link))]
    pub github: Option<String>,
    #[validate(length(max = 500))]
    pub programming_languages: Option<String>,
}

fn validate_profile_link(link: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(link).map_err(|_| ValidationError::new("invalid_link"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::new("link_must_be_http"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_links_must_be_http_urls() {
        assert!(validate_profile_link("https://github.com/someone").is_ok());
        assert!(validate_profile_link("http://linkedin.com/in/someone").is_ok());
        assert!(validate_profile_link("ftp://example.com").is_err());
        assert!(validate_profile_link("not a url").is_err());
    }
}
