// src/handlers/quiz.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        batch::Batch,
        question::{QuizQuestion, parse_generated_questions},
        session::{QuizSession, QuizState, record_score},
        user::User,
    },
    provider::{TextGenerator, prompts},
    state::AppState,
    utils::jwt::Claims,
};

/// Questions requested per attempt. The session length is whatever the
/// parser actually recovers from the provider response.
const QUIZ_LENGTH: usize = 15;

/// DTO for submitting one answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The selected option, as text or its letter.
    pub selected: String,
}

/// The question currently awaiting an answer, without the correct option.
#[derive(Debug, Serialize)]
struct QuestionView {
    index: usize,
    total: usize,
    prompt: String,
    options: Vec<String>,
}

impl QuestionView {
    fn from_session(session: &QuizSession) -> Option<QuestionView> {
        session.current_question().map(|q| QuestionView {
            index: session.current_index(),
            total: session.total_questions(),
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        })
    }
}

fn session_view(session: &QuizSession) -> Value {
    match session.state() {
        QuizState::InProgress => json!({
            "state": "in_progress",
            "total_questions": session.total_questions(),
            "question": QuestionView::from_session(session),
        }),
        QuizState::Completed => json!({
            "state": "completed",
            "total_questions": session.total_questions(),
            "score": session.running_score(),
        }),
    }
}

/// Generates and parses a fresh question set for a batch.
///
/// A provider failure, or a response with no parseable questions at all,
/// is a retryable provider error; nothing is cached and no session is
/// created.
async fn generate_question_set(
    provider: &dyn TextGenerator,
    batch: Batch,
) -> Result<Vec<QuizQuestion>, AppError> {
    let raw = provider
        .generate(&prompts::mcq_prompt(batch, QUIZ_LENGTH))
        .await?;

    let questions = parse_generated_questions(&raw);
    if questions.is_empty() {
        return Err(AppError::Provider(
            "response contained no usable questions".to_string(),
        ));
    }

    tracing::info!(
        "Generated {} questions for {} (requested {})",
        questions.len(),
        batch.label(),
        QUIZ_LENGTH
    );

    Ok(questions)
}

/// Loads the user's batch, refusing with a "profile incomplete" condition
/// when allocation has not run. No question generation is attempted in
/// that case.
async fn require_batch(pool: &SqlitePool, user_id: i64) -> Result<Batch, AppError> {
    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    user.batch_allocation
        .as_deref()
        .and_then(Batch::parse_label)
        .ok_or(AppError::BadRequest(
            "Batch allocation is missing. Please complete your profile.".to_string(),
        ))
}

/// Starts a quiz attempt for the user's batch.
///
/// If an attempt is already in progress it is resumed rather than
/// regenerated; a completed attempt is replaced by a fresh one.
pub async fn start_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();
    let batch = require_batch(&state.pool, user_id).await?;

    {
        let sessions = state.sessions.read().await;
        if let Some(session) = sessions.get(&user_id) {
            if session.state() == QuizState::InProgress {
                return Ok(Json(session_view(session)));
            }
        }
    }

    let questions = generate_question_set(state.provider.as_ref(), batch).await?;
    let session = QuizSession::new(questions);
    let view = session_view(&session);

    state.sessions.write().await.insert(user_id, session);

    Ok(Json(view))
}

/// Returns the state of the user's current attempt.
pub async fn current_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&claims.user_id()).ok_or(AppError::NotFound(
        "No active quiz session. Start one first.".to_string(),
    ))?;

    Ok(Json(session_view(session)))
}

/// Grades one answer and advances the session.
///
/// On the transition to completed, the final score is appended to the
/// user's persisted scores with trim-then-append retention (at most the
/// five most recent attempts are kept).
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    // Grade under the lock, persist after releasing it.
    let (outcome, total) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&user_id).ok_or(AppError::NotFound(
            "No active quiz session. Start one first.".to_string(),
        ))?;

        let outcome = session.submit_answer(&payload.selected).ok_or(
            AppError::BadRequest("Quiz already completed. Restart to try again.".to_string()),
        )?;
        (outcome, session.total_questions())
    };

    let mut body = json!({
        "correct": outcome.correct,
        "current_index": outcome.current_index,
        "state": outcome.state,
        "total_questions": total,
    });

    if let Some(score) = outcome.final_score {
        let scores = store_score(&state.pool, user_id, score).await?;
        body["score"] = json!(score);
        body["scores"] = json!(scores);
    }

    Ok(Json(body))
}

/// Discards the current attempt and generates a fresh question set.
pub async fn restart_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();
    let batch = require_batch(&state.pool, user_id).await?;

    let questions = generate_question_set(state.provider.as_ref(), batch).await?;
    let session = QuizSession::new(questions);
    let view = session_view(&session);

    state.sessions.write().await.insert(user_id, session);

    Ok(Json(view))
}

/// Returns the persisted score history (at most five entries, oldest first).
pub async fn get_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find_by_id(&state.pool, claims.user_id())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "scores": user.scores.0 })))
}

/// Read-modify-write of the bounded score history. No transaction: two
/// concurrent completions for the same user are last-write-wins, which is
/// the accepted store semantics.
async fn store_score(
    pool: &SqlitePool,
    user_id: i64,
    score: i64,
) -> Result<Vec<i64>, AppError> {
    let stored: sqlx::types::Json<Vec<i64>> =
        sqlx::query_scalar("SELECT scores FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let mut scores = stored.0;
    record_score(&mut scores, score);

    sqlx::query("UPDATE users SET scores = ? WHERE id = ?")
        .bind(sqlx::types::Json(&scores))
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(scores)
}
