// src/state.rs

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::models::session::QuizSession;
use crate::provider::TextGenerator;

/// Active quiz sessions keyed by user id. Explicit shared context rather
/// than a process-wide global, so concurrent users each get their own
/// attempt.
pub type SessionMap = Arc<RwLock<HashMap<i64, QuizSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Generative-text provider. Trait object so tests inject a scripted fake.
    pub provider: Arc<dyn TextGenerator>,
    pub sessions: SessionMap,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, provider: Arc<dyn TextGenerator>) -> Self {
        Self {
            pool,
            config,
            provider,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
