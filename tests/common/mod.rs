#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use skillnav_backend::config::Config;
use skillnav_backend::provider::{ProviderError, TextGenerator};
use skillnav_backend::routes;
use skillnav_backend::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Five parseable questions in the shape the MCQ prompt asks for.
pub const SAMPLE_QUIZ: &str = "\
1. Which language runs on the JVM?
A) Java
B) C
C) Go
D) Rust
Answer: A

2. Which AWS service stores objects?
A) EC2
B) S3
C) Lambda
D) RDS
Answer: B

3. Which company develops Azure?
A) Google
B) Amazon
C) Microsoft
D) IBM
Answer: C

4. Which is a NoSQL database?
A) Postgres
B) MySQL
C) Oracle
D) MongoDB
Answer: D

5. Which keyword declares a constant in Java?
A) final
B) let
C) const
D) var
Answer: A";

/// Correct option text for each question in `SAMPLE_QUIZ`, in order.
pub const SAMPLE_ANSWERS: [&str; 5] = ["Java", "S3", "Microsoft", "MongoDB", "final"];

pub const SAMPLE_RECOMMENDATIONS: &str =
    "<table><tr><td>The Rust Book</td></tr></table><script>alert('xss')</script>";

/// Deterministic provider: quiz prompts get `SAMPLE_QUIZ`, everything else
/// gets `SAMPLE_RECOMMENDATIONS`. Counts calls so tests can assert the
/// provider was (not) invoked.
pub struct ScriptedProvider {
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("multiple-choice") {
            Ok(SAMPLE_QUIZ.to_string())
        } else {
            Ok(SAMPLE_RECOMMENDATIONS.to_string())
        }
    }
}

/// Provider that always fails, for testing retryable-error surfacing.
pub struct FailingProvider;

#[async_trait]
impl TextGenerator for FailingProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::EmptyContent)
    }
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        gemini_api_key: "test-key-unused".to_string(),
        upload_dir: std::env::temp_dir()
            .join("skillnav-test-uploads")
            .to_string_lossy()
            .into_owned(),
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
    }
}

/// Builds the router against an in-memory database and the given
/// provider, without binding a socket. Returns the app and the pool for
/// direct assertions against stored records.
pub async fn build_app(provider: Arc<dyn TextGenerator>) -> (axum::Router, SqlitePool) {
    // A single never-recycled connection keeps the in-memory database
    // alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool.clone(), test_config(), provider);
    (routes::create_router(state), pool)
}

/// Spawns the app on a random port. Returns the base URL and the pool.
pub async fn spawn_app(provider: Arc<dyn TextGenerator>) -> (String, SqlitePool) {
    let (app, pool) = build_app(provider).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Signs up and logs in a fresh candidate; returns the bearer token and email.
pub async fn create_candidate(address: &str, client: &reqwest::Client) -> (String, String) {
    let unique = &uuid::Uuid::new_v4().to_string()[..8];
    let email = format!("cand_{}@example.com", unique);

    let response = client
        .post(format!("{}/api/auth/signup", address))
        .json(&serde_json::json!({
            "username": format!("cand_{}", unique),
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute signup");
    assert_eq!(response.status().as_u16(), 201);

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute login");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Invalid login body");
    let token = body["token"].as_str().expect("Missing token").to_string();

    (token, email)
}

/// Creates a candidate whose profile yields a Java batch allocation.
pub async fn create_allocated_candidate(
    address: &str,
    client: &reqwest::Client,
) -> (String, String) {
    let (token, email) = create_candidate(address, client).await;

    let response = client
        .put(format!("{}/api/profile", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "certifications": "Java and AWS" }))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .post(format!("{}/api/batch/allocate", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to allocate batch");
    assert_eq!(response.status().as_u16(), 200);

    (token, email)
}
