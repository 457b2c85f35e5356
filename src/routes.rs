// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, batch, profile, quiz, recommendation},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, profile, batch, recommendations, quiz, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, provider, session map).
pub fn create_router(state: AppState) -> Router {
    let origins: [HeaderValue; 2] = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .route("/", put(profile::update_profile))
        .route("/resume", post(profile::upload_resume))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let batch_routes = Router::new()
        .route("/allocate", post(batch::allocate_batch))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let recommendation_routes = Router::new()
        .route("/", get(recommendation::get_recommendations))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let quiz_routes = Router::new()
        .route("/start", post(quiz::start_quiz))
        .route("/current", get(quiz::current_question))
        .route("/answer", post(quiz::submit_answer))
        .route("/restart", post(quiz::restart_quiz))
        .route("/scores", get(quiz::get_scores))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/batch", batch_routes)
        .nest("/api/recommendations", recommendation_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
