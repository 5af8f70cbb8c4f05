//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Actas
        .route("/actas", get(handlers::list_actas))
        .route("/actas", post(handlers::create_acta))
        .route("/actas/:id", get(handlers::get_acta))
        .route("/actas/:id", patch(handlers::update_acta))
        // Signature workflow
        .route(
            "/actas/:id/signature-requests",
            post(handlers::send_signature_requests),
        )
        .route(
            "/actas/:id/signatures/verify",
            post(handlers::verify_signature_token),
        )
        .route("/actas/:id/signatures", post(handlers::record_signature))
        // Users
        .route("/users", post(handlers::upsert_user))
        .route("/users/:id", get(handlers::get_user));

    let mut app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}
