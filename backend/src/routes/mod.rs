//! Route definitions for the Paddy Yield Advisory Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes. The protected routers need the state up front so the
/// auth middleware verifies tokens against the configured JWT secret.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public + protected profile)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - predictions
        .nest("/predictions", prediction_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::me))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Prediction routes (protected)
fn prediction_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_predictions).post(handlers::create_prediction),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
