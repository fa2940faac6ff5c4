use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::require_api_secret;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/customize-message", post(handlers::customize_message))
        .route("/api/parse-profile", post(handlers::parse_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_secret,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
