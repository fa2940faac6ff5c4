//! Shared-secret authentication for `/api/*` routes.
//!
//! Enforced only when `API_SECRET_KEY` is configured. Without a configured
//! secret the API stays open, which is the expected local-development setup.
//! `/health` is mounted outside this middleware and is always public.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::error::IcebreakerError;

pub async fn require_api_secret(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.server.api_secret.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get("X-API-Secret")
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(secret) if secret == expected => next.run(request).await,
        _ => IcebreakerError::ApiAuth.into_response(),
    }
}
