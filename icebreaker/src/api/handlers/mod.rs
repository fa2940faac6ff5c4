mod customize;
mod health;
mod parse;

pub use customize::customize_message;
pub use health::health_check;
pub use parse::parse_profile;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
        })),
    )
}
