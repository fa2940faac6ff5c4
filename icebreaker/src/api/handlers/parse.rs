//! `POST /api/parse-profile`: run the extractor over submitted page HTML.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::state::AppState;
use crate::error::{IcebreakerError, Result};
use crate::models::{validation_details, ProfileRecord};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParseProfileRequest {
    #[validate(length(min = 1, message = "html is required"))]
    #[serde(default)]
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseProfileResponse {
    pub success: bool,
    pub data: ProfileRecord,
    pub timestamp: DateTime<Utc>,
}

pub async fn parse_profile(
    State(state): State<AppState>,
    Json(request): Json<ParseProfileRequest>,
) -> Result<Json<ParseProfileResponse>> {
    request
        .validate()
        .map_err(|errors| IcebreakerError::Validation(validation_details(&errors)))?;

    let record = state.extractor.parse(&request.html)?;
    tracing::info!(profile = %record.name, company = %record.company, "parsed profile page");

    Ok(Json(ParseProfileResponse {
        success: true,
        data: record,
        timestamp: Utc::now(),
    }))
}
