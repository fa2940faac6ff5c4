//! `POST /api/customize-message`: the relay operation.
//!
//! Validate, sanitize, fingerprint, then resolve through the store: cached
//! messages return immediately, concurrent identical requests attach to the
//! in-flight generation, and the first caller leads it. The generation runs
//! in a spawned task so a disconnecting caller never cancels an upstream
//! call that other waiters share.

use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::api::state::AppState;
use crate::cache::{fingerprint, Acquire, GenerationResult, MessageStore};
use crate::error::{GenerationError, IcebreakerError, Result};
use crate::llm::{prompts, CompletionOptions, LlmProvider};
use crate::models::{validation_details, CustomizeRequest, CustomizeResponse};
use crate::sanitize::sanitize;

pub async fn customize_message(
    State(state): State<AppState>,
    Json(request): Json<CustomizeRequest>,
) -> Result<Json<CustomizeResponse>> {
    request
        .validate()
        .map_err(|errors| IcebreakerError::Validation(validation_details(&errors)))?;
    let request = sanitize(&request)?;

    let key = fingerprint(
        &request.target_profile.name,
        &request.target_profile.company,
        &request.template,
    );
    let profile_name = request.target_profile.name.clone();

    match state.store.acquire(&key) {
        Acquire::Cached(message) => {
            tracing::info!(profile = %profile_name, "cache hit");
            Ok(Json(respond(message, profile_name, true, None)))
        }
        Acquire::Pending(mut rx) => {
            tracing::info!(profile = %profile_name, "joining in-flight generation");
            let outcome = await_outcome(rx.recv().await)?;
            Ok(Json(respond(outcome, profile_name, true, Some(true))))
        }
        Acquire::Lead(mut rx) => {
            spawn_generation(state.llm.clone(), state.store.clone(), key, &request);
            let outcome = await_outcome(rx.recv().await)?;
            Ok(Json(respond(outcome, profile_name, false, None)))
        }
    }
}

/// Run the generation to completion in its own task and publish the outcome
/// through the store.
fn spawn_generation(
    llm: LlmProvider,
    store: MessageStore,
    key: String,
    request: &CustomizeRequest,
) {
    let system_prompt = prompts::fill_system_prompt(request.user_profile.is_some());
    let user_prompt = prompts::fill_user_prompt(
        &request.target_profile,
        request.user_profile.as_ref(),
        &request.template,
    );

    tokio::spawn(async move {
        // Held for the whole task: an unwind clears the pending slot and
        // fails the waiters instead of leaving them parked on the key.
        let guard = store.completion_guard(key);

        let outcome: GenerationResult = llm
            .complete(
                Some(&system_prompt),
                &user_prompt,
                Some(&CompletionOptions::template_fill()),
            )
            .await
            .map_err(GenerationError::from);

        if let Err(error) = &outcome {
            tracing::warn!(?error, "message generation failed");
        }
        guard.finish(outcome);
    });
}

fn await_outcome(
    received: std::result::Result<GenerationResult, tokio::sync::broadcast::error::RecvError>,
) -> Result<String> {
    let outcome = received.map_err(|_| {
        IcebreakerError::Llm("generation task ended without an outcome".to_string())
    })?;
    outcome.map_err(IcebreakerError::from)
}

fn respond(
    message: String,
    profile_name: String,
    cached: bool,
    deduplicated: Option<bool>,
) -> CustomizeResponse {
    CustomizeResponse {
        success: true,
        customized_message: message,
        profile_name,
        cached,
        deduplicated,
        timestamp: Utc::now(),
    }
}
