//! Model-backed advice endpoints. They always answer 200: a missing or
//! unreadable body means the default context, and model trouble means the
//! static payload with `isAiGenerated: false`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use portfolio_ai::{
    companion::{self, CompanionMessage, CompanionRequest},
    learning_suggestions::{self, LearningSuggestions, SuggestionRequest},
    progress_analysis::{self, AnalysisRequest, ProgressAnalysis},
};
use portfolio_core::{Envelope, Filler};
use serde_json::Value;
use tracing::debug;

use crate::AppState;

fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>, endpoint: &str) -> T {
    match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(endpoint, "unreadable request body, using default context: {rejection}");
            T::default()
        }
    }
}

pub async fn learning_suggestions(
    State(state): State<AppState>,
    body: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Json<Envelope<LearningSuggestions>> {
    let request = body_or_default(body, "learning-suggestions");
    let sourced =
        learning_suggestions::suggest(state.llm.as_deref(), request, Filler::from_entropy()).await;
    Json(Envelope::from_sourced(sourced, learning_suggestions::FALLBACK_MESSAGE).ai_generated())
}

pub async fn companion(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Json<Envelope<CompanionMessage>> {
    let request = CompanionRequest::from_json(body_or_default(body, "companion"));
    let sourced = companion::chat(
        state.llm.as_deref(),
        &state.config.ai.companion_name,
        request,
        Filler::from_entropy(),
        Utc::now(),
    )
    .await;
    Json(Envelope::from_sourced(sourced, companion::FALLBACK_MESSAGE).ai_generated())
}

pub async fn progress_analysis(
    State(state): State<AppState>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Json<Envelope<ProgressAnalysis>> {
    let request = body_or_default(body, "progress-analysis");
    let sourced = progress_analysis::analyze(state.llm.as_deref(), request).await;
    Json(Envelope::from_sourced(sourced, progress_analysis::FALLBACK_MESSAGE).ai_generated())
}
