use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use portfolio_core::{
    Envelope, Filler, JournalEntry, LearningActivity, LearningStats, NewJournalEntry,
};
use portfolio_sources::learning::{generate_learning_stats, GENERATED_MESSAGE};
use serde::Serialize;
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

const RECENT_ENTRIES: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todays_entry: Option<JournalEntry>,
    pub recent_entries: Vec<JournalEntry>,
}

pub async fn journal_overview(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<JournalOverview>>> {
    let overview = JournalOverview {
        todays_entry: state.journal.today()?,
        recent_entries: state.journal.recent(RECENT_ENTRIES)?,
    };
    Ok(Json(Envelope::live(overview)))
}

pub async fn save_journal_entry(
    State(state): State<AppState>,
    body: Result<Json<NewJournalEntry>, JsonRejection>,
) -> ApiResult<Json<Envelope<JournalEntry>>> {
    let Json(entry) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let saved = state.journal.save(entry)?;
    info!(id = %saved.id, "journal entry saved");
    Ok(Json(
        Envelope::live(saved).with_message("Journal entry saved successfully"),
    ))
}

/// Generated numbers; flagged live because nothing more authoritative exists.
pub async fn learning_stats() -> Json<Envelope<LearningStats>> {
    let stats = generate_learning_stats(&mut Filler::from_entropy(), Utc::now().date_naive());
    Json(Envelope::live(stats).with_message(GENERATED_MESSAGE))
}

pub async fn log_learning_activity(
    body: Result<Json<LearningActivity>, JsonRejection>,
) -> ApiResult<Json<Envelope<LearningActivity>>> {
    let Json(activity) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    info!(
        kind = %activity.kind,
        count = activity.count,
        topic = activity.topic.as_deref().unwrap_or("-"),
        "learning activity logged"
    );
    Ok(Json(
        Envelope::live(activity).with_message("Learning activity logged successfully"),
    ))
}
