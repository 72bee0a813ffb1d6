use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use http::{header::USER_AGENT, HeaderMap};
use portfolio_core::{text::fingerprint, Envelope, VisitorCounts};
use serde::Deserialize;
use tracing::debug;

use crate::{ApiResult, AppState};

const UNKNOWN: &str = "unknown";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitRequest {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

pub async fn visitor_counts(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<VisitorCounts>>> {
    let counts = state.visitors.counts()?;
    Ok(Json(Envelope::live(counts)))
}

/// Counts a visit. Fields missing from the body are read from the
/// `User-Agent` and `X-Forwarded-For` headers.
pub async fn record_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VisitRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<VisitorCounts>>> {
    let visit = body.map(|Json(v)| v).unwrap_or_default();

    let user_agent = visit
        .user_agent
        .or_else(|| header_str(&headers, USER_AGENT.as_str()))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let ip = visit
        .ip
        .or_else(|| {
            header_str(&headers, "x-forwarded-for")
                .and_then(|list| list.split(',').next().map(|ip| ip.trim().to_string()))
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    let counts = state.visitors.record(&fingerprint(&ip, &user_agent))?;
    debug!(
        total = counts.total_visitors,
        unique = counts.unique_visitors,
        "visit recorded"
    );
    Ok(Json(Envelope::live(counts)))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|v| !v.is_empty())
}
