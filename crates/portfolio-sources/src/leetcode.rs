//! Problem-solving stats from a public coding-judge mirror.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use portfolio_core::{
    fetch_with_fallback, Filler, LeetCodeConfig, LeetCodeStats, Sourced, UpstreamError,
};
use reqwest::Client;
use serde::Deserialize;

use crate::client::{endpoint, send_json};

pub const SERVICE: &str = "leetcode";
pub const FALLBACK_MESSAGE: &str = "Using mock data";

const DEFAULT_TOTAL_QUESTIONS: u32 = 2500;
const CALENDAR_DAYS: i64 = 365;

/// The mirror's answer. Every field is optional; it may also answer 200
/// with `{"status": "error", "message": ...}` for unknown users.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProfile {
    status: Option<String>,
    message: Option<String>,
    total_solved: Option<u32>,
    total_questions: Option<u32>,
    easy_solved: Option<u32>,
    medium_solved: Option<u32>,
    hard_solved: Option<u32>,
    acceptance_rate: Option<f64>,
    ranking: Option<u64>,
    contribution_points: Option<u32>,
    reputation: Option<u32>,
    submission_calendar: Option<BTreeMap<String, u32>>,
}

pub async fn fetch_stats(client: &Client, config: &LeetCodeConfig) -> Sourced<LeetCodeStats> {
    fetch_with_fallback(
        SERVICE,
        || fetch_profile(client, config),
        into_stats,
        || sample_stats(&mut Filler::from_entropy(), Utc::now().date_naive()),
    )
    .await
}

async fn fetch_profile(
    client: &Client,
    config: &LeetCodeConfig,
) -> Result<RawProfile, UpstreamError> {
    let username = config
        .username
        .as_deref()
        .ok_or(UpstreamError::MissingConfig("leetcode.username"))?;

    send_json(SERVICE, client.get(endpoint(&config.api_base, username))).await
}

fn into_stats(raw: RawProfile) -> Result<LeetCodeStats, UpstreamError> {
    if raw.status.as_deref() == Some("error") {
        return Err(UpstreamError::Malformed(
            raw.message.unwrap_or_else(|| "mirror reported an error".to_string()),
        ));
    }

    Ok(LeetCodeStats {
        total_solved: raw.total_solved.unwrap_or(0),
        total_questions: raw
            .total_questions
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_TOTAL_QUESTIONS),
        easy_solved: raw.easy_solved.unwrap_or(0),
        medium_solved: raw.medium_solved.unwrap_or(0),
        hard_solved: raw.hard_solved.unwrap_or(0),
        acceptance_rate: raw.acceptance_rate.unwrap_or(0.0),
        ranking: raw.ranking.unwrap_or(0),
        contribution_points: raw.contribution_points.unwrap_or(0),
        reputation: raw.reputation.unwrap_or(0),
        submission_calendar: raw.submission_calendar.unwrap_or_default(),
    })
}

pub fn sample_stats(filler: &mut Filler, today: NaiveDate) -> LeetCodeStats {
    LeetCodeStats {
        total_solved: 247,
        total_questions: DEFAULT_TOTAL_QUESTIONS,
        easy_solved: 89,
        medium_solved: 132,
        hard_solved: 26,
        acceptance_rate: 68.5,
        ranking: 125_432,
        contribution_points: 1250,
        reputation: 2840,
        submission_calendar: mock_calendar(filler, today),
    }
}

/// A year of plausible submissions, denser towards `today`.
pub fn mock_calendar(filler: &mut Filler, today: NaiveDate) -> BTreeMap<String, u32> {
    let mut calendar = BTreeMap::new();
    for days_ago in 0..CALENDAR_DAYS {
        let probability = match days_ago {
            0..30 => 0.7,
            30..90 => 0.4,
            _ => 0.2,
        };
        if filler.chance(probability) {
            let day = today - Duration::days(days_ago);
            calendar.insert(day.format("%Y-%m-%d").to_string(), filler.range(1, 6));
        }
    }
    calendar
}
