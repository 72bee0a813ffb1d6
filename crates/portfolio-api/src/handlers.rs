//! Health and the upstream-backed read endpoints.
//!
//! Every read handler answers 200 with an [`Envelope`]; whether the payload is
//! live or substitute data is carried by `success`.

use axum::{extract::State, Json};
use chrono::Utc;
use portfolio_core::{Envelope, GitHubStats, LeetCodeStats, MediumPost, NowPlaying};
use portfolio_sources::{github, leetcode, medium, spotify};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
    pub uptime_seconds: u64,
    pub upstreams: UpstreamsConfigured,
}

/// Which upstreams have credentials; the rest serve fallback data only.
#[derive(Serialize, Debug)]
pub struct UpstreamsConfigured {
    pub github: bool,
    pub leetcode: bool,
    pub medium: bool,
    pub spotify: bool,
    pub openai: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().timestamp(),
        uptime_seconds: state.uptime().as_secs(),
        upstreams: UpstreamsConfigured {
            github: config.github.is_configured(),
            leetcode: config.leetcode.is_configured(),
            medium: config.medium.is_configured(),
            spotify: config.spotify.is_configured(),
            openai: state.llm.is_some(),
        },
    })
}

pub async fn github_stats(State(state): State<AppState>) -> Json<Envelope<GitHubStats>> {
    let sourced = state
        .caches
        .github
        .get_or_fetch(github::SERVICE, || {
            github::fetch_stats(&state.http, &state.config.github)
        })
        .await;
    Json(Envelope::from_sourced(sourced, github::FALLBACK_MESSAGE))
}

pub async fn leetcode_stats(State(state): State<AppState>) -> Json<Envelope<LeetCodeStats>> {
    let sourced = state
        .caches
        .leetcode
        .get_or_fetch(leetcode::SERVICE, || {
            leetcode::fetch_stats(&state.http, &state.config.leetcode)
        })
        .await;
    Json(Envelope::from_sourced(sourced, leetcode::FALLBACK_MESSAGE))
}

pub async fn medium_posts(State(state): State<AppState>) -> Json<Envelope<Vec<MediumPost>>> {
    let sourced = state
        .caches
        .medium
        .get_or_fetch(medium::SERVICE, || {
            medium::fetch_posts(&state.http, &state.config.medium)
        })
        .await;
    Json(Envelope::from_sourced(sourced, medium::FALLBACK_MESSAGE))
}

pub async fn spotify_now_playing(State(state): State<AppState>) -> Json<Envelope<NowPlaying>> {
    let sourced = state
        .caches
        .spotify
        .get_or_fetch(spotify::SERVICE, || {
            spotify::fetch_now_playing(&state.http, &state.config.spotify)
        })
        .await;
    Json(Envelope::from_sourced(sourced, spotify::FALLBACK_MESSAGE))
}
