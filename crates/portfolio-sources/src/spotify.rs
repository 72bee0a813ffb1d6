//! Currently playing track from the music service.
//!
//! Every request trades the long-lived refresh token for a fresh access
//! token; nothing is kept between calls.

use chrono::Utc;
use portfolio_core::{
    ensure_success, fetch_with_fallback, Album, AlbumImage, Artist, ExternalUrls, NowPlaying,
    Sourced, SpotifyConfig, Track, UpstreamError,
};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::client::{endpoint, send_json};

pub const SERVICE: &str = "spotify";
pub const FALLBACK_MESSAGE: &str = "Using mock data - Spotify API not configured";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RawCurrentlyPlaying {
    #[serde(default)]
    is_playing: bool,
    #[serde(default)]
    item: Option<Track>,
    #[serde(default)]
    progress_ms: Option<u64>,
}

pub async fn fetch_now_playing(client: &Client, config: &SpotifyConfig) -> Sourced<NowPlaying> {
    fetch_with_fallback(
        SERVICE,
        || fetch_currently_playing(client, config),
        |raw| Ok(into_now_playing(raw, Utc::now().timestamp_millis())),
        || sample_track(Utc::now().timestamp_millis()),
    )
    .await
}

async fn access_token(client: &Client, config: &SpotifyConfig) -> Result<String, UpstreamError> {
    let (Some(id), Some(secret), Some(refresh)) = (
        &config.client_id,
        &config.client_secret,
        &config.refresh_token,
    ) else {
        return Err(UpstreamError::MissingConfig("spotify credentials"));
    };

    let token: TokenResponse = send_json(
        SERVICE,
        client
            .post(endpoint(&config.accounts_base, "api/token"))
            .basic_auth(id.expose_secret(), Some(secret.expose_secret()))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh.expose_secret()),
            ]),
    )
    .await?;

    Ok(token.access_token)
}

/// `None` means the player is idle (204 or an empty body).
async fn fetch_currently_playing(
    client: &Client,
    config: &SpotifyConfig,
) -> Result<Option<RawCurrentlyPlaying>, UpstreamError> {
    let token = access_token(client, config).await?;

    let response = client
        .get(endpoint(&config.api_base, "me/player/currently-playing"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(UpstreamError::transport)?;

    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    ensure_success(SERVICE, response.status().as_u16())?;

    let body = response.text().await.map_err(UpstreamError::transport)?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&body)
        .map(Some)
        .map_err(UpstreamError::malformed)
}

fn into_now_playing(raw: Option<RawCurrentlyPlaying>, timestamp: i64) -> NowPlaying {
    match raw {
        Some(RawCurrentlyPlaying {
            is_playing,
            item: Some(track),
            progress_ms,
        }) => NowPlaying {
            is_playing,
            item: Some(track),
            progress_ms: progress_ms.unwrap_or(0),
            timestamp,
        },
        _ => NowPlaying::idle(timestamp),
    }
}

pub fn sample_track(timestamp: i64) -> NowPlaying {
    NowPlaying {
        is_playing: true,
        item: Some(Track {
            id: "sample-track".to_string(),
            name: "Bohemian Rhapsody".to_string(),
            artists: vec![Artist {
                name: "Queen".to_string(),
                external_urls: ExternalUrls {
                    spotify: "https://open.spotify.com/artist/1dfeR4HaWDbWqFHLkxsg1d".to_string(),
                },
            }],
            album: Album {
                name: "A Night at the Opera".to_string(),
                images: vec![AlbumImage {
                    url: "https://i.scdn.co/image/ab67616d0000b273ce4f1737bc8a646c8c4bd25a"
                        .to_string(),
                    height: Some(640),
                    width: Some(640),
                }],
            },
            external_urls: ExternalUrls {
                spotify: "https://open.spotify.com/track/4u7EnebtmKWzUH433cf5Qv".to_string(),
            },
            preview_url: None,
            duration_ms: 354_947,
        }),
        progress_ms: 120_000,
        timestamp,
    }
}
