use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fallback::LastResort;

/// Aggregate activity for the source-forge profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    pub total_commits: u32,
    pub total_repos: u32,
    pub total_stars: u32,
    pub total_forks: u32,
    pub commits_this_week: u32,
    pub commits_today: u32,
    pub languages: BTreeMap<String, u32>,
}

impl LastResort for GitHubStats {
    fn last_resort() -> Self {
        Self::default()
    }
}

/// Problem-solving stats from the coding-judge mirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    pub total_solved: u32,
    pub total_questions: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
    pub acceptance_rate: f64,
    pub ranking: u64,
    pub contribution_points: u32,
    pub reputation: u32,
    /// Submission count keyed by day (or by the mirror's own timestamp keys).
    pub submission_calendar: BTreeMap<String, u32>,
}

impl LastResort for LeetCodeStats {
    fn last_resort() -> Self {
        Self::default()
    }
}

/// One syndicated blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediumPost {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub published_at: String,
    pub reading_time: u32,
    pub claps: u32,
    pub responses: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Artist {
    pub name: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlbumImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Album {
    pub name: String,
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    pub external_urls: ExternalUrls,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
}

/// What the music service reports as currently playing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NowPlaying {
    pub is_playing: bool,
    pub item: Option<Track>,
    pub progress_ms: u64,
    /// Epoch milliseconds at which this answer was produced.
    pub timestamp: i64,
}

impl NowPlaying {
    pub fn idle(timestamp: i64) -> Self {
        Self {
            is_playing: false,
            item: None,
            progress_ms: 0,
            timestamp,
        }
    }
}

impl LastResort for NowPlaying {
    fn last_resort() -> Self {
        Self::idle(chrono::Utc::now().timestamp_millis())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub day: String,
    pub articles: u32,
    pub dsa_problems: u32,
    pub system_design: u32,
    pub study_hours: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub articles_read_today: u32,
    pub articles_read_this_week: u32,
    pub dsa_problems_today: u32,
    pub dsa_problems_this_week: u32,
    pub system_design_topics_today: u32,
    pub system_design_topics_this_week: u32,
    pub study_streak_days: u32,
    pub total_study_hours: u32,
    pub weekly_progress: Vec<WeeklyProgress>,
}

impl LastResort for LearningStats {
    fn last_resort() -> Self {
        Self::default()
    }
}

/// A learning activity reported by the front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningActivity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "LearningActivity::default_count")]
    pub count: u32,
    #[serde(default)]
    pub topic: Option<String>,
}

impl LearningActivity {
    fn default_count() -> u32 {
        1
    }
}
