//! Source-forge activity: repositories, stars, languages and recent commits.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use portfolio_core::{fetch_with_fallback, GitHubConfig, GitHubStats, Sourced, UpstreamError};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::debug;

use crate::client::{endpoint, send_json};

pub const SERVICE: &str = "github";
pub const FALLBACK_MESSAGE: &str = "Using mock data due to API limitations";

const RECENT_COMMITS_PER_REPO: usize = 3;
/// `totalCommits` is an estimate scaled from the recent-commit sample.
const COMMIT_ESTIMATE_FACTOR: u32 = 10;
const ACTIVITY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    public_repos: u32,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    name: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    forks_count: u32,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    commit: RawCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    #[serde(default)]
    author: Option<RawCommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawCommitAuthor {
    #[serde(default)]
    date: String,
}

impl RawCommit {
    fn day(&self) -> Option<&str> {
        self.commit.author.as_ref().and_then(|a| a.date.get(..10))
    }
}

#[derive(Debug)]
struct RawActivity {
    user: RawUser,
    repos: Vec<RawRepo>,
    /// One list per inspected repository.
    commits: Vec<Vec<RawCommit>>,
}

pub async fn fetch_stats(client: &Client, config: &GitHubConfig) -> Sourced<GitHubStats> {
    let now = Utc::now();
    fetch_with_fallback(
        SERVICE,
        || fetch_activity(client, config, now),
        |raw| Ok(summarize(raw, now.date_naive())),
        sample_stats,
    )
    .await
}

async fn fetch_activity(
    client: &Client,
    config: &GitHubConfig,
    now: DateTime<Utc>,
) -> Result<RawActivity, UpstreamError> {
    let username = config
        .username
        .as_deref()
        .ok_or(UpstreamError::MissingConfig("github.username"))?;

    let user: RawUser = send_json(
        SERVICE,
        authorized(
            client.get(endpoint(&config.api_base, &format!("users/{username}"))),
            config,
        ),
    )
    .await?;

    let repos: Vec<RawRepo> = send_json(
        SERVICE,
        authorized(
            client
                .get(endpoint(&config.api_base, &format!("users/{username}/repos")))
                .query(&[("per_page", "100"), ("sort", "updated")]),
            config,
        ),
    )
    .await?;

    let since = format!(
        "{}T00:00:00Z",
        (now - Duration::days(ACTIVITY_WINDOW_DAYS)).format("%Y-%m-%d")
    );

    let mut commits = Vec::new();
    for repo in repos.iter().take(config.max_repos) {
        let request = authorized(
            client
                .get(endpoint(
                    &config.api_base,
                    &format!("repos/{username}/{}/commits", repo.name),
                ))
                .query(&[("author", username), ("since", since.as_str())]),
            config,
        );

        // Private or empty repositories answer 409/404; they are skipped, not fatal.
        match send_json::<Vec<RawCommit>>(SERVICE, request).await {
            Ok(list) => commits.push(list),
            Err(e) => debug!(repo = %repo.name, "skipping repository: {e}"),
        }
    }

    Ok(RawActivity {
        user,
        repos,
        commits,
    })
}

fn authorized(request: RequestBuilder, config: &GitHubConfig) -> RequestBuilder {
    let request = request.header(ACCEPT, "application/vnd.github.v3+json");
    match &config.token {
        Some(token) => request.header(AUTHORIZATION, format!("token {}", token.expose_secret())),
        None => request,
    }
}

fn summarize(raw: RawActivity, today: NaiveDate) -> GitHubStats {
    let today = today.format("%Y-%m-%d").to_string();

    let mut commits_today = 0;
    let mut commits_this_week = 0;
    let mut recent = 0;
    for list in &raw.commits {
        for commit in list {
            commits_this_week += 1;
            if commit.day() == Some(today.as_str()) {
                commits_today += 1;
            }
        }
        recent += list.len().min(RECENT_COMMITS_PER_REPO) as u32;
    }

    let mut languages = BTreeMap::new();
    for repo in &raw.repos {
        if let Some(language) = &repo.language {
            *languages.entry(language.clone()).or_insert(0) += 1;
        }
    }

    GitHubStats {
        total_commits: recent * COMMIT_ESTIMATE_FACTOR,
        total_repos: raw.user.public_repos,
        total_stars: raw.repos.iter().map(|r| r.stargazers_count).sum(),
        total_forks: raw.repos.iter().map(|r| r.forks_count).sum(),
        commits_this_week,
        commits_today,
        languages,
    }
}

pub fn sample_stats() -> GitHubStats {
    GitHubStats {
        total_commits: 1250,
        total_repos: 42,
        total_stars: 156,
        total_forks: 23,
        commits_this_week: 12,
        commits_today: 3,
        languages: [
            ("JavaScript", 15),
            ("TypeScript", 12),
            ("Python", 8),
            ("Java", 5),
            ("CSS", 4),
        ]
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_stub, test_client};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    fn config_for(base: &str) -> GitHubConfig {
        GitHubConfig {
            username: Some("octo".to_string()),
            api_base: base.to_string(),
            ..GitHubConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_username_serves_sample() {
        let sourced = fetch_stats(&test_client(), &GitHubConfig::default()).await;
        assert!(!sourced.is_live());
        assert_eq!(sourced.data, sample_stats());
    }

    #[tokio::test]
    async fn upstream_error_status_serves_sample() {
        let base = spawn_stub(Router::new().route(
            "/users/octo",
            get(|| async { StatusCode::FORBIDDEN }),
        ))
        .await;

        let sourced = fetch_stats(&test_client(), &config_for(&base)).await;
        assert!(!sourced.is_live());
        assert_eq!(sourced.data.total_repos, 42);
    }

    #[tokio::test]
    async fn live_activity_is_summarized() {
        let now = Utc::now();
        let today = now.to_rfc3339();
        let three_days_ago = (now - Duration::days(3)).to_rfc3339();

        let router = Router::new()
            .route("/users/octo", get(|| async { Json(json!({"public_repos": 3})) }))
            .route(
                "/users/octo/repos",
                get(|| async {
                    Json(json!([
                        {"name": "alpha", "language": "Rust", "stargazers_count": 5, "forks_count": 1},
                        {"name": "beta", "language": "Rust", "stargazers_count": 2, "forks_count": 0},
                        {"name": "gamma", "language": null, "stargazers_count": 1, "forks_count": 2}
                    ]))
                }),
            )
            .route(
                "/repos/octo/alpha/commits",
                get(move || {
                    let today = today.clone();
                    let earlier = three_days_ago.clone();
                    async move {
                        Json(json!([
                            {"commit": {"author": {"date": today}}},
                            {"commit": {"author": {"date": today}}},
                            {"commit": {"author": {"date": earlier}}},
                            {"commit": {"author": {"date": earlier}}}
                        ]))
                    }
                }),
            )
            .route(
                "/repos/octo/beta/commits",
                get(|| async { StatusCode::CONFLICT }),
            )
            .route("/repos/octo/gamma/commits", get(|| async { Json(json!([])) }));

        let base = spawn_stub(router).await;
        let sourced = fetch_stats(&test_client(), &config_for(&base)).await;

        assert!(sourced.is_live());
        let stats = sourced.data;
        assert_eq!(stats.total_repos, 3);
        assert_eq!(stats.total_stars, 8);
        assert_eq!(stats.total_forks, 3);
        assert_eq!(stats.commits_this_week, 4);
        assert_eq!(stats.commits_today, 2);
        assert_eq!(stats.total_commits, 3 * COMMIT_ESTIMATE_FACTOR);
        assert_eq!(stats.languages.get("Rust"), Some(&2));
        assert_eq!(stats.languages.len(), 1);
    }

    async fn old_commit() -> Json<serde_json::Value> {
        Json(json!([{"commit": {"author": {"date": "2020-01-01T00:00:00Z"}}}]))
    }

    #[tokio::test]
    async fn only_the_most_recent_repositories_are_inspected() {
        let router = Router::new()
            .route("/users/octo", get(|| async { Json(json!({"public_repos": 2})) }))
            .route(
                "/users/octo/repos",
                get(|| async { Json(json!([{"name": "first"}, {"name": "second"}])) }),
            )
            .route("/repos/octo/first/commits", get(old_commit))
            .route("/repos/octo/second/commits", get(old_commit));

        let base = spawn_stub(router).await;
        let config = GitHubConfig {
            max_repos: 1,
            ..config_for(&base)
        };

        let sourced = fetch_stats(&test_client(), &config).await;
        assert!(sourced.is_live());
        assert_eq!(sourced.data.commits_this_week, 1);
    }

    #[tokio::test]
    async fn malformed_repository_list_serves_sample() {
        let router = Router::new()
            .route("/users/octo", get(|| async { Json(json!({"public_repos": 2})) }))
            .route("/users/octo/repos", get(|| async { "<html>rate limited</html>" }));

        let base = spawn_stub(router).await;
        let sourced = fetch_stats(&test_client(), &config_for(&base)).await;
        assert!(!sourced.is_live());
        assert!(sourced.fallback_reason().unwrap().contains("malformed"));
    }
}
