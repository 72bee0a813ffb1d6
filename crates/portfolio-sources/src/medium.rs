//! Latest posts from the syndicated blog, read through an RSS-to-JSON bridge.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use portfolio_core::text::{
    first_img_src, reading_time_minutes, strip_html, truncate_with_ellipsis, SUBTITLE_BUDGET,
};
use portfolio_core::{fetch_with_fallback, Filler, MediumConfig, MediumPost, Sourced, UpstreamError};
use reqwest::Client;
use serde::Deserialize;

use crate::client::send_json;

pub const SERVICE: &str = "medium";
pub const FALLBACK_MESSAGE: &str = "Using sample posts - feed unavailable";

pub const PLACEHOLDER_THUMBNAILS: [&str; 6] = [
    "https://miro.medium.com/v2/resize:fit:1400/1*y6C4nSvy2Woe0m7bWEn4BA.png",
    "https://miro.medium.com/v2/resize:fit:1400/1*BC1nBKrqo2xXgZ8SWZjKQA.png",
    "https://miro.medium.com/v2/resize:fit:1400/1*8tpiLHpPQrdugVoXuDoZOg.png",
    "https://miro.medium.com/v2/resize:fit:1400/1*J3G3akaMpUOLegw0p0qthA.png",
    "https://miro.medium.com/v2/resize:fit:1400/1*QY8swdGtmqK8pnbXzgm6Mw.png",
    "https://miro.medium.com/v2/resize:fit:1400/1*FVaGW7GsMdUAeRtHrs7Qbg.png",
];

const DEFAULT_TAGS: [&str; 3] = ["Technology", "Programming", "Web Development"];

#[derive(Debug, Deserialize)]
struct RawFeed {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    title: String,
    #[serde(rename = "pubDate")]
    pub_date: String,
    link: String,
    thumbnail: Option<String>,
    description: String,
    content: String,
    categories: Vec<String>,
}

pub async fn fetch_posts(client: &Client, config: &MediumConfig) -> Sourced<Vec<MediumPost>> {
    let max_posts = config.max_posts;
    let mut filler = Filler::from_entropy();
    fetch_with_fallback(
        SERVICE,
        || fetch_feed(client, config),
        move |feed| into_posts(feed, max_posts, &mut filler),
        || sample_posts(Utc::now()),
    )
    .await
}

/// Feed handles always carry a leading `@`.
pub fn normalize_username(username: &str) -> String {
    let trimmed = username.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

async fn fetch_feed(client: &Client, config: &MediumConfig) -> Result<RawFeed, UpstreamError> {
    let username = config
        .username
        .as_deref()
        .ok_or(UpstreamError::MissingConfig("medium.username"))?;

    let rss_url = format!("{}{}", config.feed_base, normalize_username(username));
    send_json(
        SERVICE,
        client
            .get(config.feed_api.as_str())
            .query(&[("rss_url", rss_url.as_str())]),
    )
    .await
}

fn into_posts(
    feed: RawFeed,
    max_posts: usize,
    filler: &mut Filler,
) -> Result<Vec<MediumPost>, UpstreamError> {
    if feed.status != "ok" {
        return Err(UpstreamError::Malformed(format!(
            "feed status {:?}: {}",
            feed.status,
            feed.message.unwrap_or_default()
        )));
    }

    Ok(feed
        .items
        .into_iter()
        .take(max_posts)
        .enumerate()
        .map(|(index, item)| into_post(index, item, filler))
        .collect())
}

/// Subtitle and reading time come from the description, or the title when
/// the feed sends none.
fn into_post(index: usize, item: RawItem, filler: &mut Filler) -> MediumPost {
    let description = match strip_html(&item.description) {
        stripped if stripped.is_empty() => strip_html(&item.title),
        stripped => stripped,
    };

    let thumbnail = item
        .thumbnail
        .filter(|url| !url.is_empty())
        .or_else(|| first_img_src(&item.content))
        .unwrap_or_else(|| {
            PLACEHOLDER_THUMBNAILS[index % PLACEHOLDER_THUMBNAILS.len()].to_string()
        });

    let tags = if item.categories.is_empty() {
        DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        item.categories
    };

    MediumPost {
        id: format!("medium-{index}"),
        title: item.title,
        subtitle: truncate_with_ellipsis(&description, SUBTITLE_BUDGET),
        url: item.link,
        published_at: item.pub_date,
        reading_time: reading_time_minutes(&description),
        claps: filler.claps(),
        responses: filler.responses(),
        thumbnail: Some(thumbnail),
        tags,
    }
}

struct SamplePost {
    slug: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reading_time: u32,
    claps: u32,
    responses: u32,
    tags: &'static [&'static str],
}

const SAMPLE_POSTS: [SamplePost; 6] = [
    SamplePost {
        slug: "structuring-large-android-apps",
        title: "Structuring Large Android Applications with Kotlin",
        subtitle: "Layering a growing Android codebase with MVVM, Jetpack Compose and a clear module graph...",
        reading_time: 8,
        claps: 234,
        responses: 12,
        tags: &["Android", "Kotlin", "Mobile Development", "MVVM"],
    },
    SamplePost {
        slug: "intern-to-full-time",
        title: "From Intern to Full-Time Developer",
        subtitle: "What shipping public infrastructure apps to millions of users taught me in my first two years...",
        reading_time: 12,
        claps: 456,
        responses: 23,
        tags: &["Career", "Android", "Experience"],
    },
    SamplePost {
        slug: "kotlin-multiplatform-in-practice",
        title: "Kotlin Multiplatform in Practice",
        subtitle: "Sharing business logic between Android and iOS, and where the seams still show...",
        reading_time: 10,
        claps: 189,
        responses: 8,
        tags: &["Kotlin Multiplatform", "Cross-Platform", "Mobile"],
    },
    SamplePost {
        slug: "android-performance-notes",
        title: "Notes on Android Performance",
        subtitle: "Memory, rendering and startup: profiling techniques that paid off on real devices...",
        reading_time: 15,
        claps: 312,
        responses: 18,
        tags: &["Android", "Performance", "Optimization"],
    },
    SamplePost {
        slug: "web-to-mobile",
        title: "A Web Developer Goes Mobile",
        subtitle: "Comparing component models in React and Android and the habits that carried over...",
        reading_time: 9,
        claps: 278,
        responses: 15,
        tags: &["React", "Android", "Web Development"],
    },
    SamplePost {
        slug: "building-for-scale",
        title: "Building Apps for Millions of Users",
        subtitle: "Security reviews, staged rollouts and the operational side of very large user bases...",
        reading_time: 11,
        claps: 445,
        responses: 27,
        tags: &["Scale", "Security", "Infrastructure"],
    },
];

/// Six fixed posts, one week apart, the newest a week before `now`.
pub fn sample_posts(now: DateTime<Utc>) -> Vec<MediumPost> {
    SAMPLE_POSTS
        .iter()
        .enumerate()
        .map(|(i, sample)| MediumPost {
            id: format!("sample-{}", i + 1),
            title: sample.title.to_string(),
            subtitle: sample.subtitle.to_string(),
            url: format!("https://medium.com/{}", sample.slug),
            published_at: (now - Duration::days(7 * (i as i64 + 1)))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            reading_time: sample.reading_time,
            claps: sample.claps,
            responses: sample.responses,
            thumbnail: Some(PLACEHOLDER_THUMBNAILS[i].to_string()),
            tags: sample.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_stub, test_client};
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use portfolio_core::filler::{CLAPS_MAX, CLAPS_MIN};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn config_for(base: &str) -> MediumConfig {
        MediumConfig {
            username: Some("writer".to_string()),
            feed_api: format!("{base}/v1/api.json"),
            ..MediumConfig::default()
        }
    }

    fn feed(items: Vec<Value>) -> Value {
        json!({"status": "ok", "items": items})
    }

    #[test]
    fn usernames_gain_a_single_at_sign() {
        assert_eq!(normalize_username("writer"), "@writer");
        assert_eq!(normalize_username("@writer"), "@writer");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let item = RawItem {
            title: "Long".to_string(),
            description: format!("<p>{}</p>", "a".repeat(300)),
            ..RawItem::default()
        };
        let post = into_post(0, item, &mut Filler::seeded(1));
        assert_eq!(post.subtitle.chars().count(), SUBTITLE_BUDGET + 3);
        assert!(post.subtitle.ends_with("..."));
    }

    #[test]
    fn missing_description_falls_back_to_title() {
        let item = RawItem {
            title: "Designing a Rate Limiter".to_string(),
            description: "<p> </p>".to_string(),
            ..RawItem::default()
        };
        let post = into_post(0, item, &mut Filler::seeded(4));
        assert_eq!(post.subtitle, "Designing a Rate Limiter");
        assert_eq!(post.title, "Designing a Rate Limiter");
        assert_eq!(post.reading_time, 1);

        let long_title = RawItem {
            title: "t".repeat(SUBTITLE_BUDGET + 10),
            ..RawItem::default()
        };
        let post = into_post(1, long_title, &mut Filler::seeded(4));
        assert_eq!(post.subtitle.chars().count(), SUBTITLE_BUDGET + 3);
    }

    #[test]
    fn thumbnail_prefers_item_then_content_then_placeholder() {
        let mut filler = Filler::seeded(2);

        let with_thumb = RawItem {
            thumbnail: Some("https://img/own.png".to_string()),
            content: r#"<img src="https://img/content.png">"#.to_string(),
            ..RawItem::default()
        };
        assert_eq!(
            into_post(0, with_thumb, &mut filler).thumbnail.as_deref(),
            Some("https://img/own.png")
        );

        let from_content = RawItem {
            thumbnail: Some(String::new()),
            content: r#"<p>x</p><IMG class="a" src="https://img/content.png">"#.to_string(),
            ..RawItem::default()
        };
        assert_eq!(
            into_post(0, from_content, &mut filler).thumbnail.as_deref(),
            Some("https://img/content.png")
        );

        let bare = into_post(7, RawItem::default(), &mut filler);
        assert_eq!(bare.thumbnail.as_deref(), Some(PLACEHOLDER_THUMBNAILS[1]));
        assert_eq!(bare.tags, vec!["Technology", "Programming", "Web Development"]);
    }

    #[test]
    fn sample_posts_are_a_week_apart() {
        let now = Utc::now();
        let posts = sample_posts(now);
        assert_eq!(posts.len(), 6);
        let first = DateTime::parse_from_rfc3339(&posts[0].published_at).unwrap();
        let last = DateTime::parse_from_rfc3339(&posts[5].published_at).unwrap();
        assert_eq!((first - last).num_days(), 35);
        assert_eq!((now - first.with_timezone(&Utc)).num_days(), 7);
    }

    #[tokio::test]
    async fn feed_items_are_mapped_and_capped() {
        let router = Router::new().route(
            "/v1/api.json",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("rss_url").map(String::as_str)
                    != Some("https://medium.com/feed/@writer")
                {
                    return Json(json!({"status": "error", "message": "bad rss_url"}));
                }
                let items = (0..8)
                    .map(|i| {
                        json!({
                            "title": format!("Post {i}"),
                            "pubDate": "2024-05-01 10:00:00",
                            "link": format!("https://medium.com/p/{i}"),
                            "description": "<p>short body</p>",
                            "content": "",
                            "categories": ["rust"]
                        })
                    })
                    .collect();
                Json(feed(items))
            }),
        );

        let base = spawn_stub(router).await;
        let sourced = fetch_posts(&test_client(), &config_for(&base)).await;

        assert!(sourced.is_live());
        let posts = sourced.data;
        assert_eq!(posts.len(), 6);
        assert_eq!(posts[2].id, "medium-2");
        assert_eq!(posts[2].subtitle, "short body");
        assert_eq!(posts[2].reading_time, 1);
        assert_eq!(posts[2].tags, vec!["rust"]);
        for post in &posts {
            assert!((CLAPS_MIN..CLAPS_MAX).contains(&post.claps));
            assert!(post.responses < 20);
        }
    }

    #[tokio::test]
    async fn non_ok_feed_status_serves_samples() {
        let router = Router::new().route(
            "/v1/api.json",
            get(|| async { Json(json!({"status": "error", "message": "not found"})) }),
        );
        let base = spawn_stub(router).await;

        let sourced = fetch_posts(&test_client(), &config_for(&base)).await;
        assert!(!sourced.is_live());
        assert_eq!(sourced.data.len(), 6);
    }

    #[tokio::test]
    async fn bridge_outage_serves_samples() {
        let router = Router::new().route(
            "/v1/api.json",
            get(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base = spawn_stub(router).await;

        let sourced = fetch_posts(&test_client(), &config_for(&base)).await;
        assert!(!sourced.is_live());
        assert_eq!(sourced.data[0].id, "sample-1");
    }
}
