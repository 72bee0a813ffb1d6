//! Small text helpers shared by the upstream adapters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Character budget for descriptions reused as UI subtitles.
pub const SUBTITLE_BUDGET: usize = 200;
pub const ELLIPSIS: &str = "...";
const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="([^">]+)""#).expect("valid img regex"));

pub fn strip_html(input: &str) -> String {
    HTML_TAG.replace_all(input, "").trim().to_string()
}

/// Cuts `input` to `budget` characters and appends [`ELLIPSIS`] when it is longer.
pub fn truncate_with_ellipsis(input: &str, budget: usize) -> String {
    match input.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{}", &input[..cut], ELLIPSIS),
        None => input.to_string(),
    }
}

/// `src` of the first `<img>` tag, if any.
pub fn first_img_src(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn reading_time_minutes(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Coarse visitor fingerprint: `"{ip}-{user_agent}"` reduced to ASCII alphanumerics.
pub fn fingerprint(ip: &str, user_agent: &str) -> String {
    format!("{ip}-{user_agent}")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_trims() {
        assert_eq!(
            strip_html("  <p>Hello <b>world</b></p>\n"),
            "Hello world"
        );
    }

    #[test]
    fn truncation_respects_budget() {
        let exact = "a".repeat(SUBTITLE_BUDGET);
        assert_eq!(truncate_with_ellipsis(&exact, SUBTITLE_BUDGET), exact);

        let short = "short description";
        assert_eq!(truncate_with_ellipsis(short, SUBTITLE_BUDGET), short);

        let long = "b".repeat(SUBTITLE_BUDGET + 1);
        let truncated = truncate_with_ellipsis(&long, SUBTITLE_BUDGET);
        assert_eq!(truncated.len(), SUBTITLE_BUDGET + ELLIPSIS.len());
        assert!(truncated.ends_with(ELLIPSIS));
        assert!(truncated.starts_with(&"b".repeat(SUBTITLE_BUDGET)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        assert_eq!(truncate_with_ellipsis(&text, 3), "ééé...");
        assert_eq!(truncate_with_ellipsis(&text, 5), text);
    }

    #[test]
    fn finds_first_image() {
        let html = r#"<p>x</p><IMG alt="a" src="https://cdn/1.png"><img src="https://cdn/2.png">"#;
        assert_eq!(first_img_src(html).as_deref(), Some("https://cdn/1.png"));
        assert_eq!(first_img_src("<p>none</p>"), None);
    }

    #[test]
    fn reading_time_rounds_up_with_floor_of_one() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn fingerprint_drops_punctuation() {
        assert_eq!(
            fingerprint("10.0.0.1", "Mozilla/5.0 (X11)"),
            "10001Mozilla50X11"
        );
    }
}
