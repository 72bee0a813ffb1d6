//! Personalised next-study suggestions.

use std::fmt;

use portfolio_core::{Filler, LastResort, Sourced};
use serde::{Deserialize, Serialize};

use crate::advisor::{advise_json, ModelSchema};
use crate::llm_provider::{GenerationConfig, LLMProvider, Message};

pub const FALLBACK_MESSAGE: &str = "Using fallback suggestions - AI service not available";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: usize = 400;
/// Sessions longer than this get a system-design deep dive.
const DEEP_DIVE_MINUTES: u32 = 45;

const SYSTEM_PROMPT: &str = "\
You are a learning advisor for system design and data structures & algorithms.
Suggest concrete, actionable study activities that fit the learner's level,
recent topics, weak areas and the time they have. Prefer specific problems,
topics and resources over general advice, and vary suggestions to avoid burnout.

Answer with a single JSON object and nothing else:
{
  \"mainSuggestion\": string,
  \"alternativeSuggestions\": [string, string, string],
  \"reasoning\": string,
  \"estimatedTime\": integer minutes,
  \"difficulty\": integer 1-5,
  \"resources\": [string],
  \"nextSteps\": string
}";

const SYSTEM_DESIGN_TOPICS: [&str; 8] = [
    "Load Balancing Strategies",
    "Database Sharding Patterns",
    "Caching Mechanisms",
    "Microservices Communication",
    "API Gateway Design",
    "Message Queue Systems",
    "CDN Implementation",
    "Distributed System Consistency",
];

const DSA_TOPICS: [&str; 8] = [
    "Binary Search Variations",
    "Dynamic Programming Patterns",
    "Graph Traversal Algorithms",
    "Tree Data Structures",
    "Sliding Window Technique",
    "Two Pointer Approach",
    "Backtracking Problems",
    "Heap Operations",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningLevel {
    Beginner,
    Advanced,
    #[default]
    #[serde(other)]
    Intermediate,
}

impl LearningLevel {
    fn difficulty(self) -> u8 {
        match self {
            LearningLevel::Beginner => 2,
            LearningLevel::Intermediate => 3,
            LearningLevel::Advanced => 4,
        }
    }
}

impl fmt::Display for LearningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningLevel::Beginner => write!(f, "beginner"),
            LearningLevel::Intermediate => write!(f, "intermediate"),
            LearningLevel::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningStyle {
    Visual,
    HandsOn,
    Reading,
    #[default]
    #[serde(other)]
    Mixed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletedToday {
    pub system_design: u32,
    pub dsa: u32,
    pub articles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningContext {
    pub current_level: LearningLevel,
    pub recent_topics: Vec<String>,
    pub struggling_areas: Vec<String>,
    pub completed_today: CompletedToday,
    /// Minutes available for this session.
    pub time_available: u32,
    pub preferred_learning_style: LearningStyle,
    pub upcoming_goals: Vec<String>,
}

impl Default for LearningContext {
    fn default() -> Self {
        Self {
            current_level: LearningLevel::Intermediate,
            recent_topics: Vec::new(),
            struggling_areas: Vec::new(),
            completed_today: CompletedToday::default(),
            time_available: 30,
            preferred_learning_style: LearningStyle::Mixed,
            upcoming_goals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionRequest {
    pub context: LearningContext,
    pub specific_request: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSuggestions {
    pub main_suggestion: String,
    pub alternative_suggestions: Vec<String>,
    pub reasoning: String,
    pub estimated_time: u32,
    pub difficulty: u8,
    pub resources: Vec<String>,
    pub next_steps: String,
}

impl ModelSchema for LearningSuggestions {
    fn check(&self) -> Result<(), String> {
        if self.main_suggestion.trim().is_empty() {
            return Err("mainSuggestion is empty".to_string());
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(format!("difficulty {} outside 1-5", self.difficulty));
        }
        Ok(())
    }
}

impl LastResort for LearningSuggestions {
    fn last_resort() -> Self {
        Self {
            main_suggestion: "Solve one medium problem you have not seen before".to_string(),
            estimated_time: 30,
            difficulty: 3,
            ..Self::default()
        }
    }
}

pub async fn suggest(
    llm: Option<&dyn LLMProvider>,
    request: SuggestionRequest,
    mut filler: Filler,
) -> Sourced<LearningSuggestions> {
    let messages = vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(context_prompt(&request)),
    ];
    let context = request.context;

    advise_json(
        llm,
        messages,
        GenerationConfig::new(TEMPERATURE, MAX_TOKENS),
        move || fallback_suggestions(&context, &mut filler),
    )
    .await
}

fn context_prompt(request: &SuggestionRequest) -> String {
    let ctx = &request.context;
    let mut prompt = format!(
        "LEARNING CONTEXT:
- Current level: {}
- Recent topics: {}
- Struggling areas: {}
- Completed today: {} system design, {} DSA, {} articles
- Time available: {} minutes
- Learning style: {:?}
- Upcoming goals: {}
",
        ctx.current_level,
        ctx.recent_topics.join(", "),
        ctx.struggling_areas.join(", "),
        ctx.completed_today.system_design,
        ctx.completed_today.dsa,
        ctx.completed_today.articles,
        ctx.time_available,
        ctx.preferred_learning_style,
        ctx.upcoming_goals.join(", "),
    );
    if let Some(specific) = &request.specific_request {
        prompt.push_str(&format!("\nSPECIFIC REQUEST: {specific}\n"));
    }
    prompt
}

fn pick<'a>(filler: &mut Filler, topics: &'a [&'a str]) -> &'a str {
    filler.pick(topics).copied().unwrap_or("core fundamentals")
}

pub fn fallback_suggestions(context: &LearningContext, filler: &mut Filler) -> LearningSuggestions {
    let main_suggestion = if context.time_available > DEEP_DIVE_MINUTES {
        format!("Deep dive into {}", pick(filler, &SYSTEM_DESIGN_TOPICS))
    } else {
        format!("Quick practice: {} problems", pick(filler, &DSA_TOPICS))
    };

    let review = filler
        .pick(&context.recent_topics)
        .cloned()
        .unwrap_or_else(|| pick(filler, &SYSTEM_DESIGN_TOPICS).to_string());

    LearningSuggestions {
        main_suggestion,
        alternative_suggestions: vec![
            format!("Review {review}"),
            format!("Read an article about {}", pick(filler, &SYSTEM_DESIGN_TOPICS)),
            format!("Solve 2-3 {} problems", pick(filler, &DSA_TOPICS)),
        ],
        reasoning: format!(
            "Based on your {} level and {} minutes available",
            context.current_level, context.time_available
        ),
        estimated_time: context.time_available.min(DEEP_DIVE_MINUTES),
        difficulty: context.current_level.difficulty(),
        resources: vec![
            "System Design Primer (GitHub)".to_string(),
            "LeetCode Problem Set".to_string(),
            "High Scalability Blog".to_string(),
        ],
        next_steps: "Practice implementing the concepts and document key learnings".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticProvider;
    use serde_json::json;

    fn context(minutes: u32, level: LearningLevel) -> LearningContext {
        LearningContext {
            time_available: minutes,
            current_level: level,
            ..LearningContext::default()
        }
    }

    #[test]
    fn long_sessions_get_a_deep_dive() {
        let s = fallback_suggestions(&context(90, LearningLevel::Advanced), &mut Filler::seeded(1));
        assert!(s.main_suggestion.starts_with("Deep dive into "));
        assert_eq!(s.estimated_time, 45);
        assert_eq!(s.difficulty, 4);
        assert_eq!(s.alternative_suggestions.len(), 3);
    }

    #[test]
    fn short_sessions_get_quick_practice() {
        let s = fallback_suggestions(&context(20, LearningLevel::Beginner), &mut Filler::seeded(2));
        assert!(s.main_suggestion.starts_with("Quick practice: "));
        assert_eq!(s.estimated_time, 20);
        assert_eq!(s.difficulty, 2);
    }

    #[test]
    fn recent_topics_feed_the_review_suggestion() {
        let ctx = LearningContext {
            recent_topics: vec!["Tries".to_string()],
            ..LearningContext::default()
        };
        let s = fallback_suggestions(&ctx, &mut Filler::seeded(3));
        assert_eq!(s.alternative_suggestions[0], "Review Tries");
    }

    #[test]
    fn request_body_uses_camel_case_and_defaults() {
        let request: SuggestionRequest = serde_json::from_value(json!({
            "context": {"currentLevel": "advanced", "preferredLearningStyle": "hands-on"},
            "specificRequest": "graphs"
        }))
        .unwrap();
        assert_eq!(request.context.current_level, LearningLevel::Advanced);
        assert_eq!(request.context.preferred_learning_style, LearningStyle::HandsOn);
        assert_eq!(request.context.time_available, 30);
        assert!(context_prompt(&request).contains("SPECIFIC REQUEST: graphs"));
    }

    #[test]
    fn unknown_level_and_style_take_defaults() {
        let request: SuggestionRequest = serde_json::from_value(json!({
            "context": {"currentLevel": "expert", "preferredLearningStyle": "osmosis"},
            "specificRequest": "tries"
        }))
        .unwrap();
        assert_eq!(request.context.current_level, LearningLevel::Intermediate);
        assert_eq!(request.context.preferred_learning_style, LearningStyle::Mixed);
        assert_eq!(request.specific_request.as_deref(), Some("tries"));
    }

    #[tokio::test]
    async fn valid_model_json_is_live() {
        let llm = StaticProvider::new(
            json!({
                "mainSuggestion": "Design a URL shortener",
                "alternativeSuggestions": ["LRU cache", "Rate limiter"],
                "reasoning": "You have time for a design problem",
                "estimatedTime": 60,
                "difficulty": 4,
                "resources": ["System Design Primer"],
                "nextSteps": "Write up trade-offs"
            })
            .to_string(),
        );

        let sourced = suggest(Some(&llm), SuggestionRequest::default(), Filler::seeded(4)).await;
        assert!(sourced.is_live());
        assert_eq!(sourced.data.main_suggestion, "Design a URL shortener");
    }

    #[tokio::test]
    async fn non_json_model_output_falls_back() {
        let llm = StaticProvider::new("You should study graphs today!");
        let sourced = suggest(Some(&llm), SuggestionRequest::default(), Filler::seeded(5)).await;
        assert!(!sourced.is_live());
        assert!(sourced.data.main_suggestion.starts_with("Quick practice: "));
    }

    #[tokio::test]
    async fn out_of_range_difficulty_falls_back() {
        let llm = StaticProvider::new(
            json!({
                "mainSuggestion": "x",
                "alternativeSuggestions": [],
                "reasoning": "",
                "estimatedTime": 10,
                "difficulty": 9,
                "resources": [],
                "nextSteps": ""
            })
            .to_string(),
        );
        let sourced = suggest(Some(&llm), SuggestionRequest::default(), Filler::seeded(6)).await;
        assert!(!sourced.is_live());
    }
}
