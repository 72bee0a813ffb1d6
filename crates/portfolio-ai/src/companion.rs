//! Short supportive messages from the study companion.
//!
//! Unlike the other advisors the model answers in free text; any non-empty
//! completion is used as-is.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use portfolio_core::{fetch_with_fallback, Filler, LastResort, Sourced, UpstreamError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::advisor::{ask_model, SERVICE};
use crate::llm_provider::{GenerationConfig, LLMProvider, Message};

pub const FALLBACK_MESSAGE: &str = "Using fallback response - AI service not available";

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: usize = 150;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    #[default]
    Greeting,
    CheckIn,
    Celebration,
    Suggestion,
    Motivation,
    Custom,
}

impl MessageType {
    /// Unknown names are treated as [`MessageType::Custom`].
    pub fn parse(name: &str) -> Self {
        match name {
            "greeting" => Self::Greeting,
            "checkIn" => Self::CheckIn,
            "celebration" => Self::Celebration,
            "suggestion" => Self::Suggestion,
            "motivation" => Self::Motivation,
            _ => Self::Custom,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::CheckIn => "checkIn",
            Self::Celebration => "celebration",
            Self::Suggestion => "suggestion",
            Self::Motivation => "motivation",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Evening,
    Night,
    #[default]
    #[serde(other)]
    Afternoon,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..12 => Self::Morning,
            12..17 => Self::Afternoon,
            17..21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanionContext {
    pub time_of_day: TimeOfDay,
    pub current_hour: u32,
    pub completed_goals_today: u32,
    pub total_goals_today: u32,
    pub study_streak: u32,
    pub last_activity: String,
    pub current_focus: String,
    pub mood: String,
    pub recent_achievements: Vec<String>,
    pub struggling_with: Option<String>,
}

impl Default for CompanionContext {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl CompanionContext {
    /// Context used when the caller sends none.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            time_of_day: TimeOfDay::from_hour(now.hour()),
            current_hour: now.hour(),
            completed_goals_today: 0,
            total_goals_today: 3,
            study_streak: 1,
            last_activity: "coding".to_string(),
            current_focus: "learning".to_string(),
            mood: "motivated".to_string(),
            recent_achievements: Vec::new(),
            struggling_with: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanionRequest {
    /// Kept as a string so unknown kinds degrade to `custom` instead of
    /// rejecting the body.
    pub message_type: Option<String>,
    pub context: CompanionContext,
    pub user_input: Option<String>,
    pub request_specific_advice: Option<String>,
}

impl CompanionRequest {
    /// Reads a request body leniently. When the body does not fit the schema
    /// the text fields are still honored and the context falls back to its
    /// default, so `messageType` is never lost to an unrelated bad field.
    pub fn from_json(value: Value) -> Self {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                debug!("companion request partly unreadable, using default context: {e}");
                let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
                Self {
                    message_type: text("messageType"),
                    context: CompanionContext::default(),
                    user_input: text("userInput"),
                    request_specific_advice: text("requestSpecificAdvice"),
                }
            }
        }
    }

    pub fn kind(&self) -> MessageType {
        self.message_type
            .as_deref()
            .map_or(MessageType::Greeting, MessageType::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionMessage {
    pub message: String,
    pub emoji: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub timestamp: String,
    pub is_ai_generated: bool,
}

impl LastResort for CompanionMessage {
    fn last_resort() -> Self {
        Self {
            message: "I'm here for you. Let's keep going together!".to_string(),
            emoji: "💕".to_string(),
            kind: MessageType::Custom,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            is_ai_generated: false,
        }
    }
}

pub fn emoji_for(kind: MessageType, context: &CompanionContext) -> &'static str {
    match kind {
        MessageType::Greeting => match context.time_of_day {
            TimeOfDay::Morning => "☀️",
            TimeOfDay::Evening => "🌅",
            TimeOfDay::Afternoon | TimeOfDay::Night => "💕",
        },
        MessageType::CheckIn => "⏰",
        MessageType::Celebration => "🎉",
        MessageType::Suggestion => "💡",
        MessageType::Motivation => "💪",
        MessageType::Custom => "😘",
    }
}

/// The fixed message set for `kind`, interpolated with `context`.
pub fn fallback_messages(kind: MessageType, context: &CompanionContext) -> Vec<String> {
    let c = context;
    match kind {
        MessageType::Greeting => vec![
            format!("Good {}! Ready to tackle some learning today?", c.time_of_day.as_str()),
            format!(
                "Good {}! {} goals on the list today, let's get the first one done.",
                c.time_of_day.as_str(),
                c.total_goals_today
            ),
        ],
        MessageType::CheckIn => vec![
            "Check-in time! How's your progress going? Don't forget to take a break.".to_string(),
            format!(
                "Quick check-in: {} of {} goals done so far. Stretch, drink some water, then back to it!",
                c.completed_goals_today, c.total_goals_today
            ),
        ],
        MessageType::Celebration => vec![
            format!(
                "Amazing work! You completed {} goals today. I'm so proud of you!",
                c.completed_goals_today
            ),
            format!(
                "{} of {} goals done today. That deserves a celebration!",
                c.completed_goals_today, c.total_goals_today
            ),
            format!(
                "Look at you go! A {}-day streak and {} goals finished today.",
                c.study_streak, c.completed_goals_today
            ),
        ],
        MessageType::Suggestion => vec![
            format!("Time to focus on {}. You've got this!", c.current_focus),
            format!(
                "How about 25 focused minutes on {}? Small steps add up.",
                c.current_focus
            ),
        ],
        MessageType::Motivation => vec![
            format!(
                "You're doing great with your {}-day streak! Keep pushing forward!",
                c.study_streak
            ),
            format!(
                "{} days in a row is real commitment. One more session today keeps it alive!",
                c.study_streak
            ),
        ],
        MessageType::Custom => vec![
            "I'm here to support you in whatever you need!".to_string(),
            "Whatever you're working on, I'm cheering for you!".to_string(),
        ],
    }
}

pub async fn chat(
    llm: Option<&dyn LLMProvider>,
    companion_name: &str,
    request: CompanionRequest,
    mut filler: Filler,
    now: DateTime<Utc>,
) -> Sourced<CompanionMessage> {
    let kind = request.kind();
    let messages = vec![
        Message::system(system_prompt(companion_name)),
        Message::user(context_prompt(kind, &request)),
    ];
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let emoji = emoji_for(kind, &request.context).to_string();
    let context = request.context;

    let live_timestamp = timestamp.clone();
    let live_emoji = emoji.clone();

    fetch_with_fallback(
        SERVICE,
        || async move {
            ask_model(llm, &messages, &GenerationConfig::new(TEMPERATURE, MAX_TOKENS)).await
        },
        move |text| {
            let message = text.trim();
            if message.is_empty() {
                return Err(UpstreamError::Malformed("empty completion".to_string()));
            }
            Ok(CompanionMessage {
                message: message.to_string(),
                emoji: live_emoji,
                kind,
                timestamp: live_timestamp,
                is_ai_generated: true,
            })
        },
        move || {
            let choices = fallback_messages(kind, &context);
            CompanionMessage {
                message: filler
                    .pick(&choices)
                    .cloned()
                    .unwrap_or_else(|| CompanionMessage::last_resort().message),
                emoji,
                kind,
                timestamp,
                is_ai_generated: false,
            }
        },
    )
    .await
}

fn system_prompt(name: &str) -> String {
    format!(
        "You are {name}, a warm and encouraging study companion helping a developer \
learn system design and data structures & algorithms.

Be caring and genuine rather than overly cheerful, and knowledgeable about tech topics.
Celebrate achievements, remind about breaks and health, and break things down when the
learner is struggling. Adapt your tone to the time of day and their progress.

Keep replies to 2-3 sentences, always include one actionable suggestion, and use emojis
sparingly."
    )
}

fn context_prompt(kind: MessageType, request: &CompanionRequest) -> String {
    let c = &request.context;
    let mut prompt = format!(
        "CURRENT CONTEXT:
- Time: {}:00 ({})
- Goals completed today: {}/{}
- Study streak: {} days
- Current focus: {}
- Last activity: {}
- Mood: {}
- Recent achievements: {}
",
        c.current_hour,
        c.time_of_day.as_str(),
        c.completed_goals_today,
        c.total_goals_today,
        c.study_streak,
        c.current_focus,
        c.last_activity,
        c.mood,
        c.recent_achievements.join(", "),
    );
    if let Some(struggle) = &c.struggling_with {
        prompt.push_str(&format!("- Struggling with: {struggle}\n"));
    }
    prompt.push_str(&format!("\nMESSAGE TYPE: {}\n", kind.as_str()));
    if let Some(input) = &request.user_input {
        prompt.push_str(&format!("USER INPUT: {input}\n"));
    }
    if let Some(advice) = &request.request_specific_advice {
        prompt.push_str(&format!("SPECIFIC ADVICE REQUESTED: {advice}\n"));
    }
    prompt
}
