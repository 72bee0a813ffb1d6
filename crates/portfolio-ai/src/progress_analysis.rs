//! Feedback on recent study progress.

use portfolio_core::{LastResort, Sourced};
use serde::{Deserialize, Serialize};

use crate::advisor::{advise_json, ModelSchema};
use crate::llm_provider::{GenerationConfig, LLMProvider, Message};

pub const FALLBACK_MESSAGE: &str = "Using fallback analysis - AI service not available";

const TEMPERATURE: f32 = 0.6;
const MAX_TOKENS: usize = 500;
const RECENT_DAYS: usize = 7;
const STREAK_MILESTONE: u32 = 30;

const SYSTEM_PROMPT: &str = "\
You are a learning analyst giving supportive, data-driven feedback on study progress.
Look for trends in consistency and growth, highlight strengths, gently point out areas
that need attention and give specific next steps.

Answer with a single JSON object and nothing else:
{
  \"overallProgress\": string,
  \"keyInsights\": [string],
  \"recommendations\": [string],
  \"motivationalMessage\": string,
  \"nextMilestone\": string,
  \"consistencyScore\": integer 1-10,
  \"improvementAreas\": [string],
  \"celebrateWins\": [string]
}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyStat {
    pub date: String,
    pub system_design_topics: u32,
    pub dsa_problems: u32,
    pub articles_read: u32,
    pub study_hours: f64,
    pub mood: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressData {
    pub daily_stats: Vec<DailyStat>,
    pub current_streak: u32,
    pub total_study_hours: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub goals: Vec<String>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            daily_stats: Vec::new(),
            current_streak: 1,
            total_study_hours: 0.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            goals: Vec::new(),
        }
    }
}

impl ProgressData {
    fn recent_days(&self) -> &[DailyStat] {
        let start = self.daily_stats.len().saturating_sub(RECENT_DAYS);
        &self.daily_stats[start..]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    pub progress_data: ProgressData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAnalysis {
    pub overall_progress: String,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub motivational_message: String,
    pub next_milestone: String,
    pub consistency_score: u8,
    pub improvement_areas: Vec<String>,
    pub celebrate_wins: Vec<String>,
}

impl ModelSchema for ProgressAnalysis {
    fn check(&self) -> Result<(), String> {
        if !(1..=10).contains(&self.consistency_score) {
            return Err(format!(
                "consistencyScore {} outside 1-10",
                self.consistency_score
            ));
        }
        if self.overall_progress.trim().is_empty() {
            return Err("overallProgress is empty".to_string());
        }
        Ok(())
    }
}

impl LastResort for ProgressAnalysis {
    fn last_resort() -> Self {
        Self {
            overall_progress: "Keep going, every study session counts.".to_string(),
            consistency_score: 1,
            ..Self::default()
        }
    }
}

pub async fn analyze(
    llm: Option<&dyn LLMProvider>,
    request: AnalysisRequest,
) -> Sourced<ProgressAnalysis> {
    let data = request.progress_data;
    let messages = vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(context_prompt(&data)),
    ];

    advise_json(
        llm,
        messages,
        GenerationConfig::new(TEMPERATURE, MAX_TOKENS),
        move || fallback_analysis(&data),
    )
    .await
}

fn context_prompt(data: &ProgressData) -> String {
    let days = data
        .recent_days()
        .iter()
        .map(|d| {
            format!(
                "{}: {} SD topics, {} DSA problems, {} articles, {}h study, mood: {}",
                d.date,
                d.system_design_topics,
                d.dsa_problems,
                d.articles_read,
                d.study_hours,
                d.mood
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "LEARNING PROGRESS DATA:
Recent daily stats (last {RECENT_DAYS} days):
{days}

Overall:
- Current streak: {} days
- Total study hours: {}
- Strengths: {}
- Weaknesses: {}
- Goals: {}
",
        data.current_streak,
        data.total_study_hours,
        data.strengths.join(", "),
        data.weaknesses.join(", "),
        data.goals.join(", "),
    )
}

/// `round(streak / 3)` clamped to 1..=10.
pub fn consistency_score(streak: u32) -> u8 {
    (f64::from(streak) / 3.0).round().clamp(1.0, 10.0) as u8
}

pub fn fallback_analysis(data: &ProgressData) -> ProgressAnalysis {
    let recent = data.recent_days();
    let avg_daily_study = if recent.is_empty() {
        0.0
    } else {
        recent.iter().map(|d| d.study_hours).sum::<f64>() / recent.len() as f64
    };
    let problems: u32 = recent.iter().map(|d| d.dsa_problems).sum();
    let streak = data.current_streak;

    ProgressAnalysis {
        overall_progress: format!(
            "You're maintaining a {streak}-day streak with an average of {avg_daily_study:.1} hours of daily study. Great consistency!"
        ),
        key_insights: vec![
            format!("Your study streak of {streak} days shows excellent commitment"),
            format!("You've solved {problems} DSA problems this week - solid progress!"),
            "Your consistency in daily learning is building strong foundations".to_string(),
            if data.total_study_hours > 50.0 {
                "You've accumulated significant study hours - expertise is building!".to_string()
            } else {
                "Keep building those study hours - you're on the right track!".to_string()
            },
        ],
        recommendations: vec![
            "Continue your daily learning routine to maintain momentum".to_string(),
            "Focus on your identified weak areas during peak energy hours".to_string(),
            "Document key learnings to reinforce understanding".to_string(),
            "Set weekly mini-goals to maintain motivation".to_string(),
        ],
        motivational_message: format!(
            "I'm so proud of your {streak}-day streak! Showing up every day is what builds real skill. Keep pushing forward! 💕"
        ),
        next_milestone: if streak < STREAK_MILESTONE {
            format!("Reach a {STREAK_MILESTONE}-day learning streak")
        } else {
            "Master advanced system design patterns".to_string()
        },
        consistency_score: consistency_score(streak),
        improvement_areas: if data.weaknesses.is_empty() {
            vec!["Time management".to_string(), "Consistent practice".to_string()]
        } else {
            data.weaknesses.clone()
        },
        celebrate_wins: vec![
            format!("{streak}-day learning streak"),
            format!("{} total study hours", data.total_study_hours),
            "Consistent daily progress".to_string(),
        ],
    }
}
