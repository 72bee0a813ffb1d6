//! Generated study statistics. There is no upstream for these numbers, so
//! they are synthesized within fixed bounds and labelled as such.

use chrono::{Datelike, NaiveDate};
use portfolio_core::{Filler, LearningStats, WeeklyProgress};

pub const GENERATED_MESSAGE: &str = "Learning stats are generated; no tracking source is connected";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const ARTICLES_PER_DAY: u32 = 2;
const DSA_PER_DAY: u32 = 3;
const SYSTEM_DESIGN_PER_DAY: u32 = 1;
const HOURS_PER_DAY: u32 = 3;

pub fn generate_learning_stats(filler: &mut Filler, today: NaiveDate) -> LearningStats {
    // Monday is 0; days after today stay empty.
    let elapsed = today.weekday().num_days_from_monday();

    let articles_read_today = filler.range(1, 4);
    let dsa_problems_today = filler.range(2, 7);
    let system_design_topics_today = filler.range(1, 3);

    let articles_read_this_week =
        articles_read_today + elapsed * ARTICLES_PER_DAY + filler.range(0, 5);
    let dsa_problems_this_week = dsa_problems_today + elapsed * DSA_PER_DAY + filler.range(0, 10);
    let system_design_topics_this_week =
        system_design_topics_today + elapsed * SYSTEM_DESIGN_PER_DAY + filler.range(0, 3);

    let study_streak_days = filler.range(10, 30);
    let total_study_hours = study_streak_days * HOURS_PER_DAY + filler.range(0, 50);

    let weekly_progress = WEEKDAYS
        .iter()
        .zip(0u32..)
        .map(|(day, index)| {
            if index <= elapsed {
                WeeklyProgress {
                    day: day.to_string(),
                    articles: filler.range(1, 5),
                    dsa_problems: filler.range(2, 8),
                    system_design: filler.range(1, 3),
                    study_hours: filler.range(2, 4),
                }
            } else {
                WeeklyProgress {
                    day: day.to_string(),
                    ..WeeklyProgress::default()
                }
            }
        })
        .collect();

    LearningStats {
        articles_read_today,
        articles_read_this_week,
        dsa_problems_today,
        dsa_problems_this_week,
        system_design_topics_today,
        system_design_topics_this_week,
        study_streak_days,
        total_study_hours,
        weekly_progress,
    }
}
