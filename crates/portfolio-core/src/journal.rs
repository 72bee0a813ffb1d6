//! Learning journal kept in memory for the life of the process.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Motivated,
    Tired,
    Accomplished,
    Challenged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub todays_focus: String,
    pub key_learnings: Vec<String>,
    pub tomorrows_plan: String,
    pub mood: Mood,
    pub difficulty_level: u8,
    pub notes: String,
    pub timestamp: String,
}

/// Accepts a single learning or a list of them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeyLearnings {
    One(String),
    Many(Vec<String>),
}

impl Default for KeyLearnings {
    fn default() -> Self {
        KeyLearnings::Many(Vec::new())
    }
}

impl From<KeyLearnings> for Vec<String> {
    fn from(value: KeyLearnings) -> Self {
        match value {
            KeyLearnings::One(one) => vec![one],
            KeyLearnings::Many(many) => many,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    #[serde(default)]
    pub todays_focus: String,
    #[serde(default)]
    pub key_learnings: KeyLearnings,
    #[serde(default)]
    pub tomorrows_plan: String,
    pub mood: Mood,
    pub difficulty_level: u8,
    #[serde(default)]
    pub notes: String,
}

impl NewJournalEntry {
    pub fn validate(&self) -> Result<()> {
        if self.todays_focus.trim().is_empty() {
            return Err(PortfolioError::Validation(
                "todaysFocus must not be empty".to_string(),
            ));
        }
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(PortfolioError::Validation(format!(
                "difficultyLevel must be between 1 and 5, got {}",
                self.difficulty_level
            )));
        }
        Ok(())
    }
}

pub trait JournalStore: Send + Sync {
    /// Validates and stores an entry, newest first.
    fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry>;

    /// Most recent entry dated today (UTC).
    fn today(&self) -> Result<Option<JournalEntry>>;

    fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>>;
}

#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    entries: RwLock<Vec<JournalEntry>>,
    last_id: AtomicI64,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one sample entry dated today.
    pub fn with_sample() -> Self {
        let store = Self::new();
        let now = Utc::now();
        store.entries.write().push(JournalEntry {
            id: "1".to_string(),
            date: now.date_naive(),
            todays_focus: "System Design: Load Balancing & Database Sharding".to_string(),
            key_learnings: vec![
                "Horizontal vs vertical scaling trade-offs".to_string(),
                "Consistent hashing for load distribution".to_string(),
                "Range vs hash partitioning".to_string(),
            ],
            tomorrows_plan: "Microservice boundaries and API gateway patterns".to_string(),
            mood: Mood::Accomplished,
            difficulty_level: 4,
            notes: "Consistent hashing finally clicked after sketching the ring.".to_string(),
            timestamp: now.to_rfc3339(),
        });
        store
    }

    /// Millisecond timestamp, bumped to stay unique within the process.
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last_id.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last_id.compare_exchange(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}

impl JournalStore for InMemoryJournalStore {
    fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        entry.validate()?;

        let now = Utc::now();
        let saved = JournalEntry {
            id: self.next_id(),
            date: now.date_naive(),
            todays_focus: entry.todays_focus,
            key_learnings: entry.key_learnings.into(),
            tomorrows_plan: entry.tomorrows_plan,
            mood: entry.mood,
            difficulty_level: entry.difficulty_level,
            notes: entry.notes,
            timestamp: now.to_rfc3339(),
        };

        self.entries.write().insert(0, saved.clone());
        Ok(saved)
    }

    fn today(&self) -> Result<Option<JournalEntry>> {
        let today = Utc::now().date_naive();
        Ok(self
            .entries
            .read()
            .iter()
            .find(|entry| entry.date == today)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>> {
        Ok(self.entries.read().iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_entry(focus: &str) -> NewJournalEntry {
        serde_json::from_value(json!({
            "todaysFocus": focus,
            "keyLearnings": "Tries beat hash maps for prefix search",
            "tomorrowsPlan": "Segment trees",
            "mood": "motivated",
            "difficultyLevel": 3
        }))
        .unwrap()
    }

    #[test]
    fn single_learning_is_wrapped_in_a_list() {
        let store = InMemoryJournalStore::new();
        let saved = store.save(new_entry("Tries")).unwrap();
        assert_eq!(
            saved.key_learnings,
            vec!["Tries beat hash maps for prefix search".to_string()]
        );
        assert_eq!(saved.mood, Mood::Motivated);
        assert_eq!(saved.notes, "");
    }

    #[test]
    fn newest_entry_comes_first_with_unique_ids() {
        let store = InMemoryJournalStore::with_sample();
        let a = store.save(new_entry("first")).unwrap();
        let b = store.save(new_entry("second")).unwrap();
        assert_ne!(a.id, b.id);

        let recent = store.recent(5).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].todays_focus, "second");
        assert_eq!(store.today().unwrap().unwrap().todays_focus, "second");
        assert_eq!(store.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn out_of_range_difficulty_is_rejected() {
        let store = InMemoryJournalStore::new();
        let mut entry = new_entry("graphs");
        entry.difficulty_level = 6;
        assert!(matches!(
            store.save(entry),
            Err(PortfolioError::Validation(_))
        ));
        assert!(store.recent(5).unwrap().is_empty());
    }

    #[test]
    fn blank_focus_is_rejected() {
        let store = InMemoryJournalStore::new();
        assert!(store.save(new_entry("   ")).is_err());
    }

    #[test]
    fn unknown_mood_fails_to_deserialize() {
        let parsed = serde_json::from_value::<NewJournalEntry>(json!({
            "todaysFocus": "x",
            "mood": "sleepy",
            "difficultyLevel": 2
        }));
        assert!(parsed.is_err());
    }
}
