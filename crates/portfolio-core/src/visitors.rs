//! Process-lifetime visit counter.
//!
//! No durability: counts reset with the process. Deduplication is only as
//! good as the coarse fingerprint handed in.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorCounts {
    pub total_visitors: u64,
    pub unique_visitors: u64,
}

pub trait VisitorStore: Send + Sync {
    /// Records one visit. `total_visitors` grows by exactly one; `unique_visitors`
    /// grows only for a fingerprint not seen before.
    fn record(&self, fingerprint: &str) -> Result<VisitorCounts>;

    fn counts(&self) -> Result<VisitorCounts>;
}

#[derive(Debug, Default)]
struct VisitorTally {
    total: u64,
    seen: HashSet<String>,
}

impl VisitorTally {
    fn counts(&self) -> VisitorCounts {
        VisitorCounts {
            total_visitors: self.total,
            unique_visitors: self.seen.len() as u64,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryVisitorStore {
    tally: Mutex<VisitorTally>,
}

impl InMemoryVisitorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitorStore for InMemoryVisitorStore {
    fn record(&self, fingerprint: &str) -> Result<VisitorCounts> {
        let mut tally = self.tally.lock();
        tally.total += 1;
        if !tally.seen.contains(fingerprint) {
            tally.seen.insert(fingerprint.to_string());
        }
        Ok(tally.counts())
    }

    fn counts(&self) -> Result<VisitorCounts> {
        Ok(self.tally.lock().counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_fingerprint_only_grows_total() {
        let store = InMemoryVisitorStore::new();
        assert_eq!(store.counts().unwrap(), VisitorCounts::default());

        let first = store.record("abc").unwrap();
        assert_eq!(first.total_visitors, 1);
        assert_eq!(first.unique_visitors, 1);

        let again = store.record("abc").unwrap();
        assert_eq!(again.total_visitors, 2);
        assert_eq!(again.unique_visitors, 1);

        let other = store.record("xyz").unwrap();
        assert_eq!(other.total_visitors, 3);
        assert_eq!(other.unique_visitors, 2);
    }

    #[test]
    fn concurrent_records_are_all_counted() {
        let store = std::sync::Arc::new(InMemoryVisitorStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.record(&format!("visitor{}", i % 4)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let counts = store.counts().unwrap();
        assert_eq!(counts.total_visitors, 800);
        assert_eq!(counts.unique_visitors, 4);
    }
}
