use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use portfolio_ai::{LLMProvider, LLMProviderFactory};
use portfolio_core::{
    GitHubStats, InMemoryJournalStore, InMemoryVisitorStore, JournalStore, LeetCodeStats,
    MediumPost, NowPlaying, PortfolioConfig, TtlCache, VisitorStore,
};
use portfolio_sources::build_client;

/// Short-lived caches for live upstream answers, one per read endpoint.
pub struct ResponseCaches {
    pub github: TtlCache<&'static str, GitHubStats>,
    pub leetcode: TtlCache<&'static str, LeetCodeStats>,
    pub medium: TtlCache<&'static str, Vec<MediumPost>>,
    pub spotify: TtlCache<&'static str, NowPlaying>,
}

impl ResponseCaches {
    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self {
            github: TtlCache::new(Duration::from_secs(config.github.cache_ttl_secs)),
            leetcode: TtlCache::new(Duration::from_secs(config.leetcode.cache_ttl_secs)),
            medium: TtlCache::new(Duration::from_secs(config.medium.cache_ttl_secs)),
            spotify: TtlCache::new(Duration::from_secs(config.spotify.cache_ttl_secs)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortfolioConfig>,
    pub http: reqwest::Client,
    pub llm: Option<Arc<dyn LLMProvider>>,
    pub visitors: Arc<dyn VisitorStore>,
    pub journal: Arc<dyn JournalStore>,
    pub caches: Arc<ResponseCaches>,
    pub started_at: Instant,
}

impl AppState {
    /// Production state: in-memory stores, journal seeded with a sample entry.
    pub fn new(config: Arc<PortfolioConfig>) -> Result<Self> {
        Self::with_stores(
            config,
            Arc::new(InMemoryVisitorStore::new()),
            Arc::new(InMemoryJournalStore::with_sample()),
        )
    }

    pub fn with_stores(
        config: Arc<PortfolioConfig>,
        visitors: Arc<dyn VisitorStore>,
        journal: Arc<dyn JournalStore>,
    ) -> Result<Self> {
        let http = build_client(&config.http)?;
        let llm = LLMProviderFactory::create_from_config(&config.ai, http.clone());
        let caches = Arc::new(ResponseCaches::from_config(&config));

        Ok(Self {
            config,
            http,
            llm,
            visitors,
            journal,
            caches,
            started_at: Instant::now(),
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
