use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use config as cfg;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Outbound HTTP client settings shared by every upstream adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Hard bound on any single upstream call.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            user_agent: "portfolio-api/1.0".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<SecretString>,
    pub api_base: String,
    /// Only this many most recently updated repositories are inspected for commits.
    pub max_repos: usize,
    pub cache_ttl_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            api_base: "https://api.github.com".into(),
            max_repos: 10,
            cache_ttl_secs: 300,
        }
    }
}

impl GitHubConfig {
    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeetCodeConfig {
    pub username: Option<String>,
    pub api_base: String,
    pub cache_ttl_secs: u64,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            username: None,
            api_base: "https://leetcode-stats-api.herokuapp.com".into(),
            cache_ttl_secs: 3600,
        }
    }
}

impl LeetCodeConfig {
    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediumConfig {
    pub username: Option<String>,
    /// RSS-to-JSON bridge the feed is read through.
    pub feed_api: String,
    pub feed_base: String,
    pub max_posts: usize,
    pub cache_ttl_secs: u64,
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            username: None,
            feed_api: "https://api.rss2json.com/v1/api.json".into(),
            feed_base: "https://medium.com/feed/".into(),
            max_posts: 6,
            cache_ttl_secs: 3600,
        }
    }
}

impl MediumConfig {
    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    #[serde(skip_serializing)]
    pub client_id: Option<SecretString>,
    #[serde(skip_serializing)]
    pub client_secret: Option<SecretString>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<SecretString>,
    pub accounts_base: String,
    pub api_base: String,
    pub cache_ttl_secs: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            accounts_base: "https://accounts.spotify.com".into(),
            api_base: "https://api.spotify.com/v1".into(),
            cache_ttl_secs: 15,
        }
    }
}

impl SpotifyConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.refresh_token.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    /// Display name of the learning companion persona.
    pub companion_name: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            companion_name: "Lipu".into(),
        }
    }
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub env: String,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub github: GitHubConfig,
    pub leetcode: LeetCodeConfig,
    pub medium: MediumConfig,
    pub spotify: SpotifyConfig,
    pub ai: AiConfig,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            github: GitHubConfig::default(),
            leetcode: LeetCodeConfig::default(),
            medium: MediumConfig::default(),
            spotify: SpotifyConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl PortfolioConfig {
    fn default_env() -> String {
        env::var("APP_ENV")
            .ok()
            .or_else(|| env::var("RUST_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            (1..=30).contains(&self.http.timeout_secs),
            "http.timeout_secs must be 1..=30"
        );
        for (key, value) in [
            ("github.api_base", &self.github.api_base),
            ("leetcode.api_base", &self.leetcode.api_base),
            ("medium.feed_api", &self.medium.feed_api),
            ("medium.feed_base", &self.medium.feed_base),
            ("spotify.accounts_base", &self.spotify.accounts_base),
            ("spotify.api_base", &self.spotify.api_base),
            ("ai.base_url", &self.ai.base_url),
        ] {
            anyhow::ensure!(!value.trim().is_empty(), "{key} cannot be empty");
        }
        anyhow::ensure!(self.github.max_repos > 0, "github.max_repos must be > 0");
        anyhow::ensure!(self.medium.max_posts > 0, "medium.max_posts must be > 0");
        Ok(())
    }

    /// Applies the well-known flat variables (`GITHUB_TOKEN`, `OPENAI_API_KEY`, ...)
    /// on top of the layered configuration. Empty values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| get(key).map(SecretString::from);

        if let Some(username) = get("GITHUB_USERNAME") {
            self.github.username = Some(username);
        }
        if let Some(token) = secret("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(username) = get("LEETCODE_USERNAME") {
            self.leetcode.username = Some(username);
        }
        if let Some(username) = get("MEDIUM_USERNAME") {
            self.medium.username = Some(username);
        }
        if let Some(id) = secret("SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = Some(id);
        }
        if let Some(client_secret) = secret("SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = Some(client_secret);
        }
        if let Some(token) = secret("SPOTIFY_REFRESH_TOKEN") {
            self.spotify.refresh_token = Some(token);
        }
        if let Some(key) = secret("OPENAI_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.ai.model = model;
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!("Ignoring invalid PORT value {port:?}: {e}"),
            }
        }

        self
    }
}

pub struct ConfigManager {
    config: Arc<PortfolioConfig>,
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("env", &self.config.env)
            .finish()
    }
}

impl ConfigManager {
    /// Load configuration with the following precedence (last wins):
    /// 1. Defaults
    /// 2. `default.toml`, `{env}.toml`, `local.toml` in the config dir
    /// 3. `PORTFOLIO__SECTION__KEY` environment variables
    /// 4. Well-known flat variables (`GITHUB_TOKEN`, `OPENAI_API_KEY`, ...), `.env` included
    pub fn load() -> Result<Self> {
        Self::load_dotenv();
        let config_dir = Self::default_config_dir();
        let config = Self::load_from_sources(&config_dir, &PortfolioConfig::default_env())?
            .apply_overrides(|key| env::var(key).ok());
        let manager = Self::from_config(config)?;
        manager.log_summary(&config_dir);
        Ok(manager)
    }

    /// Wraps an already assembled configuration after validating it.
    pub fn from_config(config: PortfolioConfig) -> Result<Self> {
        config.validate().context("validating configuration")?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> Arc<PortfolioConfig> {
        self.config.clone()
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            match dotenv::from_filename(".env") {
                Ok(_) => info!("Loaded .env file from current directory"),
                Err(e) => warn!("Failed to load .env file: {}", e),
            }
        }
    }

    /// `$PORTFOLIO_CONFIG_DIR`, then `./config`, then the current directory.
    pub fn default_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("PORTFOLIO_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            return project_config;
        }
        cwd
    }

    pub fn load_from_sources(config_dir: &Path, env_name: &str) -> Result<PortfolioConfig> {
        let config = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(cfg::Environment::with_prefix("PORTFOLIO").separator("__"))
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        Ok(config)
    }

    fn log_summary(&self, config_dir: &Path) {
        let config = &self.config;
        info!("Configuration loaded ({} environment)", config.env);
        info!("  config dir: {}", config_dir.display());
        info!("  listen: {}:{}", config.server.host, config.server.port);
        info!("  upstream timeout: {}s", config.http.timeout_secs);
        for (name, configured) in [
            ("github", config.github.is_configured()),
            ("leetcode", config.leetcode.is_configured()),
            ("medium", config.medium.is_configured()),
            ("spotify", config.spotify.is_configured()),
            ("openai", config.ai.is_configured()),
        ] {
            info!(
                "  {name}: {}",
                if configured { "live" } else { "fallback only" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid_and_unconfigured() {
        let config = PortfolioConfig::default();
        config.validate().unwrap();
        assert!(!config.github.is_configured());
        assert!(!config.spotify.is_configured());
        assert!(!config.ai.is_configured());
        assert_eq!(config.http.timeout_secs, 8);
        assert_eq!(config.github.max_repos, 10);
    }

    #[test]
    fn flat_overrides_fill_credentials() {
        let vars: HashMap<&str, &str> = [
            ("GITHUB_USERNAME", "octo"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SPOTIFY_REFRESH_TOKEN", "refresh"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MEDIUM_USERNAME", ""),
            ("PORT", "8081"),
        ]
        .into_iter()
        .collect();

        let config = PortfolioConfig::default()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.github.username.as_deref(), Some("octo"));
        assert_eq!(
            config.github.token.as_ref().map(|t| t.expose_secret()),
            Some("ghp_secret")
        );
        assert!(config.spotify.is_configured());
        assert!(config.ai.is_configured());
        assert!(!config.medium.is_configured());
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let config = PortfolioConfig::default()
            .apply_overrides(|key| (key == "PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn toml_layers_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 4000\n\n[github]\nusername = \"octo\"\nmax_repos = 5\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[server]\nport = 4001\n\n[http]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = ConfigManager::load_from_sources(dir.path(), "test").unwrap();
        assert_eq!(config.server.port, 4001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.github.username.as_deref(), Some("octo"));
        assert_eq!(config.github.max_repos, 5);
        assert_eq!(config.leetcode.cache_ttl_secs, 3600);
    }

    #[test]
    fn unbounded_timeout_is_rejected() {
        let mut config = PortfolioConfig::default();
        config.http.timeout_secs = 0;
        assert!(ConfigManager::from_config(config).is_err());
    }
}
