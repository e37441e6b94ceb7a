use serde::Deserialize;

use crate::services::DEFAULT_MAX_RECOMMENDATIONS;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Game metadata snapshot (CSV)
    #[serde(default = "default_games_path")]
    pub games_path: String,

    /// Thumbnail snapshot (CSV), left-joined on game id
    #[serde(default = "default_thumbnails_path")]
    pub thumbnails_path: String,

    /// Precomputed recommendation table (CSV)
    #[serde(default = "default_recommendations_path")]
    pub recommendations_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Games per catalogue page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on recommendations returned for one game
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_games_path() -> String {
    "bdd_bgg.csv".to_string()
}

fn default_thumbnails_path() -> String {
    "bgg_thumbnail.csv".to_string()
}

fn default_recommendations_path() -> String {
    "reco_precalc.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_page_size() -> usize {
    25
}

fn default_max_recommendations() -> usize {
    DEFAULT_MAX_RECOMMENDATIONS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games_path: default_games_path(),
            thumbnails_path: default_thumbnails_path(),
            recommendations_path: default_recommendations_path(),
            host: default_host(),
            port: default_port(),
            page_size: default_page_size(),
            max_recommendations: default_max_recommendations(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be at least 1");
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-request limits shared with the HTTP handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub page_size: usize,
    pub max_recommendations: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CatalogSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size.max(1),
            max_recommendations: config.max_recommendations,
        }
    }
}
