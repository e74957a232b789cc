use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// All schedule arithmetic happens in this single reference timezone.
/// Per-user timezones are intentionally not supported.
pub const REFERENCE_TIMEZONE: &str = "UTC";

/// Top-level config (morningbrief.toml + MORNINGBRIEF_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorningBriefConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
}

impl Default for MorningBriefConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            telegram: None,
            news: NewsConfig::default(),
            llm: LlmConfig::default(),
            scheduler: SchedulerConfig::default(),
            categories: CategoriesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    #[serde(default = "default_articles_per_category")]
    pub articles_per_category: usize,
    #[serde(default = "default_top_per_category")]
    pub top_per_category: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_news_base_url(),
            articles_per_category: default_articles_per_category(),
            top_per_category: default_top_per_category(),
        }
    }
}

/// LLM provider selection. `provider` picks the slot:
/// "openai" and "openrouter" hit their respective chat-completions endpoints;
/// "mock" (or a missing API key) produces deterministic offline output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            base_url: None,
        }
    }
}

/// Timing of the global news-cache refresh job (UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_refresh_hour")]
    pub refresh_hour: u8,
    #[serde(default)]
    pub refresh_minute: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_hour: default_refresh_hour(),
            refresh_minute: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_categories")]
    pub available: Vec<String>,
    #[serde(default = "default_max_per_user")]
    pub max_per_user: usize,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            available: default_categories(),
            max_per_user: default_max_per_user(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.morningbrief/morningbrief.db", home)
}
fn default_news_base_url() -> String {
    "https://newsapi.org/v2/everything".to_string()
}
fn default_articles_per_category() -> usize {
    10
}
fn default_top_per_category() -> usize {
    3
}
fn default_llm_provider() -> String {
    "openai".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_refresh_hour() -> u8 {
    6
}
fn default_max_per_user() -> usize {
    10
}
fn default_categories() -> Vec<String> {
    [
        "technology",
        "business",
        "sports",
        "entertainment",
        "health",
        "science",
        "politics",
        "world",
        "finance",
        "environment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl MorningBriefConfig {
    /// Load config from a TOML file with MORNINGBRIEF_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.morningbrief/morningbrief.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: MorningBriefConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("MORNINGBRIEF_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.morningbrief/morningbrief.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = MorningBriefConfig::default();
        assert_eq!(config.gateway.port, DEFAULT_PORT);
        assert_eq!(config.scheduler.refresh_hour, 6);
        assert_eq!(config.scheduler.refresh_minute, 0);
        assert_eq!(config.categories.available.len(), 10);
        assert!(config.categories.max_per_user >= 1);
        assert!(config.telegram.is_none());
    }

    #[test]
    fn llm_defaults_to_openai() {
        let llm = LlmConfig::default();
        assert_eq!(llm.provider, "openai");
        assert!(llm.base_url.is_none());
    }
}
