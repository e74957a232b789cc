use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A headline as returned by the news source, before selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// Publisher name, when the source reports one.
    pub source: Option<String>,
    /// ISO-8601 publication timestamp, when reported.
    pub published_at: Option<String>,
}

/// One selected, summarized story inside a briefing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingArticle {
    pub category: String,
    pub title: String,
    pub summary: String,
    pub source_url: String,
}

/// The product of one pipeline run. Ephemeral — formatted and delivered,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingResult {
    /// Ordered by category, then selection rank within the category.
    pub articles: Vec<BriefingArticle>,
    pub generated_at: DateTime<Utc>,
}
