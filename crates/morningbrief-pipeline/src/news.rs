use serde::Deserialize;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::types::RawArticle;

/// Client for a NewsAPI-style headline endpoint.
pub struct NewsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: usize,
}

impl NewsClient {
    pub fn new(api_key: String, base_url: String, page_size: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            page_size,
        }
    }

    /// Fetch the freshest headlines matching `category`.
    ///
    /// Headlines without a title or URL are dropped; an empty result is not
    /// an error (the caller reports it per category).
    pub async fn fetch_category(&self, category: &str) -> Result<Vec<RawArticle>> {
        debug!(category, "fetching headlines");

        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", category),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Fetch(format!("status {status}: {body}")));
        }

        let api_resp: NewsApiResponse = resp
            .json()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        Ok(to_raw_articles(api_resp))
    }
}

fn to_raw_articles(resp: NewsApiResponse) -> Vec<RawArticle> {
    resp.articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title.filter(|t| !t.is_empty() && t != "[Removed]")?;
            let url = a.url.filter(|u| !u.is_empty())?;
            Some(RawArticle {
                title,
                url,
                description: a.description.filter(|d| !d.is_empty()),
                source: a.source.and_then(|s| s.name),
                published_at: a.published_at,
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    source: Option<NewsApiSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_maps_to_raw_articles() {
        let raw = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": null, "name": "Example Times"},
                    "title": "AI breakthrough announced",
                    "url": "https://example.com/ai",
                    "description": "Researchers announce a new model.",
                    "publishedAt": "2025-03-10T06:00:00Z"
                },
                {
                    "source": {"id": null, "name": "Gone"},
                    "title": "[Removed]",
                    "url": "https://example.com/removed",
                    "description": null,
                    "publishedAt": null
                }
            ]
        }"#;
        let resp: NewsApiResponse = serde_json::from_str(raw).unwrap();
        let articles = to_raw_articles(resp);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "AI breakthrough announced");
        assert_eq!(articles[0].source.as_deref(), Some("Example Times"));
    }

    #[test]
    fn missing_fields_are_dropped() {
        let raw = r#"{"articles": [{"title": null, "url": "https://x.test"}]}"#;
        let resp: NewsApiResponse = serde_json::from_str(raw).unwrap();
        assert!(to_raw_articles(resp).is_empty());
    }
}
