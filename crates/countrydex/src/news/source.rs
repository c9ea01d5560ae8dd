use async_trait::async_trait;
use countrydex_core::news::{build_news_url, parse_news_response, NewsError, NewsQuery, RawArticle};

/// A searchable news source.
///
/// `Ok` with an empty list means the source answered but had nothing, including
/// non-2xx responses and non-success payloads. `Err` is reserved for calls that
/// never produced a readable answer.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, NewsError>;
}

/// newsdata.io client
#[derive(Debug, Clone)]
pub struct NewsDataClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl NewsDataClient {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NewsSource for NewsDataClient {
    async fn search(&self, query: &NewsQuery) -> Result<Vec<RawArticle>, NewsError> {
        let url = build_news_url(&self.api_base, &self.api_key, query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NewsError::Transport(e.without_url().to_string()))?;

        if !response.status().is_success() {
            log::debug!("News search by {} returned HTTP {}", query, response.status());
            return Ok(Vec::new());
        }

        let body = response
            .text()
            .await
            .map_err(|e| NewsError::Transport(e.without_url().to_string()))?;

        let parsed = parse_news_response(&body)?;
        for skipped in &parsed.skipped {
            log::warn!("Skipping malformed article from {}: {}", query, skipped);
        }

        Ok(parsed.records)
    }
}
