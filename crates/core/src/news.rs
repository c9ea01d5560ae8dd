//! Transformation functions for the news source and per-country news state
//!
//! The shell runs the lookups; this module decides what to ask for, in which
//! order, how to read the answers and what the final state of a country is.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::records::{parse_records, ParsedRecords};

/// Articles requested per lookup.
pub const NEWS_PAGE_SIZE: usize = 6;

pub const DESCRIPTION_PLACEHOLDER: &str = "Description not available";
pub const SOURCE_PLACEHOLDER: &str = "Unknown source";

/// Failure of a single lookup call
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum NewsError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Parse(String),
}

/// Article record as returned by the news source
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
}

/// Normalized article.
///
/// The description is stored in full; shortening it is up to whoever displays it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub source: String,
}

pub fn normalize_article(raw: RawArticle) -> Article {
    Article {
        title: raw.title.unwrap_or_default(),
        description: raw
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        url: raw.link.unwrap_or_default(),
        image_url: raw.image_url,
        published_at: raw.pub_date,
        source: raw
            .source_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| SOURCE_PLACEHOLDER.to_string()),
    }
}

pub fn normalize_articles(raw: Vec<RawArticle>) -> Vec<Article> {
    raw.into_iter().map(normalize_article).collect()
}

/// Read a news source response body.
///
/// A payload whose `status` is not `"success"` counts as zero results, as does a
/// missing `results` field. Articles that do not decode are skipped and reported
/// in `skipped`. Only unreadable payloads are errors.
pub fn parse_news_response(body: &str) -> Result<ParsedRecords<RawArticle>, NewsError> {
    let mut value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| NewsError::Parse(e.to_string()))?;

    if value.get("status").and_then(|s| s.as_str()) != Some("success") {
        return Ok(ParsedRecords::default());
    }

    match value.get_mut("results").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(items)) => Ok(parse_records(items)),
        _ => Ok(ParsedRecords::default()),
    }
}

/// Lookup strategies, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CountryCode,
    ExactName,
    RelatedTerms,
}

/// One call to the news source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NewsQuery {
    /// Filter by two-letter country code, sent lowercase.
    CountryCode(String),
    /// Search for the display name as an exact phrase.
    ExactName(String),
    /// Free-text search for an alternate term.
    Term(String),
}

impl NewsQuery {
    pub fn strategy(&self) -> Strategy {
        match self {
            NewsQuery::CountryCode(_) => Strategy::CountryCode,
            NewsQuery::ExactName(_) => Strategy::ExactName,
            NewsQuery::Term(_) => Strategy::RelatedTerms,
        }
    }

    /// The query-string parameter this lookup adds, already URL-encoded.
    pub fn parameter(&self) -> String {
        match self {
            NewsQuery::CountryCode(code) => format!("country={}", urlencoding::encode(code)),
            NewsQuery::ExactName(name) => format!("q=\"{}\"", urlencoding::encode(name)),
            NewsQuery::Term(term) => format!("q={}", urlencoding::encode(term)),
        }
    }
}

impl std::fmt::Display for NewsQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsQuery::CountryCode(code) => write!(f, "country code '{code}'"),
            NewsQuery::ExactName(name) => write!(f, "exact name \"{name}\""),
            NewsQuery::Term(term) => write!(f, "term '{term}'"),
        }
    }
}

/// Alternate search terms for well-known countries.
const RELATED_TERMS: &[(&str, &[&str])] = &[
    ("Greece", &["Greek", "Athens", "Hellenic"]),
    ("United States", &["USA", "America", "American"]),
    ("United Kingdom", &["UK", "Britain", "British"]),
    ("Germany", &["German", "Deutschland", "Berlin"]),
    ("France", &["French", "Paris"]),
    ("Italy", &["Italian", "Rome"]),
    ("Spain", &["Spanish", "Madrid"]),
    ("Japan", &["Japanese", "Tokyo"]),
    ("China", &["Chinese", "Beijing"]),
    ("India", &["Indian", "Delhi"]),
    ("Brazil", &["Brazilian", "Brasilia"]),
    ("Argentina", &["Argentine", "Buenos Aires"]),
    ("Mexico", &["Mexican", "Mexico City"]),
    ("Canada", &["Canadian", "Ottawa"]),
    ("Australia", &["Australian", "Canberra"]),
    ("Russia", &["Russian", "Moscow"]),
    ("South Korea", &["Korean", "Seoul"]),
    ("Netherlands", &["Dutch", "Amsterdam"]),
    ("Switzerland", &["Swiss", "Bern"]),
    ("Sweden", &["Swedish", "Stockholm"]),
    ("Norway", &["Norwegian", "Oslo"]),
    ("Denmark", &["Danish", "Copenhagen"]),
];

/// Alternate terms for `country_name`, or its first whitespace-delimited word.
pub fn related_terms(country_name: &str) -> Vec<String> {
    if let Some((_, terms)) = RELATED_TERMS.iter().find(|(name, _)| *name == country_name) {
        return terms.iter().map(|term| term.to_string()).collect();
    }

    country_name
        .split_whitespace()
        .next()
        .map(|first| vec![first.to_string()])
        .unwrap_or_default()
}

/// Every lookup for a country, in the order they must be tried.
///
/// Resolution stops at the first lookup returning at least one article.
pub fn build_query_plan(country_name: &str, country_code: &str) -> Vec<NewsQuery> {
    let mut plan = vec![
        NewsQuery::CountryCode(country_code.to_lowercase()),
        NewsQuery::ExactName(country_name.to_string()),
    ];
    plan.extend(related_terms(country_name).into_iter().map(NewsQuery::Term));
    plan
}

/// Full request URL for a lookup.
pub fn build_news_url(api_base: &str, api_key: &str, query: &NewsQuery) -> String {
    format!(
        "{}/news?apikey={}&{}&size={}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(api_key),
        query.parameter(),
        NEWS_PAGE_SIZE
    )
}

/// Lifecycle of news for one country key.
///
/// `Ready` and `Error` are terminal. An empty `Ready` means no news was found,
/// which is a successful outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NewsState {
    #[default]
    Absent,
    Loading,
    Ready { articles: Vec<Article> },
    Error { message: String },
}

impl NewsState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NewsState::Ready { .. } | NewsState::Error { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NewsState::Loading)
    }

    pub fn articles(&self) -> &[Article] {
        match self {
            NewsState::Ready { articles } => articles,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            NewsState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn view(&self) -> NewsView {
        NewsView {
            loading: self.is_loading(),
            error: self.error().map(str::to_string),
            articles: self.articles().to_vec(),
        }
    }
}

/// The loading / error / articles triple the presentation layer reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsView {
    pub loading: bool,
    pub error: Option<String>,
    pub articles: Vec<Article>,
}

/// Decide the terminal state once the lookups are done.
///
/// `found` holds the first non-empty result. Without it, the outcome is an error
/// only when the last lookup attempted failed; otherwise it is an empty `Ready`.
pub fn settle_resolution(found: Option<Vec<RawArticle>>, last_error: Option<NewsError>) -> NewsState {
    match (found, last_error) {
        (Some(raw), _) if !raw.is_empty() => NewsState::Ready {
            articles: normalize_articles(raw),
        },
        (_, Some(err)) => NewsState::Error {
            message: format!("Could not load news: {err}"),
        },
        _ => NewsState::Ready {
            articles: Vec::new(),
        },
    }
}

/// Render a `pubDate` value like `2024-05-01 09:30:00` as `2024-05-01 09:30 UTC`.
///
/// Values in any other shape are returned unchanged.
pub fn format_published(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
