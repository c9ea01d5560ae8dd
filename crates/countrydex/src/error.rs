#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    #[error("News lookups are disabled: set NEWS_API_KEY to enable them")]
    NewsDisabled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
