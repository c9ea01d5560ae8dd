use crate::prelude::{eprintln, *};
use crate::store::{BlobStore, FileBlobStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// countrydex configuration from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub countries_api_base: String,
    pub news_api_base: String,
    pub news_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub const DEFAULT_COUNTRIES_API_BASE: &'static str = "https://restcountries.com/v3.1";
    pub const DEFAULT_NEWS_API_BASE: &'static str = "https://newsdata.io/api/1";
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through `var`, which returns the value of a variable if set
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| var(name).filter(|value| !value.trim().is_empty());

        let data_dir = match non_empty("COUNTRYDEX_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs_next::data_dir()
                .ok_or_eyre("Unable to determine data directory, set COUNTRYDEX_DATA_DIR")?
                .join("countrydex"),
        };

        let http_timeout = match non_empty("COUNTRYDEX_HTTP_TIMEOUT") {
            Some(secs) => secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "COUNTRYDEX_HTTP_TIMEOUT must be a number of seconds, got '{secs}'"
                ))
            })?,
            None => Self::DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            countries_api_base: non_empty("COUNTRIES_API_BASE")
                .unwrap_or_else(|| Self::DEFAULT_COUNTRIES_API_BASE.to_string()),
            news_api_base: non_empty("NEWS_API_BASE")
                .unwrap_or_else(|| Self::DEFAULT_NEWS_API_BASE.to_string()),
            news_api_key: non_empty("NEWS_API_KEY"),
            data_dir,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, timeout_secs: Option<u64>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(secs) = timeout_secs {
            self.http_timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Environment configuration with the global CLI flags applied
    pub fn load(global: &crate::Global) -> Result<Self> {
        let config = Self::from_env()?.with_overrides(global.data_dir.clone(), global.timeout);

        // stderr keeps `--json` output on stdout parseable.
        if global.verbose {
            eprintln!("{}\n", config.describe());
        }

        Ok(config)
    }

    /// Human-readable summary printed in verbose mode. Never includes the API key.
    pub fn describe(&self) -> String {
        format!(
            "Countries API: {}\nNews API: {}{}\nData directory: {}",
            self.countries_api_base,
            self.news_api_base,
            if self.news_api_key.is_some() { "" } else { " (disabled, NEWS_API_KEY not set)" },
            self.data_dir.display()
        )
    }

    /// HTTP client shared by the catalog and news lookups.
    ///
    /// The timeout also bounds news resolutions: a stalled lookup fails instead of
    /// leaving its country loading forever.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!("countrydex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
    }

    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        Arc::new(FileBlobStore::new(self.data_dir.clone()))
    }
}
