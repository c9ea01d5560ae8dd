use countrydex_core::news::{build_query_plan, settle_resolution, NewsError, NewsState, NewsView};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::source::NewsSource;

/// Resolves recent news per country key, at most once per key.
///
/// Lookups run in priority order (country code, exact name, related terms) and
/// stop at the first one with articles. Once a key is `Ready` or `Error` it is
/// never looked up again until [`NewsResolver::reset`]. While a key is `Loading`,
/// further requests for it return immediately instead of starting a second
/// resolution. Different keys resolve concurrently.
pub struct NewsResolver {
    source: Arc<dyn NewsSource>,
    states: Mutex<HashMap<String, NewsState>>,
}

impl NewsResolver {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self {
            source,
            states: Mutex::new(HashMap::new()),
        }
    }

    fn states(&self) -> MutexGuard<'_, HashMap<String, NewsState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self, country_key: &str) -> NewsState {
        self.states().get(country_key).cloned().unwrap_or_default()
    }

    pub fn view(&self, country_key: &str) -> NewsView {
        self.state(country_key).view()
    }

    /// Resolve news for a country, returning the key's state afterwards.
    ///
    /// Only an `Absent` key triggers lookups. Any other state is returned as-is.
    pub async fn resolve(&self, country_name: &str, country_key: &str) -> NewsState {
        {
            let mut states = self.states();
            match states.get(country_key) {
                Some(state) if !matches!(state, NewsState::Absent) => return state.clone(),
                _ => {
                    states.insert(country_key.to_string(), NewsState::Loading);
                }
            }
        }

        let state = self.run_lookups(country_name, country_key).await;
        self.states().insert(country_key.to_string(), state.clone());
        state
    }

    async fn run_lookups(&self, country_name: &str, country_key: &str) -> NewsState {
        log::info!("Searching news for {} ({})", country_name, country_key);

        let mut last_error: Option<NewsError> = None;

        for query in build_query_plan(country_name, country_key) {
            match self.source.search(&query).await {
                Ok(results) if !results.is_empty() => {
                    log::info!(
                        "Found {} articles for {} using {}",
                        results.len(),
                        country_name,
                        query
                    );
                    return settle_resolution(Some(results), None);
                }
                Ok(_) => {
                    log::debug!("No news for {} using {}", country_name, query);
                    last_error = None;
                }
                Err(e) => {
                    log::warn!("News search by {} failed: {}", query, e);
                    last_error = Some(e);
                }
            }
        }

        log::info!("No news found for {}", country_name);
        settle_resolution(None, last_error)
    }

    /// Forget the state for `country_key` so the next request looks it up again.
    ///
    /// A resolution still in flight for the key will record its result when it
    /// finishes.
    pub fn reset(&self, country_key: &str) {
        self.states().remove(country_key);
    }
}
