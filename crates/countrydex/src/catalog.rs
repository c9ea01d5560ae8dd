use crate::prelude::*;
use countrydex_core::country::{find_country, parse_catalog, Country};
use countrydex_core::query::QueryCoordinator;

/// Immutable snapshot of every country, fetched once per run
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    countries: Vec<Country>,
}

impl CatalogStore {
    /// Fetch the catalog. Any failure resolves to an empty catalog.
    pub async fn load(client: &reqwest::Client, api_base: &str) -> Self {
        match fetch_catalog(client, api_base).await {
            Ok(countries) => {
                log::info!("Loaded {} countries", countries.len());
                Self { countries }
            }
            Err(e) => {
                log::warn!("Failed to load country catalog: {:#}", e);
                Self::default()
            }
        }
    }

    #[cfg(test)]
    pub fn from_countries(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    #[cfg(test)]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Country> {
        find_country(&self.countries, code)
    }

    /// Like [`Self::find`], but a missing country is an error.
    pub fn require(&self, code: &str) -> Result<&Country> {
        self.find(code).ok_or_else(|| {
            if self.is_empty() {
                eyre!(
                    "{} (the country catalog could not be loaded, check your connection)",
                    Error::CountryNotFound(code.to_string())
                )
            } else {
                Error::CountryNotFound(code.to_string()).into()
            }
        })
    }

    /// Hand the catalog over to a query coordinator waiting for it.
    pub fn fill(self, query: &mut QueryCoordinator) {
        query.set_catalog(self.countries);
    }
}

/// Get the list of independent countries from the catalog source
async fn fetch_catalog(client: &reqwest::Client, api_base: &str) -> Result<Vec<Country>> {
    let url = format!("{}/independent?status=true", api_base.trim_end_matches('/'));

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to fetch countries")?;

    let body = response
        .text()
        .await
        .context("Failed to read countries response")?;

    let parsed = parse_catalog(&body).map_err(|e| eyre!("{}", e))?;
    for skipped in &parsed.skipped {
        log::warn!("Skipping malformed country {}", skipped);
    }

    Ok(parsed.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use countrydex_core::filter::Region;

    fn create_test_catalog() -> CatalogStore {
        let countries: Vec<Country> = serde_json::from_value(serde_json::json!([
            {"name": {"common": "Greece"}, "cca2": "GR", "cca3": "GRC", "population": 10000000, "region": "Europe"},
            {"name": {"common": "Japan"}, "cca2": "JP", "cca3": "JPN", "population": 125000000, "region": "Asia"}
        ]))
        .unwrap();
        CatalogStore::from_countries(countries)
    }

    #[tokio::test]
    async fn test_load_unreachable_source_is_empty() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();

        let catalog = CatalogStore::load(&client, "http://127.0.0.1:9").await;

        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_keeps_valid_records() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/independent")
                .query_param("status", "true");
            then.status(200).json_body(serde_json::json!([
                {"name": {"common": "Greece"}, "cca2": "GR", "cca3": "GRC", "capital": ["Athens"]},
                {"name": {"common": "Broken"}, "cca2": "BR", "cca3": "BRK", "capital": null}
            ]));
        });

        let catalog = CatalogStore::load(&reqwest::Client::new(), &server.base_url()).await;

        mock.assert();
        assert_eq!(catalog.countries().len(), 1);
        assert_eq!(catalog.require("GRC").unwrap().name.common, "Greece");
    }

    #[tokio::test]
    async fn test_load_non_array_response_is_empty() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/independent");
            then.status(404)
                .json_body(serde_json::json!({"status": 404, "message": "Not Found"}));
        });

        let catalog = CatalogStore::load(&reqwest::Client::new(), &server.base_url()).await;

        mock.assert();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_require_known_and_unknown() {
        let catalog = create_test_catalog();

        assert_eq!(catalog.require("jpn").unwrap().cca2, "JP");

        let err = catalog.require("AT").unwrap_err();
        assert_eq!(err.to_string(), "Country not found: AT");
    }

    #[test]
    fn test_require_on_empty_catalog_explains_why() {
        let err = CatalogStore::default().require("GR").unwrap_err();
        assert!(err.to_string().contains("could not be loaded"));
    }

    #[test]
    fn test_fill_pending_query() {
        let mut query = QueryCoordinator::pending();
        create_test_catalog().fill(&mut query);

        assert!(!query.is_loading());
        assert_eq!(query.results().len(), 2);

        query.set_region(Some(Region::Asia));
        assert_eq!(query.results()[0].cca2, "JP");
    }
}
