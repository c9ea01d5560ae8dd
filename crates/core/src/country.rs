//! Country records as served by the countries catalog source
//!
//! The catalog is fetched once and never mutated, so every type here is a plain
//! value. Optional fields default when missing; the catalog source omits several
//! of them for territories and micro-states.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::records::{parse_records, ParsedRecords};

/// Country record from the catalog source
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Country {
    pub name: CountryName,
    pub cca2: String,
    pub cca3: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub flags: ImageRefs,
    #[serde(default)]
    #[serde(rename = "coatOfArms")]
    pub coat_of_arms: ImageRefs,
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub tld: Vec<String>,
    #[serde(default)]
    pub idd: Option<CallingCode>,
    #[serde(default)]
    #[serde(rename = "capitalInfo")]
    pub capital_info: Option<CapitalInfo>,
    #[serde(default)]
    pub independent: Option<bool>,
}

/// Common, official and native names
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
    #[serde(default)]
    #[serde(rename = "nativeName")]
    pub native_name: Option<BTreeMap<String, NativeName>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct NativeName {
    #[serde(default)]
    pub official: String,
    #[serde(default)]
    pub common: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Flag or coat-of-arms image references
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ImageRefs {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// International dialing prefix, e.g. root "+3" with suffix "0"
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CallingCode {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CapitalInfo {
    #[serde(default)]
    pub latlng: Vec<f64>,
}

impl Country {
    /// The collection and cache key for this country.
    pub fn key(&self) -> &str {
        &self.cca2
    }

    /// True when `code` is this country's two- or three-letter code (case-insensitive).
    pub fn has_code(&self, code: &str) -> bool {
        self.cca2.eq_ignore_ascii_case(code) || self.cca3.eq_ignore_ascii_case(code)
    }

    pub fn first_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// Language names, in the order of their language codes.
    pub fn language_names(&self) -> Vec<&str> {
        self.languages
            .as_ref()
            .map(|languages| languages.values().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Reasons a catalog payload could not be turned into countries
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Catalog payload is not an array")]
    NotAnArray,
}

/// Parse the catalog endpoint's response body.
///
/// Anything other than a JSON array is rejected; the catalog store degrades that
/// to an empty catalog. Inside an array, records that do not decode are skipped
/// and reported in `skipped`.
pub fn parse_catalog(body: &str) -> Result<ParsedRecords<Country>, CatalogError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;

    match value {
        serde_json::Value::Array(items) => Ok(parse_records(items)),
        _ => Err(CatalogError::NotAnArray),
    }
}

/// Find a country by its two- or three-letter code.
pub fn find_country<'a>(catalog: &'a [Country], code: &str) -> Option<&'a Country> {
    let code = code.trim();
    catalog.iter().find(|country| country.has_code(code))
}

/// Format a population as a compact figure: `1.4B`, `10.0M`, `2.5K` or the plain number.
pub fn format_population(population: u64) -> String {
    let value = population as f64;
    if population >= 1_000_000_000 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if population >= 1_000_000 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if population >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        population.to_string()
    }
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

/// Display-ready detail of a single country
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CountrySummary {
    pub code: String,
    pub code3: String,
    pub name: String,
    pub official_name: String,
    pub native_name: String,
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: String,
    pub population_compact: String,
    pub area: Option<String>,
    pub languages: String,
    pub currencies: String,
    pub borders: String,
    pub top_level_domain: String,
    pub calling_code: String,
    pub coordinates: Option<(f64, f64)>,
    pub independent: Option<bool>,
    pub flag: Option<String>,
    pub coat_of_arms: Option<String>,
}

const NOT_AVAILABLE: &str = "N/A";

/// Build the detail summary shown for a country.
pub fn summarize(country: &Country) -> CountrySummary {
    let native_name = country
        .name
        .native_name
        .as_ref()
        .and_then(|names| names.values().next())
        .map(|native| native.common.clone())
        .filter(|common| !common.is_empty())
        .unwrap_or_else(|| country.name.common.clone());

    let languages = country.language_names();
    let languages = if languages.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        languages.join(", ")
    };

    let currencies = match &country.currencies {
        Some(currencies) if !currencies.is_empty() => currencies
            .values()
            .map(|currency| match &currency.symbol {
                Some(symbol) => format!("{} ({})", currency.name, symbol),
                None => currency.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => NOT_AVAILABLE.to_string(),
    };

    let borders = if country.borders.is_empty() {
        "No land borders".to_string()
    } else {
        country.borders.join(", ")
    };

    let calling_code = country
        .idd
        .as_ref()
        .map(|idd| {
            format!(
                "{}{}",
                idd.root.as_deref().unwrap_or_default(),
                idd.suffixes.first().map(String::as_str).unwrap_or_default()
            )
        })
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    // Capital coordinates are more useful on a map; the country centroid is the fallback.
    let coordinates = country
        .capital_info
        .as_ref()
        .map(|info| info.latlng.as_slice())
        .filter(|latlng| latlng.len() >= 2)
        .or_else(|| Some(country.latlng.as_slice()).filter(|latlng| latlng.len() >= 2))
        .map(|latlng| (latlng[0], latlng[1]));

    CountrySummary {
        code: country.cca2.clone(),
        code3: country.cca3.clone(),
        name: country.name.common.clone(),
        official_name: country.name.official.clone(),
        native_name,
        capital: country
            .first_capital()
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        region: country.region.clone(),
        subregion: country
            .subregion
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        population: format_thousands(country.population),
        population_compact: format_population(country.population),
        area: country
            .area
            .map(|area| format!("{} km²", format_thousands(area.round() as u64))),
        languages,
        currencies,
        borders,
        top_level_domain: country
            .tld
            .first()
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        calling_code,
        coordinates,
        independent: country.independent,
        flag: country.flags.svg.clone().or_else(|| country.flags.png.clone()),
        coat_of_arms: country
            .coat_of_arms
            .svg
            .clone()
            .or_else(|| country.coat_of_arms.png.clone()),
    }
}

/// Subject and body used when sharing a country with someone
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ShareMessage {
    pub subject: String,
    pub body: String,
}

pub fn share_message(country: &Country) -> ShareMessage {
    let summary = summarize(country);

    ShareMessage {
        subject: format!("Check out this country: {}!", summary.name),
        body: format!(
            "Capital: {}\nPopulation: {}\nRegion: {}\nLanguage(s): {}",
            summary.capital, summary.population, summary.region, summary.languages
        ),
    }
}

/// Minimal country record for tests across the crate.
#[cfg(test)]
pub(crate) fn sample_country(
    name: &str,
    cca2: &str,
    population: u64,
    region: &str,
    languages: &[(&str, &str)],
) -> Country {
    Country {
        name: CountryName {
            common: name.to_string(),
            ..Default::default()
        },
        cca2: cca2.to_string(),
        cca3: format!("{cca2}X"),
        capital: vec![],
        population,
        region: region.to_string(),
        subregion: None,
        languages: if languages.is_empty() {
            None
        } else {
            Some(
                languages
                    .iter()
                    .map(|(code, name)| (code.to_string(), name.to_string()))
                    .collect(),
            )
        },
        currencies: None,
        latlng: vec![],
        flags: ImageRefs::default(),
        coat_of_arms: ImageRefs::default(),
        borders: vec![],
        area: None,
        tld: vec![],
        idd: None,
        capital_info: None,
        independent: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_country() -> Country {
        Country {
            name: CountryName {
                common: "Greece".to_string(),
                official: "Hellenic Republic".to_string(),
                native_name: Some(BTreeMap::from([(
                    "ell".to_string(),
                    NativeName {
                        official: "Ελληνική Δημοκρατία".to_string(),
                        common: "Ελλάδα".to_string(),
                    },
                )])),
            },
            cca2: "GR".to_string(),
            cca3: "GRC".to_string(),
            capital: vec!["Athens".to_string()],
            population: 10_715_549,
            region: "Europe".to_string(),
            subregion: Some("Southern Europe".to_string()),
            languages: Some(BTreeMap::from([(
                "ell".to_string(),
                "Greek".to_string(),
            )])),
            currencies: Some(BTreeMap::from([(
                "EUR".to_string(),
                Currency {
                    name: "Euro".to_string(),
                    symbol: Some("€".to_string()),
                },
            )])),
            latlng: vec![39.0, 22.0],
            flags: ImageRefs {
                png: Some("https://flagcdn.com/w320/gr.png".to_string()),
                svg: Some("https://flagcdn.com/gr.svg".to_string()),
                alt: None,
            },
            coat_of_arms: ImageRefs::default(),
            borders: vec!["ALB".to_string(), "BGR".to_string(), "TUR".to_string()],
            area: Some(131_990.0),
            tld: vec![".gr".to_string()],
            idd: Some(CallingCode {
                root: Some("+3".to_string()),
                suffixes: vec!["0".to_string()],
            }),
            capital_info: Some(CapitalInfo {
                latlng: vec![37.98, 23.73],
            }),
            independent: Some(true),
        }
    }

    #[test]
    fn test_parse_catalog_restcountries_payload() {
        let body = r#"[
            {
                "name": {"common": "Greece", "official": "Hellenic Republic"},
                "cca2": "GR",
                "cca3": "GRC",
                "capital": ["Athens"],
                "population": 10715549,
                "region": "Europe",
                "subregion": "Southern Europe",
                "languages": {"ell": "Greek"},
                "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
                "latlng": [39.0, 22.0],
                "flags": {"png": "https://flagcdn.com/w320/gr.png", "svg": "https://flagcdn.com/gr.svg"},
                "coatOfArms": {}
            },
            {
                "name": {"common": "Nowhere"},
                "cca2": "NW",
                "cca3": "NWH"
            }
        ]"#;

        let parsed = parse_catalog(body).unwrap();
        assert!(parsed.skipped.is_empty());
        let catalog = parsed.records;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name.common, "Greece");
        assert_eq!(catalog[0].language_names(), vec!["Greek"]);
        assert_eq!(catalog[1].population, 0);
        assert!(catalog[1].languages.is_none());
        assert!(catalog[1].capital.is_empty());
    }

    #[test]
    fn test_parse_catalog_rejects_object() {
        let result = parse_catalog(r#"{"status": 404, "message": "Not Found"}"#);
        assert_eq!(result, Err(CatalogError::NotAnArray));
    }

    #[test]
    fn test_parse_catalog_rejects_garbage() {
        let result = parse_catalog("<html>bad gateway</html>");
        assert!(matches!(result, Err(CatalogError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_catalog_skips_malformed_records() {
        let body = r#"[
            {"name": {"common": "Greece"}, "cca2": "GR", "cca3": "GRC", "capital": ["Athens"]},
            {"name": {"common": "Broken"}, "cca2": "BR", "cca3": "BRK", "capital": null},
            {"cca2": "XX"},
            {"name": {"common": "Japan"}, "cca2": "JP", "cca3": "JPN"}
        ]"#;

        let parsed = parse_catalog(body).unwrap();

        let names: Vec<&str> = parsed.records.iter().map(|c| c.name.common.as_str()).collect();
        assert_eq!(names, vec!["Greece", "Japan"]);
        assert_eq!(parsed.skipped.len(), 2);
        assert!(parsed.skipped[0].starts_with("record 1:"));
        assert!(parsed.skipped[1].starts_with("record 2:"));
    }

    #[test]
    fn test_find_country_by_either_code() {
        let catalog = vec![create_test_country()];

        assert!(find_country(&catalog, "gr").is_some());
        assert!(find_country(&catalog, "GRC").is_some());
        assert!(find_country(&catalog, " grc ").is_some());
        assert!(find_country(&catalog, "AT").is_none());
    }

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1_000), "1.0K");
        assert_eq!(format_population(33_600), "33.6K");
        assert_eq!(format_population(10_715_549), "10.7M");
        assert_eq!(format_population(1_402_112_000), "1.4B");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(10_715_549), "10,715,549");
    }

    #[test]
    fn test_summarize_full_record() {
        let summary = summarize(&create_test_country());

        assert_eq!(summary.name, "Greece");
        assert_eq!(summary.native_name, "Ελλάδα");
        assert_eq!(summary.capital, "Athens");
        assert_eq!(summary.population, "10,715,549");
        assert_eq!(summary.population_compact, "10.7M");
        assert_eq!(summary.area, Some("131,990 km²".to_string()));
        assert_eq!(summary.languages, "Greek");
        assert_eq!(summary.currencies, "Euro (€)");
        assert_eq!(summary.borders, "ALB, BGR, TUR");
        assert_eq!(summary.calling_code, "+30");
        assert_eq!(summary.coordinates, Some((37.98, 23.73)));
        assert_eq!(summary.flag, Some("https://flagcdn.com/gr.svg".to_string()));
    }

    #[test]
    fn test_summarize_sparse_record() {
        let mut country = create_test_country();
        country.name.native_name = None;
        country.capital.clear();
        country.languages = None;
        country.currencies = None;
        country.borders.clear();
        country.idd = None;
        country.capital_info = None;
        country.subregion = None;

        let summary = summarize(&country);

        assert_eq!(summary.native_name, "Greece");
        assert_eq!(summary.capital, "N/A");
        assert_eq!(summary.subregion, "N/A");
        assert_eq!(summary.languages, "N/A");
        assert_eq!(summary.currencies, "N/A");
        assert_eq!(summary.borders, "No land borders");
        assert_eq!(summary.calling_code, "N/A");
        assert_eq!(summary.coordinates, Some((39.0, 22.0)));
    }

    #[test]
    fn test_share_message() {
        let message = share_message(&create_test_country());

        assert_eq!(message.subject, "Check out this country: Greece!");
        assert!(message.body.contains("Capital: Athens"));
        assert!(message.body.contains("Population: 10,715,549"));
        assert!(message.body.contains("Region: Europe"));
        assert!(message.body.contains("Language(s): Greek"));
    }
}
