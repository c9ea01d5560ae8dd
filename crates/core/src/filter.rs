//! Filter pipeline over the in-memory catalog
//!
//! Criteria are applied conjunctively in a fixed order: name query, region,
//! population bucket, language. Surviving countries keep their catalog order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::country::Country;

/// Errors raised when parsing filter values from user input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterError {
    #[error("Unknown region: {0}. Valid regions: Africa, Americas, Antarctic, Asia, Europe, Oceania")]
    UnknownRegion(String),

    #[error("Unknown population bucket: {0}. Valid buckets: small, medium, large")]
    UnknownPopulationBucket(String),
}

/// World regions as reported by the catalog source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Americas,
    Antarctic,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::Americas,
        Region::Antarctic,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// The region name exactly as the catalog source spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Antarctic => "Antarctic",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| FilterError::UnknownRegion(s.to_string()))
    }
}

/// Population size classes.
///
/// The buckets partition `[0, ∞)`: `small` is `[0, 1M)`, `medium` is
/// `[1M, 50M)` and `large` is `[50M, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulationBucket {
    Small,
    Medium,
    Large,
}

impl PopulationBucket {
    pub const MEDIUM_LOWER: u64 = 1_000_000;
    pub const LARGE_LOWER: u64 = 50_000_000;

    /// The single bucket a population falls into.
    pub fn of(population: u64) -> Self {
        if population < Self::MEDIUM_LOWER {
            PopulationBucket::Small
        } else if population < Self::LARGE_LOWER {
            PopulationBucket::Medium
        } else {
            PopulationBucket::Large
        }
    }

    pub fn contains(&self, population: u64) -> bool {
        Self::of(population) == *self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopulationBucket::Small => "small",
            PopulationBucket::Medium => "medium",
            PopulationBucket::Large => "large",
        }
    }
}

impl fmt::Display for PopulationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PopulationBucket {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(PopulationBucket::Small),
            "medium" => Ok(PopulationBucket::Medium),
            "large" => Ok(PopulationBucket::Large),
            _ => Err(FilterError::UnknownPopulationBucket(s.to_string())),
        }
    }
}

/// The live combination of search and filter values.
///
/// Empty strings and `None` mean "any". The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub region: Option<Region>,
    pub population: Option<PopulationBucket>,
    pub language: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.region.is_none()
            && self.population.is_none()
            && self.language.is_empty()
    }
}

/// Case-insensitive substring match on the common name.
pub fn matches_query(country: &Country, query: &str) -> bool {
    query.is_empty()
        || country
            .name
            .common
            .to_lowercase()
            .contains(&query.to_lowercase())
}

pub fn matches_region(country: &Country, region: Option<Region>) -> bool {
    region.map_or(true, |region| country.region == region.as_str())
}

pub fn matches_population(country: &Country, bucket: Option<PopulationBucket>) -> bool {
    bucket.map_or(true, |bucket| bucket.contains(country.population))
}

/// True when any of the country's languages contains `language` (case-insensitive).
///
/// A country without a language mapping never matches a non-empty filter.
pub fn matches_language(country: &Country, language: &str) -> bool {
    if language.is_empty() {
        return true;
    }

    let needle = language.to_lowercase();
    country
        .languages
        .as_ref()
        .is_some_and(|languages| {
            languages
                .values()
                .any(|name| name.to_lowercase().contains(&needle))
        })
}

/// Apply `criteria` to `catalog`, preserving catalog order.
pub fn apply(catalog: &[Country], criteria: &FilterCriteria) -> Vec<Country> {
    if criteria.is_empty() {
        return catalog.to_vec();
    }

    catalog
        .iter()
        .filter(|country| matches_query(country, &criteria.query))
        .filter(|country| matches_region(country, criteria.region))
        .filter(|country| matches_population(country, criteria.population))
        .filter(|country| matches_language(country, &criteria.language))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::sample_country as create_test_country;

    fn create_test_catalog() -> Vec<Country> {
        vec![
            create_test_country("Greece", "GR", 10_000_000, "Europe", &[("ell", "Greek")]),
            create_test_country("Japan", "JP", 125_000_000, "Asia", &[("jpn", "Japanese")]),
            create_test_country("Malta", "MT", 520_000, "Europe", &[("eng", "English"), ("mlt", "Maltese")]),
            create_test_country("Spain", "ES", 47_000_000, "Europe", &[("spa", "Spanish")]),
            create_test_country("Mexico", "MX", 128_000_000, "Americas", &[("spa", "Spanish")]),
            create_test_country("Bouvet Island", "BV", 0, "Antarctic", &[]),
        ]
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(|c| c.name.common.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_catalog_unchanged() {
        let catalog = create_test_catalog();
        let result = apply(&catalog, &FilterCriteria::default());
        assert_eq!(result, catalog);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let catalog = create_test_catalog();
        let criteria = FilterCriteria {
            query: "AL".to_string(),
            ..Default::default()
        };

        assert_eq!(names(&apply(&catalog, &criteria)), vec!["Malta"]);
    }

    #[test]
    fn test_region_filter() {
        let catalog = create_test_catalog();
        let criteria = FilterCriteria {
            region: Some(Region::Europe),
            ..Default::default()
        };

        assert_eq!(
            names(&apply(&catalog, &criteria)),
            vec!["Greece", "Malta", "Spain"]
        );
    }

    #[test]
    fn test_population_bucket_filter() {
        let catalog = create_test_catalog();

        let small = FilterCriteria {
            population: Some(PopulationBucket::Small),
            ..Default::default()
        };
        assert_eq!(names(&apply(&catalog, &small)), vec!["Malta", "Bouvet Island"]);

        let large = FilterCriteria {
            population: Some(PopulationBucket::Large),
            ..Default::default()
        };
        assert_eq!(names(&apply(&catalog, &large)), vec!["Japan", "Mexico"]);
    }

    #[test]
    fn test_language_filter_matches_any_language() {
        let catalog = create_test_catalog();
        let criteria = FilterCriteria {
            language: "malt".to_string(),
            ..Default::default()
        };

        assert_eq!(names(&apply(&catalog, &criteria)), vec!["Malta"]);
    }

    #[test]
    fn test_language_filter_skips_countries_without_languages() {
        let catalog = create_test_catalog();
        let criteria = FilterCriteria {
            language: "a".to_string(),
            ..Default::default()
        };

        let result = apply(&catalog, &criteria);
        assert!(!names(&result).contains(&"Bouvet Island"));
    }

    #[test]
    fn test_filters_are_conjunctive_and_keep_catalog_order() {
        let catalog = create_test_catalog();
        let criteria = FilterCriteria {
            query: String::new(),
            region: None,
            population: Some(PopulationBucket::Large),
            language: "spanish".to_string(),
        };

        assert_eq!(names(&apply(&catalog, &criteria)), vec!["Mexico"]);
    }

    #[test]
    fn test_greece_by_region_and_bucket() {
        let catalog = vec![create_test_country(
            "Greece",
            "GR",
            10_000_000,
            "Europe",
            &[("ell", "Greek")],
        )];

        let europe_medium = FilterCriteria {
            region: Some(Region::Europe),
            population: Some(PopulationBucket::Medium),
            ..Default::default()
        };
        assert_eq!(names(&apply(&catalog, &europe_medium)), vec!["Greece"]);

        let asia = FilterCriteria {
            region: Some(Region::Asia),
            ..Default::default()
        };
        assert!(apply(&catalog, &asia).is_empty());
    }

    #[test]
    fn test_buckets_partition_population_range() {
        let samples = [
            0,
            1,
            999_999,
            1_000_000,
            1_000_001,
            49_999_999,
            50_000_000,
            50_000_001,
            u64::MAX,
        ];

        for population in samples {
            let matching = [
                PopulationBucket::Small,
                PopulationBucket::Medium,
                PopulationBucket::Large,
            ]
            .iter()
            .filter(|bucket| bucket.contains(population))
            .count();
            assert_eq!(matching, 1, "population {population} matched {matching} buckets");
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(PopulationBucket::of(999_999), PopulationBucket::Small);
        assert_eq!(PopulationBucket::of(1_000_000), PopulationBucket::Medium);
        assert_eq!(PopulationBucket::of(49_999_999), PopulationBucket::Medium);
        assert_eq!(PopulationBucket::of(50_000_000), PopulationBucket::Large);
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("europe".parse::<Region>(), Ok(Region::Europe));
        assert_eq!(" Americas ".parse::<Region>(), Ok(Region::Americas));
        assert_eq!(
            "Atlantis".parse::<Region>(),
            Err(FilterError::UnknownRegion("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_population_bucket_from_str() {
        assert_eq!("LARGE".parse::<PopulationBucket>(), Ok(PopulationBucket::Large));
        assert!("huge".parse::<PopulationBucket>().is_err());
    }
}
