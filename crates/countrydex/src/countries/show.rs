use crate::prelude::{println, *};
use colored::Colorize;
use countrydex_core::country::{summarize, CountrySummary};
use countrydex_core::news::{NewsState, NewsView};
use serde::Serialize;

use super::load_catalog;
use crate::news::{format_news_text, news_resolver};
use crate::store::PersistedCollection;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShowOptions {
    /// Two- or three-letter country code (e.g., "GR" or "GRC")
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Skip the news lookup
    #[arg(long)]
    pub no_news: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything `countries show` prints
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub country: CountrySummary,
    pub favorite: bool,
    pub news: Option<NewsView>,
}

pub async fn run(options: ShowOptions, global: crate::Global) -> Result<()> {
    let (config, catalog) = load_catalog(&global).await?;
    let country = catalog.require(&options.code)?.clone();

    // Viewing a country is a visit.
    let store = config.blob_store();
    let mut history = PersistedCollection::history(store.clone());
    history.add(country.clone());
    let favorites = PersistedCollection::favorites(store);

    let news = if options.no_news {
        None
    } else {
        match news_resolver(&config) {
            Ok(resolver) => Some(resolver.resolve(&country.name.common, country.key()).await),
            Err(e) => {
                log::info!("Skipping news: {}", e);
                None
            }
        }
    };

    let output = ShowOutput {
        country: summarize(&country),
        favorite: favorites.contains(country.key()),
        news: news.as_ref().map(NewsState::view),
    };

    if options.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", format_show_text(&output));
    match &news {
        Some(state) => print!("{}", format_news_text(&output.country.name, state)),
        None if !options.no_news => println!(
            "{}\n",
            "Set NEWS_API_KEY to see the latest news for this country.".bright_black()
        ),
        None => {}
    }

    Ok(())
}

fn format_show_text(output: &ShowOutput) -> String {
    let country = &output.country;
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    let star = if output.favorite { " ★" } else { "" };
    result.push_str(&format!(
        "{}{}\n",
        format!("{} ({})", country.name.to_uppercase(), country.code)
            .bright_cyan()
            .bold(),
        star.yellow()
    ));
    if country.official_name != country.name && !country.official_name.is_empty() {
        result.push_str(&format!("{}\n", country.official_name.bright_white()));
    }
    result.push_str(&format!("{}\n\n", "=".repeat(80).bright_cyan()));

    let mut table = new_table();
    table.add_row(prettytable::row!["Native name", &country.native_name]);
    table.add_row(prettytable::row!["Capital", &country.capital]);
    table.add_row(prettytable::row!["Region", &country.region]);
    table.add_row(prettytable::row!["Subregion", &country.subregion]);
    table.add_row(prettytable::row![
        "Population",
        format!("{} ({})", country.population, country.population_compact)
    ]);
    if let Some(area) = &country.area {
        table.add_row(prettytable::row!["Area", area]);
    }
    table.add_row(prettytable::row!["Languages", &country.languages]);
    table.add_row(prettytable::row!["Currencies", &country.currencies]);
    table.add_row(prettytable::row!["Borders", &country.borders]);
    table.add_row(prettytable::row!["Top-level domain", &country.top_level_domain]);
    table.add_row(prettytable::row!["Calling code", &country.calling_code]);
    if let Some((lat, lng)) = country.coordinates {
        table.add_row(prettytable::row!["Coordinates", format!("{lat:.2}, {lng:.2}")]);
    }
    if let Some(flag) = &country.flag {
        table.add_row(prettytable::row!["Flag", flag]);
    }
    result.push_str(&table.to_string());

    let toggle = format!("countrydex favorites toggle {}", country.code);
    result.push_str(&format!(
        "\n{}: {}\n",
        if output.favorite {
            "Remove from favorites".green()
        } else {
            "Add to favorites".green()
        },
        toggle.cyan()
    ));
    result.push_str(&format!(
        "{}: {}\n",
        "Share".green(),
        format!("countrydex countries share {}", country.code).cyan()
    ));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use countrydex_core::country::Country;

    fn create_test_country() -> Country {
        serde_json::from_value(serde_json::json!({
            "name": {
                "common": "Greece",
                "official": "Hellenic Republic",
                "nativeName": {"ell": {"official": "Ελληνική Δημοκρατία", "common": "Ελλάδα"}}
            },
            "cca2": "GR",
            "cca3": "GRC",
            "capital": ["Athens"],
            "population": 10715549,
            "region": "Europe",
            "subregion": "Southern Europe",
            "languages": {"ell": "Greek"},
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "borders": ["ALB", "BGR", "TUR", "MKD"],
            "area": 131990.0,
            "tld": [".gr"],
            "idd": {"root": "+3", "suffixes": ["0"]},
            "capitalInfo": {"latlng": [37.98, 23.73]}
        }))
        .unwrap()
    }

    fn create_test_output(favorite: bool) -> ShowOutput {
        ShowOutput {
            country: summarize(&create_test_country()),
            favorite,
            news: None,
        }
    }

    #[test]
    fn test_format_show_text_details() {
        let formatted = format_show_text(&create_test_output(false));

        assert!(formatted.contains("GREECE (GR)"));
        assert!(formatted.contains("Hellenic Republic"));
        assert!(formatted.contains("Ελλάδα"));
        assert!(formatted.contains("Athens"));
        assert!(formatted.contains("Southern Europe"));
        assert!(formatted.contains("10,715,549 (10.7M)"));
        assert!(formatted.contains("131,990 km²"));
        assert!(formatted.contains("Euro (€)"));
        assert!(formatted.contains("ALB, BGR, TUR, MKD"));
        assert!(formatted.contains("+30"));
        assert!(formatted.contains("37.98, 23.73"));
    }

    #[test]
    fn test_format_show_text_favorite_actions() {
        let not_favorite = format_show_text(&create_test_output(false));
        assert!(not_favorite.contains("Add to favorites"));
        assert!(not_favorite.contains("countrydex favorites toggle GR"));
        assert!(!not_favorite.contains('★'));

        let favorite = format_show_text(&create_test_output(true));
        assert!(favorite.contains("Remove from favorites"));
        assert!(favorite.contains('★'));
    }

    #[test]
    fn test_show_output_json_shape() {
        let mut output = create_test_output(true);
        output.news = Some(NewsState::Ready { articles: vec![] }.view());

        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["country"]["code"], "GR");
        assert_eq!(json["country"]["native_name"], "Ελλάδα");
        assert_eq!(json["favorite"], true);
        assert_eq!(json["news"]["loading"], false);
        assert_eq!(json["news"]["articles"].as_array().unwrap().len(), 0);
    }
}
