use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use countrydex_core::country::Country;
use countrydex_core::news::{format_published, Article, NewsState, NewsView};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::config::Config;

pub mod resolver;
pub mod source;

pub use resolver::NewsResolver;
pub use source::NewsDataClient;

const DESCRIPTION_PREVIEW_CHARS: usize = 160;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct App {
    /// Two- or three-letter country codes (e.g., "GR" or "JPN")
    #[arg(required = true, value_name = "CODE")]
    pub codes: Vec<String>,

    /// Try once more for countries whose news lookup failed
    #[arg(long)]
    pub retry: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// News for one country, as printed by `--json`
#[derive(Debug, Serialize)]
pub struct CountryNews {
    pub code: String,
    pub name: String,
    pub news: NewsView,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let resolver = news_resolver(&config)?;

    let client = config.http_client()?;
    let catalog = CatalogStore::load(&client, &config.countries_api_base).await;

    // Resolve every requested country once, in the order given.
    let mut seen = HashSet::new();
    let mut countries: Vec<&Country> = Vec::new();
    for code in &app.codes {
        let country = catalog.require(code)?;
        if seen.insert(country.key().to_string()) {
            countries.push(country);
        }
    }

    if global.verbose {
        eprintln!("Resolving news for {} countries...", countries.len());
    }

    join_all(
        countries
            .iter()
            .map(|country| resolver.resolve(&country.name.common, country.key())),
    )
    .await;

    if app.retry {
        retry_failed(&resolver, &countries).await;
    }

    if app.json {
        let reports: Vec<CountryNews> = countries
            .iter()
            .map(|country| CountryNews {
                code: country.key().to_string(),
                name: country.name.common.clone(),
                news: resolver.view(country.key()),
            })
            .collect();
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        for country in &countries {
            let state = resolver.state(country.key());
            print!("{}", format_news_text(&country.name.common, &state));
        }
    }

    Ok(())
}

/// Reset every country whose news settled on an error and resolve it again.
///
/// Returns how many countries were retried.
pub async fn retry_failed(resolver: &NewsResolver, countries: &[&Country]) -> usize {
    let failed: Vec<&Country> = countries
        .iter()
        .copied()
        .filter(|country| resolver.state(country.key()).error().is_some())
        .collect();

    for country in &failed {
        log::info!("Retrying news for {}", country.name.common);
        resolver.reset(country.key());
    }

    join_all(
        failed
            .iter()
            .map(|country| resolver.resolve(&country.name.common, country.key())),
    )
    .await;

    failed.len()
}

/// Resolver backed by newsdata.io, or an error when no API key is configured.
pub fn news_resolver(config: &Config) -> Result<NewsResolver> {
    let api_key = config.news_api_key.clone().ok_or(Error::NewsDisabled)?;
    let source = NewsDataClient::new(config.http_client()?, config.news_api_base.clone(), api_key);
    Ok(NewsResolver::new(Arc::new(source)))
}

/// Render the news section for a country.
pub fn format_news_text(country_name: &str, state: &NewsState) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("LATEST NEWS: {}", country_name.to_uppercase())
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    match state {
        NewsState::Absent => {
            result.push_str(&format!("\n{}\n", "News not requested.".bright_black()));
        }
        NewsState::Loading => {
            result.push_str(&format!("\n{}\n", "Loading news...".yellow()));
        }
        NewsState::Error { message } => {
            result.push_str(&format!("\n{}\n", message.red()));
        }
        NewsState::Ready { articles } if articles.is_empty() => {
            result.push_str(&format!(
                "\n{}\n",
                format!("No recent news found for {country_name}.").yellow()
            ));
        }
        NewsState::Ready { articles } => {
            for (idx, article) in articles.iter().enumerate() {
                result.push_str(&format_article(idx + 1, article));
            }
        }
    }

    result.push('\n');
    result
}

fn format_article(number: usize, article: &Article) -> String {
    let mut result = String::new();

    let title = if article.title.is_empty() {
        "(No title)"
    } else {
        article.title.as_str()
    };
    result.push_str(&format!(
        "\n{} {}\n",
        format!("[{number}]").yellow().bold(),
        title.white().bold()
    ));

    result.push_str(&format!(
        "    {}\n",
        truncate_text(&article.description, DESCRIPTION_PREVIEW_CHARS).bright_white()
    ));

    let published = article
        .published_at
        .as_deref()
        .map(format_published)
        .unwrap_or_else(|| "unknown".to_string());
    result.push_str(&format!(
        "    {}: {} | {}: {}\n",
        "Source".green(),
        article.source.bright_white(),
        "Published".green(),
        published.bright_black()
    ));

    if !article.url.is_empty() {
        result.push_str(&format!(
            "    {}: {}\n",
            "URL".green(),
            article.url.cyan().underline()
        ));
    }

    result
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
    }
}
