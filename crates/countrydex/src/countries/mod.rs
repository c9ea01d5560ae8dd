use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use countrydex_core::country::{format_population, share_message, Country, ShareMessage};

use crate::catalog::CatalogStore;
use crate::config::Config;

pub mod list;
pub mod show;

#[derive(Debug, clap::Parser)]
#[command(name = "countries")]
#[command(about = "Browse, inspect and share countries")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List countries, filtered and paginated
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Show the details of a country and its latest news
    #[clap(name = "show")]
    Show(show::ShowOptions),

    /// Print a short message to share a country with someone
    #[clap(name = "share")]
    Share(ShareOptions),
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ShareOptions {
    /// Two- or three-letter country code (e.g., "GR" or "GRC")
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Show(options) => show::run(options, global).await,
        Commands::Share(options) => share(options, global).await,
    }
}

/// Load configuration and the catalog the way every `countries` command needs them.
pub async fn load_catalog(global: &crate::Global) -> Result<(Config, CatalogStore)> {
    let config = Config::load(global)?;
    let client = config.http_client()?;

    if global.verbose {
        eprintln!("Fetching country catalog...");
    }

    let catalog = CatalogStore::load(&client, &config.countries_api_base).await;
    Ok((config, catalog))
}

async fn share(options: ShareOptions, global: crate::Global) -> Result<()> {
    let (_, catalog) = load_catalog(&global).await?;
    let message = share_message(catalog.require(&options.code)?);

    if options.json {
        let json = serde_json::to_string_pretty(&message)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", format_share_text(&message));
    }

    Ok(())
}

fn format_share_text(message: &ShareMessage) -> String {
    format!("{}\n\n{}\n", message.subject.bold(), message.body)
}

/// Table of countries, one row each, marking favorites with a star.
pub fn country_table(
    countries: &[Country],
    first_number: usize,
    is_favorite: impl Fn(&str) -> bool,
) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "#",
        "Code",
        "Name",
        "Capital",
        "Region",
        "Population",
        "Fav"
    ]);

    for (idx, country) in countries.iter().enumerate() {
        let favorite = if is_favorite(country.key()) { "★" } else { "" };
        table.add_row(prettytable::row![
            first_number + idx,
            country.key(),
            &country.name.common,
            country.first_capital().unwrap_or("N/A"),
            &country.region,
            format_population(country.population),
            favorite
        ]);
    }

    table
}
