use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use countrydex_core::country::Country;

use crate::config::Config;
use crate::countries::{country_table, load_catalog};
use crate::store::PersistedCollection;

#[derive(Debug, clap::Parser)]
#[command(name = "favorites")]
#[command(about = "Manage favorite countries")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List favorite countries in the order they were added
    #[clap(name = "list")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a country to favorites
    #[clap(name = "add")]
    Add {
        /// Two- or three-letter country code
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Remove a country from favorites
    #[clap(name = "remove")]
    Remove {
        /// Two- or three-letter country code
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Add a country to favorites, or remove it if it is already there
    #[clap(name = "toggle")]
    Toggle {
        /// Two- or three-letter country code
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Remove every favorite
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List { json } => {
            let config = Config::load(&global)?;
            let favorites = PersistedCollection::favorites(config.blob_store());

            if json {
                let json = serde_json::to_string_pretty(favorites.entries())
                    .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
                println!("{}", json);
            } else {
                print!("{}", format_favorites_text(favorites.entries()));
            }
        }
        Commands::Add { code } => {
            let (config, catalog) = load_catalog(&global).await?;
            let country = catalog.require(&code)?.clone();
            let mut favorites = PersistedCollection::favorites(config.blob_store());

            let name = country.name.common.clone();
            if favorites.add(country) {
                println!("{} {}", "Added to favorites:".green(), name.bold());
            } else {
                println!("{} is already a favorite", name.bold());
            }
            warn_if_unavailable(&favorites);
        }
        Commands::Remove { code } => {
            let config = Config::load(&global)?;
            let mut favorites = PersistedCollection::favorites(config.blob_store());

            // Favorites hold their own snapshots, so no catalog lookup is needed.
            let key = favorites
                .key_for(&code)
                .unwrap_or_else(|| code.trim().to_uppercase());
            if favorites.remove(&key) {
                println!("{} {}", "Removed from favorites:".green(), key.bold());
            } else {
                println!("{} is not a favorite", key.bold());
            }
            warn_if_unavailable(&favorites);
        }
        Commands::Toggle { code } => {
            let (config, catalog) = load_catalog(&global).await?;
            let country = catalog.require(&code)?.clone();
            let mut favorites = PersistedCollection::favorites(config.blob_store());

            let name = country.name.common.clone();
            if favorites.toggle(country) {
                println!("{} {}", "Added to favorites:".green(), name.bold());
            } else {
                println!("{} {}", "Removed from favorites:".green(), name.bold());
            }
            warn_if_unavailable(&favorites);
        }
        Commands::Clear => {
            let config = Config::load(&global)?;
            let mut favorites = PersistedCollection::favorites(config.blob_store());
            let count = favorites.len();

            favorites.clear();
            println!("Removed {} favorite(s)", count);
            warn_if_unavailable(&favorites);
        }
    }

    Ok(())
}

/// Tell the user when a change only lives for this session.
pub fn warn_if_unavailable(collection: &PersistedCollection) {
    if !collection.is_available() {
        eprintln!(
            "{}",
            format!(
                "Warning: could not save {}, the change was not persisted",
                collection.name()
            )
            .yellow()
        );
    }
}

fn format_favorites_text(entries: &[Country]) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("FAVORITE COUNTRIES ({})", entries.len())
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if entries.is_empty() {
        result.push_str(&format!("\n{}\n", "No favorite countries yet.".yellow()));
        result.push_str(&format!(
            "  {}: {}\n",
            "Add one".green(),
            "countrydex favorites add <code>".cyan()
        ));
    } else {
        result.push('\n');
        result.push_str(&country_table(entries, 1, |_| true).to_string());
    }

    result.push('\n');
    result
}
