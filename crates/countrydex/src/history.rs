use crate::prelude::{println, *};
use colored::Colorize;
use countrydex_core::collection::HISTORY_LIMIT;
use countrydex_core::country::Country;

use crate::config::Config;
use crate::countries::country_table;
use crate::favorites::warn_if_unavailable;
use crate::store::PersistedCollection;

#[derive(Debug, clap::Parser)]
#[command(name = "history")]
#[command(about = "Show or clear recently viewed countries")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List recently viewed countries, most recent first
    #[clap(name = "list")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget every viewed country
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let store = config.blob_store();
    let mut history = PersistedCollection::history(store.clone());

    match app.command {
        Commands::List { json } => {
            if json {
                let json = serde_json::to_string_pretty(history.entries())
                    .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
                println!("{}", json);
            } else {
                let favorites = PersistedCollection::favorites(store);
                print!(
                    "{}",
                    format_history_text(history.entries(), |key| favorites.contains(key))
                );
            }
        }
        Commands::Clear => {
            let count = history.len();
            history.clear();
            println!("Cleared {} viewed country(ies)", count);
            warn_if_unavailable(&history);
        }
    }

    Ok(())
}

fn format_history_text(entries: &[Country], is_favorite: impl Fn(&str) -> bool) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("RECENTLY VIEWED ({} of {})", entries.len(), HISTORY_LIMIT)
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if entries.is_empty() {
        result.push_str(&format!("\n{}\n", "No countries viewed yet.".yellow()));
        result.push_str(&format!(
            "  {}: {}\n",
            "View one".green(),
            "countrydex countries show <code>".cyan()
        ));
    } else {
        result.push('\n');
        result.push_str(&country_table(entries, 1, is_favorite).to_string());
    }

    result.push('\n');
    result
}
