use crate::prelude::{println, *};
use colored::Colorize;
use countrydex_core::filter::{FilterCriteria, PopulationBucket, Region};
use countrydex_core::query::{PageView, QueryCoordinator};

use super::{country_table, load_catalog};
use crate::store::PersistedCollection;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Case-insensitive search on the country name
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Region: Africa, Americas, Antarctic, Asia, Europe, Oceania
    #[arg(short, long)]
    pub region: Option<Region>,

    /// Population bucket: small (<1M), medium (1M-50M), large (>=50M)
    #[arg(long)]
    pub population: Option<PopulationBucket>,

    /// Case-insensitive search on spoken language names
    #[arg(short, long, default_value = "")]
    pub language: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            query: self.query.clone(),
            region: self.region,
            population: self.population,
            language: self.language.clone(),
        }
    }
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let mut query = QueryCoordinator::pending();

    let (config, catalog) = load_catalog(&global).await?;
    let catalog_loaded = !catalog.is_empty();
    catalog.fill(&mut query);

    query.set_criteria(options.criteria());
    let landed = query.go_to_page(options.page);
    if landed != options.page {
        log::debug!("Page {} out of range, showing page {}", options.page, landed);
    }

    let view = query.view();

    if options.json {
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    if !catalog_loaded {
        println!(
            "{}",
            "The country catalog could not be loaded. Check your connection and try again."
                .yellow()
        );
        return Ok(());
    }

    let favorites = PersistedCollection::favorites(config.blob_store());
    print!("{}", format_list_text(&view, |key| favorites.contains(key)));

    Ok(())
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if !criteria.query.is_empty() {
        parts.push(format!("name contains \"{}\"", criteria.query));
    }
    if let Some(region) = criteria.region {
        parts.push(format!("region {region}"));
    }
    if let Some(population) = criteria.population {
        parts.push(format!("{population} population"));
    }
    if !criteria.language.is_empty() {
        parts.push(format!("speaks \"{}\"", criteria.language));
    }

    if parts.is_empty() {
        "all countries".to_string()
    } else {
        parts.join(", ")
    }
}

/// Convert a page view to formatted text with colors
fn format_list_text(view: &PageView, is_favorite: impl Fn(&str) -> bool) -> String {
    let mut result = String::new();
    let pagination = &view.pagination;

    // Header
    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!(
            "COUNTRIES (Page {} of {})",
            pagination.current_page, pagination.total_pages
        )
        .bright_cyan()
        .bold()
    ));
    result.push_str(&format!(
        "{}: {}\n",
        "Filter".green(),
        describe_criteria(&view.criteria).bright_white()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if view.items.is_empty() {
        result.push_str(&format!(
            "\n{}\n",
            "No countries match the current filters.".yellow()
        ));
    } else {
        let first_number = (pagination.current_page - 1) * pagination.limit + 1;
        result.push('\n');
        result.push_str(&country_table(&view.items, first_number, is_favorite).to_string());
    }

    // Navigation section
    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_yellow()));
    result.push_str(&format!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_yellow()));

    result.push_str(&format!(
        "\n{} {} {} {} ({} {})\n",
        "Showing page".bright_white(),
        pagination.current_page.to_string().bright_cyan().bold(),
        "of".bright_white(),
        pagination.total_pages.to_string().bright_cyan().bold(),
        pagination.total_items.to_string().bright_cyan().bold(),
        "matching countries".bright_white()
    ));

    if pagination.next_page_command.is_some() || pagination.prev_page_command.is_some() {
        result.push_str(&format!("\n{}:\n", "To navigate".bright_white().bold()));
    }
    if let Some(next) = &pagination.next_page_command {
        result.push_str(&format!("  {}: {}\n", "Next page".green(), next.cyan()));
    }
    if let Some(prev) = &pagination.prev_page_command {
        result.push_str(&format!("  {}: {}\n", "Previous page".green(), prev.cyan()));
    }

    result.push_str(&format!("\n{}:\n", "To filter".bright_white().bold()));
    result.push_str(&format!(
        "  {}\n",
        "countrydex countries list --query <name> --region <region> --population <small|medium|large> --language <name>"
            .cyan()
    ));

    result.push_str(&format!("\n{}:\n", "To see a country".bright_white().bold()));
    result.push_str(&format!("  {}\n", "countrydex countries show <code>".cyan()));
    if let Some(first) = view.items.first() {
        result.push_str(&format!(
            "  {}: {}\n",
            "Example".green(),
            format!("countrydex countries show {}", first.key()).cyan()
        ));
    }

    result.push('\n');
    result
}
