//! Query coordinator: the read model over catalog, filter and pager
//!
//! Every criteria change goes through the coordinator, which re-runs the filter
//! pipeline and moves back to page 1 before anyone can observe the new results.
//! Page navigation is clamped to `[1, total_pages]`.

use serde::Serialize;

use crate::country::Country;
use crate::filter::{self, FilterCriteria, PopulationBucket, Region};
use crate::pager::{self, PAGE_SIZE};

/// Pagination metadata for a list view
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
    pub next_page_command: Option<String>,
    pub prev_page_command: Option<String>,
}

/// Snapshot of the current page handed to the presentation layer
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageView {
    pub loading: bool,
    pub criteria: FilterCriteria,
    pub items: Vec<Country>,
    pub pagination: PageInfo,
}

#[derive(Debug, Clone)]
pub struct QueryCoordinator {
    catalog: Vec<Country>,
    criteria: FilterCriteria,
    results: Vec<Country>,
    current_page: usize,
    page_size: usize,
    loading: bool,
}

impl QueryCoordinator {
    /// Coordinator over an already loaded catalog.
    pub fn new(catalog: Vec<Country>) -> Self {
        let results = catalog.clone();
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            results,
            current_page: 1,
            page_size: PAGE_SIZE,
            loading: false,
        }
    }

    /// Coordinator waiting for the catalog; reports `loading` until [`Self::set_catalog`].
    pub fn pending() -> Self {
        Self {
            loading: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn set_catalog(&mut self, catalog: Vec<Country>) {
        self.catalog = catalog;
        self.loading = false;
        self.recompute();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn catalog(&self) -> &[Country] {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the whole criteria value. Returns `false` when nothing changed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        self.recompute();
        true
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let criteria = FilterCriteria {
            query: query.into(),
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    pub fn set_region(&mut self, region: Option<Region>) -> bool {
        let criteria = FilterCriteria {
            region,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    pub fn set_population(&mut self, population: Option<PopulationBucket>) -> bool {
        let criteria = FilterCriteria {
            population,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> bool {
        let criteria = FilterCriteria {
            language: language.into(),
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    fn recompute(&mut self) {
        self.results = filter::apply(&self.catalog, &self.criteria);
        self.current_page = 1;
    }

    /// Every country matching the current criteria, in catalog order.
    pub fn results(&self) -> &[Country] {
        &self.results
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.results.len(), self.page_size)
    }

    pub fn page_items(&self) -> &[Country] {
        pager::page(&self.results, self.page_size, self.current_page)
    }

    /// Move to `page`, clamped into `[1, total_pages]`. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// Advance one page. Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page >= self.total_pages() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. Returns `false` when already on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn view(&self) -> PageView {
        let total_pages = self.total_pages();
        let page = self.current_page;

        let next_page = (page < total_pages).then(|| list_command(&self.criteria, page + 1));
        let prev_page = (page > 1).then(|| list_command(&self.criteria, page - 1));

        PageView {
            loading: self.loading,
            criteria: self.criteria.clone(),
            items: self.page_items().to_vec(),
            pagination: PageInfo {
                current_page: page,
                total_pages,
                total_items: self.results.len(),
                limit: self.page_size,
                next_page_command: next_page,
                prev_page_command: prev_page,
            },
        }
    }
}

/// Build the `countrydex countries list` invocation reproducing `criteria` at `page`.
pub fn list_command(criteria: &FilterCriteria, page: usize) -> String {
    let mut command = String::from("countrydex countries list");

    if !criteria.query.is_empty() {
        command.push_str(&format!(" --query {}", quote_arg(&criteria.query)));
    }
    if let Some(region) = criteria.region {
        command.push_str(&format!(" --region {region}"));
    }
    if let Some(population) = criteria.population {
        command.push_str(&format!(" --population {population}"));
    }
    if !criteria.language.is_empty() {
        command.push_str(&format!(" --language {}", quote_arg(&criteria.language)));
    }

    command.push_str(&format!(" --page {page}"));
    command
}

fn quote_arg(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("'{}'", value.replace('\'', r"'\''"))
    } else {
        value.to_string()
    }
}
