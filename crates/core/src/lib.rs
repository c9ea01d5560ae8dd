//! Core library for countrydex
//!
//! This crate implements the **Functional Core** of the countrydex application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The countrydex project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`countrydex_core`** (this crate): Pure transformation functions and in-memory state with zero I/O
//! - **`countrydex`**: HTTP calls, durable storage and the command line (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no network, no filesystem
//! - **Deterministic**: Filtering never re-sorts, paging never fails on bad page numbers
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`country`]: Country records as served by the catalog source, plus display helpers
//! - [`filter`]: Filter criteria and the conjunctive filter pipeline
//! - [`pager`]: Fixed-size page slicing
//! - [`query`]: The query coordinator composing catalog, filter and pager
//! - [`collection`]: De-duplicated ordered collections with insertion policies
//! - [`news`]: Article shapes, lookup plans and per-country resolution state
//! - [`records`]: Element-by-element decoding of JSON arrays from external sources
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use countrydex_core::filter::{FilterCriteria, Region};
//! use countrydex_core::query::QueryCoordinator;
//!
//! let mut query = QueryCoordinator::new(catalog);
//! query.set_region(Some(Region::Europe));
//!
//! assert_eq!(query.current_page(), 1);
//! for country in query.page_items() {
//!     println!("{}", country.name.common);
//! }
//! ```

pub mod collection;
pub mod country;
pub mod filter;
pub mod news;
pub mod pager;
pub mod query;
pub mod records;
