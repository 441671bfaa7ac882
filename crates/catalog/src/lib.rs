//! Catalogue browsing for the storefront.
//!
//! This crate holds the product/category records and the faceted filter
//! engine that listing pages run over them. It is pure domain logic: no IO
//! beyond reading a catalogue document, no HTTP, no storage.

pub mod browse;
pub mod catalog;
pub mod facets;
pub mod filter;
pub mod product;
pub mod sort;

pub use browse::{BrowseSession, BrowseView, Page};
pub use catalog::{Catalog, CatalogError};
pub use facets::{FacetCounts, RATING_BUCKETS, facet_counts};
pub use filter::{
    ActiveFilter, Facet, FilterState, FilteredResult, PRICE_STEP, PriceBounds, PriceRange,
    active_filter_count, apply, apply_except, default_state, evaluate, price_bounds,
};
pub use product::{Category, Product, slugify};
pub use sort::SortOrder;
