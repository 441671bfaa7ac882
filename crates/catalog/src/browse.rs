//! Page-level composition of the filter engine.
//!
//! A [`BrowseSession`] is what a listing page (all products, or one category)
//! holds: the product list it was given, the bounds derived from that list,
//! the shopper's filter selections and the chosen sort order.

use serde::Serialize;

use crate::facets::{FacetCounts, facet_counts};
use crate::filter::{ActiveFilter, FilterState, PriceBounds, active_filter_count, apply, price_bounds};
use crate::product::Product;
use crate::sort::SortOrder;

/// 1-based page of a listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: usize,
    pub per_page: usize,
}

impl Page {
    pub const DEFAULT_PER_PAGE: usize = 12;
    pub const MAX_PER_PAGE: usize = 100;

    /// Page 0 is treated as page 1; `per_page` is clamped to `1..=MAX_PER_PAGE`.
    pub fn new(number: usize, per_page: usize) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// Everything a listing view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseView {
    pub items: Vec<Product>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub sort: SortOrder,
    pub active_filter_count: usize,
    pub active_filters: Vec<ActiveFilter>,
    pub facets: FacetCounts,
    pub price_bounds: PriceBounds,
}

#[derive(Debug, Clone)]
pub struct BrowseSession {
    products: Vec<Product>,
    bounds: PriceBounds,
    state: FilterState,
    sort: SortOrder,
}

impl BrowseSession {
    pub fn new(products: Vec<Product>) -> Self {
        let bounds = price_bounds(&products);
        Self {
            products,
            bounds,
            state: FilterState::default_for(bounds),
            sort: SortOrder::default(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// Swap in a new product list. This is the only place bounds are
    /// recomputed; the filter state is reconciled against them.
    pub fn set_products(&mut self, products: Vec<Product>) {
        let next = price_bounds(&products);
        self.state.reconcile(self.bounds, next);
        tracing::debug!(
            products = products.len(),
            previous_max = self.bounds.max,
            next_max = next.max,
            "browse products replaced"
        );
        self.products = products;
        self.bounds = next;
    }

    /// Mutate the filter state (user interaction).
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut FilterState),
    {
        f(&mut self.state);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn remove_filter(&mut self, chip: &ActiveFilter) {
        self.state.remove(chip, self.bounds);
    }

    pub fn clear_filters(&mut self) {
        self.state.clear(self.bounds);
    }

    pub fn active_filter_count(&self) -> usize {
        active_filter_count(&self.state, self.bounds)
    }

    /// Filtered and sorted products (all pages).
    pub fn results(&self) -> Vec<Product> {
        let mut items = apply(&self.products, &self.state);
        self.sort.sort(&mut items);
        items
    }

    pub fn view(&self, page: Page) -> BrowseView {
        let results = self.results();
        let total = results.len();
        let items: Vec<Product> = results
            .into_iter()
            .skip(page.offset())
            .take(page.per_page)
            .collect();

        tracing::debug!(
            total,
            returned = items.len(),
            page = page.number,
            sort = %self.sort,
            "browse view computed"
        );

        BrowseView {
            items,
            total,
            page: page.number,
            per_page: page.per_page,
            total_pages: total.div_ceil(page.per_page),
            sort: self.sort,
            active_filter_count: self.active_filter_count(),
            active_filters: self.state.active_filters(self.bounds),
            facets: facet_counts(&self.products, &self.state),
            price_bounds: self.bounds,
        }
    }
}
