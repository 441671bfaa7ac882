//! Facet filter engine.
//!
//! Filtering is a pure function of `(products, state)`: every predicate is
//! independent and AND-combined, and the input slice is never modified.
//! Derived values (price bounds, active-filter count) are recomputed from
//! their inputs rather than cached.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lumiere_core::{DomainError, DomainResult, MAX_RATING};

use crate::product::Product;

/// Granularity the price slider's upper bound is rounded up to.
pub const PRICE_STEP: f64 = 100.0;

/// Slider limits derived from a product list.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// The unconstrained range for these bounds.
    pub fn full_range(&self) -> PriceRange {
        PriceRange {
            lo: self.min,
            hi: self.max,
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Inclusive price range.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lo: f64,
    pub hi: f64,
}

impl PriceRange {
    pub fn new(lo: f64, hi: f64) -> DomainResult<Self> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(DomainError::validation("price range must be finite"));
        }
        if lo < 0.0 {
            return Err(DomainError::validation("price range cannot start below 0"));
        }
        if lo > hi {
            return Err(DomainError::validation(format!(
                "price range is inverted ({lo} > {hi})"
            )));
        }
        Ok(Self { lo, hi })
    }

    pub fn contains(&self, price: f64) -> bool {
        self.lo <= price && price <= self.hi
    }
}

/// Derive slider bounds from a product list: `[0, max price rounded up to
/// the next multiple of PRICE_STEP]`. An empty list yields `[0, 0]`.
pub fn price_bounds(products: &[Product]) -> PriceBounds {
    let max = products.iter().map(|p| p.price).fold(0.0_f64, f64::max);
    PriceBounds {
        min: 0.0,
        max: (max / PRICE_STEP).ceil() * PRICE_STEP,
    }
}

/// One independently toggleable filter dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Category,
    Price,
    Rating,
    InStock,
    Featured,
    Bestseller,
    NewLaunch,
    Search,
}

impl Facet {
    pub const ALL: [Facet; 8] = [
        Facet::Category,
        Facet::Price,
        Facet::Rating,
        Facet::InStock,
        Facet::Featured,
        Facet::Bestseller,
        Facet::NewLaunch,
        Facet::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Price => "price",
            Facet::Rating => "rating",
            Facet::InStock => "in_stock",
            Facet::Featured => "featured",
            Facet::Bestseller => "bestseller",
            Facet::NewLaunch => "new_launch",
            Facet::Search => "search",
        }
    }
}

/// Filter selections for one browsing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category labels (matched case-insensitively).
    pub categories: BTreeSet<String>,
    pub price: PriceRange,
    /// Minimum rating; 0 disables the predicate.
    pub min_rating: f64,
    pub in_stock: bool,
    pub featured: bool,
    pub bestseller: bool,
    pub new_launch: bool,
    pub search: String,
}

impl FilterState {
    /// State with no active predicates for the given bounds.
    pub fn default_for(bounds: PriceBounds) -> Self {
        Self {
            categories: BTreeSet::new(),
            price: bounds.full_range(),
            min_rating: 0.0,
            in_stock: false,
            featured: false,
            bestseller: false,
            new_launch: false,
            search: String::new(),
        }
    }

    /// Toggle a category selection; returns whether it is now selected.
    pub fn toggle_category(&mut self, label: &str) -> bool {
        let label = label.trim();
        let existing = self
            .categories
            .iter()
            .find(|c| c.to_lowercase() == label.to_lowercase())
            .cloned();
        match existing {
            Some(c) => {
                self.categories.remove(&c);
                false
            }
            None => {
                if !label.is_empty() {
                    self.categories.insert(label.to_string());
                }
                !label.is_empty()
            }
        }
    }

    pub fn set_min_rating(&mut self, rating: f64) -> DomainResult<()> {
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(DomainError::validation(format!(
                "minimum rating must be between 0 and {MAX_RATING}"
            )));
        }
        self.min_rating = rating;
        Ok(())
    }

    /// Whether `facet` currently constrains results relative to `bounds`.
    pub fn is_active(&self, facet: Facet, bounds: PriceBounds) -> bool {
        match facet {
            Facet::Category => !self.categories.is_empty(),
            Facet::Price => self.price.lo > bounds.min || self.price.hi < bounds.max,
            Facet::Rating => self.min_rating > 0.0,
            Facet::InStock => self.in_stock,
            Facet::Featured => self.featured,
            Facet::Bestseller => self.bestseller,
            Facet::NewLaunch => self.new_launch,
            Facet::Search => !self.search.trim().is_empty(),
        }
    }

    /// Facets currently constraining results, in `Facet::ALL` order.
    pub fn active_facets(&self, bounds: PriceBounds) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|f| self.is_active(*f, bounds))
            .collect()
    }

    /// One removable chip per selected category and per other active facet.
    pub fn active_filters(&self, bounds: PriceBounds) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        for facet in self.active_facets(bounds) {
            match facet {
                Facet::Category => chips.extend(
                    self.categories
                        .iter()
                        .map(|name| ActiveFilter::Category { name: name.clone() }),
                ),
                Facet::Price => chips.push(ActiveFilter::Price {
                    lo: self.price.lo,
                    hi: self.price.hi,
                }),
                Facet::Rating => chips.push(ActiveFilter::Rating {
                    min: self.min_rating,
                }),
                Facet::InStock => chips.push(ActiveFilter::InStock),
                Facet::Featured => chips.push(ActiveFilter::Featured),
                Facet::Bestseller => chips.push(ActiveFilter::Bestseller),
                Facet::NewLaunch => chips.push(ActiveFilter::NewLaunch),
                Facet::Search => chips.push(ActiveFilter::Search {
                    term: self.search.trim().to_string(),
                }),
            }
        }
        chips
    }

    /// Clear exactly the selection a chip represents.
    pub fn remove(&mut self, chip: &ActiveFilter, bounds: PriceBounds) {
        match chip {
            ActiveFilter::Category { name } => {
                self.categories.retain(|c| c.to_lowercase() != name.to_lowercase());
            }
            ActiveFilter::Price { .. } => self.price = bounds.full_range(),
            ActiveFilter::Rating { .. } => self.min_rating = 0.0,
            ActiveFilter::InStock => self.in_stock = false,
            ActiveFilter::Featured => self.featured = false,
            ActiveFilter::Bestseller => self.bestseller = false,
            ActiveFilter::NewLaunch => self.new_launch = false,
            ActiveFilter::Search { .. } => self.search.clear(),
        }
    }

    /// Reset every selection.
    pub fn clear(&mut self, bounds: PriceBounds) {
        *self = Self::default_for(bounds);
    }

    /// Carry the price selection across a change of product list.
    ///
    /// A range the user never narrowed follows the new bounds; a narrowed
    /// range is clamped into them and reset if clamping inverts it.
    pub fn reconcile(&mut self, previous: PriceBounds, next: PriceBounds) {
        if !self.is_active(Facet::Price, previous) {
            self.price = next.full_range();
            return;
        }

        let lo = next.clamp(self.price.lo);
        let hi = next.clamp(self.price.hi);
        self.price = if lo <= hi {
            PriceRange { lo, hi }
        } else {
            next.full_range()
        };
    }

    fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            categories: self.categories.iter().map(|c| c.trim().to_lowercase()).collect(),
            price: self.price,
            min_rating: self.min_rating,
            in_stock: self.in_stock,
            featured: self.featured,
            bestseller: self.bestseller,
            new_launch: self.new_launch,
            search: self.search.trim().to_lowercase(),
        }
    }
}

/// Removable entry in the active-filter summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActiveFilter {
    Category { name: String },
    Price { lo: f64, hi: f64 },
    Rating { min: f64 },
    InStock,
    Featured,
    Bestseller,
    NewLaunch,
    Search { term: String },
}

impl ActiveFilter {
    pub fn facet(&self) -> Facet {
        match self {
            ActiveFilter::Category { .. } => Facet::Category,
            ActiveFilter::Price { .. } => Facet::Price,
            ActiveFilter::Rating { .. } => Facet::Rating,
            ActiveFilter::InStock => Facet::InStock,
            ActiveFilter::Featured => Facet::Featured,
            ActiveFilter::Bestseller => Facet::Bestseller,
            ActiveFilter::NewLaunch => Facet::NewLaunch,
            ActiveFilter::Search { .. } => Facet::Search,
        }
    }

    /// Human-readable chip text.
    pub fn label(&self) -> String {
        match self {
            ActiveFilter::Category { name } => name.clone(),
            ActiveFilter::Price { lo, hi } => format!("{lo} - {hi}"),
            ActiveFilter::Rating { min } => format!("{min}★ & up"),
            ActiveFilter::InStock => "In stock".to_string(),
            ActiveFilter::Featured => "Featured".to_string(),
            ActiveFilter::Bestseller => "Bestseller".to_string(),
            ActiveFilter::NewLaunch => "New launch".to_string(),
            ActiveFilter::Search { term } => format!("\"{term}\""),
        }
    }
}

/// Filter state with text normalised once per evaluation.
struct CompiledFilter {
    categories: Vec<String>,
    price: PriceRange,
    min_rating: f64,
    in_stock: bool,
    featured: bool,
    bestseller: bool,
    new_launch: bool,
    search: String,
}

impl CompiledFilter {
    fn passes(&self, facet: Facet, product: &Product) -> bool {
        match facet {
            Facet::Category => {
                self.categories.is_empty() || {
                    let category = product.category.trim().to_lowercase();
                    self.categories.iter().any(|c| *c == category)
                }
            }
            Facet::Price => self.price.contains(product.price),
            Facet::Rating => self.min_rating <= 0.0 || product.rating >= self.min_rating,
            Facet::InStock => !self.in_stock || product.in_stock,
            Facet::Featured => !self.featured || product.featured,
            Facet::Bestseller => !self.bestseller || product.bestseller,
            Facet::NewLaunch => !self.new_launch || product.new_launch,
            Facet::Search => {
                self.search.is_empty() || product.name.to_lowercase().contains(&self.search)
            }
        }
    }

    fn matches(&self, product: &Product, skip: Option<Facet>) -> bool {
        Facet::ALL
            .into_iter()
            .filter(|f| Some(*f) != skip)
            .all(|f| self.passes(f, product))
    }
}

/// Products passing every predicate in `state`, in input order.
pub fn apply(products: &[Product], state: &FilterState) -> Vec<Product> {
    let compiled = state.compile();
    products
        .iter()
        .filter(|p| compiled.matches(p, None))
        .cloned()
        .collect()
}

/// Products passing every predicate except `facet`'s.
pub fn apply_except<'a>(
    products: &'a [Product],
    state: &FilterState,
    facet: Facet,
) -> Vec<&'a Product> {
    let compiled = state.compile();
    products
        .iter()
        .filter(|p| compiled.matches(p, Some(facet)))
        .collect()
}

/// Default state for a product list: no predicate excludes anything.
pub fn default_state(products: &[Product]) -> FilterState {
    FilterState::default_for(price_bounds(products))
}

/// Number of dimensions constraining the result (not selected values).
pub fn active_filter_count(state: &FilterState, bounds: PriceBounds) -> usize {
    Facet::ALL
        .into_iter()
        .filter(|f| state.is_active(*f, bounds))
        .count()
}

/// Filtered subset plus its active-dimension count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredResult {
    pub products: Vec<Product>,
    pub active_filter_count: usize,
}

pub fn evaluate(products: &[Product], state: &FilterState, bounds: PriceBounds) -> FilteredResult {
    let products = apply(products, state);
    let active_filter_count = active_filter_count(state, bounds);
    tracing::debug!(matched = products.len(), active = active_filter_count, "filter evaluated");
    FilteredResult {
        products,
        active_filter_count,
    }
}
