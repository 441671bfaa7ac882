//! Facet counts shown next to each selectable filter value.
//!
//! Counts are disjunctive: the count for a value of one facet is computed
//! against every *other* active facet, so it tells the shopper how many
//! products they would see after selecting that value on its own.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::filter::{Facet, FilterState, apply_except};
use crate::product::Product;

/// Rating floors offered as "N★ & up" buckets.
pub const RATING_BUCKETS: [u8; 4] = [4, 3, 2, 1];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FacetCounts {
    /// Keyed by the first-seen spelling of each category label.
    pub categories: BTreeMap<String, usize>,
    /// Keyed by rating floor.
    pub ratings: BTreeMap<u8, usize>,
    pub in_stock: usize,
    pub featured: usize,
    pub bestseller: usize,
    pub new_launch: usize,
}

impl FacetCounts {
    /// Count for a category label, matched case-insensitively.
    pub fn category(&self, label: &str) -> usize {
        let label = label.trim().to_lowercase();
        self.categories
            .iter()
            .find(|(name, _)| name.to_lowercase() == label)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

fn count_flag(products: &[Product], state: &FilterState, facet: Facet, flag: fn(&Product) -> bool) -> usize {
    apply_except(products, state, facet)
        .into_iter()
        .filter(|p| flag(p))
        .count()
}

pub fn facet_counts(products: &[Product], state: &FilterState) -> FacetCounts {
    let mut labels: HashMap<String, String> = HashMap::new();
    let mut categories = BTreeMap::new();
    for product in apply_except(products, state, Facet::Category) {
        let label = product.category.trim();
        let display = labels
            .entry(label.to_lowercase())
            .or_insert_with(|| label.to_string());
        *categories.entry(display.clone()).or_insert(0) += 1;
    }

    let rated = apply_except(products, state, Facet::Rating);
    let ratings = RATING_BUCKETS
        .into_iter()
        .map(|floor| {
            let n = rated
                .iter()
                .filter(|p| p.rating >= f64::from(floor))
                .count();
            (floor, n)
        })
        .collect();

    FacetCounts {
        categories,
        ratings,
        in_stock: count_flag(products, state, Facet::InStock, |p| p.in_stock),
        featured: count_flag(products, state, Facet::Featured, |p| p.featured),
        bestseller: count_flag(products, state, Facet::Bestseller, |p| p.bestseller),
        new_launch: count_flag(products, state, Facet::NewLaunch, |p| p.new_launch),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::filter::fixtures::*;
    use crate::filter::{apply, default_state};
    use proptest::prelude::*;

    #[test]
    fn category_counts_ignore_the_category_selection() {
        let products = vec![
            product("a", "Skincare", 100.0, 4.5, true),
            product("b", "skincare", 200.0, 3.5, true),
            product("c", "Makeup", 300.0, 4.8, false),
        ];
        let mut state = default_state(&products);
        state.categories.insert("makeup".to_string());

        let counts = facet_counts(&products, &state);
        assert_eq!(counts.categories.len(), 2);
        assert_eq!(counts.category("SKINCARE"), 2);
        assert_eq!(counts.category("makeup"), 1);
        assert_eq!(counts.category("fragrance"), 0);
    }

    #[test]
    fn flag_and_rating_counts_respect_other_facets() {
        let mut products = vec![
            product("a", "Skincare", 100.0, 4.5, true),
            product("b", "Skincare", 200.0, 3.5, true),
            product("c", "Makeup", 300.0, 4.8, false),
        ];
        products[2].bestseller = true;
        products[0].bestseller = true;
        let mut state = default_state(&products);
        state.in_stock = true;

        let counts = facet_counts(&products, &state);
        assert_eq!(counts.bestseller, 1);
        assert_eq!(counts.in_stock, 2);
        assert_eq!(counts.ratings[&4], 1);
        assert_eq!(counts.ratings[&3], 2);
        assert_eq!(counts.ratings[&1], 2);
    }

    proptest! {
        /// Property: a category's count equals the result size when only that
        /// category is selected.
        #[test]
        fn category_count_matches_single_selection(
            products in any_products(),
            state in any_state(),
        ) {
            let counts = facet_counts(&products, &state);
            for (label, count) in &counts.categories {
                let mut single = state.clone();
                single.categories = BTreeSet::from([label.clone()]);
                prop_assert_eq!(apply(&products, &single).len(), *count);
            }
        }

        /// Property: each flag count equals the result size with that toggle on.
        #[test]
        fn flag_counts_match_toggled_state(products in any_products(), state in any_state()) {
            let counts = facet_counts(&products, &state);

            let mut toggled = state.clone();
            toggled.in_stock = true;
            prop_assert_eq!(apply(&products, &toggled).len(), counts.in_stock);

            let mut toggled = state.clone();
            toggled.featured = true;
            prop_assert_eq!(apply(&products, &toggled).len(), counts.featured);

            let mut toggled = state.clone();
            toggled.bestseller = true;
            prop_assert_eq!(apply(&products, &toggled).len(), counts.bestseller);

            let mut toggled = state.clone();
            toggled.new_launch = true;
            prop_assert_eq!(apply(&products, &toggled).len(), counts.new_launch);
        }
    }
}
