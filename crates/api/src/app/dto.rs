use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use lumiere_catalog::{BrowseSession, Catalog, Category, Page, PriceRange, SortOrder};
use lumiere_core::DomainResult;
use lumiere_session::Session;

// -------------------------
// Request DTOs
// -------------------------

/// Query string of a product listing.
///
/// `category` is a comma-separated list of category labels.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    pub new_launch: Option<bool>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListingQuery {
    /// Apply the query's selections to a fresh browse session and return the
    /// page to render.
    ///
    /// Category labels naming a catalogue category by slug are resolved to
    /// its name. A bound the shopper left out falls back to the slider limit,
    /// widened so a lone `min_price` above the limit yields an empty page
    /// rather than an inverted range.
    pub fn apply_to(&self, session: &mut BrowseSession, catalog: &Catalog) -> DomainResult<Page> {
        let bounds = session.bounds();
        let mut state = session.state().clone();

        if let Some(raw) = &self.category {
            for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                let label = match catalog.category_by_label(label) {
                    Some(category) => category.name.clone(),
                    None => label.to_string(),
                };
                state.categories.insert(label);
            }
        }

        match (self.min_price, self.max_price) {
            (None, None) => {}
            (lo, hi) => {
                let lo = lo.unwrap_or(bounds.min);
                let hi = hi.unwrap_or_else(|| bounds.max.max(lo));
                state.price = PriceRange::new(lo, hi)?;
            }
        }

        if let Some(rating) = self.min_rating {
            state.set_min_rating(rating)?;
        }

        state.in_stock = self.in_stock.unwrap_or(false);
        state.featured = self.featured.unwrap_or(false);
        state.bestseller = self.bestseller.unwrap_or(false);
        state.new_launch = self.new_launch.unwrap_or(false);
        state.search = self.q.clone().unwrap_or_default();

        if let Some(sort) = &self.sort {
            session.set_sort(sort.parse::<SortOrder>()?);
        }
        session.update(|s| *s = state);

        Ok(Page::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(Page::DEFAULT_PER_PAGE),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

// -------------------------
// Response mapping
// -------------------------

pub fn category_to_json(category: &Category, product_count: usize) -> JsonValue {
    json!({
        "id": category.id.to_string(),
        "name": category.name,
        "slug": category.slug,
        "description": category.description,
        "image": category.image,
        "product_count": product_count,
    })
}

pub fn session_to_json(session: &Session) -> JsonValue {
    json!({
        "id": session.id.to_string(),
        "cart": {
            "lines": session.cart.lines(),
            "item_count": session.cart.item_count(),
            "subtotal": session.cart.subtotal(),
        },
        "wishlist": session.wishlist.items(),
        "created_at": session.created_at.to_rfc3339(),
        "updated_at": session.updated_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_catalog::Facet;
    use serde_json::json;

    use crate::app::services::SEED_CATALOG;

    fn catalog() -> Catalog {
        Catalog::from_json(SEED_CATALOG).unwrap()
    }

    fn session() -> BrowseSession {
        BrowseSession::new(catalog().products().to_vec())
    }

    #[test]
    fn empty_query_leaves_state_inactive() {
        let mut browse = session();
        let page = ListingQuery::default().apply_to(&mut browse, &catalog()).unwrap();
        assert_eq!(page, Page::default());
        assert_eq!(browse.active_filter_count(), 0);
    }

    #[test]
    fn query_maps_onto_filter_state() {
        let mut browse = session();
        let query = ListingQuery {
            category: Some("Skincare, makeup,,".to_string()),
            max_price: Some(600.0),
            min_rating: Some(4.0),
            in_stock: Some(true),
            q: Some("serum".to_string()),
            sort: Some("price_desc".to_string()),
            page: Some(2),
            per_page: Some(5),
            ..ListingQuery::default()
        };
        let page = query.apply_to(&mut browse, &catalog()).unwrap();

        assert_eq!(page, Page::new(2, 5));
        assert_eq!(browse.state().categories.len(), 2);
        assert_eq!(browse.state().price, PriceRange { lo: 0.0, hi: 600.0 });
        assert_eq!(browse.sort_order(), SortOrder::PriceDesc);
        assert_eq!(
            browse.state().active_facets(browse.bounds()),
            vec![Facet::Category, Facet::Price, Facet::Rating, Facet::InStock, Facet::Search]
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let inverted = ListingQuery {
            min_price: Some(900.0),
            max_price: Some(100.0),
            ..ListingQuery::default()
        };
        assert!(inverted.apply_to(&mut session(), &catalog()).is_err());

        let rating = ListingQuery {
            min_rating: Some(9.0),
            ..ListingQuery::default()
        };
        assert!(rating.apply_to(&mut session(), &catalog()).is_err());

        let sort = ListingQuery {
            sort: Some("cheapest".to_string()),
            ..ListingQuery::default()
        };
        assert!(sort.apply_to(&mut session(), &catalog()).is_err());
    }

    #[test]
    fn lone_min_price_above_the_limit_matches_nothing() {
        let catalog = catalog();
        let mut browse = BrowseSession::new(catalog.products_in_category("skincare").unwrap());
        assert_eq!(browse.bounds().max, 700.0);

        let query = ListingQuery {
            min_price: Some(800.0),
            ..ListingQuery::default()
        };
        query.apply_to(&mut browse, &catalog).unwrap();

        assert_eq!(browse.state().price, PriceRange { lo: 800.0, hi: 800.0 });
        assert_eq!(browse.active_filter_count(), 1);
        assert!(browse.results().is_empty());
    }

    #[test]
    fn lone_max_price_keeps_the_lower_limit() {
        let mut browse = session();
        let query = ListingQuery {
            max_price: Some(300.0),
            ..ListingQuery::default()
        };
        query.apply_to(&mut browse, &catalog()).unwrap();
        assert_eq!(browse.state().price, PriceRange { lo: 0.0, hi: 300.0 });
        assert_eq!(browse.results().len(), 2);
    }

    #[test]
    fn category_slugs_resolve_to_catalogue_names() {
        let doc = json!({
            "categories": [
                { "id": 1, "name": "Bath & Body" },
                { "id": 2, "name": "Skincare" }
            ],
            "products": [
                { "id": 1, "name": "Shea Body Butter", "category": "Bath & Body", "price": 450 },
                { "id": 2, "name": "Coffee Body Scrub", "category": "bath-body", "price": 399 },
                { "id": 3, "name": "Aloe Gel", "category": "Skincare", "price": 199 }
            ]
        });
        let catalog = Catalog::from_json(&doc.to_string()).unwrap();

        for raw in ["bath-body", "Bath & Body"] {
            let mut browse = BrowseSession::new(catalog.products().to_vec());
            let query = ListingQuery {
                category: Some(raw.to_string()),
                ..ListingQuery::default()
            };
            query.apply_to(&mut browse, &catalog).unwrap();

            let view = browse.view(Page::default());
            assert_eq!(view.total, 2);
            assert_eq!(view.facets.categories.len(), 2);
            assert_eq!(view.facets.category("Bath & Body"), 2);
        }
    }
}
