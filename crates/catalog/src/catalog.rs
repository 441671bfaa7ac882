use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use lumiere_core::{DomainError, DomainResult, ProductId, find_duplicate_id};

use crate::product::{Category, Product};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Serialized catalogue document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Immutable, validated product catalogue.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Validate and build a catalogue.
    ///
    /// Product ids and slugs must be unique, as must category ids and slugs.
    /// When categories are listed, every product must belong to one of them
    /// and its category label is rewritten to that category's name.
    pub fn new(categories: Vec<Category>, mut products: Vec<Product>) -> DomainResult<Self> {
        if let Some(id) = find_duplicate_id(&products) {
            return Err(DomainError::conflict(format!("duplicate product id {id}")));
        }
        if let Some(id) = find_duplicate_id(&categories) {
            return Err(DomainError::conflict(format!("duplicate category id {id}")));
        }
        if let Some(slug) = first_duplicate(products.iter().map(|p| p.slug.as_str())) {
            return Err(DomainError::conflict(format!("duplicate product slug {slug}")));
        }
        if let Some(slug) = first_duplicate(categories.iter().map(|c| c.slug.as_str())) {
            return Err(DomainError::conflict(format!("duplicate category slug {slug}")));
        }

        // Product labels may name a category or its slug; store the name so
        // filtering and facet counts see one label per category.
        if !categories.is_empty() {
            for product in &mut products {
                let Some(category) = categories.iter().find(|c| c.matches_label(&product.category)) else {
                    return Err(DomainError::validation(format!(
                        "product {}: unknown category {:?}",
                        product.id, product.category
                    )));
                };
                if product.category != category.name {
                    product.category = category.name.clone();
                }
            }
        }

        Ok(Self {
            categories,
            products,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self::new(doc.categories, doc.products)?;
        tracing::info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            "catalogue loaded"
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Category named by `label`, either its name or its slug.
    pub fn category_by_label(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches_label(label))
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        let slug = slug.trim().to_lowercase();
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products listed under the category with `slug`, in catalogue order.
    pub fn products_in_category(&self, slug: &str) -> DomainResult<Vec<Product>> {
        let category = self
            .category_by_slug(slug)
            .ok_or_else(|| DomainError::not_found(format!("category {slug}")))?;
        Ok(self
            .products
            .iter()
            .filter(|p| category.matches_label(&p.category))
            .cloned()
            .collect())
    }

    /// Every category with the number of products it holds.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let n = self
                    .products
                    .iter()
                    .filter(|p| c.matches_label(&p.category))
                    .count();
                (c, n)
            })
            .collect()
    }
}

fn first_duplicate<'a>(mut values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values.find(|v| !seen.insert(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::facets::facet_counts;
    use crate::filter::{apply, default_state};

    fn document() -> serde_json::Value {
        json!({
            "categories": [
                { "id": 1, "name": "Skincare" },
                { "id": 2, "name": "Makeup", "slug": "makeup" }
            ],
            "products": [
                { "id": 1, "name": "Vitamin C Serum", "category": "Skincare", "price": 545, "rating": 4.6 },
                { "id": 2, "name": "Rose Toner", "category": "skincare", "price": "425", "rating": "4.4" },
                { "id": 3, "name": "Matte Lipstick", "category": "Makeup", "price": 385, "rating": 4.5, "inStock": false }
            ]
        })
    }

    #[test]
    fn loads_and_indexes_a_document() {
        let catalog = Catalog::from_json(&document().to_string()).unwrap();
        assert_eq!(catalog.products().len(), 3);
        assert_eq!(catalog.category_by_slug("SKINCARE").unwrap().name, "Skincare");
        assert_eq!(catalog.product_by_slug("rose-toner").unwrap().price, 425.0);
        assert!(catalog.product_by_id(&ProductId::parse("3").unwrap()).is_some());

        let skincare = catalog.products_in_category("skincare").unwrap();
        assert_eq!(skincare.len(), 2);

        let counts: Vec<(String, usize)> = catalog
            .category_counts()
            .into_iter()
            .map(|(c, n)| (c.slug.clone(), n))
            .collect();
        assert_eq!(counts, vec![("skincare".to_string(), 2), ("makeup".to_string(), 1)]);
    }

    #[test]
    fn unknown_category_slug_is_not_found() {
        let catalog = Catalog::from_json(&document().to_string()).unwrap();
        let err = catalog.products_in_category("fragrance").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn rejects_duplicate_product_ids() {
        let mut doc = document();
        doc["products"][2]["id"] = json!(1);
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::Conflict(msg)) if msg.contains("product id 1")));
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let mut doc = document();
        doc["products"][2]["slug"] = json!("rose-toner");
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::Conflict(_))));
    }

    #[test]
    fn rejects_products_outside_listed_categories() {
        let mut doc = document();
        doc["products"][0]["category"] = json!("Fragrance");
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::Validation(msg)) if msg.contains("Fragrance")));
    }

    #[test]
    fn category_list_is_optional() {
        let doc = json!({ "products": [
            { "id": "a", "name": "Kajal", "category": "Eyes", "price": 99 }
        ]});
        let catalog = Catalog::from_json(&doc.to_string()).unwrap();
        assert!(catalog.categories().is_empty());
        assert_eq!(catalog.products().len(), 1);
    }

    #[test]
    fn malformed_numbers_fail_to_parse() {
        let mut doc = document();
        doc["products"][1]["rating"] = json!("four");
        let err = Catalog::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(err.to_string().contains("product 2"));
    }

    #[test]
    fn slug_labels_resolve_to_the_category_name() {
        let doc = json!({
            "categories": [
                { "id": 1, "name": "Bath & Body" },
                { "id": 2, "name": "Skincare" }
            ],
            "products": [
                { "id": 1, "name": "Shea Body Butter", "category": "Bath & Body", "price": 450 },
                { "id": 2, "name": "Coffee Body Scrub", "category": "bath-body", "price": 399 },
                { "id": 3, "name": "Aloe Gel", "category": "SKINCARE", "price": 199 }
            ]
        });
        let catalog = Catalog::from_json(&doc.to_string()).unwrap();
        assert!(catalog.products()[..2].iter().all(|p| p.category == "Bath & Body"));
        assert_eq!(catalog.products()[2].category, "Skincare");
        assert_eq!(catalog.category_by_label("bath-body").unwrap().name, "Bath & Body");

        let page = catalog.products_in_category("bath-body").unwrap();
        assert_eq!(page.len(), 2);

        let mut state = default_state(catalog.products());
        state.categories.insert("Bath & Body".to_string());
        assert_eq!(apply(catalog.products(), &state).len(), 2);

        let counts = facet_counts(catalog.products(), &default_state(catalog.products()));
        assert_eq!(counts.categories.len(), 2);
        assert_eq!(counts.category("bath & body"), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path("/nonexistent/catalogue.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { ref path, .. } if path.contains("catalogue.json")));
    }
}
