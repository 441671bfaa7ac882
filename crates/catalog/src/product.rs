use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lumiere_core::{CategoryId, DomainError, Entity, ProductId, parse_price, parse_rating};

/// Catalogue product record.
///
/// Records are owned by the catalogue; browsing code only ever reads them.
/// Deserialization goes through [`ProductRecord`] so that `price` and
/// `rating` follow the numeric parsing policy in `lumiere_core::numeric`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub rating: f64,
    pub review_count: u32,
    pub in_stock: bool,
    pub featured: bool,
    pub bestseller: bool,
    pub new_launch: bool,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Minimal in-stock product with no flags set; other fields can be
    /// filled in with struct update syntax.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        rating: f64,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            slug: slugify(&name),
            name,
            category: category.into(),
            subcategory: None,
            brand: None,
            price,
            original_price: None,
            rating,
            review_count: 0,
            in_stock: true,
            featured: false,
            bestseller: false,
            new_launch: false,
            description: String::new(),
            tags: Vec::new(),
            created_at: None,
        }
    }

    /// Whether `label` names this product's category (case-insensitive).
    pub fn in_category(&self, label: &str) -> bool {
        self.category.trim().to_lowercase() == label.trim().to_lowercase()
    }

    /// Discount relative to `original_price`, as a whole percentage.
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price?;
        if original <= self.price || original <= 0.0 {
            return None;
        }
        let pct = ((original - self.price) / original * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Catalogue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CategoryRecord")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            slug: slugify(&name),
            name,
            description: None,
            image: None,
        }
    }

    /// Whether a product label refers to this category, by name or slug.
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        label == self.name.to_lowercase() || label == self.slug
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// URL slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Wire shape of a product as catalogue sources deliver it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: Value,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    price: Value,
    #[serde(default)]
    original_price: Option<Value>,
    #[serde(default)]
    rating: Option<Value>,
    #[serde(default, alias = "reviews")]
    review_count: u32,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    bestseller: bool,
    #[serde(default)]
    new_launch: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

fn default_in_stock() -> bool {
    true
}

fn parse_id<T>(value: &Value, parse: fn(String) -> Result<T, DomainError>) -> Result<T, DomainError> {
    match value {
        Value::String(s) => parse(s.clone()),
        Value::Number(n) => parse(n.to_string()),
        _ => Err(DomainError::invalid_id("expected a string or number")),
    }
}

fn field_error(product: &str, field: &str, err: DomainError) -> DomainError {
    let detail = match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => msg,
        other => other.to_string(),
    };
    DomainError::validation(format!("product {product}: {field}: {detail}"))
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = parse_id(&record.id, |s| ProductId::parse(s))
            .map_err(|e| field_error(&record.name, "id", e))?;

        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation(format!("product {id}: name cannot be empty")));
        }
        let category = record.category.trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation(format!("product {id}: category cannot be empty")));
        }

        let price = parse_price(&record.price).map_err(|e| field_error(id.as_str(), "price", e))?;
        let original_price = record
            .original_price
            .as_ref()
            .map(parse_price)
            .transpose()
            .map_err(|e| field_error(id.as_str(), "originalPrice", e))?;
        let rating = record
            .rating
            .as_ref()
            .map(parse_rating)
            .transpose()
            .map_err(|e| field_error(id.as_str(), "rating", e))?
            .unwrap_or(0.0);

        let slug = match record.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(&name),
        };

        Ok(Self {
            id,
            name,
            slug,
            category,
            subcategory: record.subcategory,
            brand: record.brand,
            price,
            original_price,
            rating,
            review_count: record.review_count,
            in_stock: record.in_stock,
            featured: record.featured,
            bestseller: record.bestseller,
            new_launch: record.new_launch,
            description: record.description,
            tags: record.tags,
            created_at: record.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: Value,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = DomainError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        let id = parse_id(&record.id, |s| CategoryId::parse(s))
            .map_err(|e| DomainError::validation(format!("category {}: id: {e}", record.name)))?;
        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation(format!("category {id}: name cannot be empty")));
        }
        let slug = match record.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => slugify(&name),
        };
        Ok(Self {
            id,
            name,
            slug,
            description: record.description,
            image: record.image,
        })
    }
}
