use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use lumiere_core::DomainError;

use crate::product::Product;

/// Listing order. All orders are stable, so ties keep catalogue order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Featured products first, otherwise catalogue order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Highest rating first; ties broken by review count.
    Rating,
    /// Most recently added first; undated products last.
    Newest,
    Name,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::Featured,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
        SortOrder::Rating,
        SortOrder::Newest,
        SortOrder::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Featured => "featured",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::Rating => "rating",
            SortOrder::Newest => "newest",
            SortOrder::Name => "name",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Featured => b.featured.cmp(&a.featured),
            SortOrder::PriceAsc => a.price.total_cmp(&b.price),
            SortOrder::PriceDesc => b.price.total_cmp(&a.price),
            SortOrder::Rating => b
                .rating
                .total_cmp(&a.rating)
                .then_with(|| b.review_count.cmp(&a.review_count)),
            SortOrder::Newest => match (a.created_at, b.created_at) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }

    pub fn sort(&self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = SortOrder::ALL.iter().map(SortOrder::as_str).collect();
                DomainError::validation(format!(
                    "unknown sort order {s:?}; expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}
