use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_catalog::Product;
use lumiere_core::{DomainError, DomainResult, ProductId};

/// Upper limit for the quantity of a single cart line.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Cart line: product snapshot, quantity, unit price at the time it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

fn check_quantity(quantity: u32) -> DomainResult<()> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::validation(format!(
            "quantity cannot exceed {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32, now: DateTime<Utc>) -> DomainResult<&CartLine> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if !product.in_stock {
            return Err(DomainError::invariant(format!(
                "product {} is out of stock",
                product.id
            )));
        }

        let index = match self.lines.iter().position(|l| l.product_id == product.id) {
            Some(index) => {
                let merged = self.lines[index].quantity.saturating_add(quantity);
                check_quantity(merged)?;
                self.lines[index].quantity = merged;
                index
            }
            None => {
                check_quantity(quantity)?;
                self.lines.push(CartLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    slug: product.slug.clone(),
                    unit_price: product.price,
                    quantity,
                    added_at: now,
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    /// Set a line's quantity; 0 removes the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> DomainResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| &l.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(format!("cart line {product_id}")))?;

        if quantity == 0 {
            self.lines.remove(index);
            return Ok(());
        }
        check_quantity(quantity)?;
        self.lines[index].quantity = quantity;
        Ok(())
    }

    /// Remove a line; returns whether it existed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
