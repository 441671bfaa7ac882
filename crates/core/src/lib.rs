//! `lumiere-core`: storefront domain foundation.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error model, typed identifiers and the numeric parsing policy
//! applied to catalogue records.

pub mod entity;
pub mod error;
pub mod id;
pub mod numeric;

pub use entity::{find_duplicate_id, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ProductId, SessionId};
pub use numeric::{parse_price, parse_rating, MAX_RATING};
