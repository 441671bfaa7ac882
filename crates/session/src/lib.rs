//! Shopper session state: cart and wishlist.
//!
//! Sessions are explicit values held by a [`SessionStore`] that callers pass
//! around; nothing here reaches for ambient global storage.

pub mod cart;
pub mod store;
pub mod wishlist;

pub use cart::{Cart, CartLine, MAX_LINE_QUANTITY};
pub use store::{DEFAULT_IDLE_TTL_SECS, InMemorySessionStore, Session, SessionStore};
pub use wishlist::Wishlist;
