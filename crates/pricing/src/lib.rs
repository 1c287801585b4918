//! Graft product pricing reference data.
//!
//! Immutable catalog of graft products with per-area prices and billing codes,
//! loaded once at startup and queried by composite product identity. Pure
//! lookup logic only: no IO, no HTTP, no storage.

pub mod price_book;
pub mod product;

pub use price_book::PriceBook;
pub use product::{GraftProduct, ProductKey};
