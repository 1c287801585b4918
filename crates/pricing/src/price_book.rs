use std::collections::HashMap;

use graftcrm_core::{DomainError, DomainResult};

use crate::product::{GraftProduct, ProductKey};

/// Indexed lookup of graft products by composite identity.
///
/// An unresolvable product reference is a data-integrity problem and fails
/// with `MissingReference`; it is never silently priced at zero. (Blank
/// numeric *input* is a different, deliberate case — see the financial
/// calculator.)
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    products: HashMap<ProductKey, GraftProduct>,
}

impl PriceBook {
    /// Build a price book from reference data.
    ///
    /// Rejects non-positive prices and duplicate product identities.
    pub fn load(products: impl IntoIterator<Item = GraftProduct>) -> DomainResult<Self> {
        let mut book = HashMap::new();
        for product in products {
            if product.price_per_sq_cm == 0 {
                return Err(DomainError::validation(format!(
                    "price must be positive for {}",
                    product.key()
                )));
            }
            let key = product.key();
            if book.insert(key.clone(), product).is_some() {
                return Err(DomainError::conflict(format!(
                    "duplicate product entry {key}"
                )));
            }
        }
        Ok(Self { products: book })
    }

    /// Resolve a product reference, failing loudly on unknown identities.
    pub fn resolve(&self, key: &ProductKey) -> DomainResult<&GraftProduct> {
        self.products
            .get(key)
            .ok_or_else(|| DomainError::missing_reference(format!("unknown graft product {key}")))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over all catalog entries (order unspecified).
    pub fn iter(&self) -> impl Iterator<Item = &GraftProduct> {
        self.products.values()
    }
}
