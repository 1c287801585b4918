use serde::{Deserialize, Serialize};

use graftcrm_core::ValueObject;

/// Composite identity of a graft product.
///
/// There is no surrogate id for catalog entries; manufacturer + product name +
/// billing code together identify a priced product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub manufacturer: String,
    pub product_name: String,
    pub billing_code: String,
}

impl core::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{} [{}]",
            self.manufacturer, self.product_name, self.billing_code
        )
    }
}

impl ValueObject for ProductKey {}

/// A priced graft product (immutable reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraftProduct {
    pub manufacturer: String,
    pub product_name: String,
    /// Price per square centimetre in smallest currency unit (e.g., cents).
    pub price_per_sq_cm: u64,
    pub billing_code: String,
}

impl GraftProduct {
    /// Composite identity of this product.
    pub fn key(&self) -> ProductKey {
        ProductKey {
            manufacturer: self.manufacturer.clone(),
            product_name: self.product_name.clone(),
            billing_code: self.billing_code.clone(),
        }
    }
}

impl ValueObject for GraftProduct {}
