//! Billable/invoice amount derivation for a treatment.
//!
//! Pure functions over explicit inputs. The derived values are persisted onto
//! the invoice at issue time; they are never recomputed lazily at read time.

use serde::{Deserialize, Serialize};

use graftcrm_core::{apply_rate_bps, ValueObject};

/// Fraction of the billable amount that becomes the invoiced/payable amount,
/// in basis points (60%).
pub const INVOICE_RATE_BPS: u32 = 6_000;

/// Derived treatment financials, in smallest currency unit (cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentFinancials {
    /// Wound area at treatment times the product's per-area price.
    pub total_billable: u64,
    /// The payable portion of the billable amount.
    pub invoice_amount: u64,
}

impl ValueObject for TreatmentFinancials {}

/// Coerce blank/malformed wound-area input to zero.
///
/// Form fields default to "0" until filled, so a negative or non-finite area
/// is normal mid-edit state, not an error. Unresolvable *references* (unknown
/// product) are a data-integrity failure instead — see the price book.
pub fn sanitize_wound_area(wound_area_sq_cm: f64) -> f64 {
    if wound_area_sq_cm.is_finite() && wound_area_sq_cm > 0.0 {
        wound_area_sq_cm
    } else {
        0.0
    }
}

/// Derive billable and invoice amounts from wound size and product price.
///
/// Re-run whenever the wound area or the selected product's price changes.
pub fn compute_financials(
    wound_area_sq_cm: f64,
    price_per_sq_cm: u64,
    invoice_rate_bps: u32,
) -> TreatmentFinancials {
    let area = sanitize_wound_area(wound_area_sq_cm);
    let total_billable = (area * price_per_sq_cm as f64).round() as u64;
    let invoice_amount = apply_rate_bps(total_billable, invoice_rate_bps);

    TreatmentFinancials {
        total_billable,
        invoice_amount,
    }
}
