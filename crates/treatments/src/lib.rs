//! Treatments domain module (event-sourced).
//!
//! This crate contains business rules for wound treatments and the financial
//! calculator that derives billable/invoice amounts from them, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod financials;
pub mod treatment;

pub use financials::{compute_financials, sanitize_wound_area, TreatmentFinancials, INVOICE_RATE_BPS};
pub use treatment::{
    CancelTreatment, CompleteTreatment, RecordTreatment, Treatment, TreatmentCancelled,
    TreatmentCommand, TreatmentCompleted, TreatmentEvent, TreatmentId, TreatmentRecorded,
    TreatmentStatus, UpdateWoundArea, WoundAreaUpdated,
};
