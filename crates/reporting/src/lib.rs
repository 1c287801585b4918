//! Commission reporting module.
//!
//! Derives semimonthly commission payment periods from closed invoices and
//! produces the flat row shape consumed by the external CSV-writer
//! collaborator. Everything here is computed on demand from the supplied
//! invoices; nothing is persisted.

pub mod export;
pub mod period;

pub use export::{export_rows, CommissionExportRow};
pub use period::{aggregate_periods, CommissionPaymentPeriod, SemimonthlyWindow};
