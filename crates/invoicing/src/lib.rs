//! Invoicing domain module (event-sourced).
//!
//! This crate contains business rules for invoices raised from treatments:
//! the status lifecycle, payment-date capture, and the commission split
//! snapshot, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod invoice;

pub use invoice::{
    AssignmentsRevised, Invoice, InvoiceCommand, InvoiceEvent, InvoiceId, InvoiceIssued,
    InvoiceStatus, IssueInvoice, ReviseAssignments, StatusChanged, TransitionStatus,
};
