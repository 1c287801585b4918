//! Commission allocation domain module.
//!
//! Splits the fixed commission pool of an invoice across assigned sales
//! representatives and computes the residual house commission, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod allocation;

pub use allocation::{
    allocate_commissions, AssignmentDraft, CommissionAssignment, CommissionSplit,
    COMMISSION_POOL_RATE_BPS,
};
