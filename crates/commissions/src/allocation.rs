use serde::{Deserialize, Serialize};

use graftcrm_core::{apply_rate_bps, ValueObject};
use graftcrm_reps::RepresentativeId;

/// Fraction of the invoice amount set aside for commission distribution, in
/// basis points (40%).
pub const COMMISSION_POOL_RATE_BPS: u32 = 4_000;

/// Admin input: a representative and their rate, before amounts are computed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub representative_id: RepresentativeId,
    /// Representative's share of the invoice amount, in basis points.
    pub commission_rate_bps: u32,
}

/// A computed commission assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionAssignment {
    pub representative_id: RepresentativeId,
    pub commission_rate_bps: u32,
    /// Amount in smallest currency unit (e.g., cents).
    pub commission_amount: u64,
}

impl ValueObject for CommissionAssignment {}

/// The full result of allocating an invoice's commission pool.
///
/// The house commission is the pool residual, clamped at zero: if assigned
/// rates exceed the pool, the rep amounts are honored as entered and the
/// house receives nothing. Callers flag that condition by checking
/// `house_commission == 0` alongside a non-empty assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub assignments: Vec<CommissionAssignment>,
    /// The full commission pool for the invoice, in cents.
    pub pool: u64,
    /// Unallocated pool remainder owed to the house, in cents.
    pub house_commission: u64,
}

impl CommissionSplit {
    /// Legacy flat single-rep view.
    ///
    /// The predecessor schema carried one `salesRep`/`salesRepCommission`
    /// column pair per invoice. Consumers of that shape get the lone
    /// assignment projected out; with zero or several assignments there is
    /// no meaningful flat view.
    pub fn primary_rep(&self) -> Option<&CommissionAssignment> {
        match self.assignments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Sum of all representative commission amounts, in cents.
    pub fn total_assigned(&self) -> u64 {
        self.assignments
            .iter()
            .map(|a| a.commission_amount)
            .sum()
    }
}

/// Split an invoice's commission pool across representatives.
///
/// Always a full recomputation of every amount: the house commission depends
/// on the complete assignment set, so edits never patch a single entry.
pub fn allocate_commissions(
    invoice_amount: u64,
    drafts: &[AssignmentDraft],
    pool_rate_bps: u32,
) -> CommissionSplit {
    let pool = apply_rate_bps(invoice_amount, pool_rate_bps);

    let assignments: Vec<CommissionAssignment> = drafts
        .iter()
        .map(|draft| CommissionAssignment {
            representative_id: draft.representative_id,
            commission_rate_bps: draft.commission_rate_bps,
            commission_amount: apply_rate_bps(invoice_amount, draft.commission_rate_bps),
        })
        .collect();

    let assigned: u64 = assignments.iter().map(|a| a.commission_amount).sum();
    let house_commission = pool.saturating_sub(assigned);

    CommissionSplit {
        assignments,
        pool,
        house_commission,
    }
}
