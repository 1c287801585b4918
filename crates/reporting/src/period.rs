use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use graftcrm_invoicing::{Invoice, InvoiceId};
use graftcrm_reps::RepresentativeId;

/// One of the two fixed payroll windows in a month.
///
/// The first half runs day 1 through day 15 inclusive (payout on the 15th);
/// the second half runs day 16 through the last calendar day (payout on that
/// last day). Commissions are paid on the fixed payout date regardless of
/// when within the window the invoice was actually paid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemimonthlyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub payout_date: NaiveDate,
}

impl SemimonthlyWindow {
    /// The window containing `date`. The 15th belongs to the first half.
    pub fn containing(date: NaiveDate) -> Self {
        let first_of_month = date.with_day(1).unwrap_or(date);
        let mid_month = date.with_day(15).unwrap_or(date);

        if date.day() <= 15 {
            Self {
                start: first_of_month,
                end: mid_month,
                payout_date: mid_month,
            }
        } else {
            let month_end = last_day_of_month(date);
            Self {
                start: date.with_day(16).unwrap_or(date),
                end: month_end,
                payout_date: month_end,
            }
        }
    }
}

/// Last calendar day of `date`'s month (first of the next month, minus a day).
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// A representative's commission payout for one semimonthly window.
///
/// Derived on demand from closed invoices; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPaymentPeriod {
    pub representative_id: RepresentativeId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Fixed semimonthly payout date (the 15th or the last day of the month).
    pub payment_date: NaiveDate,
    pub invoice_ids: Vec<InvoiceId>,
    /// Sum of this representative's commission amounts in the window, in cents.
    pub total_commission: u64,
}

impl CommissionPaymentPeriod {
    /// Number of distinct invoices contributing to this period.
    pub fn invoice_count(&self) -> usize {
        self.invoice_ids.len()
    }
}

/// The date that buckets an invoice into a payroll window.
///
/// Closed invoices normally carry a payment date; legacy event streams that
/// closed without one fall back to the invoice date.
fn reference_date(invoice: &Invoice) -> Option<NaiveDate> {
    invoice.payment_date().or(invoice.invoice_date())
}

/// Group closed invoices into semimonthly commission payment periods.
///
/// One period per (representative, window) combination with at least one
/// invoice, sorted descending by payout date (most recent payroll run first).
pub fn aggregate_periods(invoices: &[Invoice]) -> Vec<CommissionPaymentPeriod> {
    struct Bucket {
        window: SemimonthlyWindow,
        invoice_ids: Vec<InvoiceId>,
        total_commission: u64,
    }

    let mut buckets: HashMap<(RepresentativeId, NaiveDate), Bucket> = HashMap::new();

    for invoice in invoices.iter().filter(|invoice| invoice.is_closed()) {
        let Some(reference) = reference_date(invoice) else {
            continue;
        };
        let window = SemimonthlyWindow::containing(reference);

        for assignment in invoice.assignments() {
            let bucket = buckets
                .entry((assignment.representative_id, window.payout_date))
                .or_insert_with(|| Bucket {
                    window,
                    invoice_ids: Vec::new(),
                    total_commission: 0,
                });
            if !bucket.invoice_ids.contains(&invoice.id_typed()) {
                bucket.invoice_ids.push(invoice.id_typed());
            }
            bucket.total_commission += assignment.commission_amount;
        }
    }

    let mut periods: Vec<CommissionPaymentPeriod> = buckets
        .into_iter()
        .map(|((representative_id, payment_date), bucket)| CommissionPaymentPeriod {
            representative_id,
            period_start: bucket.window.start,
            period_end: bucket.window.end,
            payment_date,
            invoice_ids: bucket.invoice_ids,
            total_commission: bucket.total_commission,
        })
        .collect();

    periods.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| a.representative_id.cmp(&b.representative_id))
    });

    periods
}
