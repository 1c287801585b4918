use chrono::NaiveDate;
use serde::Serialize;

use graftcrm_core::DomainResult;
use graftcrm_invoicing::Invoice;
use graftcrm_reps::RepresentativeDirectory;

use crate::period::SemimonthlyWindow;

/// One export row per (closed invoice, commission assignment).
///
/// The field order is a compatibility contract with downstream spreadsheets;
/// serde serializes struct fields in declaration order, so do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionExportRow {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    /// Invoice amount (the payable figure commissions are computed from), in cents.
    pub invoice_total: u64,
    pub invoice_payment_date: Option<NaiveDate>,
    /// Fixed semimonthly payout date for the representative's commission.
    pub commission_payment_date: NaiveDate,
    /// Representative's rate as a percentage (e.g. 15.0).
    pub representative_commission_rate: f64,
    /// Representative's commission in cents.
    pub representative_commission_amount: u64,
    pub representative_name: String,
    /// The house remainder pays out on the same payroll schedule.
    pub house_payment_date: NaiveDate,
}

/// Build the flat export rows for all closed invoices.
///
/// An assignment referencing a representative missing from the directory is
/// a data-integrity failure, not a blank cell.
pub fn export_rows(
    invoices: &[Invoice],
    directory: &RepresentativeDirectory,
) -> DomainResult<Vec<CommissionExportRow>> {
    let mut rows = Vec::new();

    for invoice in invoices.iter().filter(|invoice| invoice.is_closed()) {
        let Some(invoice_date) = invoice.invoice_date() else {
            continue;
        };
        let reference = invoice.payment_date().unwrap_or(invoice_date);
        let window = SemimonthlyWindow::containing(reference);

        for assignment in invoice.assignments() {
            let representative_name = directory
                .resolve_name(assignment.representative_id)?
                .to_string();

            rows.push(CommissionExportRow {
                invoice_number: invoice.invoice_number().to_string(),
                invoice_date,
                invoice_total: invoice.invoice_amount(),
                invoice_payment_date: invoice.payment_date(),
                commission_payment_date: window.payout_date,
                representative_commission_rate: assignment.commission_rate_bps as f64 / 100.0,
                representative_commission_amount: assignment.commission_amount,
                representative_name,
                house_payment_date: window.payout_date,
            });
        }
    }

    // Most recent payroll run first, stable within a run.
    rows.sort_by(|a, b| {
        b.commission_payment_date
            .cmp(&a.commission_payment_date)
            .then_with(|| a.invoice_number.cmp(&b.invoice_number))
    });

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use graftcrm_commissions::AssignmentDraft;
    use graftcrm_core::{Aggregate, AggregateId, DomainError};
    use graftcrm_invoicing::{InvoiceCommand, InvoiceId, InvoiceStatus, IssueInvoice, TransitionStatus};
    use graftcrm_reps::RepresentativeId;
    use graftcrm_treatments::{TreatmentFinancials, TreatmentId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn closed_invoice(
        number: &str,
        rep_id: RepresentativeId,
        rate_bps: u32,
        paid_on: NaiveDate,
    ) -> Invoice {
        let invoice_id = InvoiceId::new(AggregateId::new());
        let mut invoice = Invoice::empty(invoice_id);
        let cmd = IssueInvoice {
            invoice_id,
            treatment_id: TreatmentId::new(AggregateId::new()),
            treatment_date: date(2024, 3, 1),
            invoice_number: number.to_string(),
            financials: TreatmentFinancials {
                total_billable: 1_190_440,
                invoice_amount: 714_264,
            },
            invoice_date: date(2024, 3, 4),
            due_date: date(2024, 4, 3),
            assignments: vec![AssignmentDraft {
                representative_id: rep_id,
                commission_rate_bps: rate_bps,
            }],
            occurred_at: test_time(),
        };
        let events = invoice.handle(&InvoiceCommand::IssueInvoice(cmd)).unwrap();
        invoice.apply(&events[0]);

        let close = TransitionStatus {
            invoice_id,
            target: InvoiceStatus::Closed,
            payment_date: Some(paid_on),
            occurred_at: test_time(),
        };
        let events = invoice
            .handle(&InvoiceCommand::TransitionStatus(close))
            .unwrap();
        invoice.apply(&events[0]);
        invoice
    }

    fn directory_with(rep_id: RepresentativeId, name: &str) -> RepresentativeDirectory {
        let mut directory = RepresentativeDirectory::default();
        directory.insert(rep_id, name);
        directory
    }

    #[test]
    fn produces_one_row_per_closed_invoice_assignment() {
        let rep_id = RepresentativeId::new(AggregateId::new());
        let invoice = closed_invoice("INV-3001", rep_id, 1_500, date(2024, 3, 10));
        let directory = directory_with(rep_id, "Dana Reyes");

        let rows = export_rows(&[invoice], &directory).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.invoice_number, "INV-3001");
        assert_eq!(row.invoice_date, date(2024, 3, 4));
        assert_eq!(row.invoice_total, 714_264);
        assert_eq!(row.invoice_payment_date, Some(date(2024, 3, 10)));
        assert_eq!(row.commission_payment_date, date(2024, 3, 15));
        assert_eq!(row.representative_commission_rate, 15.0);
        assert_eq!(row.representative_commission_amount, 107_140);
        assert_eq!(row.representative_name, "Dana Reyes");
        assert_eq!(row.house_payment_date, date(2024, 3, 15));
    }

    #[test]
    fn open_invoices_produce_no_rows() {
        let rep_id = RepresentativeId::new(AggregateId::new());
        let invoice_id = InvoiceId::new(AggregateId::new());
        let mut invoice = Invoice::empty(invoice_id);
        let cmd = IssueInvoice {
            invoice_id,
            treatment_id: TreatmentId::new(AggregateId::new()),
            treatment_date: date(2024, 3, 1),
            invoice_number: "INV-3002".to_string(),
            financials: TreatmentFinancials {
                total_billable: 1_190_440,
                invoice_amount: 714_264,
            },
            invoice_date: date(2024, 3, 4),
            due_date: date(2024, 4, 3),
            assignments: vec![AssignmentDraft {
                representative_id: rep_id,
                commission_rate_bps: 1_500,
            }],
            occurred_at: test_time(),
        };
        let events = invoice.handle(&InvoiceCommand::IssueInvoice(cmd)).unwrap();
        invoice.apply(&events[0]);

        let directory = directory_with(rep_id, "Dana Reyes");
        let rows = export_rows(&[invoice], &directory).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn unknown_representative_fails_the_export() {
        let rep_id = RepresentativeId::new(AggregateId::new());
        let invoice = closed_invoice("INV-3003", rep_id, 1_500, date(2024, 3, 10));
        let directory = RepresentativeDirectory::default();

        let err = export_rows(&[invoice], &directory).unwrap_err();
        match err {
            DomainError::MissingReference(_) => {}
            _ => panic!("Expected MissingReference for unknown representative"),
        }
    }

    #[test]
    fn rows_are_sorted_most_recent_payroll_first() {
        let rep_id = RepresentativeId::new(AggregateId::new());
        let early = closed_invoice("INV-3004", rep_id, 1_500, date(2024, 3, 10));
        let late = closed_invoice("INV-3005", rep_id, 1_500, date(2024, 3, 20));
        let directory = directory_with(rep_id, "Dana Reyes");

        let rows = export_rows(&[early, late], &directory).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].invoice_number, "INV-3005");
        assert_eq!(rows[0].commission_payment_date, date(2024, 3, 31));
        assert_eq!(rows[1].invoice_number, "INV-3004");
        assert_eq!(rows[1].commission_payment_date, date(2024, 3, 15));
    }

    #[test]
    fn serialized_rows_keep_the_spreadsheet_column_order() {
        let rep_id = RepresentativeId::new(AggregateId::new());
        let invoice = closed_invoice("INV-3006", rep_id, 1_500, date(2024, 3, 10));
        let directory = directory_with(rep_id, "Dana Reyes");

        let rows = export_rows(&[invoice], &directory).unwrap();
        let json = serde_json::to_string(&rows[0]).unwrap();

        let columns = [
            "invoice_number",
            "invoice_date",
            "invoice_total",
            "invoice_payment_date",
            "commission_payment_date",
            "representative_commission_rate",
            "representative_commission_amount",
            "representative_name",
            "house_payment_date",
        ];
        let positions: Vec<usize> = columns
            .iter()
            .map(|column| json.find(&format!("\"{column}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
