//! Black-box run of the full billing pipeline: price book -> treatment ->
//! financials -> invoice -> status lifecycle -> period aggregation -> export.

use chrono::{DateTime, NaiveDate, Utc};

use graftcrm_commissions::{allocate_commissions, AssignmentDraft, COMMISSION_POOL_RATE_BPS};
use graftcrm_core::{Aggregate, AggregateId, PatientId};
use graftcrm_invoicing::{
    Invoice, InvoiceCommand, InvoiceId, InvoiceStatus, IssueInvoice, TransitionStatus,
};
use graftcrm_pricing::{GraftProduct, PriceBook};
use graftcrm_reporting::{aggregate_periods, export_rows};
use graftcrm_reps::{RepresentativeDirectory, RepresentativeId};
use graftcrm_treatments::{
    compute_financials, RecordTreatment, Treatment, TreatmentCommand, TreatmentId,
    INVOICE_RATE_BPS,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn price_book() -> PriceBook {
    PriceBook::load([GraftProduct {
        manufacturer: "Organogenesis".to_string(),
        product_name: "Dermagraft".to_string(),
        price_per_sq_cm: 119_044,
        billing_code: "Q4106".to_string(),
    }])
    .unwrap()
}

fn record_treatment(book: &PriceBook, wound_area_sq_cm: f64, treated_on: NaiveDate) -> Treatment {
    let treatment_id = TreatmentId::new(AggregateId::new());
    let mut treatment = Treatment::empty(treatment_id);
    let product = book.iter().next().unwrap().key();
    let events = treatment
        .handle(&TreatmentCommand::RecordTreatment(RecordTreatment {
            treatment_id,
            patient_id: PatientId::new(),
            product,
            wound_area_sq_cm,
            treatment_date: treated_on,
            occurred_at: now(),
        }))
        .unwrap();
    treatment.apply(&events[0]);
    treatment
}

fn invoice_for_treatment(
    book: &PriceBook,
    treatment: &Treatment,
    number: &str,
    rep_id: RepresentativeId,
    rate_bps: u32,
) -> Invoice {
    let product = book.resolve(treatment.product().unwrap()).unwrap();
    let financials = compute_financials(
        treatment.wound_area_sq_cm(),
        product.price_per_sq_cm,
        INVOICE_RATE_BPS,
    );

    let invoice_id = InvoiceId::new(AggregateId::new());
    let mut invoice = Invoice::empty(invoice_id);
    let treated_on = treatment.treatment_date().unwrap();
    let events = invoice
        .handle(&InvoiceCommand::IssueInvoice(IssueInvoice {
            invoice_id,
            treatment_id: treatment.id_typed(),
            treatment_date: treated_on,
            invoice_number: number.to_string(),
            financials,
            invoice_date: treated_on,
            due_date: date(2024, 4, 3),
            assignments: vec![AssignmentDraft {
                representative_id: rep_id,
                commission_rate_bps: rate_bps,
            }],
            occurred_at: now(),
        }))
        .unwrap();
    invoice.apply(&events[0]);
    invoice
}

fn close(invoice: &mut Invoice, paid_on: NaiveDate) {
    let events = invoice
        .handle(&InvoiceCommand::TransitionStatus(TransitionStatus {
            invoice_id: invoice.id_typed(),
            target: InvoiceStatus::Closed,
            payment_date: Some(paid_on),
            occurred_at: now(),
        }))
        .unwrap();
    invoice.apply(&events[0]);
}

#[test]
fn treatment_to_export_round_trip() {
    graftcrm_observability::init();

    let book = price_book();
    let rep_id = RepresentativeId::new(AggregateId::new());
    let mut directory = RepresentativeDirectory::default();
    directory.insert(rep_id, "Dana Reyes");

    // A 10 sq cm wound treated with Dermagraft bills $11,904.40 and invoices
    // $7,142.64.
    let treatment = record_treatment(&book, 10.0, date(2024, 3, 1));
    let mut first = invoice_for_treatment(&book, &treatment, "INV-1042", rep_id, 1_500);
    assert_eq!(first.total_billable(), 1_190_440);
    assert_eq!(first.invoice_amount(), 714_264);
    assert_eq!(first.assignments()[0].commission_amount, 107_140);
    assert_eq!(first.house_commission(), 178_566);

    // Lifecycle: open -> payable -> closed with a payment date.
    let events = first
        .handle(&InvoiceCommand::TransitionStatus(TransitionStatus {
            invoice_id: first.id_typed(),
            target: InvoiceStatus::Payable,
            payment_date: None,
            occurred_at: now(),
        }))
        .unwrap();
    first.apply(&events[0]);
    close(&mut first, date(2024, 3, 10));

    // A second paid invoice for the same rep in the other half of March.
    let second_treatment = record_treatment(&book, 10.0, date(2024, 3, 12));
    let mut second = invoice_for_treatment(&book, &second_treatment, "INV-1043", rep_id, 1_500);
    close(&mut second, date(2024, 3, 20));

    let invoices = vec![first, second];
    let periods = aggregate_periods(&invoices);

    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].payment_date, date(2024, 3, 31));
    assert_eq!(periods[1].payment_date, date(2024, 3, 15));
    assert!(periods.iter().all(|p| p.representative_id == rep_id));
    assert!(periods.iter().all(|p| p.total_commission == 107_140));
    assert!(periods.iter().all(|p| p.invoice_count() == 1));

    let rows = export_rows(&invoices, &directory).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].invoice_number, "INV-1043");
    assert_eq!(rows[0].commission_payment_date, date(2024, 3, 31));
    assert_eq!(rows[0].representative_name, "Dana Reyes");
    assert_eq!(rows[1].invoice_number, "INV-1042");
    assert_eq!(rows[1].commission_payment_date, date(2024, 3, 15));
    assert_eq!(rows[1].representative_commission_rate, 15.0);
}

#[test]
fn over_allocated_invoice_flags_through_house_commission() {
    graftcrm_observability::init();

    // 20% + 25% exceeds the 40% pool; the allocator clamps the house to zero
    // and the caller is expected to surface that.
    let split = allocate_commissions(
        100_000,
        &[
            AssignmentDraft {
                representative_id: RepresentativeId::new(AggregateId::new()),
                commission_rate_bps: 2_000,
            },
            AssignmentDraft {
                representative_id: RepresentativeId::new(AggregateId::new()),
                commission_rate_bps: 2_500,
            },
        ],
        COMMISSION_POOL_RATE_BPS,
    );

    assert_eq!(split.assignments[0].commission_amount, 20_000);
    assert_eq!(split.assignments[1].commission_amount, 25_000);
    assert_eq!(split.house_commission, 0);
    assert!(split.primary_rep().is_none());
}

#[test]
fn unknown_product_blocks_invoicing_up_front() {
    graftcrm_observability::init();

    let book = price_book();
    let treatment = record_treatment(&book, 10.0, date(2024, 3, 1));

    // A catalog missing the treatment's product refuses to price it.
    let empty_book = PriceBook::load([]).unwrap();
    let err = empty_book.resolve(treatment.product().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        graftcrm_core::DomainError::MissingReference(_)
    ));
}
