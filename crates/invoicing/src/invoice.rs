use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use graftcrm_commissions::{
    allocate_commissions, AssignmentDraft, CommissionAssignment, COMMISSION_POOL_RATE_BPS,
};
use graftcrm_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use graftcrm_events::Event;
use graftcrm_treatments::{TreatmentFinancials, TreatmentId};

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub AggregateId);

impl InvoiceId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status lifecycle.
///
/// Transitions are admin-triggered and not strictly linear: a closed invoice
/// can be reverted if a payment bounces. Entering `Closed` requires a payment
/// date in the same operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
    Payable,
    Closed,
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Payable => "payable",
            InvoiceStatus::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Aggregate root: Invoice.
///
/// Financial amounts are snapshotted from the treatment at issue time; later
/// treatment edits never change them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    id: InvoiceId,
    invoice_number: String,
    treatment_id: Option<TreatmentId>,
    treatment_date: Option<NaiveDate>,
    total_billable: u64,
    invoice_amount: u64,
    status: InvoiceStatus,
    invoice_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    assignments: Vec<CommissionAssignment>,
    house_commission: u64,
    version: u64,
    created: bool,
}

impl Invoice {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: InvoiceId) -> Self {
        Self {
            id,
            invoice_number: String::new(),
            treatment_id: None,
            treatment_date: None,
            total_billable: 0,
            invoice_amount: 0,
            status: InvoiceStatus::Open,
            invoice_date: None,
            due_date: None,
            payment_date: None,
            assignments: Vec::new(),
            house_commission: 0,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn treatment_id(&self) -> Option<TreatmentId> {
        self.treatment_id
    }

    pub fn treatment_date(&self) -> Option<NaiveDate> {
        self.treatment_date
    }

    pub fn total_billable(&self) -> u64 {
        self.total_billable
    }

    pub fn invoice_amount(&self) -> u64 {
        self.invoice_amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Set on the transition into `Closed`; retained as history if the
    /// invoice is later reverted.
    pub fn payment_date(&self) -> Option<NaiveDate> {
        self.payment_date
    }

    pub fn assignments(&self) -> &[CommissionAssignment] {
        &self.assignments
    }

    pub fn house_commission(&self) -> u64 {
        self.house_commission
    }

    /// Legacy flat single-rep view (predecessor `salesRep*` columns).
    ///
    /// Only meaningful when exactly one assignment exists; presentation
    /// concern, not an invariant.
    pub fn primary_rep(&self) -> Option<&CommissionAssignment> {
        match self.assignments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Only closed invoices feed commission-period aggregation.
    pub fn is_closed(&self) -> bool {
        self.status == InvoiceStatus::Closed
    }

    /// Derived at read time, never persisted: a calendar-day comparison
    /// against the due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != InvoiceStatus::Closed
            && self.due_date.is_some_and(|due| today > due)
    }
}

impl AggregateRoot for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: IssueInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueInvoice {
    pub invoice_id: InvoiceId,
    pub treatment_id: TreatmentId,
    pub treatment_date: NaiveDate,
    pub invoice_number: String,
    /// Amounts derived by the financial calculator; persisted as-is.
    pub financials: TreatmentFinancials,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub assignments: Vec<AssignmentDraft>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransitionStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatus {
    pub invoice_id: InvoiceId,
    pub target: InvoiceStatus,
    /// Required when `target` is `Closed`; ignored otherwise.
    pub payment_date: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReviseAssignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviseAssignments {
    pub invoice_id: InvoiceId,
    pub assignments: Vec<AssignmentDraft>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceCommand {
    IssueInvoice(IssueInvoice),
    TransitionStatus(TransitionStatus),
    ReviseAssignments(ReviseAssignments),
}

/// Event: InvoiceIssued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceIssued {
    pub invoice_id: InvoiceId,
    pub treatment_id: TreatmentId,
    pub treatment_date: NaiveDate,
    pub invoice_number: String,
    pub total_billable: u64,
    pub invoice_amount: u64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub assignments: Vec<CommissionAssignment>,
    pub house_commission: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub invoice_id: InvoiceId,
    pub status: InvoiceStatus,
    /// Present exactly when `status` is `Closed`.
    pub payment_date: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AssignmentsRevised.
///
/// Carries the complete recomputed assignment set plus the house commission,
/// so a reader can never observe a partially-updated split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentsRevised {
    pub invoice_id: InvoiceId,
    pub assignments: Vec<CommissionAssignment>,
    pub house_commission: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceEvent {
    InvoiceIssued(InvoiceIssued),
    StatusChanged(StatusChanged),
    AssignmentsRevised(AssignmentsRevised),
}

impl Event for InvoiceEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InvoiceEvent::InvoiceIssued(_) => "invoicing.invoice.issued",
            InvoiceEvent::StatusChanged(_) => "invoicing.invoice.status_changed",
            InvoiceEvent::AssignmentsRevised(_) => "invoicing.invoice.assignments_revised",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InvoiceEvent::InvoiceIssued(e) => e.occurred_at,
            InvoiceEvent::StatusChanged(e) => e.occurred_at,
            InvoiceEvent::AssignmentsRevised(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Invoice {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvoiceEvent::InvoiceIssued(e) => {
                self.id = e.invoice_id;
                self.invoice_number = e.invoice_number.clone();
                self.treatment_id = Some(e.treatment_id);
                self.treatment_date = Some(e.treatment_date);
                self.total_billable = e.total_billable;
                self.invoice_amount = e.invoice_amount;
                self.status = InvoiceStatus::Open;
                self.invoice_date = Some(e.invoice_date);
                self.due_date = Some(e.due_date);
                self.payment_date = None;
                self.assignments = e.assignments.clone();
                self.house_commission = e.house_commission;
                self.created = true;
            }
            InvoiceEvent::StatusChanged(e) => {
                self.status = e.status;
                // Leaving Closed keeps the historical payment date.
                if let Some(paid_on) = e.payment_date {
                    self.payment_date = Some(paid_on);
                }
            }
            InvoiceEvent::AssignmentsRevised(e) => {
                self.assignments = e.assignments.clone();
                self.house_commission = e.house_commission;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::IssueInvoice(cmd) => self.handle_issue(cmd),
            InvoiceCommand::TransitionStatus(cmd) => self.handle_transition(cmd),
            InvoiceCommand::ReviseAssignments(cmd) => self.handle_revise(cmd),
        }
    }
}

impl Invoice {
    fn ensure_invoice_id(&self, invoice_id: InvoiceId) -> Result<(), DomainError> {
        if self.id != invoice_id {
            return Err(DomainError::invariant("invoice_id mismatch"));
        }
        Ok(())
    }

    fn handle_issue(&self, cmd: &IssueInvoice) -> Result<Vec<InvoiceEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("invoice already exists"));
        }

        if cmd.invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number cannot be empty"));
        }

        if cmd.due_date < cmd.invoice_date {
            return Err(DomainError::validation(
                "due date cannot precede invoice date",
            ));
        }

        let split = allocate_commissions(
            cmd.financials.invoice_amount,
            &cmd.assignments,
            COMMISSION_POOL_RATE_BPS,
        );

        Ok(vec![InvoiceEvent::InvoiceIssued(InvoiceIssued {
            invoice_id: cmd.invoice_id,
            treatment_id: cmd.treatment_id,
            treatment_date: cmd.treatment_date,
            invoice_number: cmd.invoice_number.clone(),
            total_billable: cmd.financials.total_billable,
            invoice_amount: cmd.financials.invoice_amount,
            invoice_date: cmd.invoice_date,
            due_date: cmd.due_date,
            assignments: split.assignments,
            house_commission: split.house_commission,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transition(&self, cmd: &TransitionStatus) -> Result<Vec<InvoiceEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_invoice_id(cmd.invoice_id)?;

        if cmd.target == self.status {
            return Err(DomainError::conflict(format!(
                "invoice is already {}",
                self.status
            )));
        }

        // Validation precedes any state mutation: a close without a payment
        // date is rejected here, before an event exists.
        let payment_date = match cmd.target {
            InvoiceStatus::Closed => match cmd.payment_date {
                Some(paid_on) => Some(paid_on),
                None => {
                    return Err(DomainError::invalid_transition(
                        "cannot close invoice without a payment date",
                    ));
                }
            },
            _ => None,
        };

        Ok(vec![InvoiceEvent::StatusChanged(StatusChanged {
            invoice_id: cmd.invoice_id,
            status: cmd.target,
            payment_date,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_revise(&self, cmd: &ReviseAssignments) -> Result<Vec<InvoiceEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_invoice_id(cmd.invoice_id)?;

        // Full recomputation of every amount; the house commission depends on
        // the complete set, so there is no incremental path.
        let split =
            allocate_commissions(self.invoice_amount, &cmd.assignments, COMMISSION_POOL_RATE_BPS);

        Ok(vec![InvoiceEvent::AssignmentsRevised(AssignmentsRevised {
            invoice_id: cmd.invoice_id,
            assignments: split.assignments,
            house_commission: split.house_commission,
            occurred_at: cmd.occurred_at,
        })])
    }
}
