use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use graftcrm_core::{Aggregate, AggregateId, AggregateRoot, DomainError, PatientId};
use graftcrm_events::Event;
use graftcrm_pricing::ProductKey;

use crate::financials::sanitize_wound_area;

/// Treatment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreatmentId(pub AggregateId);

impl TreatmentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for TreatmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Treatment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentStatus {
    Active,
    Completed,
    Cancelled,
}

/// Aggregate root: Treatment.
///
/// Wound area uses the blank-input coercion rule of the financial calculator:
/// negative or non-finite measurements are stored as zero, never rejected.
/// Invoice amounts are snapshotted at issue time, so later edits here never
/// change historical invoices.
#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    id: TreatmentId,
    patient_id: Option<PatientId>,
    product: Option<ProductKey>,
    wound_area_sq_cm: f64,
    treatment_date: Option<NaiveDate>,
    status: TreatmentStatus,
    version: u64,
    created: bool,
}

impl Treatment {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: TreatmentId) -> Self {
        Self {
            id,
            patient_id: None,
            product: None,
            wound_area_sq_cm: 0.0,
            treatment_date: None,
            status: TreatmentStatus::Active,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> TreatmentId {
        self.id
    }

    pub fn patient_id(&self) -> Option<PatientId> {
        self.patient_id
    }

    pub fn product(&self) -> Option<&ProductKey> {
        self.product.as_ref()
    }

    pub fn wound_area_sq_cm(&self) -> f64 {
        self.wound_area_sq_cm
    }

    pub fn treatment_date(&self) -> Option<NaiveDate> {
        self.treatment_date
    }

    pub fn status(&self) -> TreatmentStatus {
        self.status
    }

    /// Invariant helper: measurements are frozen once the treatment leaves Active.
    pub fn is_modifiable(&self) -> bool {
        self.status == TreatmentStatus::Active
    }
}

impl AggregateRoot for Treatment {
    type Id = TreatmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RecordTreatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTreatment {
    pub treatment_id: TreatmentId,
    pub patient_id: PatientId,
    pub product: ProductKey,
    pub wound_area_sq_cm: f64,
    pub treatment_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateWoundArea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWoundArea {
    pub treatment_id: TreatmentId,
    pub wound_area_sq_cm: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CompleteTreatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteTreatment {
    pub treatment_id: TreatmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelTreatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTreatment {
    pub treatment_id: TreatmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreatmentCommand {
    RecordTreatment(RecordTreatment),
    UpdateWoundArea(UpdateWoundArea),
    CompleteTreatment(CompleteTreatment),
    CancelTreatment(CancelTreatment),
}

/// Event: TreatmentRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecorded {
    pub treatment_id: TreatmentId,
    pub patient_id: PatientId,
    pub product: ProductKey,
    pub wound_area_sq_cm: f64,
    pub treatment_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: WoundAreaUpdated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoundAreaUpdated {
    pub treatment_id: TreatmentId,
    pub wound_area_sq_cm: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TreatmentCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentCompleted {
    pub treatment_id: TreatmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TreatmentCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentCancelled {
    pub treatment_id: TreatmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreatmentEvent {
    TreatmentRecorded(TreatmentRecorded),
    WoundAreaUpdated(WoundAreaUpdated),
    TreatmentCompleted(TreatmentCompleted),
    TreatmentCancelled(TreatmentCancelled),
}

impl Event for TreatmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TreatmentEvent::TreatmentRecorded(_) => "treatments.treatment.recorded",
            TreatmentEvent::WoundAreaUpdated(_) => "treatments.treatment.wound_area_updated",
            TreatmentEvent::TreatmentCompleted(_) => "treatments.treatment.completed",
            TreatmentEvent::TreatmentCancelled(_) => "treatments.treatment.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TreatmentEvent::TreatmentRecorded(e) => e.occurred_at,
            TreatmentEvent::WoundAreaUpdated(e) => e.occurred_at,
            TreatmentEvent::TreatmentCompleted(e) => e.occurred_at,
            TreatmentEvent::TreatmentCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Treatment {
    type Command = TreatmentCommand;
    type Event = TreatmentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            TreatmentEvent::TreatmentRecorded(e) => {
                self.id = e.treatment_id;
                self.patient_id = Some(e.patient_id);
                self.product = Some(e.product.clone());
                self.wound_area_sq_cm = e.wound_area_sq_cm;
                self.treatment_date = Some(e.treatment_date);
                self.status = TreatmentStatus::Active;
                self.created = true;
            }
            TreatmentEvent::WoundAreaUpdated(e) => {
                self.wound_area_sq_cm = e.wound_area_sq_cm;
            }
            TreatmentEvent::TreatmentCompleted(_) => {
                self.status = TreatmentStatus::Completed;
            }
            TreatmentEvent::TreatmentCancelled(_) => {
                self.status = TreatmentStatus::Cancelled;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            TreatmentCommand::RecordTreatment(cmd) => self.handle_record(cmd),
            TreatmentCommand::UpdateWoundArea(cmd) => self.handle_update_wound_area(cmd),
            TreatmentCommand::CompleteTreatment(cmd) => self.handle_complete(cmd),
            TreatmentCommand::CancelTreatment(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl Treatment {
    fn ensure_treatment_id(&self, treatment_id: TreatmentId) -> Result<(), DomainError> {
        if self.id != treatment_id {
            return Err(DomainError::invariant("treatment_id mismatch"));
        }
        Ok(())
    }

    fn handle_record(&self, cmd: &RecordTreatment) -> Result<Vec<TreatmentEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("treatment already exists"));
        }

        Ok(vec![TreatmentEvent::TreatmentRecorded(TreatmentRecorded {
            treatment_id: cmd.treatment_id,
            patient_id: cmd.patient_id,
            product: cmd.product.clone(),
            wound_area_sq_cm: sanitize_wound_area(cmd.wound_area_sq_cm),
            treatment_date: cmd.treatment_date,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_wound_area(
        &self,
        cmd: &UpdateWoundArea,
    ) -> Result<Vec<TreatmentEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_treatment_id(cmd.treatment_id)?;

        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot update wound area once treatment is completed or cancelled",
            ));
        }

        Ok(vec![TreatmentEvent::WoundAreaUpdated(WoundAreaUpdated {
            treatment_id: cmd.treatment_id,
            wound_area_sq_cm: sanitize_wound_area(cmd.wound_area_sq_cm),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete(&self, cmd: &CompleteTreatment) -> Result<Vec<TreatmentEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_treatment_id(cmd.treatment_id)?;

        if self.status != TreatmentStatus::Active {
            return Err(DomainError::conflict("treatment is no longer active"));
        }

        Ok(vec![TreatmentEvent::TreatmentCompleted(TreatmentCompleted {
            treatment_id: cmd.treatment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelTreatment) -> Result<Vec<TreatmentEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_treatment_id(cmd.treatment_id)?;

        if self.status != TreatmentStatus::Active {
            return Err(DomainError::conflict("treatment is no longer active"));
        }

        Ok(vec![TreatmentEvent::TreatmentCancelled(TreatmentCancelled {
            treatment_id: cmd.treatment_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
