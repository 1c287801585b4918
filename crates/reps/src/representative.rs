use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use graftcrm_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use graftcrm_events::Event;

/// Sales representative identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RepresentativeId(pub AggregateId);

impl RepresentativeId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RepresentativeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Representative status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentativeStatus {
    Active,
    Inactive,
}

/// Contact information for a representative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Aggregate root: Representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representative {
    id: RepresentativeId,
    name: String,
    contact: ContactInfo,
    status: RepresentativeStatus,
    version: u64,
    created: bool,
}

impl Representative {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: RepresentativeId) -> Self {
        Self {
            id,
            name: String::new(),
            contact: ContactInfo::default(),
            status: RepresentativeStatus::Active,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> RepresentativeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> RepresentativeStatus {
        self.status
    }

    /// Invariant helper: inactive representatives cannot be assigned commissions.
    pub fn can_receive_assignments(&self) -> bool {
        self.status == RepresentativeStatus::Active
    }
}

impl AggregateRoot for Representative {
    type Id = RepresentativeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterRepresentative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRepresentative {
    pub representative_id: RepresentativeId,
    pub name: String,
    pub contact: Option<ContactInfo>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeactivateRepresentative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateRepresentative {
    pub representative_id: RepresentativeId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepresentativeCommand {
    RegisterRepresentative(RegisterRepresentative),
    DeactivateRepresentative(DeactivateRepresentative),
}

/// Event: RepresentativeRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeRegistered {
    pub representative_id: RepresentativeId,
    pub name: String,
    pub contact: ContactInfo,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RepresentativeDeactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeDeactivated {
    pub representative_id: RepresentativeId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepresentativeEvent {
    RepresentativeRegistered(RepresentativeRegistered),
    RepresentativeDeactivated(RepresentativeDeactivated),
}

impl Event for RepresentativeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RepresentativeEvent::RepresentativeRegistered(_) => "reps.representative.registered",
            RepresentativeEvent::RepresentativeDeactivated(_) => "reps.representative.deactivated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RepresentativeEvent::RepresentativeRegistered(e) => e.occurred_at,
            RepresentativeEvent::RepresentativeDeactivated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Representative {
    type Command = RepresentativeCommand;
    type Event = RepresentativeEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RepresentativeEvent::RepresentativeRegistered(e) => {
                self.id = e.representative_id;
                self.name = e.name.clone();
                self.contact = e.contact.clone();
                self.status = RepresentativeStatus::Active;
                self.created = true;
            }
            RepresentativeEvent::RepresentativeDeactivated(_) => {
                self.status = RepresentativeStatus::Inactive;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RepresentativeCommand::RegisterRepresentative(cmd) => self.handle_register(cmd),
            RepresentativeCommand::DeactivateRepresentative(cmd) => self.handle_deactivate(cmd),
        }
    }
}

impl Representative {
    fn ensure_representative_id(&self, representative_id: RepresentativeId) -> Result<(), DomainError> {
        if self.id != representative_id {
            return Err(DomainError::invariant("representative_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(
        &self,
        cmd: &RegisterRepresentative,
    ) -> Result<Vec<RepresentativeEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("representative already exists"));
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(vec![RepresentativeEvent::RepresentativeRegistered(
            RepresentativeRegistered {
                representative_id: cmd.representative_id,
                name: cmd.name.clone(),
                contact: cmd.contact.clone().unwrap_or_default(),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_deactivate(
        &self,
        cmd: &DeactivateRepresentative,
    ) -> Result<Vec<RepresentativeEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_representative_id(cmd.representative_id)?;

        if self.status == RepresentativeStatus::Inactive {
            return Err(DomainError::conflict("representative is already inactive"));
        }

        Ok(vec![RepresentativeEvent::RepresentativeDeactivated(
            RepresentativeDeactivated {
                representative_id: cmd.representative_id,
                occurred_at: cmd.occurred_at,
            },
        )])
    }
}
