use std::collections::HashMap;

use graftcrm_core::{DomainError, DomainResult};

use crate::representative::{Representative, RepresentativeId};

/// In-memory name lookup over registered representatives.
///
/// Built by the caller from whatever store holds the representatives and
/// handed to reporting/export, which must resolve every referenced rep.
#[derive(Debug, Clone, Default)]
pub struct RepresentativeDirectory {
    names: HashMap<RepresentativeId, String>,
}

impl RepresentativeDirectory {
    pub fn from_reps<'a>(reps: impl IntoIterator<Item = &'a Representative>) -> Self {
        let names = reps
            .into_iter()
            .map(|rep| (rep.id_typed(), rep.name().to_string()))
            .collect();
        Self { names }
    }

    /// Insert a single entry (useful when rehydrating from a read model).
    pub fn insert(&mut self, id: RepresentativeId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn name_of(&self, id: RepresentativeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Resolve a representative's name, failing loudly when unknown.
    pub fn resolve_name(&self, id: RepresentativeId) -> DomainResult<&str> {
        self.name_of(id)
            .ok_or_else(|| DomainError::missing_reference(format!("unknown representative {id}")))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
