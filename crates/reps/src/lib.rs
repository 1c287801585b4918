//! Sales representatives domain module (event-sourced).
//!
//! This crate contains business rules for the representative registry,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod directory;
pub mod representative;

pub use directory::RepresentativeDirectory;
pub use representative::{
    ContactInfo, DeactivateRepresentative, RegisterRepresentative, Representative,
    RepresentativeCommand, RepresentativeDeactivated, RepresentativeEvent, RepresentativeId,
    RepresentativeRegistered, RepresentativeStatus,
};
